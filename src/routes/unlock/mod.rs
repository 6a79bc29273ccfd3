//! Account unlock flows. Both variants run with no session in context:
//! the token variant starts from an emailed link, the direct variant from a
//! code an administrator issued out-of-band. Each step advances only on a
//! server-confirmed success, and a completed flow is the sole path that
//! clears a permanent lockout record.

mod direct;
mod token;

pub(crate) use direct::UnlockDirectPage;
pub(crate) use token::UnlockTokenPage;

use crate::features::auth::password::password_issue;

/// Milliseconds before the success step redirects back to login.
const SUCCESS_REDIRECT_MS: u32 = 3_000;
