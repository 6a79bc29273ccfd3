//! Auth feature module covering the login/2FA flow, lockout tracking, the
//! account-unlock endpoints, and session state. It keeps authentication
//! logic out of the UI and must stay aligned with backend contract
//! expectations. This module touches security boundaries and must avoid
//! logging credentials, codes, or token material.
//!
//! Flow Overview: Login submits credentials and either installs a session,
//! parks a pending two-factor record, or surfaces a normalized failure
//! (with lockout bookkeeping). OTP verification returns a login-shaped
//! payload that installs the session through the same path. The unlock
//! flows run before any session exists and end back at the login route.

pub(crate) mod client;
mod guards;
pub(crate) mod lockout;
pub(crate) mod password;
pub(crate) mod roles;
pub(crate) mod session;
pub(crate) mod state;
pub(crate) mod two_factor;
pub(crate) mod types;

pub(crate) use guards::RequireAuth;
