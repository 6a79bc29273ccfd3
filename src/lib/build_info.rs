//! Build metadata surfaced on the health page.

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_SHA: &str = env!("SACCO_WEB_GIT_SHA");
