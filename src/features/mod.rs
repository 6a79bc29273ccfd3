//! Feature modules grouping client logic by domain.

pub(crate) mod auth;
