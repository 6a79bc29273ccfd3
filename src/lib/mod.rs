//! Shared frontend utilities for API access, configuration, storage, errors,
//! and build metadata.
//!
//! ## Core Authentication Flows
//!
//! ### Login & Two-Factor
//!
//! 1. **Credentials:** The client POSTs email and password to
//!    `/v1/auth/login`. A `requires_2fa` status parks a pending record in
//!    tab storage and switches the login page to OTP entry.
//! 2. **Verification:** `/v1/auth/verify-otp` returns the same payload as a
//!    plain login success; both paths install the session identically.
//! 3. **Redirect:** A single predicate decides between the dashboard and the
//!    forced change-password route.
//!
//! ### Lockout & Unlock
//!
//! Failed logins may carry a `lockout_until` timestamp (temporary, durable
//! countdown record) or a `permanently_locked` flag. Permanent locks clear
//! only through the unlock flows under `/unlock`, which run without any
//! session and finish by redirecting to `/login`.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids
//! duplicated logic in routes and features. These utilities do not handle
//! secrets directly, but callers must still avoid logging sensitive data.

pub(crate) mod api;
pub(crate) mod build_info;
pub(crate) mod clock;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod storage;

pub(crate) use api::{
    get_json, patch_json_with_headers_response, post_empty_with_headers, post_json_catching,
    post_json_with_headers, post_json_with_headers_response,
};
pub(crate) use errors::AppError;
