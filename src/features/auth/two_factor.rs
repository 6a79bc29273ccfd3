//! Pending two-factor state and OTP entry policy. The pending record lives
//! in tab storage so an accidental reload mid-challenge lands back on the
//! OTP step instead of the credential form, while a new tab starts clean.
//! The countdown itself is never persisted; the backend stays authoritative
//! on code expiry.

use crate::app_lib::storage::{self, Scope};
use crate::features::auth::types::{LoginResponse, LoginStatus};
use serde::{Deserialize, Serialize};

const PENDING_KEY: &str = "sacco_pending_2fa";

/// Seconds of validity on the code issued by the login call itself.
pub const LOGIN_CODE_EXPIRY_SECS: u64 = 600;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TwoFactorPending {
    pub user_id: String,
    pub email: String,
    pub method: String,
}

/// Builds the pending record from a `requires_2fa` login response. The email
/// comes from the submitted form; the response does not echo it.
pub fn pending_from_login(response: &LoginResponse, email: &str) -> Option<TwoFactorPending> {
    if response.status != LoginStatus::RequiresTwoFactor {
        return None;
    }
    Some(TwoFactorPending {
        user_id: response.user_id.clone()?,
        email: email.to_string(),
        method: response
            .two_factor_method
            .clone()
            .unwrap_or_else(|| "email".to_string()),
    })
}

pub fn persist_pending(pending: &TwoFactorPending) {
    storage::set_json(Scope::Tab, PENDING_KEY, pending);
}

pub fn load_pending() -> Option<TwoFactorPending> {
    storage::get_json(Scope::Tab, PENDING_KEY)
}

pub fn clear_pending() {
    storage::remove(Scope::Tab, PENDING_KEY);
}

/// A submittable code is exactly six ASCII digits.
pub fn is_valid_otp(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

/// Resend stays disabled until the current code has aged past the cooldown.
/// The window is a tunable, not a contract; see `AppConfig`.
pub fn resend_allowed(elapsed_secs: u64, cooldown_secs: u64) -> bool {
    elapsed_secs >= cooldown_secs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_factor_response() -> LoginResponse {
        serde_json::from_str(
            r#"{"status":"requires_2fa","user_id":"u-9","two_factor_method":"email"}"#,
        )
        .expect("decode")
    }

    #[test]
    fn pending_round_trips_through_tab_storage() {
        let pending = pending_from_login(&two_factor_response(), "grace@sacco.coop")
            .expect("pending record");
        assert_eq!(pending.user_id, "u-9");
        assert_eq!(pending.email, "grace@sacco.coop");
        assert_eq!(pending.method, "email");

        persist_pending(&pending);
        assert_eq!(load_pending(), Some(pending));
        clear_pending();
        assert_eq!(load_pending(), None);
    }

    #[test]
    fn success_response_yields_no_pending_record() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"status":"success","token":"t"}"#).expect("decode");
        assert!(pending_from_login(&response, "grace@sacco.coop").is_none());
    }

    #[test]
    fn challenge_without_user_id_is_rejected() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"status":"requires_2fa"}"#).expect("decode");
        assert!(pending_from_login(&response, "grace@sacco.coop").is_none());
    }

    #[test]
    fn otp_must_be_exactly_six_digits() {
        assert!(is_valid_otp("042917"));
        assert!(!is_valid_otp("04291"));
        assert!(!is_valid_otp("0429177"));
        assert!(!is_valid_otp("04a917"));
        assert!(!is_valid_otp(""));
    }

    #[test]
    fn resend_waits_out_the_cooldown() {
        assert!(!resend_allowed(0, 30));
        assert!(!resend_allowed(29, 30));
        assert!(resend_allowed(30, 30));
        assert!(resend_allowed(31, 0));
    }
}
