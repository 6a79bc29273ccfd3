//! Request and response types for auth-related API calls, plus the
//! normalized failure shape the login form renders. These payloads carry
//! credentials and one-time codes, so they must never be logged.

use crate::app_lib::AppError;
use crate::features::auth::roles::Role;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoginStatus {
    Success,
    #[serde(rename = "requires_2fa")]
    RequiresTwoFactor,
}

/// User record as the backend sends it. `role` stays a free string here and
/// is coerced to the closed [`Role`] enum when the session is installed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WireUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub password_change_required: Option<bool>,
    #[serde(default)]
    pub last_password_changed_at: Option<String>,
    #[serde(default)]
    pub password_expires_at: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Login response for both the credential and OTP-verification endpoints.
/// `user`/`token` are present on success; `user_id`/`two_factor_method`
/// accompany a `requires_2fa` status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: LoginStatus,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<WireUser>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub two_factor_method: Option<String>,
}

/// Error body the login endpoint returns on rejection. Every field is
/// optional; absence means the plain bad-credentials case.
#[derive(Clone, Debug, Deserialize)]
pub struct WireLoginError {
    #[serde(default)]
    pub message: Option<String>,
    /// Epoch milliseconds; present on a temporary lockout.
    #[serde(default)]
    pub lockout_until: Option<f64>,
    #[serde(default)]
    pub attempts_remaining: Option<u32>,
    #[serde(default)]
    pub permanently_locked: Option<bool>,
}

/// Normalized login failure handed to the form for inline + toast rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct LoginFailure {
    pub message: String,
    pub lockout_until_ms: Option<f64>,
    pub attempts_remaining: Option<u32>,
    pub permanently_locked: bool,
    /// Connectivity problem rather than a rejection; never writes a lockout
    /// record and renders the check-your-connection message.
    pub network: bool,
}

impl LoginFailure {
    pub fn from_wire(wire: WireLoginError) -> Self {
        Self {
            message: wire
                .message
                .unwrap_or_else(|| "Invalid email or password.".to_string()),
            lockout_until_ms: wire.lockout_until,
            attempts_remaining: wire.attempts_remaining,
            permanently_locked: wire.permanently_locked.unwrap_or(false),
            network: false,
        }
    }

    pub fn from_transport(error: &AppError) -> Self {
        let (message, network) = match error {
            AppError::Timeout(_) | AppError::Network(_) => (
                "Unable to reach the server. Check your connection and try again.".to_string(),
                true,
            ),
            other => (other.to_string(), false),
        };

        Self {
            message,
            lockout_until_ms: None,
            attempts_remaining: None,
            permanently_locked: false,
            network,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RequestOtpRequest {
    pub user_id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RequestOtpResponse {
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct VerifyOtpRequest {
    pub user_id: String,
    pub code: String,
}

/// Partial profile update; unset fields are left untouched server-side.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Account summary returned when an unlock token verifies.
#[derive(Clone, Debug, Deserialize)]
pub struct UnlockAccountInfo {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub unlock_requested: Option<String>,
    #[serde(default)]
    pub unlock_token_expires: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnlockOtpRequest {
    pub code: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnlockResetRequest {
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct DirectOtpRequest {
    pub email: String,
    pub code: String,
}

/// Response to the direct OTP check. `admin_id` identifies the administrator
/// who issued the out-of-band code, not the account being unlocked.
#[derive(Clone, Debug, Deserialize)]
pub struct DirectOtpResponse {
    pub admin_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct DirectResetRequest {
    pub email: String,
    pub admin_id: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Domain user record held in memory and mirrored to durable storage.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub status: Option<String>,
    pub password_change_required: bool,
    pub last_password_changed_at: Option<String>,
    pub password_expires_at: Option<String>,
    pub profile_picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_decodes_two_factor_branch() {
        let raw = r#"{"status":"requires_2fa","user_id":"u-17","two_factor_method":"email"}"#;
        let response: LoginResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(response.status, LoginStatus::RequiresTwoFactor);
        assert_eq!(response.user_id.as_deref(), Some("u-17"));
        assert_eq!(response.two_factor_method.as_deref(), Some("email"));
        assert!(response.token.is_none());
    }

    #[test]
    fn wire_error_decodes_lockout_payload() {
        let raw = r#"{"message":"Too many attempts","lockout_until":1754000000000.0,"attempts_remaining":0}"#;
        let wire: WireLoginError = serde_json::from_str(raw).expect("decode");
        let failure = LoginFailure::from_wire(wire);
        assert_eq!(failure.message, "Too many attempts");
        assert_eq!(failure.lockout_until_ms, Some(1_754_000_000_000.0));
        assert!(!failure.permanently_locked);
        assert!(!failure.network);
    }

    #[test]
    fn transport_failures_map_to_connection_message() {
        let failure = LoginFailure::from_transport(&AppError::Timeout("slow".to_string()));
        assert!(failure.network);
        assert!(failure.message.contains("connection"));
        assert!(failure.lockout_until_ms.is_none());

        let failure = LoginFailure::from_transport(&AppError::Http {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(!failure.network);
    }

    #[test]
    fn missing_wire_message_falls_back_to_generic() {
        let wire: WireLoginError = serde_json::from_str("{}").expect("decode");
        let failure = LoginFailure::from_wire(wire);
        assert_eq!(failure.message, "Invalid email or password.");
    }
}
