//! Client wrappers for the SACCO auth API endpoints. These helpers
//! centralize paths and bearer-token headers, keeping auth flows consistent
//! and preventing token leakage in route code. The unlock endpoints run
//! without a session and attach no headers.

use crate::{
    app_lib::{
        AppError, get_json, patch_json_with_headers_response, post_empty_with_headers,
        post_json_catching, post_json_with_headers, post_json_with_headers_response,
    },
    features::auth::{
        session,
        types::{
            AckResponse, ChangePasswordRequest, DirectOtpRequest, DirectOtpResponse,
            DirectResetRequest, HealthResponse, LoginRequest, LoginResponse, ProfileUpdate,
            RequestOtpRequest, RequestOtpResponse, UnlockAccountInfo, UnlockOtpRequest,
            UnlockResetRequest, VerifyOtpRequest, WireLoginError, WireUser,
        },
    },
};

/// Bearer header for session-authenticated calls; empty when logged out so
/// a stray call degrades to a plain 401 instead of panicking.
fn bearer_headers() -> Vec<(String, String)> {
    session::stored_token()
        .map(|token| vec![("Authorization".to_string(), format!("Bearer {token}"))])
        .unwrap_or_default()
}

/// Submits credentials. Rejections with a structured body (lockout payload,
/// attempts-remaining warning) decode into [`WireLoginError`].
pub async fn login(request: &LoginRequest) -> Result<Result<LoginResponse, WireLoginError>, AppError> {
    post_json_catching("/v1/auth/login", request).await
}

/// Requests a fresh 2FA code for a pending login.
pub async fn request_otp(request: &RequestOtpRequest) -> Result<RequestOtpResponse, AppError> {
    post_json_with_headers_response("/v1/auth/request-otp", request, &[]).await
}

/// Confirms a 2FA code; success returns the same payload as a plain login.
pub async fn verify_otp(request: &VerifyOtpRequest) -> Result<LoginResponse, AppError> {
    post_json_with_headers_response("/v1/auth/verify-otp", request, &[]).await
}

/// Tears down the server-side session. Callers tolerate failure; local
/// state is cleared regardless.
pub async fn logout() -> Result<(), AppError> {
    post_empty_with_headers("/v1/auth/logout", &bearer_headers()).await
}

/// Applies a partial profile update and returns the updated record.
pub async fn update_profile(update: &ProfileUpdate) -> Result<WireUser, AppError> {
    patch_json_with_headers_response("/v1/users/me", update, &bearer_headers()).await
}

pub async fn change_password(request: &ChangePasswordRequest) -> Result<(), AppError> {
    post_json_with_headers("/v1/auth/change-password", request, &bearer_headers()).await
}

/// Validates an unlock link token. The token is single-shot; a failure here
/// is terminal for the link.
pub async fn unlock_verify_token(token: &str) -> Result<UnlockAccountInfo, AppError> {
    get_json(&format!("/v1/auth/unlock/verify-token/{token}")).await
}

pub async fn unlock_verify_otp(token: &str, request: &UnlockOtpRequest) -> Result<AckResponse, AppError> {
    post_json_with_headers_response(&format!("/v1/auth/unlock/verify-otp/{token}"), request, &[])
        .await
}

pub async fn unlock_request_otp(token: &str) -> Result<(), AppError> {
    post_json_with_headers(
        &format!("/v1/auth/unlock/request-otp/{token}"),
        &serde_json::json!({}),
        &[],
    )
    .await
}

pub async fn unlock_reset_password(
    token: &str,
    request: &UnlockResetRequest,
) -> Result<AckResponse, AppError> {
    post_json_with_headers_response(
        &format!("/v1/auth/unlock/reset-password/{token}"),
        request,
        &[],
    )
    .await
}

/// Confirms an out-of-band code for the tokenless unlock variant.
pub async fn unlock_verify_otp_direct(
    request: &DirectOtpRequest,
) -> Result<DirectOtpResponse, AppError> {
    post_json_with_headers_response("/v1/auth/unlock/verify-otp-direct", request, &[]).await
}

pub async fn unlock_reset_password_direct(
    request: &DirectResetRequest,
) -> Result<AckResponse, AppError> {
    post_json_with_headers_response("/v1/auth/unlock/reset-password-direct", request, &[]).await
}

pub async fn health() -> Result<HealthResponse, AppError> {
    get_json("/v1/health").await
}
