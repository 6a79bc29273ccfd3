//! HTTP helpers for JSON APIs with consistent timeouts and error handling.
//! Feature clients use these helpers to avoid duplicating request setup and
//! to enforce a predictable timeout policy. The helpers do not store tokens;
//! callers attach the bearer header where a session is required.

use super::{config::AppConfig, errors::AppError};
use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::to_string;
use web_sys::AbortController;

/// Default request timeout (milliseconds) applied to all HTTP helpers.
const DEFAULT_TIMEOUT_MS: u32 = 10_000;
/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Fetches JSON from an unauthenticated endpoint.
pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, AppError> {
    let url = build_url(path);
    let response = send_with_timeout(|signal| {
        Request::get(&url)
            .abort_signal(Some(signal))
            .build()
            .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
    })
    .await?;

    handle_json_response(response).await
}

/// Posts JSON with custom headers and expects an empty response body.
pub async fn post_json_with_headers<B: Serialize>(
    path: &str,
    body: &B,
    headers: &[(String, String)],
) -> Result<(), AppError> {
    let url = build_url(path);
    let payload = encode_body(body)?;
    let response = send_with_timeout(move |signal| {
        build_post(&url, payload, headers, signal)
    })
    .await?;

    handle_empty_response(response).await
}

/// Posts JSON with custom headers and parses a JSON response.
pub async fn post_json_with_headers_response<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
    headers: &[(String, String)],
) -> Result<T, AppError> {
    let url = build_url(path);
    let payload = encode_body(body)?;
    let response = send_with_timeout(move |signal| {
        build_post(&url, payload, headers, signal)
    })
    .await?;

    handle_json_response(response).await
}

/// Posts JSON and, when the server rejects the request with a structured
/// JSON error body, decodes that body instead of flattening it to text.
/// The outer error covers transport and malformed-payload failures only.
pub async fn post_json_catching<B, T, E>(
    path: &str,
    body: &B,
) -> Result<Result<T, E>, AppError>
where
    B: Serialize,
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    let url = build_url(path);
    let payload = encode_body(body)?;
    let response = send_with_timeout(move |signal| {
        build_post(&url, payload, &[], signal)
    })
    .await?;

    if response.ok() {
        let parsed = response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))?;
        return Ok(Ok(parsed));
    }

    let status = response.status();
    let raw = response.text().await.unwrap_or_default();
    match serde_json::from_str::<E>(&raw) {
        Ok(decoded) => Ok(Err(decoded)),
        Err(_) => Err(AppError::Http {
            status,
            message: sanitize_body(raw),
        }),
    }
}

/// Posts an empty body with custom headers, used for logout.
pub async fn post_empty_with_headers(
    path: &str,
    headers: &[(String, String)],
) -> Result<(), AppError> {
    let url = build_url(path);
    let response = send_with_timeout(move |signal| {
        let mut builder = Request::post(&url).abort_signal(Some(signal));
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .body("")
            .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
    })
    .await?;

    handle_empty_response(response).await
}

/// Patches JSON with custom headers and parses a JSON response.
pub async fn patch_json_with_headers_response<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
    headers: &[(String, String)],
) -> Result<T, AppError> {
    let url = build_url(path);
    let payload = encode_body(body)?;
    let response = send_with_timeout(move |signal| {
        let mut builder = Request::patch(&url)
            .header("Content-Type", "application/json")
            .abort_signal(Some(signal));
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .body(payload)
            .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
    })
    .await?;

    handle_json_response(response).await
}

fn encode_body<B: Serialize>(body: &B) -> Result<String, AppError> {
    to_string(body).map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))
}

fn build_post(
    url: &str,
    payload: String,
    headers: &[(String, String)],
    signal: &web_sys::AbortSignal,
) -> Result<gloo_net::http::Request, AppError> {
    let mut builder = Request::post(url)
        .header("Content-Type", "application/json")
        .abort_signal(Some(signal));

    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(payload)
        .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
}

/// Builds a URL from the configured API base URL and the provided path.
fn build_url(path: &str) -> String {
    let config = AppConfig::load();
    build_url_with_base(&config.api_base_url, path)
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps network errors into user-facing `AppError` variants with timeout detection.
fn map_request_error(err: gloo_net::Error) -> AppError {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("timeout") || lowered.contains("abort") {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {message}"))
    }
}

/// Sends a request with an abort timeout to avoid hanging UI state.
async fn send_with_timeout(
    build_request: impl FnOnce(&web_sys::AbortSignal) -> Result<gloo_net::http::Request, AppError>,
) -> Result<gloo_net::http::Response, AppError> {
    let controller = AbortController::new()
        .map_err(|_| AppError::Config("Failed to initialize request timeout.".to_string()))?;
    let signal = controller.signal();
    let timeout_controller = controller.clone();
    let _timeout = Timeout::new(DEFAULT_TIMEOUT_MS, move || timeout_controller.abort());

    let request = build_request(&signal)?;
    request.send().await.map_err(map_request_error)
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(
    response: gloo_net::http::Response,
) -> Result<T, AppError> {
    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Http {
            status,
            message: sanitize_body(body),
        })
    }
}

/// Handles empty responses and returns sanitized HTTP errors when needed.
async fn handle_empty_response(response: gloo_net::http::Response) -> Result<(), AppError> {
    if response.ok() {
        Ok(())
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Http {
            status,
            message: sanitize_body(body),
        })
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: String) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{build_url_with_base, sanitize_body};

    #[test]
    fn build_url_joins_base_and_path() {
        assert_eq!(
            build_url_with_base("https://api.sacco.coop/", "/v1/auth/login"),
            "https://api.sacco.coop/v1/auth/login"
        );
        assert_eq!(build_url_with_base("", "/v1/health"), "/v1/health");
    }

    #[test]
    fn sanitize_body_truncates_and_defaults() {
        assert_eq!(sanitize_body("   ".to_string()), "Request failed.");
        let long = "x".repeat(500);
        assert_eq!(sanitize_body(long).len(), 200);
    }
}
