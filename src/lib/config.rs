//! Build-time configuration with an optional runtime override. The runtime
//! config is read from `window.SACCO_CONFIG` (if present) so static
//! deployments can change endpoints and auth tunables without rebuilding.
//! Configuration values are public; do not store secrets here.

/// Idle minutes before an authenticated session is logged out.
const DEFAULT_IDLE_TIMEOUT_MINUTES: u64 = 20;
/// Seconds a fresh 2FA code must age before a resend is allowed.
const DEFAULT_OTP_RESEND_COOLDOWN_SECS: u64 = 30;
/// Countdown seconds for a code issued by an explicit resend.
const DEFAULT_OTP_EXPIRY_SECS: u64 = 300;

/// Frontend configuration derived from build-time environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub idle_timeout_minutes: u64,
    pub otp_resend_cooldown_secs: u64,
    pub otp_default_expiry_secs: u64,
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let api_base_url = option_env!("SACCO_API_BASE_URL").unwrap_or("");

        let mut config = Self {
            api_base_url: api_base_url.to_string(),
            idle_timeout_minutes: parse_seconds(
                option_env!("SACCO_IDLE_TIMEOUT_MINUTES"),
                DEFAULT_IDLE_TIMEOUT_MINUTES,
            ),
            otp_resend_cooldown_secs: parse_seconds(
                option_env!("SACCO_OTP_RESEND_COOLDOWN_SECS"),
                DEFAULT_OTP_RESEND_COOLDOWN_SECS,
            ),
            otp_default_expiry_secs: parse_seconds(
                option_env!("SACCO_OTP_EXPIRY_SECS"),
                DEFAULT_OTP_EXPIRY_SECS,
            ),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    /// Idle threshold in milliseconds for the logout poll.
    pub fn idle_timeout_ms(&self) -> f64 {
        self.idle_timeout_minutes as f64 * 60_000.0
    }
}

fn parse_seconds(value: Option<&str>, default: u64) -> u64 {
    value
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|parsed| *parsed > 0)
        .unwrap_or(default)
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    idle_timeout_minutes: Option<u64>,
    otp_resend_cooldown_secs: Option<u64>,
    otp_default_expiry_secs: Option<u64>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.idle_timeout_minutes {
        config.idle_timeout_minutes = value;
    }
    if let Some(value) = runtime.otp_resend_cooldown_secs {
        config.otp_resend_cooldown_secs = value;
    }
    if let Some(value) = runtime.otp_default_expiry_secs {
        config.otp_default_expiry_secs = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("SACCO_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        api_base_url: read_runtime_string(&object, "api_base_url"),
        idle_timeout_minutes: read_runtime_number(&object, "idle_timeout_minutes"),
        otp_resend_cooldown_secs: read_runtime_number(&object, "otp_resend_cooldown_secs"),
        otp_default_expiry_secs: read_runtime_number(&object, "otp_default_expiry_secs"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_string(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_number(object: &js_sys::Object, key: &str) -> Option<u64> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_f64()?;
    if value.is_finite() && value >= 1.0 {
        Some(value as u64)
    } else {
        None
    }
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, RuntimeConfig, apply_runtime_overrides, normalize_runtime_value, parse_seconds};

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  https://api.sacco.coop "),
            Some("https://api.sacco.coop".to_string())
        );
    }

    #[test]
    fn parse_seconds_rejects_garbage_and_zero() {
        assert_eq!(parse_seconds(None, 20), 20);
        assert_eq!(parse_seconds(Some("abc"), 20), 20);
        assert_eq!(parse_seconds(Some("0"), 20), 20);
        assert_eq!(parse_seconds(Some(" 45 "), 20), 45);
    }

    #[test]
    fn apply_runtime_overrides_overwrites_when_present() {
        let mut config = AppConfig {
            api_base_url: "https://api.default".to_string(),
            idle_timeout_minutes: 20,
            otp_resend_cooldown_secs: 30,
            otp_default_expiry_secs: 300,
        };
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value("https://api.override"),
            idle_timeout_minutes: Some(10),
            otp_resend_cooldown_secs: Some(60),
            otp_default_expiry_secs: None,
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.override");
        assert_eq!(config.idle_timeout_minutes, 10);
        assert_eq!(config.otp_resend_cooldown_secs, 60);
        assert_eq!(config.otp_default_expiry_secs, 300);
    }

    #[test]
    fn idle_timeout_ms_scales_minutes() {
        let config = AppConfig {
            api_base_url: String::new(),
            idle_timeout_minutes: 20,
            otp_resend_cooldown_secs: 30,
            otp_default_expiry_secs: 300,
        };
        assert_eq!(config.idle_timeout_ms(), 1_200_000.0);
    }
}
