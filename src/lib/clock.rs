//! Wall-clock access for both compile targets. State logic takes explicit
//! millisecond timestamps so it can be tested natively with a simulated
//! clock; only UI glue calls `now_ms` directly.

#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Formats whole seconds as `mm:ss` for countdown displays.
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::format_mm_ss;

    #[test]
    fn countdown_formats_mm_ss() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(61), "01:01");
        assert_eq!(format_mm_ss(600), "10:00");
    }
}
