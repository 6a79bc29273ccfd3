//! Lockout records layered over durable storage. A temporary record carries
//! a server-supplied expiry and is purged lazily the first time it is read
//! after that moment; a permanent record has no expiry and is only cleared
//! by a completed account unlock. No network calls happen here.

use crate::app_lib::storage::{self, Scope};
use serde::{Deserialize, Serialize};

const TEMPORARY_KEY: &str = "sacco_lockout_temporary";
const PERMANENT_KEY: &str = "sacco_lockout_permanent";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TemporaryLockout {
    pub email: String,
    /// Epoch milliseconds after which login attempts are allowed again.
    pub lockout_until_ms: f64,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PermanentLockout {
    pub email: String,
    pub message: String,
}

pub fn record_temporary(email: &str, lockout_until_ms: f64, message: &str) {
    let record = TemporaryLockout {
        email: email.to_string(),
        lockout_until_ms,
        message: message.to_string(),
    };
    storage::set_json(Scope::Durable, TEMPORARY_KEY, &record);
}

pub fn record_permanent(email: &str, message: &str) {
    let record = PermanentLockout {
        email: email.to_string(),
        message: message.to_string(),
    };
    storage::set_json(Scope::Durable, PERMANENT_KEY, &record);
}

pub fn clear_temporary() {
    storage::remove(Scope::Durable, TEMPORARY_KEY);
}

/// Only a completed unlock flow calls this.
pub fn clear_permanent() {
    storage::remove(Scope::Durable, PERMANENT_KEY);
}

/// Returns the active temporary lockout, purging an expired record on read.
pub fn temporary(now_ms: f64) -> Option<TemporaryLockout> {
    let record: TemporaryLockout = storage::get_json(Scope::Durable, TEMPORARY_KEY)?;
    if record.lockout_until_ms > now_ms {
        Some(record)
    } else {
        clear_temporary();
        None
    }
}

pub fn is_temporarily_locked(now_ms: f64) -> bool {
    temporary(now_ms).is_some()
}

pub fn permanent() -> Option<PermanentLockout> {
    storage::get_json(Scope::Durable, PERMANENT_KEY)
}

/// Whole seconds left on a temporary lockout, rounded up so the countdown
/// never shows 00:00 while the lock still holds.
pub fn remaining_seconds(record: &TemporaryLockout, now_ms: f64) -> u64 {
    let remaining_ms = record.lockout_until_ms - now_ms;
    if remaining_ms <= 0.0 {
        0
    } else {
        (remaining_ms / 1000.0).ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_lockout_expires_and_purges() {
        let now = 1_000_000.0;
        record_temporary("grace@sacco.coop", now + 30_000.0, "Too many attempts");

        assert!(is_temporarily_locked(now));
        assert!(is_temporarily_locked(now + 29_999.0));

        // Past expiry the record must be deleted, not merely ignored.
        assert!(!is_temporarily_locked(now + 30_000.0));
        assert_eq!(
            storage::get_string(Scope::Durable, TEMPORARY_KEY),
            None
        );
    }

    #[test]
    fn remaining_seconds_rounds_up() {
        let record = TemporaryLockout {
            email: "grace@sacco.coop".to_string(),
            lockout_until_ms: 10_500.0,
            message: String::new(),
        };
        assert_eq!(remaining_seconds(&record, 10_000.0), 1);
        assert_eq!(remaining_seconds(&record, 9_000.0), 2);
        assert_eq!(remaining_seconds(&record, 11_000.0), 0);
    }

    #[test]
    fn permanent_lockout_survives_time_until_cleared() {
        record_permanent("amos@sacco.coop", "Account locked");
        assert!(permanent().is_some());
        // No now-based read path touches the permanent record.
        assert!(permanent().is_some());
        clear_permanent();
        assert!(permanent().is_none());
    }
}
