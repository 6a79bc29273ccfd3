//! Typed access to browser storage. Durable keys live in `localStorage` and
//! survive restarts; tab keys live in `sessionStorage` and never outlive the
//! tab. All reads are defensive: missing or malformed content is treated as
//! no record. On non-wasm targets a thread-local map backs the same API so
//! auth state logic can be exercised in native tests.

use serde::{Serialize, de::DeserializeOwned};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Scope {
    /// Survives browser restarts (`localStorage`).
    Durable,
    /// Cleared when the tab closes (`sessionStorage`).
    Tab,
}

pub fn get_string(scope: Scope, key: &str) -> Option<String> {
    backend::get(scope, key)
}

pub fn set_string(scope: Scope, key: &str, value: &str) {
    backend::set(scope, key, value);
}

pub fn remove(scope: Scope, key: &str) {
    backend::remove(scope, key);
}

/// Reads and decodes a JSON record. Malformed content yields `None`.
pub fn get_json<T: DeserializeOwned>(scope: Scope, key: &str) -> Option<T> {
    let raw = backend::get(scope, key)?;
    serde_json::from_str(&raw).ok()
}

pub fn set_json<T: Serialize>(scope: Scope, key: &str, value: &T) {
    if let Ok(raw) = serde_json::to_string(value) {
        backend::set(scope, key, &raw);
    }
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use super::Scope;

    fn area(scope: Scope) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        match scope {
            Scope::Durable => window.local_storage().ok().flatten(),
            Scope::Tab => window.session_storage().ok().flatten(),
        }
    }

    pub fn get(scope: Scope, key: &str) -> Option<String> {
        area(scope)?.get_item(key).ok().flatten()
    }

    pub fn set(scope: Scope, key: &str, value: &str) {
        if let Some(storage) = area(scope) {
            let _ = storage.set_item(key, value);
        }
    }

    pub fn remove(scope: Scope, key: &str) {
        if let Some(storage) = area(scope) {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use super::Scope;
    use std::cell::RefCell;
    use std::collections::HashMap;

    thread_local! {
        static STORE: RefCell<HashMap<(Scope, String), String>> =
            RefCell::new(HashMap::new());
    }

    pub fn get(scope: Scope, key: &str) -> Option<String> {
        STORE.with(|store| store.borrow().get(&(scope, key.to_string())).cloned())
    }

    pub fn set(scope: Scope, key: &str, value: &str) {
        STORE.with(|store| {
            store
                .borrow_mut()
                .insert((scope, key.to_string()), value.to_string());
        });
    }

    pub fn remove(scope: Scope, key: &str) {
        STORE.with(|store| {
            store.borrow_mut().remove(&(scope, key.to_string()));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Record {
        name: String,
        count: u32,
    }

    #[test]
    fn json_round_trip() {
        let record = Record {
            name: "savings".to_string(),
            count: 3,
        };
        set_json(Scope::Durable, "test_round_trip", &record);
        assert_eq!(
            get_json::<Record>(Scope::Durable, "test_round_trip"),
            Some(record)
        );
        remove(Scope::Durable, "test_round_trip");
        assert_eq!(get_json::<Record>(Scope::Durable, "test_round_trip"), None);
    }

    #[test]
    fn malformed_content_reads_as_absent() {
        set_string(Scope::Durable, "test_malformed", "{not json");
        assert_eq!(get_json::<Record>(Scope::Durable, "test_malformed"), None);
        remove(Scope::Durable, "test_malformed");
    }

    #[test]
    fn scopes_are_independent() {
        set_string(Scope::Durable, "test_scope", "durable");
        set_string(Scope::Tab, "test_scope", "tab");
        assert_eq!(
            get_string(Scope::Durable, "test_scope"),
            Some("durable".to_string())
        );
        assert_eq!(get_string(Scope::Tab, "test_scope"), Some("tab".to_string()));
        remove(Scope::Durable, "test_scope");
        assert_eq!(get_string(Scope::Durable, "test_scope"), None);
        assert_eq!(get_string(Scope::Tab, "test_scope"), Some("tab".to_string()));
        remove(Scope::Tab, "test_scope");
    }
}
