// Browser storage access. Everything here is a no-op off wasm.

use serde::{Deserialize, Serialize};

use crate::config::{PLAYER_NAME_KEY, SETTINGS_KEY};
use crate::util::{cdebug, cwarn};

/// Calls the closure with browser localStorage, if available.
#[allow(unused_variables)]
pub fn with_local_storage<T>(f: impl FnOnce(&web_sys::Storage) -> Option<T>) -> Option<T> {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(win) = web_sys::window()
            && let Ok(Some(store)) = win.local_storage()
        {
            return f(&store);
        }
    }
    None
}

/// Calls the closure with browser sessionStorage, if available.
#[allow(unused_variables)]
pub fn with_session_storage<T>(f: impl FnOnce(&web_sys::Storage) -> Option<T>) -> Option<T> {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(win) = web_sys::window()
            && let Ok(Some(store)) = win.session_storage()
        {
            return f(&store);
        }
    }
    None
}

pub fn local_get(key: &str) -> Option<String> {
    with_local_storage(|store| store.get_item(key).ok().flatten())
}

/// Display name remembered for the rest of the browsing session.
pub fn load_player_name() -> Option<String> {
    with_session_storage(|store| store.get_item(PLAYER_NAME_KEY).ok().flatten())
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

pub fn save_player_name(name: &str) {
    let saved = with_session_storage(|store| store.set_item(PLAYER_NAME_KEY, name).ok());
    if saved.is_none() {
        cwarn("session storage unavailable, player name not remembered");
    }
}

/// User-facing preferences kept across visits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player_color: String,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_color: "red".to_string(),
            muted: false,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        local_get(SETTINGS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        let Ok(raw) = serde_json::to_string(self) else {
            return;
        };
        if with_local_storage(|store| store.set_item(SETTINGS_KEY, &raw).ok()).is_some() {
            cdebug(&format!("settings saved: {raw}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_tolerate_missing_fields() {
        let s: Settings = serde_json::from_str(r#"{"muted": true}"#).unwrap();
        assert_eq!(s.player_color, "red");
        assert!(s.muted);
    }

    #[test]
    fn storage_is_absent_off_wasm() {
        assert_eq!(local_get(SETTINGS_KEY), None);
        assert_eq!(load_player_name(), None);
        assert_eq!(Settings::load(), Settings::default());
    }
}
