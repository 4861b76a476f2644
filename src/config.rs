//! Tunables for the maze game.
//! Fixed gameplay constants live here as consts; timings and the API location are
//! runtime-overridable through `GameConfig`.

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "MazeGame";

/// Maximum number of prior positions kept for the fading trail.
pub const MAX_TRAIL_LENGTH: usize = 16;
pub const TRAIL_MAX_ALPHA: f64 = 0.6;
pub const TRAIL_MIN_ALPHA: f64 = 0.05;

pub const MAX_LEADERBOARD_ENTRIES_DISPLAY: usize = 10;
/// Submitted and stored times may differ in the last bits after the round trip.
pub const RANK_TIME_TOLERANCE: f64 = 0.0001;

pub const MAZE_DIMENSIONS: [u32; 7] = [3, 5, 7, 10, 15, 20, 100];
pub const DEFAULT_DIMENSION: u32 = 5;

/// Canvas side used while there is no room to lay the maze out.
pub const PLACEHOLDER_CANVAS_SIZE: u32 = 50;

pub const PLAYER_NAME_KEY: &str = "mazeUsername";
pub const SETTINGS_KEY: &str = "maze_settings";
pub const CONFIG_KEY: &str = "maze_config";

pub const TROPHY_IMAGE_SRC: &str = "static/winnertrophy.png";
pub const MUSIC_SRC: &str = "static/background_music.m4a";
pub const WIN_SOUND_SRC: &str = "static/snake_sound.m4a";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Prefix for every service route, without a trailing slash.
    pub api_base: String,
    pub popup_dismiss_ms: u32,
    /// Slightly longer than the popup's CSS fade-out.
    pub close_fallback_ms: u32,
    pub resize_debounce_ms: u32,
    pub timer_refresh_ms: u32,
    pub toast_visible_ms: u32,
    /// Delay before the first achievement toast.
    pub toast_delay_ms: u32,
    pub toast_stagger_ms: u32,
    pub music_volume: f64,
    pub debug_logging: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            popup_dismiss_ms: 7000,
            close_fallback_ms: 350,
            resize_debounce_ms: 200,
            timer_refresh_ms: 50,
            toast_visible_ms: 4000,
            toast_delay_ms: 100,
            toast_stagger_ms: 300,
            music_volume: 0.3,
            debug_logging: true,
        }
    }
}

impl GameConfig {
    /// Parses a (possibly partial) JSON override; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let mut cfg: GameConfig = serde_json::from_str(raw)?;
        cfg.api_base = cfg.api_base.trim_end_matches('/').to_string();
        Ok(cfg)
    }

    /// Defaults merged with the override stored under `CONFIG_KEY`, if any.
    pub fn load() -> Self {
        let Some(raw) = crate::storage::local_get(CONFIG_KEY) else {
            return Self::default();
        };
        match Self::from_json(&raw) {
            Ok(cfg) => cfg,
            Err(e) => {
                crate::util::cwarn(&format!("ignoring malformed {CONFIG_KEY}: {e}"));
                Self::default()
            }
        }
    }

    /// When the `index`-th toast of one win appears.
    pub fn toast_delay(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.toast_delay_ms.saturating_add(self.toast_stagger_ms.saturating_mul(index))
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}/{}", self.api_base, route.trim_start_matches('/'))
    }
}

/// Falls back to the default size for anything that is not a positive dimension.
pub fn sanitize_dimension(dimension: u32) -> u32 {
    if dimension == 0 {
        crate::util::cerror("invalid dimension requested, defaulting to 5");
        DEFAULT_DIMENSION
    } else {
        dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{"popup_dismiss_ms": 1500, "api_base": "http://host/api/"}"#)
            .unwrap();
        assert_eq!(cfg.popup_dismiss_ms, 1500);
        assert_eq!(cfg.api_base, "http://host/api");
        assert_eq!(cfg.close_fallback_ms, 350);
        assert_eq!(cfg.resize_debounce_ms, 200);
    }

    #[test]
    fn malformed_override_is_an_error() {
        assert!(GameConfig::from_json("{not json").is_err());
    }

    #[test]
    fn url_joins_routes() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.url("maze/5"), "/api/maze/5");
        assert_eq!(cfg.url("/score"), "/api/score");
    }

    #[test]
    fn toasts_are_staggered_after_a_short_delay() {
        let cfg = GameConfig::default();
        assert_eq!((0..3).map(|i| cfg.toast_delay(i)).collect::<Vec<_>>(), vec![100, 400, 700]);
    }

    #[test]
    fn zero_dimension_falls_back() {
        assert_eq!(sanitize_dimension(0), DEFAULT_DIMENSION);
        assert_eq!(sanitize_dimension(7), 7);
    }
}
