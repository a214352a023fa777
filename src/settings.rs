//! Player preferences
//!
//! Settings live for one page session. They are read from the page query
//! string (`?mute=1&music=0.5`, via `URLSearchParams`) and never written back;
//! only the best score is persisted.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence all audio without changing volumes
    pub muted: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Behavior ===
    /// Treat window blur like the page being hidden
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
            show_fps: false,
            pause_on_blur: false,
        }
    }
}

/// Query keys and the setting each one controls
const VOLUME_KEYS: [&str; 3] = ["volume", "music", "sfx"];
const FLAG_KEYS: [&str; 3] = ["mute", "fps", "pauseonblur"];

impl Settings {
    /// Build settings from URL query parameters. `get` returns the decoded
    /// value of a key. Missing keys and bad values keep their defaults.
    pub fn from_params(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        for key in VOLUME_KEYS {
            let Some(raw) = get(key) else { continue };
            let Some(volume) = parse_volume(&raw) else {
                log::debug!("Ignoring {}={:?}", key, raw);
                continue;
            };
            match key {
                "volume" => settings.master_volume = volume,
                "music" => settings.music_volume = volume,
                _ => settings.sfx_volume = volume,
            }
        }

        for key in FLAG_KEYS {
            let Some(raw) = get(key) else { continue };
            let Some(flag) = parse_flag(&raw) else {
                log::debug!("Ignoring {}={:?}", key, raw);
                continue;
            };
            match key {
                "mute" => settings.muted = flag,
                "fps" => settings.show_fps = flag,
                _ => settings.pause_on_blur = flag,
            }
        }

        settings
    }

    /// Load settings from this page's query string (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let settings = match web_sys::UrlSearchParams::new_with_str(&search) {
            Ok(params) => Self::from_params(|key| params.get(key)),
            Err(e) => {
                log::warn!("Could not parse query string: {:?}", e);
                Self::default()
            }
        };
        log::info!("Settings: {:?}", settings);
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

fn parse_volume(value: &str) -> Option<f32> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}

/// A bare key (`?mute`) counts as true
fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
