//! Data-driven game balance
//!
//! Gameplay numbers live in `data/tuning.json`, embedded at compile time.
//! A malformed file falls back to the built-in defaults so the game always runs.

use serde::{Deserialize, Serialize};

/// Embedded tuning data
const TUNING_JSON: &str = include_str!("../data/tuning.json");

/// Gameplay constants (units are logical world units and seconds unless noted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Vertical velocity set by a flap (negative = up)
    pub flap_velocity: f32,
    /// Obstacle scroll speed (units/s)
    pub pipe_speed: f32,
    /// Height of the passable gap
    pub gap_height: f32,
    /// Minimum distance between the gap and the ceiling/ground
    pub gap_margin: f32,
    /// Height of the ground band at the bottom of the world
    pub ground_height: f32,

    // === Spawn timing (milliseconds) ===
    pub base_interval_ms: f32,
    pub interval_variance_ms: f32,
    pub min_interval_ms: f32,
    pub max_interval_ms: f32,

    // === Background ===
    /// Background scroll speed while running (units/s)
    pub background_speed: f32,
    /// Fraction of `background_speed` used while not running
    pub idle_background_factor: f32,

    // === Avatar pose ===
    /// Horizontal reference speed for the velocity-derived tilt
    pub rotation_reference_speed: f32,
    pub min_rotation: f32,
    pub max_rotation: f32,

    // === Idle hover ===
    /// Hover angular frequency (rad/s)
    pub hover_frequency: f32,
    pub hover_amplitude: f32,
    pub hover_tilt: f32,

    /// Restart lock is released after this long even if the end cue never reports back
    pub restart_lock_timeout_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        let pipe_speed = 220.0;
        Self {
            gravity: 1200.0,
            flap_velocity: -360.0,
            pipe_speed,
            gap_height: 160.0,
            gap_margin: 70.0,
            ground_height: 110.0,

            base_interval_ms: 1500.0,
            interval_variance_ms: 220.0,
            min_interval_ms: 1150.0,
            max_interval_ms: 2100.0,

            background_speed: pipe_speed * 0.25,
            idle_background_factor: 0.35,

            rotation_reference_speed: pipe_speed * 1.6,
            min_rotation: -0.7,
            max_rotation: 1.2,

            hover_frequency: 3.0,
            hover_amplitude: 12.0,
            hover_tilt: 0.12,

            restart_lock_timeout_ms: 4000.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the embedded tuning, falling back to defaults if it does not parse
    pub fn load() -> Self {
        match Self::from_json(TUNING_JSON) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Invalid embedded tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Background scroll speed for the current mode
    pub fn background_speed_for(&self, running: bool) -> f32 {
        if running {
            self.background_speed
        } else {
            self.background_speed * self.idle_background_factor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_tuning_matches_defaults() {
        let embedded = Tuning::from_json(TUNING_JSON).expect("embedded tuning parses");
        assert_eq!(embedded, Tuning::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 900.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 900.0);
        assert_eq!(tuning.gap_height, Tuning::default().gap_height);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ gravity: ").is_err());
    }

    #[test]
    fn test_idle_background_is_slower() {
        let tuning = Tuning::default();
        assert_eq!(tuning.background_speed_for(true), 55.0);
        assert!((tuning.background_speed_for(false) - 55.0 * 0.35).abs() < 1e-4);
    }
}
