//! Flappy Sky - A side-scrolling one-button flyer
//!
//! Core modules:
//! - `sim`: Simulation (world geometry, spawning, physics, collisions, state)
//! - `game`: Game state machine and side-effect coordination
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Frame clock and browser glue
//! - `persistence`: Best-score storage
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, GameObserver, Overlay};
pub use score::ScoreKeeper;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical world height (world width follows the viewport aspect)
    pub const WORLD_HEIGHT: f32 = 640.0;
    /// World width used when the viewport aspect is unusable
    pub const BASE_WORLD_WIDTH: f32 = 480.0;

    /// Maximum simulated step per frame (seconds) - guards slow frames and tab resume
    pub const MAX_DELTA: f32 = 0.035;

    /// Avatar sits at this fraction of the world width
    pub const BIRD_X_RATIO: f32 = 0.3;
    /// Avatar rest height as a fraction of the world height
    pub const BIRD_START_RATIO: f32 = 0.45;
    pub const BIRD_RADIUS: f32 = 22.0;

    /// Obstacle width bounds and the width used without a pipe image
    pub const PIPE_MIN_WIDTH: f32 = 68.0;
    pub const PIPE_MAX_WIDTH: f32 = 96.0;
    pub const PIPE_DEFAULT_ASSET_WIDTH: f32 = 86.0;
    /// Obstacle width scales with `ratio^PIPE_WIDTH_EXPONENT`, capped
    pub const PIPE_WIDTH_EXPONENT: f32 = 0.35;
    pub const PIPE_WIDTH_CAP_SCALE: f32 = 1.2;
    pub const PIPE_WIDTH_RATIO_FLOOR: f32 = 0.65;

    /// Storage key for the best score
    pub const BEST_SCORE_KEY: &str = "flappy-best";
}
