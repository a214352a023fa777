//! Simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Time arrives as a frame delta, clamped before use
//! - Randomness is injected (any `rand::Rng`)
//! - Obstacles are kept in spawn order (oldest first)
//! - No rendering, audio or DOM dependencies

pub mod collision;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{CollisionResult, FrameCheck, check_collisions};
pub use state::{Avatar, GameEvent, GamePhase, Obstacle, SimulationState};
pub use tick::{TickEnv, tick};
pub use world::{WorldConfig, apply_width_change};
