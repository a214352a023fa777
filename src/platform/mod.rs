//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing
//! - Asset loading (images on web)
//! - Viewport measurement

pub mod clock;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::FrameClock;
