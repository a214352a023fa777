//! Obstacle generation
//!
//! Obstacles arrive at randomized intervals with a randomized gap height. Both
//! draws come from an injected RNG so tests can seed them.

use rand::Rng;

use super::state::Obstacle;
use super::world::WorldConfig;
use crate::tuning::Tuning;

/// True once the spawn timer has reached the current interval
#[inline]
pub fn should_spawn(spawn_timer_ms: f32, interval_ms: f32) -> bool {
    spawn_timer_ms >= interval_ms
}

/// Create an obstacle just past the right edge of the world
pub fn spawn<R: Rng>(
    world: &WorldConfig,
    tuning: &Tuning,
    variant_count: usize,
    rng: &mut R,
) -> Obstacle {
    let min_gap_y = tuning.gap_margin;
    let max_gap_y = world.height - world.ground_height - tuning.gap_margin - tuning.gap_height;
    let gap_y = if max_gap_y > min_gap_y {
        rng.random_range(min_gap_y..max_gap_y)
    } else {
        min_gap_y
    };

    let variant = (variant_count > 0).then(|| rng.random_range(0..variant_count));

    Obstacle {
        x: world.width + world.pipe_width,
        width: world.pipe_width,
        gap_y,
        gap_height: tuning.gap_height,
        passed: false,
        variant,
    }
}

/// Next spawn interval: `base ± variance/2`, clamped to `[min, max]`
pub fn next_interval<R: Rng>(
    base_ms: f32,
    variance_ms: f32,
    min_ms: f32,
    max_ms: f32,
    rng: &mut R,
) -> f32 {
    let jitter = (rng.random::<f32>() - 0.5) * variance_ms;
    (base_ms + jitter).max(min_ms).min(max_ms)
}

/// `next_interval` with the tuning's timing parameters
pub fn next_interval_for<R: Rng>(tuning: &Tuning, rng: &mut R) -> f32 {
    next_interval(
        tuning.base_interval_ms,
        tuning.interval_variance_ms,
        tuning.min_interval_ms,
        tuning.max_interval_ms,
        rng,
    )
}
