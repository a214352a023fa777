//! Motion integration
//!
//! The avatar uses a constant-acceleration update, so splitting a step into
//! smaller ones (below the clamp) lands in the same place. Obstacles and the
//! background scroll at constant speed.

use super::state::{Avatar, Obstacle};
use crate::consts::MAX_DELTA;
use crate::tuning::Tuning;

/// Clamp a frame delta (seconds) into `[0, MAX_DELTA]`
#[inline]
pub fn clamp_delta(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_DELTA) } else { 0.0 }
}

/// Advance a live avatar by `dt` seconds (already clamped)
pub fn integrate(avatar: &mut Avatar, dt: f32, tuning: &Tuning) {
    let v0 = avatar.velocity;
    avatar.velocity = v0 + tuning.gravity * dt;
    avatar.pos.y += v0 * dt + 0.5 * tuning.gravity * dt * dt;
    avatar.rotation = tilt_for(avatar.velocity, tuning);
}

/// Visual tilt for a vertical velocity
pub fn tilt_for(velocity: f32, tuning: &Tuning) -> f32 {
    velocity
        .atan2(tuning.rotation_reference_speed)
        .clamp(tuning.min_rotation, tuning.max_rotation)
}

/// Idle hover pose. Advances `idle_time` and places the avatar on a sine wave
/// around its rest height; velocity is left alone.
pub fn hover(avatar: &mut Avatar, idle_time: &mut f32, dt: f32, tuning: &Tuning) {
    *idle_time += dt;
    let phase = (*idle_time * tuning.hover_frequency).sin();
    avatar.pos.y = Avatar::rest_y() + phase * tuning.hover_amplitude;
    avatar.rotation = phase * tuning.hover_tilt;
}

/// Scroll obstacles left
pub fn advance_obstacles(obstacles: &mut [Obstacle], dt: f32, tuning: &Tuning) {
    let dx = tuning.pipe_speed * dt;
    for obstacle in obstacles {
        obstacle.x -= dx;
    }
}

/// Scroll the background, wrapping within one tile
pub fn advance_background(offset: f32, dt: f32, running: bool, tile_width: f32, tuning: &Tuning) -> f32 {
    (offset + tuning.background_speed_for(running) * dt).rem_euclid(tile_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_clamp_delta() {
        assert_eq!(clamp_delta(0.016), 0.016);
        assert_eq!(clamp_delta(2.0), MAX_DELTA);
        assert_eq!(clamp_delta(-1.0), 0.0);
        assert_eq!(clamp_delta(f32::NAN), 0.0);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let tuning = Tuning::default();
        let mut avatar = Avatar::new(480.0);
        let y0 = avatar.pos.y;
        integrate(&mut avatar, 0.02, &tuning);
        assert!(avatar.velocity > 0.0);
        assert!(avatar.pos.y > y0);
        assert!(avatar.rotation > 0.0);
    }

    #[test]
    fn test_flap_rises_and_tilts_up() {
        let tuning = Tuning::default();
        let mut avatar = Avatar::new(480.0);
        avatar.flap(tuning.flap_velocity);
        let y0 = avatar.pos.y;
        integrate(&mut avatar, 0.016, &tuning);
        assert!(avatar.pos.y < y0);
        assert!(avatar.rotation < 0.0);
    }

    #[test]
    fn test_tilt_is_clamped() {
        let tuning = Tuning::default();
        assert_eq!(tilt_for(1.0e6, &tuning), 1.2);
        assert_eq!(tilt_for(-1.0e6, &tuning), -0.7);
        assert_eq!(tilt_for(0.0, &tuning), 0.0);
    }

    #[test]
    fn test_hover_is_cosmetic() {
        let tuning = Tuning::default();
        let mut avatar = Avatar::new(480.0);
        let mut idle_time = 0.0;
        for _ in 0..100 {
            hover(&mut avatar, &mut idle_time, 0.016, &tuning);
            assert!((avatar.pos.y - Avatar::rest_y()).abs() <= tuning.hover_amplitude + 1e-3);
            assert!(avatar.rotation.abs() <= tuning.hover_tilt + 1e-6);
        }
        assert_eq!(avatar.velocity, 0.0);
        assert!(approx(idle_time, 1.6, 1e-4));
    }

    #[test]
    fn test_obstacles_scroll_left() {
        let tuning = Tuning::default();
        let mut obstacles = vec![Obstacle {
            x: 500.0,
            width: 80.0,
            gap_y: 100.0,
            gap_height: 160.0,
            passed: false,
            variant: None,
        }];
        advance_obstacles(&mut obstacles, 0.01, &tuning);
        assert!(approx(obstacles[0].x, 497.8, 1e-3));
    }

    #[test]
    fn test_background_wraps() {
        let tuning = Tuning::default();
        let offset = advance_background(479.0, 0.03, true, 480.0, &tuning);
        // 479 + 55 * 0.03 = 480.65 -> 0.65
        assert!(approx(offset, 0.65, 1e-3));
        let idle = advance_background(0.0, 0.02, false, 480.0, &tuning);
        assert!(approx(idle, 55.0 * 0.35 * 0.02, 1e-4));
    }

    proptest! {
        #[test]
        fn prop_split_step_matches_single_step(
            dt1 in 0.0f32..0.0175,
            dt2 in 0.0f32..0.0175,
            y0 in 50.0f32..500.0,
            v0 in -400.0f32..400.0,
        ) {
            let tuning = Tuning::default();
            let mut split = Avatar::new(480.0);
            split.pos.y = y0;
            split.velocity = v0;
            let mut single = split.clone();

            integrate(&mut split, clamp_delta(dt1), &tuning);
            integrate(&mut split, clamp_delta(dt2), &tuning);
            integrate(&mut single, clamp_delta(dt1 + dt2), &tuning);

            prop_assert!(approx(split.pos.y, single.pos.y, 1e-2));
            prop_assert!(approx(split.velocity, single.velocity, 1e-2));
            prop_assert!(approx(split.rotation, single.rotation, 1e-4));
        }
    }
}
