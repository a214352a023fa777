//! Per-frame simulation update
//!
//! Advances the world by one (clamped) frame delta. Phase transitions are left
//! to the state machine: this only reports what the avatar hit.

use rand::Rng;

use super::collision::{CollisionResult, check_collisions};
use super::physics;
use super::spawn;
use super::state::{GameEvent, GamePhase, SimulationState};
use super::world::{WorldConfig, tile_or_world};
use crate::persistence::ScoreStore;
use crate::tuning::Tuning;

/// Read-only inputs to a tick
#[derive(Debug, Clone, Copy)]
pub struct TickEnv<'a> {
    pub world: &'a WorldConfig,
    pub tuning: &'a Tuning,
    /// Number of obstacle art variants to choose from
    pub variant_count: usize,
}

/// Advance the simulation by `dt` seconds of wall-clock time
pub fn tick<R: Rng>(
    state: &mut SimulationState,
    env: &TickEnv<'_>,
    rng: &mut R,
    store: &mut dyn ScoreStore,
    dt: f32,
) -> CollisionResult {
    if state.phase == GamePhase::Paused {
        return CollisionResult::None;
    }

    let dt = physics::clamp_delta(dt);
    let running = state.is_running();
    state.background_offset = physics::advance_background(
        state.background_offset,
        dt,
        running,
        tile_or_world(env.world),
        env.tuning,
    );

    match state.phase {
        GamePhase::Idle => {
            physics::hover(&mut state.avatar, &mut state.idle_time, dt, env.tuning);
            CollisionResult::None
        }
        GamePhase::Running => step_running(state, env, rng, store, dt),
        // Crash scene stays frozen; only the backdrop drifts
        GamePhase::GameOver | GamePhase::Paused => CollisionResult::None,
    }
}

fn step_running<R: Rng>(
    state: &mut SimulationState,
    env: &TickEnv<'_>,
    rng: &mut R,
    store: &mut dyn ScoreStore,
    dt: f32,
) -> CollisionResult {
    physics::integrate(&mut state.avatar, dt, env.tuning);

    state.spawn_timer_ms += dt * 1000.0;
    if spawn::should_spawn(state.spawn_timer_ms, state.spawn_interval_ms) {
        state.spawn_timer_ms = 0.0;
        let obstacle = spawn::spawn(env.world, env.tuning, env.variant_count, rng);
        state.obstacles.push(obstacle);
        state.spawn_interval_ms = spawn::next_interval_for(env.tuning, rng);
    }

    physics::advance_obstacles(&mut state.obstacles, dt, env.tuning);

    let check = check_collisions(&mut state.avatar, &mut state.obstacles, env.world);
    for _ in 0..check.newly_passed {
        let new_best = state.scores.award(store);
        state.push_event(GameEvent::Scored {
            score: state.score(),
        });
        if new_best {
            state.push_event(GameEvent::NewBest { best: state.best() });
        }
    }

    state.obstacles.retain(|o| o.is_retained());

    check.collision
}
