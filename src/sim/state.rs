//! Game state and core simulation types
//!
//! Everything the simulation mutates lives here; rendering and presentation
//! only ever read it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::score::ScoreKeeper;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first input; avatar hovers, no obstacles
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Frozen while the page is hidden; resumes into Running
    Paused,
    /// Run ended by a collision
    GameOver,
}

/// Notifications emitted by the simulation and state machine, drained once per
/// entry point and forwarded to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new run started
    Started,
    /// Avatar flapped
    Flapped,
    /// An obstacle was passed
    Scored { score: u32 },
    /// Best score beaten and persisted
    NewBest { best: u32 },
    /// Run ended
    GameOver { score: u32, best: u32 },
    /// Restart is allowed again after a game over
    RestartUnlocked,
    Paused,
    Resumed,
    /// State returned to its initial values
    Reset,
    /// World dimensions changed
    Resized,
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub pos: Vec2,
    /// Vertical velocity (positive = down)
    pub velocity: f32,
    /// Visual tilt in radians, derived from velocity
    pub rotation: f32,
    pub radius: f32,
}

impl Avatar {
    /// Avatar at its resting spot for a world of the given width
    pub fn new(world_width: f32) -> Self {
        Self {
            pos: Vec2::new(world_width * BIRD_X_RATIO, Self::rest_y()),
            velocity: 0.0,
            rotation: 0.0,
            radius: BIRD_RADIUS,
        }
    }

    /// Resting (and hover center) height
    pub fn rest_y() -> f32 {
        WORLD_HEIGHT * BIRD_START_RATIO
    }

    pub fn flap(&mut self, flap_velocity: f32) {
        self.velocity = flap_velocity;
    }
}

/// An obstacle: a top and bottom pipe around a passable gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Top of the gap
    pub gap_y: f32,
    pub gap_height: f32,
    /// Set once when the avatar clears the obstacle
    pub passed: bool,
    /// Index into the loaded pipe art, if any
    pub variant: Option<usize>,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_y + self.gap_height
    }

    /// Still within the retention band left of the screen
    #[inline]
    pub fn is_retained(&self) -> bool {
        self.right() > -self.width
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub phase: GamePhase,
    /// Blocks a new run until the end-of-run cue finishes
    pub restart_locked: bool,
    /// Time the restart lock has been held (ms)
    pub lock_elapsed_ms: f32,
    /// Time since the last spawn (ms)
    pub spawn_timer_ms: f32,
    /// Time between the last spawn and the next (ms)
    pub spawn_interval_ms: f32,
    pub scores: ScoreKeeper,
    pub avatar: Avatar,
    /// Active obstacles, oldest (leftmost) first
    pub obstacles: Vec<Obstacle>,
    /// Background scroll position, always in [0, tile width)
    pub background_offset: f32,
    /// Seconds spent hovering in Idle
    pub idle_time: f32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl SimulationState {
    /// Fresh state for a world of the given width
    pub fn new(world_width: f32, tuning: &Tuning, best: u32) -> Self {
        Self {
            phase: GamePhase::Idle,
            restart_locked: false,
            lock_elapsed_ms: 0.0,
            spawn_timer_ms: 0.0,
            spawn_interval_ms: tuning.base_interval_ms,
            scores: ScoreKeeper::with_best(best),
            avatar: Avatar::new(world_width),
            obstacles: Vec::new(),
            background_offset: 0.0,
            idle_time: 0.0,
            events: Vec::new(),
        }
    }

    /// Restore everything except the best score
    pub fn reset(&mut self, world_width: f32, tuning: &Tuning) {
        let best = self.scores.best();
        let events = std::mem::take(&mut self.events);
        *self = Self::new(world_width, tuning, best);
        self.events = events;
        self.push_event(GameEvent::Reset);
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn best(&self) -> u32 {
        self.scores.best()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
