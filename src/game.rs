//! Game state machine
//!
//! [`Game`] owns the simulation and every side-effect capability (audio, score
//! storage, randomness). Platform code drives it through four entry points:
//! [`Game::on_activate`], [`Game::frame`], [`Game::on_viewport_change`] and
//! [`Game::on_visibility_change`]. Each entry point finishes by forwarding the
//! queued [`GameEvent`]s to registered observers.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::assets::AssetCatalog;
use crate::audio::{AudioPlayer, Clip};
use crate::persistence::ScoreStore;
use crate::platform::FrameClock;
use crate::score::ScoreKeeper;
use crate::settings::Settings;
use crate::sim::{
    CollisionResult, GameEvent, GamePhase, SimulationState, TickEnv, WorldConfig,
    apply_width_change, tick,
};
use crate::tuning::Tuning;

/// Receives every event the game emits
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent, state: &SimulationState);
}

/// Which overlay cards should be visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlay {
    /// "Press to start" card
    pub start: bool,
    pub pause: bool,
    /// Final score and best after a run
    pub score: bool,
}

impl Overlay {
    pub fn for_phase(phase: GamePhase) -> Self {
        Self {
            start: phase == GamePhase::Idle,
            pause: phase == GamePhase::Paused,
            score: phase == GamePhase::GameOver,
        }
    }

    /// True if any card is showing
    pub fn any(&self) -> bool {
        self.start || self.pause || self.score
    }
}

/// Game instance holding all state
pub struct Game {
    state: SimulationState,
    world: WorldConfig,
    tuning: Tuning,
    settings: Settings,
    assets: AssetCatalog,
    assets_ready: bool,
    /// Set by the first accepted activation; browsers block audio before it
    audio_unlocked: bool,
    /// The single end-of-run cue slot
    active_end_cue: Option<Clip>,
    rng: Pcg32,
    clock: FrameClock,
    audio: Box<dyn AudioPlayer>,
    store: Box<dyn ScoreStore>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl Game {
    pub fn new(
        tuning: Tuning,
        settings: Settings,
        seed: u64,
        audio: Box<dyn AudioPlayer>,
        store: Box<dyn ScoreStore>,
    ) -> Self {
        let assets = AssetCatalog::default();
        let world = WorldConfig::base(tuning.ground_height, &assets);
        let best = ScoreKeeper::load(store.as_ref()).best();
        let state = SimulationState::new(world.width, &tuning, best);

        Self {
            state,
            world,
            tuning,
            settings,
            assets,
            assets_ready: false,
            audio_unlocked: false,
            active_end_cue: None,
            rng: Pcg32::seed_from_u64(seed),
            clock: FrameClock::new(),
            audio,
            store,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn assets(&self) -> &AssetCatalog {
        &self.assets
    }

    /// Install loaded assets and allow play to begin
    pub fn set_assets(&mut self, assets: AssetCatalog) {
        self.assets = assets;
        self.world.refresh_asset_widths(&self.assets);
        let width = self.world.width;
        apply_width_change(&mut self.state, &self.world, width);
        self.assets_ready = true;
        log::info!(
            "Assets ready: {} pipe variants, pipe width {:.1}",
            self.assets.variant_count(),
            self.world.pipe_width
        );
        self.notify();
    }

    /// The single player input: start, restart or flap
    pub fn on_activate(&mut self) {
        if !self.assets_ready || self.state.restart_locked || self.state.is_paused() {
            return;
        }

        if self.state.is_game_over() {
            self.reset_run();
        }
        if self.state.phase == GamePhase::Idle {
            self.start_run();
        }

        self.state.avatar.flap(self.tuning.flap_velocity);
        self.state.push_event(GameEvent::Flapped);
        if self.audio_unlocked {
            if let Err(e) = self.audio.play(Clip::Flap) {
                log::debug!("Flap sound: {}", e);
            }
        }

        self.notify();
    }

    /// Advance one animation frame
    pub fn frame(&mut self, timestamp_ms: f64) {
        let dt = self.clock.tick(timestamp_ms);

        let env = TickEnv {
            world: &self.world,
            tuning: &self.tuning,
            variant_count: self.assets.variant_count(),
        };
        let hit = tick(&mut self.state, &env, &mut self.rng, self.store.as_mut(), dt);

        if hit.is_hit() {
            self.enter_game_over(hit);
        } else if self.state.restart_locked {
            self.update_restart_lock(dt);
        }

        self.notify();
    }

    /// Viewport resized (CSS pixels) or device pixel ratio changed
    pub fn on_viewport_change(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        let previous_width = self.world.width;
        self.world = WorldConfig::recompute(
            width,
            height,
            device_pixel_ratio,
            self.tuning.ground_height,
            &self.assets,
        );
        apply_width_change(&mut self.state, &self.world, previous_width);
        log::debug!(
            "World resized: {:.1} -> {:.1} wide, canvas {:?}",
            previous_width,
            self.world.width,
            self.world.canvas_size
        );
        self.state.push_event(GameEvent::Resized);
        self.notify();
    }

    /// Page hidden or shown again
    pub fn on_visibility_change(&mut self, hidden: bool) {
        if hidden {
            if self.state.is_running() {
                self.state.phase = GamePhase::Paused;
                self.state.push_event(GameEvent::Paused);
                log::info!("Auto-paused (page hidden)");
            }
            if self.audio_unlocked {
                self.audio.pause(Clip::Music);
            }
        } else {
            if self.state.is_paused() {
                self.state.phase = GamePhase::Running;
                self.state.push_event(GameEvent::Resumed);
                log::info!("Resumed");
            }
            // Time spent hidden must not turn into one huge step
            self.clock.reset();
            if self.audio_unlocked && self.state.is_running() {
                if let Err(e) = self.audio.resume(Clip::Music) {
                    log::debug!("Music resume: {}", e);
                }
            }
        }
        self.notify();
    }

    fn start_run(&mut self) {
        self.audio_unlocked = true;
        self.state.phase = GamePhase::Running;
        self.state.push_event(GameEvent::Started);
        if let Err(e) = self.audio.play(Clip::Music) {
            log::debug!("Music: {}", e);
        }
        log::info!("Run started (best {})", self.state.best());
    }

    fn reset_run(&mut self) {
        if let Some(cue) = self.active_end_cue.take() {
            self.audio.stop(cue);
        }
        self.audio.stop(Clip::Music);
        self.state.reset(self.world.width, &self.tuning);
    }

    fn enter_game_over(&mut self, cause: CollisionResult) {
        if self.state.is_game_over() {
            return;
        }

        self.state.phase = GamePhase::GameOver;
        self.state.avatar.velocity = 0.0;
        self.audio.stop(Clip::Music);

        self.state.restart_locked = self.play_end_cue();
        self.state.lock_elapsed_ms = 0.0;

        let (score, best) = (self.state.score(), self.state.best());
        self.state.push_event(GameEvent::GameOver { score, best });
        log::info!("Game over ({:?}): score {}, best {}", cause, score, best);
    }

    /// Start a random end-of-run cue in the shared slot. Returns whether it
    /// actually started.
    fn play_end_cue(&mut self) -> bool {
        if !self.audio_unlocked {
            return false;
        }
        let count = self.assets.end_cue_count.min(self.audio.end_cue_count());
        if count == 0 {
            return false;
        }

        if let Some(previous) = self.active_end_cue.take() {
            self.audio.stop(previous);
        }

        let cue = Clip::EndOfRun(self.rng.random_range(0..count));
        match self.audio.play(cue) {
            Ok(()) => {
                self.active_end_cue = Some(cue);
                true
            }
            Err(e) => {
                log::debug!("End-of-run cue: {}", e);
                false
            }
        }
    }

    fn update_restart_lock(&mut self, dt: f32) {
        self.state.lock_elapsed_ms += dt * 1000.0;

        let cue_finished = match self.active_end_cue {
            Some(cue) => !self.audio.is_active(cue),
            None => true,
        };
        let timed_out = self.state.lock_elapsed_ms >= self.tuning.restart_lock_timeout_ms;

        if cue_finished || timed_out {
            if cue_finished {
                self.active_end_cue = None;
            }
            self.state.restart_locked = false;
            self.state.push_event(GameEvent::RestartUnlocked);
            log::debug!(
                "Restart unlocked after {:.0}ms (timeout: {})",
                self.state.lock_elapsed_ms,
                timed_out && !cue_finished
            );
        }
    }

    fn notify(&mut self) {
        let events = self.state.drain_events();
        if self.observers.is_empty() {
            return;
        }
        for event in &events {
            for observer in &mut self.observers {
                observer.on_event(event, &self.state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioError, NullAudio};
    use crate::persistence::MemoryStore;
    use crate::sim::Obstacle;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Default)]
    struct AudioLog {
        played: Vec<Clip>,
        stopped: Vec<Clip>,
        paused: Vec<Clip>,
        resumed: Vec<Clip>,
        active: HashSet<Clip>,
    }

    #[derive(Clone, Default)]
    struct MockAudio {
        log: Rc<RefCell<AudioLog>>,
        cues: usize,
    }

    impl AudioPlayer for MockAudio {
        fn play(&mut self, clip: Clip) -> Result<(), AudioError> {
            let mut log = self.log.borrow_mut();
            log.played.push(clip);
            log.active.insert(clip);
            Ok(())
        }

        fn resume(&mut self, clip: Clip) -> Result<(), AudioError> {
            let mut log = self.log.borrow_mut();
            log.resumed.push(clip);
            log.active.insert(clip);
            Ok(())
        }

        fn pause(&mut self, clip: Clip) {
            let mut log = self.log.borrow_mut();
            log.paused.push(clip);
            log.active.remove(&clip);
        }

        fn stop(&mut self, clip: Clip) {
            let mut log = self.log.borrow_mut();
            log.stopped.push(clip);
            log.active.remove(&clip);
        }

        fn is_active(&self, clip: Clip) -> bool {
            self.log.borrow().active.contains(&clip)
        }

        fn end_cue_count(&self) -> usize {
            self.cues
        }
    }

    struct Recorder(Rc<RefCell<Vec<GameEvent>>>);

    impl GameObserver for Recorder {
        fn on_event(&mut self, event: &GameEvent, _state: &SimulationState) {
            self.0.borrow_mut().push(*event);
        }
    }

    fn catalog() -> AssetCatalog {
        AssetCatalog {
            end_cue_count: 2,
            ..AssetCatalog::default()
        }
    }

    fn game_with(audio: Box<dyn AudioPlayer>, store: MemoryStore) -> Game {
        Game::new(Tuning::default(), Settings::default(), 42, audio, Box::new(store))
    }

    fn ready_game() -> (Game, MockAudio) {
        let audio = MockAudio {
            cues: 2,
            ..MockAudio::default()
        };
        let mut game = game_with(Box::new(audio.clone()), MemoryStore::new());
        game.set_assets(catalog());
        (game, audio)
    }

    /// Run frames at ~60fps until the phase changes or the frame budget runs out
    fn run_until_over(game: &mut Game, time: &mut f64) {
        for _ in 0..300 {
            *time += 16.0;
            game.frame(*time);
            if game.state().is_game_over() {
                return;
            }
        }
        panic!("run never ended");
    }

    #[test]
    fn test_activate_ignored_until_assets_ready() {
        let mut game = game_with(Box::new(NullAudio), MemoryStore::new());
        game.on_activate();
        assert_eq!(game.state().phase, GamePhase::Idle);
        assert_eq!(game.state().avatar.velocity, 0.0);

        game.set_assets(AssetCatalog::default());
        game.on_activate();
        assert_eq!(game.state().phase, GamePhase::Running);
    }

    #[test]
    fn test_first_activation_starts_music_and_flaps() {
        let (mut game, audio) = ready_game();
        game.on_activate();

        assert!(game.state().is_running());
        assert_eq!(game.state().avatar.velocity, -360.0);
        assert_eq!(audio.log.borrow().played, vec![Clip::Music, Clip::Flap]);

        // Second activation only flaps
        game.on_activate();
        assert_eq!(audio.log.borrow().played.len(), 3);
    }

    #[test]
    fn test_best_loaded_from_store() {
        let game = game_with(Box::new(NullAudio), MemoryStore::with_value("17"));
        assert_eq!(game.state().best(), 17);
        assert_eq!(game.state().score(), 0);
    }

    #[test]
    fn test_game_over_locks_restart_until_cue_ends() {
        let (mut game, audio) = ready_game();
        let mut time = 0.0;
        game.frame(time);
        game.on_activate();
        run_until_over(&mut game, &mut time);

        assert_eq!(game.state().avatar.velocity, 0.0);
        assert!(game.state().restart_locked);
        assert!(audio.log.borrow().stopped.contains(&Clip::Music));
        let cue = game.active_end_cue.expect("cue playing");
        assert!(matches!(cue, Clip::EndOfRun(i) if i < 2));

        // Input ignored while locked
        game.on_activate();
        assert!(game.state().is_game_over());

        // Cue finishes; next frame releases the lock
        audio.log.borrow_mut().active.remove(&cue);
        time += 16.0;
        game.frame(time);
        assert!(!game.state().restart_locked);
        assert!(game.active_end_cue.is_none());
    }

    #[test]
    fn test_restart_lock_times_out() {
        let (mut game, _audio) = ready_game();
        let mut time = 0.0;
        game.frame(time);
        game.on_activate();
        run_until_over(&mut game, &mut time);
        assert!(game.state().restart_locked);

        // Cue never ends; the lock still releases after the timeout
        for _ in 0..260 {
            time += 16.0;
            game.frame(time);
        }
        assert!(!game.state().restart_locked);
    }

    #[test]
    fn test_no_lock_without_audio() {
        let mut game = game_with(Box::new(NullAudio), MemoryStore::new());
        game.set_assets(catalog());
        let mut time = 0.0;
        game.frame(time);
        game.on_activate();
        run_until_over(&mut game, &mut time);
        assert!(!game.state().restart_locked);

        // Immediate restart
        game.on_activate();
        assert!(game.state().is_running());
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let (mut game, audio) = ready_game();
        game.on_activate();
        game.enter_game_over(CollisionResult::Ground);
        let played = audio.log.borrow().played.len();
        let events = game.state.drain_events();

        game.enter_game_over(CollisionResult::Obstacle);
        assert_eq!(audio.log.borrow().played.len(), played);
        assert!(game.state.drain_events().is_empty());
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver { score: 0, best: 0 })
        );
    }

    #[test]
    fn test_restart_resets_run_and_keeps_best() {
        let (mut game, audio) = ready_game();
        game.on_activate();
        {
            let state = &mut game.state;
            for _ in 0..3 {
                state.scores.award(&mut MemoryStore::new());
            }
            state.obstacles.push(Obstacle {
                x: 200.0,
                width: 86.0,
                gap_y: 100.0,
                gap_height: 160.0,
                passed: false,
                variant: None,
            });
            state.background_offset = 37.0;
            state.spawn_timer_ms = 900.0;
        }
        game.enter_game_over(CollisionResult::Obstacle);
        let cue = game.active_end_cue.expect("cue playing");
        audio.log.borrow_mut().active.remove(&cue);
        game.frame(0.0);
        assert!(!game.state().restart_locked);
        game.state.avatar.rotation = 0.9;
        game.state.idle_time = 2.5;
        game.state.lock_elapsed_ms = 1200.0;

        game.on_activate();

        let fresh = SimulationState::new(game.world.width, &game.tuning, 3);
        let state = game.state();
        assert!(state.is_running());
        assert_eq!(state.score(), 0);
        assert_eq!(state.best(), 3);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.background_offset, 0.0);
        assert_eq!(state.spawn_timer_ms, 0.0);
        assert_eq!(state.spawn_interval_ms, fresh.spawn_interval_ms);
        assert_eq!(state.avatar.pos, fresh.avatar.pos);
        assert_eq!(state.avatar.velocity, -360.0);
        assert_eq!(state.avatar.rotation, 0.0);
        assert_eq!(state.idle_time, 0.0);
        assert_eq!(state.lock_elapsed_ms, 0.0);
        assert!(!state.restart_locked);
    }

    #[test]
    fn test_hidden_page_pauses_and_freezes() {
        let (mut game, audio) = ready_game();
        game.frame(0.0);
        game.on_activate();
        game.frame(16.0);

        game.on_visibility_change(true);
        assert_eq!(game.state().phase, GamePhase::Paused);
        assert!(audio.log.borrow().paused.contains(&Clip::Music));

        let y = game.state().avatar.pos.y;
        game.frame(5000.0);
        assert_eq!(game.state().avatar.pos.y, y);

        // Input while paused is ignored
        game.on_activate();
        assert_eq!(game.state().phase, GamePhase::Paused);

        game.on_visibility_change(false);
        assert!(game.state().is_running());
        assert_eq!(audio.log.borrow().resumed, vec![Clip::Music]);
        // First frame after resume has no delta
        game.frame(9000.0);
        assert_eq!(game.state().avatar.pos.y, y);
    }

    #[test]
    fn test_hidden_while_idle_stays_idle() {
        let (mut game, audio) = ready_game();
        game.on_visibility_change(true);
        game.on_visibility_change(false);
        assert_eq!(game.state().phase, GamePhase::Idle);
        // Audio never touched before the first activation
        assert!(audio.log.borrow().paused.is_empty());
        assert!(audio.log.borrow().resumed.is_empty());
    }

    #[test]
    fn test_viewport_change_rescales() {
        let (mut game, _audio) = ready_game();
        game.state.obstacles.push(Obstacle {
            x: 400.0,
            width: 86.0,
            gap_y: 100.0,
            gap_height: 160.0,
            passed: false,
            variant: None,
        });

        // 960 wide world: twice the base
        game.on_viewport_change(1500.0, 1000.0, 2.0);
        assert!((game.world().width - 960.0).abs() < 1e-3);
        assert!((game.state().obstacles[0].x - 800.0).abs() < 1e-3);
        assert_eq!(game.state().obstacles[0].width, game.world().pipe_width);
        assert!((game.state().avatar.pos.x - 288.0).abs() < 1e-3);
        assert_eq!(game.world().canvas_size, (3000, 2000));
    }

    #[test]
    fn test_observers_receive_events() {
        let (mut game, _audio) = ready_game();
        let events = Rc::new(RefCell::new(Vec::new()));
        game.add_observer(Box::new(Recorder(events.clone())));

        game.on_activate();
        game.on_visibility_change(true);
        game.on_visibility_change(false);

        assert_eq!(
            *events.borrow(),
            vec![
                GameEvent::Started,
                GameEvent::Flapped,
                GameEvent::Paused,
                GameEvent::Resumed
            ]
        );
    }

    #[test]
    fn test_overlay_per_phase() {
        assert_eq!(
            Overlay::for_phase(GamePhase::Idle),
            Overlay {
                start: true,
                pause: false,
                score: false
            }
        );
        assert!(!Overlay::for_phase(GamePhase::Running).any());
        assert!(Overlay::for_phase(GamePhase::Paused).pause);
        assert!(Overlay::for_phase(GamePhase::GameOver).score);
    }
}
