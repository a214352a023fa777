//! Flappy Sky entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_sky::audio::{AudioPlayer, AudioSources, WebAudio};
    use flappy_sky::persistence::LocalStorageStore;
    use flappy_sky::platform::web::{self, ImageSources};
    use flappy_sky::renderer::{RenderState, build_scene};
    use flappy_sky::sim::{GameEvent, SimulationState};
    use flappy_sky::{Game, GameObserver, Overlay, Settings, Tuning};

    /// Game plus everything that only exists in the browser
    struct App {
        game: Game,
        canvas: HtmlCanvasElement,
        render_state: Option<RenderState>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(game: Game, canvas: HtmlCanvasElement) -> Self {
            Self {
                game,
                canvas,
                render_state: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Re-measure the viewport and size the canvas backing store to match
        fn resize(&mut self) {
            let (width, height, dpr) = web::viewport();
            self.game.on_viewport_change(width, height, dpr);

            let (canvas_w, canvas_h) = self.game.world().canvas_size;
            self.canvas.set_width(canvas_w);
            self.canvas.set_height(canvas_h);
            let style = self.canvas.style();
            let _ = style.set_property("width", &format!("{}px", width));
            let _ = style.set_property("height", &format!("{}px", height));

            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(canvas_w, canvas_h);
            }
        }

        fn update(&mut self, time: f64) {
            self.game.frame(time);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(ref mut render_state) = self.render_state else {
                return;
            };
            let scene = build_scene(self.game.state(), self.game.world(), self.game.assets());
            match render_state.render(&scene, self.game.world()) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn update_fps(&self, document: &Document) {
            if !self.game.settings().show_fps {
                return;
            }
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }
        }
    }

    /// Keeps the DOM overlay cards in sync with the game phase
    struct DomOverlay {
        document: Document,
    }

    impl DomOverlay {
        fn refresh(&self, state: &SimulationState) {
            let overlay = Overlay::for_phase(state.phase);
            self.toggle("overlay", overlay.any());
            self.toggle("start-card", overlay.start);
            self.toggle("pause-card", overlay.pause);
            self.toggle("score-card", overlay.score);

            if overlay.score {
                self.set_text("score-value", &state.score().to_string());
                self.set_text("best-value", &state.best().to_string());
            }
        }

        fn toggle(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("visible", visible);
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    impl GameObserver for DomOverlay {
        fn on_event(&mut self, event: &GameEvent, state: &SimulationState) {
            match event {
                GameEvent::Flapped | GameEvent::Resized | GameEvent::RestartUnlocked => {}
                _ => self.refresh(state),
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Sky starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        let tuning = Tuning::load();
        let audio = WebAudio::new(&AudioSources::default(), &settings);
        let end_cue_count = audio.end_cue_count();
        let store = LocalStorageStore::new();

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(tuning, settings, seed, Box::new(audio), Box::new(store));
        let overlay = DomOverlay {
            document: document.clone(),
        };
        overlay.refresh(game.state());
        game.add_observer(Box::new(overlay));

        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App::new(game, canvas.clone())));
        app.borrow_mut().resize();

        // Initialize WebGPU
        let (width, height) = app.borrow().game.world().canvas_size;
        match create_renderer(&canvas, width, height).await {
            Some(render_state) => app.borrow_mut().render_state = Some(render_state),
            None => log::error!("No renderer; running without graphics"),
        }

        setup_input_handlers(app.clone());
        setup_viewport_handlers(app.clone());
        setup_auto_pause(app.clone());

        // Start game loop; the avatar hovers while assets load
        request_animation_frame(app.clone());

        let loaded = web::load_assets(&ImageSources::default(), end_cue_count).await;
        {
            let mut app = app.borrow_mut();
            if let Some(ref mut render_state) = app.render_state {
                render_state.set_images(&loaded.images);
            }
            app.game.set_assets(loaded.catalog);
        }

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        log::info!("Flappy Sky running!");
    }

    async fn create_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to create renderer: {}", e);
                None
            }
        }
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard: Space flaps
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    app.borrow_mut().game.on_activate();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Primary mouse button
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    event.prevent_default();
                    app.borrow_mut().game.on_activate();
                }
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start; non-passive so the page does not scroll or zoom
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.on_activate();
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
    }

    fn setup_viewport_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        for event in ["resize", "orientationchange"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize();
            });
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                app.borrow_mut().game.on_visibility_change(hidden);
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        if !app.borrow().game.settings().pause_on_blur {
            return;
        }

        // Window blur (click outside) and focus
        for (event, hidden) in [("blur", true), ("focus", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.on_visibility_change(hidden);
            });
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_fps(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy Sky (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);
    headless::run(seed, 60.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulated session: a simple autopilot plays for a fixed stretch of time
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use flappy_sky::assets::AssetCatalog;
    use flappy_sky::audio::NullAudio;
    use flappy_sky::persistence::MemoryStore;
    use flappy_sky::sim::{Avatar, GameEvent, SimulationState};
    use flappy_sky::{Game, GameObserver, Settings, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Logs run results as they happen
    struct RunLog;

    impl GameObserver for RunLog {
        fn on_event(&mut self, event: &GameEvent, _state: &SimulationState) {
            match event {
                GameEvent::GameOver { score, best } => {
                    log::info!("Run over: score {} (best {})", score, best)
                }
                GameEvent::NewBest { best } => log::debug!("New best: {}", best),
                _ => {}
            }
        }
    }

    /// Flap when falling below the next gap's lower half
    fn wants_flap(state: &SimulationState) -> bool {
        let avatar = &state.avatar;
        let target = state
            .obstacles
            .iter()
            .find(|o| o.right() > avatar.pos.x - avatar.radius)
            .map(|o| o.gap_y + o.gap_height * 0.65)
            .unwrap_or_else(Avatar::rest_y);
        avatar.velocity > 0.0 && avatar.pos.y > target
    }

    pub fn run(seed: u64, seconds: f64) {
        let mut game = Game::new(
            Tuning::load(),
            Settings::default(),
            seed,
            Box::new(NullAudio),
            Box::new(MemoryStore::new()),
        );
        game.add_observer(Box::new(RunLog));
        game.on_viewport_change(800.0, 600.0, 1.0);
        game.set_assets(AssetCatalog::default());

        let mut runs = 0;
        let mut time = 0.0;
        while time < seconds * 1000.0 {
            game.frame(time);
            let state = game.state();
            // Idle or crashed: start the next run
            if !state.is_running() {
                runs += 1;
                game.on_activate();
            } else if wants_flap(state) {
                game.on_activate();
            }
            time += FRAME_MS;
        }

        println!(
            "Seed {}: {} runs in {:.0}s, best score {}",
            seed,
            runs,
            seconds,
            game.state().best()
        );
    }
}
