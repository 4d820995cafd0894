//! Aerobot entry point
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

    use aerobot::persistence::{HighScoreService, WebRemote, WebStorageStore};
    use aerobot::platform::{FrameClock, LoopHandle};
    use aerobot::renderer::{RenderState, build_frame};
    use aerobot::sim::{GameEvent, GamePhase};
    use aerobot::{Game, GameConfig, Hud};

    /// Everything the frame loop touches
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        clock: FrameClock,
        /// Last HUD pushed to the DOM
        shown: Option<Hud>,
    }

    impl App {
        /// Advance the game to `time` (ms, from requestAnimationFrame)
        fn update(&mut self, time: f64) {
            let dt = self.clock.delta(time);
            for event in self.game.frame(dt) {
                if let GameEvent::Collected { kind, bonus } = event {
                    log::debug!("Collected {:?} (+{})", kind, bonus);
                }
            }
        }

        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let world = self.game.world();
            let vertices = build_frame(world);
            match render_state.render(&vertices, (world.width, world.height)) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Match the drawing buffer to the canvas' CSS size
        fn resize(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let (css_w, css_h) = (self.canvas.client_width(), self.canvas.client_height());
            let width = (css_w as f64 * dpr) as u32;
            let height = (css_h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
            self.game.resize(css_w as f32, css_h as f32);
        }

        /// Push score and overlay state to the DOM when it changed
        fn update_hud(&mut self) {
            let hud = self.game.hud();
            if self.shown == Some(hud) {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "#hud-score .hud-value", &hud.score_text());
            set_text(&document, "#hud-best .hud-value", &hud.best_text());
            set_visible(&document, "new-record", hud.new_record);
            set_visible(&document, "start-screen", hud.phase == GamePhase::Start);
            set_visible(&document, "hud", hud.phase == GamePhase::Playing);

            let game_over = hud.phase == GamePhase::GameOver;
            set_visible(&document, "game-over", game_over);
            if game_over {
                set_text(&document, "#final-score", &hud.score_text());
                set_text(&document, "#final-best", &hud.best_text());
            }

            self.shown = Some(hud);
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Aerobot starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;

        let dpr = window.device_pixel_ratio();
        let (css_w, css_h) = (canvas.client_width(), canvas.client_height());
        let width = (css_w as f64 * dpr) as u32;
        let height = (css_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // High score: LocalStorage, plus the leaderboard if the page names one
        let remote = canvas
            .get_attribute("data-remote-url")
            .filter(|url| !url.trim().is_empty())
            .map(WebRemote::new);
        let mut store = HighScoreService::new(Box::new(WebStorageStore::default()));
        if let Some(remote) = &remote {
            store = store.with_remote(Box::new(remote.clone()));
        }

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(
            GameConfig::load(),
            css_w as f32,
            css_h as f32,
            seed,
            Box::new(store),
        );
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(js_err)?;

        let clock = FrameClock::for_config(&game.world().config);
        let app = Rc::new(RefCell::new(App {
            game,
            render_state: Some(render_state),
            canvas: canvas.clone(),
            clock,
            shown: None,
        }));

        if let Some(remote) = remote {
            let app = app.clone();
            remote.prefetch(move |result| match result {
                Ok(best) => {
                    log::info!("Remote high score: {}", best);
                    app.borrow_mut().game.refresh_high_score();
                }
                Err(e) => log::warn!("Remote high score unavailable: {}", e),
            });
        }

        setup_input_handlers(&canvas, app.clone());
        setup_buttons(app.clone());
        setup_resize(app.clone());

        let handle = LoopHandle::new();
        setup_teardown(handle.clone());
        request_animation_frame(app, handle);

        log::info!("Aerobot running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse: flip while playing
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                if a.game.phase() == GamePhase::Playing {
                    event.prevent_default();
                    a.game.flip();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: same, and keep the browser from synthesizing a mouse event
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut a = app.borrow_mut();
                if a.game.phase() == GamePhase::Playing {
                    event.prevent_default();
                    a.game.flip();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        event.prevent_default();
                        if !a.game.start_or_restart() {
                            a.game.flip();
                        }
                    }
                    "i" | "I" => a.game.toggle_autopilot(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            app.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop the frame loop when the page goes away
    fn setup_teardown(handle: LoopHandle) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            handle.cancel();
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>, handle: LoopHandle) {
        if handle.is_cancelled() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let in_loop = handle.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, in_loop, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => handle.set_pending_frame(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, handle: LoopHandle, time: f64) {
        if handle.is_cancelled() {
            return;
        }
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app, handle);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Aerobot (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve`; running a headless demo");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autopilot demo of the full lifecycle on a fixed 60 Hz clock
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use aerobot::persistence::{FileStore, HighScoreService, HttpRemote, LocalStore, MemoryStore};
    use aerobot::platform::FrameClock;
    use aerobot::sim::{GameEvent, GamePhase};
    use aerobot::{Game, GameConfig};

    const RUNS: u32 = 3;
    /// Cap per run so a perfect pilot still terminates
    const MAX_RUN_SECONDS: u32 = 120;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Portrait phone-sized play area
    const AREA: (f32, f32) = (390.0, 844.0);

    fn store() -> HighScoreService {
        let local: Box<dyn LocalStore> = match FileStore::default_location() {
            Some(file) => {
                log::info!("High score file: {}", file.path().display());
                Box::new(file)
            }
            None => {
                log::warn!("No data directory; high score kept in memory");
                Box::new(MemoryStore::new())
            }
        };
        let service = HighScoreService::new(local);
        match HttpRemote::from_env() {
            Some(remote) => {
                log::info!("Syncing high scores with {}", remote.url());
                service.with_remote(Box::new(remote))
            }
            None => service,
        }
    }

    pub fn run() {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let mut game = Game::new(GameConfig::load(), AREA.0, AREA.1, seed, Box::new(store()));
        game.set_autopilot(true);
        println!("Best so far: {}m", game.high_score());

        let mut clock = FrameClock::for_config(&game.world().config);
        let mut now = 0.0;

        for run in 1..=RUNS {
            let started = if run == 1 { game.start() } else { game.restart() };
            if !started {
                log::error!("Could not begin run {} from {:?}", run, game.phase());
                break;
            }

            let mut outcome = None;
            for _ in 0..MAX_RUN_SECONDS * 60 {
                now += FRAME_MS;
                for event in game.frame(clock.delta(now)) {
                    if let GameEvent::GameOver { cause, score } = event {
                        outcome = Some((cause, score));
                    }
                }
                if game.phase() == GamePhase::GameOver {
                    break;
                }
            }

            let hud = game.hud();
            match outcome {
                Some((cause, _)) => println!(
                    "Run {}: {} ({:?}), best {}{}",
                    run,
                    hud.score_text(),
                    cause,
                    hud.best_text(),
                    if hud.new_record { ", new record!" } else { "" }
                ),
                None => {
                    println!("Run {}: survived {}s at {}", run, MAX_RUN_SECONDS, hud.score_text());
                    // Only a game over may restart; end the session here
                    break;
                }
            }
        }

        game.shutdown();
    }
}
