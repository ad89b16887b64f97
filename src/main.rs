//! Fire Flap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent};

    use fire_flap::renderer::{RenderError, SpriteId, SpriteRenderer};
    use fire_flap::sim::GameEvent;
    use fire_flap::{Engine, Phase, Settings, Tuning, TuningError};

    /// Game instance holding all state
    struct Game {
        engine: Engine,
        renderer: Option<SpriteRenderer>,
        /// Pending requestAnimationFrame callback, if any
        frame_handle: Option<i32>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Result<Self, TuningError> {
            Ok(Self {
                engine: Engine::new(seed, Tuning::default(), settings)?,
                renderer: None,
                frame_handle: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            })
        }

        /// Tick and draw one frame
        fn step(&mut self) -> Vec<GameEvent> {
            match self.renderer.as_mut() {
                Some(renderer) => self.engine.advance(renderer),
                None => Vec::new(),
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Oldest sample sits at the next write position
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59_000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Stop the loop; the next start/restart schedules a fresh one
        fn cancel_frame(&mut self) {
            if let Some(handle) = self.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
        }

        fn toggle_setting(&mut self, key: &str) {
            let mut settings = self.engine.settings().clone();
            match key {
                "s" => settings.screen_shake = !settings.screen_shake,
                "p" => settings.particles = !settings.particles,
                "f" => settings.show_fps = !settings.show_fps,
                _ => return,
            }
            settings.save();
            self.engine.set_settings(settings);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.engine.score().to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.engine.settings().show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            set_visible(document, "start-screen", self.engine.phase() == Phase::Idle);
            set_visible(document, "game-over", self.engine.phase() == Phase::Over);
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&self.engine.score().to_string()));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn js_error(e: RenderError) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Fire Flap starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, Settings::load())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let game = Rc::new(RefCell::new(game));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| js_error(e.into()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| js_error(e.into()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut renderer = SpriteRenderer::new(surface, &adapter, width, height)
            .await
            .map_err(js_error)?;

        // Images decode in the background; the renderer picks them up once complete
        for sprite in SpriteId::ALL {
            let image = HtmlImageElement::new()?;
            image.set_src(sprite.path());
            renderer.load_image(sprite, image);
        }
        game.borrow_mut().renderer = Some(renderer);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_teardown(game.clone());

        game.borrow().update_hud(&document);
        set_visible(&document, "hud", true);

        log::info!("Fire Flap ready!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click - flap
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().engine.request_jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - flap
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().engine.request_jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        // Keep the page from scrolling
                        event.prevent_default();
                        g.engine.request_jump();
                    }
                    "i" | "I" => {
                        let enabled = !g.engine.autopilot();
                        g.engine.set_autopilot(enabled);
                    }
                    key @ ("s" | "p" | "f") => g.toggle_setting(key),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if game.borrow_mut().engine.start() {
                    request_animation_frame(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if game.borrow_mut().engine.restart() {
                    request_animation_frame(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Cancel the pending frame when the page goes away
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().cancel_frame();
            log::info!("Page hidden, frame loop stopped");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        // One loop at a time
        game.borrow_mut().cancel_frame();

        let slot = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let handle = match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => {
                closure.forget();
                Some(handle)
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        };
        slot.borrow_mut().frame_handle = handle;
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            g.track_fps(time);

            let events = g.step();
            if events.contains(&GameEvent::GameOver) {
                g.cancel_frame();
            }

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
            g.engine.is_playing()
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Fire Flap failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fire Flap (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    let tuning = match std::env::var("FIRE_FLAP_TUNING") {
        Ok(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Could not load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(_) => fire_flap::Tuning::default(),
    };

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);

    run_autopilot(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<fire_flap::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(fire_flap::Tuning::from_json(&json)?)
}

/// Let the bot play one headless run and report how it went
#[cfg(not(target_arch = "wasm32"))]
fn run_autopilot(seed: u64, tuning: fire_flap::Tuning) {
    use fire_flap::renderer::{AssetStatus, Headless};
    use fire_flap::sim::GameEvent;
    use fire_flap::{Engine, Settings};

    // About five minutes of play at 60 Hz
    const MAX_TICKS: u64 = 18_000;

    let mut engine = match Engine::new(seed, tuning, Settings::default()) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            std::process::exit(1);
        }
    };
    let mut surface = Headless::new(AssetStatus::READY);
    engine.set_autopilot(true);
    engine.start();

    while engine.is_playing() && engine.state().frame_count < MAX_TICKS {
        for event in engine.advance(&mut surface) {
            if let GameEvent::ScoreChanged(score) = event {
                log::debug!("Passed obstacle #{}", score);
            }
        }
    }

    log::info!(
        "Autopilot finished: score {} after {} ticks ({:?})",
        engine.score(),
        engine.state().frame_count,
        engine.phase()
    );
    println!("score: {}", engine.score());
}
