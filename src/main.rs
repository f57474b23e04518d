//! Warrior Arena entry point
//!
//! The browser build wires the canvas, DOM HUD, audio elements, keyboard and
//! buttons to a `Game` and runs it from `requestAnimationFrame`. The native
//! build plays a headless scripted run and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlProgressElement, Response};

    use warrior_arena::assets::{self, AssetManifest, Assets};
    use warrior_arena::audio::{AudioManager, HtmlAudioBackend};
    use warrior_arena::consts::*;
    use warrior_arena::hud::{self, Hud, Screen};
    use warrior_arena::renderer::{RenderState, build_scene};
    use warrior_arena::sim::Direction;
    use warrior_arena::{AssetError, Game, Settings, seconds_to_ticks};

    /// Loading screen stays up this long after the last asset
    const LOADING_GRACE_SECS: f32 = 0.5;

    const OVERLAYS: [&str; 4] = [
        "loadingScreen",
        "gameMenu",
        "gameOverScreen",
        "levelCompleteScreen",
    ];

    /// HUD backed by the page's DOM elements
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_selector_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", !visible);
            }
        }
    }

    impl Hud for DomHud {
        fn set_health(&mut self, fraction: f32) {
            if let Some(el) = self
                .document
                .get_element_by_id("healthFill")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = el.style().set_property("width", &hud::health_width(fraction));
            }
        }

        fn set_score(&mut self, score: u64) {
            self.set_text("score", &hud::score_text(score));
        }

        fn set_level(&mut self, level: usize) {
            self.set_text("level", &hud::level_text(level));
        }

        fn set_treasures(&mut self, collected: u32, required: u32) {
            self.set_text("treasureCount", &hud::treasure_text(collected, required));
        }

        fn set_loading_progress(&mut self, percent: u32) {
            if let Some(el) = self
                .document
                .get_element_by_id("loadingProgress")
                .and_then(|el| el.dyn_into::<HtmlProgressElement>().ok())
            {
                el.set_value(percent as f64);
            }
            self.set_text("loadingText", &hud::loading_text(percent));
        }

        fn show_screen(&mut self, screen: Screen) {
            let visible = match screen {
                Screen::Loading => Some("loadingScreen"),
                Screen::Menu => Some("gameMenu"),
                Screen::Playing => None,
                Screen::GameOver { score, outcome } => {
                    let (title, body) = hud::game_over_text(score, outcome);
                    self.set_selector_text("#gameOverScreen h2", title);
                    self.set_selector_text("#gameOverScreen p", &body);
                    Some("gameOverScreen")
                }
                Screen::LevelComplete { next_level } => {
                    self.set_selector_text(
                        "#levelCompleteScreen p",
                        &hud::level_complete_text(next_level),
                    );
                    Some("levelCompleteScreen")
                }
            };
            for id in OVERLAYS {
                self.set_visible(id, visible == Some(id));
            }
        }
    }

    /// Everything the frame loop touches
    struct App {
        game: Game<DomHud>,
        render_state: Option<RenderState>,
        assets: Assets,
        last_time: f64,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.game.update(dt);
            self.render();
        }

        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(self.game.state(), &self.assets, self.game.settings());
            match render_state.render(&vertices) {
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
    }

    async fn fetch_bytes(path: &str) -> Result<Vec<u8>, AssetError> {
        let fetch_err = |reason: String| AssetError::Fetch {
            path: path.to_string(),
            reason,
        };
        let window = web_sys::window().ok_or_else(|| fetch_err("no window".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_str(path))
            .await
            .and_then(|r| r.dyn_into())
            .map_err(|e| fetch_err(format!("{e:?}")))?;
        if !response.ok() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }
        let buffer = response
            .array_buffer()
            .map_err(|e| fetch_err(format!("{e:?}")))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|e| fetch_err(format!("{e:?}")))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }

    /// Fetch and decode every manifest entry, updating the loading screen
    async fn load_assets(app: Rc<RefCell<App>>, manifest: AssetManifest) {
        for (slot, path) in manifest.entries() {
            let result = match fetch_bytes(&path).await {
                Ok(bytes) => assets::decode_image(&slot.name(), &bytes),
                Err(e) => Err(e),
            };
            let mut a = app.borrow_mut();
            if let Err(e) = a.assets.record(slot, &path, result) {
                log::warn!("{}", e);
            }
            let percent = a.assets.progress_percent();
            a.game.set_loading_progress(percent);
        }

        let mut a = app.borrow_mut();
        log::info!(
            "Assets loaded: {}/{}",
            a.assets.loaded(),
            a.assets.total()
        );
        a.game.finish_loading(seconds_to_ticks(LOADING_GRACE_SECS));
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Warrior Arena starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width().max(1) as f64) * dpr) as u32;
        let height = ((canvas.client_height().max(1) as f64) * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let backend = match HtmlAudioBackend::from_document(&document) {
            Ok(b) => Some(Box::new(b) as Box<dyn warrior_arena::audio::AudioBackend>),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        };
        let audio = AudioManager::new(backend);

        let manifest = AssetManifest::default();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed, DomHud { document: document.clone() }, audio, settings),
            render_state: None,
            assets: Assets::new(&manifest),
            last_time: 0.0,
        }));

        setup_input_handlers(app.clone());
        setup_buttons(&document, app.clone());
        request_animation_frame(app.clone());

        // Initialize WebGPU, falling back to WebGL
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(rs) => app.borrow_mut().render_state = Some(rs),
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        load_assets(app, manifest).await;
        log::info!("Warrior Arena running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        // Key down: arrows move, M toggles sound
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                let mut a = app.borrow_mut();
                if let Some(dir) = Direction::from_key(&key) {
                    event.prevent_default();
                    a.game.press(dir);
                } else if key == "m" || key == "M" {
                    let on = a.game.toggle_sound();
                    a.game.settings().save();
                    log::info!("Sound {}", if on { "on" } else { "off" });
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(dir) = Direction::from_key(&event.key()) {
                    app.borrow_mut().game.release(dir);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("startButton") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().game.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restartButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().game.restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
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
        // Skip the frame if an async loader holds the borrow
        if let Ok(mut a) = app.try_borrow_mut() {
            a.frame(time);
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Warrior Arena (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the playable web version");

    autoplay::run();
}

/// Headless demo: a greedy bot plays one run
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use glam::Vec2;

    use warrior_arena::assets::{self, AssetManifest};
    use warrior_arena::audio::AudioManager;
    use warrior_arena::consts::*;
    use warrior_arena::hud::LogHud;
    use warrior_arena::sim::{Direction, GamePhase, GameState};
    use warrior_arena::{Game, Settings};

    /// Give up after two simulated minutes
    const MAX_TICKS: u32 = 120 * TICK_RATE;

    /// Where the bot wants to go: nearest treasure, then the door
    fn target(state: &GameState) -> Vec2 {
        let me = state.player.bounds().center();
        state
            .treasures
            .iter()
            .filter(|t| !t.collected)
            .map(|t| t.bounds().center())
            .min_by(|a, b| a.distance(me).total_cmp(&b.distance(me)))
            .unwrap_or_else(|| state.door.bounds().center())
    }

    fn steer(game: &mut Game<LogHud>) {
        let state = game.state();
        let delta = target(state) - state.player.bounds().center();

        // Releasing either key of an axis stops that axis
        if delta.x.abs() > 2.0 {
            game.press(if delta.x > 0.0 { Direction::Right } else { Direction::Left });
        } else {
            game.release(Direction::Left);
        }
        if delta.y.abs() > 2.0 {
            game.press(if delta.y > 0.0 { Direction::Down } else { Direction::Up });
        } else {
            game.release(Direction::Up);
        }
    }

    pub fn run() {
        let settings = Settings::load();
        let manifest = AssetManifest::default();
        let loaded = assets::load_from_dir(&manifest, std::path::Path::new("."));

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut game = Game::new(seed, LogHud::default(), AudioManager::silent(), settings);
        game.set_loading_progress(loaded.progress_percent());
        game.finish_loading(0);
        game.start();

        let mut ticks = 0;
        while ticks < MAX_TICKS {
            if game.state().phase == GamePhase::Playing {
                steer(&mut game);
            }
            game.run_ticks(1);
            ticks += 1;
            if matches!(game.state().phase, GamePhase::GameOver(_)) {
                break;
            }
        }

        let state = game.state();
        log::info!(
            "Run finished after {:.1}s: {:?}, level {}, score {}, health {}",
            ticks as f32 / TICK_RATE as f32,
            state.phase,
            state.level + 1,
            state.player.score,
            state.player.health
        );
    }
}
