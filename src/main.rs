//! Block Rain entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlImageElement};

    use block_rain::Settings;
    use block_rain::audio::{AudioManager, SoundEffect};
    use block_rain::renderer::{RenderState, SpriteKind};
    use block_rain::sim::{GameEvent, GamePhase, GameState, InputState, advance};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        input: InputState,
        /// Space key held; suppresses auto-repeat so one press fires once
        space_held: bool,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, settings: &Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            Self {
                state: GameState::new(seed),
                render_state: None,
                audio,
                input: InputState::default(),
                space_held: false,
                last_time: 0.0,
            }
        }

        /// Run one simulation update and dispatch its side effects
        fn update(&mut self, dt_ms: f64) {
            advance(&mut self.state, &self.input, dt_ms);
            // Clear one-shot inputs after processing
            self.input.fire = false;

            for event in self.state.take_events() {
                match event {
                    GameEvent::ProjectileFired => self.audio.play(SoundEffect::Shoot),
                    GameEvent::BlockDestroyed => self.audio.play(SoundEffect::Collision),
                    GameEvent::LifeLost { .. } => self.audio.play(SoundEffect::Collision),
                    GameEvent::GameOver => self.audio.play(SoundEffect::GameOver),
                    GameEvent::LevelUp { level } => log::info!("Level up: {level}"),
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, time) {
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.get_element_by_id("scoreValue") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("livesValue") {
                el.set_text_content(Some(&self.state.lives.to_string()));
            }
            if let Some(el) = document.get_element_by_id("levelValue") {
                el.set_text_content(Some(&self.state.level.to_string()));
            }

            // Show/hide game over screen
            if let Some(el) = document.get_element_by_id("gameOver") {
                if self.state.phase == GamePhase::GameOver {
                    if let Some(score_el) = document.get_element_by_id("finalScore") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                    if let Some(level_el) = document.get_element_by_id("finalLevel") {
                        level_el.set_text_content(Some(&self.state.level.to_string()));
                    }
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Block Rain starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Size the canvas to its CSS box in device pixels
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, &settings)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU (WebGL fallback for browsers without WebGPU)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                fatal_init_error(&window, &format!("Unable to create drawing surface: {e}"));
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                fatal_init_error(
                    &window,
                    &format!("Unable to initialize graphics. Your browser may not support WebGPU or WebGL: {e}"),
                );
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        // Sprite images load in the background; placeholders draw until then
        load_sprite(game.clone(), "textures/player.png", SpriteKind::Player);
        load_sprite(game.clone(), "textures/block.png", SpriteKind::Block);
        load_sprite(game.clone(), "textures/projectile.png", SpriteKind::Projectile);

        setup_input_handlers(game.clone());
        setup_restart_button(&document, game.clone());
        setup_resize_handler(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Block Rain running!");
    }

    /// Report an unrecoverable init failure and stop
    fn fatal_init_error(window: &web_sys::Window, message: &str) {
        log::error!("{message}");
        let _ = window.alert_with_message(message);
    }

    /// Fetch a sprite image and upload its pixels once decoded. A failed
    /// load leaves the placeholder in place; there is no retry.
    fn load_sprite(game: Rc<RefCell<Game>>, url: &str, kind: SpriteKind) {
        let Ok(image) = HtmlImageElement::new() else {
            return;
        };
        let url_for_log = url.to_string();
        let image_for_load = image.clone();

        let onload = Closure::<dyn FnMut()>::new(move || {
            let width = image_for_load.natural_width();
            let height = image_for_load.natural_height();
            match decode_image_rgba(&image_for_load, width, height) {
                Some(pixels) => {
                    if let Some(rs) = game.borrow_mut().render_state.as_mut() {
                        rs.upload_sprite(kind, width, height, &pixels);
                        log::info!("Loaded sprite {url_for_log} ({width}x{height})");
                    }
                }
                None => log::warn!("Failed to decode sprite {url_for_log}; keeping placeholder"),
            }
        });
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        image.set_src(url);
    }

    /// Decode an image element to raw RGBA via an offscreen 2D canvas
    fn decode_image_rgba(image: &HtmlImageElement, width: u32, height: u32) -> Option<Vec<u8>> {
        if width == 0 || height == 0 {
            return None;
        }
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: web_sys::CanvasRenderingContext2d =
            canvas.get_context("2d").ok()??.dyn_into().ok()?;
        ctx.draw_image_with_html_image_element(image, 0.0, 0.0)
            .ok()?;

        let data = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .ok()?;
        Some(data.data().0)
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "Space" => {
                        if !g.space_held {
                            g.space_held = true;
                            g.input.fire = true;
                        }
                    }
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    "Space" => g.space_held = false,
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restartButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().state.restart();
                log::info!("Game restarted");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Keep the surface matched to the canvas whenever the window resizes
    fn setup_resize_handler(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();
            let Some(canvas) = document.get_element_by_id("gameCanvas") else {
                return;
            };
            let Ok(canvas) = canvas.dyn_into::<HtmlCanvasElement>() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(rs) = game.borrow_mut().render_state.as_mut() {
                rs.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                16.0
            };
            g.last_time = time;

            g.update(dt_ms);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use block_rain::sim::{GameEvent, GamePhase, GameState, InputState, advance};

    env_logger::init();
    log::info!("Block Rain (native) starting...");
    log::info!("Native mode is headless - run the web build for the playable game");

    // Headless smoke run: fire every quarter second while sweeping the
    // paddle back and forth, and report how the session went.
    let mut state = GameState::new(0xB10C_0001);
    let mut destroyed = 0u32;
    let dt_ms = 16.0;

    for frame in 0u64..200_000 {
        if state.phase == GamePhase::GameOver {
            break;
        }
        let input = InputState {
            left: (frame / 120) % 2 == 1,
            right: (frame / 120) % 2 == 0,
            fire: frame % 15 == 0,
        };
        advance(&mut state, &input, dt_ms);
        destroyed += state
            .take_events()
            .iter()
            .filter(|e| **e == GameEvent::BlockDestroyed)
            .count() as u32;
    }

    println!(
        "Game over: score {}, level {}, {} blocks destroyed",
        state.score, state.level, destroyed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
