//! Phish Doors entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use glam::Vec2;
    use phish_doors::audio::AudioOutput;
    use phish_doors::renderer::{RenderState, SceneMesh};
    use phish_doors::sim::{
        AvatarState, DoorChosen, DoorId, DoorSet, FrameSnapshot, InputState, step,
    };
    use phish_doors::{GamePhase, LevelCatalog, Session, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session,
        catalog: LevelCatalog,
        doors: DoorSet,
        avatar: AvatarState,
        input: InputState,
        settings: Settings,
        render_state: Option<RenderState>,
        audio: Option<AudioOutput>,
        last_time: f64,
        /// Phase and level the DOM currently shows
        shown: Option<(GamePhase, usize)>,
        /// Set on page teardown; no frame runs afterwards
        stopped: bool,
    }

    impl Game {
        fn new(catalog: LevelCatalog, settings: Settings) -> Self {
            let mut session = Session::new();
            session.start();
            Self {
                session,
                catalog,
                doors: DoorSet::standard(),
                avatar: AvatarState::spawn(),
                input: InputState::default(),
                settings,
                render_state: None,
                audio: None,
                last_time: 0.0,
                shown: None,
                stopped: false,
            }
        }

        /// One simulation step plus phase bookkeeping
        fn update(&mut self, dt_ms: f32) {
            let flags = self.session.frame_flags();
            let frame = FrameSnapshot {
                input: &self.input,
                falling: flags.falling,
                reset: flags.reset,
                movement_enabled: flags.movement_enabled,
            };
            let out = step(&self.avatar, &frame, &self.doors);
            self.avatar = out.avatar;

            if out.reset_acknowledged {
                self.session.reset_consumed();
            }
            if let Some(DoorChosen(door)) = out.event {
                let cues = self.session.on_door_chosen(door, &self.catalog);
                if let Some(audio) = &self.audio {
                    for cue in cues {
                        audio.play(cue);
                    }
                }
            }
            self.session.advance(dt_ms);
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.avatar, &self.settings) {
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

        /// Overlay buttons / Enter key
        fn confirm(&mut self) {
            match self.session.phase() {
                GamePhase::LevelSuccess => self.session.next_level(),
                GamePhase::ExplainingFailure => self.session.respawn(),
                GamePhase::Victory => self.session.replay(),
                GamePhase::Idle => self.session.start(),
                GamePhase::Playing => {}
            }
        }

        /// Release renderer and audio; stop the loop
        fn shutdown(&mut self) {
            if self.stopped {
                return;
            }
            self.stopped = true;
            self.render_state = None;
            self.audio = None;
            log::info!("Game stopped");
        }

        /// Sync DOM screens with the session (only on change)
        fn update_hud(&mut self, document: &Document) {
            let phase = self.session.phase();
            let level_index = self.session.level_index();
            if self.shown == Some((phase, level_index)) {
                return;
            }
            self.shown = Some((phase, level_index));

            set_visible(document, "hud", phase == GamePhase::Playing);
            set_visible(document, "explanation", phase == GamePhase::ExplainingFailure);
            set_visible(document, "success", phase == GamePhase::LevelSuccess);
            set_visible(document, "victory", phase == GamePhase::Victory);

            let total = self.catalog.len();
            let Some(level) = self.catalog.get(level_index) else {
                return;
            };

            set_text(document, "hud-level", &format!("{}/{}", level_index + 1, total));
            set_text(document, "hud-title", &level.title);
            set_text(document, "hud-scenario", &level.scenario);
            for door in DoorId::ALL {
                let id = format!("door-label-{}", door.as_str().to_lowercase());
                set_text(document, &id, level.doors.get(door));
            }

            if phase == GamePhase::ExplainingFailure {
                let exp = &level.explanation;
                set_text(document, "explanation-title", &exp.title);
                set_text(document, "explanation-description", &exp.description);
                set_text(document, "explanation-tip", &exp.tip);
                if let Some(list) = document.get_element_by_id("explanation-flags") {
                    list.set_text_content(None);
                    for flag in exp.red_flags() {
                        if let Some(item) = red_flag_item(document, flag.title, flag.detail) {
                            let _ = list.append_child(&item);
                        }
                    }
                }
            }

            if phase == GamePhase::Victory {
                set_text(document, "final-levels", &total.to_string());
                set_text(
                    document,
                    "final-blocked",
                    &self.session.attempts_blocked().to_string(),
                );
                set_text(
                    document,
                    "final-score",
                    &format!("{}%", self.session.security_score(total)),
                );
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if visible {
                el.class_list().remove_1("hidden")
            } else {
                el.class_list().add_1("hidden")
            };
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn red_flag_item(document: &Document, title: &str, detail: &str) -> Option<Element> {
        let item = document.create_element("li").ok()?;
        let head = document.create_element("strong").ok()?;
        head.set_text_content(Some(title));
        item.append_child(&head).ok()?;
        if !detail.is_empty() {
            let body = document.create_element("span").ok()?;
            body.set_text_content(Some(detail));
            item.append_child(&body).ok()?;
        }
        Some(item)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            web_sys::console::error_1(&"no canvas element".into());
            return;
        };

        let settings =
            Settings::from_json_or_default(canvas.get_attribute("data-settings").as_deref());
        if let Some(level) = settings.log_level().to_level() {
            let _ = console_log::init_with_level(level);
        }
        log::info!("Phish Doors starting...");

        let catalog = match LevelCatalog::builtin() {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }
        if settings.always_show_joystick {
            if let Some(el) = document.get_element_by_id("joystick-wrap") {
                let _ = el.class_list().add_1("force");
            }
        }

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = settings
            .decoration_seed
            .unwrap_or_else(|| js_sys::Date::now() as u64);
        let scene = SceneMesh::new(&DoorSet::standard(), settings.hex_tiles, seed);

        let audio = AudioOutput::new(&settings);
        let game = Rc::new(RefCell::new(Game::new(catalog, settings)));
        game.borrow_mut().audio = Some(audio);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
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
                log::error!("No graphics adapter: {}", e);
                return;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, scene).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_keyboard(game.clone());
        setup_joystick(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_window_events(&canvas, game.clone());

        request_animation_frame(game);
        log::info!("Phish Doors running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(audio) = &g.audio {
                    audio.resume();
                }
                let key = event.key();
                if g.input.handle_key(&key, true) {
                    event.prevent_default();
                } else if key == "Enter" {
                    g.confirm();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.handle_key(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Touch position relative to the pad center, in pad radii
    fn pad_delta(pad: &Element, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.touches().get(0)?;
        let rect = pad.get_bounding_client_rect();
        let half_w = (rect.width() / 2.0) as f32;
        let half_h = (rect.height() / 2.0) as f32;
        if half_w <= 0.0 || half_h <= 0.0 {
            return None;
        }
        let cx = rect.left() as f32 + half_w;
        let cy = rect.top() as f32 + half_h;
        Some(Vec2::new(
            (touch.client_x() as f32 - cx) / half_w,
            (touch.client_y() as f32 - cy) / half_h,
        ))
    }

    fn setup_joystick(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(pad) = document.get_element_by_id("joystick") else {
            log::warn!("No joystick element; touch movement disabled");
            return;
        };

        for event_name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let pad_clone = pad.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if event_name == "touchstart" {
                    if let Some(audio) = &g.audio {
                        audio.resume();
                    }
                } else if !g.input.joystick.active {
                    return;
                }
                if let Some(delta) = pad_delta(&pad_clone, &event) {
                    g.input.joystick_move(delta);
                }
            });
            let _ = pad.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for event_name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.joystick_release();
            });
            let _ = pad.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["respawn-btn", "continue-btn", "replay-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().confirm();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_events(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Resize
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let dpr = window.device_pixel_ratio();
                let width = (canvas.client_width() as f64 * dpr) as u32;
                let height = (canvas.client_height() as f64 * dpr) as u32;
                canvas.set_width(width);
                canvas.set_height(height);
                if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                    render_state.resize(width, height);
                }
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Blur: drop held keys so the avatar does not keep walking
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Teardown
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().shutdown();
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.stopped {
                return;
            }

            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt_ms);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
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
    env_logger::init();
    log::info!("Phish Doors (native) starting...");
    log::info!("The game renders in the browser - run with `trunk serve` for the web version");

    if let Err(e) = headless_walkthrough() {
        log::error!("Walkthrough failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Walk every level to its correct door without rendering
#[cfg(not(target_arch = "wasm32"))]
fn headless_walkthrough() -> Result<(), phish_doors::LevelError> {
    use phish_doors::sim::{
        AvatarState, DoorChosen, DoorSet, FrameSnapshot, InputState, MoveKey, step,
    };
    use phish_doors::{GamePhase, LevelCatalog, Session};

    const MAX_FRAMES: u32 = 20_000;
    const FRAME_MS: f32 = 1000.0 / 60.0;

    let catalog = LevelCatalog::builtin()?;
    let doors = DoorSet::standard();
    let mut session = Session::new();
    let mut avatar = AvatarState::spawn();
    let mut input = InputState::default();
    session.start();

    for frame_no in 0..MAX_FRAMES {
        match session.phase() {
            GamePhase::Victory => {
                println!(
                    "Victory after {} frames, score {}%",
                    frame_no,
                    session.security_score(catalog.len())
                );
                return Ok(());
            }
            GamePhase::LevelSuccess => session.next_level(),
            GamePhase::ExplainingFailure => session.respawn(),
            GamePhase::Playing | GamePhase::Idle => {}
        }

        // Line up with the correct door first, then walk straight in
        input.clear();
        if let Some(level) = catalog.get(session.level_index()) {
            let target_x = doors.get(level.correct_door).x;
            let dx = target_x - avatar.position.x;
            if dx.abs() > 0.2 {
                input.set_key(if dx > 0.0 { MoveKey::Right } else { MoveKey::Left }, true);
            } else {
                input.set_key(MoveKey::Forward, true);
            }
        }

        let flags = session.frame_flags();
        let frame = FrameSnapshot {
            input: &input,
            falling: flags.falling,
            reset: flags.reset,
            movement_enabled: flags.movement_enabled,
        };
        let out = step(&avatar, &frame, &doors);
        avatar = out.avatar;
        if out.reset_acknowledged {
            session.reset_consumed();
        }
        if let Some(DoorChosen(door)) = out.event {
            println!("Level {}: door {}", session.level_index() + 1, door);
            session.on_door_chosen(door, &catalog);
        }
        session.advance(FRAME_MS);
    }

    println!("Walkthrough did not finish in {} frames", MAX_FRAMES);
    Ok(())
}
