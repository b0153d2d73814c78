//! Neon Drift entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{DeviceOrientationEvent, Document, Element, HtmlElement, MouseEvent, TouchEvent};

    use neon_drift::sim::{
        GameEvent, GamePhase, LaneInput, Orientation, SessionConfig, ShakeStrength, VehicleProfile,
    };
    use neon_drift::{Session, SessionHooks, Settings, Vocabulary};

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_class(id: &str, class: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", class);
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn html_element(id: &str) -> Option<HtmlElement> {
        document()?.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Place an element's center at a normalized screen point
    fn place(id: &str, pos: Vec2) {
        if let Some(el) = html_element(id) {
            let style = el.style();
            let _ = style.set_property("left", &format!("{:.2}%", pos.x * 100.0));
            let _ = style.set_property("top", &format!("{:.2}%", pos.y * 100.0));
        }
    }

    /// DOM side of the session callbacks
    struct DomHooks {
        settings: Settings,
    }

    impl SessionHooks for DomHooks {
        fn on_game_end(&mut self, final_score: u64) {
            set_text("final-score", &final_score.to_string());
            set_class("game-over", "");
        }

        fn on_round_complete(&mut self, round_id: &str) {
            set_text("round-id", round_id);
            set_class("round-complete", "");
        }

        fn on_pause(&mut self) {
            set_class("pause-menu", "");
        }

        fn on_speed_change(&mut self, speed: f32) {
            if let Some(road) = html_element("road") {
                let _ = road
                    .style()
                    .set_property("--road-speed", &format!("{:.3}", speed));
            }
        }

        fn on_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::QuestionActivated { prompt, .. } => set_text("question-prompt", prompt),
                GameEvent::Resumed => set_class("pause-menu", "hidden"),
                GameEvent::RunStarted => set_class("countdown", "hidden"),
                GameEvent::Shake(strength) if self.settings.effective_screen_shake() => {
                    let class = match strength {
                        ShakeStrength::Mild => "shake-mild",
                        ShakeStrength::Strong => "shake-strong",
                    };
                    set_class("game", class);
                }
                GameEvent::Particles { correct } if self.settings.effective_particles() => {
                    set_class("burst", if *correct { "burst correct" } else { "burst wrong" });
                }
                _ => {}
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session<DomHooks>,
        vocab: Vocabulary,
        config: SessionConfig,
        settings: Settings,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(config: SessionConfig, vocab: Vocabulary, settings: Settings) -> Self {
            let hooks = DomHooks {
                settings: settings.clone(),
            };
            Self {
                session: Session::new(config.clone(), &vocab, hooks),
                vocab,
                config,
                settings,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            self.session.advance(dt);

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

        /// Update HUD and moving elements in DOM
        fn update_hud(&self) {
            let state = self.session.state();

            set_text("hud-score", &state.score.to_string());
            set_text("hud-health", &"♥".repeat(state.health as usize));
            set_text("hud-level", &state.car_level.to_string());
            set_text("hud-progress", &format!(
                "{}/{}",
                state.questions_answered,
                neon_drift::consts::ROUND_QUESTION_COUNT
            ));
            if self.settings.show_fps {
                set_text("hud-fps", &self.fps.to_string());
            }

            // Combo only shows from 2 upward
            if state.combo > 1 {
                set_text("hud-combo", &format!("x{}", state.combo));
                set_class("hud-combo", "hud-item pop");
            } else {
                set_class("hud-combo", "hud-item hidden");
            }

            set_class(
                "countdown",
                if state.phase == GamePhase::Countdown { "" } else { "hidden" },
            );
            if state.phase == GamePhase::Countdown {
                let remaining = state.countdown_until.saturating_sub(state.time_ticks);
                let secs = remaining.div_ceil(neon_drift::consts::SIM_HZ as u64);
                set_text("countdown", &secs.to_string());
            }

            if !state.is_question_active() {
                set_text("question-prompt", "");
            }

            place("player", state.player_screen_pos());
            for i in 0..2 {
                let id = format!("box-{}", i);
                match state.answer_boxes().get(i) {
                    Some(answer) => {
                        set_text(&id, &answer.text);
                        set_class(&id, "answer-box");
                        place(&id, state.box_screen_pos(answer));
                        if let Some(el) = html_element(&id) {
                            let _ = el.style().set_property("border-color", answer.color.css());
                        }
                    }
                    None => set_class(&id, "answer-box hidden"),
                }
            }
        }

        /// Start a fresh session with the same chapter and round
        fn restart(&mut self, seed: u64) {
            self.session.teardown();
            self.config.seed = seed;
            let hooks = DomHooks {
                settings: self.settings.clone(),
            };
            self.session = Session::new(self.config.clone(), &self.vocab, hooks);
            for id in ["game-over", "round-complete", "pause-menu"] {
                set_class(id, "hidden");
            }
            self.session.start();
        }
    }

    /// Chapter/round/orientation from the page URL and device
    fn session_config(settings: &Settings, seed: u64) -> SessionConfig {
        let window = web_sys::window().expect("no window");
        let params = window
            .location()
            .search()
            .ok()
            .and_then(|s| web_sys::UrlSearchParams::new_with_str(&s).ok());
        let param = |name: &str| params.as_ref().and_then(|p| p.get(name));

        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        let touch = window.navigator().max_touch_points() > 0;
        let orientation = settings.layout.resolve(Orientation::detect(width, height, touch));

        // Car stats come from the selection screen; display only
        let base = VehicleProfile::default();
        let stat = |name: &str, default: f32| {
            param(name).and_then(|v| v.parse().ok()).unwrap_or(default)
        };
        let vehicle = VehicleProfile {
            speed: stat("speed", base.speed),
            handling: stat("handling", base.handling),
            shield: stat("shield", base.shield),
        };

        SessionConfig {
            seed,
            chapter_id: param("chapter")
                .unwrap_or_else(|| neon_drift::vocab::DEFAULT_CHAPTER.into()),
            round_id: param("round"),
            orientation,
            vehicle,
        }
    }

    /// Normalized point inside the game element
    fn normalized_point(game_el: &Element, client_x: f32, client_y: f32) -> Vec2 {
        let rect = game_el.get_bounding_client_rect();
        let w = (rect.width() as f32).max(1.0);
        let h = (rect.height() as f32).max(1.0);
        Vec2::new(
            (client_x - rect.left() as f32) / w,
            (client_y - rect.top() as f32) / h,
        )
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Drift starting...");

        let document = document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let config = session_config(&settings, seed);
        log::info!(
            "Session: chapter '{}', round {:?}, {:?} layout, seed {}",
            config.chapter_id,
            config.round_id,
            config.orientation,
            seed
        );
        if let Some(el) = document.get_element_by_id("game") {
            let layout = match config.orientation {
                Orientation::Vertical => "layout-vertical",
                Orientation::Horizontal => "layout-horizontal",
            };
            let _ = el.set_attribute("data-layout", layout);
            let v = config.vehicle;
            let _ = el.set_attribute(
                "data-vehicle",
                &format!("{:.0}/{:.0}/{:.0}", v.speed, v.handling, v.shield),
            );
        }

        let game = Rc::new(RefCell::new(Game::new(config, Vocabulary::builtin(), settings)));

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Neon Drift running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let Some(game_el) = document().and_then(|d| d.get_element_by_id("game")) else {
            log::error!("Missing #game element");
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                if key.starts_with("Arrow") || key == " " {
                    event.prevent_default();
                }
                game.borrow_mut().session.key_down(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start on a screen half
        {
            let game = game.clone();
            let el = game_el.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let point =
                        normalized_point(&el, touch.client_x() as f32, touch.client_y() as f32);
                    game.borrow_mut().session.lane_input(LaneInput::Touch(point));
                }
            });
            let _ = game_el
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click on a screen half
        {
            let game = game.clone();
            let el = game_el.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = normalized_point(&el, event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().session.lane_input(LaneInput::Click(point));
            });
            let _ = game_el
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Device tilt
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
                let mut g = game.borrow_mut();
                if !g.settings.tilt_controls {
                    return;
                }
                if let Some(gamma) = event.gamma() {
                    let threshold = g.settings.tilt_threshold();
                    g.session.lane_input(LaneInput::Tilt {
                        gamma: gamma as f32,
                        threshold,
                    });
                }
            });
            let _ = window.add_event_listener_with_callback(
                "deviceorientation",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                neon_drift::consts::SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn on_click<F: FnMut() + 'static>(id: &str, mut handler: F) {
        if let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("start-btn", move || {
                set_class("start-btn", "hidden");
                game.borrow_mut().session.start();
            });
        }
        {
            let game = game.clone();
            on_click("pause-btn", move || game.borrow_mut().session.pause());
        }
        {
            let game = game.clone();
            on_click("resume-btn", move || game.borrow_mut().session.resume());
        }
        on_click("restart-btn", move || {
            let seed = js_sys::Date::now() as u64;
            game.borrow_mut().restart(seed);
            log::info!("Game restarted with seed: {}", seed);
        });
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let Some(document) = document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().session.pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.pause();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Drift (native) starting...");
    log::info!("The browser build is the playable version - run with `trunk serve`");

    autopilot::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: an autopilot that answers most questions correctly
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use neon_drift::consts::SIM_DT;
    use neon_drift::sim::{GamePhase, SessionConfig};
    use neon_drift::{Session, SessionHooks, Vocabulary};

    /// Every Nth question is answered wrong on purpose
    const MISTAKE_EVERY: u64 = 5;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    #[derive(Default)]
    struct Report {
        final_score: Option<u64>,
        round: Option<String>,
    }

    impl SessionHooks for Report {
        fn on_game_end(&mut self, final_score: u64) {
            println!("Game over: {}", final_score);
            self.final_score = Some(final_score);
        }

        fn on_round_complete(&mut self, round_id: &str) {
            println!("Round {} complete", round_id);
            self.round = Some(round_id.to_string());
        }

        fn on_speed_change(&mut self, speed: f32) {
            log::info!("Box speed now {:.3}", speed);
        }
    }

    pub fn run() {
        let config = SessionConfig {
            seed: 2024,
            chapter_id: "chapter2".into(),
            round_id: Some("2-1".into()),
            ..Default::default()
        };
        let mut session = Session::new(config, &Vocabulary::builtin(), Report::default());
        session.start();

        for _ in 0..MAX_FRAMES {
            if session.is_finished() {
                break;
            }
            if let Some(q) = session.state().current_question() {
                let lane = if q.id % MISTAKE_EVERY == 0 {
                    q.correct_lane.other()
                } else {
                    q.correct_lane
                };
                let key = match lane {
                    neon_drift::sim::Lane::First => "ArrowLeft",
                    neon_drift::sim::Lane::Second => "ArrowRight",
                };
                session.key_down(key);
            }
            session.advance(SIM_DT);
        }

        let state = session.state();
        println!(
            "Finished in {:?}: score {}, health {}, car level {}, round progress {}",
            state.phase, state.score, state.health, state.car_level, state.questions_answered
        );
        if state.phase == GamePhase::Running {
            println!("(stopped after {} frames)", MAX_FRAMES);
        }
        let report = session.hooks();
        if report.final_score.is_none() && report.round.is_none() {
            log::warn!("Session ended without a terminal notification");
        }
    }
}
