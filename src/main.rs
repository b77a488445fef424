//! Batter's Box entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use batters_box::consts::*;
    use batters_box::sim::{GameState, Snapshot, TickInput, tick};
    use batters_box::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Canvas client height, for mapping the pointer to a bat height
        canvas_height: f32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, tuning: Tuning) -> Self {
            Self {
                state: GameState::with_tuning(seed, tuning),
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                canvas_height: 1.0,
            }
        }

        /// Pointer y (0 = top) to a hands height spanning the strike zone
        fn pointer_to_height(&self, y: f32) -> f32 {
            let zone = &self.state.zone;
            let t = (y / self.canvas_height.max(1.0)).clamp(0.0, 1.0);
            zone.top - t * (zone.top - zone.bottom)
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.request_pitch = false;
                self.input.swing = false;
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let snap: Snapshot = self.state.snapshot();

            let set = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            set("#hud-score .hud-value", &snap.score.to_string());
            set("#hud-strikes .hud-value", &snap.strikes.to_string());
            set("#hud-outs .hud-value", &snap.outs.to_string());
            set("#hud-result .hud-value", &snap.last_result);
            set(
                "#hud-pitch .hud-value",
                &format!("{} {:.0} mph", snap.last_pitch_name, snap.last_pitch_mph),
            );
            if snap.pitch_live {
                set("#hud-speed .hud-value", &format!("{:.0} mph", snap.ball_speed_mph));
            }
            set(
                "#hud-distance .hud-value",
                &format!("{:.0} ft", snap.last_distance_ft),
            );

            // Show/hide pitch prompt
            if let Some(el) = document.get_element_by_id("pitch-prompt") {
                let class = if snap.phase == "Idle" && !self.state.tuning.flow.auto_pitch {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            // Debug readout
            if let Some(el) = document.get_element_by_id("debug") {
                if self.settings.show_debug {
                    let _ = el.set_attribute("class", "");
                    if let Ok(json) = serde_json::to_string_pretty(&snap) {
                        el.set_text_content(Some(&json));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    /// Optional balance override embedded in the page
    fn load_tuning(document: &web_sys::Document, settings: &Settings) -> Tuning {
        let mut tuning = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .map(|json| Tuning::from_json_or_default(&json))
            .unwrap_or_default();
        settings.apply(&mut tuning);
        tuning
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Batter's Box starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let canvas: Option<HtmlCanvasElement> = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok());

        let settings = Settings::load();
        let tuning = load_tuning(&document, &settings);
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings, tuning)));

        log::info!("Game initialized with seed: {}", seed);

        if let Some(canvas) = canvas {
            game.borrow_mut().canvas_height = canvas.client_height() as f32;
            setup_pointer_aim(&canvas, game.clone());
        }
        setup_keyboard(game.clone());

        request_animation_frame(game);

        log::info!("Batter's Box running!");
    }

    fn setup_pointer_aim(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - hands follow the pointer vertically
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.canvas_height = canvas_clone.client_height() as f32;
                let height = g.pointer_to_height(event.offset_y() as f32);
                g.input.bat_height = Some(height);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - swing
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.swing = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                " " => g.input.swing = true,
                "Enter" | "p" | "P" => g.input.request_pitch = true,
                "a" | "A" => {
                    g.settings.auto_pitch = !g.settings.auto_pitch;
                    g.state.tuning.flow.auto_pitch = g.settings.auto_pitch;
                    g.settings.save();
                    log::info!("Auto-pitch: {}", g.settings.auto_pitch);
                }
                "d" | "D" => {
                    g.settings.show_debug = !g.settings.show_debug;
                    g.settings.save();
                }
                "i" | "I" => {
                    g.input.idle_mode = !g.input.idle_mode;
                    log::info!("Idle mode: {}", g.input.idle_mode);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use batters_box::consts::SIM_DT;
    use batters_box::sim::{GameState, TickInput, tick};
    use batters_box::{Difficulty, Settings, Tuning};

    env_logger::init();
    log::info!("Batter's Box (native) starting...");
    log::info!("Native mode runs a headless demo session - run with `trunk serve` to play");

    // Usage: batters-box [seed] [tuning.json|-] [difficulty]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024);
    let tuning_path = args.next().filter(|p| p != "-");
    let mut settings = Settings::load();
    if let Some(name) = args.next() {
        match Difficulty::parse(&name) {
            Some(difficulty) => settings.difficulty = difficulty,
            None => log::warn!(
                "Unknown difficulty {:?}, using {}",
                name,
                settings.difficulty.as_str()
            ),
        }
    }
    let mut tuning = match tuning_path {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };
    settings.apply(&mut tuning);

    let mut state = GameState::with_tuning(seed, tuning);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    // Two simulated minutes of the demo batter
    let ticks = (120.0 / SIM_DT) as usize;
    for _ in 0..ticks {
        tick(&mut state, &input, SIM_DT);
    }

    let snap = state.snapshot();
    log::info!(
        "Demo over: {} pitches, {} hits, {} outs, score {}",
        snap.stats.pitches,
        snap.stats.hits,
        snap.outs,
        snap.score
    );
    match serde_json::to_string_pretty(&snap) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
