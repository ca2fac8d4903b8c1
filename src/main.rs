//! Split Brain entry point
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
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use split_brain::Settings;
    use split_brain::audio::{AudioManager, SoundEffect};
    use split_brain::consts::*;
    use split_brain::platform::HeldKeys;
    use split_brain::renderer::{HudView, RenderState, frame_vertices};
    use split_brain::sim::{FixedStep, GameEvent, GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<RenderState>,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        clock: FixedStep,
        last_time: f64,
        /// Directions held right now (updated by key events between ticks)
        held: HeldKeys,
        /// One-shot pause toggle, consumed by the next tick
        pause: bool,
        /// Session end already handled
        finished: bool,
        /// Overlay the DOM currently shows
        shown_hud: Option<HudView>,
    }

    impl Game {
        fn new(state: GameState, settings: Settings, canvas: HtmlCanvasElement) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                state,
                settings,
                render_state: None,
                audio,
                canvas,
                clock: FixedStep::new(),
                last_time: 0.0,
                held: HeldKeys::new(),
                pause: false,
                finished: false,
                shown_hud: None,
            }
        }

        /// World bounds follow the canvas size every frame
        fn sync_canvas_size(&mut self) {
            let w = self.canvas.client_width().max(1);
            let h = self.canvas.client_height().max(1);
            self.state.resize(w as f32, h as f32);

            if let Some(render_state) = self.render_state.as_mut() {
                let ratio = render_state.pixel_ratio;
                let (pw, ph) = ((w as f32 * ratio) as u32, (h as f32 * ratio) as u32);
                if render_state.size != (pw, ph) {
                    self.canvas.set_width(pw);
                    self.canvas.set_height(ph);
                    render_state.resize(pw, ph);
                }
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            for _ in 0..self.clock.advance(dt) {
                let input = TickInput {
                    held: self.held,
                    pause: self.pause,
                };
                tick(&mut self.state, &input, SIM_DT);

                // Clear one-shot inputs after processing
                self.pause = false;

                self.dispatch_events();
                if self.state.is_over() {
                    break;
                }
            }
        }

        /// Forward simulation events to audio
        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                if let GameEvent::GameOver { hits } = event {
                    log::info!("Session over with {} hits", hits);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = frame_vertices(&self.state);
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

        /// Update HUD elements in DOM when the hit count or pause changed
        fn update_hud(&mut self) {
            let view = HudView::of(&self.state);
            if self.shown_hud.as_ref() == Some(&view) {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud") {
                let class = if self.settings.show_hud { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("hud-hits") {
                el.set_text_content(Some(&view.text));
            }

            if let Some(el) = document.get_element_by_id("pause-menu") {
                let class = if view.paused { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }

            self.shown_hud = Some(view);
        }

        /// Pause and forget held keys when the page loses focus
        fn on_focus_lost(&mut self) {
            self.held.clear();
            if self.state.phase == GamePhase::Playing {
                self.pause = true;
                log::info!("Auto-paused (focus lost)");
            }
            if self.settings.mute_on_blur {
                self.audio.set_muted(true);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Split Brain starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No #gameCanvas element");
                return;
            }
        };

        // Canvas backing store in device pixels, world in CSS pixels
        let dpr = window.device_pixel_ratio() as f32;
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f32 * dpr) as u32;
        let height = (client_h as f32 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let mut settings = Settings::load();
        if settings.apply_query(&window.location().search().unwrap_or_default()) {
            settings.save();
        }
        let seed = js_sys::Date::now() as u64;
        let bounds = Vec2::new(client_w as f32, client_h as f32);
        let state = settings.scenario(seed, bounds).build();
        log::info!(
            "{} layout, seed {}, world {}x{}",
            settings.layout.as_str(),
            seed,
            client_w,
            client_h
        );

        let game = Rc::new(RefCell::new(Game::new(state, settings, canvas.clone())));

        match RenderState::for_canvas(canvas, width, height, dpr).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Rendering disabled: {}", e),
        }

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Split Brain running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down: directions, Escape toggles pause
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                if event.key() == "Escape" {
                    g.pause = true;
                } else if g.held.handle_key(&event.key(), true) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().held.handle_key(&event.key(), false) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().on_focus_lost();
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
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().on_focus_lost();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus: sound back on, game stays paused until Escape
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
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
        let over = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.sync_canvas_size();
            g.update(dt);
            g.render();
            g.update_hud();

            let over = g.state.is_over() && !g.finished;
            if over {
                g.finished = true;
            }
            over
        };

        if over {
            // Stop scheduling frames; the reload starts a fresh session
            end_session();
            return;
        }

        request_animation_frame(game);
    }

    /// Show the end-of-game notice and restart the page
    fn end_session() {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.alert_with_message("Game Over!.") {
            log::warn!("Alert failed: {:?}", e);
        }
        if let Err(e) = window.location().reload() {
            log::error!("Reload failed: {:?}", e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Split Brain (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for the web version");

    let options = headless::Options::parse();
    let output = headless::run(&options)?;
    println!("{output}");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session driven by a scripted autopilot
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use glam::Vec2;

    use split_brain::consts::{SIM_DT, WORLD_HEIGHT, WORLD_WIDTH};
    use split_brain::platform::{Direction, HeldKeys};
    use split_brain::renderer::hud_text;
    use split_brain::sim::{GameEvent, TickInput, tick};
    use split_brain::{LayoutKind, Scenario, Settings};

    /// Run a scripted session without a window and print the outcome
    #[derive(Debug, Parser)]
    #[command(name = "split-brain", version)]
    pub struct Options {
        /// World layout when no scenario file is given (classic or random)
        #[arg(long, value_parser = parse_layout)]
        pub layout: Option<LayoutKind>,

        /// Seed for the random layout
        #[arg(long, default_value_t = 1)]
        pub seed: u64,

        /// Stop after this many ticks if the session has not ended
        #[arg(long = "ticks", default_value_t = 60 * 60)]
        pub max_ticks: u64,

        /// Print the layout as JSON instead of running it
        #[arg(long)]
        pub print_layout: bool,

        /// Scenario JSON file; overrides `--layout`
        pub scenario: Option<PathBuf>,
    }

    fn parse_layout(value: &str) -> Result<LayoutKind, String> {
        LayoutKind::from_str(value).ok_or_else(|| format!("unknown layout '{value}'"))
    }

    /// Sweep right, down, left, up; one second each
    fn autopilot(tick: u64) -> HeldKeys {
        let dir = match (tick / 60) % 4 {
            0 => Direction::Right,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Up,
        };
        [dir].into_iter().collect()
    }

    pub fn run(options: &Options) -> anyhow::Result<String> {
        let scenario = match &options.scenario {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Scenario::from_json(&json).with_context(|| format!("loading {}", path.display()))?
            }
            None => {
                let defaults = Settings::load();
                let settings = Settings {
                    layout: options.layout.unwrap_or(defaults.layout),
                    ..defaults
                };
                settings.scenario(options.seed, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT))
            }
        };

        if options.print_layout {
            return Ok(scenario.to_json()?);
        }

        let mut state = scenario.build();
        log::info!(
            "Running {} platforms for up to {} ticks",
            state.platforms.len(),
            options.max_ticks
        );

        let mut reflections = 0u32;
        for t in 0..options.max_ticks {
            tick(&mut state, &TickInput::holding(autopilot(t)), SIM_DT);

            for event in state.drain_events() {
                match event {
                    GameEvent::BarrierHit { platform, barrier, hits } => {
                        log::info!("Tick {}: hit barrier {}/{} ({})", t, platform, barrier, hits);
                    }
                    GameEvent::PlatformReflected { .. } => reflections += 1,
                    GameEvent::GameOver { hits } => {
                        log::info!("Tick {}: game over with {} hits", t, hits);
                    }
                }
            }

            if state.is_over() {
                break;
            }
        }

        Ok(format!(
            "{} after {} ticks ({} reflections){}",
            hud_text(&state),
            state.time_ticks,
            reflections,
            if state.is_over() { " - Game Over!" } else { "" }
        ))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_cli_defaults() {
            let options = Options::try_parse_from(["split-brain"]).unwrap();
            assert_eq!(options.layout, None);
            assert_eq!(options.seed, 1);
            assert_eq!(options.max_ticks, 3600);
            assert!(options.scenario.is_none());
        }

        #[test]
        fn test_cli_flags() {
            let options = Options::try_parse_from([
                "split-brain",
                "--layout",
                "random",
                "--seed",
                "9",
                "--ticks",
                "120",
                "level.json",
            ])
            .unwrap();
            assert_eq!(options.layout, Some(LayoutKind::Random));
            assert_eq!(options.seed, 9);
            assert_eq!(options.max_ticks, 120);
            assert_eq!(options.scenario, Some(PathBuf::from("level.json")));
        }

        #[test]
        fn test_cli_rejects_bad_values() {
            assert!(Options::try_parse_from(["split-brain", "--layout", "maze"]).is_err());
            assert!(Options::try_parse_from(["split-brain", "--seed", "x"]).is_err());
            assert!(Options::try_parse_from(["split-brain", "--ticks", "-5"]).is_err());
        }

        #[test]
        fn test_short_session_summary() {
            let options = Options::try_parse_from(["split-brain", "--ticks", "10"]).unwrap();
            let summary = run(&options).unwrap();
            assert!(summary.starts_with("Hits: 0/3 after 10 ticks"), "{summary}");
        }

        #[test]
        fn test_print_layout_is_loadable() {
            let options =
                Options::try_parse_from(["split-brain", "--layout", "random", "--print-layout"])
                    .unwrap();
            let json = run(&options).unwrap();

            let settings = Settings {
                layout: LayoutKind::Random,
                ..Default::default()
            };
            let expected = settings.scenario(1, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT));
            assert_eq!(Scenario::from_json(&json).unwrap(), expected);
        }

        #[test]
        fn test_missing_scenario_file() {
            let options =
                Options::try_parse_from(["split-brain", "does-not-exist.json"]).unwrap();
            let err = run(&options).unwrap_err();
            assert!(err.to_string().contains("does-not-exist.json"));
        }
    }
}
