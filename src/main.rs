//! Math Voyage entry point
//!
//! Web: binds the DOM in `index.html` and drives the app from the animation
//! frame loop. Native: plays one round headlessly and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, MouseEvent};

    use math_voyage::consts::*;
    use math_voyage::quiz::{QuizEvent, SessionPhase};
    use math_voyage::{App, GameVariant, Settings, View};

    /// Frontend instance holding the app and frame timing
    struct Game {
        app: App,
        last_time: f64,
        /// Accumulates sub-millisecond frame remainders
        carry_ms: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                app: App::new(Settings::load(), seed),
                last_time: 0.0,
                carry_ms: 0.0,
            }
        }

        /// Feed elapsed frame time into the running session
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                time - self.last_time + self.carry_ms
            } else {
                0.0
            };
            self.last_time = time;

            let whole = dt.floor().max(0.0);
            self.carry_ms = dt - whole;
            let dt_ms = (whole as u64).min(MAX_FRAME_MS);
            self.app.advance(dt_ms);

            if let Some(session) = self.app.session_mut() {
                for event in session.drain_events() {
                    match event {
                        QuizEvent::AnswerCorrect { selected } => {
                            log::info!("Correct: {}", selected)
                        }
                        QuizEvent::AnswerIncorrect {
                            selected,
                            correct_answer,
                        } => log::info!("Incorrect: {} (answer {})", selected, correct_answer),
                        QuizEvent::TimeUp => log::info!("Time up"),
                        QuizEvent::RoundComplete => log::info!("Round complete"),
                        QuizEvent::ProblemPresented { .. } => {}
                    }
                }
            }
        }

        /// Update every screen from app state
        fn render(&self, document: &Document) {
            let view = self.app.view();
            set_visible(document, "portal", view == View::Portal);
            set_visible(document, "difficulty-menu", matches!(view, View::DifficultyMenu(_)));
            set_visible(document, "game", matches!(view, View::Game(_)));

            if let View::DifficultyMenu(variant) = view {
                set_text(document, "menu-title", variant.title());
                set_text(document, "menu-subtitle", variant.subtitle());
                let selected = self.app.selected_difficulty().unwrap_or("");
                if let Ok(buttons) = document.query_selector_all("#tier-list button") {
                    for i in 0..buttons.length() {
                        let Some(node) = buttons.item(i) else { continue };
                        let Ok(button) = node.dyn_into::<Element>() else { continue };
                        let tier = button.get_attribute("data-tier").unwrap_or_default();
                        let class = if tier == selected { "tier selected" } else { "tier" };
                        let _ = button.set_attribute("class", class);
                    }
                }
            }

            let (View::Game(variant), Some(session)) = (view, self.app.session()) else {
                set_visible(document, "feedback", false);
                set_visible(document, "game-over", false);
                return;
            };
            let state = session.state();
            let config = session.engine().config();

            set_text(document, "hud-score", &state.score.to_string());
            set_text(document, "hud-time", &format!("{}s", state.time_remaining_secs));
            set_text(
                document,
                "hud-progress",
                &format!("{} / {}", state.problems_completed, config.problems_per_round),
            );
            set_text(document, "hud-streak", &state.streak.to_string());
            set_text(document, "hud-difficulty", session.difficulty());
            set_text(document, "prompt", session.prompt());

            set_visible(document, "options", state.phase == SessionPhase::Playing);
            for i in 0..OPTION_COUNT {
                let id = format!("option-{}", i);
                match state.presented_options.get(i) {
                    Some(value) => set_text(document, &id, &value.to_string()),
                    None => set_text(document, &id, ""),
                }
            }

            match (&state.last_feedback, state.phase) {
                (Some(feedback), SessionPhase::Feedback) => {
                    set_visible(document, "feedback", true);
                    set_text(
                        document,
                        "feedback-title",
                        if feedback.is_correct { "Correct!" } else { "Incorrect" },
                    );
                    set_text(document, "feedback-message", &feedback.message);
                }
                _ => set_visible(document, "feedback", false),
            }

            set_visible(document, "game-over", state.is_ended());
            if state.is_ended() {
                let summary = session.summary();
                set_text(document, "final-title", variant.completion_title());
                set_text(document, "final-score", &summary.score.to_string());
                set_text(
                    document,
                    "final-progress",
                    &format!("{} / {}", summary.problems_completed, config.problems_per_round),
                );
                set_text(document, "final-accuracy", &format!("{}%", summary.accuracy_percent));
                set_text(document, "final-streak", &summary.best_streak.to_string());
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn on_click(element: &Element, handler: impl FnMut(MouseEvent) + 'static) {
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
        let _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click_id(document: &Document, id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        match document.get_element_by_id(id) {
            Some(el) => on_click(&el, handler),
            None => log::warn!("Missing element #{}", id),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Math Voyage starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("App initialized with seed: {}", seed);

        setup_portal(&document, game.clone());
        setup_difficulty_menu(&document, game.clone());
        setup_game_controls(&document, game.clone());
        setup_keyboard(game.clone());

        game.borrow().render(&document);
        request_animation_frame(game);

        log::info!("Math Voyage running!");
    }

    fn setup_portal(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(list) = document.get_element_by_id("variant-list") else {
            log::warn!("Missing element #variant-list");
            return;
        };

        for variant in GameVariant::ALL {
            let Ok(button) = document.create_element("button") else { continue };
            let label = if variant.is_coming_soon() {
                format!("{} (Coming Soon)", variant.title())
            } else {
                format!("{} - {}", variant.title(), variant.subtitle())
            };
            button.set_text_content(Some(&label));
            let _ = button.set_attribute("class", "variant");
            if variant.is_coming_soon() {
                let _ = button.set_attribute("disabled", "");
            }

            let game = game.clone();
            on_click(&button, move |_event| {
                let mut g = game.borrow_mut();
                match g.app.open_variant(variant) {
                    Ok(()) => {
                        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                            fill_tier_list(&document, &g.app, game.clone());
                        }
                    }
                    Err(e) => log::warn!("Cannot open {}: {}", variant, e),
                }
            });
            let _ = list.append_child(&button);
        }
    }

    /// Rebuild the difficulty buttons for the open variant
    fn fill_tier_list(document: &Document, app: &App, game: Rc<RefCell<Game>>) {
        let Some(list) = document.get_element_by_id("tier-list") else { return };
        list.set_inner_html("");

        let Some(bank) = app.bank() else { return };
        for tier in bank.tiers() {
            let Ok(button) = document.create_element("button") else { continue };
            button.set_text_content(Some(&tier.label));
            let _ = button.set_attribute("data-tier", &tier.id);

            let game = game.clone();
            let tier_id = tier.id.clone();
            on_click(&button, move |_event| {
                if let Err(e) = game.borrow_mut().app.select_difficulty(&tier_id) {
                    log::warn!("{}", e);
                }
            });
            let _ = list.append_child(&button);
        }
    }

    fn setup_difficulty_menu(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click_id(document, "start-btn", move |_event| {
                if let Err(e) = game.borrow_mut().app.start_game() {
                    log::warn!("Cannot start game: {}", e);
                }
            });
        }

        on_click_id(document, "menu-back-btn", move |_event| {
            game.borrow_mut().app.back_to_portal();
        });
    }

    fn setup_game_controls(document: &Document, game: Rc<RefCell<Game>>) {
        // Answer buttons read the option at their position when clicked
        for i in 0..OPTION_COUNT {
            let game = game.clone();
            on_click_id(document, &format!("option-{}", i), move |_event| {
                submit_option(&game, i);
            });
        }

        for id in ["restart-btn", "play-again-btn"] {
            let game = game.clone();
            on_click_id(document, id, move |_event| {
                game.borrow_mut().app.restart();
            });
        }

        for id in ["game-back-btn", "game-over-menu-btn"] {
            let game = game.clone();
            on_click_id(document, id, move |_event| {
                game.borrow_mut().app.back_to_menu();
            });
        }
    }

    fn submit_option(game: &Rc<RefCell<Game>>, index: usize) {
        let mut g = game.borrow_mut();
        let selected = g
            .app
            .session()
            .and_then(|s| s.state().presented_options.get(index).copied());
        if let Some(selected) = selected {
            g.app.submit_answer(selected);
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            match event.key().as_str() {
                "1" | "2" | "3" | "4" => {
                    let index = event.key().parse::<usize>().unwrap_or(1) - 1;
                    submit_option(&game, index);
                }
                "r" | "R" => {
                    game.borrow_mut().app.restart();
                }
                "Escape" => game.borrow_mut().app.back_to_menu(),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
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
            g.update(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.render(&document);
            }
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
    env_logger::init();
    log::info!("Math Voyage (native) starting...");
    log::info!("Native mode plays a headless round - run with `trunk serve` for the web version");

    if let Err(e) = autoplay::run(std::env::args().skip(1).collect()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a simulated player answers until the round ends
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use math_voyage::quiz::{QuizEvent, SessionPhase};
    use math_voyage::{App, GameVariant, QuizError, Settings};

    /// Frame length of the simulated loop
    const FRAME_MS: u64 = 100;
    /// Simulated player's thinking time per problem
    const THINK_MS: u64 = 1500;
    /// Chance the simulated player knows the answer
    const ACCURACY: f64 = 0.75;

    /// Usage: `math-voyage [variant] [tier] [seed]`
    ///
    /// `MATH_VOYAGE_SETTINGS` may point at a settings JSON file.
    pub fn run(args: Vec<String>) -> Result<(), QuizError> {
        let variant = args
            .first()
            .map(|s| s.parse::<GameVariant>())
            .transpose()?
            .unwrap_or(GameVariant::Space);
        let seed = args
            .get(2)
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or(0)
            });

        let settings = match std::env::var_os("MATH_VOYAGE_SETTINGS") {
            Some(path) => Settings::load_from_path(std::path::Path::new(&path)),
            None => Settings::load(),
        };

        let mut app = App::new(settings, seed);
        app.open_variant(variant)?;
        if let Some(tier) = args.get(1) {
            app.select_difficulty(tier)?;
        }
        app.start_game()?;
        log::info!("Playing {} with seed {}", variant, seed);

        let mut player = Pcg32::seed_from_u64(seed ^ 0x5EED);
        let mut thinking_ms = 0;

        loop {
            let Some(session) = app.session_mut() else { break };
            if session.state().is_ended() {
                break;
            }

            if session.state().phase == SessionPhase::Playing {
                thinking_ms += FRAME_MS;
                if thinking_ms >= THINK_MS {
                    thinking_ms = 0;
                    let state = session.state();
                    let choice = match session.engine().current_problem() {
                        Some(problem) if player.random_bool(ACCURACY) => Some(problem.correct_answer),
                        _ if !state.presented_options.is_empty() => {
                            let i = player.random_range(0..state.presented_options.len());
                            Some(state.presented_options[i])
                        }
                        _ => None,
                    };
                    if let Some(choice) = choice {
                        println!("{}  -> {}", session.prompt(), choice);
                        session.submit_answer(choice);
                    }
                }
            }

            app.advance(FRAME_MS);

            if let Some(session) = app.session_mut() {
                for event in session.drain_events() {
                    match event {
                        QuizEvent::AnswerCorrect { .. } => {
                            let state = session.state();
                            println!("   correct (score {}, streak {})", state.score, state.streak);
                        }
                        QuizEvent::AnswerIncorrect { correct_answer, .. } => {
                            println!("   wrong, answer was {}", correct_answer)
                        }
                        QuizEvent::TimeUp => println!("Time up!"),
                        QuizEvent::RoundComplete => println!("All problems answered!"),
                        QuizEvent::ProblemPresented { .. } => {}
                    }
                }
            }
        }

        if let Some(session) = app.session() {
            let summary = session.summary();
            println!();
            println!("{}", variant.completion_title());
            println!("Final score:     {}", summary.score);
            println!(
                "Problems solved: {} / {}",
                summary.problems_completed,
                app.settings().round.problems_per_round
            );
            println!("Accuracy:        {}%", summary.accuracy_percent);
            println!("Best streak:     {}", summary.best_streak);
        }
        Ok(())
    }
}
