//! Navigation between the portal, difficulty menus and gameplay
//!
//! At most one session exists at a time. Leaving the game view drops it,
//! together with its countdown and any pending feedback hold.

use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::catalog::GameVariant;
use crate::error::QuizError;
use crate::quiz::{ProblemBank, QuizSession};
use crate::settings::Settings;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Game portal listing every variant
    Portal,
    /// A variant's difficulty picker
    DifficultyMenu(GameVariant),
    /// A round in progress or just finished
    Game(GameVariant),
}

/// Top-level application state
#[derive(Debug)]
pub struct App {
    view: View,
    settings: Settings,
    /// Seeds each new session
    rng: Pcg32,
    bank: Option<Rc<ProblemBank>>,
    difficulty: Option<String>,
    session: Option<QuizSession>,
}

impl App {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            view: View::Portal,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            bank: None,
            difficulty: None,
            session: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Bank of the currently open variant
    pub fn bank(&self) -> Option<&ProblemBank> {
        self.bank.as_deref()
    }

    pub fn selected_difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref()
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut QuizSession> {
        self.session.as_mut()
    }

    /// Open a variant's difficulty menu
    pub fn open_variant(&mut self, variant: GameVariant) -> Result<(), QuizError> {
        let bank = variant.bank()?;

        let remembered = self
            .settings
            .last_difficulty
            .as_deref()
            .filter(|d| self.settings.last_variant == Some(variant) && bank.has_tier(d));
        self.difficulty = remembered.or(bank.default_tier()).map(str::to_string);

        self.end_session();
        self.bank = Some(Rc::new(bank));
        self.view = View::DifficultyMenu(variant);
        log::info!("Opened {} menu", variant);
        Ok(())
    }

    /// Pick a difficulty tier in the open variant
    pub fn select_difficulty(&mut self, tier: &str) -> Result<(), QuizError> {
        let bank = self.bank.as_ref().ok_or(QuizError::NoVariantSelected)?;
        if !bank.has_tier(tier) {
            return Err(QuizError::UnknownTier(tier.to_string()));
        }
        self.difficulty = Some(tier.to_string());
        Ok(())
    }

    /// Start a fresh round with the selected difficulty
    pub fn start_game(&mut self) -> Result<&mut QuizSession, QuizError> {
        let variant = match self.view {
            View::DifficultyMenu(v) | View::Game(v) => v,
            View::Portal => return Err(QuizError::NoVariantSelected),
        };
        let bank = self.bank.clone().ok_or(QuizError::NoVariantSelected)?;
        let difficulty = self
            .difficulty
            .clone()
            .ok_or_else(|| QuizError::UnknownTier(String::new()))?;

        self.settings.remember_selection(variant, &difficulty);
        self.settings.save();

        let seed: u64 = self.rng.random();
        log::info!("Starting {} ({}) with seed {}", variant, difficulty, seed);
        self.view = View::Game(variant);
        Ok(self
            .session
            .insert(QuizSession::new(bank, &difficulty, self.settings.round, seed)))
    }

    /// Leave the game for the variant's difficulty menu
    pub fn back_to_menu(&mut self) {
        if let View::Game(variant) = self.view {
            self.end_session();
            self.view = View::DifficultyMenu(variant);
        }
    }

    /// Return to the portal from anywhere
    pub fn back_to_portal(&mut self) {
        self.end_session();
        self.bank = None;
        self.difficulty = None;
        self.view = View::Portal;
    }

    fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!(
                "Leaving session {} (score {}, {} timers dropped)",
                session.state().session_id,
                session.state().score,
                session.pending_timers()
            );
        }
    }

    /// Let time pass in the running session
    pub fn advance(&mut self, dt_ms: u64) {
        if let Some(session) = self.session.as_mut() {
            session.advance(dt_ms);
        }
    }

    pub fn submit_answer(&mut self, selected: i32) -> bool {
        self.session
            .as_mut()
            .is_some_and(|s| s.submit_answer(selected))
    }

    /// Restart the running round; `false` when no game is showing
    pub fn restart(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.reset();
                true
            }
            None => false,
        }
    }
}
