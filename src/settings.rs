//! Round configuration and menu preferences
//!
//! Persisted in LocalStorage on the web; the native demo reads a JSON file.

use serde::{Deserialize, Serialize};

use crate::catalog::GameVariant;
use crate::consts::*;
use crate::error::QuizError;

/// Timing and scoring of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Countdown length
    pub round_seconds: u32,
    /// Answers that complete a round
    pub problems_per_round: u32,
    /// Points for a correct answer (wrong answers cost nothing)
    pub points_per_correct: u32,
    /// Feedback overlay duration
    pub feedback_hold_ms: u64,
    /// Countdown granularity
    pub tick_interval_ms: u64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            round_seconds: ROUND_SECONDS,
            problems_per_round: PROBLEMS_PER_ROUND,
            points_per_correct: POINTS_PER_CORRECT,
            feedback_hold_ms: FEEDBACK_HOLD_MS,
            tick_interval_ms: TICK_INTERVAL_MS,
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.round_seconds == 0 {
            return Err(QuizError::InvalidSettings("round_seconds must be positive".into()));
        }
        if self.problems_per_round == 0 || self.problems_per_round > PROBLEMS_PER_ROUND {
            return Err(QuizError::InvalidSettings(format!(
                "problems_per_round must be between 1 and {}",
                PROBLEMS_PER_ROUND
            )));
        }
        if self.points_per_correct > MAX_POINTS_PER_CORRECT {
            return Err(QuizError::InvalidSettings(format!(
                "points_per_correct must be at most {}",
                MAX_POINTS_PER_CORRECT
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(QuizError::InvalidSettings(
                "tick_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Round timing and scoring
    pub round: RoundConfig,

    // === Menu memory ===
    /// Variant opened last
    pub last_variant: Option<GameVariant>,
    /// Difficulty tier chosen last
    pub last_difficulty: Option<String>,
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "math_voyage_settings";

    /// Parse settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.round.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, QuizError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Remember the selection that started a game
    pub fn remember_selection(&mut self, variant: GameVariant, difficulty: &str) {
        self.last_variant = Some(variant);
        self.last_difficulty = Some(difficulty.to_string());
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_round_rules() {
        let config = RoundConfig::default();
        assert_eq!(config.round_seconds, 60);
        assert_eq!(config.problems_per_round, 10);
        assert_eq!(config.points_per_correct, 100);
        assert_eq!(config.feedback_hold_ms, 2000);
        assert_eq!(config.tick_interval_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings = Settings::from_json(r#"{"round": {"round_seconds": 90}}"#).unwrap();
        assert_eq!(settings.round.round_seconds, 90);
        assert_eq!(settings.round.problems_per_round, 10);
        assert_eq!(settings.last_variant, None);

        let empty = Settings::from_json("{}").unwrap();
        assert_eq!(empty, Settings::default());
    }

    #[test]
    fn test_invalid_round_rejected() {
        let err = Settings::from_json(r#"{"round": {"problems_per_round": 0}}"#).unwrap_err();
        assert!(matches!(err, QuizError::InvalidSettings(_)));
    }

    #[test]
    fn test_out_of_range_round_rejected() {
        for json in [
            r#"{"round": {"points_per_correct": 4294967295}}"#,
            r#"{"round": {"problems_per_round": 11}}"#,
        ] {
            let err = Settings::from_json(json).unwrap_err();
            assert!(matches!(err, QuizError::InvalidSettings(_)), "{}", json);
        }

        let shorter = Settings::from_json(r#"{"round": {"problems_per_round": 5}}"#).unwrap();
        assert_eq!(shorter.round.problems_per_round, 5);
    }

    #[test]
    fn test_remember_selection_round_trip() {
        let mut settings = Settings::default();
        settings.remember_selection(GameVariant::Ocean, "deep");
        let json = settings.to_json().unwrap();
        let restored = Settings::from_json(&json).unwrap();
        assert_eq!(restored.last_variant, Some(GameVariant::Ocean));
        assert_eq!(restored.last_difficulty.as_deref(), Some("deep"));
    }
}
