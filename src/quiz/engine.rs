//! Quiz round engine
//!
//! Owns the `RoundState` of one session and is the only code that mutates it.
//! Timing is external: a scheduler calls `on_tick` once per second and
//! `complete_feedback` when the feedback hold expires.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bank::{FeedbackMessages, ProblemBank};
use super::problem::Problem;
use super::shuffle::shuffle_options;
use super::state::{EndReason, Feedback, QuizEvent, RoundState, RoundSummary, SessionPhase};
use crate::settings::RoundConfig;

/// Ticket for one pending feedback hold
///
/// Only the hold issued for the current answer of the current session can
/// advance the round. Tokens from before a reset are inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldToken {
    session_id: u64,
    answer_seq: u32,
}

/// Engine for one timed quiz session at a time
#[derive(Debug, Clone)]
pub struct QuizEngine {
    config: RoundConfig,
    messages: FeedbackMessages,
    difficulty: String,
    problems: Vec<Problem>,
    state: RoundState,
    rng: Pcg32,
    events: Vec<QuizEvent>,
}

impl QuizEngine {
    /// Start a session on `bank[difficulty]` with a seeded random source
    pub fn start_session(
        bank: &ProblemBank,
        difficulty: &str,
        config: RoundConfig,
        seed: u64,
    ) -> Self {
        let mut engine = Self {
            state: RoundState::new(0, config.round_seconds),
            config,
            messages: bank.messages.clone(),
            difficulty: String::new(),
            problems: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        engine.begin(bank, difficulty, 1);
        engine
    }

    /// Discard all progress and start over; callable from any phase
    pub fn reset_session(&mut self, bank: &ProblemBank, difficulty: &str) {
        let next_id = self.state.session_id + 1;
        self.begin(bank, difficulty, next_id);
    }

    fn begin(&mut self, bank: &ProblemBank, difficulty: &str, session_id: u64) {
        self.messages = bank.messages.clone();
        self.difficulty = difficulty.to_string();
        self.problems = bank.problems(difficulty).to_vec();
        self.state = RoundState::new(session_id, self.config.round_seconds);
        self.events.clear();

        if self.problems.is_empty() {
            log::warn!("No problems for difficulty {:?}, round has nothing to show", difficulty);
        }

        let index = self.pick_index();
        self.present(index);

        log::info!(
            "Session {} started ({}, {} problems, {}s)",
            session_id,
            difficulty,
            self.problems.len(),
            self.config.round_seconds
        );
    }

    /// Uniform pick over the whole tier, repeats allowed
    fn pick_index(&mut self) -> usize {
        if self.problems.is_empty() {
            0
        } else {
            self.rng.random_range(0..self.problems.len())
        }
    }

    /// Show a problem with a fresh shuffle of its options
    fn present(&mut self, index: usize) {
        self.state.current_problem_index = index;
        let Some(problem) = self.problems.get(index) else {
            self.state.presented_options = Vec::new();
            return;
        };
        self.state.presented_options = shuffle_options(problem.options(), &mut self.rng).to_vec();
        self.events.push(QuizEvent::ProblemPresented { index });
    }

    /// One second elapsed; only counts while waiting for an answer
    pub fn on_tick(&mut self) {
        if self.state.phase != SessionPhase::Playing {
            return;
        }

        self.state.time_remaining_secs = self.state.time_remaining_secs.saturating_sub(1);
        if self.state.time_remaining_secs == 0 {
            self.end(EndReason::TimeUp);
        }
    }

    /// Score an answer and enter the feedback hold
    ///
    /// Returns the hold token when the answer was accepted, `None` when it was
    /// ignored (not in `Playing`, or no current problem).
    pub fn submit_answer(&mut self, selected: i32) -> Option<HoldToken> {
        if self.state.phase != SessionPhase::Playing {
            log::debug!("Ignoring answer {} during {:?}", selected, self.state.phase);
            return None;
        }
        let Some(problem) = self.problems.get(self.state.current_problem_index) else {
            log::warn!("Ignoring answer {}: no current problem", selected);
            return None;
        };
        let correct_answer = problem.correct_answer;

        let feedback = if problem.is_correct(selected) {
            self.state.score = self.state.score.saturating_add(self.config.points_per_correct);
            self.state.correct_count += 1;
            self.state.streak += 1;
            self.state.best_streak = self.state.best_streak.max(self.state.streak);
            self.events.push(QuizEvent::AnswerCorrect { selected });
            Feedback {
                is_correct: true,
                message: self.messages.correct.clone(),
            }
        } else {
            self.state.streak = 0;
            self.events.push(QuizEvent::AnswerIncorrect {
                selected,
                correct_answer,
            });
            Feedback {
                is_correct: false,
                message: self.messages.incorrect(correct_answer),
            }
        };

        log::debug!(
            "Answer {} ({}), score {}",
            selected,
            if feedback.is_correct { "correct" } else { "incorrect" },
            self.state.score
        );

        self.state.last_feedback = Some(feedback);
        self.state.phase = SessionPhase::Feedback;

        Some(HoldToken {
            session_id: self.state.session_id,
            answer_seq: self.state.problems_completed,
        })
    }

    /// Feedback hold expired: count the answer and move on
    ///
    /// Returns `false` for a stale token or when not in `Feedback`.
    pub fn complete_feedback(&mut self, token: HoldToken) -> bool {
        let current = token.session_id == self.state.session_id
            && token.answer_seq == self.state.problems_completed;
        if !current || self.state.phase != SessionPhase::Feedback {
            log::debug!("Ignoring stale feedback hold for session {}", token.session_id);
            return false;
        }

        self.state.last_feedback = None;
        self.state.problems_completed += 1;

        if self.state.problems_completed >= self.config.problems_per_round {
            self.end(EndReason::AllAnswered);
        } else {
            let index = self.pick_index();
            self.present(index);
            self.state.phase = SessionPhase::Playing;
        }
        true
    }

    fn end(&mut self, reason: EndReason) {
        self.state.phase = SessionPhase::Ended;
        self.state.end_reason = Some(reason);
        self.events.push(match reason {
            EndReason::TimeUp => QuizEvent::TimeUp,
            EndReason::AllAnswered => QuizEvent::RoundComplete,
        });
        log::info!(
            "Session {} ended ({:?}): score {}, {}/{} answered",
            self.state.session_id,
            reason,
            self.state.score,
            self.state.problems_completed,
            self.config.problems_per_round
        );
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.problems.get(self.state.current_problem_index)
    }

    /// Prompt of the current problem, empty if there is none
    pub fn prompt(&self) -> &str {
        self.current_problem().map(|p| p.prompt.as_str()).unwrap_or("")
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn summary(&self) -> RoundSummary {
        self.state.summary()
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<QuizEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::bank::Tier;

    fn single_problem_bank() -> ProblemBank {
        ProblemBank::new(
            FeedbackMessages::default(),
            vec![Tier::new(
                "easy",
                "Easy",
                vec![Problem::new("5+3=?", 8, [7, 9, 6])],
            )],
        )
        .unwrap()
    }

    fn multi_problem_bank() -> ProblemBank {
        ProblemBank::new(
            FeedbackMessages::default(),
            vec![Tier::new(
                "easy",
                "Easy",
                vec![
                    Problem::new("5 + 3 = ?", 8, [7, 9, 6]),
                    Problem::new("12 - 4 = ?", 8, [6, 10, 16]),
                    Problem::new("7 + 6 = ?", 13, [12, 14, 11]),
                    Problem::new("15 - 8 = ?", 7, [6, 8, 23]),
                ],
            )],
        )
        .unwrap()
    }

    fn start(bank: &ProblemBank) -> QuizEngine {
        QuizEngine::start_session(bank, "easy", RoundConfig::default(), 12345)
    }

    fn answer_correctly(engine: &mut QuizEngine) -> Option<HoldToken> {
        let answer = engine.current_problem().unwrap().correct_answer;
        engine.submit_answer(answer)
    }

    fn answer_wrong(engine: &mut QuizEngine) -> Option<HoldToken> {
        let wrong = engine.current_problem().unwrap().distractors[0];
        engine.submit_answer(wrong)
    }

    #[test]
    fn test_start_session() {
        let bank = multi_problem_bank();
        let mut engine = start(&bank);
        let state = engine.state();

        assert_eq!(state.phase, SessionPhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_remaining_secs, 60);
        assert_eq!(state.problems_completed, 0);
        assert!(state.current_problem_index < 4);

        let mut presented = state.presented_options.clone();
        let mut expected = engine.current_problem().unwrap().options().to_vec();
        presented.sort_unstable();
        expected.sort_unstable();
        assert_eq!(presented, expected);

        let events = engine.drain_events();
        assert!(matches!(events[0], QuizEvent::ProblemPresented { .. }));
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_correct_answer_scores_100() {
        let bank = single_problem_bank();
        let mut engine = start(&bank);

        assert!(engine.submit_answer(8).is_some());

        let state = engine.state();
        assert_eq!(state.score, 100);
        assert_eq!(state.phase, SessionPhase::Feedback);
        let feedback = state.last_feedback.as_ref().unwrap();
        assert!(feedback.is_correct);
        assert_eq!(state.streak, 1);
    }

    #[test]
    fn test_incorrect_answer_reveals_correct_answer() {
        let bank = single_problem_bank();
        let mut engine = start(&bank);

        assert!(engine.submit_answer(7).is_some());

        let state = engine.state();
        assert_eq!(state.score, 0);
        let feedback = state.last_feedback.as_ref().unwrap();
        assert!(!feedback.is_correct);
        assert!(feedback.message.contains('8'));
        assert_eq!(
            engine.drain_events().last(),
            Some(&QuizEvent::AnswerIncorrect {
                selected: 7,
                correct_answer: 8
            })
        );
    }

    #[test]
    fn test_score_changes_only_for_correct_answers() {
        let bank = multi_problem_bank();
        let mut engine = start(&bank);

        for round in 0..10 {
            let before = engine.state().score;
            let correct = engine.current_problem().unwrap().correct_answer;
            let selected = engine.state().presented_options[round % 4];
            let token = engine.submit_answer(selected).unwrap();
            let delta = engine.state().score - before;
            if selected == correct {
                assert_eq!(delta, 100);
            } else {
                assert_eq!(delta, 0);
            }
            engine.complete_feedback(token);
        }
    }

    #[test]
    fn test_double_submit_counts_once() {
        let bank = single_problem_bank();
        let mut engine = start(&bank);

        let first = engine.submit_answer(8);
        let second = engine.submit_answer(8);
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(engine.state().score, 100);

        assert!(engine.complete_feedback(first.unwrap()));
        // Same token again is stale
        assert!(!engine.complete_feedback(first.unwrap()));
        assert_eq!(engine.state().problems_completed, 1);
    }

    #[test]
    fn test_ten_answers_end_round() {
        let bank = multi_problem_bank();
        let mut engine = start(&bank);

        for i in 0..10 {
            assert_eq!(engine.state().phase, SessionPhase::Playing);
            let token = if i % 2 == 0 {
                answer_correctly(&mut engine)
            } else {
                answer_wrong(&mut engine)
            };
            assert!(engine.complete_feedback(token.unwrap()));
        }

        let state = engine.state();
        assert_eq!(state.phase, SessionPhase::Ended);
        assert_eq!(state.problems_completed, 10);
        assert_eq!(state.score, 500);
        assert_eq!(state.end_reason, Some(EndReason::AllAnswered));
        assert!(engine.drain_events().contains(&QuizEvent::RoundComplete));
    }

    #[test]
    fn test_sixty_ticks_time_out() {
        let bank = multi_problem_bank();
        let mut engine = start(&bank);

        for _ in 0..59 {
            engine.on_tick();
        }
        assert_eq!(engine.state().phase, SessionPhase::Playing);
        assert_eq!(engine.state().time_remaining_secs, 1);

        engine.on_tick();
        let state = engine.state();
        assert_eq!(state.phase, SessionPhase::Ended);
        assert_eq!(state.time_remaining_secs, 0);
        assert_eq!(state.problems_completed, 0);
        assert_eq!(state.end_reason, Some(EndReason::TimeUp));

        // Terminal: no further mutation
        let frozen = state.clone();
        engine.on_tick();
        assert!(engine.submit_answer(8).is_none());
        assert_eq!(engine.state(), &frozen);
    }

    #[test]
    fn test_tick_ignored_during_feedback() {
        let bank = single_problem_bank();
        let mut engine = start(&bank);
        engine.on_tick();
        engine.submit_answer(8);
        engine.on_tick();
        engine.on_tick();
        assert_eq!(engine.state().time_remaining_secs, 59);
    }

    #[test]
    fn test_repeats_allowed_on_single_problem_bank() {
        let bank = single_problem_bank();
        let mut engine = start(&bank);
        let token = engine.submit_answer(8).unwrap();
        assert!(engine.complete_feedback(token));

        let state = engine.state();
        assert_eq!(state.phase, SessionPhase::Playing);
        assert_eq!(state.current_problem_index, 0);
        assert_eq!(state.presented_options.len(), 4);
        assert!(state.last_feedback.is_none());
    }

    #[test]
    fn test_options_reshuffled_on_every_presentation() {
        let bank = single_problem_bank();
        let mut engine = start(&bank);
        let mut orders = vec![engine.state().presented_options.clone()];

        for _ in 0..9 {
            let token = engine.submit_answer(8).unwrap();
            assert!(engine.complete_feedback(token));
            orders.push(engine.state().presented_options.clone());
        }

        orders.sort();
        orders.dedup();
        assert!(orders.len() > 1, "option order never changed: {:?}", orders);
    }

    #[test]
    fn test_next_problem_drawn_from_whole_tier() {
        let bank = multi_problem_bank();
        let mut seen = [0u32; 4];

        for seed in 0..50 {
            let mut engine = QuizEngine::start_session(&bank, "easy", RoundConfig::default(), seed);
            for _ in 0..9 {
                let token = answer_correctly(&mut engine).unwrap();
                assert!(engine.complete_feedback(token));
                seen[engine.state().current_problem_index] += 1;
            }
        }

        // 450 draws over 4 problems
        for count in seen {
            assert!(count > 60, "skewed selection: {:?}", seen);
        }
    }

    #[test]
    fn test_score_saturates_instead_of_overflowing() {
        let bank = single_problem_bank();
        let config = RoundConfig {
            points_per_correct: u32::MAX,
            ..RoundConfig::default()
        };
        let mut engine = QuizEngine::start_session(&bank, "easy", config, 7);

        for _ in 0..2 {
            let token = engine.submit_answer(8).unwrap();
            assert!(engine.complete_feedback(token));
        }
        assert_eq!(engine.state().score, u32::MAX);
        assert_eq!(engine.state().correct_count, 2);
    }

    #[test]
    fn test_reset_from_every_phase() {
        let bank = multi_problem_bank();

        let mut playing = start(&bank);
        playing.on_tick();
        let token = answer_correctly(&mut playing).unwrap();
        playing.complete_feedback(token);

        let mut feedback = start(&bank);
        answer_correctly(&mut feedback);
        assert_eq!(feedback.state().phase, SessionPhase::Feedback);

        let mut ended = start(&bank);
        for _ in 0..60 {
            ended.on_tick();
        }
        assert_eq!(ended.state().phase, SessionPhase::Ended);

        for engine in [&mut playing, &mut feedback, &mut ended] {
            engine.reset_session(&bank, "easy");
            let state = engine.state();
            assert_eq!(state.score, 0);
            assert_eq!(state.time_remaining_secs, 60);
            assert_eq!(state.problems_completed, 0);
            assert_eq!(state.phase, SessionPhase::Playing);
            assert!(state.last_feedback.is_none());
            assert_eq!(state.presented_options.len(), 4);
        }
    }

    #[test]
    fn test_stale_hold_after_reset_is_inert() {
        let bank = single_problem_bank();
        let mut engine = start(&bank);

        let token = engine.submit_answer(8).unwrap();
        engine.reset_session(&bank, "easy");
        assert!(!engine.complete_feedback(token));

        let state = engine.state();
        assert_eq!(state.problems_completed, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, SessionPhase::Playing);
    }

    #[test]
    fn test_stale_hold_after_reset_and_new_answer_is_inert() {
        let bank = single_problem_bank();
        let mut engine = start(&bank);

        let stale = engine.submit_answer(8).unwrap();
        engine.reset_session(&bank, "easy");
        let fresh = engine.submit_answer(7).unwrap();

        assert!(!engine.complete_feedback(stale));
        assert_eq!(engine.state().phase, SessionPhase::Feedback);
        assert!(engine.complete_feedback(fresh));
        assert_eq!(engine.state().problems_completed, 1);
    }

    #[test]
    fn test_streak_tracking() {
        let bank = multi_problem_bank();
        let mut engine = start(&bank);

        for _ in 0..3 {
            let token = answer_correctly(&mut engine).unwrap();
            engine.complete_feedback(token);
        }
        let token = answer_wrong(&mut engine).unwrap();
        engine.complete_feedback(token);

        let state = engine.state();
        assert_eq!(state.streak, 0);
        assert_eq!(state.best_streak, 3);
        assert_eq!(state.correct_count, 3);
        assert_eq!(state.score, 300);
        assert_eq!(engine.summary().accuracy_percent, 75);
    }

    #[test]
    fn test_unknown_difficulty_degrades_to_empty_prompt() {
        let bank = multi_problem_bank();
        let mut engine = QuizEngine::start_session(&bank, "nope", RoundConfig::default(), 1);

        assert_eq!(engine.prompt(), "");
        assert!(engine.state().presented_options.is_empty());
        assert!(engine.drain_events().is_empty());
        assert!(engine.submit_answer(8).is_none());
        assert_eq!(engine.state().phase, SessionPhase::Playing);

        for _ in 0..60 {
            engine.on_tick();
        }
        assert_eq!(engine.state().phase, SessionPhase::Ended);
    }

    #[test]
    fn test_same_seed_same_round() {
        let bank = multi_problem_bank();
        let mut a = start(&bank);
        let mut b = start(&bank);

        for _ in 0..5 {
            assert_eq!(a.state(), b.state());
            let ta = answer_correctly(&mut a).unwrap();
            let tb = answer_correctly(&mut b).unwrap();
            a.complete_feedback(ta);
            b.complete_feedback(tb);
        }
    }
}
