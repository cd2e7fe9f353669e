//! Session driver: one engine plus its two timers
//!
//! Converts elapsed wall time into countdown ticks and feedback-hold expiries.
//! Resetting or dropping the session cancels whatever is still pending.

use std::rc::Rc;

use super::bank::ProblemBank;
use super::engine::{HoldToken, QuizEngine};
use super::state::{QuizEvent, RoundState, RoundSummary, SessionPhase};
use super::timer::{Scheduler, TaskHandle};
use crate::settings::RoundConfig;

/// Work the scheduler hands back to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Repeating one-second countdown
    Countdown,
    /// One-shot end of the feedback overlay
    FeedbackHold(HoldToken),
}

/// A running quiz session
#[derive(Debug)]
pub struct QuizSession {
    bank: Rc<ProblemBank>,
    engine: QuizEngine,
    scheduler: Scheduler<TimerTask>,
    hold: Option<TaskHandle>,
}

impl QuizSession {
    /// Start a session and its countdown
    pub fn new(bank: Rc<ProblemBank>, difficulty: &str, config: RoundConfig, seed: u64) -> Self {
        let engine = QuizEngine::start_session(&bank, difficulty, config, seed);
        let mut session = Self {
            bank,
            engine,
            scheduler: Scheduler::new(),
            hold: None,
        };
        session.arm_countdown();
        session
    }

    fn arm_countdown(&mut self) {
        let interval = self.engine.config().tick_interval_ms;
        self.scheduler.schedule_repeating(TimerTask::Countdown, interval);
    }

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.hold.take() {
            if self.scheduler.cancel(handle) {
                log::debug!("Cancelled pending feedback hold");
            }
        }
        self.scheduler.cancel_all();
    }

    /// Let `dt_ms` of time pass, running every timer that comes due in order
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.scheduler.now_ms() + dt_ms;
        while let Some((handle, task)) = self.scheduler.pop_due(until) {
            self.dispatch(handle, task);
        }
        self.scheduler.settle(until);
    }

    fn dispatch(&mut self, handle: TaskHandle, task: TimerTask) {
        match task {
            TimerTask::Countdown => self.engine.on_tick(),
            TimerTask::FeedbackHold(token) => {
                if self.hold == Some(handle) {
                    self.hold = None;
                }
                self.engine.complete_feedback(token);
            }
        }

        if self.engine.state().phase == SessionPhase::Ended {
            self.cancel_timers();
        }
    }

    /// Forward an answer; schedules the feedback hold when accepted
    pub fn submit_answer(&mut self, selected: i32) -> bool {
        let Some(token) = self.engine.submit_answer(selected) else {
            return false;
        };
        let delay = self.engine.config().feedback_hold_ms;
        self.hold = Some(
            self.scheduler
                .schedule_once(TimerTask::FeedbackHold(token), delay),
        );
        true
    }

    /// Start the round over with the same bank and difficulty
    pub fn reset(&mut self) {
        self.cancel_timers();
        let difficulty = self.engine.difficulty().to_string();
        self.engine.reset_session(&self.bank, &difficulty);
        self.arm_countdown();
    }

    pub fn state(&self) -> &RoundState {
        self.engine.state()
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn prompt(&self) -> &str {
        self.engine.prompt()
    }

    pub fn difficulty(&self) -> &str {
        self.engine.difficulty()
    }

    pub fn bank(&self) -> &ProblemBank {
        &self.bank
    }

    pub fn summary(&self) -> RoundSummary {
        self.engine.summary()
    }

    pub fn drain_events(&mut self) -> Vec<QuizEvent> {
        self.engine.drain_events()
    }

    /// Whether a feedback hold is waiting to fire
    pub fn hold_pending(&self) -> bool {
        self.hold.is_some_and(|h| self.scheduler.is_pending(h))
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }
}
