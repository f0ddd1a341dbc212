//! Composition root: the round machine, the matcher, a clock and a target.
//!
//! The engine owns the one piece of cross-component policy: a guess that
//! names the target ends the round as solved, even when it is the last
//! guess of the budget.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::action::{Action, RevealReason};
use crate::clock::{Clock, Timestamp};
use crate::error::RoundError;
use crate::machine::RoundMachine;
use crate::matcher::MatchingEngine;
use crate::rules::RoundRules;
use crate::state::RoundState;
use crate::target::Target;

/// What happened to a submitted guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessOutcome {
    /// The guess named the target; the round is solved.
    Correct,
    /// Wrong; `remaining` guesses are left (zero means the round ended).
    Incorrect {
        /// Guesses left in the round.
        remaining: usize,
    },
    /// Same as an earlier guess; not counted.
    Duplicate,
    /// The deadline had passed; the round timed out instead.
    TooLate,
}

/// Receives every state change of a [`RoundEngine`].
pub trait RoundObserver {
    /// Called after a successful dispatch that changed the state.
    fn on_transition(&mut self, previous: &RoundState, next: &RoundState);
}

impl<F> RoundObserver for F
where
    F: FnMut(&RoundState, &RoundState),
{
    fn on_transition(&mut self, previous: &RoundState, next: &RoundState) {
        self(previous, next)
    }
}

/// Plays rounds against one target at a time.
pub struct RoundEngine<C: Clock> {
    machine: RoundMachine,
    matcher: MatchingEngine,
    clock: C,
    target: Option<Target>,
    observers: Vec<Box<dyn RoundObserver + Send>>,
}

impl<C: Clock> std::fmt::Debug for RoundEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundEngine")
            .field("state", self.machine.state())
            .field("target", &self.target.as_ref().map(Target::id))
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<C: Clock> RoundEngine<C> {
    /// Creates an idle engine.
    #[instrument(skip(matcher, clock))]
    pub fn new(rules: RoundRules, matcher: MatchingEngine, clock: C) -> Self {
        Self {
            machine: RoundMachine::new(rules),
            matcher,
            clock,
            target: None,
            observers: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &RoundState {
        self.machine.state()
    }

    /// Round rules.
    pub fn rules(&self) -> &RoundRules {
        self.machine.rules()
    }

    /// Target of the current or last round.
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// The matching engine.
    pub fn matcher(&self) -> &MatchingEngine {
        &self.matcher
    }

    /// The clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Time left in the active round.
    pub fn remaining(&self) -> Option<Duration> {
        self.state()
            .active()
            .map(|round| round.remaining(self.clock.now()))
    }

    /// Registers an observer for every subsequent state change.
    pub fn subscribe(&mut self, observer: impl RoundObserver + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Starts a round against `target`.
    ///
    /// # Errors
    ///
    /// [`RoundError::InvalidTransition`] unless the engine is idle.
    #[instrument(skip(self, target), fields(target_id = %target.id()))]
    pub fn start(&mut self, target: Target, duration: Duration) -> Result<&RoundState, RoundError> {
        let now = self.clock.now();
        self.dispatch(Action::Start { now, duration })?;
        info!(%now, "Round started");
        self.target = Some(target);
        Ok(self.state())
    }

    /// Delivers the clock's current time.
    ///
    /// # Errors
    ///
    /// [`RoundError::InvalidTransition`] unless a round is active.
    pub fn tick(&mut self) -> Result<&RoundState, RoundError> {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Delivers an explicit time.
    ///
    /// # Errors
    ///
    /// [`RoundError::InvalidTransition`] unless a round is active, and
    /// [`RoundError::InvalidAction`] for a time before the round start.
    pub fn tick_at(&mut self, now: Timestamp) -> Result<&RoundState, RoundError> {
        self.dispatch(Action::Tick { now })?;
        Ok(self.state())
    }

    /// Submits a guess.
    ///
    /// The deadline is checked first, so a guess arriving late reports
    /// [`GuessOutcome::TooLate`]. Otherwise the guess is recorded, and a
    /// matching guess ends the round as solved.
    ///
    /// # Errors
    ///
    /// [`RoundError::InvalidTransition`] unless a round is active, and
    /// [`RoundError::InvalidAction`] for a blank guess.
    #[instrument(skip(self))]
    pub fn submit_guess(&mut self, text: &str) -> Result<GuessOutcome, RoundError> {
        let now = self.clock.now();
        if self.state().wants_ticks() {
            self.dispatch(Action::Tick { now })?;
            if self.state().revealed().is_some() {
                debug!("Guess arrived after deadline");
                return Ok(GuessOutcome::TooLate);
            }
        }

        let matched = self
            .target
            .as_ref()
            .is_some_and(|target| self.matcher.is_match(text, target));
        let recorded_before = self.state().guesses().len();

        if matched {
            let previous = self.state().clone();
            self.machine.dispatch_solving_guess(text, now)?;
            self.notify(&previous);
            info!("Guess matched target");
            return Ok(GuessOutcome::Correct);
        }

        self.dispatch(Action::guess(text, now))?;
        if self.state().guesses().len() == recorded_before {
            return Ok(GuessOutcome::Duplicate);
        }

        let remaining = match self.state() {
            RoundState::Active(round) => (*self.rules().max_guesses()).max(1) - round.guesses().len(),
            _ => 0,
        };
        Ok(GuessOutcome::Incorrect { remaining })
    }

    /// Buys a hint; returns its 1-based number, or `None` once the cap is
    /// reached.
    ///
    /// # Errors
    ///
    /// [`RoundError::InvalidTransition`] unless a round is active.
    #[instrument(skip(self))]
    pub fn request_hint(&mut self) -> Result<Option<u32>, RoundError> {
        let before = self.hints_used();
        self.dispatch(Action::Hint)?;
        let after = self.hints_used();
        Ok((after > before).then_some(after))
    }

    /// Ends the round without a solve.
    ///
    /// # Errors
    ///
    /// [`RoundError::InvalidTransition`] unless a round is active.
    #[instrument(skip(self))]
    pub fn give_up(&mut self) -> Result<&RoundState, RoundError> {
        let at = self.clock.now();
        self.dispatch(Action::reveal(RevealReason::GiveUp, at))?;
        Ok(self.state())
    }

    /// Returns to idle, forgetting the target.
    ///
    /// # Errors
    ///
    /// [`RoundError::InvalidTransition`] while a round is active.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<&RoundState, RoundError> {
        self.dispatch(Action::Reset)?;
        self.target = None;
        Ok(self.state())
    }

    fn hints_used(&self) -> u32 {
        self.state().active().map_or(0, |round| *round.hints_used())
    }

    fn dispatch(&mut self, action: Action) -> Result<(), RoundError> {
        let previous = self.state().clone();
        self.machine.dispatch(action)?;
        self.notify(&previous);
        Ok(())
    }

    fn notify(&mut self, previous: &RoundState) {
        let next = self.machine.state();
        if previous == next {
            return;
        }
        for observer in &mut self.observers {
            observer.on_transition(previous, next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::{Arc, Mutex};

    fn engine() -> RoundEngine<Arc<ManualClock>> {
        RoundEngine::new(
            RoundRules::new(),
            MatchingEngine::new(),
            Arc::new(ManualClock::new(Timestamp::ZERO)),
        )
    }

    fn brady() -> Target {
        Target::new("BradTo00", "Tom", "Brady", "Tom Brady")
    }

    #[test]
    fn test_guess_outcomes() {
        let mut engine = engine();
        engine.start(brady(), Duration::from_secs(60)).expect("start");
        assert_eq!(
            engine.submit_guess("Peyton Manning").expect("guess"),
            GuessOutcome::Incorrect { remaining: 2 }
        );
        assert_eq!(engine.submit_guess(" Peyton  Manning ").expect("guess"), GuessOutcome::Duplicate);
        assert_eq!(engine.submit_guess("tom brady").expect("guess"), GuessOutcome::Correct);
    }

    #[test]
    fn test_late_guess_times_out() {
        let mut engine = engine();
        engine.start(brady(), Duration::from_secs(30)).expect("start");
        engine.clock().advance(Duration::from_secs(31));
        assert_eq!(engine.submit_guess("Tom Brady").expect("guess"), GuessOutcome::TooLate);
        let revealed = engine.state().revealed().expect("revealed");
        assert_eq!(*revealed.reason(), RevealReason::Timeout);
        assert!(revealed.guesses().is_empty());
    }

    #[test]
    fn test_hint_numbers() {
        let mut engine = engine();
        engine.start(brady(), Duration::from_secs(60)).expect("start");
        assert_eq!(engine.request_hint().expect("hint"), Some(1));
        assert_eq!(engine.request_hint().expect("hint"), Some(2));
        assert_eq!(engine.request_hint().expect("hint"), Some(3));
        assert_eq!(engine.request_hint().expect("hint"), None);
    }

    #[test]
    fn test_observers_see_changes_only() {
        let mut engine = engine();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        engine.subscribe(move |_: &RoundState, next: &RoundState| {
            sink.lock().expect("observer lock").push(next.phase());
        });

        engine.start(brady(), Duration::from_secs(60)).expect("start");
        engine.tick().expect("tick");
        engine.give_up().expect("give up");
        engine.reset().expect("reset");

        let seen = seen.lock().expect("observer lock");
        assert_eq!(seen.len(), 3);
        assert!(engine.target().is_none());
    }
}
