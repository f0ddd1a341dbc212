//! Round rules and the pure transition function.
//!
//! | State    | Action                     | Next state                                    |
//! |----------|----------------------------|-----------------------------------------------|
//! | Idle     | `start`                    | Active, full score                            |
//! | Idle     | `reset`                    | Idle                                          |
//! | Active   | `tick` before deadline     | Active, unchanged                             |
//! | Active   | `tick` at/after deadline   | Revealed(timeout), miss penalty               |
//! | Active   | `guess`                    | Active with guess; duplicates ignored         |
//! | Active   | `guess` filling the budget | Revealed(max_guesses), miss penalty           |
//! | Active   | `hint`                     | Active, hint penalty; ignored at the cap      |
//! | Active   | `reveal(solved / giveup)`  | Revealed, no penalty                          |
//! | Revealed | `reset`                    | Idle                                          |
//!
//! Anything else is a [`RoundError::InvalidTransition`].

use std::time::Duration;

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::action::{Action, RevealReason, sanitize_guess};
use crate::clock::Timestamp;
use crate::error::{ActionFault, RoundError};
use crate::state::{ActiveRound, RoundState};

/// Tunable parameters of a round.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct RoundRules {
    /// Score at round start and upper bound of the score.
    max_score: u32,
    /// Distinct guesses per round.
    max_guesses: usize,
    /// Hints that may be bought per round.
    max_hints: u32,
    /// Points lost per hint.
    hint_penalty: u32,
    /// Points lost on timeout or when the guess budget runs out.
    miss_penalty: u32,
    /// Shortest allowed round.
    min_duration: Duration,
    /// Longest allowed round.
    max_duration: Duration,
    /// Characters kept from a guess.
    max_guess_len: usize,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            max_score: 5,
            max_guesses: 3,
            max_hints: 3,
            hint_penalty: 1,
            miss_penalty: 1,
            min_duration: Duration::from_secs(30),
            max_duration: Duration::from_secs(180),
            max_guess_len: 100,
        }
    }
}

impl RoundRules {
    /// Creates the standard rules.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamps a requested duration into the allowed range (never zero).
    pub fn clamp_duration(&self, requested: Duration) -> Duration {
        let upper = self.max_duration.max(self.min_duration);
        requested
            .clamp(self.min_duration, upper)
            .max(Duration::from_millis(1))
    }

    fn guess_budget(&self) -> usize {
        self.max_guesses.max(1)
    }

    /// Computes the state after `action`, leaving `state` untouched.
    ///
    /// # Errors
    ///
    /// [`RoundError::InvalidAction`] for malformed payloads and
    /// [`RoundError::InvalidTransition`] for actions the current phase does
    /// not accept.
    #[instrument(skip(self, state, action), fields(phase = %state.phase(), action = %action))]
    pub fn reduce(&self, state: &RoundState, action: &Action) -> Result<RoundState, RoundError> {
        self.validate_payload(action)?;

        let next = match (state, action) {
            (RoundState::Idle, Action::Start { now, duration }) => {
                let deadline = now.saturating_add(self.clamp_duration(*duration));
                if deadline <= *now {
                    return Err(RoundError::invalid_action(
                        action,
                        ActionFault::DeadlineOverflow { start: *now },
                    ));
                }
                RoundState::Active(ActiveRound::begin(*now, deadline, self.max_score))
            }
            (RoundState::Idle, Action::Reset) => RoundState::Idle,
            (RoundState::Active(round), Action::Tick { now }) => {
                ensure_not_before_start(round, action, *now)?;
                if *now < *round.deadline() {
                    RoundState::Active(round.clone())
                } else {
                    RoundState::Revealed(round.finish(*now, RevealReason::Timeout, self.miss_penalty))
                }
            }
            (RoundState::Active(round), Action::Guess { text, at }) => {
                ensure_not_before_start(round, action, *at)?;
                let guess = sanitize_guess(text, self.max_guess_len);
                if round.has_guessed(&guess) {
                    debug!(guess = %guess, "Ignoring duplicate guess");
                    RoundState::Active(round.clone())
                } else {
                    let round = round.with_guess(guess);
                    if round.guesses().len() >= self.guess_budget() {
                        RoundState::Revealed(round.finish(*at, RevealReason::MaxGuesses, self.miss_penalty))
                    } else {
                        RoundState::Active(round)
                    }
                }
            }
            (RoundState::Active(round), Action::Hint) => {
                if *round.hints_used() >= self.max_hints {
                    debug!(hints_used = round.hints_used(), "Hint cap reached");
                    RoundState::Active(round.clone())
                } else {
                    RoundState::Active(round.with_hint(self.hint_penalty, self.max_score))
                }
            }
            (RoundState::Active(round), Action::Reveal { reason, at }) => {
                ensure_not_before_start(round, action, *at)?;
                RoundState::Revealed(round.finish(*at, *reason, 0))
            }
            (RoundState::Revealed(_), Action::Reset) => RoundState::Idle,
            _ => return Err(RoundError::invalid_transition(action, state)),
        };

        debug!(next = %next.phase(), "Transition applied");
        Ok(next)
    }

    /// Records a guess already known to name the target and ends the round
    /// as solved.
    ///
    /// Equivalent to `guess(text)` followed by `reveal(solved)`, except that
    /// a guess filling the budget still counts as solved.
    ///
    /// # Errors
    ///
    /// Same as [`RoundRules::reduce`] for the `guess` action.
    #[instrument(skip(self, state), fields(phase = %state.phase()))]
    pub fn reduce_solving_guess(
        &self,
        state: &RoundState,
        text: &str,
        at: Timestamp,
    ) -> Result<RoundState, RoundError> {
        let action = Action::guess(text, at);
        self.validate_payload(&action)?;

        let RoundState::Active(round) = state else {
            return Err(RoundError::invalid_transition(&action, state));
        };
        ensure_not_before_start(round, &action, at)?;

        let guess = sanitize_guess(text, self.max_guess_len);
        let round = if round.has_guessed(&guess) {
            round.clone()
        } else {
            round.with_guess(guess)
        };
        Ok(RoundState::Revealed(round.finish(at, RevealReason::Solved, 0)))
    }

    /// State-independent payload checks.
    fn validate_payload(&self, action: &Action) -> Result<(), RoundError> {
        match action {
            Action::Guess { text, .. } if sanitize_guess(text, self.max_guess_len).is_empty() => {
                Err(RoundError::invalid_action(action, ActionFault::BlankGuess))
            }
            Action::Reveal { reason, .. } if !reason.is_requestable() => Err(
                RoundError::invalid_action(action, ActionFault::UnrequestableReason(*reason)),
            ),
            _ => Ok(()),
        }
    }
}

fn ensure_not_before_start(round: &ActiveRound, action: &Action, at: Timestamp) -> Result<(), RoundError> {
    if at < *round.started_at() {
        return Err(RoundError::invalid_action(
            action,
            ActionFault::BeforeRoundStart {
                at,
                started_at: *round.started_at(),
            },
        ));
    }
    Ok(())
}
