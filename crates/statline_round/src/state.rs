//! Round state: exactly one of idle, active or revealed.
//!
//! Each phase carries only the fields that exist in that phase. A revealed
//! round always has a reason and a final score, never `Option`s of them.

use std::time::Duration;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::action::RevealReason;
use crate::clock::Timestamp;

/// Phase tag of a [`RoundState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// No round in play.
    Idle,
    /// Accepting guesses and hints.
    Active,
    /// Finished; waiting for reset.
    Revealed,
}

/// A round in play.
///
/// Invariants: `deadline > started_at`, fewer guesses than the budget,
/// `score` within `[0, max_score]`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ActiveRound {
    /// When the round started.
    started_at: Timestamp,
    /// First instant at which the round has timed out.
    deadline: Timestamp,
    /// Distinct sanitized guesses, oldest first.
    guesses: Vec<String>,
    /// Hints bought so far.
    hints_used: u32,
    /// Current score.
    score: u32,
}

impl ActiveRound {
    pub(crate) fn begin(started_at: Timestamp, deadline: Timestamp, score: u32) -> Self {
        Self {
            started_at,
            deadline,
            guesses: Vec::new(),
            hints_used: 0,
            score,
        }
    }

    /// Time left before the deadline at `now`.
    pub fn remaining(&self, now: Timestamp) -> Duration {
        self.deadline.saturating_since(now)
    }

    /// Returns `true` if `guess` (already sanitized) was guessed before.
    pub fn has_guessed(&self, guess: &str) -> bool {
        self.guesses.iter().any(|earlier| earlier == guess)
    }

    /// A copy with `guess` appended.
    pub(crate) fn with_guess(&self, guess: String) -> Self {
        let mut next = self.clone();
        next.guesses.push(guess);
        next
    }

    /// A copy with one more hint bought and `penalty` taken off the score.
    pub(crate) fn with_hint(&self, penalty: u32, max_score: u32) -> Self {
        let mut next = self.clone();
        next.hints_used += 1;
        next.score = self.score.saturating_sub(penalty).min(max_score);
        next
    }

    /// Ends the round, taking `penalty` off the score.
    pub(crate) fn finish(&self, ended_at: Timestamp, reason: RevealReason, penalty: u32) -> RevealedRound {
        RevealedRound {
            ended_at,
            reason,
            final_score: self.score.saturating_sub(penalty),
            guesses: self.guesses.clone(),
            hints_used: self.hints_used,
        }
    }
}

/// A finished round.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct RevealedRound {
    /// When the round ended.
    ended_at: Timestamp,
    /// Why it ended.
    reason: RevealReason,
    /// Score after any end-of-round penalty.
    final_score: u32,
    /// Guesses made during the round.
    guesses: Vec<String>,
    /// Hints bought during the round.
    hints_used: u32,
}

impl RevealedRound {
    /// Returns `true` if the player named the target.
    pub fn is_solved(&self) -> bool {
        self.reason == RevealReason::Solved
    }
}

/// The state of the round engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RoundState {
    /// No round in play.
    #[default]
    Idle,
    /// A round in play.
    Active(ActiveRound),
    /// A finished round.
    Revealed(RevealedRound),
}

impl RoundState {
    /// Returns the phase tag.
    pub fn phase(&self) -> RoundPhase {
        match self {
            Self::Idle => RoundPhase::Idle,
            Self::Active(_) => RoundPhase::Active,
            Self::Revealed(_) => RoundPhase::Revealed,
        }
    }

    /// Returns the active round, if any.
    pub fn active(&self) -> Option<&ActiveRound> {
        match self {
            Self::Active(round) => Some(round),
            _ => None,
        }
    }

    /// Returns the revealed round, if any.
    pub fn revealed(&self) -> Option<&RevealedRound> {
        match self {
            Self::Revealed(round) => Some(round),
            _ => None,
        }
    }

    /// Returns `true` when the host should keep delivering ticks.
    pub fn wants_ticks(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Guesses recorded so far in either live or finished rounds.
    pub fn guesses(&self) -> &[String] {
        match self {
            Self::Idle => &[],
            Self::Active(round) => round.guesses(),
            Self::Revealed(round) => round.guesses(),
        }
    }
}
