//! First-class actions for the round state machine.
//!
//! Actions carry every input a transition needs, including the time, so
//! the reducer never consults a clock.

use std::time::Duration;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

use crate::clock::Timestamp;

/// Why a round ended.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum RevealReason {
    /// A guess matched the target.
    #[strum(serialize = "solved")]
    #[serde(rename = "solved")]
    Solved,
    /// The deadline passed.
    #[strum(serialize = "timeout")]
    #[serde(rename = "timeout")]
    Timeout,
    /// The player gave up.
    #[strum(serialize = "giveup")]
    #[serde(rename = "giveup")]
    GiveUp,
    /// The guess budget ran out.
    #[strum(to_string = "max_guesses", serialize = "maxguesses")]
    #[serde(rename = "max_guesses", alias = "maxGuesses")]
    MaxGuesses,
}

impl RevealReason {
    /// Returns `true` for reasons a caller may request with [`Action::Reveal`].
    ///
    /// Timeouts and exhausted budgets are reached only through `tick` and
    /// `guess`.
    pub fn is_requestable(self) -> bool {
        matches!(self, Self::Solved | Self::GiveUp)
    }
}

/// An input to the round state machine.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Begin a round at `now` lasting `duration` (clamped by the rules).
    #[display("start(now={now}, duration={}s)", duration.as_secs())]
    Start {
        /// Current time.
        now: Timestamp,
        /// Requested round length.
        duration: Duration,
    },
    /// Deliver the current time.
    #[display("tick({now})")]
    Tick {
        /// Current time.
        now: Timestamp,
    },
    /// Record a guess.
    #[display("guess({text:?})")]
    Guess {
        /// Raw guess text; sanitized by the reducer.
        text: String,
        /// Time of the guess.
        at: Timestamp,
    },
    /// Buy a hint.
    #[display("hint")]
    Hint,
    /// End the round on request.
    #[display("reveal({reason})")]
    Reveal {
        /// `solved` or `giveup`.
        reason: RevealReason,
        /// Time of the request.
        at: Timestamp,
    },
    /// Return a finished round to idle.
    #[display("reset")]
    Reset,
}

impl Action {
    /// Creates a `guess` action.
    pub fn guess(text: impl Into<String>, at: Timestamp) -> Self {
        Self::Guess {
            text: text.into(),
            at,
        }
    }

    /// Creates a `reveal` action.
    pub fn reveal(reason: RevealReason, at: Timestamp) -> Self {
        Self::Reveal { reason, at }
    }

    /// The time carried by the action, if any.
    pub fn time(&self) -> Option<Timestamp> {
        match self {
            Self::Start { now, .. } | Self::Tick { now } => Some(*now),
            Self::Guess { at, .. } | Self::Reveal { at, .. } => Some(*at),
            Self::Hint | Self::Reset => None,
        }
    }
}

/// Trims, collapses internal whitespace and truncates a guess to
/// `max_chars` characters.
pub fn sanitize_guess(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(max_chars).collect();
    truncated.trim_end().to_owned()
}
