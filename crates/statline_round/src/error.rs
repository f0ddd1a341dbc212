//! Errors raised by the round state machine.
//!
//! Two disjoint kinds: a malformed action ([`RoundError::InvalidAction`])
//! and a well-formed action sent in the wrong phase
//! ([`RoundError::InvalidTransition`]). Either way the state is unchanged.

use derive_more::{Display, Error};

use crate::action::{Action, RevealReason};
use crate::clock::Timestamp;
use crate::state::RoundState;

/// What is wrong with an action's payload.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ActionFault {
    /// The guess is empty after sanitization.
    #[display("guess is blank")]
    BlankGuess,

    /// `reveal` asked for a reason only the machine may choose.
    #[display("reveal reason {_0} cannot be requested")]
    UnrequestableReason(RevealReason),

    /// The action's time is earlier than the round start.
    #[display("time {at} precedes round start {started_at}")]
    BeforeRoundStart {
        /// Time carried by the action.
        at: Timestamp,
        /// Start of the active round.
        started_at: Timestamp,
    },

    /// A round starting at this time would have no representable deadline.
    #[display("no deadline representable after start {start}")]
    DeadlineOverflow {
        /// Requested start time.
        start: Timestamp,
    },
}

/// Round state machine error.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RoundError {
    /// The action's payload is malformed.
    #[display("Invalid action {action}: {fault}")]
    InvalidAction {
        /// The rejected action.
        action: Action,
        /// What is wrong with it.
        fault: ActionFault,
    },

    /// The action is not accepted in the current phase.
    #[display("Invalid transition: {action} while {}", state.phase())]
    InvalidTransition {
        /// The rejected action.
        action: Action,
        /// The state that rejected it.
        state: Box<RoundState>,
    },
}

impl RoundError {
    pub(crate) fn invalid_action(action: &Action, fault: ActionFault) -> Self {
        Self::InvalidAction {
            action: action.clone(),
            fault,
        }
    }

    pub(crate) fn invalid_transition(action: &Action, state: &RoundState) -> Self {
        Self::InvalidTransition {
            action: action.clone(),
            state: Box::new(state.clone()),
        }
    }

    /// Returns `true` for payload validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidAction { .. })
    }

    /// Returns `true` for wrong-phase failures.
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// The rejected action.
    pub fn action(&self) -> &Action {
        match self {
            Self::InvalidAction { action, .. } | Self::InvalidTransition { action, .. } => action,
        }
    }
}
