//! Stateful holder around the pure reducer.

use tracing::{info, instrument, warn};

use crate::action::Action;
use crate::clock::Timestamp;
use crate::error::RoundError;
use crate::rules::RoundRules;
use crate::state::RoundState;

/// Holds the current [`RoundState`] and applies actions to it.
///
/// A rejected action leaves the stored state exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct RoundMachine {
    rules: RoundRules,
    state: RoundState,
}

impl RoundMachine {
    /// Creates an idle machine.
    #[instrument]
    pub fn new(rules: RoundRules) -> Self {
        Self {
            rules,
            state: RoundState::Idle,
        }
    }

    /// Returns the rules.
    pub fn rules(&self) -> &RoundRules {
        &self.rules
    }

    /// Returns the current state.
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Applies `action`.
    ///
    /// # Errors
    ///
    /// Propagates [`RoundRules::reduce`] errors; the state is unchanged.
    #[instrument(skip(self, action), fields(action = %action))]
    pub fn dispatch(&mut self, action: Action) -> Result<&RoundState, RoundError> {
        let next = self.rules.reduce(&self.state, &action).inspect_err(|err| {
            warn!(error = %err, "Action rejected");
        })?;
        Ok(self.commit(next))
    }

    /// Applies a guess known to name the target; the round ends solved.
    ///
    /// # Errors
    ///
    /// Propagates [`RoundRules::reduce_solving_guess`] errors; the state is
    /// unchanged.
    #[instrument(skip(self))]
    pub fn dispatch_solving_guess(&mut self, text: &str, at: Timestamp) -> Result<&RoundState, RoundError> {
        let next = self
            .rules
            .reduce_solving_guess(&self.state, text, at)
            .inspect_err(|err| {
                warn!(error = %err, "Solving guess rejected");
            })?;
        Ok(self.commit(next))
    }

    fn commit(&mut self, next: RoundState) -> &RoundState {
        #[cfg(debug_assertions)]
        if let Err(violations) = crate::invariants::check_invariants(&self.rules, &next) {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            panic!("Round invariants violated: {descriptions}");
        }

        if self.state.phase() != next.phase() {
            info!(from = %self.state.phase(), to = %next.phase(), "Round phase changed");
        }
        self.state = next;
        &self.state
    }
}
