//! First-class invariants for round states.
//!
//! Invariants are properties every reachable state satisfies under a given
//! set of rules. The machine checks them after each transition in debug
//! builds; tests check them directly.

use crate::rules::RoundRules;
use crate::state::RoundState;

/// A property that must hold for every reachable round state.
pub trait Invariant {
    /// Checks the invariant against `state` under `rules`.
    fn holds(rules: &RoundRules, state: &RoundState) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Invariants that can be checked together.
pub trait InvariantSet {
    /// Checks every invariant in the set, collecting all violations.
    fn check_all(rules: &RoundRules, state: &RoundState) -> Result<(), Vec<InvariantViolation>>;
}

impl<I1, I2, I3> InvariantSet for (I1, I2, I3)
where
    I1: Invariant,
    I2: Invariant,
    I3: Invariant,
{
    fn check_all(rules: &RoundRules, state: &RoundState) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(rules, state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(rules, state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if !I3::holds(rules, state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Score stays within `[0, max_score]`.
pub struct ScoreInRange;

impl Invariant for ScoreInRange {
    fn holds(rules: &RoundRules, state: &RoundState) -> bool {
        match state {
            RoundState::Idle => true,
            RoundState::Active(round) => round.score() <= rules.max_score(),
            RoundState::Revealed(round) => round.final_score() <= rules.max_score(),
        }
    }

    fn description() -> &'static str {
        "Score stays within [0, max_score]"
    }
}

/// An active round has guesses left and hints within the cap.
pub struct BudgetsRespected;

impl Invariant for BudgetsRespected {
    fn holds(rules: &RoundRules, state: &RoundState) -> bool {
        match state {
            RoundState::Idle => true,
            RoundState::Active(round) => {
                round.guesses().len() < (*rules.max_guesses()).max(1)
                    && round.hints_used() <= rules.max_hints()
            }
            RoundState::Revealed(round) => round.hints_used() <= rules.max_hints(),
        }
    }

    fn description() -> &'static str {
        "Active rounds have guesses left and hints within the cap"
    }
}

/// An active round's deadline is after its start.
pub struct DeadlineAfterStart;

impl Invariant for DeadlineAfterStart {
    fn holds(_rules: &RoundRules, state: &RoundState) -> bool {
        match state {
            RoundState::Active(round) => round.deadline() > round.started_at(),
            _ => true,
        }
    }

    fn description() -> &'static str {
        "Deadline is later than round start"
    }
}

/// All round invariants as a composable set.
pub type RoundInvariants = (ScoreInRange, BudgetsRespected, DeadlineAfterStart);

/// Checks every round invariant.
pub fn check_invariants(rules: &RoundRules, state: &RoundState) -> Result<(), Vec<InvariantViolation>> {
    RoundInvariants::check_all(rules, state)
}
