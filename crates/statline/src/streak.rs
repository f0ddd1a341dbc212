//! Solve streaks for the lifetime of the process.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use statline_round::RevealedRound;
use tracing::{info, instrument};

/// Consecutive solved rounds, best run and totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Streak {
    /// Solved rounds in a row, ending with the latest round.
    current: u32,
    /// Longest run so far.
    best: u32,
    /// Rounds finished.
    played: u32,
    /// Sum of final scores.
    total_score: u32,
}

impl Streak {
    /// Folds a finished round into the streak.
    #[instrument(skip(self, round), fields(reason = %round.reason()))]
    pub fn record(&mut self, round: &RevealedRound) {
        self.played += 1;
        self.total_score += round.final_score();
        if round.is_solved() {
            self.current += 1;
            self.best = self.best.max(self.current);
        } else {
            self.current = 0;
        }
        info!(current = self.current, best = self.best, "Streak updated");
    }
}
