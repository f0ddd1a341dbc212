//! Target selection across rounds.

use std::collections::VecDeque;

use rand::prelude::*;
use statline_round::TargetId;
use tracing::{debug, instrument};

use crate::catalog::{Catalog, PlayerRecord};

/// Picks targets uniformly at random, avoiding recently played ones.
#[derive(Debug)]
pub struct TargetPicker {
    recent: VecDeque<TargetId>,
    window: usize,
    rng: StdRng,
}

impl TargetPicker {
    /// Creates a picker remembering the last `window` targets.
    #[instrument]
    pub fn new(window: usize) -> Self {
        Self::with_rng(window, StdRng::from_os_rng())
    }

    /// Creates a reproducible picker.
    #[instrument]
    pub fn with_seed(window: usize, seed: u64) -> Self {
        Self::with_rng(window, StdRng::seed_from_u64(seed))
    }

    fn with_rng(window: usize, rng: StdRng) -> Self {
        Self {
            recent: VecDeque::with_capacity(window),
            window,
            rng,
        }
    }

    /// Ids picked recently, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &TargetId> {
        self.recent.iter()
    }

    /// Picks the next target.
    ///
    /// When every player was seen recently, any player may be picked.
    /// Returns `None` only for an empty catalog.
    #[instrument(skip(self, catalog), fields(players = catalog.len()))]
    pub fn pick<'a>(&mut self, catalog: &'a Catalog) -> Option<&'a PlayerRecord> {
        let fresh: Vec<&PlayerRecord> = catalog
            .players()
            .iter()
            .filter(|record| !self.recent.contains(record.target().id()))
            .collect();

        let chosen = if fresh.is_empty() {
            debug!("Every player seen recently, picking from the full catalog");
            catalog.players().choose(&mut self.rng)?
        } else {
            *fresh.choose(&mut self.rng)?
        };

        self.remember(chosen.target().id().clone());
        debug!(target_id = %chosen.target().id(), "Picked target");
        Some(chosen)
    }

    fn remember(&mut self, id: TargetId) {
        if self.window == 0 {
            return;
        }
        self.recent.retain(|seen| *seen != id);
        self.recent.push_back(id);
        while self.recent.len() > self.window {
            self.recent.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_repeats_within_window() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        let window = catalog.len() - 1;
        let mut picker = TargetPicker::with_seed(window, 7);

        let ids: Vec<TargetId> = (0..catalog.len())
            .map(|_| picker.pick(&catalog).expect("non-empty").target().id().clone())
            .collect();
        let unique: HashSet<&TargetId> = ids.iter().collect();
        assert_eq!(unique.len(), catalog.len());
    }

    #[test]
    fn test_window_is_bounded() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        let mut picker = TargetPicker::with_seed(2, 1);
        for _ in 0..10 {
            picker.pick(&catalog);
        }
        assert_eq!(picker.recent().count(), 2);
    }

    #[test]
    fn test_empty_catalog() {
        let mut picker = TargetPicker::with_seed(3, 1);
        assert!(picker.pick(&Catalog::default()).is_none());
    }
}
