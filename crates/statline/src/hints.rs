//! The hint ladder: each hint gives away a little more.

use tracing::instrument;

use crate::catalog::PlayerRecord;

/// Number of distinct hints a player has.
pub const HINT_LADDER_LEN: u32 = 3;

/// Text of hint `number` (1-based), or `None` past the end of the ladder.
#[instrument(skip(record), fields(target_id = %record.target().id()))]
pub fn hint_text(record: &PlayerRecord, number: u32) -> Option<String> {
    match number {
        1 => Some(format!("Position: {}", record.position().label())),
        2 => record
            .first_season()
            .map(|season| format!("First season: {} with {}", season.year(), season.team())),
        3 => record
            .target()
            .first_name()
            .trim()
            .chars()
            .next()
            .map(|initial| format!("First name starts with {}", initial.to_uppercase())),
        _ => None,
    }
}
