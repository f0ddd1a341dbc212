//! Player catalog: targets plus their season stat lines.
//!
//! Records are read from a JSON array. A record that fails to parse, has a
//! blank or unmatchable name or has no seasons is skipped with a warning;
//! the rest of the file still loads.

use std::collections::BTreeMap;
use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use statline_round::{MatchKind, MatchingEngine, Target, TargetId};
use strum::{EnumIter, EnumString};
use tracing::{debug, info, instrument, warn};

/// Catalog compiled into the binary, used when no file is given.
const EMBEDDED_CATALOG: &str = include_str!("../data/players.json");

/// Playing position; decides which stat columns are shown.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Position {
    /// Quarterback.
    #[serde(rename = "QB")]
    #[strum(serialize = "QB")]
    Quarterback,
    /// Running back.
    #[serde(rename = "RB")]
    #[strum(serialize = "RB")]
    RunningBack,
    /// Wide receiver.
    #[serde(rename = "WR")]
    #[strum(serialize = "WR")]
    WideReceiver,
    /// Tight end.
    #[serde(rename = "TE")]
    #[strum(serialize = "TE")]
    TightEnd,
}

/// One displayed stat: the record key it is read from and its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatColumn {
    /// Key in [`SeasonLine`] stats.
    pub key: &'static str,
    /// Column header.
    pub label: &'static str,
}

const fn column(key: &'static str, label: &'static str) -> StatColumn {
    StatColumn { key, label }
}

const PASSING: &[StatColumn] = &[
    column("games", "G"),
    column("pass_cmp", "Cmp"),
    column("pass_att", "Att"),
    column("pass_yds", "Yds"),
    column("pass_td", "TD"),
    column("pass_int", "Int"),
];

const RUSHING: &[StatColumn] = &[
    column("games", "G"),
    column("rush_att", "Att"),
    column("rush_yds", "Yds"),
    column("rush_td", "TD"),
    column("rec", "Rec"),
    column("rec_yds", "RecYds"),
];

const RECEIVING: &[StatColumn] = &[
    column("games", "G"),
    column("rec", "Rec"),
    column("rec_yds", "Yds"),
    column("rec_td", "TD"),
];

impl Position {
    /// The stats shown for this position, in display order.
    ///
    /// Keys outside this list are never read from a season line.
    pub fn stat_columns(self) -> &'static [StatColumn] {
        match self {
            Self::Quarterback => PASSING,
            Self::RunningBack => RUSHING,
            Self::WideReceiver | Self::TightEnd => RECEIVING,
        }
    }

    /// Human-readable position name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Quarterback => "Quarterback",
            Self::RunningBack => "Running back",
            Self::WideReceiver => "Wide receiver",
            Self::TightEnd => "Tight end",
        }
    }
}

/// One season of a player's career.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize, new)]
pub struct SeasonLine {
    /// Season year.
    year: u16,
    /// Team abbreviation.
    team: String,
    /// Raw stat values by key.
    #[serde(default)]
    stats: BTreeMap<String, f64>,
}

impl SeasonLine {
    /// Value of a displayed column, if recorded.
    pub fn stat(&self, column: &StatColumn) -> Option<f64> {
        self.stats.get(column.key).copied()
    }
}

/// A target together with the data used to present it.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize, new)]
pub struct PlayerRecord {
    /// Names the guesses are checked against.
    #[serde(flatten)]
    target: Target,
    /// Playing position.
    position: Position,
    /// Seasons played.
    seasons: Vec<SeasonLine>,
}

impl PlayerRecord {
    /// Earliest season on record.
    pub fn first_season(&self) -> Option<&SeasonLine> {
        self.seasons.iter().min_by_key(|season| season.year)
    }

    /// Seasons ordered by year.
    pub fn seasons_by_year(&self) -> Vec<&SeasonLine> {
        let mut seasons: Vec<&SeasonLine> = self.seasons.iter().collect();
        seasons.sort_by_key(|season| season.year);
        seasons
    }

    fn problem(&self) -> Option<&'static str> {
        if !self.target.is_well_formed() {
            Some("blank name field")
        } else if !self.target.is_matchable() {
            Some("name without matchable letters")
        } else if self.seasons.is_empty() {
            Some("no seasons")
        } else {
            None
        }
    }
}

/// The set of players rounds are drawn from.
#[derive(Debug, Clone, Default, Getters)]
pub struct Catalog {
    /// Valid records, in file order.
    players: Vec<PlayerRecord>,
}

impl Catalog {
    /// Parses a JSON array of player records, skipping malformed entries.
    ///
    /// # Errors
    ///
    /// Fails if the text is not a JSON array or no record is usable.
    #[instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| CatalogError::new(format!("Catalog is not a JSON array: {}", e)))?;

        let mut players: Vec<PlayerRecord> = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            let record = match serde_json::from_value::<PlayerRecord>(value) {
                Ok(record) => record,
                Err(e) => {
                    warn!(index, error = %e, "Skipping unreadable player record");
                    continue;
                }
            };
            if let Some(problem) = record.problem() {
                warn!(index, id = %record.target.id(), problem, "Skipping invalid player record");
                continue;
            }
            if players.iter().any(|known| known.target.id() == record.target.id()) {
                warn!(index, id = %record.target.id(), "Skipping duplicate player id");
                continue;
            }
            players.push(record);
        }

        if players.is_empty() {
            return Err(CatalogError::new("Catalog has no usable player records"));
        }
        info!(players = players.len(), "Catalog loaded");
        Ok(Self { players })
    }

    /// Loads a catalog file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CatalogError::new(format!("Failed to read catalog file: {}", e)))?;
        Self::from_json(&json)
    }

    /// The catalog compiled into the binary.
    #[instrument]
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Loads `path` when given, else the embedded catalog.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No catalog file given, using embedded catalog");
                Self::embedded()
            }
        }
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if the catalog has no players.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Looks a player up by id.
    pub fn get(&self, id: &TargetId) -> Option<&PlayerRecord> {
        self.players.iter().find(|record| record.target.id() == id)
    }

    /// Every target, for precomputing a matching engine.
    pub fn targets(&self) -> Vec<Target> {
        self.players.iter().map(|record| record.target.clone()).collect()
    }

    /// A matching engine with every target precomputed.
    pub fn matching_engine(&self, cache_capacity: usize) -> MatchingEngine {
        MatchingEngine::with_targets(&self.targets(), cache_capacity)
    }

    /// Which matching layer accepts `guess` for player `id`.
    ///
    /// # Errors
    ///
    /// Fails if no player has that id.
    #[instrument(skip(self, matcher))]
    pub fn explain(
        &self,
        matcher: &MatchingEngine,
        id: &str,
        guess: &str,
    ) -> Result<Option<MatchKind>, CatalogError> {
        let record = self
            .get(&TargetId::from(id))
            .ok_or_else(|| CatalogError::new(format!("No player with id {}", id)))?;
        Ok(matcher.explain(guess, record.target()))
    }
}

/// Catalog error.
#[derive(Debug, Clone, Display, Error)]
#[display("Catalog error: {} at {}:{}", message, file, line)]
pub struct CatalogError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl CatalogError {
    /// Creates a new catalog error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
