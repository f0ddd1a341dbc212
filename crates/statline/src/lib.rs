//! Statline host: catalog, preferences and the terminal game loop.
//!
//! # Architecture
//!
//! - **Catalog**: player records with position-specific stat columns
//! - **Config**: TOML preferences resolved from flag, environment or defaults
//! - **Picker** and **Streak**: state that spans rounds
//! - **Play**: a [`Session`] of rounds and the tokio loop that drives it
//!
//! Round rules and name matching live in [`statline_round`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
pub mod cli;
mod config;
mod hints;
mod picker;
mod play;
mod render;
mod streak;

pub use catalog::{Catalog, CatalogError, PlayerRecord, Position, SeasonLine, StatColumn};
pub use config::{CONFIG_ENV, ConfigError, StatlineConfig};
pub use hints::{HINT_LADDER_LEN, hint_text};
pub use picker::TargetPicker;
pub use play::{Reply, Session, run};
pub use render::{countdown, outcome_line, reveal_summary, stat_table};
pub use streak::Streak;
