//! Plain-text presentation of stat lines and round results.

use std::fmt::Write as _;
use std::time::Duration;

use statline_round::{GuessOutcome, RevealReason, RevealedRound};

use crate::catalog::PlayerRecord;
use crate::streak::Streak;

/// The target's season table, without any name.
pub fn stat_table(record: &PlayerRecord) -> String {
    let columns = record.position().stat_columns();
    let mut header: Vec<String> = vec!["Year".to_string(), "Team".to_string()];
    header.extend(columns.iter().map(|column| column.label.to_string()));

    let rows: Vec<Vec<String>> = record
        .seasons_by_year()
        .into_iter()
        .map(|season| {
            let mut row = vec![season.year().to_string(), season.team().clone()];
            row.extend(columns.iter().map(|column| format_stat(season.stat(column))));
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            rows.iter()
                .map(|row| row[i].len())
                .chain([header[i].len()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in std::iter::once(&header).chain(rows.iter()) {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i < 2 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

fn format_stat(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.1}"),
    }
}

/// One line describing a guess result.
pub fn outcome_line(outcome: GuessOutcome) -> String {
    match outcome {
        GuessOutcome::Correct => "Correct!".to_string(),
        GuessOutcome::Incorrect { remaining: 0 } => "Wrong. No guesses left.".to_string(),
        GuessOutcome::Incorrect { remaining: 1 } => "Wrong. 1 guess left.".to_string(),
        GuessOutcome::Incorrect { remaining } => format!("Wrong. {remaining} guesses left."),
        GuessOutcome::Duplicate => "Already guessed that.".to_string(),
        GuessOutcome::TooLate => "Too late!".to_string(),
    }
}

/// Whole seconds left, rounded up.
pub fn countdown(remaining: Duration) -> String {
    let secs = remaining.as_millis().div_ceil(1000);
    format!("{secs}s left")
}

/// Summary shown when a round ends.
pub fn reveal_summary(record: &PlayerRecord, round: &RevealedRound, streak: &Streak) -> String {
    let verdict = match round.reason() {
        RevealReason::Solved => "Solved",
        RevealReason::Timeout => "Time's up",
        RevealReason::GiveUp => "Gave up",
        RevealReason::MaxGuesses => "Out of guesses",
    };
    format!(
        "{verdict}: it was {}. Score {} ({} hints). Streak {} (best {}).",
        record.target().display_name(),
        round.final_score(),
        round.hints_used(),
        streak.current(),
        streak.best(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use statline_round::TargetId;

    #[test]
    fn test_table_hides_name() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        let moss = catalog.get(&TargetId::from("MossRa00")).expect("Moss in catalog");
        let table = stat_table(moss);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Year  Team"));
        assert!(lines[1].starts_with("1998  MIN"));
        assert!(lines[2].ends_with("23"));
        assert!(!table.contains("Moss"));
    }

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(None), "-");
        assert_eq!(format_stat(Some(4806.0)), "4806");
        assert_eq!(format_stat(Some(12.5)), "12.5");
    }

    #[test]
    fn test_countdown_rounds_up() {
        assert_eq!(countdown(Duration::from_millis(1)), "1s left");
        assert_eq!(countdown(Duration::from_secs(30)), "30s left");
        assert_eq!(countdown(Duration::ZERO), "0s left");
    }
}
