//! Interactive play: a session of rounds driven by stdin and a tick timer.
//!
//! [`Session`] holds all game logic and is synchronous; [`run`] only moves
//! lines between the terminal and the session and delivers ticks.

use std::time::Duration;

use anyhow::{Result, anyhow};
use statline_round::{Clock, RoundEngine, RoundError, RoundState, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument};

use crate::catalog::{Catalog, PlayerRecord};
use crate::config::StatlineConfig;
use crate::hints::{HINT_LADDER_LEN, hint_text};
use crate::picker::TargetPicker;
use crate::render::{countdown, outcome_line, reveal_summary, stat_table};
use crate::streak::Streak;

/// What the host should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print these lines and keep reading.
    Lines(Vec<String>),
    /// Print these lines and stop.
    Quit(Vec<String>),
}

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Hint,
    GiveUp,
    Quit,
    Unknown(&'a str),
    Guess(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => Self::Empty,
            "/hint" => Self::Hint,
            "/giveup" => Self::GiveUp,
            "/quit" => Self::Quit,
            command if command.starts_with('/') => Self::Unknown(command),
            guess => Self::Guess(guess),
        }
    }
}

/// A sequence of rounds against targets from one catalog.
#[derive(Debug)]
pub struct Session<C: Clock> {
    engine: RoundEngine<C>,
    catalog: Catalog,
    picker: TargetPicker,
    streak: Streak,
    duration: Duration,
    rounds_left: Option<u32>,
}

impl<C: Clock> Session<C> {
    /// Creates a session; no round is started yet.
    #[instrument(skip_all, fields(players = catalog.len()))]
    pub fn new(config: &StatlineConfig, catalog: Catalog, picker: TargetPicker, clock: C) -> Self {
        let rules = config.round_rules();
        let max_hints = (*rules.max_hints()).min(HINT_LADDER_LEN);
        let rules = rules.with_max_hints(max_hints);
        let duration = rules.clamp_duration(config.round_duration());
        let matcher = catalog.matching_engine(*config.cache_capacity());
        Self {
            engine: RoundEngine::new(rules, matcher, clock),
            catalog,
            picker,
            streak: Streak::default(),
            duration,
            rounds_left: None,
        }
    }

    /// Stops the session after `rounds` finished rounds.
    pub fn with_round_limit(mut self, rounds: Option<u32>) -> Self {
        self.rounds_left = rounds;
        self
    }

    /// The round engine.
    pub fn engine(&self) -> &RoundEngine<C> {
        &self.engine
    }

    /// Streak so far.
    pub fn streak(&self) -> &Streak {
        &self.streak
    }

    /// Returns `true` while a round needs ticks.
    pub fn wants_ticks(&self) -> bool {
        self.engine.state().wants_ticks()
    }

    /// Picks a target and starts a round.
    ///
    /// # Errors
    ///
    /// Fails for an empty catalog or while a round is active.
    #[instrument(skip(self))]
    pub fn begin_round(&mut self) -> Result<Vec<String>> {
        if self.engine.state().revealed().is_some() {
            self.engine.reset()?;
        }
        let record = self
            .picker
            .pick(&self.catalog)
            .ok_or_else(|| anyhow!("Catalog has no players"))?
            .clone();
        self.engine.start(record.target().clone(), self.duration)?;

        let mut lines = vec![format!("Round {}. Name this player.", self.streak.played() + 1)];
        lines.push(stat_table(&record));
        lines.push(format!(
            "{} guesses, {}s. Commands: /hint /giveup /quit",
            self.engine.rules().max_guesses(),
            self.duration.as_secs()
        ));
        Ok(lines)
    }

    /// Handles one line of input.
    ///
    /// # Errors
    ///
    /// Fails only on engine errors the player cannot cause.
    #[instrument(skip(self))]
    pub fn handle_line(&mut self, line: &str) -> Result<Reply> {
        let input = Input::parse(line);
        if input == Input::Quit {
            return Ok(Reply::Quit(vec![self.farewell()]));
        }
        if !self.wants_ticks() {
            return self.begin_round().map(Reply::Lines);
        }

        let mut lines = Vec::new();
        match input {
            Input::Empty => {
                if let Some(remaining) = self.engine.remaining() {
                    lines.push(countdown(remaining));
                }
            }
            Input::Hint => lines.push(self.hint()?),
            Input::GiveUp => {
                self.engine.give_up()?;
            }
            Input::Unknown(command) => lines.push(format!("Unknown command {command}")),
            Input::Guess(guess) => match self.engine.submit_guess(guess) {
                Ok(outcome) => lines.push(outcome_line(outcome)),
                Err(e) if e.is_validation() => lines.push(e.to_string()),
                Err(e) => return Err(e.into()),
            },
            Input::Quit => {}
        }

        if self.engine.state().revealed().is_some() {
            return Ok(self.finish_round(lines));
        }
        Ok(Reply::Lines(lines))
    }

    /// Delivers a tick; returns the round summary if the round timed out.
    ///
    /// # Errors
    ///
    /// Fails only on engine errors.
    pub fn tick(&mut self) -> Result<Option<Reply>> {
        if !self.wants_ticks() {
            return Ok(None);
        }
        self.engine.tick()?;
        if self.engine.state().revealed().is_some() {
            return Ok(Some(self.finish_round(Vec::new())));
        }
        Ok(None)
    }

    fn current(&self) -> Option<&PlayerRecord> {
        self.engine
            .target()
            .and_then(|target| self.catalog.get(target.id()))
    }

    fn hint(&mut self) -> Result<String, RoundError> {
        let text = self
            .engine
            .request_hint()?
            .and_then(|number| self.current().and_then(|record| hint_text(record, number)));
        let score = self.engine.state().active().map_or(0, |round| *round.score());
        Ok(match text {
            Some(text) => format!("{text} (score now {score})"),
            None => "No more hints.".to_string(),
        })
    }

    fn finish_round(&mut self, mut lines: Vec<String>) -> Reply {
        let RoundState::Revealed(round) = self.engine.state() else {
            return Reply::Lines(lines);
        };
        self.streak.record(round);
        if let Some(record) = self.current() {
            lines.push(reveal_summary(record, round, &self.streak));
        }
        info!(played = self.streak.played(), "Round finished");

        if let Some(left) = self.rounds_left.as_mut() {
            *left = left.saturating_sub(1);
            if *left == 0 {
                lines.push(self.farewell());
                return Reply::Quit(lines);
            }
        }
        lines.push("Press Enter for the next round, or /quit.".to_string());
        Reply::Lines(lines)
    }

    fn farewell(&self) -> String {
        format!(
            "Played {} rounds, total score {}, best streak {}.",
            self.streak.played(),
            self.streak.total_score(),
            self.streak.best()
        )
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Plays rounds on the terminal until `/quit`, end of input or the round
/// limit.
#[instrument(skip(config, catalog))]
pub async fn run(
    config: StatlineConfig,
    catalog: Catalog,
    rounds: Option<u32>,
    seed: Option<u64>,
) -> Result<()> {
    let picker = match seed {
        Some(seed) => TargetPicker::with_seed(*config.recent_window(), seed),
        None => TargetPicker::new(*config.recent_window()),
    };
    let mut session = Session::new(&config, catalog, picker, SystemClock::new()).with_round_limit(rounds);
    print_lines(&session.begin_round()?);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let reply = tokio::select! {
            _ = ticker.tick(), if session.wants_ticks() => session.tick()?,
            line = input.next_line() => match line? {
                Some(line) => Some(session.handle_line(&line)?),
                None => {
                    debug!("Input closed");
                    break;
                }
            },
        };

        match reply {
            Some(Reply::Lines(lines)) => print_lines(&lines),
            Some(Reply::Quit(lines)) => {
                print_lines(&lines);
                break;
            }
            None => {}
        }
    }

    info!(played = session.streak().played(), "Session ended");
    Ok(())
}
