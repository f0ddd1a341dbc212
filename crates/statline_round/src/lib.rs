//! Round engine for a statline guessing game.
//!
//! A hidden athlete is shown only through a season-by-season stat table.
//! The player has a few guesses and a time budget to name them, and may buy
//! hints at a score cost.
//!
//! # Architecture
//!
//! - **Normalizer** ([`normalize`], [`tokenize`]): canonical comparable text
//! - **Cache** ([`LruCache`], [`MatchCache`]): bounded memo of match verdicts
//! - **Matcher** ([`MatchingEngine`]): layered name matching
//! - **Clock** ([`Clock`], [`SystemClock`], [`ManualClock`]): injected time
//! - **Rules** ([`RoundRules`]): the pure `reduce(state, action)` function
//! - **Machine** ([`RoundMachine`]): current state plus dispatch
//! - **Engine** ([`RoundEngine`]): wires the matcher into guesses
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use statline_round::{
//!     GuessOutcome, ManualClock, MatchingEngine, RoundEngine, RoundRules, Target, Timestamp,
//! };
//!
//! let clock = Arc::new(ManualClock::new(Timestamp::ZERO));
//! let mut engine = RoundEngine::new(RoundRules::new(), MatchingEngine::new(), clock.clone());
//!
//! let target = Target::new("JameLe00", "LeBron", "James", "LeBron James");
//! engine.start(target, Duration::from_secs(60))?;
//!
//! assert_eq!(engine.submit_guess("James LeBron")?, GuessOutcome::Correct);
//! # Ok::<(), statline_round::RoundError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod cache;
mod clock;
mod engine;
mod error;
mod invariants;
mod machine;
mod matcher;
mod normalize;
mod rules;
mod state;
mod target;

pub use action::{Action, RevealReason, sanitize_guess};
pub use cache::{DEFAULT_CACHE_CAPACITY, LruCache, MatchCache, MatchKey};
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use engine::{GuessOutcome, RoundEngine, RoundObserver};
pub use error::{ActionFault, RoundError};
pub use invariants::{
    BudgetsRespected, DeadlineAfterStart, Invariant, InvariantSet, InvariantViolation,
    RoundInvariants, ScoreInRange, check_invariants,
};
pub use machine::RoundMachine;
pub use matcher::{CACHE_KEY_LEN, MAX_INPUT_LEN, MatchKind, MatchingEngine, TOKEN_SET_THRESHOLD};
pub use normalize::{MAX_NORMALIZED_LEN, MAX_TOKENS, normalize, normalize_bytes, tokenize};
pub use rules::RoundRules;
pub use state::{ActiveRound, RevealedRound, RoundPhase, RoundState};
pub use target::{MAX_ALIASES, Target, TargetId};
