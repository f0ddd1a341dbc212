//! Layered name matching.
//!
//! A guess is checked against a target in increasing order of cost,
//! stopping at the first layer that accepts:
//!
//! 1. [`MatchKind::Exact`]: display name, or `"last, first"`
//! 2. [`MatchKind::Alias`]: any of the first ten aliases
//! 3. [`MatchKind::TokenSet`]: shared-token ratio against the display name
//! 4. [`MatchKind::LastNameInitial`]: `"t brady"` for Tom Brady
//!
//! Matching never fails. Malformed input or targets produce `false`.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, info, instrument, warn};

use crate::cache::{DEFAULT_CACHE_CAPACITY, MatchCache, MatchKey};
use crate::normalize::{MAX_NORMALIZED_LEN, MAX_TOKENS, normalize, tokenize};
use crate::target::{Target, TargetId};

/// Maximum raw input length, in characters, that is considered at all.
pub const MAX_INPUT_LEN: usize = 200;

/// Minimum shared-token ratio for a token-set match.
pub const TOKEN_SET_THRESHOLD: f64 = 0.75;

/// Characters of normalized input kept in a cache key.
///
/// Normalized text never exceeds [`MAX_NORMALIZED_LEN`], so keys never
/// alias two different normalized inputs.
pub const CACHE_KEY_LEN: usize = MAX_NORMALIZED_LEN;

/// The layer that accepted a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Equal to the display name or to `"last, first"`.
    Exact,
    /// Equal to an alias.
    Alias,
    /// Enough shared tokens with the display name, in any order.
    TokenSet,
    /// First initial followed by the last name.
    LastNameInitial,
}

/// Normalized forms of one target, computed once.
#[derive(Debug, Clone)]
struct PreparedTarget {
    source: Target,
    display: String,
    last_first: String,
    aliases: Vec<String>,
    display_tokens: HashSet<String>,
    last_name: String,
    first_initial: Option<char>,
}

impl PreparedTarget {
    /// Returns `None` for targets that must never match.
    fn prepare(target: &Target) -> Option<Self> {
        if !target.is_matchable() {
            return None;
        }

        let display = normalize(target.display_name());
        let last_name = normalize(target.last_name());
        let first_name = normalize(target.first_name());

        Some(Self {
            source: target.clone(),
            last_first: normalize(&format!("{}, {}", target.last_name(), target.first_name())),
            aliases: target
                .matchable_aliases()
                .iter()
                .map(|alias| normalize(alias))
                .filter(|alias| !alias.is_empty())
                .collect(),
            display_tokens: tokenize(target.display_name()).into_iter().collect(),
            first_initial: first_name.chars().next(),
            display,
            last_name,
        })
    }

    fn evaluate(&self, input: &str) -> Option<MatchKind> {
        if input == self.display || input == self.last_first {
            return Some(MatchKind::Exact);
        }

        if self.aliases.iter().any(|alias| alias == input) {
            return Some(MatchKind::Alias);
        }

        if token_set_ratio(input, &self.display_tokens) >= TOKEN_SET_THRESHOLD {
            return Some(MatchKind::TokenSet);
        }

        let parts: Vec<&str> = input.split(' ').collect();
        if let [initial, last] = parts.as_slice() {
            let mut initial_chars = initial.chars();
            let is_initial = match (initial_chars.next(), initial_chars.next()) {
                (Some(c), None) => Some(c) == self.first_initial,
                _ => false,
            };
            if is_initial && *last == self.last_name {
                return Some(MatchKind::LastNameInitial);
            }
        }

        None
    }
}

/// `|A ∩ B| / max(|A|, |B|, 1)` over the token sets of `input` and a target.
fn token_set_ratio(input: &str, target_tokens: &HashSet<String>) -> f64 {
    let input_tokens: HashSet<&str> = input
        .split(' ')
        .filter(|token| !token.is_empty())
        .take(MAX_TOKENS)
        .collect();
    let shared = input_tokens
        .iter()
        .filter(|token| target_tokens.contains(**token))
        .count();
    let denominator = input_tokens.len().max(target_tokens.len()).max(1);
    shared as f64 / denominator as f64
}

/// Decides whether free text names a target.
///
/// Owns its verdict cache; one engine is shared by every round that a host
/// plays, and independent hosts (or tests) construct their own.
#[derive(Debug)]
pub struct MatchingEngine {
    cache: MatchCache,
    prepared: HashMap<TargetId, PreparedTarget>,
}

impl MatchingEngine {
    /// Creates an engine with the default cache capacity and no
    /// precomputed targets.
    #[instrument]
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates an engine with a custom cache capacity.
    #[instrument]
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            cache: MatchCache::new(capacity),
            prepared: HashMap::new(),
        }
    }

    /// Creates an engine with normalized forms precomputed for `targets`.
    ///
    /// Malformed targets are skipped with a warning; they are still
    /// rejected at match time. A target whose names differ from the
    /// precomputed entry with the same id is prepared on demand instead.
    /// Cached verdicts are keyed by id, so call
    /// [`MatchingEngine::clear_cache`] after renaming a target.
    #[instrument(skip(targets), fields(count = targets.len()))]
    pub fn with_targets(targets: &[Target], capacity: usize) -> Self {
        let mut engine = Self::with_cache_capacity(capacity);
        for target in targets {
            match PreparedTarget::prepare(target) {
                Some(prepared) => {
                    engine.prepared.insert(target.id().clone(), prepared);
                }
                None => {
                    warn!(target_id = %target.id(), "Skipping malformed target during precompute");
                }
            }
        }
        info!(prepared = engine.prepared.len(), "Matching engine ready");
        engine
    }

    /// Returns `true` if `input` identifies `target`.
    #[instrument(skip(self, target), fields(target_id = %target.id()))]
    pub fn is_match(&self, input: &str, target: &Target) -> bool {
        if input.chars().count() > MAX_INPUT_LEN {
            debug!("Input exceeds maximum length");
            return false;
        }
        if !target.is_well_formed() {
            debug!("Target fails name invariant");
            return false;
        }

        let normalized = normalize(input);
        if normalized.is_empty() {
            return false;
        }

        let key = MatchKey::new(&normalized, target.id(), CACHE_KEY_LEN);
        if let Some(verdict) = self.cache.get(&key) {
            debug!(verdict, "Cache hit");
            return verdict;
        }

        let kind = self.evaluate(&normalized, target);
        let verdict = kind.is_some();
        debug!(verdict, kind = ?kind, "Evaluated guess");
        self.cache.set(key, verdict);
        verdict
    }

    /// Returns the layer that accepts `input`, bypassing the cache.
    #[instrument(skip(self, target), fields(target_id = %target.id()))]
    pub fn explain(&self, input: &str, target: &Target) -> Option<MatchKind> {
        if input.chars().count() > MAX_INPUT_LEN || !target.is_well_formed() {
            return None;
        }
        let normalized = normalize(input);
        if normalized.is_empty() {
            return None;
        }
        self.evaluate(&normalized, target)
    }

    /// Number of targets with precomputed forms.
    pub fn prepared_count(&self) -> usize {
        self.prepared.len()
    }

    /// Number of cached verdicts.
    pub fn cached_verdicts(&self) -> usize {
        self.cache.size()
    }

    /// Drops all cached verdicts.
    #[instrument(skip(self))]
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn evaluate(&self, normalized: &str, target: &Target) -> Option<MatchKind> {
        match self.prepared.get(target.id()) {
            Some(prepared) if prepared.source == *target => prepared.evaluate(normalized),
            _ => PreparedTarget::prepare(target)?.evaluate(normalized),
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
