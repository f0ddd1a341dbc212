//! The hidden answer of a round.

use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Maximum number of aliases considered per target.
pub const MAX_ALIASES: usize = 10;

/// Opaque unique identifier of a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TargetId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A target athlete: the names a guess is checked against.
///
/// `display_name` is the canonical human-readable form and need not be
/// `"first last"`. Aliases past [`MAX_ALIASES`] are kept but never matched.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Target {
    /// Unique identifier.
    id: TargetId,
    /// Given name.
    first_name: String,
    /// Family name.
    last_name: String,
    /// Canonical human-readable name.
    display_name: String,
    /// Alternate accepted spellings and nicknames.
    #[serde(default)]
    aliases: Vec<String>,
}

impl Target {
    /// Creates a target without aliases.
    pub fn new(
        id: impl Into<TargetId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            display_name: display_name.into(),
            aliases: Vec::new(),
        }
    }

    /// Replaces the alias list.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if every name field is non-empty after trimming.
    ///
    /// A target failing this check never matches any input.
    pub fn is_well_formed(&self) -> bool {
        [&self.first_name, &self.last_name, &self.display_name]
            .iter()
            .all(|name| !name.trim().is_empty())
    }

    /// Returns `true` if every name also survives normalization.
    ///
    /// Names made only of punctuation or non-Latin script normalize to
    /// nothing; such targets never match any guess.
    pub fn is_matchable(&self) -> bool {
        self.is_well_formed()
            && [&self.first_name, &self.last_name, &self.display_name]
                .iter()
                .all(|name| !normalize(name).is_empty())
    }

    /// Aliases eligible for matching.
    pub fn matchable_aliases(&self) -> &[String] {
        &self.aliases[..self.aliases.len().min(MAX_ALIASES)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed() {
        assert!(Target::new("p1", "Tom", "Brady", "Tom Brady").is_well_formed());
        assert!(!Target::new("p1", "  ", "Brady", "Tom Brady").is_well_formed());
        assert!(!Target::new("p1", "Tom", "", "Tom Brady").is_well_formed());
        assert!(!Target::new("p1", "Tom", "Brady", "\t").is_well_formed());
    }

    #[test]
    fn test_names_must_survive_normalization() {
        assert!(Target::new("p1", "Zoë", "Brady", "Zoë Brady").is_matchable());
        assert!(!Target::new("p1", "???", "Brady", "??? Brady").is_matchable());
        assert!(!Target::new("p1", "Tom", "Brady", "--").is_matchable());
        assert!(!Target::new("p1", "  ", "Brady", "Tom Brady").is_matchable());
    }

    #[test]
    fn test_alias_cap() {
        let target = Target::new("p1", "A", "B", "A B")
            .with_aliases((0..15).map(|i| format!("alias {i}")));
        assert_eq!(target.aliases().len(), 15);
        assert_eq!(target.matchable_aliases().len(), MAX_ALIASES);
    }

    #[test]
    fn test_deserialize_without_aliases() {
        let json = r#"{"id":"BradTo00","first_name":"Tom","last_name":"Brady","display_name":"Tom Brady"}"#;
        let target: Target = serde_json::from_str(json).expect("valid target json");
        assert_eq!(target.id().as_str(), "BradTo00");
        assert!(target.aliases().is_empty());
    }
}
