//! Canonical text form for name comparison.
//!
//! Every comparison in the matcher goes through [`normalize`], so two
//! spellings that differ only in case, accents, punctuation or spacing
//! compare equal:
//!
//! - `"Tom Brady"`, `"tom   brady"` and `"TOM BRADY."` all become `"tom brady"`
//! - `"Zoë Vázquez"` becomes `"zoe vazquez"`
//! - `"O'Neal"` becomes `"o neal"`

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Maximum length, in characters, of a normalized string.
pub const MAX_NORMALIZED_LEN: usize = 500;

/// Maximum number of tokens returned by [`tokenize`].
pub const MAX_TOKENS: usize = 20;

/// Normalizes arbitrary text into its comparable form.
///
/// Applies, in order:
/// 1. NFD decomposition and removal of combining marks
/// 2. Lowercasing
/// 3. Replacement of anything outside `[a-z0-9]` and whitespace with a space
/// 4. Whitespace collapse and trim
/// 5. Truncation to [`MAX_NORMALIZED_LEN`] characters
///
/// Never fails; empty or junk input yields an empty string.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut out = String::with_capacity(folded.len().min(MAX_NORMALIZED_LEN));
    let mut taken = 0;
    for word in folded.split_whitespace() {
        let separator = usize::from(taken > 0);
        if taken + separator >= MAX_NORMALIZED_LEN {
            break;
        }
        if separator == 1 {
            out.push(' ');
            taken += 1;
        }
        for c in word.chars() {
            if taken == MAX_NORMALIZED_LEN {
                break;
            }
            out.push(c);
            taken += 1;
        }
    }
    out
}

/// Normalizes raw bytes, decoding invalid UTF-8 lossily instead of failing.
pub fn normalize_bytes(bytes: &[u8]) -> String {
    normalize(&String::from_utf8_lossy(bytes))
}

/// Splits normalized text into at most [`MAX_TOKENS`] non-empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .take(MAX_TOKENS)
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_spacing() {
        assert_eq!(normalize("  Tom   BRADY "), "tom brady");
        assert_eq!(normalize("tom\tbrady\n"), "tom brady");
    }

    #[test]
    fn test_strips_diacritics() {
        assert_eq!(normalize("Zoë Vázquez"), "zoe vazquez");
        assert_eq!(normalize("Élan Ñuñez"), "elan nunez");
    }

    #[test]
    fn test_punctuation_becomes_space() {
        assert_eq!(normalize("O'Neal"), "o neal");
        assert_eq!(normalize("Brady, Tom"), "brady tom");
        assert_eq!(normalize("A.J. Green"), "a j green");
        assert_eq!(normalize("St. Brown-Jr."), "st brown jr");
    }

    #[test]
    fn test_non_latin_is_dropped() {
        assert_eq!(normalize("東京 Kobe"), "kobe");
        assert_eq!(normalize("!!!"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_output_is_capped() {
        let long = "ab ".repeat(400);
        let normalized = normalize(&long);
        assert!(normalized.chars().count() <= MAX_NORMALIZED_LEN);
        assert!(!normalized.ends_with(' '));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["LeBron James", "Zoë  O'Neal", "  ", "x"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_lossy_bytes() {
        assert_eq!(normalize_bytes(b"Tom \xff Brady"), "tom brady");
    }

    #[test]
    fn test_tokenize_caps_count() {
        let many = "w ".repeat(50);
        assert_eq!(tokenize(&many).len(), MAX_TOKENS);
        assert_eq!(tokenize("LeBron  James"), vec!["lebron", "james"]);
        assert!(tokenize("...").is_empty());
    }
}
