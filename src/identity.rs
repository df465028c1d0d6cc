//! Matching extracted account and name against the claimed identity

use serde::{Serialize, Deserialize};
use crate::config::VerificationConfig;
use crate::normalizer::{collapse_whitespace, fold_arabic_letters, fold_digits, strip_whitespace};

/// Outcome of comparing an extracted recipient name with the claimed one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameMatch {
    /// Claimed tokens found inside the extracted name
    pub hits: usize,
    /// Claimed tokens longer than one character
    pub total: usize,
    pub ratio: f64,
    /// Extracted name is not disproportionately longer than the claimed one
    pub length_ok: bool,
    pub matched: bool,
}

impl NameMatch {
    /// `hits/total`, as echoed in verdict diagnostics
    pub fn summary(&self) -> String {
        format!("{}/{}", self.hits, self.total)
    }
}

/// Account and name comparison rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentityMatcher {
    threshold: f64,
    length_multiplier: f64,
}

impl IdentityMatcher {
    pub fn new(threshold: f64, length_multiplier: f64) -> Self {
        Self {
            threshold,
            length_multiplier,
        }
    }

    pub fn from_config(config: &VerificationConfig) -> Self {
        Self::new(config.name_match_threshold, config.name_length_multiplier)
    }

    /// Exact comparison after removing all whitespace from both sides
    pub fn account_matches(&self, extracted: &str, claimed: &str) -> bool {
        let extracted = strip_whitespace(&fold_digits(extracted));
        let claimed = strip_whitespace(&fold_digits(claimed));
        !extracted.is_empty() && extracted == claimed
    }

    /// Token hit ratio of the claimed name within the extracted name.
    ///
    /// A claimed token hits when it occurs as a substring of the extracted
    /// name, compared case-insensitively with Arabic letter variants folded.
    /// At least one token must hit whatever the threshold.
    pub fn match_name(&self, extracted: &str, claimed: &str) -> NameMatch {
        let extracted = canonical_name(extracted);
        let claimed = canonical_name(claimed);

        let tokens: Vec<&str> = claimed
            .split(' ')
            .filter(|token| token.chars().count() > 1)
            .collect();
        let total = tokens.len();
        let hits = tokens.iter().filter(|token| extracted.contains(**token)).count();
        let ratio = if total == 0 { 0.0 } else { hits as f64 / total as f64 };

        let limit = claimed.chars().count() as f64 * self.length_multiplier;
        let length_ok = extracted.chars().count() as f64 <= limit;

        NameMatch {
            hits,
            total,
            ratio,
            length_ok,
            matched: hits >= 1 && ratio >= self.threshold && length_ok,
        }
    }
}

impl Default for IdentityMatcher {
    fn default() -> Self {
        Self::from_config(&VerificationConfig::standard())
    }
}

fn canonical_name(name: &str) -> String {
    collapse_whitespace(&fold_arabic_letters(&name.to_lowercase()))
}
