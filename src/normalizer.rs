//! Text normalization applied to recognized receipt text before matching

use serde::Serialize;
use std::fmt;

/// Receipt text with invisible characters removed and whitespace collapsed.
///
/// Only [`Normalizer::normalize`] produces values of this type, so holding
/// one means the text contains no zero-width characters and no run of
/// whitespace longer than a single ASCII space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalizes recognized text for all later matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    lowercase: bool,
}

impl Normalizer {
    pub fn new(lowercase: bool) -> Self {
        Self { lowercase }
    }

    /// Whether this normalizer lowercases its output
    pub fn lowercases(&self) -> bool {
        self.lowercase
    }

    /// Normalize raw recognized text.
    ///
    /// Removes zero-width and bidi control characters, folds Eastern Arabic
    /// digits to ASCII, optionally lowercases, then collapses every
    /// whitespace run to one space and trims both ends. Applying it to its
    /// own output changes nothing.
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let visible: String = raw
            .chars()
            .filter(|c| !is_invisible(*c))
            .map(fold_digit)
            .collect();

        let cased = if self.lowercase {
            visible.to_lowercase()
        } else {
            visible
        };

        NormalizedText(collapse_whitespace(&cased))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Zero-width, soft-hyphen and directional formatting characters
pub fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{061C}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{2069}'
            | '\u{FEFF}'
    )
}

/// Map Arabic-Indic and Extended Arabic-Indic digits to ASCII digits
pub fn fold_digit(c: char) -> char {
    match c {
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        _ => c,
    }
}

pub fn fold_digits(text: &str) -> String {
    text.chars().map(fold_digit).collect()
}

/// Collapse whitespace runs to a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every whitespace character
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Fold Arabic letter variants that OCR and typists use interchangeably.
///
/// Alef with hamza or madda becomes bare alef, teh marbuta becomes heh,
/// alef maksura becomes yeh, and tatweel is dropped.
pub fn fold_arabic_letters(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\u{0640}')
        .map(|c| match c {
            'أ' | 'إ' | 'آ' | 'ٱ' => 'ا',
            'ة' => 'ه',
            'ى' => 'ي',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_zero_width_and_collapses() {
        let normalizer = Normalizer::default();
        let text = normalizer.normalize("  Transaction\u{200B} ID:\n\t12345678901 \u{FEFF} ");
        assert_eq!(text.as_str(), "transaction id: 12345678901");
    }

    #[test]
    fn test_keeps_case_when_disabled() {
        let normalizer = Normalizer::new(false);
        assert_eq!(normalizer.normalize("Ahmed   ALI").as_str(), "Ahmed ALI");
    }

    #[test]
    fn test_folds_arabic_indic_digits() {
        assert_eq!(fold_digits("١٢٣٤ ۵۶۷"), "1234 567");
    }

    #[test]
    fn test_empty_input() {
        assert!(Normalizer::default().normalize(" \u{200C}\n ").is_empty());
    }

    #[test]
    fn test_fold_arabic_letters() {
        assert_eq!(fold_arabic_letters("أحمد إبراهيم"), "احمد ابراهيم");
        assert_eq!(fold_arabic_letters("فاطمة مصطفى"), "فاطمه مصطفي");
    }
}
