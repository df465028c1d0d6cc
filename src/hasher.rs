//! Receipt text fingerprinting using Blake3

use blake3::Hasher as Blake3Hasher;
use crate::normalizer::NormalizedText;
use crate::types::TextFingerprint;

/// TextHasher fingerprints normalized receipt text.
///
/// Logs carry the fingerprint instead of the recognized text, so two
/// attempts with the same receipt can be correlated without copying the
/// receipt contents into every log entry.
#[derive(Debug, Clone, Default)]
pub struct TextHasher;

impl TextHasher {
    pub fn new() -> Self {
        Self
    }

    /// Compute the Blake3 fingerprint of a normalized text
    pub fn fingerprint(&self, text: &NormalizedText) -> TextFingerprint {
        let mut hasher = Blake3Hasher::new();
        hasher.update(text.as_str().as_bytes());
        TextFingerprint(*hasher.finalize().as_bytes())
    }
}
