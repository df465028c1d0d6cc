//! Receipt Verification Pipeline (RVP)
//!
//! A library for deciding whether recognized text of a bank-transfer receipt
//! proves a payment to a claimed account holder. Text is normalized, fields
//! are extracted by ordered strategy chains, and the extracted account,
//! name, timestamp and transaction id are checked against the claim, a
//! freshness window and a duplicate registry.

#[macro_use]
mod patterns;

pub mod config;
pub mod duplicate_guard;
pub mod error;
pub mod extractor;
pub mod hasher;
pub mod identity;
pub mod logging;
pub mod normalizer;
pub mod profile;
pub mod serialization;
pub mod temporal;
pub mod types;
pub mod verdict;
pub mod verifier;

// Re-export core types
pub use config::{AccountLengthBounds, Locale, VerificationConfig};
pub use duplicate_guard::{DuplicateRecord, DuplicateRegistry, InMemoryRegistry, RegistrySnapshot};
pub use error::{ClaimError, ConfigError, RvpError, SnapshotError, TemporalError};
pub use extractor::{BuiltinStrategy, Extraction, FieldExtractor, FieldMatch, FieldStrategy, TimestampShape};
pub use hasher::TextHasher;
pub use identity::{IdentityMatcher, NameMatch};
pub use logging::{LogEntry, LogLevel, Stage, VerificationLog};
pub use normalizer::{NormalizedText, Normalizer};
pub use profile::{Profile, ProfileMetadata, ProfileRegistry};
pub use serialization::{BincodeSerializer, JsonSerializer, SnapshotSerializer};
pub use temporal::TemporalValidator;
pub use types::{ClaimedIdentity, ExtractedFields, Field, TextFingerprint, VerificationRequest};
pub use verdict::{Diagnostics, Verdict, VerdictAssembler, VerdictDebug, VerdictReason};
pub use verifier::{Verifier, VerifierBuilder};
