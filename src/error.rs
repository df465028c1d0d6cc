//! Error types for the RVP

use thiserror::Error;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Error)]
pub enum RvpError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Claim error: {0}")]
    Claim(#[from] ClaimError),

    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid threshold: {name} = {value} ({reason})")]
    InvalidThreshold { name: String, value: f64, reason: String },

    #[error("Invalid duration: {name} = {seconds}s ({reason})")]
    InvalidDuration { name: String, seconds: i64, reason: String },

    #[error("Invalid account length bounds: {min}..={max}")]
    InvalidAccountBounds { min: usize, max: usize },

    #[error("Invalid UTC offset: {minutes} minutes")]
    InvalidUtcOffset { minutes: i32 },

    #[error("Profile registration failed: {reason}")]
    RegistrationFailed { reason: String },

    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    #[error("Malformed configuration: {reason}")]
    Malformed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("Claimed account must contain digits only, got {account:?}")]
    NonDigitAccount { account: String },

    #[error("Claimed account has {length} digits, expected {min}..={max}")]
    AccountLength { length: usize, min: usize, max: usize },

    #[error("Claimed name is empty")]
    EmptyName,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemporalError {
    #[error("Unparsable receipt timestamp: {raw:?}")]
    Unparsable { raw: String },

    #[error("Receipt is stale: issued at {receipt_time}, {age_seconds}s old (max {max_age_seconds}s)")]
    Stale {
        receipt_time: DateTime<Utc>,
        age_seconds: i64,
        max_age_seconds: i64,
    },

    #[error("Receipt is from the future: issued at {receipt_time}, {ahead_seconds}s ahead")]
    Future {
        receipt_time: DateTime<Utc>,
        ahead_seconds: i64,
    },
}

impl TemporalError {
    pub(crate) fn stale(receipt_time: DateTime<Utc>, age: Duration, max_age: Duration) -> Self {
        TemporalError::Stale {
            receipt_time,
            age_seconds: age.num_seconds(),
            max_age_seconds: max_age.num_seconds(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot serialization failed: {reason}")]
    SerializationFailed { reason: String },

    #[error("Snapshot deserialization failed: {reason}")]
    DeserializationFailed { reason: String },
}
