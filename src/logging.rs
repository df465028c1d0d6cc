//! Deterministic logging for verification runs
//!
//! Entries are collected in memory and timestamped with the instant the
//! caller passed to the verifier, so a replayed verification produces the
//! same log as the original one.

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use crate::types::TextFingerprint;

/// Log level for deterministic logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level - detailed information
    Debug,
    /// Info level - general information
    Info,
    /// Warning level - potential issues
    Warn,
    /// Error level - errors that occurred
    Error,
}

/// Pipeline stage an entry was written from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Claim,
    Normalize,
    Extract,
    Identity,
    Temporal,
    Duplicate,
    Verdict,
}

/// A deterministic log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Verification instant supplied by the caller
    pub timestamp: DateTime<Utc>,
    pub stage: Option<Stage>,
    pub transaction_id: Option<String>,
    pub fingerprint: Option<TextFingerprint>,
    pub message: String,
    /// Additional structured data
    pub metadata: Vec<(String, String)>,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(level: LogLevel, timestamp: DateTime<Utc>, message: String) -> Self {
        Self {
            level,
            timestamp,
            stage: None,
            transaction_id: None,
            fingerprint: None,
            message,
            metadata: Vec::new(),
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_transaction(mut self, id: String) -> Self {
        self.transaction_id = Some(id);
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: TextFingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Add metadata to the log entry
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.push((key, value));
        self
    }

    /// Look up a metadata value by key
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Collects log entries of one verification without side effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationLog {
    entries: Vec<LogEntry>,
    min_level: LogLevel,
}

impl VerificationLog {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            entries: Vec::new(),
            min_level,
        }
    }

    /// Create a log that captures all levels
    pub fn all() -> Self {
        Self::new(LogLevel::Trace)
    }

    /// Create a log that captures info and above
    pub fn with_info_level() -> Self {
        Self::new(LogLevel::Info)
    }

    /// Record an entry if it meets the minimum level
    pub fn log(&mut self, entry: LogEntry) {
        if entry.level >= self.min_level {
            self.entries.push(entry);
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filter entries by log level
    pub fn filter_by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.level == level).collect()
    }

    /// Filter entries by pipeline stage
    pub fn filter_by_stage(&self, stage: Stage) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.stage == Some(stage))
            .collect()
    }

    /// Last entry written, usually the verdict
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}

impl Default for VerificationLog {
    fn default() -> Self {
        Self::with_info_level()
    }
}
