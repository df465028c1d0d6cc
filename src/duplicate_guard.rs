//! Replay protection for already accepted transaction ids

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Deserialize};

/// Registry of recently accepted transaction ids
pub trait DuplicateRegistry: Send + Sync {
    /// Evict expired records, then report whether `transaction_id` was
    /// already seen. A fresh id is recorded at `now`.
    ///
    /// Implementations must perform eviction, lookup and insert as one
    /// critical section so two concurrent calls with the same id cannot
    /// both observe it as fresh.
    fn check_and_record(&self, transaction_id: &str, now: DateTime<Utc>) -> bool;

    /// Number of records currently held
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A transaction id and the instant it was first accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    pub transaction_id: String,
    pub observed_at: DateTime<Utc>,
}

/// Point-in-time copy of an in-memory registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub retention_seconds: i64,
    pub records: Vec<DuplicateRecord>,
}

/// Process-local registry guarded by a mutex, evicting lazily on access
#[derive(Debug)]
pub struct InMemoryRegistry {
    retention: Duration,
    records: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryRegistry {
    /// Create an empty registry keeping ids for `retention`
    pub fn new(retention: Duration) -> Self {
        Self {
            retention,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, DateTime<Utc>>> {
        // The map holds no invariant a panicking holder could break.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn evict(records: &mut HashMap<String, DateTime<Utc>>, retention: Duration, now: DateTime<Utc>) {
        records.retain(|_, observed_at| now - *observed_at <= retention);
    }

    /// Whether `transaction_id` is held and not yet expired at `now`
    pub fn contains(&self, transaction_id: &str, now: DateTime<Utc>) -> bool {
        self.lock()
            .get(transaction_id)
            .map_or(false, |observed_at| now - *observed_at <= self.retention)
    }

    /// Copy out every record, sorted by observation time then id
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut records: Vec<DuplicateRecord> = self
            .lock()
            .iter()
            .map(|(id, observed_at)| DuplicateRecord {
                transaction_id: id.clone(),
                observed_at: *observed_at,
            })
            .collect();
        records.sort_by(|a, b| {
            a.observed_at
                .cmp(&b.observed_at)
                .then_with(|| a.transaction_id.cmp(&b.transaction_id))
        });

        RegistrySnapshot {
            retention_seconds: self.retention.num_seconds(),
            records,
        }
    }

    /// Merge records from a snapshot, dropping those already expired at `now`.
    ///
    /// When the same id is present on both sides the earlier observation wins.
    /// Returns the number of records taken from the snapshot.
    pub fn restore(&self, snapshot: &RegistrySnapshot, now: DateTime<Utc>) -> usize {
        let mut records = self.lock();
        Self::evict(&mut records, self.retention, now);

        let mut restored = 0;
        for record in &snapshot.records {
            if now - record.observed_at > self.retention {
                continue;
            }
            let slot = records
                .entry(record.transaction_id.clone())
                .or_insert(record.observed_at);
            if record.observed_at <= *slot {
                *slot = record.observed_at;
                restored += 1;
            }
        }
        restored
    }
}

impl DuplicateRegistry for InMemoryRegistry {
    fn check_and_record(&self, transaction_id: &str, now: DateTime<Utc>) -> bool {
        let mut records = self.lock();
        Self::evict(&mut records, self.retention, now);

        if records.contains_key(transaction_id) {
            return true;
        }
        records.insert(transaction_id.to_string(), now);
        false
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
