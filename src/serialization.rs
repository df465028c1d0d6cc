//! Pluggable serialization for duplicate registry snapshots

use crate::duplicate_guard::RegistrySnapshot;
use crate::error::SnapshotError;

/// Trait for pluggable snapshot serialization
pub trait SnapshotSerializer: Send + Sync {
    /// Serialize a snapshot to bytes
    fn serialize(&self, snapshot: &RegistrySnapshot) -> Result<Vec<u8>, SnapshotError>;

    /// Deserialize a snapshot from bytes
    fn deserialize(&self, bytes: &[u8]) -> Result<RegistrySnapshot, SnapshotError>;

    /// Get the name of this serialization method
    fn name(&self) -> &str;
}

/// Bincode serialization backend
#[derive(Debug, Clone, Default)]
pub struct BincodeSerializer;

impl BincodeSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotSerializer for BincodeSerializer {
    fn serialize(&self, snapshot: &RegistrySnapshot) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(snapshot).map_err(|e| SnapshotError::SerializationFailed {
            reason: format!("Bincode serialization failed: {}", e),
        })
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<RegistrySnapshot, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::DeserializationFailed {
            reason: format!("Bincode deserialization failed: {}", e),
        })
    }

    fn name(&self) -> &str {
        "bincode"
    }
}

/// JSON serialization backend
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Create a JSON serializer with pretty printing
    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }
}

impl SnapshotSerializer for JsonSerializer {
    fn serialize(&self, snapshot: &RegistrySnapshot) -> Result<Vec<u8>, SnapshotError> {
        let result = if self.pretty {
            serde_json::to_vec_pretty(snapshot)
        } else {
            serde_json::to_vec(snapshot)
        };

        result.map_err(|e| SnapshotError::SerializationFailed {
            reason: format!("JSON serialization failed: {}", e),
        })
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<RegistrySnapshot, SnapshotError> {
        serde_json::from_slice(bytes).map_err(|e| SnapshotError::DeserializationFailed {
            reason: format!("JSON deserialization failed: {}", e),
        })
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicate_guard::DuplicateRecord;
    use chrono::{TimeZone, Utc};

    fn snapshot() -> RegistrySnapshot {
        RegistrySnapshot {
            retention_seconds: 900,
            records: vec![DuplicateRecord {
                transaction_id: "00012345678".to_string(),
                observed_at: Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
            }],
        }
    }

    #[test]
    fn test_bincode_serializer() {
        let serializer = BincodeSerializer::new();
        let bytes = serializer.serialize(&snapshot()).unwrap();
        assert_eq!(serializer.deserialize(&bytes).unwrap(), snapshot());
    }

    #[test]
    fn test_json_pretty_serializer() {
        let serializer = JsonSerializer::new_pretty();
        let bytes = serializer.serialize(&snapshot()).unwrap();
        let json_str = String::from_utf8(bytes).unwrap();

        assert!(json_str.contains('\n'));
        assert!(json_str.contains("\"00012345678\""));
        assert_eq!(serializer.deserialize(json_str.as_bytes()).unwrap(), snapshot());
    }

    #[test]
    fn test_corrupt_bytes_rejected() {
        let json = JsonSerializer::new();
        assert!(matches!(
            json.deserialize(b"{not json"),
            Err(SnapshotError::DeserializationFailed { .. })
        ));
    }
}
