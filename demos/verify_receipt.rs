//! Walk one receipt through the pipeline and print what happened.
//!
//! Run with `cargo run --example verify_receipt`.

use chrono::{Duration, Utc};
use rvp::{
    BincodeSerializer, ClaimedIdentity, InMemoryRegistry, LogLevel, ProfileRegistry, RvpError,
    SnapshotSerializer, TemporalValidator, Verifier,
};
use std::sync::Arc;

fn main() -> Result<(), RvpError> {
    let now = Utc::now();
    let issued = (now - Duration::minutes(3)).format("%d-%b-%Y %H:%M");
    let receipt = format!(
        "National Bank\nTransfer successful\nTransaction ID: 73019254810\nDate: {}\n\
         From account: 9999 8888 7777 6666\nTo account: 1234 5678 9012 3456\n\
         To: Ahmed Ali Mohamed\nAmount: EGP 1,250.00",
        issued
    );

    let profiles = ProfileRegistry::with_presets();
    println!("Profiles: {}", profiles.names().join(", "));

    let registry = Arc::new(InMemoryRegistry::new(profiles.resolve("standard")?.retention_window()));
    let verifier = Verifier::builder()
        .with_config(profiles.resolve("standard")?.clone())
        .with_registry(registry.clone())
        .build()?;

    let claim = ClaimedIdentity::new(
        "1234 5678 9012 3456",
        "Ahmed Ali",
        verifier.config().account_length_bounds,
    )?;
    let (verdict, log) = verifier.verify_traced(&receipt, claim.account_number(), claim.full_name(), now);
    println!("\n=== Verdict ===");
    println!("{}", serde_json::to_string_pretty(&verdict).unwrap_or_default());

    println!("\n=== Log ===");
    for entry in log.entries().iter().filter(|e| e.level >= LogLevel::Debug) {
        let stage = entry.stage.map(|s| format!("{:?}", s)).unwrap_or_default();
        println!("{:<5} {:<9} {}", format!("{:?}", entry.level), stage, entry.message);
        for (key, value) in &entry.metadata {
            println!("                {} = {}", key, value);
        }
    }

    if let Some(stamp) = verdict.fields().timestamp.as_deref() {
        let issued_at = TemporalValidator::from_config(verifier.config())?.validate(stamp, now)?;
        println!("\nReceipt issued at {} UTC", issued_at.format("%Y-%m-%d %H:%M"));
    }

    let replay = verifier.verify(&receipt, "1234567890123456", "Ahmed Ali", now + Duration::seconds(20));
    println!("\nSecond submission: {} ({})", replay.message(), replay.reason().code());

    let serializer = BincodeSerializer::new();
    let bytes = serializer.serialize(&registry.snapshot())?;
    println!(
        "Registry snapshot: {} record(s), {} bytes via {}",
        registry.snapshot().records.len(),
        bytes.len(),
        serializer.name()
    );

    let restarted = InMemoryRegistry::new(registry.retention());
    let restored = restarted.restore(&serializer.deserialize(&bytes)?, now);
    println!("Restored {} record(s) into a fresh registry", restored);

    Ok(())
}
