//! Receipt verification pipeline with builder pattern
//!
//! Raw text is normalized, every field is extracted, then the checks run
//! in precedence order and stop at the first failure. The duplicate guard
//! runs last, so a receipt is only consumed by an attempt that passed
//! every other check.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use crate::config::VerificationConfig;
use crate::duplicate_guard::{DuplicateRegistry, InMemoryRegistry};
use crate::error::ConfigError;
use crate::extractor::{parse_amount, FieldExtractor, FieldStrategy};
use crate::hasher::TextHasher;
use crate::identity::IdentityMatcher;
use crate::logging::{LogEntry, LogLevel, Stage, VerificationLog};
use crate::normalizer::{NormalizedText, Normalizer};
use crate::profile::ProfileRegistry;
use crate::temporal::TemporalValidator;
use crate::types::{ClaimedIdentity, ExtractedFields, VerificationRequest};
use crate::verdict::{Diagnostics, Verdict, VerdictAssembler, VerdictReason};

/// Verifies receipt text against a claimed recipient
pub struct Verifier {
    config: VerificationConfig,
    normalizer: Normalizer,
    extractor: FieldExtractor,
    temporal: TemporalValidator,
    matcher: IdentityMatcher,
    registry: Arc<dyn DuplicateRegistry>,
    assembler: VerdictAssembler,
    hasher: TextHasher,
}

impl Verifier {
    /// Create a verifier with its own in-memory duplicate registry
    pub fn new(config: VerificationConfig) -> Result<Self, ConfigError> {
        let registry = Arc::new(InMemoryRegistry::new(config.retention_window()));
        Self::with_registry(config, registry)
    }

    /// Create a verifier sharing an existing duplicate registry
    pub fn with_registry(
        config: VerificationConfig,
        registry: Arc<dyn DuplicateRegistry>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            normalizer: Normalizer::new(config.lowercase),
            extractor: FieldExtractor::new(config.account_length_bounds),
            temporal: TemporalValidator::from_config(&config)?,
            matcher: IdentityMatcher::from_config(&config),
            assembler: VerdictAssembler::new(config.locale),
            hasher: TextHasher::new(),
            registry,
            config,
        })
    }

    /// Create a verifier from a named profile
    pub fn from_profile(profiles: &ProfileRegistry, name: &str) -> Result<Self, ConfigError> {
        Self::new(profiles.resolve(name)?.clone())
    }

    /// Create a builder for constructing a verifier
    pub fn builder() -> VerifierBuilder {
        VerifierBuilder::new()
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<dyn DuplicateRegistry> {
        &self.registry
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    /// Mutable access to the extractor, for adding receipt layouts
    pub fn extractor_mut(&mut self) -> &mut FieldExtractor {
        &mut self.extractor
    }

    /// Verify recognized receipt text against the claimed account and name
    pub fn verify(
        &self,
        raw_text: &str,
        claimed_account: &str,
        claimed_name: &str,
        now: DateTime<Utc>,
    ) -> Verdict {
        self.verify_traced(raw_text, claimed_account, claimed_name, now).0
    }

    /// Verify a boundary request, using its submission time as `now`
    pub fn verify_request(&self, request: &VerificationRequest) -> Verdict {
        self.verify(
            &request.raw_text,
            &request.claimed_account,
            &request.claimed_name,
            request.submitted_at,
        )
    }

    /// Verify many requests in parallel.
    ///
    /// Verdicts come back in request order. Requests carrying the same
    /// transaction id race for the registry and at most one of them passes.
    pub fn verify_batch(&self, requests: &[VerificationRequest]) -> Vec<Verdict> {
        requests
            .par_iter()
            .map(|request| self.verify_request(request))
            .collect()
    }

    /// Verify and return the collected log alongside the verdict
    pub fn verify_traced(
        &self,
        raw_text: &str,
        claimed_account: &str,
        claimed_name: &str,
        now: DateTime<Utc>,
    ) -> (Verdict, VerificationLog) {
        let mut log = VerificationLog::all();

        let text = self.normalizer.normalize(raw_text);
        let fingerprint = self.hasher.fingerprint(&text);
        log.log(
            LogEntry::new(LogLevel::Debug, now, "text normalized".to_string())
                .with_stage(Stage::Normalize)
                .with_fingerprint(fingerprint)
                .with_metadata("chars".to_string(), text.as_str().chars().count().to_string()),
        );

        let extraction = self.extractor.extract(&text);
        for matched in &extraction.matched_by {
            log.log(
                LogEntry::new(LogLevel::Debug, now, format!("{} extracted", matched.field))
                    .with_stage(Stage::Extract)
                    .with_metadata("strategy".to_string(), matched.strategy.clone()),
            );
        }

        let mut diagnostics = Diagnostics::default();
        let outcome = self.run_checks(
            &extraction.fields,
            claimed_account,
            claimed_name,
            now,
            &mut diagnostics,
            &mut log,
        );

        let verdict = self.assembler.assemble(outcome, extraction.fields, &text, diagnostics);

        let level = if verdict.matched() { LogLevel::Info } else { LogLevel::Warn };
        let mut entry = LogEntry::new(level, now, verdict.message().to_string())
            .with_stage(Stage::Verdict)
            .with_fingerprint(fingerprint)
            .with_metadata("reason".to_string(), verdict.reason().code().to_string());
        if let Some(id) = &verdict.fields().transaction_id {
            entry = entry.with_transaction(id.clone());
        }
        log.log(entry);

        (verdict, log)
    }

    fn run_checks(
        &self,
        fields: &ExtractedFields,
        claimed_account: &str,
        claimed_name: &str,
        now: DateTime<Utc>,
        diagnostics: &mut Diagnostics,
        log: &mut VerificationLog,
    ) -> Result<(), VerdictReason> {
        let claim = ClaimedIdentity::new(claimed_account, claimed_name, self.config.account_length_bounds)
            .map_err(|e| {
                log.log(stage_entry(LogLevel::Warn, now, Stage::Claim, e.to_string()));
                VerdictReason::InvalidClaim
            })?;

        if let Some(field) = fields.first_missing() {
            log.log(stage_entry(LogLevel::Warn, now, Stage::Extract, format!("{} not found", field)));
            return Err(VerdictReason::missing(field));
        }

        // first_missing() returned None, so every required field is present
        let (Some(transaction_id), Some(timestamp), Some(account), Some(name)) = (
            fields.transaction_id.as_deref(),
            fields.timestamp.as_deref(),
            fields.account.as_deref(),
            fields.recipient_name.as_deref(),
        ) else {
            return Err(VerdictReason::MissingTransactionId);
        };

        if self.config.require_positive_amount {
            if let Some(amount) = fields.amount.as_deref() {
                if !parse_amount(amount).map_or(false, |value| value > 0.0) {
                    log.log(stage_entry(LogLevel::Warn, now, Stage::Extract, format!("amount {:?} is not positive", amount)));
                    return Err(VerdictReason::InvalidAmount);
                }
            }
        }

        if !self.matcher.account_matches(account, claim.account_number()) {
            log.log(stage_entry(
                LogLevel::Warn,
                now,
                Stage::Identity,
                format!("account {} does not match claimed {}", account, claim.account_number()),
            ));
            return Err(VerdictReason::AccountMismatch);
        }
        log.log(stage_entry(LogLevel::Debug, now, Stage::Identity, "account matched".to_string()));

        let name_match = self.matcher.match_name(name, claim.full_name());
        let name_ok = name_match.matched;
        log.log(
            stage_entry(LogLevel::Debug, now, Stage::Identity, "name compared".to_string())
                .with_metadata("hits".to_string(), name_match.summary())
                .with_metadata("length_ok".to_string(), name_match.length_ok.to_string()),
        );
        diagnostics.name_match = Some(name_match);
        if !name_ok {
            log.log(stage_entry(
                LogLevel::Warn,
                now,
                Stage::Identity,
                format!("name {:?} does not match claimed {:?}", name, claim.full_name()),
            ));
            return Err(VerdictReason::NameMismatch);
        }

        let receipt_time = self.temporal.validate(timestamp, now).map_err(|e| {
            log.log(stage_entry(LogLevel::Warn, now, Stage::Temporal, e.to_string()));
            VerdictReason::from(&e)
        })?;
        log.log(
            stage_entry(LogLevel::Debug, now, Stage::Temporal, "receipt is fresh".to_string())
                .with_metadata("receipt_time".to_string(), receipt_time.to_rfc3339()),
        );
        diagnostics.receipt_time = Some(receipt_time);

        if self.registry.check_and_record(transaction_id, now) {
            log.log(
                stage_entry(LogLevel::Warn, now, Stage::Duplicate, "transaction id already used".to_string())
                    .with_transaction(transaction_id.to_string()),
            );
            return Err(VerdictReason::DuplicateTransaction);
        }
        log.log(
            stage_entry(LogLevel::Debug, now, Stage::Duplicate, "transaction id recorded".to_string())
                .with_transaction(transaction_id.to_string()),
        );

        Ok(())
    }

    /// Normalize text with this verifier's settings
    pub fn normalize(&self, raw_text: &str) -> NormalizedText {
        self.normalizer.normalize(raw_text)
    }
}

fn stage_entry(level: LogLevel, now: DateTime<Utc>, stage: Stage, message: String) -> LogEntry {
    LogEntry::new(level, now, message).with_stage(stage)
}

/// Builder for constructing verifiers with a fluent API
#[derive(Default)]
pub struct VerifierBuilder {
    config: Option<VerificationConfig>,
    registry: Option<Arc<dyn DuplicateRegistry>>,
    strategies: Vec<Box<dyn FieldStrategy>>,
}

impl VerifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration; the standard preset is used otherwise
    pub fn with_config(mut self, config: VerificationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share a duplicate registry instead of creating a private one
    pub fn with_registry(mut self, registry: Arc<dyn DuplicateRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Append an extraction strategy after the built-in ones for its field
    pub fn with_strategy(mut self, strategy: Box<dyn FieldStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Build the verifier, validating the configuration
    pub fn build(self) -> Result<Verifier, ConfigError> {
        let config = self.config.unwrap_or_default();
        let mut verifier = match self.registry {
            Some(registry) => Verifier::with_registry(config, registry)?,
            None => Verifier::new(config)?,
        };
        for strategy in self.strategies {
            verifier.extractor.push_strategy(strategy);
        }
        Ok(verifier)
    }
}
