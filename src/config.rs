//! Verification configuration and named presets
//!
//! Every threshold the pipeline consults lives here. A configuration is
//! validated once, when a [`crate::Verifier`] is built from it, so a bad
//! deployment fails at startup instead of on the first request.

use chrono::{Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;

/// Largest timezone offset accepted for receipt timestamps.
const MAX_UTC_OFFSET_MINUTES: u32 = 18 * 60;

/// Inclusive digit-count bounds for account numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLengthBounds {
    pub min: usize,
    pub max: usize,
}

impl AccountLengthBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Check whether a digit count falls inside the bounds
    pub fn contains(&self, length: usize) -> bool {
        length >= self.min && length <= self.max
    }
}

impl Default for AccountLengthBounds {
    fn default() -> Self {
        Self::new(14, 16)
    }
}

/// Language used for the human-readable verdict reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    Arabic,
}

/// Tunable options of the verification pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationConfig {
    /// Oldest receipt accepted, measured from the verification instant
    #[serde(with = "duration_seconds")]
    pub max_receipt_age: Duration,
    /// How far in the future a receipt timestamp may lie
    #[serde(with = "duration_seconds")]
    pub future_skew_tolerance: Duration,
    /// Fraction of claimed name tokens that must hit (0.0 means any single hit)
    pub name_match_threshold: f64,
    /// Extracted name may be at most this many times longer than the claimed one
    pub name_length_multiplier: f64,
    /// Retention of seen transaction ids; `None` follows `max_receipt_age`
    #[serde(with = "option_duration_seconds")]
    pub duplicate_retention_window: Option<Duration>,
    pub account_length_bounds: AccountLengthBounds,
    /// Reject a present amount that does not parse to a positive number
    pub require_positive_amount: bool,
    /// Offset of the timezone receipts are printed in
    pub utc_offset_minutes: i32,
    pub lowercase: bool,
    pub locale: Locale,
}

impl VerificationConfig {
    /// Strictest profile: short freshness window, tight name length guard,
    /// and a positive amount required when one is printed.
    pub fn strict() -> Self {
        Self {
            name_length_multiplier: 2.0,
            require_positive_amount: true,
            ..Self::standard()
        }
    }

    /// Default profile
    pub fn standard() -> Self {
        Self {
            max_receipt_age: Duration::minutes(15),
            future_skew_tolerance: Duration::minutes(5),
            name_match_threshold: 0.8,
            name_length_multiplier: 2.5,
            duplicate_retention_window: None,
            account_length_bounds: AccountLengthBounds::default(),
            require_positive_amount: false,
            utc_offset_minutes: 0,
            lowercase: true,
            locale: Locale::English,
        }
    }

    /// Day-long freshness window and a 70% name hit ratio
    pub fn lenient() -> Self {
        Self {
            max_receipt_age: Duration::hours(24),
            name_match_threshold: 0.7,
            ..Self::standard()
        }
    }

    /// Day-long freshness window, any one claimed name token is enough
    pub fn single_token() -> Self {
        Self {
            max_receipt_age: Duration::hours(24),
            name_match_threshold: 0.0,
            ..Self::standard()
        }
    }

    /// Parse a configuration from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Malformed {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Builder-style override of the freshness window
    pub fn with_max_receipt_age(mut self, max_age: Duration) -> Self {
        self.max_receipt_age = max_age;
        self
    }

    /// Builder-style override of the duplicate retention window
    pub fn with_retention_window(mut self, retention: Duration) -> Self {
        self.duplicate_retention_window = Some(retention);
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Effective duplicate retention window
    pub fn retention_window(&self) -> Duration {
        self.duplicate_retention_window.unwrap_or(self.max_receipt_age)
    }

    /// Timezone receipt timestamps are interpreted in
    pub fn receipt_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidUtcOffset {
                minutes: self.utc_offset_minutes,
            })
    }

    /// Check every option for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.name_match_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.name_match_threshold)
        {
            return Err(ConfigError::InvalidThreshold {
                name: "nameMatchThreshold".to_string(),
                value: self.name_match_threshold,
                reason: "must lie within 0.0..=1.0".to_string(),
            });
        }

        if !self.name_length_multiplier.is_finite() || self.name_length_multiplier < 1.0 {
            return Err(ConfigError::InvalidThreshold {
                name: "nameLengthMultiplier".to_string(),
                value: self.name_length_multiplier,
                reason: "must be at least 1.0".to_string(),
            });
        }

        check_positive("maxReceiptAge", self.max_receipt_age)?;
        check_positive("duplicateRetentionWindow", self.retention_window())?;

        if self.future_skew_tolerance < Duration::zero() {
            return Err(ConfigError::InvalidDuration {
                name: "futureSkewTolerance".to_string(),
                seconds: self.future_skew_tolerance.num_seconds(),
                reason: "must not be negative".to_string(),
            });
        }

        let bounds = self.account_length_bounds;
        if bounds.min == 0 || bounds.min > bounds.max {
            return Err(ConfigError::InvalidAccountBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }

        if self.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::InvalidUtcOffset {
                minutes: self.utc_offset_minutes,
            });
        }

        Ok(())
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_positive(name: &str, duration: Duration) -> Result<(), ConfigError> {
    if duration <= Duration::zero() {
        return Err(ConfigError::InvalidDuration {
            name: name.to_string(),
            seconds: duration.num_seconds(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

mod duration_seconds {
    use chrono::Duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        Duration::try_seconds(seconds)
            .ok_or_else(|| D::Error::custom(format!("duration out of range: {seconds}s")))
    }
}

mod option_duration_seconds {
    use chrono::Duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match duration {
            Some(d) => serializer.serialize_some(&d.num_seconds()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        match Option::<i64>::deserialize(deserializer)? {
            Some(seconds) => Duration::try_seconds(seconds)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("duration out of range: {seconds}s"))),
            None => Ok(None),
        }
    }
}
