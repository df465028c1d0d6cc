//! Receipt timestamp parsing and freshness checks

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use crate::config::VerificationConfig;
use crate::error::{ConfigError, TemporalError};
use crate::normalizer::{fold_arabic_letters, fold_digits};

re!(re_receipt_timestamp, concat!(
    r"(?i)^([0-9]{1,2})[-/. ]([0-9]{1,2}|",
    month_names!(),
    r")\.?[-/., ]+([0-9]{4})(?:",
    time_of_day!(),
    r")?$"
));

/// Month number for an English (full or three-letter) or Arabic month name
pub fn month_number(name: &str) -> Option<u32> {
    let name = fold_arabic_letters(&name.to_lowercase());
    let english: String = name.chars().take(3).collect();
    let month = match english.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => match name.as_str() {
            "يناير" => 1,
            "فبراير" => 2,
            "مارس" => 3,
            "ابريل" => 4,
            "مايو" => 5,
            "يونيو" | "يونيه" => 6,
            "يوليو" | "يوليه" => 7,
            "اغسطس" => 8,
            "سبتمبر" => 9,
            "اكتوبر" => 10,
            "نوفمبر" => 11,
            "ديسمبر" => 12,
            _ => return None,
        },
    };
    Some(month)
}

/// Parses receipt timestamps and enforces the freshness window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalValidator {
    max_age: Duration,
    future_skew: Duration,
    offset: FixedOffset,
}

impl TemporalValidator {
    pub fn new(max_age: Duration, future_skew: Duration, offset: FixedOffset) -> Self {
        Self {
            max_age,
            future_skew,
            offset,
        }
    }

    pub fn from_config(config: &VerificationConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.max_receipt_age,
            config.future_skew_tolerance,
            config.receipt_offset()?,
        ))
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Parse a matched timestamp as day-month-year in the receipt timezone.
    ///
    /// Date-only timestamps resolve to local midnight. Returns `None` for
    /// anything that is not a real calendar date and time.
    pub fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        let raw = fold_digits(raw.trim());
        let caps = re_receipt_timestamp().captures(&raw)?;

        let day: u32 = caps[1].parse().ok()?;
        let month = match caps[2].parse::<u32>() {
            Ok(number) => number,
            Err(_) => month_number(&caps[2])?,
        };
        let year: i32 = caps[3].parse().ok()?;

        let mut hour: u32 = caps.get(4).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
        let minute: u32 = caps.get(5).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
        let second: u32 = caps.get(6).map_or(Ok(0), |m| m.as_str().parse()).ok()?;

        if let Some(marker) = caps.get(7) {
            if !(1..=12).contains(&hour) {
                return None;
            }
            let afternoon = matches!(marker.as_str().to_lowercase().as_str(), "pm" | "م");
            hour %= 12;
            if afternoon {
                hour += 12;
            }
        }

        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|local| local.with_timezone(&Utc))
    }

    /// Parse and check a receipt timestamp against `now`.
    ///
    /// A receipt older than the maximum age, or further in the future than
    /// the skew tolerance, is rejected. Both bounds are inclusive.
    pub fn validate(&self, raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, TemporalError> {
        let receipt_time = self.parse(raw).ok_or_else(|| TemporalError::Unparsable {
            raw: raw.to_string(),
        })?;

        let ahead = receipt_time - now;
        if ahead > self.future_skew {
            return Err(TemporalError::Future {
                receipt_time,
                ahead_seconds: ahead.num_seconds(),
            });
        }

        let age = now - receipt_time;
        if age > self.max_age {
            return Err(TemporalError::stale(receipt_time, age, self.max_age));
        }

        Ok(receipt_time)
    }
}
