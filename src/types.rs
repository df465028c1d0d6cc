//! Core data types for the RVP

use serde::{Serialize, Deserialize};
use std::fmt;
use crate::config::AccountLengthBounds;
use crate::error::ClaimError;
use crate::normalizer::{fold_digits, strip_whitespace};

/// Receipt fields the extractor looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TransactionId,
    Timestamp,
    Amount,
    Account,
    RecipientName,
}

impl Field {
    /// All fields in extraction order
    pub const ALL: [Field; 5] = [
        Field::TransactionId,
        Field::Timestamp,
        Field::Amount,
        Field::Account,
        Field::RecipientName,
    ];

    /// Whether absence of this field fails verification
    pub fn is_required(&self) -> bool {
        !matches!(self, Field::Amount)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::TransactionId => "transaction id",
            Field::Timestamp => "timestamp",
            Field::Amount => "amount",
            Field::Account => "account",
            Field::RecipientName => "recipient name",
        };
        f.write_str(name)
    }
}

/// Fields pulled out of a receipt's text; every member may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    /// Raw matched timestamp text, parsed later by the temporal validator
    #[serde(rename = "date")]
    pub timestamp: Option<String>,
    pub amount: Option<String>,
    #[serde(rename = "toAccount")]
    pub account: Option<String>,
    #[serde(rename = "toName")]
    pub recipient_name: Option<String>,
}

impl ExtractedFields {
    /// Get the value extracted for a field
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::TransactionId => self.transaction_id.as_deref(),
            Field::Timestamp => self.timestamp.as_deref(),
            Field::Amount => self.amount.as_deref(),
            Field::Account => self.account.as_deref(),
            Field::RecipientName => self.recipient_name.as_deref(),
        }
    }

    pub(crate) fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::TransactionId => &mut self.transaction_id,
            Field::Timestamp => &mut self.timestamp,
            Field::Amount => &mut self.amount,
            Field::Account => &mut self.account,
            Field::RecipientName => &mut self.recipient_name,
        };
        *slot = Some(value);
    }

    /// First required field that is absent, in extraction order
    pub fn first_missing(&self) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.is_required() && self.get(*field).is_none())
    }
}

/// Account number and full name the caller claims the transfer went to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedIdentity {
    account_number: String,
    full_name: String,
}

impl ClaimedIdentity {
    /// Validate and build a claimed identity.
    ///
    /// Whitespace inside the account number is dropped before checking that
    /// it is all digits and within `bounds`.
    pub fn new(
        account_number: &str,
        full_name: &str,
        bounds: AccountLengthBounds,
    ) -> Result<Self, ClaimError> {
        let account = strip_whitespace(&fold_digits(account_number));
        if account.is_empty() || !account.chars().all(|c| c.is_ascii_digit()) {
            return Err(ClaimError::NonDigitAccount {
                account: account_number.to_string(),
            });
        }
        if !bounds.contains(account.len()) {
            return Err(ClaimError::AccountLength {
                length: account.len(),
                min: bounds.min,
                max: bounds.max,
            });
        }

        let name = full_name.trim();
        if name.is_empty() {
            return Err(ClaimError::EmptyName);
        }

        Ok(Self {
            account_number: account,
            full_name: name.to_string(),
        })
    }

    /// Account digits with whitespace removed
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

/// A single verification attempt as it arrives at the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub raw_text: String,
    pub claimed_account: String,
    pub claimed_name: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// 32-byte blake3 fingerprint of a normalized receipt text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextFingerprint(pub [u8; 32]);

impl fmt::Display for TextFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
