//! Verdict types and assembly

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use std::fmt;
use crate::config::Locale;
use crate::error::TemporalError;
use crate::identity::NameMatch;
use crate::normalizer::NormalizedText;
use crate::types::{ExtractedFields, Field};

/// Why a verification passed or failed.
///
/// Failure variants are declared in precedence order, most actionable
/// first, so `Ord` ranks two failures the way the pipeline reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    InvalidClaim,
    MissingTransactionId,
    MissingTimestamp,
    MissingAccount,
    MissingRecipientName,
    InvalidAmount,
    AccountMismatch,
    NameMismatch,
    UnparsableTimestamp,
    StaleReceipt,
    FutureReceipt,
    DuplicateTransaction,
    Matched,
}

impl VerdictReason {
    /// Reason reported when a required field is absent
    pub fn missing(field: Field) -> Self {
        match field {
            Field::TransactionId => VerdictReason::MissingTransactionId,
            Field::Timestamp => VerdictReason::MissingTimestamp,
            Field::Account => VerdictReason::MissingAccount,
            Field::RecipientName => VerdictReason::MissingRecipientName,
            Field::Amount => VerdictReason::InvalidAmount,
        }
    }

    /// Stable snake_case code
    pub fn code(&self) -> &'static str {
        match self {
            VerdictReason::InvalidClaim => "invalid_claim",
            VerdictReason::MissingTransactionId => "missing_transaction_id",
            VerdictReason::MissingTimestamp => "missing_timestamp",
            VerdictReason::MissingAccount => "missing_account",
            VerdictReason::MissingRecipientName => "missing_recipient_name",
            VerdictReason::InvalidAmount => "invalid_amount",
            VerdictReason::AccountMismatch => "account_mismatch",
            VerdictReason::NameMismatch => "name_mismatch",
            VerdictReason::UnparsableTimestamp => "unparsable_timestamp",
            VerdictReason::StaleReceipt => "stale_receipt",
            VerdictReason::FutureReceipt => "future_receipt",
            VerdictReason::DuplicateTransaction => "duplicate_transaction",
            VerdictReason::Matched => "matched",
        }
    }

    /// Human-readable reason in the requested language
    pub fn message(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::English => match self {
                VerdictReason::InvalidClaim => "invalid claimed account or name",
                VerdictReason::MissingTransactionId => "transaction id not found",
                VerdictReason::MissingTimestamp => "receipt date not found",
                VerdictReason::MissingAccount => "account number not found",
                VerdictReason::MissingRecipientName => "recipient name not found",
                VerdictReason::InvalidAmount => "invalid amount",
                VerdictReason::AccountMismatch => "account number does not match",
                VerdictReason::NameMismatch => "recipient name does not match",
                VerdictReason::UnparsableTimestamp => "receipt date is invalid",
                VerdictReason::StaleReceipt => "receipt is too old",
                VerdictReason::FutureReceipt => "receipt date is in the future",
                VerdictReason::DuplicateTransaction => "receipt has already been used",
                VerdictReason::Matched => "match succeeded",
            },
            Locale::Arabic => match self {
                VerdictReason::InvalidClaim => "بيانات غير صالحة",
                VerdictReason::MissingTransactionId => "رقم العملية غير موجود",
                VerdictReason::MissingTimestamp => "تاريخ الإيصال غير موجود",
                VerdictReason::MissingAccount => "رقم الحساب غير موجود",
                VerdictReason::MissingRecipientName => "اسم المرسل إليه غير موجود",
                VerdictReason::InvalidAmount => "المبلغ غير صالح",
                VerdictReason::AccountMismatch => "رقم الحساب غير مطابق",
                VerdictReason::NameMismatch => "اسم المرسل إليه غير مطابق",
                VerdictReason::UnparsableTimestamp => "تاريخ الإيصال غير صالح",
                VerdictReason::StaleReceipt => "الإيصال قديم",
                VerdictReason::FutureReceipt => "تاريخ الإيصال في المستقبل",
                VerdictReason::DuplicateTransaction => "تم استخدام هذا الإيصال مسبقًا",
                VerdictReason::Matched => "مطابقة ناجحة",
            },
        }
    }
}

impl From<&TemporalError> for VerdictReason {
    fn from(error: &TemporalError) -> Self {
        match error {
            TemporalError::Unparsable { .. } => VerdictReason::UnparsableTimestamp,
            TemporalError::Stale { .. } => VerdictReason::StaleReceipt,
            TemporalError::Future { .. } => VerdictReason::FutureReceipt,
        }
    }
}

impl fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message(Locale::English))
    }
}

/// Troubleshooting echo attached to every verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictDebug {
    pub clean_text: String,
    pub reason_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_matching: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_time: Option<DateTime<Utc>>,
}

/// Intermediate results worth reporting alongside the verdict
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub name_match: Option<NameMatch>,
    pub receipt_time: Option<DateTime<Utc>>,
}

/// Result of one verification call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    matched: bool,
    #[serde(skip)]
    reason: VerdictReason,
    #[serde(rename = "reason")]
    message: String,
    #[serde(flatten)]
    fields: ExtractedFields,
    debug: VerdictDebug,
}

impl Verdict {
    pub fn matched(&self) -> bool {
        self.matched
    }

    pub fn reason(&self) -> VerdictReason {
        self.reason
    }

    /// Reason text in the configured language
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Every field the extractor found, whether or not verification passed
    pub fn fields(&self) -> &ExtractedFields {
        &self.fields
    }

    pub fn debug(&self) -> &VerdictDebug {
        &self.debug
    }

    /// Serialize to the boundary JSON shape
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Turns the pipeline outcome into a verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictAssembler {
    locale: Locale,
}

impl VerdictAssembler {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Build a verdict from the first failing check, if any.
    ///
    /// `Ok(())` means every check passed.
    pub fn assemble(
        &self,
        outcome: Result<(), VerdictReason>,
        fields: ExtractedFields,
        clean_text: &NormalizedText,
        diagnostics: Diagnostics,
    ) -> Verdict {
        let reason = match outcome {
            Ok(()) => VerdictReason::Matched,
            Err(reason) => reason,
        };

        Verdict {
            matched: reason == VerdictReason::Matched,
            reason,
            message: reason.message(self.locale).to_string(),
            fields,
            debug: VerdictDebug {
                clean_text: clean_text.as_str().to_string(),
                reason_code: reason.code().to_string(),
                name_matching: diagnostics.name_match.as_ref().map(NameMatch::summary),
                receipt_time: diagnostics.receipt_time,
            },
        }
    }
}
