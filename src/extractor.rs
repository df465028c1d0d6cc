//! Field extraction from normalized receipt text
//!
//! Each field is found by an ordered chain of strategies. The first
//! strategy in a chain that yields an acceptable value wins; a chain that
//! yields nothing leaves the field absent. Absence is never an error here,
//! the verifier decides what a missing field means.

use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use crate::config::AccountLengthBounds;
use crate::normalizer::{strip_whitespace, NormalizedText};
use crate::types::{ExtractedFields, Field};

/// Label separators tolerated between a field label and its value
macro_rules! sep {
    () => {
        r"[\s:#.\-]*"
    };
}

re!(re_transaction_label, concat!(
    r"(?i)(?:رقم\s*(?:ال)?عملي[ةه]|رقم\s*(?:ال)?معامل[ةه]|رقم\s*(?:ال)?تحويل",
    r"|\btransaction\s*(?:id|no\b\.?|number|#)?|\btxn\s*(?:id|no\b\.?)?",
    r"|\boperation\s*(?:id|no\b\.?|number))",
    sep!(),
    r"([0-9]{8,15})\b"
));
re!(re_reference_label, concat!(
    r"(?i)(?:رقم\s*(?:ال)?مرجع|المرجع|\breference\s*(?:id|no\b\.?|number)?|\bref\b\.?\s*(?:no\b\.?|#)?)",
    sep!(),
    r"([0-9]{8,15})\b"
));

re!(re_numeric_date_time, concat!(
    r"(?i)\b[0-9]{1,2}[-/.][0-9]{1,2}[-/.][0-9]{4}",
    time_of_day!()
));
re!(re_month_name_date_time, concat!(
    r"(?i)\b[0-9]{1,2}[-/ ]",
    month_names!(),
    r"\.?[-/ ,]+[0-9]{4}",
    time_of_day!()
));
re!(re_numeric_dash_date, r"\b[0-9]{1,2}-[0-9]{1,2}-[0-9]{4}\b");
re!(re_numeric_slash_date, r"\b[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}\b");
re!(re_month_name_date, concat!(
    r"(?i)\b[0-9]{1,2}[-/ ]",
    month_names!(),
    r"\.?[-/ ,]+[0-9]{4}\b"
));

macro_rules! currency {
    () => {
        r"(?:egp|sar|usd|aed|kwd|\$|جنيه|ج\.م\.?|ريال|درهم|دولار)"
    };
}

re!(re_amount_label, concat!(
    r"(?i)(?:المبلغ|مبلغ(?:\s*التحويل)?|قيمة\s*التحويل|\btransfer\s+amount|\bamount)",
    r"[\s:]*(?:",
    currency!(),
    r"\s*)?([0-9][0-9,]*(?:\.[0-9]+)?)"
));

re!(re_to_account_label, concat!(
    r"(?i)(?:\bto\s+account(?:\s*(?:no\b\.?|number))?|\bbeneficiary\s+account(?:\s*(?:no\b\.?|number))?",
    r"|\bdestination\s+account|\bcredit\s+account|(?:إلى|الى|الي)\s*(?:ال)?حساب",
    r"|رقم\s*حساب\s*المستفيد|حساب\s*المستفيد)",
    sep!(),
    r"([0-9][0-9 ]*[0-9])"
));
re!(re_account_label, concat!(
    r"(?i)(?:\baccount(?:\s*(?:no\b\.?|number|#))?|\biban|رقم\s*(?:ال)?حساب|(?:ال)?حساب)",
    sep!(),
    r"([0-9][0-9 ]*[0-9])"
));
re!(re_grouped_account, r"\b[0-9]{4} ?[0-9]{4} ?[0-9]{4} ?[0-9]{2,4}\b");
re!(re_contiguous_digits, r"\b[0-9]{8,}\b");

re!(re_digit_group, r"[0-9]+");

re!(re_from_tail, concat!(
    r"(?i)(?:\bfrom|\bمن)\s*(?:(?:ال)?(?:حساب)?|account(?:\s*(?:no\b\.?|number|#))?)",
    sep!(),
    r"$"
));
re!(re_transaction_tail, concat!(
    r"(?i)(?:عملي[ةه]|معامل[ةه]|مرجع|\btransaction\s*(?:id|no\.?|number|#)?",
    r"|\btxn\s*(?:id|no\.?)?|\boperation\s*(?:id|no\.?|number)|\breference\s*(?:id|no\.?|number)?|\bref\.?)",
    sep!(),
    r"$"
));

re!(re_recipient_label, concat!(
    r"(?i)(?:\bbeneficiary(?:\s+name)?\b|\brecipient(?:\s+name)?\b|\bpayee(?:\s+name)?\b",
    r"|اسم\s*المستفيد|المستفيد|المرسل\s*(?:إليه|اليه)|المحول\s*(?:إليه|اليه))",
    r"[\s:\-]*([^0-9:.|]{1,200})"
));
re!(re_name_label, r"(?i)(?:\bname\b|\bاسم)[\s:\-]*([^0-9:.|]{1,200})");
re!(re_to_label, r"(?i)(?:\bto\b|\bإلى|\bالى|\bالي\b)[\s:\-]*([^0-9:.|]{1,200})");

/// Words that start another field's label; a recipient span ends at the first one
const NAME_STOP_WORDS: &[&str] = &[
    "amount", "account", "acc", "date", "time", "transaction", "txn", "reference", "ref",
    "iban", "from", "to", "via", "bank", "status", "fee", "fees", "total", "operation",
    "beneficiary", "recipient", "payee", "name",
    "المبلغ", "مبلغ", "حساب", "الحساب", "التاريخ", "تاريخ", "الوقت", "رقم", "العملية",
    "العمليه", "من", "إلى", "الى", "البنك", "الحالة", "الحاله", "الرسوم", "المرجع",
    "المستفيد", "اسم",
];

/// Shortest and longest accepted recipient name, in characters
const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 80;

/// A single way of finding one field in normalized receipt text
pub trait FieldStrategy: Send + Sync {
    /// Field this strategy extracts
    fn field(&self) -> Field;

    /// Stable name reported in diagnostics
    fn name(&self) -> &str;

    /// Try to extract the field, returning `None` when nothing acceptable matches
    fn try_extract(&self, text: &str) -> Option<String>;
}

/// Date layouts recognized on receipts, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampShape {
    /// `19-10-2026 14:05`, `19/10/2026 2:05 pm`
    NumericDateTime,
    /// `19-Oct-2026 14:05`, `19 أكتوبر 2026 14:05`
    MonthNameDateTime,
    /// `19-10-2026`
    NumericDashDate,
    /// `19/10/2026`
    NumericSlashDate,
    /// `19-Oct-2026`
    MonthNameDate,
}

impl TimestampShape {
    pub const PRIORITY: [TimestampShape; 5] = [
        TimestampShape::NumericDateTime,
        TimestampShape::MonthNameDateTime,
        TimestampShape::NumericDashDate,
        TimestampShape::NumericSlashDate,
        TimestampShape::MonthNameDate,
    ];

    fn regex(&self) -> &'static regex::Regex {
        match self {
            TimestampShape::NumericDateTime => re_numeric_date_time(),
            TimestampShape::MonthNameDateTime => re_month_name_date_time(),
            TimestampShape::NumericDashDate => re_numeric_dash_date(),
            TimestampShape::NumericSlashDate => re_numeric_slash_date(),
            TimestampShape::MonthNameDate => re_month_name_date(),
        }
    }
}

/// Strategies shipped with the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinStrategy {
    /// Number after a "transaction id" / "operation number" label
    TransactionLabel,
    /// Number after a "reference" label
    ReferenceLabel,
    Timestamp(TimestampShape),
    /// Number after an "amount" label, with optional currency marker
    AmountLabel,
    /// Digits after a "to account" / beneficiary account label
    ToAccountLabel(AccountLengthBounds),
    /// Digits after a generic "account" label not preceded by "from"
    AccountLabel(AccountLengthBounds),
    /// Unlabeled number printed in groups of four
    GroupedAccount(AccountLengthBounds),
    /// Unlabeled run of digits whose length fits the bounds
    ContiguousAccount(AccountLengthBounds),
    /// Text after a beneficiary / recipient label
    RecipientLabel,
    /// Text after a "name" label
    NameLabel,
    /// Text after a bare "to" label
    ToLabel,
}

impl FieldStrategy for BuiltinStrategy {
    fn field(&self) -> Field {
        match self {
            BuiltinStrategy::TransactionLabel | BuiltinStrategy::ReferenceLabel => Field::TransactionId,
            BuiltinStrategy::Timestamp(_) => Field::Timestamp,
            BuiltinStrategy::AmountLabel => Field::Amount,
            BuiltinStrategy::ToAccountLabel(_)
            | BuiltinStrategy::AccountLabel(_)
            | BuiltinStrategy::GroupedAccount(_)
            | BuiltinStrategy::ContiguousAccount(_) => Field::Account,
            BuiltinStrategy::RecipientLabel | BuiltinStrategy::NameLabel | BuiltinStrategy::ToLabel => {
                Field::RecipientName
            }
        }
    }

    fn name(&self) -> &str {
        match self {
            BuiltinStrategy::TransactionLabel => "transaction_label",
            BuiltinStrategy::ReferenceLabel => "reference_label",
            BuiltinStrategy::Timestamp(TimestampShape::NumericDateTime) => "numeric_date_time",
            BuiltinStrategy::Timestamp(TimestampShape::MonthNameDateTime) => "month_name_date_time",
            BuiltinStrategy::Timestamp(TimestampShape::NumericDashDate) => "numeric_dash_date",
            BuiltinStrategy::Timestamp(TimestampShape::NumericSlashDate) => "numeric_slash_date",
            BuiltinStrategy::Timestamp(TimestampShape::MonthNameDate) => "month_name_date",
            BuiltinStrategy::AmountLabel => "amount_label",
            BuiltinStrategy::ToAccountLabel(_) => "to_account_label",
            BuiltinStrategy::AccountLabel(_) => "account_label",
            BuiltinStrategy::GroupedAccount(_) => "grouped_account",
            BuiltinStrategy::ContiguousAccount(_) => "contiguous_account",
            BuiltinStrategy::RecipientLabel => "recipient_label",
            BuiltinStrategy::NameLabel => "name_label",
            BuiltinStrategy::ToLabel => "to_label",
        }
    }

    fn try_extract(&self, text: &str) -> Option<String> {
        match *self {
            BuiltinStrategy::TransactionLabel => first_capture(re_transaction_label(), text),
            BuiltinStrategy::ReferenceLabel => first_capture(re_reference_label(), text),
            BuiltinStrategy::Timestamp(shape) => {
                shape.regex().find(text).map(|m| m.as_str().to_string())
            }
            BuiltinStrategy::AmountLabel => first_capture(re_amount_label(), text)
                .map(|amount| amount.trim_end_matches(',').to_string()),
            BuiltinStrategy::ToAccountLabel(bounds) => re_to_account_label()
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .find_map(|span| labeled_account(text, span, bounds)),
            BuiltinStrategy::AccountLabel(bounds) => re_account_label()
                .captures_iter(text)
                .filter(|caps| caps.get(0).map_or(false, |m| !preceded_by_from(text, m.start())))
                .filter_map(|caps| caps.get(1))
                .find_map(|span| labeled_account(text, span, bounds)),
            BuiltinStrategy::GroupedAccount(bounds) => re_grouped_account()
                .find_iter(text)
                .filter(|m| unlabeled_candidate(text, m.start()))
                .map(|m| strip_whitespace(m.as_str()))
                .find(|digits| bounds.contains(digits.len())),
            BuiltinStrategy::ContiguousAccount(bounds) => re_contiguous_digits()
                .find_iter(text)
                .filter(|m| unlabeled_candidate(text, m.start()))
                .map(|m| m.as_str().to_string())
                .find(|digits| bounds.contains(digits.len())),
            BuiltinStrategy::RecipientLabel => name_candidate(re_recipient_label(), text),
            BuiltinStrategy::NameLabel => name_candidate(re_name_label(), text),
            BuiltinStrategy::ToLabel => name_candidate(re_to_label(), text),
        }
    }
}

fn first_capture(regex: &regex::Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn preceded_by_from(text: &str, start: usize) -> bool {
    re_from_tail().is_match(&text[..start])
}

/// An unlabeled number must not directly follow a transaction id label or a
/// sender label such as `from`, `from account no.` or `من حساب`
fn unlabeled_candidate(text: &str, start: usize) -> bool {
    let prefix = &text[..start];
    !re_transaction_tail().is_match(prefix) && !re_from_tail().is_match(prefix)
}

/// Account digits from a labeled span, ending before the first group that
/// belongs to a date or time (`15-oct-2026`, `19/10`, `14:03`).
fn labeled_account(text: &str, span: regex::Match<'_>, bounds: AccountLengthBounds) -> Option<String> {
    let end = re_digit_group()
        .find_iter(span.as_str())
        .find(|group| starts_date_part(&text[span.start() + group.end()..]))
        .map_or(span.end(), |group| span.start() + group.start());
    leading_account(&text[span.start()..end], bounds)
}

fn starts_date_part(rest: &str) -> bool {
    let mut chars = rest.chars();
    matches!(chars.next(), Some('-' | '/' | ':' | '.'))
        && chars.next().map_or(false, char::is_alphanumeric)
}

/// Longest leading run of digit groups whose total length fits `bounds`.
///
/// A labeled span such as `1234 5678 9012 3456 2026` keeps the first four
/// groups; a single run longer than the bounds yields nothing.
pub fn leading_account(span: &str, bounds: AccountLengthBounds) -> Option<String> {
    let mut digits = String::new();
    let mut best = None;
    for group in span.split_whitespace() {
        digits.push_str(group);
        if digits.len() > bounds.max {
            break;
        }
        if bounds.contains(digits.len()) {
            best = Some(digits.clone());
        }
    }
    best
}

/// Parse an extracted amount such as `1,250.50`, dropping grouping commas
pub fn parse_amount(amount: &str) -> Option<f64> {
    let plain: String = amount.chars().filter(|c| *c != ',').collect();
    plain.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn name_candidate(regex: &regex::Regex, text: &str) -> Option<String> {
    regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|span| clean_name_span(span.as_str()))
}

/// Cut a captured recipient span down to an acceptable name, if any.
pub fn clean_name_span(span: &str) -> Option<String> {
    let kept: Vec<&str> = span
        .split_whitespace()
        .take_while(|token| {
            let word = token.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase();
            !NAME_STOP_WORDS.contains(&word.as_str())
        })
        .collect();

    let joined = kept.join(" ");
    let name = joined
        .trim_start_matches(|c: char| !c.is_alphabetic())
        .trim_end_matches(|c: char| !c.is_alphabetic());

    let length = name.chars().count();
    if (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&length) && name.chars().any(char::is_alphabetic) {
        Some(name.to_string())
    } else {
        None
    }
}

/// Which strategy produced a field's value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: Field,
    pub strategy: String,
}

/// Result of running every strategy chain over a text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub fields: ExtractedFields,
    pub matched_by: Vec<FieldMatch>,
}

impl Extraction {
    /// Name of the strategy that matched a field
    pub fn strategy_for(&self, field: Field) -> Option<&str> {
        self.matched_by
            .iter()
            .find(|m| m.field == field)
            .map(|m| m.strategy.as_str())
    }
}

/// Ordered strategy chains, one per field
pub struct FieldExtractor {
    chains: HashMap<Field, Vec<Box<dyn FieldStrategy>>>,
}

impl FieldExtractor {
    /// Create an extractor with the built-in chains
    pub fn new(bounds: AccountLengthBounds) -> Self {
        let builtins = [
            BuiltinStrategy::TransactionLabel,
            BuiltinStrategy::ReferenceLabel,
            BuiltinStrategy::Timestamp(TimestampShape::NumericDateTime),
            BuiltinStrategy::Timestamp(TimestampShape::MonthNameDateTime),
            BuiltinStrategy::Timestamp(TimestampShape::NumericDashDate),
            BuiltinStrategy::Timestamp(TimestampShape::NumericSlashDate),
            BuiltinStrategy::Timestamp(TimestampShape::MonthNameDate),
            BuiltinStrategy::AmountLabel,
            BuiltinStrategy::ToAccountLabel(bounds),
            BuiltinStrategy::AccountLabel(bounds),
            BuiltinStrategy::GroupedAccount(bounds),
            BuiltinStrategy::ContiguousAccount(bounds),
            BuiltinStrategy::RecipientLabel,
            BuiltinStrategy::NameLabel,
            BuiltinStrategy::ToLabel,
        ];

        let mut extractor = Self::empty();
        for strategy in builtins {
            extractor.push_strategy(Box::new(strategy));
        }
        extractor
    }

    /// Create an extractor with no strategies at all
    pub fn empty() -> Self {
        Self {
            chains: HashMap::new(),
        }
    }

    /// Append a strategy to the end of its field's chain
    pub fn push_strategy(&mut self, strategy: Box<dyn FieldStrategy>) {
        self.chains.entry(strategy.field()).or_default().push(strategy);
    }

    /// Names of the strategies tried for a field, in order
    pub fn strategy_names(&self, field: Field) -> Vec<&str> {
        self.chains
            .get(&field)
            .map(|chain| chain.iter().map(|s| s.name()).collect())
            .unwrap_or_default()
    }

    /// Run one field's chain, returning the value and the strategy that found it
    pub fn extract_field(&self, field: Field, text: &NormalizedText) -> Option<(String, &str)> {
        self.chains.get(&field)?.iter().find_map(|strategy| {
            strategy
                .try_extract(text.as_str())
                .map(|value| (value, strategy.name()))
        })
    }

    /// Run every chain over the text
    pub fn extract(&self, text: &NormalizedText) -> Extraction {
        let mut extraction = Extraction::default();
        for field in Field::ALL {
            if let Some((value, strategy)) = self.extract_field(field, text) {
                extraction.fields.set(field, value);
                extraction.matched_by.push(FieldMatch {
                    field,
                    strategy: strategy.to_string(),
                });
            }
        }
        extraction
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(AccountLengthBounds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::Normalizer;

    fn normalized(text: &str) -> NormalizedText {
        Normalizer::default().normalize(text)
    }

    #[test]
    fn test_transaction_id_requires_label() {
        let extractor = FieldExtractor::default();
        let text = normalized("Transfer 12345678901 done");
        assert_eq!(extractor.extract_field(Field::TransactionId, &text), None);

        let text = normalized("رقم العملية: 12345678901");
        let (id, strategy) = extractor.extract_field(Field::TransactionId, &text).unwrap();
        assert_eq!(id, "12345678901");
        assert_eq!(strategy, "transaction_label");
    }

    #[test]
    fn test_transaction_id_keeps_leading_zeros() {
        let extractor = FieldExtractor::default();
        let text = normalized("Transaction ID: 00012345678");
        let (id, _) = extractor.extract_field(Field::TransactionId, &text).unwrap();
        assert_eq!(id, "00012345678");
    }

    #[test]
    fn test_transaction_id_rejects_too_long_number() {
        let extractor = FieldExtractor::default();
        let text = normalized("Transaction ID: 1234567890123456");
        assert_eq!(extractor.extract_field(Field::TransactionId, &text), None);
    }

    #[test]
    fn test_timestamp_prefers_time_shapes() {
        let extractor = FieldExtractor::default();
        let text = normalized("Date: 19-Oct-2026 14:05 ref");
        let (stamp, strategy) = extractor.extract_field(Field::Timestamp, &text).unwrap();
        assert_eq!(stamp, "19-oct-2026 14:05");
        assert_eq!(strategy, "month_name_date_time");

        let text = normalized("Date 19/10/2026");
        let (stamp, strategy) = extractor.extract_field(Field::Timestamp, &text).unwrap();
        assert_eq!(stamp, "19/10/2026");
        assert_eq!(strategy, "numeric_slash_date");
    }

    #[test]
    fn test_leading_account_trims_trailing_groups() {
        let bounds = AccountLengthBounds::default();
        assert_eq!(
            leading_account("1234 5678 9012 3456 2026", bounds).as_deref(),
            Some("1234567890123456")
        );
        assert_eq!(leading_account("12345678901234567", bounds), None);
        assert_eq!(leading_account("1234 5678", bounds), None);
    }

    #[test]
    fn test_account_stops_before_following_date() {
        let extractor = FieldExtractor::default();
        let text = normalized("To account: 12345678901234\n15-Oct-2026 14:03");
        let (account, strategy) = extractor.extract_field(Field::Account, &text).unwrap();
        assert_eq!(account, "12345678901234");
        assert_eq!(strategy, "to_account_label");

        let text = normalized("account 12345678901234 19/10/2026");
        let (account, strategy) = extractor.extract_field(Field::Account, &text).unwrap();
        assert_eq!(account, "12345678901234");
        assert_eq!(strategy, "account_label");

        let text = normalized("To account: 1234 5678 9012 3456.");
        let (account, _) = extractor.extract_field(Field::Account, &text).unwrap();
        assert_eq!(account, "1234567890123456");
    }

    #[test]
    fn test_unlabeled_fallback_skips_sender_account() {
        let extractor = FieldExtractor::default();
        let text = normalized("From account: 9999 8888 7777 6666");
        assert_eq!(extractor.extract_field(Field::Account, &text), None);

        let text = normalized("From account no. 9999 8888 7777 6666\npaid 1234 5678 9012 3456");
        let (account, strategy) = extractor.extract_field(Field::Account, &text).unwrap();
        assert_eq!(account, "1234567890123456");
        assert_eq!(strategy, "grouped_account");

        let text = normalized("من حساب: 99998888777766");
        assert_eq!(extractor.extract_field(Field::Account, &text), None);
    }

    #[test]
    fn test_account_skips_sender() {
        let extractor = FieldExtractor::default();
        let text = normalized("From account: 1111 2222 3333 4444 To account: 5555 6666 7777 8888");
        let (account, strategy) = extractor.extract_field(Field::Account, &text).unwrap();
        assert_eq!(account, "5555666677778888");
        assert_eq!(strategy, "to_account_label");

        let text = normalized("from account 1111222233334444 account: 5555666677778888");
        let (account, strategy) = extractor.extract_field(Field::Account, &text).unwrap();
        assert_eq!(account, "5555666677778888");
        assert_eq!(strategy, "account_label");
    }

    #[test]
    fn test_account_fallback_ignores_transaction_id() {
        let extractor = FieldExtractor::default();
        let text = normalized("Transaction ID: 123456789012345 paid 9876 5432 1098 7654");
        let (account, strategy) = extractor.extract_field(Field::Account, &text).unwrap();
        assert_eq!(account, "9876543210987654");
        assert_eq!(strategy, "grouped_account");
    }

    #[test]
    fn test_name_stops_at_next_label() {
        let extractor = FieldExtractor::default();
        let text = normalized("Beneficiary: Ahmed Ali Mohamed Amount: 500 EGP");
        let (name, strategy) = extractor.extract_field(Field::RecipientName, &text).unwrap();
        assert_eq!(name, "ahmed ali mohamed");
        assert_eq!(strategy, "recipient_label");
    }

    #[test]
    fn test_name_rejects_account_label_span() {
        let extractor = FieldExtractor::default();
        let text = normalized("to account 1234567890123456 to: sara hassan");
        let (name, strategy) = extractor.extract_field(Field::RecipientName, &text).unwrap();
        assert_eq!(name, "sara hassan");
        assert_eq!(strategy, "to_label");
    }

    #[test]
    fn test_name_stop_words_ignore_case() {
        assert_eq!(clean_name_span("Ahmed Ali Mohamed Amount").as_deref(), Some("Ahmed Ali Mohamed"));
        assert_eq!(clean_name_span("Account"), None);

        let extractor = FieldExtractor::default();
        let text = Normalizer::new(false).normalize("To Account: 1234567890123456 To: Ahmed Ali");
        let (name, strategy) = extractor.extract_field(Field::RecipientName, &text).unwrap();
        assert_eq!(name, "Ahmed Ali");
        assert_eq!(strategy, "to_label");
    }

    #[test]
    fn test_clean_name_span_rules() {
        assert_eq!(clean_name_span(" -- ").as_deref(), None);
        assert_eq!(clean_name_span("ab").as_deref(), None);
        assert_eq!(clean_name_span("محمد أحمد -").as_deref(), Some("محمد أحمد"));
        assert_eq!(clean_name_span(&"a".repeat(81)), None);
    }

    #[test]
    fn test_amount_with_currency() {
        let extractor = FieldExtractor::default();
        let text = normalized("Amount: EGP 1,250.50");
        let (amount, _) = extractor.extract_field(Field::Amount, &text).unwrap();
        assert_eq!(amount, "1,250.50");

        let text = normalized("المبلغ 300 جنيه");
        let (amount, _) = extractor.extract_field(Field::Amount, &text).unwrap();
        assert_eq!(amount, "300");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,250.50"), Some(1250.5));
        assert_eq!(parse_amount("0"), Some(0.0));
        assert_eq!(parse_amount("1.2.3"), None);
    }

    struct FixedStrategy;

    impl FieldStrategy for FixedStrategy {
        fn field(&self) -> Field {
            Field::TransactionId
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn try_extract(&self, text: &str) -> Option<String> {
            text.strip_prefix("op#").map(|rest| rest.to_string())
        }
    }

    #[test]
    fn test_custom_strategy_appended() {
        let mut extractor = FieldExtractor::default();
        extractor.push_strategy(Box::new(FixedStrategy));
        assert_eq!(
            extractor.strategy_names(Field::TransactionId),
            vec!["transaction_label", "reference_label", "fixed"]
        );

        let text = normalized("op#A-77");
        let extraction = extractor.extract(&text);
        assert_eq!(extraction.fields.transaction_id.as_deref(), Some("a-77"));
        assert_eq!(extraction.strategy_for(Field::TransactionId), Some("fixed"));
    }
}
