use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rvp::{
    Locale, Stage, VerdictReason, VerificationConfig, VerificationRequest, Verifier,
};

const ACCOUNT: &str = "1234567890123456";
const NAME: &str = "Ahmed Ali";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap()
}

fn verifier() -> Verifier {
    Verifier::new(VerificationConfig::standard()).unwrap()
}

/// Receipt in the layout most banks print, issued `age` before `now()`
fn receipt(transaction_id: &str, age: Duration) -> String {
    let issued = (now() - age).format("%d-%b-%Y %H:%M:%S");
    format!(
        "Bank Misr\nTransfer completed\nTransaction ID: {}\nDate: {}\n\
         From account: 9999 8888 7777 6666\nTo account: 1234 5678 9012 3456\n\
         To: Ahmed Ali Mohamed\nAmount: EGP 750.00",
        transaction_id, issued
    )
}

fn request(transaction_id: &str) -> VerificationRequest {
    VerificationRequest {
        raw_text: receipt(transaction_id, Duration::minutes(2)),
        claimed_account: ACCOUNT.to_string(),
        claimed_name: NAME.to_string(),
        submitted_at: now(),
    }
}

#[test]
fn test_valid_receipt_then_replay() {
    let verifier = verifier();
    let raw = receipt("12345678901", Duration::minutes(2));

    let verdict = verifier.verify(&raw, ACCOUNT, NAME, now());
    assert!(verdict.matched(), "{:?}", verdict);
    assert_eq!(verdict.message(), "match succeeded");
    assert_eq!(verdict.fields().transaction_id.as_deref(), Some("12345678901"));
    assert_eq!(verdict.fields().timestamp.as_deref(), Some("19-oct-2026 14:03:00"));
    assert_eq!(verdict.fields().account.as_deref(), Some(ACCOUNT));
    assert_eq!(verdict.fields().recipient_name.as_deref(), Some("ahmed ali mohamed"));
    assert_eq!(verdict.fields().amount.as_deref(), Some("750.00"));
    assert_eq!(verdict.debug().receipt_time, Some(now() - Duration::minutes(2)));

    let replay = verifier.verify(&raw, ACCOUNT, NAME, now() + Duration::seconds(30));
    assert!(!replay.matched());
    assert_eq!(replay.reason(), VerdictReason::DuplicateTransaction);
    assert_eq!(replay.message(), "receipt has already been used");
}

#[test]
fn test_case_preserving_config_still_matches() {
    let config = VerificationConfig {
        lowercase: false,
        ..VerificationConfig::standard()
    };
    let verifier = Verifier::new(config).unwrap();
    let raw = receipt("12345678901", Duration::minutes(2));

    let verdict = verifier.verify(&raw, ACCOUNT, NAME, now());
    assert!(verdict.matched(), "{:?}", verdict);
    assert_eq!(verdict.fields().recipient_name.as_deref(), Some("Ahmed Ali Mohamed"));
    assert_eq!(verdict.fields().account.as_deref(), Some(ACCOUNT));
}

#[test]
fn test_short_account_followed_by_date_line() {
    let raw = "Transaction ID: 12345678901\nTo account: 12345678901234\n\
               19-Oct-2026 14:03\nTo: Ahmed Ali";

    let verdict = verifier().verify(raw, "12345678901234", NAME, now());
    assert!(verdict.matched(), "{:?}", verdict);
    assert_eq!(verdict.fields().account.as_deref(), Some("12345678901234"));
    assert_eq!(verdict.fields().timestamp.as_deref(), Some("19-oct-2026 14:03"));
}

#[test]
fn test_empty_text() {
    let verdict = verifier().verify("", ACCOUNT, NAME, now());
    assert_eq!(verdict.reason(), VerdictReason::MissingTransactionId);
    assert_eq!(verdict.fields(), &rvp::ExtractedFields::default());
    assert_eq!(verdict.debug().clean_text, "");
}

#[test]
fn test_stale_receipt_depends_on_profile() {
    let raw = receipt("12345678901", Duration::minutes(20));

    let verdict = verifier().verify(&raw, ACCOUNT, NAME, now());
    assert_eq!(verdict.reason(), VerdictReason::StaleReceipt);
    assert_eq!(verdict.message(), "receipt is too old");

    let lenient = Verifier::new(VerificationConfig::lenient()).unwrap();
    assert!(lenient.verify(&raw, ACCOUNT, NAME, now()).matched());
}

#[test]
fn test_future_receipt() {
    let raw = receipt("12345678901", -Duration::minutes(10));
    let verdict = verifier().verify(&raw, ACCOUNT, NAME, now());
    assert_eq!(verdict.reason(), VerdictReason::FutureReceipt);
}

#[test]
fn test_account_mismatch_reported_before_name_mismatch() {
    let verdict = verifier().verify(
        &receipt("12345678901", Duration::minutes(2)),
        "1234567890123457",
        "Sara Hassan",
        now(),
    );
    assert_eq!(verdict.reason(), VerdictReason::AccountMismatch);
    assert_eq!(verdict.debug().name_matching, None);
}

#[test]
fn test_name_mismatch_carries_diagnostics() {
    let verdict = verifier().verify(
        &receipt("12345678901", Duration::minutes(2)),
        ACCOUNT,
        "Ahmed Hassan Ibrahim",
        now(),
    );
    assert_eq!(verdict.reason(), VerdictReason::NameMismatch);
    assert_eq!(verdict.debug().name_matching.as_deref(), Some("1/3"));
}

#[test]
fn test_sender_account_claim_rejected() {
    let verdict = verifier().verify(
        &receipt("12345678901", Duration::minutes(2)),
        "9999 8888 7777 6666",
        NAME,
        now(),
    );
    assert_eq!(verdict.reason(), VerdictReason::AccountMismatch);
}

#[test]
fn test_arabic_receipt_and_locale() {
    let config = VerificationConfig::standard().with_locale(Locale::Arabic);
    let verifier = Verifier::new(config).unwrap();
    let raw = "تحويل ناجح\nرقم العملية: ١٢٣٤٥٦٧٨٩٠١\nالتاريخ: ١٩ أكتوبر ٢٠٢٦ ٠٢:٠٣ م\n\
               إلى حساب: ١٢٣٤ ٥٦٧٨ ٩٠١٢ ٣٤٥٦\nالمستفيد: أحمد علي محمد\nالمبلغ: ٥٠٠ جنيه";

    let verdict = verifier.verify(raw, "١٢٣٤٥٦٧٨٩٠١٢٣٤٥٦", "احمد علي", now());
    assert!(verdict.matched(), "{:?}", verdict);
    assert_eq!(verdict.message(), "مطابقة ناجحة");

    let replay = verifier.verify(raw, ACCOUNT, "احمد علي", now());
    assert_eq!(replay.message(), "تم استخدام هذا الإيصال مسبقًا");
}

#[test]
fn test_verdict_json() {
    let verdict = verifier().verify(&receipt("12345678901", Duration::minutes(2)), ACCOUNT, NAME, now());
    let json: serde_json::Value = serde_json::from_str(&verdict.to_json().unwrap()).unwrap();

    assert_eq!(json["matched"], true);
    assert_eq!(json["reason"], "match succeeded");
    assert_eq!(json["transactionId"], "12345678901");
    assert_eq!(json["toAccount"], ACCOUNT);
    assert_eq!(json["toName"], "ahmed ali mohamed");
    assert_eq!(json["debug"]["nameMatching"], "2/2");
    assert_eq!(json["debug"]["reasonCode"], "matched");
    assert!(json["debug"]["cleanText"].as_str().unwrap().starts_with("bank misr"));
}

#[test]
fn test_traced_failure_logs_stage() {
    let raw = receipt("12345678901", Duration::minutes(20));
    let (verdict, log) = verifier().verify_traced(&raw, ACCOUNT, NAME, now());

    assert_eq!(verdict.reason(), VerdictReason::StaleReceipt);
    assert_eq!(log.filter_by_stage(Stage::Temporal).len(), 1);
    assert!(log.filter_by_stage(Stage::Duplicate).is_empty());
    assert!(log.entries().iter().all(|e| e.timestamp == now()));
}

#[test]
fn test_batch_allows_one_success_per_transaction() {
    let verifier = verifier();
    let mut requests: Vec<VerificationRequest> = (0..12).map(|_| request("55555555555")).collect();
    requests.push(request("66666666666"));

    let verdicts = verifier.verify_batch(&requests);
    assert_eq!(verdicts.len(), requests.len());

    let shared_matched = verdicts[..12].iter().filter(|v| v.matched()).count();
    assert_eq!(shared_matched, 1);
    assert!(verdicts[..12]
        .iter()
        .filter(|v| !v.matched())
        .all(|v| v.reason() == VerdictReason::DuplicateTransaction));
    assert!(verdicts[12].matched());
}

#[test]
fn test_profile_lookup() {
    let profiles = rvp::ProfileRegistry::with_presets();
    let verifier = Verifier::from_profile(&profiles, "single_token").unwrap();
    assert_eq!(verifier.config().name_match_threshold, 0.0);
    assert!(Verifier::from_profile(&profiles, "paranoid").is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Without a transaction id label nothing else matters
    #[test]
    fn property_missing_transaction_id_dominates(
        noise in "[a-z ]{0,40}",
        age_minutes in 0i64..=600,
        name in "[A-Za-z]{2,10} [A-Za-z]{2,10}",
    ) {
        let raw = receipt("12345678901", Duration::minutes(age_minutes))
            .replace("Transaction ID: 12345678901", &noise);
        let verdict = verifier().verify(&raw, ACCOUNT, &name, now());

        prop_assert!(!verdict.matched());
        prop_assert_eq!(verdict.reason(), VerdictReason::MissingTransactionId);
    }

    /// A malformed claim fails before the receipt is even looked at
    #[test]
    fn property_bad_claim_account_rejected(account in "[0-9]{1,13}|[0-9]{17,20}") {
        let verdict = verifier().verify(&receipt("12345678901", Duration::minutes(2)), &account, NAME, now());
        prop_assert_eq!(verdict.reason(), VerdictReason::InvalidClaim);
    }

    /// Whitespace in the claimed account never changes the outcome
    #[test]
    fn property_claimed_account_spacing(gaps in prop::collection::vec(prop::sample::select(vec!["", " ", "  "]), 16)) {
        let spaced: String = ACCOUNT
            .chars()
            .zip(gaps)
            .map(|(digit, gap)| format!("{}{}", digit, gap))
            .collect();
        let verdict = verifier().verify(&receipt("12345678901", Duration::minutes(2)), &spaced, NAME, now());
        prop_assert!(verdict.matched(), "{:?}", verdict);
    }
}
