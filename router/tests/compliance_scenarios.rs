// End-to-end compliance checks through the checker facade

mod common;

use accredit_common::{
    codec::encode_whitelist_entry,
    compliance::{CompliancePolicy, DenialReason},
    kyc::{Jurisdiction, KycLevel},
};
use accredit_router::{
    ComplianceProofAdapter, ComplianceWitness, KycComplianceChecker, ProofOutcome, RouterConfig,
};
use common::*;

fn policy() -> CompliancePolicy {
    CompliancePolicy::new(KycLevel::Standard, 0b000011, NOW)
}

fn checker(ledger: std::sync::Arc<accredit_router::MemoryLedger>) -> KycComplianceChecker {
    KycComplianceChecker::new(ledger, deriver(), TRANSFER_HOOK_PROGRAM)
}

#[tokio::test]
async fn test_enhanced_singapore_wallet_is_compliant() {
    let ledger = ledger();
    let checker = checker(ledger.clone());
    let trader = wallet(1);
    let entry = whitelist_entry(trader, KycLevel::Enhanced, Jurisdiction::Singapore);
    let (address, _) = checker.derive_whitelist_address(&trader).unwrap();
    ledger.insert_account(address, TRANSFER_HOOK_PROGRAM, encode_whitelist_entry(&entry));

    let verdict = checker.check_trader_compliance(&trader, &policy()).await.unwrap();
    assert!(verdict.is_compliant);
    assert_eq!(verdict.reason, None);
    assert_eq!(verdict.entry, Some(entry));
}

#[tokio::test]
async fn test_basic_wallet_below_minimum_level() {
    let ledger = ledger();
    let checker = checker(ledger.clone());
    let trader = wallet(2);
    let entry = whitelist_entry(trader, KycLevel::Basic, Jurisdiction::Singapore);
    let (address, _) = checker.derive_whitelist_address(&trader).unwrap();
    ledger.insert_account(address, TRANSFER_HOOK_PROGRAM, encode_whitelist_entry(&entry));

    let verdict = checker.check_trader_compliance(&trader, &policy()).await.unwrap();
    assert!(!verdict.is_compliant);
    assert_eq!(verdict.reason_code(), Some("below-minimum-level"));
    assert_eq!(
        verdict.reason,
        Some(DenialReason::BelowMinimumLevel {
            actual: KycLevel::Basic,
            required: KycLevel::Standard,
        })
    );
}

#[tokio::test]
async fn test_unknown_wallet_has_no_record() {
    let checker = checker(ledger());

    let verdict = checker
        .check_trader_compliance(&wallet(3), &policy())
        .await
        .unwrap();
    assert!(!verdict.is_compliant);
    assert_eq!(verdict.reason, Some(DenialReason::NoRecord));
    assert_eq!(verdict.reason_code(), Some("no-record"));
    assert!(verdict.entry.is_none());
}

#[tokio::test]
async fn test_usa_wallet_outside_bitmask() {
    let ledger = ledger();
    let checker = checker(ledger.clone());
    let trader = wallet(4);
    let entry = whitelist_entry(trader, KycLevel::Institutional, Jurisdiction::Usa);
    let (address, _) = checker.derive_whitelist_address(&trader).unwrap();
    ledger.insert_account(address, TRANSFER_HOOK_PROGRAM, encode_whitelist_entry(&entry));

    let verdict = checker.check_trader_compliance(&trader, &policy()).await.unwrap();
    assert_eq!(
        verdict.reason,
        Some(DenialReason::JurisdictionNotAllowed(Jurisdiction::Usa))
    );
}

#[tokio::test]
async fn test_checker_from_config() {
    let json = format!(
        r#"{{ "transfer_hook_program_id": "{TRANSFER_HOOK_PROGRAM}", "cache_capacity": 2 }}"#
    );
    let config = RouterConfig::from_json_str(&json).unwrap();

    let ledger = ledger();
    let checker = KycComplianceChecker::from_config(ledger.clone(), deriver(), &config).unwrap();
    assert_eq!(checker.program_id(), &TRANSFER_HOOK_PROGRAM);

    for seed in 10..13 {
        let trader = wallet(seed);
        let entry = whitelist_entry(trader, KycLevel::Standard, Jurisdiction::Japan);
        let (address, _) = checker.derive_whitelist_address(&trader).unwrap();
        ledger.insert_account(address, TRANSFER_HOOK_PROGRAM, encode_whitelist_entry(&entry));
        let verdict = checker.check_trader_compliance(&trader, &policy()).await.unwrap();
        assert!(verdict.is_compliant);
    }
    assert_eq!(checker.cache().len().await, 2);
}

#[tokio::test]
async fn test_direct_evaluation_fallback_without_prover() {
    let ledger = ledger();
    let checker = checker(ledger.clone());
    let trader = wallet(5);
    let entry = whitelist_entry(trader, KycLevel::Enhanced, Jurisdiction::Japan);
    let (address, _) = checker.derive_whitelist_address(&trader).unwrap();
    ledger.insert_account(address, TRANSFER_HOOK_PROGRAM, encode_whitelist_entry(&entry));

    let adapter = ComplianceProofAdapter::disabled();
    let witness = ComplianceWitness::new(&entry, &policy());
    let outcome = adapter.prove_compliance(&witness).await;
    assert_eq!(outcome, ProofOutcome::Unavailable);

    // Callers fall back to evaluating the entry directly
    let verdict = checker.check_trader_compliance(&trader, &policy()).await.unwrap();
    assert_eq!(verdict.is_compliant, witness.statement_holds());
}
