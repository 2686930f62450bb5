// Shared fixtures for the router integration tests
#![allow(dead_code)]

use std::sync::Arc;

use accredit_common::{
    crypto::{Address, Hash, ProgramAddressDeriver},
    kyc::{Jurisdiction, KycLevel, WhitelistEntry},
    pool::{PoolComplianceEntry, PoolStatus},
};
use accredit_router::MemoryLedger;

pub const TRANSFER_HOOK_PROGRAM: Address = Address::new([0xA1; 32]);
pub const REGISTRY_PROGRAM: Address = Address::new([0xB2; 32]);
pub const REGISTRY_AUTHORITY: Address = Address::new([0xC3; 32]);

pub const NOW: i64 = 1_700_000_000;

pub fn ledger() -> Arc<MemoryLedger> {
    Arc::new(MemoryLedger::new())
}

pub fn deriver() -> Arc<ProgramAddressDeriver> {
    Arc::new(ProgramAddressDeriver)
}

pub fn wallet(seed: u8) -> Address {
    Address::new([seed; 32])
}

pub fn whitelist_entry(
    wallet: Address,
    kyc_level: KycLevel,
    jurisdiction: Jurisdiction,
) -> WhitelistEntry {
    WhitelistEntry {
        wallet,
        registry: Address::new([0xD4; 32]),
        kyc_level,
        jurisdiction,
        kyc_hash: Hash::new([0x11; 32]),
        is_active: true,
        daily_limit: 0,
        daily_volume: 0,
        volume_reset_time: NOW - 3_600,
        verified_at: NOW - 86_400,
        expiry_timestamp: 0,
        last_activity: NOW - 60,
        created_at: NOW - 86_400,
        bump: 255,
    }
}

pub fn pool_entry(amm_key: Address, registry: Address, status: PoolStatus) -> PoolComplianceEntry {
    PoolComplianceEntry {
        amm_key,
        registry,
        operator: Address::new([0xE5; 32]),
        dex_label: "Raydium".to_string(),
        status,
        jurisdiction: Jurisdiction::Japan,
        kyc_level: KycLevel::Institutional,
        audit_hash: Hash::new([0x22; 32]),
        audit_expiry: NOW + 86_400 * 365,
        registered_at: NOW - 86_400 * 30,
        updated_at: NOW - 86_400,
    }
}
