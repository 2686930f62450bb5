// KYC Compliance Checker
// Answers "may this wallet trade under this policy" from the ledger

use std::{sync::Arc, time::Duration};

use accredit_common::{
    codec::decode_kyc_registry,
    compliance::{evaluate, CompliancePolicy, ComplianceVerdict},
    crypto::{
        pda::{find_kyc_registry_address, find_whitelist_entry_address},
        Address, AddressDeriver, CryptoError,
    },
    kyc::{KycLevel, KycRegistry},
    time::get_current_time_in_seconds,
};
use log::{debug, warn};

use crate::{
    cache::{EntryCache, EntryLookup},
    config::RouterConfig,
    error::LedgerResult,
    ledger::{with_timeout, LedgerReader},
};

/// Compliance facade of the transfer-hook program
pub struct KycComplianceChecker {
    reader: Arc<dyn LedgerReader>,
    deriver: Arc<dyn AddressDeriver>,
    program_id: Address,
    fetch_timeout: Option<Duration>,
    cache: EntryCache,
}

impl KycComplianceChecker {
    /// Checker with an unbounded, non-expiring cache and no fetch timeout
    pub fn new(
        reader: Arc<dyn LedgerReader>,
        deriver: Arc<dyn AddressDeriver>,
        program_id: Address,
    ) -> Self {
        let cache = EntryCache::new(reader.clone(), deriver.clone(), program_id);
        Self {
            reader,
            deriver,
            program_id,
            fetch_timeout: None,
            cache,
        }
    }

    pub fn from_config(
        reader: Arc<dyn LedgerReader>,
        deriver: Arc<dyn AddressDeriver>,
        config: &RouterConfig,
    ) -> anyhow::Result<Self> {
        let program_id = config.require_transfer_hook_program_id()?;
        let fetch_timeout = config.fetch_timeout();

        let mut cache = EntryCache::new(reader.clone(), deriver.clone(), program_id)
            .with_fetch_timeout(fetch_timeout);
        if let Some(capacity) = config.cache_capacity {
            cache = cache.with_capacity(capacity);
        }
        if let Some(ttl) = config.entry_ttl() {
            cache = cache.with_ttl(ttl);
        }

        Ok(Self {
            reader,
            deriver,
            program_id,
            fetch_timeout: Some(fetch_timeout),
            cache,
        })
    }

    pub fn program_id(&self) -> &Address {
        &self.program_id
    }

    pub fn cache(&self) -> &EntryCache {
        &self.cache
    }

    /// Whitelist entry account of `wallet` and its bump
    pub fn derive_whitelist_address(&self, wallet: &Address) -> Result<(Address, u8), CryptoError> {
        find_whitelist_entry_address(self.deriver.as_ref(), wallet, &self.program_id)
    }

    pub async fn get_whitelist_entry(&self, wallet: &Address) -> LedgerResult<EntryLookup> {
        self.cache.get(wallet).await
    }

    /// Evaluate `wallet` against `policy`.
    ///
    /// Missing and undecodable entries are denied with `NoRecord`; ledger
    /// failures are returned as errors and never turned into a denial.
    pub async fn check_trader_compliance(
        &self,
        wallet: &Address,
        policy: &CompliancePolicy,
    ) -> LedgerResult<ComplianceVerdict> {
        let lookup = self.cache.get(wallet).await?;
        if let EntryLookup::Undecodable(e) = &lookup {
            warn!(
                "treating undecodable whitelist entry of {} as missing: {}",
                wallet, e
            );
        }

        let verdict = evaluate(lookup.entry(), policy);
        debug!(
            "compliance of {}: {}",
            wallet,
            verdict.reason_code().unwrap_or("compliant")
        );
        Ok(verdict)
    }

    /// Same as `check_trader_compliance` at the current wall-clock time
    pub async fn check_trader_compliance_now(
        &self,
        wallet: &Address,
        min_kyc_level: KycLevel,
        allowed_jurisdiction_bitmask: u32,
    ) -> LedgerResult<ComplianceVerdict> {
        let policy = CompliancePolicy::new(
            min_kyc_level,
            allowed_jurisdiction_bitmask,
            get_current_time_in_seconds(),
        );
        self.check_trader_compliance(wallet, &policy).await
    }

    /// KYC registry of `mint`, `None` when missing or undecodable. Not cached.
    pub async fn get_registry(&self, mint: &Address) -> LedgerResult<Option<KycRegistry>> {
        let (address, _) =
            find_kyc_registry_address(self.deriver.as_ref(), mint, &self.program_id)?;
        let data = with_timeout(self.fetch_timeout, self.reader.fetch_account(&address)).await?;
        let Some(data) = data else {
            return Ok(None);
        };

        match decode_kyc_registry(&data) {
            Ok(registry) => Ok(Some(registry)),
            Err(e) => {
                warn!(
                    "KYC registry {} of mint {} is undecodable: {}",
                    address, mint, e
                );
                Ok(None)
            }
        }
    }

    /// Invalidate the cached entry of `wallet`, or all of them
    pub async fn clear_cache(&self, wallet: Option<&Address>) {
        self.cache.invalidate(wallet).await;
    }
}
