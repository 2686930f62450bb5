// Pool Whitelist Index
// In-memory snapshot of the active pools of one compliant pool registry

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
    time::Duration,
};

use accredit_common::{
    codec::decode_pool_entry,
    crypto::{
        pda::{find_pool_entry_address, find_pool_registry_address},
        Address, AddressDeriver, CryptoError,
    },
    pool::{PoolComplianceEntry, POOL_ENTRY_REGISTRY_OFFSET},
};
use anyhow::Context;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    config::RouterConfig,
    error::LedgerResult,
    ledger::{with_timeout, AccountFilter, LedgerReader},
};

/// Immutable view of the index at one ledger slot
#[derive(Debug, Clone, Default)]
pub struct PoolSnapshot {
    entries: HashMap<Address, PoolComplianceEntry>,
    slot: u64,
}

impl PoolSnapshot {
    pub fn get(&self, amm_key: &Address) -> Option<&PoolComplianceEntry> {
        self.entries.get(amm_key)
    }

    pub fn is_whitelisted(&self, amm_key: &Address) -> bool {
        self.entries.get(amm_key).is_some_and(|e| e.is_active())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot the snapshot was taken at, 0 if never synced
    pub fn slot(&self) -> u64 {
        self.slot
    }

    pub fn entries(&self) -> impl Iterator<Item = &PoolComplianceEntry> {
        self.entries.values()
    }
}

/// Whitelist status of every pool along a swap route
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RouteComplianceResult {
    pub is_compliant: bool,
    pub compliant_pools: Vec<Address>,
    pub non_compliant_pools: Vec<Address>,
}

/// Whitelist of the pools registered under one registry authority.
///
/// Readers never touch the network: they see the last snapshot installed by
/// `sync`, which replaces it as a whole. A failed sync keeps the previous one.
pub struct PoolWhitelistIndex {
    reader: Arc<dyn LedgerReader>,
    deriver: Arc<dyn AddressDeriver>,
    program_id: Address,
    registry: Address,
    sync_timeout: Option<Duration>,
    fetch_timeout: Option<Duration>,
    snapshot: RwLock<Arc<PoolSnapshot>>,
    // Serializes syncs so an older listing can't overwrite a newer one
    sync_lock: Mutex<()>,
}

impl PoolWhitelistIndex {
    pub fn new(
        reader: Arc<dyn LedgerReader>,
        deriver: Arc<dyn AddressDeriver>,
        program_id: Address,
        authority: &Address,
    ) -> Result<Self, CryptoError> {
        let (registry, _) = find_pool_registry_address(deriver.as_ref(), authority, &program_id)?;
        debug!(
            "pool index for authority {} uses registry {}",
            authority, registry
        );

        Ok(Self {
            reader,
            deriver,
            program_id,
            registry,
            sync_timeout: None,
            fetch_timeout: None,
            snapshot: RwLock::new(Arc::new(PoolSnapshot::default())),
            sync_lock: Mutex::new(()),
        })
    }

    /// Index of the registry program and authority named in `config`,
    /// with its sync and fetch timeouts
    pub fn from_config(
        reader: Arc<dyn LedgerReader>,
        deriver: Arc<dyn AddressDeriver>,
        config: &RouterConfig,
    ) -> anyhow::Result<Self> {
        let program_id = config.require_registry_program_id()?;
        let authority = config.require_registry_authority()?;
        let index = Self::new(reader, deriver, program_id, &authority)
            .context("Error while deriving the pool registry address")?;

        Ok(index
            .with_sync_timeout(config.sync_timeout())
            .with_fetch_timeout(config.fetch_timeout()))
    }

    /// Fail syncs that take longer than `timeout`
    pub fn with_sync_timeout(mut self, timeout: Duration) -> Self {
        self.sync_timeout = Some(timeout);
        self
    }

    /// Fail single-entry fetches that take longer than `timeout`
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Registry account all indexed entries belong to
    pub fn registry_address(&self) -> &Address {
        &self.registry
    }

    /// PoolComplianceEntry account of `amm_key` in this registry
    pub fn pool_entry_address(&self, amm_key: &Address) -> Result<Address, CryptoError> {
        find_pool_entry_address(
            self.deriver.as_ref(),
            &self.registry,
            amm_key,
            &self.program_id,
        )
        .map(|(address, _)| address)
    }

    /// Read the entry of `amm_key` straight from the ledger, whatever its status.
    /// Does not touch the snapshot. `None` when missing or undecodable.
    pub async fn fetch_pool_entry(
        &self,
        amm_key: &Address,
    ) -> LedgerResult<Option<PoolComplianceEntry>> {
        let address = self.pool_entry_address(amm_key)?;
        let data = with_timeout(self.fetch_timeout, self.reader.fetch_account(&address)).await?;
        let Some(data) = data else {
            return Ok(None);
        };

        match decode_pool_entry(&data) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!("pool entry {} of {} is undecodable: {}", address, amm_key, e);
                Ok(None)
            }
        }
    }

    /// Replace the index with the active entries currently on the ledger.
    /// Returns the number of pools kept.
    pub async fn sync(&self) -> LedgerResult<usize> {
        let _guard = self.sync_lock.lock().await;

        let filters = [AccountFilter::Memcmp {
            offset: POOL_ENTRY_REGISTRY_OFFSET,
            bytes: self.registry.as_bytes().to_vec(),
        }];
        let (accounts, slot) = with_timeout(self.sync_timeout, async {
            let accounts = self
                .reader
                .fetch_program_accounts(&self.program_id, &filters)
                .await?;
            let slot = self.reader.current_sequence_marker().await?;
            Ok((accounts, slot))
        })
        .await?;

        let seen = accounts.len();
        let mut skipped = 0;
        let mut entries = HashMap::with_capacity(seen);
        for account in accounts {
            let entry = match decode_pool_entry(&account.data) {
                Ok(entry) => entry,
                Err(e) => {
                    skipped += 1;
                    warn!(
                        "skipping undecodable pool entry {}: {}",
                        account.address, e
                    );
                    continue;
                }
            };

            if entry.registry != self.registry {
                debug!(
                    "ignoring pool entry {} of foreign registry {}",
                    account.address, entry.registry
                );
                continue;
            }

            if !entry.is_active() {
                trace!("pool {} is {}, not indexed", entry.amm_key, entry.status);
                continue;
            }

            entries.insert(entry.amm_key, entry);
        }

        let count = entries.len();
        self.install(PoolSnapshot { entries, slot });

        if log::log_enabled!(log::Level::Info) {
            info!(
                "pool index synced at slot {}: {} accounts, {} active, {} undecodable",
                slot, seen, count, skipped
            );
        }

        Ok(count)
    }

    /// Current snapshot; stays consistent across several reads
    pub fn snapshot(&self) -> Arc<PoolSnapshot> {
        let snapshot = self.snapshot.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&*snapshot)
    }

    pub fn is_whitelisted(&self, amm_key: &Address) -> bool {
        self.snapshot().is_whitelisted(amm_key)
    }

    pub fn get(&self, amm_key: &Address) -> Option<PoolComplianceEntry> {
        self.snapshot().get(amm_key).cloned()
    }

    pub fn sync_slot(&self) -> u64 {
        self.snapshot().slot()
    }

    pub fn whitelisted_keys(&self) -> Vec<Address> {
        self.snapshot()
            .entries()
            .filter(|entry| entry.is_active())
            .map(|entry| entry.amm_key)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Check every pool of a route against one snapshot, preserving route order
    pub fn check_route(&self, amm_keys: &[Address]) -> RouteComplianceResult {
        let snapshot = self.snapshot();
        let (compliant_pools, non_compliant_pools): (Vec<_>, Vec<_>) = amm_keys
            .iter()
            .copied()
            .partition(|key| snapshot.is_whitelisted(key));

        RouteComplianceResult {
            is_compliant: non_compliant_pools.is_empty(),
            compliant_pools,
            non_compliant_pools,
        }
    }

    /// Insert or replace an entry in the current snapshot
    pub fn add_pool(&self, entry: PoolComplianceEntry) {
        let mut snapshot = self.snapshot.write().unwrap_or_else(|p| p.into_inner());
        Arc::make_mut(&mut snapshot)
            .entries
            .insert(entry.amm_key, entry);
    }

    /// Remove an entry from the current snapshot, returning whether it was present
    pub fn remove_pool(&self, amm_key: &Address) -> bool {
        let mut snapshot = self.snapshot.write().unwrap_or_else(|p| p.into_inner());
        Arc::make_mut(&mut snapshot)
            .entries
            .remove(amm_key)
            .is_some()
    }

    fn install(&self, next: PoolSnapshot) {
        let mut snapshot = self.snapshot.write().unwrap_or_else(|p| p.into_inner());
        *snapshot = Arc::new(next);
    }
}
