// Ledger access
//
// The router never talks to a node directly: every account read goes through
// a `LedgerReader` so the transport (RPC client, indexer, test fixture) can be
// swapped without touching the cache or the pool index.

use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        RwLock,
    },
    time::Duration,
};

use accredit_common::crypto::Address;
use async_trait::async_trait;
use log::trace;

use crate::error::{LedgerError, LedgerResult};

/// Server-side filter applied when listing the accounts of a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    /// Account data must be exactly this many bytes
    DataSize(usize),
    /// Account data must contain `bytes` at `offset`
    Memcmp { offset: usize, bytes: Vec<u8> },
}

impl AccountFilter {
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            AccountFilter::DataSize(size) => data.len() == *size,
            AccountFilter::Memcmp { offset, bytes } => offset
                .checked_add(bytes.len())
                .and_then(|end| data.get(*offset..end))
                .is_some_and(|window| window == bytes.as_slice()),
        }
    }
}

/// Account returned by a program listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedAccount {
    pub address: Address,
    pub data: Vec<u8>,
}

/// Read-only view of the ledger
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Raw data of a single account, `None` when the account does not exist
    async fn fetch_account(&self, address: &Address) -> LedgerResult<Option<Vec<u8>>>;

    /// All accounts owned by `program_id` matching every filter
    async fn fetch_program_accounts(
        &self,
        program_id: &Address,
        filters: &[AccountFilter],
    ) -> LedgerResult<Vec<KeyedAccount>>;

    /// Monotonic marker (slot) of the ledger state being served
    async fn current_sequence_marker(&self) -> LedgerResult<u64>;
}

/// Bound a ledger request by an optional timeout
pub async fn with_timeout<T, F>(timeout: Option<Duration>, request: F) -> LedgerResult<T>
where
    F: Future<Output = LedgerResult<T>>,
{
    match timeout {
        Some(duration) => tokio::time::timeout(duration, request)
            .await
            .map_err(|_| LedgerError::Timeout(duration))?,
        None => request.await,
    }
}

#[derive(Debug, Clone)]
struct StoredAccount {
    owner: Address,
    data: Vec<u8>,
}

/// Ledger held entirely in memory.
///
/// Used for local development and tests: accounts are inserted directly,
/// every read is counted, and latency or transport failures can be injected.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    accounts: RwLock<HashMap<Address, StoredAccount>>,
    slot: AtomicU64,
    latency_ms: AtomicU64,
    failing: AtomicBool,
    account_reads: AtomicUsize,
    program_reads: AtomicUsize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) an account
    pub fn insert_account(&self, address: Address, owner: Address, data: Vec<u8>) {
        let mut accounts = self.accounts.write().unwrap_or_else(|p| p.into_inner());
        accounts.insert(address, StoredAccount { owner, data });
    }

    pub fn remove_account(&self, address: &Address) -> bool {
        let mut accounts = self.accounts.write().unwrap_or_else(|p| p.into_inner());
        accounts.remove(address).is_some()
    }

    /// Remove every account owned by `owner`
    pub fn clear_program(&self, owner: &Address) {
        let mut accounts = self.accounts.write().unwrap_or_else(|p| p.into_inner());
        accounts.retain(|_, account| account.owner != *owner);
    }

    pub fn set_slot(&self, slot: u64) {
        self.slot.store(slot, Ordering::SeqCst);
    }

    /// Delay applied to every request before it is answered
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// When set, every request fails with a transport error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `fetch_account` calls served so far
    pub fn account_reads(&self) -> usize {
        self.account_reads.load(Ordering::SeqCst)
    }

    /// Number of `fetch_program_accounts` calls served so far
    pub fn program_reads(&self) -> usize {
        self.program_reads.load(Ordering::SeqCst)
    }

    async fn simulate_network(&self) -> LedgerResult<()> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(LedgerError::Transport("memory ledger unavailable".to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl LedgerReader for MemoryLedger {
    async fn fetch_account(&self, address: &Address) -> LedgerResult<Option<Vec<u8>>> {
        self.account_reads.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;

        let accounts = self.accounts.read().unwrap_or_else(|p| p.into_inner());
        trace!("memory ledger: fetch account {}", address);
        Ok(accounts.get(address).map(|account| account.data.clone()))
    }

    async fn fetch_program_accounts(
        &self,
        program_id: &Address,
        filters: &[AccountFilter],
    ) -> LedgerResult<Vec<KeyedAccount>> {
        self.program_reads.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;

        let accounts = self.accounts.read().unwrap_or_else(|p| p.into_inner());
        let matching = accounts
            .iter()
            .filter(|(_, account)| account.owner == *program_id)
            .filter(|(_, account)| filters.iter().all(|f| f.matches(&account.data)))
            .map(|(address, account)| KeyedAccount {
                address: *address,
                data: account.data.clone(),
            })
            .collect::<Vec<_>>();

        trace!(
            "memory ledger: {} accounts for program {}",
            matching.len(),
            program_id
        );
        Ok(matching)
    }

    async fn current_sequence_marker(&self) -> LedgerResult<u64> {
        self.simulate_network().await?;
        Ok(self.slot.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memcmp_filter() {
        let filter = AccountFilter::Memcmp {
            offset: 2,
            bytes: vec![7, 8],
        };
        assert!(filter.matches(&[0, 0, 7, 8, 9]));
        assert!(!filter.matches(&[0, 0, 7, 9, 9]));
        // Window past the end of the data
        assert!(!filter.matches(&[0, 0, 7]));
    }

    #[test]
    fn test_memcmp_offset_overflow() {
        let filter = AccountFilter::Memcmp {
            offset: usize::MAX,
            bytes: vec![1],
        };
        assert!(!filter.matches(&[1, 2, 3]));
    }

    #[test]
    fn test_data_size_filter() {
        let filter = AccountFilter::DataSize(3);
        assert!(filter.matches(&[1, 2, 3]));
        assert!(!filter.matches(&[1, 2]));
    }

    #[tokio::test]
    async fn test_memory_ledger_program_accounts() {
        let ledger = MemoryLedger::new();
        let program = Address::new([1u8; 32]);
        let other = Address::new([2u8; 32]);

        ledger.insert_account(Address::new([10u8; 32]), program, vec![1, 2, 3]);
        ledger.insert_account(Address::new([11u8; 32]), program, vec![9, 2, 3]);
        ledger.insert_account(Address::new([12u8; 32]), other, vec![1, 2, 3]);

        let filters = [AccountFilter::Memcmp {
            offset: 0,
            bytes: vec![1],
        }];
        let accounts = ledger
            .fetch_program_accounts(&program, &filters)
            .await
            .unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].address, Address::new([10u8; 32]));
        assert_eq!(ledger.program_reads(), 1);
    }

    #[tokio::test]
    async fn test_memory_ledger_failure() {
        let ledger = MemoryLedger::new();
        ledger.set_failing(true);

        let result = ledger.fetch_account(&Address::zero()).await;
        assert!(matches!(result, Err(LedgerError::Transport(_))));
        assert_eq!(ledger.account_reads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let result: LedgerResult<()> = with_timeout(Some(Duration::from_millis(50)), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(LedgerError::Timeout(Duration::from_millis(50))));
    }

    #[tokio::test]
    async fn test_with_timeout_disabled() {
        let result = with_timeout(None, async { Ok(5u8) }).await;
        assert_eq!(result, Ok(5));
    }
}
