// Whitelist Entry Cache
// Memoizes decoded whitelist entries per wallet with single-flight fetches

use std::{collections::HashMap, num::NonZeroUsize, sync::Arc, time::Duration};

use accredit_common::{
    codec::decode_whitelist_entry,
    crypto::{pda::find_whitelist_entry_address, Address, AddressDeriver},
    kyc::WhitelistEntry,
    serializer::DecodeError,
};
use log::{debug, trace, warn};
use lru::LruCache;
use tokio::{
    sync::{Mutex, OnceCell},
    time::Instant,
};

use crate::{
    error::LedgerResult,
    ledger::{with_timeout, LedgerReader},
};

/// Outcome of looking up the whitelist entry of a wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryLookup {
    /// The account exists and decoded successfully
    Found(WhitelistEntry),
    /// No account exists at the derived address
    NotFound,
    /// The account exists but its data is not a valid whitelist entry
    Undecodable(DecodeError),
}

impl EntryLookup {
    /// The decoded entry, if any. Missing and undecodable accounts both yield `None`
    pub fn entry(&self) -> Option<&WhitelistEntry> {
        match self {
            EntryLookup::Found(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn into_entry(self) -> Option<WhitelistEntry> {
        match self {
            EntryLookup::Found(entry) => Some(entry),
            _ => None,
        }
    }
}

type Flight = Arc<OnceCell<LedgerResult<EntryLookup>>>;

struct CachedEntry {
    entry: WhitelistEntry,
    fetched_at: Instant,
}

struct CacheState {
    entries: LruCache<Address, CachedEntry>,
    in_flight: HashMap<Address, Flight>,
}

/// Cache of decoded whitelist entries keyed by wallet.
///
/// Only successfully decoded entries are stored; absent accounts, decode
/// failures and ledger errors are returned to the caller and retried on the
/// next lookup. Concurrent lookups for the same wallet share one ledger read.
pub struct EntryCache {
    reader: Arc<dyn LedgerReader>,
    deriver: Arc<dyn AddressDeriver>,
    program_id: Address,
    fetch_timeout: Option<Duration>,
    entry_ttl: Option<Duration>,
    state: Mutex<CacheState>,
}

impl EntryCache {
    /// Create an unbounded cache without expiry or fetch timeout
    pub fn new(
        reader: Arc<dyn LedgerReader>,
        deriver: Arc<dyn AddressDeriver>,
        program_id: Address,
    ) -> Self {
        Self {
            reader,
            deriver,
            program_id,
            fetch_timeout: None,
            entry_ttl: None,
            state: Mutex::new(CacheState {
                entries: LruCache::unbounded(),
                in_flight: HashMap::new(),
            }),
        }
    }

    /// Bound the cache to `capacity` entries, evicting the least recently used.
    /// A capacity of zero keeps the cache unbounded.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        let entries = match NonZeroUsize::new(capacity) {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        self.state.get_mut().entries = entries;
        self
    }

    /// Entries older than `ttl` are treated as missing and fetched again
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl = Some(ttl);
        self
    }

    /// Fail fetches that take longer than `timeout`
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn program_id(&self) -> &Address {
        &self.program_id
    }

    /// Look up the whitelist entry of `wallet`, reading the ledger on a miss
    pub async fn get(&self, wallet: &Address) -> LedgerResult<EntryLookup> {
        let flight = {
            let mut state = self.state.lock().await;
            if let Some(entry) = Self::fresh_entry(&mut state, wallet, self.entry_ttl) {
                trace!("whitelist cache hit for {}", wallet);
                return Ok(EntryLookup::Found(entry));
            }

            match state.in_flight.get(wallet) {
                Some(flight) if !flight.initialized() => flight.clone(),
                // A finished flight nobody unregistered (its callers were
                // cancelled) must not answer new lookups
                _ => {
                    let flight: Flight = Arc::new(OnceCell::new());
                    state.in_flight.insert(*wallet, flight.clone());
                    flight
                }
            }
        };

        let result = flight.get_or_init(|| self.fetch(wallet)).await.clone();

        let mut state = self.state.lock().await;
        // Only the flight still registered may publish: an invalidation
        // while it was running unregisters it and its result is not cached
        let registered = state
            .in_flight
            .get(wallet)
            .is_some_and(|current| Arc::ptr_eq(current, &flight));
        if registered {
            state.in_flight.remove(wallet);
            if let Ok(EntryLookup::Found(entry)) = &result {
                state.entries.put(
                    *wallet,
                    CachedEntry {
                        entry: entry.clone(),
                        fetched_at: Instant::now(),
                    },
                );
            }
        }

        result
    }

    /// Drop the cached entry of `wallet`, or every entry when `None`.
    /// Fetches running at that moment will not populate the cache.
    pub async fn invalidate(&self, wallet: Option<&Address>) {
        let mut state = self.state.lock().await;
        match wallet {
            Some(wallet) => {
                state.entries.pop(wallet);
                state.in_flight.remove(wallet);
                debug!("whitelist cache invalidated for {}", wallet);
            }
            None => {
                state.entries.clear();
                state.in_flight.clear();
                debug!("whitelist cache cleared");
            }
        }
    }

    pub async fn contains(&self, wallet: &Address) -> bool {
        let state = self.state.lock().await;
        state.entries.contains(wallet)
    }

    pub async fn len(&self) -> usize {
        let state = self.state.lock().await;
        state.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn fresh_entry(
        state: &mut CacheState,
        wallet: &Address,
        ttl: Option<Duration>,
    ) -> Option<WhitelistEntry> {
        let cached = state.entries.get(wallet)?;
        if ttl.is_some_and(|ttl| cached.fetched_at.elapsed() > ttl) {
            state.entries.pop(wallet);
            return None;
        }
        Some(cached.entry.clone())
    }

    async fn fetch(&self, wallet: &Address) -> LedgerResult<EntryLookup> {
        let (address, _) =
            find_whitelist_entry_address(self.deriver.as_ref(), wallet, &self.program_id)?;
        debug!("fetching whitelist entry {} for wallet {}", address, wallet);

        let data = with_timeout(self.fetch_timeout, self.reader.fetch_account(&address)).await?;
        let Some(data) = data else {
            return Ok(EntryLookup::NotFound);
        };

        match decode_whitelist_entry(&data) {
            Ok(entry) => Ok(EntryLookup::Found(entry)),
            Err(e) => {
                warn!(
                    "whitelist entry {} for wallet {} is undecodable: {}",
                    address, wallet, e
                );
                Ok(EntryLookup::Undecodable(e))
            }
        }
    }
}
