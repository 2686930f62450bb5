// Pool whitelist index synchronisation against an in-memory ledger

mod common;

use std::{
    collections::BTreeSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use accredit_common::{
    codec::{account_discriminator, encode_pool_entry, DISCRIMINATOR_SIZE},
    crypto::Address,
    pool::{PoolComplianceEntry, PoolStatus},
};
use accredit_router::{LedgerError, MemoryLedger, PoolWhitelistIndex};
use common::*;

fn index(ledger: Arc<MemoryLedger>) -> PoolWhitelistIndex {
    PoolWhitelistIndex::new(ledger, deriver(), REGISTRY_PROGRAM, &REGISTRY_AUTHORITY).unwrap()
}

fn publish(ledger: &MemoryLedger, index: &PoolWhitelistIndex, entry: &PoolComplianceEntry) {
    let address = index.pool_entry_address(&entry.amm_key).unwrap();
    ledger.insert_account(address, REGISTRY_PROGRAM, encode_pool_entry(entry));
}

/// Account that passes the registry filter but whose label is not UTF-8
fn corrupt_pool_account(registry: &Address) -> Vec<u8> {
    let mut data = account_discriminator("PoolComplianceEntry").to_vec();
    data.extend_from_slice(&[0x77; 32]);
    data.extend_from_slice(registry.as_bytes());
    data.extend_from_slice(&[0x78; 32]);
    data.extend_from_slice(&4u32.to_le_bytes());
    data.extend_from_slice(&[0xff, 0xfe, 0xfd, 0xfc]);
    data.resize(data.len() + 3 + 32 + 24, 0);
    data
}

#[tokio::test]
async fn test_sync_keeps_single_active_pool() {
    let ledger = ledger();
    let index = index(ledger.clone());
    let registry = *index.registry_address();

    let suspended = pool_entry(wallet(1), registry, PoolStatus::Suspended);
    let active = pool_entry(wallet(2), registry, PoolStatus::Active);
    publish(&ledger, &index, &suspended);
    publish(&ledger, &index, &active);

    let corrupt = corrupt_pool_account(&registry);
    assert!(corrupt.len() > DISCRIMINATOR_SIZE + PoolComplianceEntry::FIXED_SIZE);
    ledger.insert_account(wallet(3), REGISTRY_PROGRAM, corrupt);
    ledger.set_slot(1_234);

    assert_eq!(index.sync().await, Ok(1));
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(&active.amm_key), Some(active.clone()));
    assert!(index.is_whitelisted(&active.amm_key));
    assert!(!index.is_whitelisted(&suspended.amm_key));
    assert_eq!(index.sync_slot(), 1_234);
}

#[tokio::test]
async fn test_reads_do_not_touch_ledger() {
    let ledger = ledger();
    let index = index(ledger.clone());
    let registry = *index.registry_address();
    publish(&ledger, &index, &pool_entry(wallet(4), registry, PoolStatus::Active));
    index.sync().await.unwrap();
    let reads = ledger.program_reads();

    for _ in 0..10 {
        assert!(index.is_whitelisted(&wallet(4)));
        assert!(index.get(&wallet(5)).is_none());
    }
    let route = index.check_route(&[wallet(4), wallet(5)]);
    assert_eq!(route.non_compliant_pools, vec![wallet(5)]);
    assert_eq!(ledger.program_reads(), reads);
}

#[tokio::test]
async fn test_failed_sync_retains_last_snapshot() {
    let ledger = ledger();
    let index = index(ledger.clone());
    let registry = *index.registry_address();
    publish(&ledger, &index, &pool_entry(wallet(6), registry, PoolStatus::Active));
    ledger.set_slot(10);
    index.sync().await.unwrap();

    ledger.set_failing(true);
    ledger.set_slot(11);
    let err = index.sync().await.unwrap_err();
    assert!(err.is_retryable());

    assert!(index.is_whitelisted(&wallet(6)));
    assert_eq!(index.sync_slot(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_sync_retains_last_snapshot() {
    let ledger = ledger();
    let index = index(ledger.clone()).with_sync_timeout(Duration::from_secs(30));
    let registry = *index.registry_address();
    publish(&ledger, &index, &pool_entry(wallet(7), registry, PoolStatus::Active));
    index.sync().await.unwrap();

    ledger.set_latency(Duration::from_secs(120));
    assert_eq!(
        index.sync().await,
        Err(LedgerError::Timeout(Duration::from_secs(30)))
    );
    assert!(index.is_whitelisted(&wallet(7)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_see_whole_snapshots_during_sync() {
    let ledger = ledger();
    let index = Arc::new(index(ledger.clone()));
    let registry = *index.registry_address();

    let old_keys = (20..23).map(wallet).collect::<BTreeSet<_>>();
    let new_keys = (30..35).map(wallet).collect::<BTreeSet<_>>();

    for key in &old_keys {
        publish(&ledger, &index, &pool_entry(*key, registry, PoolStatus::Active));
    }
    index.sync().await.unwrap();

    ledger.clear_program(&REGISTRY_PROGRAM);
    for key in &new_keys {
        publish(&ledger, &index, &pool_entry(*key, registry, PoolStatus::Active));
    }
    ledger.set_latency(Duration::from_millis(100));

    let done = Arc::new(AtomicBool::new(false));
    let readers = (0..4)
        .map(|_| {
            let index = index.clone();
            let done = done.clone();
            let old_keys = old_keys.clone();
            let new_keys = new_keys.clone();
            tokio::spawn(async move {
                let mut observations = 0usize;
                while !done.load(Ordering::SeqCst) {
                    let keys = index.whitelisted_keys().into_iter().collect::<BTreeSet<_>>();
                    assert!(keys == old_keys || keys == new_keys, "torn snapshot: {keys:?}");

                    let len = index.len();
                    assert!(len == old_keys.len() || len == new_keys.len());
                    observations += 1;
                    tokio::task::yield_now().await;
                }
                observations
            })
        })
        .collect::<Vec<_>>();

    assert_eq!(index.sync().await, Ok(new_keys.len()));
    done.store(true, Ordering::SeqCst);

    for reader in readers {
        assert!(reader.await.unwrap() > 0);
    }
    assert!(new_keys.iter().all(|key| index.is_whitelisted(key)));
    assert!(old_keys.iter().all(|key| !index.is_whitelisted(key)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_syncs_converge() {
    let ledger = ledger();
    ledger.set_latency(Duration::from_millis(20));
    let index = Arc::new(index(ledger.clone()));
    let registry = *index.registry_address();
    for seed in 40..45 {
        publish(&ledger, &index, &pool_entry(wallet(seed), registry, PoolStatus::Active));
    }

    let syncs = (0..4).map(|_| {
        let index = index.clone();
        tokio::spawn(async move { index.sync().await })
    });
    for result in futures::future::join_all(syncs).await {
        assert_eq!(result.unwrap(), Ok(5));
    }
    assert_eq!(index.len(), 5);
}

#[tokio::test]
async fn test_manual_prepopulation_then_sync_replaces() {
    let ledger = ledger();
    let index = index(ledger.clone());
    let registry = *index.registry_address();

    index.add_pool(pool_entry(wallet(50), registry, PoolStatus::Active));
    assert!(index.is_whitelisted(&wallet(50)));

    publish(&ledger, &index, &pool_entry(wallet(51), registry, PoolStatus::Active));
    index.sync().await.unwrap();
    assert!(!index.is_whitelisted(&wallet(50)));
    assert!(index.is_whitelisted(&wallet(51)));
}
