// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for reserve subscriptions
//!
//! These tests drive `Sync` events through a scripted connection and check
//! deduplication per `(pool, callback)`, unsubscribe semantics and how
//! malformed events are handled.

mod helpers;

use std::sync::Arc;

use alloy_primitives::U256;
use dexters::{Callback, Dex, DiscoveryError, OracleConfig, ReserveCallback, SyncRecord};
use helpers::{addr, dataset, dex_dataset, garbage_log, next_within, settle, sync_log, MockChain};
use tokio::sync::mpsc;

const TOKEN0: u64 = 1;
const TOKEN1: u64 = 2;
const POOL: u64 = 100;

fn setup() -> (Dex, Arc<MockChain>) {
    let factory = addr(0xfac);
    let chain = Arc::new(
        MockChain::new(factory)
            .with_pool(addr(POOL), addr(TOKEN0), addr(TOKEN1))
            .with_block(10, 1_700_000_000)
            .with_block(11, 1_700_000_012)
            .with_failing_block(12),
    );
    let dex = Dex::new(
        &dataset(factory, None, vec![], vec![]),
        dex_dataset(factory, vec![], vec![]),
        chain.clone(),
        &OracleConfig::default(),
    )
    .expect("dex");
    (dex, chain)
}

fn recording_callback() -> (ReserveCallback, mpsc::UnboundedReceiver<SyncRecord>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let callback = Callback::from_fn(move |record: SyncRecord| {
        let _ = sender.send(record);
    });
    (callback, receiver)
}

#[tokio::test]
async fn test_sync_event_is_delivered_with_pool_tokens() {
    let (dex, chain) = setup();
    let (callback, mut records) = recording_callback();

    let _subscription = dex.subscribe_reserves(addr(POOL), callback).await.unwrap();
    assert_eq!(chain.emit_sync(addr(POOL), 500, 1_000, 10), 1);

    let record = next_within(&mut records).await;
    assert_eq!(record.pool, addr(POOL));
    assert_eq!(record.block_number, Some(10));
    assert_eq!(record.timestamp, Some(1_700_000_000));
    assert_eq!(record.token0.token, addr(TOKEN0));
    assert_eq!(record.token0.reserve, U256::from(500u64));
    assert_eq!(record.token1.token, addr(TOKEN1));
    assert_eq!(record.token1.reserve, U256::from(1_000u64));
}

#[tokio::test]
async fn test_events_are_delivered_in_order() {
    let (dex, chain) = setup();
    let (callback, mut records) = recording_callback();

    let _subscription = dex.subscribe_reserves(addr(POOL), callback).await.unwrap();
    chain.emit_sync(addr(POOL), 1, 2, 10);
    chain.emit_sync(addr(POOL), 3, 4, 11);

    assert_eq!(next_within(&mut records).await.token0.reserve, U256::from(1u64));
    let second = next_within(&mut records).await;
    assert_eq!(second.token0.reserve, U256::from(3u64));
    assert_eq!(second.timestamp, Some(1_700_000_012));
}

#[tokio::test]
async fn test_same_callback_subscribes_once() {
    let (dex, chain) = setup();
    let (callback, _records) = recording_callback();

    let first = dex.subscribe_reserves(addr(POOL), callback.clone()).await.unwrap();
    let second = dex.subscribe_reserves(addr(POOL), callback).await.unwrap();

    assert!(first.same_as(&second));
    assert_eq!(chain.subscribe_calls(), 1);
    assert_eq!(chain.open_subscriptions(addr(POOL)), 1);
}

#[tokio::test]
async fn test_distinct_callbacks_get_distinct_subscriptions() {
    let (dex, chain) = setup();
    let (first_callback, mut first_records) = recording_callback();
    let (second_callback, mut second_records) = recording_callback();

    let first = dex.subscribe_reserves(addr(POOL), first_callback).await.unwrap();
    let second = dex.subscribe_reserves(addr(POOL), second_callback).await.unwrap();

    assert!(!first.same_as(&second));
    assert_eq!(chain.subscribe_calls(), 2);
    assert_eq!(chain.emit_sync(addr(POOL), 7, 8, 10), 2);

    next_within(&mut first_records).await;
    next_within(&mut second_records).await;
}

#[tokio::test]
async fn test_concurrent_subscribe_attaches_one_listener() {
    let (dex, chain) = setup();
    let (callback, mut records) = recording_callback();

    let (first, second) = tokio::join!(
        dex.subscribe_reserves(addr(POOL), callback.clone()),
        dex.subscribe_reserves(addr(POOL), callback),
    );
    let (first, second) = (first.unwrap(), second.unwrap());
    settle().await;

    assert!(first.same_as(&second));
    assert_eq!(
        chain.open_subscriptions(addr(POOL)),
        1,
        "The losing log subscription must be dropped"
    );

    chain.emit_sync(addr(POOL), 1, 1, 10);
    next_within(&mut records).await;
    settle().await;
    assert!(records.try_recv().is_err(), "Event must be delivered exactly once");
}

#[tokio::test]
async fn test_unsubscribe_is_idempotent_and_closes_stream() {
    let (dex, chain) = setup();
    let (callback, mut records) = recording_callback();

    let subscription = dex.subscribe_reserves(addr(POOL), callback.clone()).await.unwrap();
    assert!(subscription.is_active());

    subscription.unsubscribe();
    subscription.unsubscribe();
    settle().await;

    assert!(!subscription.is_active());
    assert_eq!(chain.open_subscriptions(addr(POOL)), 0);
    assert_eq!(chain.emit_sync(addr(POOL), 1, 1, 10), 0);
    assert!(records.try_recv().is_err());

    // A later subscribe attaches a fresh listener
    let resubscribed = dex.subscribe_reserves(addr(POOL), callback).await.unwrap();
    assert!(!resubscribed.same_as(&subscription));
    assert_eq!(chain.subscribe_calls(), 2);
    assert_eq!(chain.open_subscriptions(addr(POOL)), 1);
}

#[tokio::test]
async fn test_ended_stream_is_replaced_on_next_subscribe() {
    let (dex, chain) = setup();
    let (callback, mut records) = recording_callback();

    let ended = dex.subscribe_reserves(addr(POOL), callback.clone()).await.unwrap();
    chain.close_subscriptions(addr(POOL));
    settle().await;

    assert!(!ended.is_active(), "Subscription must end with its log stream");

    let renewed = dex.subscribe_reserves(addr(POOL), callback).await.unwrap();
    assert!(!renewed.same_as(&ended));
    assert!(renewed.is_active());
    assert_eq!(chain.subscribe_calls(), 2);

    assert_eq!(chain.emit_sync(addr(POOL), 5, 6, 10), 1);
    assert_eq!(next_within(&mut records).await.token0.reserve, U256::from(5u64));
}

#[tokio::test]
async fn test_undecodable_log_is_skipped() {
    let (dex, chain) = setup();
    let (callback, mut records) = recording_callback();

    let _subscription = dex.subscribe_reserves(addr(POOL), callback).await.unwrap();
    chain.emit_log(garbage_log(addr(POOL), 10));
    chain.emit_sync(addr(POOL), 9, 9, 11);

    let record = next_within(&mut records).await;
    assert_eq!(record.block_number, Some(11), "Listener must survive a malformed log");
}

#[tokio::test]
async fn test_failed_block_lookup_drops_event() {
    let (dex, chain) = setup();
    let (callback, mut records) = recording_callback();

    let _subscription = dex.subscribe_reserves(addr(POOL), callback).await.unwrap();
    chain.emit_sync(addr(POOL), 1, 1, 12);
    chain.emit_sync(addr(POOL), 2, 2, 10);

    let record = next_within(&mut records).await;
    assert_eq!(record.block_number, Some(10));
}

#[tokio::test]
async fn test_unknown_block_yields_no_timestamp() {
    let (dex, chain) = setup();
    let (callback, mut records) = recording_callback();

    let _subscription = dex.subscribe_reserves(addr(POOL), callback).await.unwrap();
    chain.emit_sync(addr(POOL), 1, 1, 99);

    let record = next_within(&mut records).await;
    assert_eq!(record.block_number, Some(99));
    assert_eq!(record.timestamp, None);
}

#[tokio::test]
async fn test_log_timestamp_is_used_when_present() {
    let (dex, chain) = setup();
    let (callback, mut records) = recording_callback();

    let _subscription = dex.subscribe_reserves(addr(POOL), callback).await.unwrap();
    let mut log = sync_log(addr(POOL), 1, 1, 12);
    log.block_timestamp = Some(42);
    chain.emit_log(log);

    assert_eq!(next_within(&mut records).await.timestamp, Some(42));
}

#[tokio::test]
async fn test_subscribe_to_non_pair_fails() {
    let (dex, chain) = setup();
    let (callback, _records) = recording_callback();

    let error = dex.subscribe_reserves(addr(0xbad), callback).await.unwrap_err();
    assert!(
        matches!(error, DiscoveryError::PoolTokensUnavailable { pool } if pool == addr(0xbad)),
        "Expected PoolTokensUnavailable, got {error:?}"
    );
    assert_eq!(chain.subscribe_calls(), 0);
}
