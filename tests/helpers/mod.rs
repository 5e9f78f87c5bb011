// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for dexters integration tests
//!
//! Provides a scripted in-memory chain implementing [`Connection`], so the
//! oracle can be exercised without a real node. Contract calls are decoded
//! by selector and answered from the scripted state; log subscriptions are
//! backed by channels the test pushes `Sync` events into.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use alloy_primitives::{aliases::U112, Address, BlockNumber, Bytes, B256, U256};
use alloy_rpc_types::{Filter, Log};
use alloy_sol_types::{sol, SolCall, SolEvent, SolValue};
use async_trait::async_trait;
use dexters::dataset::token_map;
use dexters::{
    ChainDataset, ChainMetadata, Connection, ContractInfo, ContractTypes, DexDataset, DexMetadata,
    LogStream, RpcError, TokenDecimals, TokenInfo,
};
use tokio::sync::mpsc;

sol! {
    interface MockFactory {
        function getPair(address tokenA, address tokenB) external view returns (address pair);
        function allPairs(uint256 index) external view returns (address pair);
        function allPairsLength() external view returns (uint256);
    }

    interface MockPair {
        event Sync(uint112 reserve0, uint112 reserve1);

        function token0() external view returns (address);
        function token1() external view returns (address);
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }

    interface MockToken {
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

pub const CHAIN_ID: u64 = 137;
pub const DEX_ID: &str = "sushiswap";

/// Deterministic address derived from a small integer
pub fn addr(n: u64) -> Address {
    Address::from_word(B256::from(U256::from(n)))
}

/// A contract call observed by the mock, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    GetPair(Address, Address),
    AllPairsLength,
    AllPairs(u64),
    Token0(Address),
    Token1(Address),
    GetReserves(Address),
    Decimals(Address),
    Symbol(Address),
}

#[derive(Default)]
struct ChainState {
    pairs: HashMap<(Address, Address), Address>,
    all_pairs: Vec<Address>,
    broken_indices: HashSet<u64>,
    pool_tokens: HashMap<Address, (Address, Address)>,
    reserves: HashMap<Address, (u128, u128)>,
    decimals: HashMap<Address, u8>,
    symbols: HashMap<Address, String>,
    blocks: HashMap<BlockNumber, u64>,
    failing_blocks: HashSet<BlockNumber>,
    failing_subscriptions: HashSet<Address>,
    reported_pair_count: Option<u64>,
    subscribers: HashMap<Address, Vec<mpsc::UnboundedSender<Log>>>,
    subscribe_calls: usize,
    calls: Vec<RecordedCall>,
}

/// Scripted chain with one UniswapV2-style factory
///
/// # Example
///
/// ```rust,ignore
/// let chain = MockChain::new(factory)
///     .with_pool(pool, weth, usdc)
///     .with_token(usdc, "USDC", 6);
///
/// let dex = Dex::new(&dataset, dex_dataset, Arc::new(chain), &config)?;
/// ```
pub struct MockChain {
    factory: Address,
    state: Mutex<ChainState>,
}

impl MockChain {
    /// Create an empty chain whose factory lives at `factory`
    pub fn new(factory: Address) -> Self {
        Self {
            factory,
            state: Mutex::new(ChainState::default()),
        }
    }

    /// Deploy a pair for `(token0, token1)` reachable through `getPair` and `allPairs`
    pub fn with_pool(self, pool: Address, token0: Address, token1: Address) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.pairs.insert((token0, token1), pool);
            state.pairs.insert((token1, token0), pool);
            state.all_pairs.push(pool);
            state.pool_tokens.insert(pool, (token0, token1));
        }
        self
    }

    /// List `pool` in `allPairs` without it answering `token0()` / `token1()`
    pub fn with_malformed_pool(self, pool: Address) -> Self {
        self.state.lock().unwrap().all_pairs.push(pool);
        self
    }

    /// Make `allPairs(index)` revert
    pub fn with_broken_index(self, index: u64) -> Self {
        self.state.lock().unwrap().broken_indices.insert(index);
        self
    }

    /// Make `allPairsLength()` answer `count` regardless of the deployed pools
    pub fn with_reported_pair_count(self, count: u64) -> Self {
        self.state.lock().unwrap().reported_pair_count = Some(count);
        self
    }

    /// Current reserves returned by `getReserves()`
    pub fn with_reserves(self, pool: Address, reserve0: u128, reserve1: u128) -> Self {
        self.state
            .lock()
            .unwrap()
            .reserves
            .insert(pool, (reserve0, reserve1));
        self
    }

    /// ERC-20 metadata of `token`
    pub fn with_token(self, token: Address, symbol: &str, decimals: u8) -> Self {
        self.deploy_token(token, symbol, decimals);
        self
    }

    /// Timestamp of block `number`
    pub fn with_block(self, number: BlockNumber, timestamp: u64) -> Self {
        self.state.lock().unwrap().blocks.insert(number, timestamp);
        self
    }

    /// Make the lookup of block `number` fail
    pub fn with_failing_block(self, number: BlockNumber) -> Self {
        self.state.lock().unwrap().failing_blocks.insert(number);
        self
    }

    /// Make log subscriptions to `pool` fail
    pub fn with_failing_subscription(self, pool: Address) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_subscriptions
            .insert(pool);
        self
    }

    /// Push a `Sync` event to every open subscription of `pool`
    ///
    /// Returns the number of subscriptions the event reached.
    pub fn emit_sync(&self, pool: Address, reserve0: u128, reserve1: u128, block: BlockNumber) -> usize {
        self.emit_log(sync_log(pool, reserve0, reserve1, block))
    }

    /// Push an arbitrary log to every open subscription of its address
    pub fn emit_log(&self, log: Log) -> usize {
        let state = self.state.lock().unwrap();
        state
            .subscribers
            .get(&log.inner.address)
            .map(|senders| {
                senders
                    .iter()
                    .filter(|sender| sender.send(log.clone()).is_ok())
                    .count()
            })
            .unwrap_or(0)
    }

    /// Make `token` answer `symbol()` / `decimals()` from now on
    pub fn deploy_token(&self, token: Address, symbol: &str, decimals: u8) {
        let mut state = self.state.lock().unwrap();
        state.symbols.insert(token, symbol.to_string());
        state.decimals.insert(token, decimals);
    }

    /// End every open log stream of `pool`, as a node dropping the subscription would
    pub fn close_subscriptions(&self, pool: Address) {
        self.state.lock().unwrap().subscribers.remove(&pool);
    }

    /// Number of `eth_subscribe` requests received
    pub fn subscribe_calls(&self) -> usize {
        self.state.lock().unwrap().subscribe_calls
    }

    /// Subscriptions to `pool` whose consumer is still alive
    pub fn open_subscriptions(&self, pool: Address) -> usize {
        self.state
            .lock()
            .unwrap()
            .subscribers
            .get(&pool)
            .map(|senders| senders.iter().filter(|sender| !sender.is_closed()).count())
            .unwrap_or(0)
    }

    /// Every contract call received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    fn answer(&self, to: Address, input: &[u8]) -> Result<Vec<u8>, RpcError> {
        let selector = input.get(..4).ok_or_else(|| revert(to, "empty calldata"))?;
        let mut state = self.state.lock().unwrap();

        if to == self.factory {
            if selector == MockFactory::getPairCall::SELECTOR {
                let call = MockFactory::getPairCall::abi_decode(input)
                    .map_err(|e| revert(to, &e.to_string()))?;
                state.calls.push(RecordedCall::GetPair(call.tokenA, call.tokenB));
                let pool = state
                    .pairs
                    .get(&(call.tokenA, call.tokenB))
                    .copied()
                    .unwrap_or(Address::ZERO);
                return Ok((pool,).abi_encode_params());
            }
            if selector == MockFactory::allPairsLengthCall::SELECTOR {
                state.calls.push(RecordedCall::AllPairsLength);
                let count = state
                    .reported_pair_count
                    .unwrap_or(state.all_pairs.len() as u64);
                return Ok((U256::from(count),).abi_encode_params());
            }
            if selector == MockFactory::allPairsCall::SELECTOR {
                let call = MockFactory::allPairsCall::abi_decode(input)
                    .map_err(|e| revert(to, &e.to_string()))?;
                let index = call.index.to::<u64>();
                state.calls.push(RecordedCall::AllPairs(index));
                if state.broken_indices.contains(&index) {
                    return Err(revert(to, "allPairs"));
                }
                let pool = state
                    .all_pairs
                    .get(index as usize)
                    .copied()
                    .ok_or_else(|| revert(to, "index out of range"))?;
                return Ok((pool,).abi_encode_params());
            }
            return Err(revert(to, "unknown factory selector"));
        }

        if selector == MockPair::token0Call::SELECTOR {
            state.calls.push(RecordedCall::Token0(to));
            let (token0, _) = *state.pool_tokens.get(&to).ok_or_else(|| revert(to, "token0"))?;
            return Ok((token0,).abi_encode_params());
        }
        if selector == MockPair::token1Call::SELECTOR {
            state.calls.push(RecordedCall::Token1(to));
            let (_, token1) = *state.pool_tokens.get(&to).ok_or_else(|| revert(to, "token1"))?;
            return Ok((token1,).abi_encode_params());
        }
        if selector == MockPair::getReservesCall::SELECTOR {
            state.calls.push(RecordedCall::GetReserves(to));
            let (reserve0, reserve1) = *state.reserves.get(&to).ok_or_else(|| revert(to, "getReserves"))?;
            return Ok((U256::from(reserve0), U256::from(reserve1), U256::from(1u64)).abi_encode_params());
        }
        if selector == MockToken::decimalsCall::SELECTOR {
            state.calls.push(RecordedCall::Decimals(to));
            let decimals = *state.decimals.get(&to).ok_or_else(|| revert(to, "decimals"))?;
            return Ok((U256::from(decimals),).abi_encode_params());
        }
        if selector == MockToken::symbolCall::SELECTOR {
            state.calls.push(RecordedCall::Symbol(to));
            let symbol = state.symbols.get(&to).cloned().ok_or_else(|| revert(to, "symbol"))?;
            return Ok((symbol,).abi_encode_params());
        }

        Err(revert(to, "unknown selector"))
    }
}

#[async_trait]
impl Connection for MockChain {
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, RpcError> {
        self.answer(to, &input).map(Bytes::from)
    }

    async fn subscribe_logs(&self, filter: Filter) -> Result<LogStream, RpcError> {
        // Let concurrent subscribers interleave as they would over a socket
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        state.subscribe_calls += 1;

        let pool = state
            .pool_tokens
            .keys()
            .copied()
            .find(|pool| filter.address.matches(pool))
            .ok_or_else(|| {
                RpcError::subscription_failed("logs", std::io::Error::other("unknown address"))
            })?;
        if state.failing_subscriptions.contains(&pool) {
            return Err(RpcError::subscription_failed(
                "logs",
                std::io::Error::other("subscription rejected"),
            ));
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        state.subscribers.entry(pool).or_default().push(sender);

        Ok(Box::pin(futures::stream::unfold(
            receiver,
            |mut receiver| async move { receiver.recv().await.map(|log| (log, receiver)) },
        )))
    }

    async fn block_timestamp(&self, number: BlockNumber) -> Result<Option<u64>, RpcError> {
        let state = self.state.lock().unwrap();
        if state.failing_blocks.contains(&number) {
            return Err(RpcError::get_block_failed(
                number,
                std::io::Error::other("header not found"),
            ));
        }
        Ok(state.blocks.get(&number).copied())
    }
}

fn revert(to: Address, reason: &str) -> RpcError {
    RpcError::call_failed(
        to,
        "eth_call",
        std::io::Error::other(format!("execution reverted: {reason}")),
    )
}

/// A `Sync` log of `pool` without a block timestamp
pub fn sync_log(pool: Address, reserve0: u128, reserve1: u128, block: BlockNumber) -> Log {
    let event = MockPair::Sync {
        reserve0: U112::from(reserve0),
        reserve1: U112::from(reserve1),
    };
    Log {
        inner: alloy_primitives::Log {
            address: pool,
            data: event.encode_log_data(),
        },
        block_number: Some(block),
        block_timestamp: None,
        ..Default::default()
    }
}

/// A log of `pool` that isn't a `Sync` event
pub fn garbage_log(pool: Address, block: BlockNumber) -> Log {
    Log {
        inner: alloy_primitives::Log {
            address: pool,
            data: alloy_primitives::LogData::new_unchecked(
                vec![MockPair::Sync::SIGNATURE_HASH],
                Bytes::from_static(&[0xde, 0xad]),
            ),
        },
        block_number: Some(block),
        ..Default::default()
    }
}

/// Single-DEX dataset around a UniswapV2 factory at `factory`
pub fn dataset(
    factory: Address,
    wrapped_native: Option<Address>,
    tokens: Vec<TokenInfo>,
    stablecoins: Vec<TokenInfo>,
) -> ChainDataset {
    let dex = dex_dataset(factory, tokens.clone(), stablecoins.clone());
    ChainDataset {
        metadata: ChainMetadata {
            chain_id: CHAIN_ID,
            name: "Polygon".to_string(),
            rpc: vec!["http://localhost:8545".to_string()],
            dexes: vec![DEX_ID.to_string()],
            wrapped_native_token_address: wrapped_native,
            native_currency: None,
        },
        tokens: token_map(tokens),
        stablecoins: token_map(stablecoins),
        dexes: HashMap::from([(DEX_ID.to_string(), dex)]),
    }
}

/// DEX entry with a `UniswapV2Factory` contract at `factory`
pub fn dex_dataset(factory: Address, tokens: Vec<TokenInfo>, stablecoins: Vec<TokenInfo>) -> DexDataset {
    DexDataset {
        id: DEX_ID.to_string(),
        metadata: DexMetadata {
            name: Some("SushiSwap".to_string()),
            contract_type_to_contract_name: ContractTypes {
                factory: "UniswapV2Factory".to_string(),
                pair: "UniswapV2Pair".to_string(),
                router: None,
            },
        },
        contracts: HashMap::from([(
            "UniswapV2Factory".to_string(),
            ContractInfo { address: factory },
        )]),
        tokens: token_map(tokens),
        stablecoins: token_map(stablecoins),
    }
}

/// Token entry for the dataset
pub fn token(address: Address, symbol: &str, decimals: u8) -> TokenInfo {
    TokenInfo::new(address, symbol, TokenDecimals::new(decimals))
}

/// Let spawned listener tasks run until they block
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
}

/// Next value from `receiver`, failing the test after two seconds
pub async fn next_within<T>(receiver: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("timed out waiting for callback")
        .expect("callback channel closed")
}
