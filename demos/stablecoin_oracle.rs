/// Live stablecoin oracle on SushiSwap (Polygon)
///
/// This example shows how to:
/// 1. Load chain and DEX metadata from a `blockchain-datasets` checkout
/// 2. Follow the reserve-weighted USD price of the wrapped native token
/// 3. Follow the WMATIC/WETH relative price and derive a USD price for WETH
///
/// Run with:
/// ```bash
/// DATASET_DIR=../blockchain-datasets/data \
/// WS_URL=wss://polygon-mainnet.example/ws \
/// RUN_SECS=300 \
/// RUST_LOG=info,dexters=debug \
/// cargo run --example stablecoin_oracle
/// ```
use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use dexters::{Callback, ChainDataset, Dexters, OracleConfigBuilder, PriceObservation, UsdPriceUpdate};
use tracing::info;
use tracing_subscriber::EnvFilter;

const POLYGON: u64 = 137;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    dotenvy::dotenv().ok();

    let dataset_dir = env::var("DATASET_DIR").context("DATASET_DIR environment variable not set")?;
    let ws_url = env::var("WS_URL").context("WS_URL environment variable not set")?;
    let run_for = env::var("RUN_SECS")
        .ok()
        .and_then(|secs| secs.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(300));

    let dataset = ChainDataset::from_dir(&dataset_dir, POLYGON).await?;
    let native_symbol = dataset
        .metadata
        .native_currency
        .as_ref()
        .map(|currency| currency.symbol.clone())
        .unwrap_or_default();
    info!(native_symbol, "Loaded Polygon dataset");

    let config = OracleConfigBuilder::new().exclude_stablecoin("BUSD").build();
    let dexters = Dexters::connect_ws(dataset, &ws_url, config).await?;
    info!(dex_ids = ?dexters.dex_ids(), "Connected");

    let sushiswap = dexters.dex("sushiswap")?;

    let native_usd: Arc<Mutex<Option<BigDecimal>>> = Arc::new(Mutex::new(None));
    let latest = Arc::clone(&native_usd);
    let feed = sushiswap
        .subscribe_native_usd_price(Callback::from_fn(move |update: UsdPriceUpdate| {
            println!(
                "{native_symbol} and W{native_symbol} price: {update} ({} pools, at {:?})",
                update.pools,
                update.datetime()
            );
            *latest.lock().unwrap() = Some(update.price_usd);
        }))
        .await?;
    info!(pools = feed.pools().len(), "Native USD feed running");

    let wmatic = sushiswap.token("WMATIC").context("WMATIC not listed")?.address;
    let weth = sushiswap.token("WETH").context("WETH not listed")?.address;

    let subscription = sushiswap
        .subscribe_relative_price(
            wmatic,
            weth,
            Callback::from_fn(move |observation: PriceObservation| {
                let (Some(wmatic_price), Some(weth_price)) =
                    (observation.price_of(wmatic), observation.price_of(weth))
                else {
                    return;
                };
                println!(
                    "WMATIC-WETH at {:?}: {} / {}",
                    observation.timestamp,
                    wmatic_price.round(8),
                    weth_price.round(8)
                );
                if let Some(native_usd) = native_usd.lock().unwrap().as_ref() {
                    println!("WETH $ price: {}", (weth_price * native_usd).round(6));
                }
            }),
        )
        .await?;

    tokio::time::sleep(run_for).await;

    subscription.unsubscribe();
    feed.unsubscribe();
    info!("Stopped");

    Ok(())
}
