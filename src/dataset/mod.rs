// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain and DEX metadata
//!
//! The dataset follows the `blockchain-datasets` directory layout:
//!
//! ```text
//! <root>/blockchains/<chain>/metadata.json
//! <root>/blockchains/<chain>/tokens.json
//! <root>/blockchains/<chain>/stablecoins.json
//! <root>/dexes/<dex>/metadata.json
//! <root>/dexes/<dex>/contracts/<chain>.json
//! <root>/dexes/<dex>/tokens/<chain>.json
//! <root>/dexes/<dex>/stablecoins/<chain>.json
//! ```
//!
//! A [`ChainDataset`] can also be built in memory from the model types.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn, Instrument};

use crate::errors::DatasetError;
use crate::spans;

mod model;

pub use model::{
    token_map, ChainDataset, ChainMetadata, ContractInfo, ContractTypes, DexDataset, DexMetadata,
    NativeCurrency, TokenInfo, TokenMap,
};
pub(crate) use model::find_token;

impl ChainDataset {
    /// Load the metadata of `chain_id` and its DEXes from a dataset directory
    ///
    /// DEXes listed by the chain but absent from the dataset are skipped with
    /// a warning; [`Dexters::new`](crate::Dexters::new) rejects such datasets.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::UnsupportedChainOrDex`] if the chain has no metadata
    /// - [`DatasetError::Io`] / [`DatasetError::Parse`] for unreadable files
    pub async fn from_dir(root: impl AsRef<Path>, chain_id: u64) -> Result<Self, DatasetError> {
        let root = root.as_ref().to_path_buf();
        async move {
            let chain_dir = root.join("blockchains").join(chain_id.to_string());
            let metadata: ChainMetadata = read_json_optional(&chain_dir.join("metadata.json"))
                .await?
                .ok_or_else(|| DatasetError::unsupported_chain(chain_id))?;

            let tokens: TokenMap = read_json_or_default(&chain_dir.join("tokens.json")).await?;
            let stablecoins: TokenMap = read_json_or_default(&chain_dir.join("stablecoins.json")).await?;

            let mut dexes = std::collections::HashMap::with_capacity(metadata.dexes.len());
            for dex_id in &metadata.dexes {
                match load_dex(&root, chain_id, dex_id).await? {
                    Some(dex) => {
                        dexes.insert(dex_id.clone(), dex);
                    }
                    None => warn!(dex = %dex_id, "DEX listed by chain has no metadata"),
                }
            }

            info!(
                chain = %metadata.name,
                dexes = dexes.len(),
                tokens = tokens.len(),
                "Loaded chain dataset"
            );

            Ok(ChainDataset {
                metadata,
                tokens,
                stablecoins,
                dexes,
            })
        }
        .instrument(spans::load_dataset(chain_id))
        .await
    }
}

async fn load_dex(root: &Path, chain_id: u64, dex_id: &str) -> Result<Option<DexDataset>, DatasetError> {
    let dex_dir = root.join("dexes").join(dex_id);
    let Some(metadata) = read_json_optional::<DexMetadata>(&dex_dir.join("metadata.json")).await?
    else {
        return Ok(None);
    };

    let file = format!("{chain_id}.json");
    let contracts = read_json_or_default(&dex_dir.join("contracts").join(&file)).await?;
    let tokens = read_json_or_default(&dex_dir.join("tokens").join(&file)).await?;
    let stablecoins = read_json_or_default(&dex_dir.join("stablecoins").join(&file)).await?;

    Ok(Some(DexDataset {
        id: dex_id.to_string(),
        metadata,
        contracts,
        tokens,
        stablecoins,
    }))
}

async fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, DatasetError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Dataset file not found");
            return Ok(None);
        }
        Err(source) => {
            return Err(DatasetError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, DatasetError> {
    Ok(read_json_optional(path).await?.unwrap_or_default())
}
