// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for dataset loading and facade construction.

use std::path::PathBuf;

/// Errors that can occur while loading chain/DEX metadata or constructing a
/// [`Dexters`](crate::Dexters) instance from it.
///
/// All of these are construction-time failures: once a `Dexters` exists, its
/// metadata is complete.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A dataset file could not be read.
    #[error("Failed to read dataset file {path}")]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A dataset file is not valid JSON for the expected shape.
    #[error("Failed to parse dataset file {path}")]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// The configuration references a chain or DEX absent from the dataset.
    #[error("Unsupported chain or DEX: {details}")]
    UnsupportedChainOrDex {
        /// Which chain/DEX was requested
        details: String,
    },

    /// DEX metadata names a contract type whose address is not in the dataset.
    #[error("DEX {dex_id} has no {contract_type} contract address")]
    MissingContract {
        /// DEX identifier
        dex_id: String,
        /// Contract type (e.g. "factory")
        contract_type: String,
    },
}

impl DatasetError {
    /// Create an `UnsupportedChainOrDex` error for an unknown DEX.
    pub fn unsupported_dex(chain: impl std::fmt::Display, dex_id: impl std::fmt::Display) -> Self {
        DatasetError::UnsupportedChainOrDex {
            details: format!("DEX {dex_id} on chain {chain}"),
        }
    }

    /// Create an `UnsupportedChainOrDex` error for an unknown chain.
    pub fn unsupported_chain(chain: impl std::fmt::Display) -> Self {
        DatasetError::UnsupportedChainOrDex {
            details: format!("chain {chain}"),
        }
    }

    /// Create a `MissingContract` error.
    pub fn missing_contract(dex_id: impl Into<String>, contract_type: impl Into<String>) -> Self {
        DatasetError::MissingContract {
            dex_id: dex_id.into(),
            contract_type: contract_type.into(),
        }
    }
}
