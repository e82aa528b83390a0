//! Configuration

use std::{env, path::PathBuf, str::FromStr};

use alloy_primitives::Address;

use crate::{
    batch::BatchOptions,
    constants::{DEFAULT_EXPIRATION_SECS, DEFAULT_GAS_LIMIT},
    error::ConfigError,
    signer::EnclaveSigner,
};

/// Settlement runner configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlerConfig {
    /// Enclave wallet address settlements are sent from
    pub signer_address: Option<Address>,
    /// JSON-lines request file (stdin when unset)
    pub params_path: Option<PathBuf>,
    /// Seconds until a submitted batch expires
    pub expiration_secs: u64,
    /// Gas limit attached to the batch
    pub gas_limit: u64,
    /// Default log filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for SettlerConfig {
    fn default() -> Self {
        Self {
            signer_address: None,
            params_path: None,
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            gas_limit: DEFAULT_GAS_LIMIT,
            log_filter: "info".to_string(),
        }
    }
}

impl SettlerConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let signer_address = var("SETTLER_SIGNER_ADDRESS")
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                Address::from_str(s.trim())
                    .map_err(|e| ConfigError::InvalidAddress {
                        var: "SETTLER_SIGNER_ADDRESS",
                        value: s.clone(),
                        reason: e.to_string(),
                    })
            })
            .transpose()?;

        Ok(Self {
            signer_address,
            params_path: var("SETTLER_PARAMS_PATH").filter(|s| !s.is_empty()).map(PathBuf::from),
            expiration_secs: var("SETTLER_EXPIRATION_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.expiration_secs),
            gas_limit: var("SETTLER_GAS_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.gas_limit),
            log_filter: var("RUST_LOG").unwrap_or(defaults.log_filter),
        })
    }

    /// Batch envelope settings
    pub const fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            expiration_secs: self.expiration_secs,
            gas_limit: self.gas_limit,
        }
    }

    /// Signer for the configured enclave wallet
    pub fn signer(&self) -> EnclaveSigner {
        self.signer_address.into()
    }
}
