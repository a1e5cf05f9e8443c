// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! by the portfolio binary. Configuration is read once at startup and passed
//! explicitly to the readers and the controller; nothing below reads the
//! environment afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `NETWORK_MODE` | `testnet` or `mainnet` | `testnet` |
//! | `WALLET_EVM_ADDRESS` | Hex address for EVM chains | demo wallet |
//! | `WALLET_BECH32_ADDRESS` | Bare bech32 address for P/X chains | demo wallet |
//! | `PORTFOLIO_FILTER` | `all` or a chain key (`sepolia`, `p-chain`, ...) | `all` |
//! | `PRICE_API_URL` | Simple-price endpoint | CoinGecko |
//! | `COINGECKO_API_KEY` | Demo API key sent as a header | Optional |
//! | `RPC_TIMEOUT_SECS` | Per-request timeout, `0` disables | `15` |
//! | `RPC_URL_<MODE>_<CHAIN>` | Endpoint override, e.g. `RPC_URL_TESTNET_SEPOLIA` | built-in table |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,relational_portfolio=debug` |

use std::env;
use std::time::Duration;

use crate::blockchain::{ChainKey, EndpointTable, NetworkMode};
use crate::error::ConfigError;
use crate::portfolio::{ChainFilter, WalletAddresses};
use crate::providers::DEFAULT_PRICE_API_URL;

pub const NETWORK_MODE_ENV: &str = "NETWORK_MODE";
pub const WALLET_EVM_ADDRESS_ENV: &str = "WALLET_EVM_ADDRESS";
pub const WALLET_BECH32_ADDRESS_ENV: &str = "WALLET_BECH32_ADDRESS";
pub const PORTFOLIO_FILTER_ENV: &str = "PORTFOLIO_FILTER";
pub const PRICE_API_URL_ENV: &str = "PRICE_API_URL";
pub const COINGECKO_API_KEY_ENV: &str = "COINGECKO_API_KEY";
pub const RPC_TIMEOUT_SECS_ENV: &str = "RPC_TIMEOUT_SECS";

/// Prefix of the per-mode, per-chain endpoint overrides.
pub const RPC_URL_ENV_PREFIX: &str = "RPC_URL_";

/// Environment variable selecting `json` or `pretty` log output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,relational_portfolio=debug";

/// Default upper bound for one RPC or price request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Endpoint tables for both network modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeEndpoints {
    pub testnet: EndpointTable,
    pub mainnet: EndpointTable,
}

impl ModeEndpoints {
    pub fn builtin() -> Self {
        Self {
            testnet: EndpointTable::for_mode(NetworkMode::Testnet),
            mainnet: EndpointTable::for_mode(NetworkMode::Mainnet),
        }
    }

    pub fn for_mode(&self, mode: NetworkMode) -> &EndpointTable {
        match mode {
            NetworkMode::Testnet => &self.testnet,
            NetworkMode::Mainnet => &self.mainnet,
        }
    }

    pub fn with_override(mut self, mode: NetworkMode, key: ChainKey, rpc_url: impl Into<String>) -> Self {
        match mode {
            NetworkMode::Testnet => self.testnet = self.testnet.with_override(key, rpc_url),
            NetworkMode::Mainnet => self.mainnet = self.mainnet.with_override(key, rpc_url),
        }
        self
    }
}

impl Default for ModeEndpoints {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Name of the override variable for `mode` and `key`.
pub fn rpc_url_env(mode: NetworkMode, key: ChainKey) -> String {
    format!(
        "{RPC_URL_ENV_PREFIX}{}_{}",
        mode.as_str().to_ascii_uppercase(),
        key.env_suffix()
    )
}

/// Portfolio configuration.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    pub network_mode: NetworkMode,
    pub wallet: WalletAddresses,
    pub filter: ChainFilter,
    pub price_api_url: String,
    pub coingecko_api_key: Option<String>,
    /// `None` disables request timeouts
    pub request_timeout: Option<Duration>,
    pub endpoints: ModeEndpoints,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            network_mode: NetworkMode::default(),
            wallet: WalletAddresses::default(),
            filter: ChainFilter::All,
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            coingecko_api_key: None,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            endpoints: ModeEndpoints::builtin(),
        }
    }
}

impl PortfolioConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the value of an
    /// environment variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(mode) = get(NETWORK_MODE_ENV) {
            config.network_mode = mode.parse()?;
        }

        if let Some(evm) = get(WALLET_EVM_ADDRESS_ENV) {
            config.wallet.evm = evm;
        }
        if let Some(bech32) = get(WALLET_BECH32_ADDRESS_ENV) {
            config.wallet.bech32 = bech32;
        }

        if let Some(filter) = get(PORTFOLIO_FILTER_ENV) {
            config.filter = filter.parse().map_err(|_| ConfigError::InvalidValue {
                var: PORTFOLIO_FILTER_ENV.to_string(),
                value: filter.clone(),
            })?;
        }

        if let Some(url) = get(PRICE_API_URL_ENV) {
            config.price_api_url = validate_url(PRICE_API_URL_ENV, url)?;
        }
        config.coingecko_api_key = get(COINGECKO_API_KEY_ENV);

        if let Some(secs) = get(RPC_TIMEOUT_SECS_ENV) {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::InvalidValue {
                var: RPC_TIMEOUT_SECS_ENV.to_string(),
                value: secs.clone(),
            })?;
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        for mode in [NetworkMode::Testnet, NetworkMode::Mainnet] {
            for key in ChainKey::ALL {
                let var = rpc_url_env(mode, key);
                if let Some(url) = get(var.as_str()) {
                    let url = validate_url(&var, url)?;
                    config.endpoints = config.endpoints.with_override(mode, key, url);
                }
            }
        }

        Ok(config)
    }
}

fn validate_url(var: &str, value: String) -> Result<String, ConfigError> {
    match url::Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value,
        }),
    }
}
