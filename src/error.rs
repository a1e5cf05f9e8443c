// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error types for the balance and price readers and for configuration.
//!
//! Balance errors surface to the caller, which leaves the holding unknown.
//! Price errors never leave the price reader: they only select the
//! fallback snapshot.

use std::time::Duration;

use reqwest::StatusCode;

/// Errors returned by the chain balance reader.
#[derive(Debug, thiserror::Error)]
pub enum BalanceError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("HTTP {0} from RPC endpoint")]
    HttpStatus(StatusCode),

    #[error("Malformed RPC response: {0}")]
    MalformedResponse(String),

    #[error("RPC request timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors raised while fetching the live price index.
#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error("Price request failed: {0}")]
    Request(String),

    #[error("HTTP {0} from price endpoint")]
    HttpStatus(StatusCode),

    #[error("Price response was invalid: {0}")]
    InvalidResponse(String),
}

/// Errors raised while loading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown network mode `{0}` (expected `testnet` or `mainnet`)")]
    InvalidNetworkMode(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}
