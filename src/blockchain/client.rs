// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Native balance reader for EVM chains and the Avalanche P/X chains.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use alloy::{
    primitives::Address,
    providers::{Provider, ProviderBuilder},
};

use super::avalanche::{balance_request, chain_address, parse_balance_response};
use super::types::*;
use crate::error::BalanceError;

/// Source of native balances, one (address, endpoint) pair per call.
///
/// Implemented by [`ChainBalanceReader`]; the controller is generic over it
/// so fetch cycles can be driven by in-process fakes.
pub trait BalanceSource: Send + Sync + 'static {
    fn fetch_balance(
        &self,
        address: &str,
        endpoint: &ChainEndpoint,
    ) -> impl Future<Output = Result<TokenAmount, BalanceError>> + Send;
}

/// Read-only balance client. No retries, no caching.
#[derive(Debug, Clone)]
pub struct ChainBalanceReader {
    /// HTTP client for the Avalanche platform/exchange APIs
    http: reqwest::Client,
    /// Upper bound for one balance query
    timeout: Option<Duration>,
}

impl ChainBalanceReader {
    /// Create a reader. `timeout` bounds every call; `None` waits forever.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout,
        }
    }

    /// Query the native balance of `address` on `endpoint`.
    ///
    /// EVM chains expect a hex address. P/X chains expect a bech32 address,
    /// with or without the `P-`/`X-` alias. Any transport, status or parse
    /// failure is returned as an error; no default value is substituted.
    pub async fn fetch_balance(
        &self,
        address: &str,
        endpoint: &ChainEndpoint,
    ) -> Result<TokenAmount, BalanceError> {
        tracing::debug!(chain = %endpoint.key, url = %endpoint.rpc_url, "Fetching native balance");

        let query = async {
            match endpoint.family() {
                ChainFamily::Evm => self.fetch_evm_balance(address, &endpoint.rpc_url).await,
                ChainFamily::AvalanchePlatform | ChainFamily::AvalancheExchange => {
                    self.fetch_avalanche_balance(address, endpoint).await
                }
            }
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, query)
                .await
                .map_err(|_| BalanceError::Timeout(limit))?,
            None => query.await,
        }
    }

    /// `eth_getBalance` at the latest block, in wei.
    async fn fetch_evm_balance(
        &self,
        address: &str,
        rpc_url: &str,
    ) -> Result<TokenAmount, BalanceError> {
        let addr = Address::from_str(address.trim())
            .map_err(|e| BalanceError::InvalidAddress(e.to_string()))?;

        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| BalanceError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        let balance = provider
            .get_balance(addr)
            .await
            .map_err(|e| BalanceError::Rpc(e.to_string()))?;

        Ok(TokenAmount::new(balance, EVM_NATIVE_DECIMALS))
    }

    /// `platform.getBalance` / `avm.getBalance`, in nAVAX.
    async fn fetch_avalanche_balance(
        &self,
        address: &str,
        endpoint: &ChainEndpoint,
    ) -> Result<TokenAmount, BalanceError> {
        let family = endpoint.family();
        let address = chain_address(family, address)?;
        let request = balance_request(family, &address)?;

        let url: url::Url = endpoint
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| BalanceError::InvalidRpcUrl(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BalanceError::Rpc(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BalanceError::HttpStatus(response.status()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BalanceError::Rpc(e.to_string()))?;

        let raw = parse_balance_response(&body)?;
        TokenAmount::from_decimal_str(&raw, family.decimals())
            .map_err(BalanceError::MalformedResponse)
    }
}

impl BalanceSource for ChainBalanceReader {
    fn fetch_balance(
        &self,
        address: &str,
        endpoint: &ChainEndpoint,
    ) -> impl Future<Output = Result<TokenAmount, BalanceError>> + Send {
        ChainBalanceReader::fetch_balance(self, address, endpoint)
    }
}
