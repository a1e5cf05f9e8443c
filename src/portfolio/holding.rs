// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance lines tracked by the portfolio.

use serde::Serialize;

use crate::blockchain::{ChainKey, NetworkMode, TokenAmount};
use crate::providers::coingecko::{AVAX_PRICE_ID, ETH_PRICE_ID};

/// Demo wallet queried on the EVM chains.
pub const DEFAULT_EVM_ADDRESS: &str = "0xb3020c5b33538A879C89C69392208C72ec3BFEf1";

/// Demo wallet queried on the P and X chains (bare bech32, no chain alias).
pub const DEFAULT_BECH32_ADDRESS: &str = "fuji1w4zlzvd54vsjz3a8yxkks5tpjk88nl27uw3xgh";

/// Addresses of the wallet whose portfolio is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAddresses {
    /// Hex address for EVM chains
    pub evm: String,
    /// Bare bech32 address for the P and X chains
    pub bech32: String,
}

impl WalletAddresses {
    pub fn new(evm: impl Into<String>, bech32: impl Into<String>) -> Self {
        Self {
            evm: evm.into(),
            bech32: bech32.into(),
        }
    }

    /// Address used when querying `chain`.
    pub fn for_chain(&self, chain: ChainKey) -> &str {
        match chain.family().address_prefix() {
            Some(_) => &self.bech32,
            None => &self.evm,
        }
    }
}

impl Default for WalletAddresses {
    fn default() -> Self {
        Self::new(DEFAULT_EVM_ADDRESS, DEFAULT_BECH32_ADDRESS)
    }
}

/// One trackable balance line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    /// Display name (e.g. "Avalanche", "AVAX (P)")
    pub name: String,
    /// Asset symbol
    pub symbol: String,
    /// Chain the balance is read from
    pub chain: ChainKey,
    /// Human-readable chain label
    pub chain_label: String,
    /// Account queried on `chain`
    pub address: String,
    /// Native balance; `None` until fetched or after a failed fetch
    pub raw_balance: Option<TokenAmount>,
    /// Price index key; `None` for assets without a tracked USD price
    pub price_id: Option<String>,
    /// Fixed USD value used for untracked assets, if any
    pub static_fiat: Option<f64>,
}

impl Holding {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        chain: ChainKey,
        chain_label: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            chain,
            chain_label: chain_label.into(),
            address: address.into(),
            raw_balance: None,
            price_id: None,
            static_fiat: None,
        }
    }

    pub fn priced_by(mut self, price_id: impl Into<String>) -> Self {
        self.price_id = Some(price_id.into());
        self
    }

    pub fn with_static_fiat(mut self, usd: f64) -> Self {
        self.static_fiat = Some(usd);
        self
    }

    pub fn with_balance(mut self, balance: TokenAmount) -> Self {
        self.raw_balance = Some(balance);
        self
    }

    /// Whether the holding is priced from the price index.
    pub fn is_tracked(&self) -> bool {
        self.price_id.is_some()
    }
}

/// The wallet's balance lines for one network mode, all balances unknown.
pub fn default_holdings(wallet: &WalletAddresses, mode: NetworkMode) -> Vec<Holding> {
    let holding = |name: &str, symbol: &str, chain: ChainKey, label: &str| {
        Holding::new(name, symbol, chain, label, wallet.for_chain(chain))
    };

    let eth_label = match mode {
        NetworkMode::Testnet => "Sepolia Testnet",
        NetworkMode::Mainnet => "Ethereum Mainnet",
    };

    vec![
        holding("Avalanche", "AVAX", ChainKey::AvalancheFuji, "Avalanche Fuji").priced_by(AVAX_PRICE_ID),
        holding("Ethereum", "ETH", ChainKey::Sepolia, eth_label).priced_by(ETH_PRICE_ID),
        holding("Echo", "ECHO", ChainKey::Echo, "Dexalot Echo"),
        holding("Dispatch", "DIS", ChainKey::Dispatch, "Dexalot Dispatch"),
        holding("Dexalot", "ALOT", ChainKey::Dexalot, "Dexalot Subnet"),
        holding("AVAX (P)", "AVAX", ChainKey::PChain, "Avalanche P-Chain").priced_by(AVAX_PRICE_ID),
        holding("AVAX (X)", "AVAX", ChainKey::XChain, "Avalanche X-Chain").priced_by(AVAX_PRICE_ID),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_holdings_cover_every_chain_once() {
        let holdings = default_holdings(&WalletAddresses::default(), NetworkMode::Testnet);
        assert_eq!(holdings.len(), ChainKey::ALL.len());
        for key in ChainKey::ALL {
            assert_eq!(holdings.iter().filter(|h| h.chain == key).count(), 1);
        }
        assert!(holdings.iter().all(|h| h.raw_balance.is_none()));
    }

    #[test]
    fn addresses_follow_chain_family() {
        let wallet = WalletAddresses::default();
        let holdings = default_holdings(&wallet, NetworkMode::Testnet);
        let p_chain = holdings.iter().find(|h| h.chain == ChainKey::PChain).unwrap();
        let sepolia = holdings.iter().find(|h| h.chain == ChainKey::Sepolia).unwrap();
        assert_eq!(p_chain.address, DEFAULT_BECH32_ADDRESS);
        assert_eq!(sepolia.address, DEFAULT_EVM_ADDRESS);
    }

    #[test]
    fn subnet_tokens_are_untracked() {
        let holdings = default_holdings(&WalletAddresses::default(), NetworkMode::Mainnet);
        let untracked: Vec<_> = holdings
            .iter()
            .filter(|h| !h.is_tracked())
            .map(|h| h.chain)
            .collect();
        assert_eq!(untracked, vec![ChainKey::Echo, ChainKey::Dispatch, ChainKey::Dexalot]);

        let eth = holdings.iter().find(|h| h.symbol == "ETH").unwrap();
        assert_eq!(eth.chain_label, "Ethereum Mainnet");
    }
}
