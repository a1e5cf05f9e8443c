// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain identifiers, RPC endpoint tables and fixed-point token amounts.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize, Serializer};

/// Decimals of the EVM native unit (wei -> AVAX/ETH).
pub const EVM_NATIVE_DECIMALS: u8 = 18;

/// Decimals of the Avalanche platform/exchange chain unit (nAVAX -> AVAX).
pub const AVALANCHE_NATIVE_DECIMALS: u8 = 9;

/// Which endpoint set a fetch cycle talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    #[default]
    Testnet,
    Mainnet,
}

impl NetworkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkMode::Testnet => "testnet",
            NetworkMode::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkMode {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(NetworkMode::Testnet),
            "mainnet" => Ok(NetworkMode::Mainnet),
            other => Err(crate::error::ConfigError::InvalidNetworkMode(other.to_string())),
        }
    }
}

/// Protocol family used to query a chain's native balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    /// `eth_getBalance` over EVM JSON-RPC, 18 decimals.
    Evm,
    /// Avalanche P-Chain `platform.getBalance`, 9 decimals.
    AvalanchePlatform,
    /// Avalanche X-Chain `avm.getBalance`, 9 decimals.
    AvalancheExchange,
}

impl ChainFamily {
    pub fn decimals(&self) -> u8 {
        match self {
            ChainFamily::Evm => EVM_NATIVE_DECIMALS,
            ChainFamily::AvalanchePlatform | ChainFamily::AvalancheExchange => {
                AVALANCHE_NATIVE_DECIMALS
            }
        }
    }

    /// Chain alias prepended to bare bech32 addresses (`P-`, `X-`).
    pub fn address_prefix(&self) -> Option<&'static str> {
        match self {
            ChainFamily::Evm => None,
            ChainFamily::AvalanchePlatform => Some("P-"),
            ChainFamily::AvalancheExchange => Some("X-"),
        }
    }
}

/// Chain or subnet tracked by the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainKey {
    AvalancheFuji,
    Sepolia,
    Echo,
    Dispatch,
    Dexalot,
    PChain,
    XChain,
}

impl ChainKey {
    pub const ALL: [ChainKey; 7] = [
        ChainKey::AvalancheFuji,
        ChainKey::Sepolia,
        ChainKey::Echo,
        ChainKey::Dispatch,
        ChainKey::Dexalot,
        ChainKey::PChain,
        ChainKey::XChain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainKey::AvalancheFuji => "avalanche-fuji",
            ChainKey::Sepolia => "sepolia",
            ChainKey::Echo => "echo",
            ChainKey::Dispatch => "dispatch",
            ChainKey::Dexalot => "dexalot",
            ChainKey::PChain => "p-chain",
            ChainKey::XChain => "x-chain",
        }
    }

    pub fn family(&self) -> ChainFamily {
        match self {
            ChainKey::PChain => ChainFamily::AvalanchePlatform,
            ChainKey::XChain => ChainFamily::AvalancheExchange,
            _ => ChainFamily::Evm,
        }
    }

    /// Network tab a chain is listed under. The P and X chains share the
    /// Avalanche tab with the C-Chain.
    pub fn network_tab(&self) -> ChainKey {
        match self {
            ChainKey::PChain | ChainKey::XChain => ChainKey::AvalancheFuji,
            other => *other,
        }
    }

    /// Chain part of the `RPC_URL_<MODE>_<CHAIN>` override variable.
    pub fn env_suffix(&self) -> &'static str {
        match self {
            ChainKey::AvalancheFuji => "AVALANCHE_FUJI",
            ChainKey::Sepolia => "SEPOLIA",
            ChainKey::Echo => "ECHO",
            ChainKey::Dispatch => "DISPATCH",
            ChainKey::Dexalot => "DEXALOT",
            ChainKey::PChain => "P_CHAIN",
            ChainKey::XChain => "X_CHAIN",
        }
    }
}

impl fmt::Display for ChainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ChainKey::ALL
            .into_iter()
            .find(|key| key.as_str() == needle)
            .ok_or_else(|| format!("Unknown chain key: {s}"))
    }
}

/// RPC endpoint for one chain in one network mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEndpoint {
    pub key: ChainKey,
    pub rpc_url: String,
}

impl ChainEndpoint {
    pub fn new(key: ChainKey, rpc_url: impl Into<String>) -> Self {
        Self {
            key,
            rpc_url: rpc_url.into(),
        }
    }

    pub fn family(&self) -> ChainFamily {
        self.key.family()
    }
}

/// Avalanche C-Chain endpoints.
pub const AVAX_C_FUJI_RPC: &str = "https://api.avax-test.network/ext/bc/C/rpc";
pub const AVAX_C_MAINNET_RPC: &str = "https://api.avax.network/ext/bc/C/rpc";

/// Ethereum endpoints (Sepolia on testnet).
pub const ETH_SEPOLIA_RPC: &str = "https://ethereum-sepolia-rpc.publicnode.com";
pub const ETH_MAINNET_RPC: &str = "https://eth.llamarpc.com";

/// Avalanche platform and exchange chain endpoints.
pub const AVAX_P_FUJI_RPC: &str = "https://api.avax-test.network/ext/bc/P";
pub const AVAX_P_MAINNET_RPC: &str = "https://api.avax.network/ext/bc/P";
pub const AVAX_X_FUJI_RPC: &str = "https://api.avax-test.network/ext/bc/X";
pub const AVAX_X_MAINNET_RPC: &str = "https://api.avax.network/ext/bc/X";

/// Subnet endpoints. These do not follow the network mode.
pub const ECHO_RPC: &str = "https://subnets.avax.network/echo/testnet/rpc";
pub const DISPATCH_RPC: &str = "https://subnets.avax.network/dispatch/testnet/rpc";
pub const DEXALOT_RPC: &str = "https://subnets.avax.network/dexalot/testnet/rpc";

/// Endpoint per chain for one network mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTable {
    endpoints: Vec<ChainEndpoint>,
}

impl EndpointTable {
    /// Built-in endpoints for the given mode.
    pub fn for_mode(mode: NetworkMode) -> Self {
        let (c_chain, eth, p_chain, x_chain) = match mode {
            NetworkMode::Testnet => (
                AVAX_C_FUJI_RPC,
                ETH_SEPOLIA_RPC,
                AVAX_P_FUJI_RPC,
                AVAX_X_FUJI_RPC,
            ),
            NetworkMode::Mainnet => (
                AVAX_C_MAINNET_RPC,
                ETH_MAINNET_RPC,
                AVAX_P_MAINNET_RPC,
                AVAX_X_MAINNET_RPC,
            ),
        };

        Self {
            endpoints: vec![
                ChainEndpoint::new(ChainKey::AvalancheFuji, c_chain),
                ChainEndpoint::new(ChainKey::Sepolia, eth),
                ChainEndpoint::new(ChainKey::Echo, ECHO_RPC),
                ChainEndpoint::new(ChainKey::Dispatch, DISPATCH_RPC),
                ChainEndpoint::new(ChainKey::Dexalot, DEXALOT_RPC),
                ChainEndpoint::new(ChainKey::PChain, p_chain),
                ChainEndpoint::new(ChainKey::XChain, x_chain),
            ],
        }
    }

    /// Replace the endpoint used for `key`.
    pub fn with_override(mut self, key: ChainKey, rpc_url: impl Into<String>) -> Self {
        let rpc_url = rpc_url.into();
        match self.endpoints.iter_mut().find(|e| e.key == key) {
            Some(endpoint) => endpoint.rpc_url = rpc_url,
            None => self.endpoints.push(ChainEndpoint::new(key, rpc_url)),
        }
        self
    }

    pub fn get(&self, key: ChainKey) -> Option<&ChainEndpoint> {
        self.endpoints.iter().find(|e| e.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainEndpoint> {
        self.endpoints.iter()
    }
}

/// Native balance in the chain's smallest unit, kept as an integer until
/// it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Parse a base-10 integer string in smallest units.
    ///
    /// Anything other than ASCII digits is rejected instead of being
    /// partially parsed.
    pub fn from_decimal_str(raw: &str, decimals: u8) -> Result<Self, String> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("not a base-10 integer: {raw:?}"));
        }
        let raw = U256::from_str_radix(raw, 10).map_err(|e| format!("{raw}: {e}"))?;
        Ok(Self::new(raw, decimals))
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Lossy conversion for fiat arithmetic at the display boundary.
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units(self.raw, self.decimals))
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Format an integer amount as a decimal string with full precision.
///
/// Trailing fractional zeros are dropped; nothing else is rounded.
pub fn format_units(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        return whole.to_string();
    }

    let decimal_str = format!(
        "{:0>width$}",
        remainder.to_string(),
        width = decimals as usize
    );
    let trimmed = decimal_str.trim_end_matches('0');
    format!("{whole}.{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_units_evm_scale() {
        let one_avax = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(format_units(one_avax, 18), "1");

        let half = U256::from(500_000_000_000_000_000u64);
        assert_eq!(format_units(half, 18), "0.5");

        // No truncation of the fractional part.
        let precise = U256::from(1_234_567_890_123_456_789u64);
        assert_eq!(format_units(precise, 18), "1.234567890123456789");

        let one_wei = U256::from(1u64);
        assert_eq!(format_units(one_wei, 18), "0.000000000000000001");

        assert_eq!(format_units(U256::ZERO, 18), "0");
    }

    #[test]
    fn test_format_units_beyond_f64_integer_range() {
        // 2^53 + 1 wei does not survive a round trip through f64.
        let amount = TokenAmount::from_decimal_str("9007199254740993", 18).unwrap();
        assert_eq!(amount.to_string(), "0.009007199254740993");

        let whale = TokenAmount::from_decimal_str("123456789012345678901234567890", 18).unwrap();
        assert_eq!(whale.to_string(), "123456789012.34567890123456789");
    }

    #[test]
    fn test_format_units_avalanche_scale() {
        let amount = TokenAmount::from_decimal_str("1500000000", 9).unwrap();
        assert_eq!(amount.to_string(), "1.5");

        let amount = TokenAmount::from_decimal_str("1", 9).unwrap();
        assert_eq!(amount.to_string(), "0.000000001");

        let amount = TokenAmount::from_decimal_str("9007199254740991", 9).unwrap();
        assert_eq!(amount.to_string(), "9007199.254740991");
    }

    #[test]
    fn test_from_decimal_str_rejects_garbage() {
        assert!(TokenAmount::from_decimal_str("", 9).is_err());
        assert!(TokenAmount::from_decimal_str("12a", 9).is_err());
        assert!(TokenAmount::from_decimal_str("-5", 9).is_err());
        assert!(TokenAmount::from_decimal_str("0x10", 18).is_err());
        assert!(TokenAmount::from_decimal_str("1.5", 9).is_err());
    }

    #[test]
    fn test_to_f64() {
        let amount = TokenAmount::from_decimal_str("10000000000000000000", 18).unwrap();
        assert_eq!(amount.to_f64(), 10.0);
    }

    #[test]
    fn test_chain_key_round_trip_and_tabs() {
        for key in ChainKey::ALL {
            assert_eq!(key.as_str().parse::<ChainKey>().unwrap(), key);
        }
        assert!("solana".parse::<ChainKey>().is_err());

        assert_eq!(ChainKey::PChain.network_tab(), ChainKey::AvalancheFuji);
        assert_eq!(ChainKey::XChain.network_tab(), ChainKey::AvalancheFuji);
        assert_eq!(ChainKey::Sepolia.network_tab(), ChainKey::Sepolia);

        assert_eq!(ChainKey::PChain.family().decimals(), 9);
        assert_eq!(ChainKey::Echo.family().decimals(), 18);
        assert_eq!(ChainKey::XChain.family().address_prefix(), Some("X-"));
    }

    #[test]
    fn test_endpoint_table_follows_mode() {
        let testnet = EndpointTable::for_mode(NetworkMode::Testnet);
        let mainnet = EndpointTable::for_mode(NetworkMode::Mainnet);

        assert_eq!(testnet.iter().count(), ChainKey::ALL.len());
        assert_eq!(
            testnet.get(ChainKey::Sepolia).unwrap().rpc_url,
            ETH_SEPOLIA_RPC
        );
        assert_eq!(
            mainnet.get(ChainKey::Sepolia).unwrap().rpc_url,
            ETH_MAINNET_RPC
        );
        assert_eq!(
            mainnet.get(ChainKey::PChain).unwrap().rpc_url,
            AVAX_P_MAINNET_RPC
        );
        // Subnets are mode-independent.
        assert_eq!(
            testnet.get(ChainKey::Dexalot),
            mainnet.get(ChainKey::Dexalot)
        );
    }

    #[test]
    fn test_endpoint_override() {
        let table = EndpointTable::for_mode(NetworkMode::Testnet)
            .with_override(ChainKey::Echo, "http://localhost:9650/ext/bc/echo/rpc");
        assert_eq!(
            table.get(ChainKey::Echo).unwrap().rpc_url,
            "http://localhost:9650/ext/bc/echo/rpc"
        );
        assert_eq!(table.iter().count(), ChainKey::ALL.len());
    }

    #[test]
    fn test_network_mode_parse() {
        assert_eq!("MAINNET".parse::<NetworkMode>().unwrap(), NetworkMode::Mainnet);
        assert_eq!(" testnet ".parse::<NetworkMode>().unwrap(), NetworkMode::Testnet);
        assert!("devnet".parse::<NetworkMode>().is_err());
    }
}
