// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC envelope for the Avalanche platform (P) and exchange (X) chains.
//!
//! ```text
//! platform.getBalance  {"addresses": ["P-<bech32>"]}
//! avm.getBalance       {"address": "X-<bech32>", "assetID": "AVAX"}
//! -> {"result": {"balance": "<nAVAX integer>", ...}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::types::ChainFamily;
use crate::error::BalanceError;

pub const PLATFORM_GET_BALANCE: &str = "platform.getBalance";
pub const AVM_GET_BALANCE: &str = "avm.getBalance";

/// Asset queried on the X-Chain.
const AVAX_ASSET_ID: &str = "AVAX";

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<BalanceResult>,
    #[serde(default)]
    error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct BalanceResult {
    balance: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorBody {
    code: i64,
    message: String,
}

/// Prefix a bare bech32 address with the chain alias.
///
/// Addresses that already carry the alias are returned unchanged.
pub fn chain_address(family: ChainFamily, bare: &str) -> Result<String, BalanceError> {
    let bare = bare.trim();
    let prefix = family
        .address_prefix()
        .ok_or_else(|| BalanceError::InvalidAddress(format!("{bare} is not a P/X chain address")))?;

    let bare = bare.strip_prefix(prefix).unwrap_or(bare);
    if bare.is_empty() || !bare.contains('1') || bare.contains(char::is_whitespace) {
        return Err(BalanceError::InvalidAddress(bare.to_string()));
    }

    Ok(format!("{prefix}{bare}"))
}

/// Build the balance request for a P or X chain address.
pub fn balance_request(family: ChainFamily, address: &str) -> Result<JsonRpcRequest<'static>, BalanceError> {
    let (method, params) = match family {
        ChainFamily::AvalanchePlatform => (PLATFORM_GET_BALANCE, json!({ "addresses": [address] })),
        ChainFamily::AvalancheExchange => (
            AVM_GET_BALANCE,
            json!({ "address": address, "assetID": AVAX_ASSET_ID }),
        ),
        ChainFamily::Evm => {
            return Err(BalanceError::InvalidAddress(format!(
                "{address}: EVM chains are not queried through the Avalanche API"
            )))
        }
    };

    Ok(JsonRpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method,
        params,
    })
}

/// Extract the integer balance string from a response body.
pub fn parse_balance_response(body: &[u8]) -> Result<String, BalanceError> {
    let response: JsonRpcResponse = serde_json::from_slice(body)
        .map_err(|e| BalanceError::MalformedResponse(e.to_string()))?;

    if let Some(err) = response.error {
        return Err(BalanceError::Rpc(format!("{} (code {})", err.message, err.code)));
    }

    response
        .result
        .map(|r| r.balance)
        .ok_or_else(|| BalanceError::MalformedResponse("missing result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_address_prefixes_once() {
        let bare = "fuji1w4zlzvd54vsjz3a8yxkks5tpjk88nl27uw3xgh";
        assert_eq!(
            chain_address(ChainFamily::AvalanchePlatform, bare).unwrap(),
            format!("P-{bare}")
        );
        assert_eq!(
            chain_address(ChainFamily::AvalancheExchange, &format!("X-{bare}")).unwrap(),
            format!("X-{bare}")
        );
        assert!(chain_address(ChainFamily::AvalancheExchange, "").is_err());
        assert!(chain_address(ChainFamily::Evm, bare).is_err());
    }

    #[test]
    fn platform_request_shape() {
        let req = balance_request(ChainFamily::AvalanchePlatform, "P-fuji1abc").unwrap();
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["method"], "platform.getBalance");
        assert_eq!(value["params"]["addresses"][0], "P-fuji1abc");
        assert_eq!(value["jsonrpc"], "2.0");
    }

    #[test]
    fn avm_request_shape() {
        let req = balance_request(ChainFamily::AvalancheExchange, "X-fuji1abc").unwrap();
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["method"], "avm.getBalance");
        assert_eq!(value["params"]["address"], "X-fuji1abc");
        assert_eq!(value["params"]["assetID"], "AVAX");
    }

    #[test]
    fn parse_balance_response_variants() {
        let ok = br#"{"jsonrpc":"2.0","id":1,"result":{"balance":"2500000000","unlocked":"2500000000"}}"#;
        assert_eq!(parse_balance_response(ok).unwrap(), "2500000000");

        let err = br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"couldn't parse address"}}"#;
        assert!(matches!(parse_balance_response(err), Err(BalanceError::Rpc(_))));

        let missing = br#"{"jsonrpc":"2.0","id":1}"#;
        assert!(matches!(
            parse_balance_response(missing),
            Err(BalanceError::MalformedResponse(_))
        ));

        assert!(matches!(
            parse_balance_response(b"<html>bad gateway</html>"),
            Err(BalanceError::MalformedResponse(_))
        ));
    }
}
