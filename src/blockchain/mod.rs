// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration for native balance queries.
//!
//! This module provides functionality for:
//! - Querying native balances on EVM chains (Avalanche C-Chain, Ethereum, subnets)
//! - Querying AVAX balances on the Avalanche P-Chain and X-Chain
//! - Converting smallest-unit integers to exact decimal strings

pub mod avalanche;
pub mod client;
pub mod types;

pub use client::{BalanceSource, ChainBalanceReader};
pub use types::*;
