// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Portfolio - Multi-chain balance and price aggregation
//!
//! Reads native balances for one wallet from Avalanche (C-Chain, P-Chain,
//! X-Chain and subnets) and Ethereum, prices them against a USD price index
//! and aggregates the result into a filtered portfolio view.
//!
//! ## Modules
//!
//! - `blockchain` - Chain endpoints, balance reader, fixed-point amounts
//! - `providers` - USD price index (CoinGecko) with static fallback
//! - `portfolio` - Holdings, fiat valuation, totals and formatting
//! - `session` - Portfolio state guarded by fetch-cycle generation
//! - `controller` - Concurrent fetch cycles driving a session
//! - `config` - Environment configuration

pub mod blockchain;
pub mod config;
pub mod controller;
pub mod error;
pub mod portfolio;
pub mod providers;
pub mod session;
