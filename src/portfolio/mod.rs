// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Portfolio aggregation: holdings, fiat valuation, filtering and display.

pub mod aggregate;
pub mod format;
pub mod holding;

pub use aggregate::{
    fiat_value, portfolio_total, portfolio_view, ChainFilter, HoldingLine, PortfolioTotal,
    PortfolioView,
};
pub use format::{format_balance, format_fiat, format_total};
pub use holding::{default_holdings, Holding, WalletAddresses};
