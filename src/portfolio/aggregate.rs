// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fiat valuation and filtered portfolio totals.
//!
//! Everything here is a pure function of borrowed holdings and an optional
//! price index. Nothing is mutated, so the view can be recomputed after
//! every individual fetch completion.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::format::{format_balance, format_fiat, format_total};
use super::holding::Holding;
use crate::blockchain::{ChainKey, TokenAmount};
use crate::providers::{PriceIndex, PriceOrigin, PriceSnapshot};

/// USD value of `raw_balance` at the indexed price of `price_id`.
///
/// `None` when the index is not loaded yet, the balance is unknown, or the
/// index has no entry for `price_id`.
pub fn fiat_value(
    price_id: &str,
    raw_balance: Option<&TokenAmount>,
    prices: Option<&PriceIndex>,
) -> Option<f64> {
    let prices = prices?;
    let balance = raw_balance?;
    let usd = prices.usd(price_id)?;
    Some(balance.to_f64() * usd)
}

impl Holding {
    /// USD value of this holding.
    ///
    /// Untracked holdings never get a live value; they report their static
    /// fiat amount when one is configured.
    pub fn fiat_value(&self, prices: Option<&PriceIndex>) -> Option<f64> {
        match &self.price_id {
            Some(id) => fiat_value(id, self.raw_balance.as_ref(), prices),
            None => self.static_fiat,
        }
    }
}

/// Network selector of the portfolio view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainFilter {
    #[default]
    All,
    Chain(ChainKey),
}

impl ChainFilter {
    /// A chain filter selects holdings on that chain and holdings listed
    /// under it as their network tab.
    pub fn matches(&self, holding: &Holding) -> bool {
        match self {
            ChainFilter::All => true,
            ChainFilter::Chain(key) => holding.chain == *key || holding.chain.network_tab() == *key,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChainFilter::All => "All Chains",
            ChainFilter::Chain(ChainKey::AvalancheFuji) => "Avax Fuji",
            ChainFilter::Chain(ChainKey::Sepolia) => "Sepolia",
            ChainFilter::Chain(ChainKey::Echo) => "Echo",
            ChainFilter::Chain(ChainKey::Dispatch) => "Dispatch",
            ChainFilter::Chain(ChainKey::Dexalot) => "Dexalot",
            ChainFilter::Chain(ChainKey::PChain) => "P-Chain",
            ChainFilter::Chain(ChainKey::XChain) => "X-Chain",
        }
    }
}

impl fmt::Display for ChainFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainFilter::All => f.write_str("all"),
            ChainFilter::Chain(key) => write!(f, "{key}"),
        }
    }
}

impl FromStr for ChainFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(ChainFilter::All);
        }
        s.parse::<ChainKey>().map(ChainFilter::Chain)
    }
}

/// Best-effort sum of the known USD values under one filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioTotal {
    /// Sum of available values; unavailable values count as zero
    pub value: f64,
    /// A tracked holding in the filter has no value yet
    pub partial: bool,
    /// Holdings selected by the filter
    pub holdings: usize,
}

/// Sum the USD value of every holding selected by `filter`.
///
/// Untracked holdings without a static value contribute zero and do not
/// mark the total as partial.
pub fn portfolio_total(
    holdings: &[Holding],
    prices: Option<&PriceIndex>,
    filter: ChainFilter,
) -> PortfolioTotal {
    holdings.iter().filter(|h| filter.matches(h)).fold(
        PortfolioTotal {
            value: 0.0,
            partial: false,
            holdings: 0,
        },
        |mut total, holding| {
            match holding.fiat_value(prices) {
                Some(value) => total.value += value,
                None if holding.is_tracked() => total.partial = true,
                None => {}
            }
            total.holdings += 1;
            total
        },
    )
}

/// One rendered balance line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingLine {
    pub name: String,
    pub symbol: String,
    pub chain: ChainKey,
    pub chain_label: String,
    pub balance: String,
    /// Formatted USD value; `None` renders as unavailable
    pub fiat: Option<String>,
}

/// Derived portfolio state for one filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioView {
    pub filter: String,
    pub filter_label: &'static str,
    /// The price index has not arrived yet
    pub loading: bool,
    pub total: PortfolioTotal,
    /// Formatted total; `None` while loading
    pub total_display: Option<String>,
    /// Source of the prices behind the fiat values
    pub price_origin: Option<PriceOrigin>,
    pub prices_fetched_at: Option<DateTime<Utc>>,
    pub lines: Vec<HoldingLine>,
}

/// Build the portfolio view from the current holdings and price snapshot.
pub fn portfolio_view(
    holdings: &[Holding],
    snapshot: Option<&PriceSnapshot>,
    filter: ChainFilter,
) -> PortfolioView {
    let prices = snapshot.map(|s| &s.prices);
    let total = portfolio_total(holdings, prices, filter);
    let lines = holdings
        .iter()
        .filter(|h| filter.matches(h))
        .map(|h| HoldingLine {
            name: h.name.clone(),
            symbol: h.symbol.clone(),
            chain: h.chain,
            chain_label: h.chain_label.clone(),
            balance: format_balance(h.raw_balance.as_ref()),
            fiat: h.fiat_value(prices).map(format_fiat),
        })
        .collect();

    PortfolioView {
        filter: filter.to_string(),
        filter_label: filter.label(),
        loading: prices.is_none(),
        total,
        total_display: prices.map(|_| format_total(total.value)),
        price_origin: snapshot.map(|s| s.origin),
        prices_fetched_at: snapshot.map(|s| s.fetched_at),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::NetworkMode;
    use crate::portfolio::holding::{default_holdings, WalletAddresses};
    use crate::providers::coingecko::{AVAX_PRICE_ID, ETH_PRICE_ID};

    fn amount(decimal_units: u64) -> TokenAmount {
        // whole units in wei
        TokenAmount::from_decimal_str(&format!("{decimal_units}000000000000000000"), 18).unwrap()
    }

    fn index() -> PriceIndex {
        PriceIndex::from_pairs(&[(AVAX_PRICE_ID, 9.19), (ETH_PRICE_ID, 1980.72)])
    }

    fn scenario() -> Vec<Holding> {
        vec![
            Holding::new("Avalanche", "AVAX", ChainKey::AvalancheFuji, "Avalanche Fuji", "0x1")
                .priced_by(AVAX_PRICE_ID)
                .with_balance(amount(10)),
            Holding::new("Ethereum", "ETH", ChainKey::Sepolia, "Sepolia Testnet", "0x1")
                .priced_by(ETH_PRICE_ID)
                .with_balance(amount(2)),
        ]
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fiat_value_multiplies_balance_by_price() {
        let prices = PriceIndex::from_pairs(&[("id", 2.5)]);
        assert_eq!(fiat_value("id", Some(&amount(10)), Some(&prices)), Some(25.0));
    }

    #[test]
    fn fiat_value_unavailable_cases() {
        let prices = index();
        assert_eq!(fiat_value(AVAX_PRICE_ID, None, Some(&prices)), None);
        assert_eq!(fiat_value(AVAX_PRICE_ID, Some(&amount(1)), None), None);
        assert_eq!(fiat_value("solana", Some(&amount(1)), Some(&prices)), None);
    }

    #[test]
    fn untracked_holding_uses_static_value_only() {
        let prices = index();
        let bare = Holding::new("Echo", "ECHO", ChainKey::Echo, "Dexalot Echo", "0x1")
            .with_balance(amount(100));
        assert_eq!(bare.fiat_value(Some(&prices)), None);

        let fixed = bare.clone().with_static_fiat(12.5);
        assert_eq!(fixed.fiat_value(Some(&prices)), Some(12.5));
        assert_eq!(fixed.fiat_value(None), Some(12.5));
    }

    #[test]
    fn filtered_totals() {
        let holdings = scenario();
        let prices = index();

        let fuji = portfolio_total(&holdings, Some(&prices), ChainFilter::Chain(ChainKey::AvalancheFuji));
        assert!(approx(fuji.value, 91.90));
        assert_eq!(format_total(fuji.value), "91.90");
        assert!(!fuji.partial);
        assert_eq!(fuji.holdings, 1);

        let all = portfolio_total(&holdings, Some(&prices), ChainFilter::All);
        assert!(approx(all.value, 4053.34));
        assert_eq!(format_total(all.value), "4,053.34");
        assert_eq!(all.holdings, 2);
    }

    #[test]
    fn unknown_balances_mark_total_partial() {
        let mut holdings = scenario();
        holdings[1].raw_balance = None;
        let prices = index();

        let total = portfolio_total(&holdings, Some(&prices), ChainFilter::All);
        assert!(approx(total.value, 91.90));
        assert!(total.partial);

        let not_loaded = portfolio_total(&holdings, None, ChainFilter::All);
        assert_eq!(not_loaded.value, 0.0);
        assert!(not_loaded.partial);
    }

    #[test]
    fn untracked_holdings_do_not_mark_partial() {
        let mut holdings = scenario();
        holdings.push(Holding::new("Dexalot", "ALOT", ChainKey::Dexalot, "Dexalot Subnet", "0x1"));
        let prices = index();

        let total = portfolio_total(&holdings, Some(&prices), ChainFilter::All);
        assert!(approx(total.value, 4053.34));
        assert!(!total.partial);
        assert_eq!(total.holdings, 3);
    }

    #[test]
    fn avalanche_tab_includes_platform_and_exchange_chains() {
        let holdings = default_holdings(&WalletAddresses::default(), NetworkMode::Testnet);

        let tab: Vec<_> = holdings
            .iter()
            .filter(|h| ChainFilter::Chain(ChainKey::AvalancheFuji).matches(h))
            .map(|h| h.chain)
            .collect();
        assert_eq!(tab, vec![ChainKey::AvalancheFuji, ChainKey::PChain, ChainKey::XChain]);

        let only_p: Vec<_> = holdings
            .iter()
            .filter(|h| ChainFilter::Chain(ChainKey::PChain).matches(h))
            .map(|h| h.chain)
            .collect();
        assert_eq!(only_p, vec![ChainKey::PChain]);
    }

    #[test]
    fn filter_parsing() {
        assert_eq!("all".parse::<ChainFilter>().unwrap(), ChainFilter::All);
        assert_eq!(
            "sepolia".parse::<ChainFilter>().unwrap(),
            ChainFilter::Chain(ChainKey::Sepolia)
        );
        assert!("polygon".parse::<ChainFilter>().is_err());
        assert_eq!(ChainFilter::Chain(ChainKey::Echo).to_string(), "echo");
    }

    #[test]
    fn view_reports_loading_until_prices_arrive() {
        let holdings = scenario();

        let loading = portfolio_view(&holdings, None, ChainFilter::All);
        assert!(loading.loading);
        assert_eq!(loading.total_display, None);
        assert!(loading.lines.iter().all(|l| l.fiat.is_none()));
        assert_eq!(loading.lines[0].balance, "10.0000");

        assert_eq!(loading.price_origin, None);

        let snapshot = PriceSnapshot {
            prices: index(),
            origin: PriceOrigin::Live,
            fetched_at: Utc::now(),
        };
        let view = portfolio_view(&holdings, Some(&snapshot), ChainFilter::All);
        assert!(!view.loading);
        assert_eq!(view.price_origin, Some(PriceOrigin::Live));
        assert_eq!(view.prices_fetched_at, Some(snapshot.fetched_at));
        assert_eq!(view.total_display.as_deref(), Some("4,053.34"));
        assert_eq!(view.lines[0].fiat.as_deref(), Some("91.90"));
        assert_eq!(view.lines[1].fiat.as_deref(), Some("3,961"));
        assert_eq!(view.filter, "all");
        assert_eq!(view.filter_label, "All Chains");
    }
}
