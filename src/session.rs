// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Portfolio Session
//!
//! Owns the mutable portfolio state for one wallet: the holding list and the
//! latest price snapshot. Fetch results arrive as [`CycleUpdate`]s tagged with
//! the generation of the fetch cycle that produced them.
//!
//! ## Generation guard
//!
//! Every cycle start increments the generation and resets all balances to
//! unknown. Requests from a superseded cycle are not cancelled; their results
//! are dropped here when they arrive, so a slow response from an old network
//! mode can never overwrite the current one.

use tracing::{debug, warn};

use crate::blockchain::{ChainKey, NetworkMode, TokenAmount};
use crate::error::BalanceError;
use crate::portfolio::{
    default_holdings, portfolio_total, portfolio_view, ChainFilter, Holding, PortfolioTotal,
    PortfolioView, WalletAddresses,
};
use crate::providers::{PriceIndex, PriceSnapshot};

/// Result of one fetch task.
#[derive(Debug)]
pub enum CycleEvent {
    Balance {
        chain: ChainKey,
        result: Result<TokenAmount, BalanceError>,
    },
    Prices(PriceSnapshot),
}

/// A fetch result tagged with the cycle that requested it.
#[derive(Debug)]
pub struct CycleUpdate {
    pub generation: u64,
    pub event: CycleEvent,
}

/// What [`PortfolioSession::apply`] did with an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The update belongs to the current cycle and was recorded.
    Applied,
    /// The update belongs to the current cycle but its fetch failed; the
    /// holding stays unknown.
    Failed,
    /// The update belongs to a superseded cycle and was dropped.
    Stale,
}

/// Single-owner portfolio state.
#[derive(Debug)]
pub struct PortfolioSession {
    wallet: WalletAddresses,
    mode: NetworkMode,
    generation: u64,
    holdings: Vec<Holding>,
    prices: Option<PriceSnapshot>,
    /// Results still expected for the current generation
    pending: usize,
}

impl PortfolioSession {
    /// Create an idle session. No cycle runs until [`begin_cycle`](Self::begin_cycle).
    pub fn new(wallet: WalletAddresses) -> Self {
        let mode = NetworkMode::default();
        Self {
            holdings: default_holdings(&wallet, mode),
            wallet,
            mode,
            generation: 0,
            prices: None,
            pending: 0,
        }
    }

    /// Start a new fetch cycle for `mode` and return its generation.
    ///
    /// All balances go back to unknown. The previous price snapshot is kept
    /// until the new cycle's prices arrive.
    pub fn begin_cycle(&mut self, mode: NetworkMode) -> u64 {
        self.generation += 1;
        self.mode = mode;
        self.holdings = default_holdings(&self.wallet, mode);
        // one balance per holding plus the price index
        self.pending = self.holdings.len() + 1;
        self.generation
    }

    /// Record a fetch result if it belongs to the current cycle.
    pub fn apply(&mut self, update: CycleUpdate) -> ApplyOutcome {
        if update.generation != self.generation {
            debug!(
                update_generation = update.generation,
                current_generation = self.generation,
                "Dropping result from superseded fetch cycle"
            );
            return ApplyOutcome::Stale;
        }

        self.pending = self.pending.saturating_sub(1);

        match update.event {
            CycleEvent::Balance {
                chain,
                result: Ok(amount),
            } => {
                for holding in self.holdings.iter_mut().filter(|h| h.chain == chain) {
                    holding.raw_balance = Some(amount);
                }
                debug!(chain = %chain, balance = %amount, generation = self.generation, "Balance updated");
                ApplyOutcome::Applied
            }
            CycleEvent::Balance {
                chain,
                result: Err(e),
            } => {
                warn!(chain = %chain, error = %e, generation = self.generation, "Balance fetch failed");
                ApplyOutcome::Failed
            }
            CycleEvent::Prices(snapshot) => {
                debug!(
                    origin = ?snapshot.origin,
                    prices = snapshot.prices.len(),
                    generation = self.generation,
                    "Price index updated"
                );
                self.prices = Some(snapshot);
                ApplyOutcome::Applied
            }
        }
    }

    /// Every result of the current cycle has arrived.
    pub fn is_settled(&self) -> bool {
        self.pending == 0
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> NetworkMode {
        self.mode
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn price_snapshot(&self) -> Option<&PriceSnapshot> {
        self.prices.as_ref()
    }

    pub fn prices(&self) -> Option<&PriceIndex> {
        self.prices.as_ref().map(|s| &s.prices)
    }

    pub fn total(&self, filter: ChainFilter) -> PortfolioTotal {
        portfolio_total(&self.holdings, self.prices(), filter)
    }

    pub fn view(&self, filter: ChainFilter) -> PortfolioView {
        portfolio_view(&self.holdings, self.prices.as_ref(), filter)
    }
}
