// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Portfolio Controller
//!
//! Runs fetch cycles for a [`PortfolioSession`].
//!
//! ## Strategy
//!
//! A cycle starts on activation and again on every network mode change:
//! 1. The session bumps its generation and resets every balance to unknown.
//! 2. One task per holding queries its chain; one more task fetches prices.
//!    Tasks are independent, so a failing or hanging endpoint only affects
//!    its own holding.
//! 3. Each task sends its result, tagged with the generation, over a channel.
//!    The controller is the only owner of the session and applies results one
//!    at a time, so no locking is needed. Results from superseded cycles are
//!    dropped by the session.
//!
//! Views are derived from the session after any number of results, so the
//! portfolio can be rendered while a cycle is still in flight.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::blockchain::{BalanceSource, NetworkMode};
use crate::config::ModeEndpoints;
use crate::error::BalanceError;
use crate::portfolio::{ChainFilter, PortfolioView, WalletAddresses};
use crate::providers::PriceFeed;
use crate::session::{ApplyOutcome, CycleEvent, CycleUpdate, PortfolioSession};

/// Drives fetch cycles and owns the resulting portfolio state.
pub struct PortfolioController<B, P> {
    session: PortfolioSession,
    balances: Arc<B>,
    prices: Arc<P>,
    endpoints: ModeEndpoints,
    updates_tx: mpsc::UnboundedSender<CycleUpdate>,
    updates_rx: mpsc::UnboundedReceiver<CycleUpdate>,
}

impl<B: BalanceSource, P: PriceFeed> PortfolioController<B, P> {
    pub fn new(balances: B, prices: P, endpoints: ModeEndpoints, wallet: WalletAddresses) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            session: PortfolioSession::new(wallet),
            balances: Arc::new(balances),
            prices: Arc::new(prices),
            endpoints,
            updates_tx,
            updates_rx,
        }
    }

    /// Start a full fetch cycle for `mode` and return its generation.
    pub fn activate(&mut self, mode: NetworkMode) -> u64 {
        let generation = self.session.begin_cycle(mode);
        info!(
            generation,
            mode = %mode,
            holdings = self.session.holdings().len(),
            "Starting portfolio fetch cycle"
        );
        self.spawn_cycle(generation, mode);
        generation
    }

    /// Switch network mode. Starts a new cycle unless `mode` is already the
    /// active one.
    pub fn set_network_mode(&mut self, mode: NetworkMode) -> Option<u64> {
        if self.session.generation() > 0 && self.session.mode() == mode {
            return None;
        }
        Some(self.activate(mode))
    }

    fn spawn_cycle(&self, generation: u64, mode: NetworkMode) {
        let endpoints = self.endpoints.for_mode(mode);

        for holding in self.session.holdings() {
            let chain = holding.chain;
            let tx = self.updates_tx.clone();

            let Some(endpoint) = endpoints.get(chain).cloned() else {
                let result = Err(BalanceError::InvalidRpcUrl(format!(
                    "no endpoint configured for {chain} on {mode}"
                )));
                let _ = tx.send(CycleUpdate {
                    generation,
                    event: CycleEvent::Balance { chain, result },
                });
                continue;
            };

            let balances = Arc::clone(&self.balances);
            let address = holding.address.clone();
            tokio::spawn(async move {
                let result = balances.fetch_balance(&address, &endpoint).await;
                // The receiver lives as long as the controller.
                let _ = tx.send(CycleUpdate {
                    generation,
                    event: CycleEvent::Balance { chain, result },
                });
            });
        }

        let prices = Arc::clone(&self.prices);
        let tx = self.updates_tx.clone();
        tokio::spawn(async move {
            let snapshot = prices.fetch_prices().await;
            let _ = tx.send(CycleUpdate {
                generation,
                event: CycleEvent::Prices(snapshot),
            });
        });
    }

    /// Wait for the next fetch result and apply it.
    pub async fn next_update(&mut self) -> Option<ApplyOutcome> {
        let update = self.updates_rx.recv().await?;
        let outcome = self.session.apply(update);
        if outcome != ApplyOutcome::Stale {
            debug!(
                generation = self.session.generation(),
                pending = self.session.pending(),
                "Portfolio updated"
            );
        }
        Some(outcome)
    }

    /// Apply results until the current cycle has fully settled.
    pub async fn run_until_settled(&mut self) {
        while !self.session.is_settled() {
            if self.next_update().await.is_none() {
                return;
            }
        }
    }

    pub fn session(&self) -> &PortfolioSession {
        &self.session
    }

    pub fn view(&self, filter: ChainFilter) -> PortfolioView {
        self.session.view(filter)
    }
}
