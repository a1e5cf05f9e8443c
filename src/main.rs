// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::env;
use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use relational_portfolio::blockchain::ChainBalanceReader;
use relational_portfolio::config::{PortfolioConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV};
use relational_portfolio::controller::PortfolioController;
use relational_portfolio::providers::PriceIndexReader;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr; stdout carries the portfolio view.
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match PortfolioConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(
        mode = %config.network_mode,
        filter = %config.filter,
        evm_address = %config.wallet.evm,
        bech32_address = %config.wallet.bech32,
        timeout_secs = config.request_timeout.map(|t| t.as_secs()),
        "Loading portfolio"
    );

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let balances = ChainBalanceReader::new(config.request_timeout);
    let prices = PriceIndexReader::new(config.price_api_url.clone(), config.request_timeout)
        .with_api_key(config.coingecko_api_key.clone());

    let mut controller =
        PortfolioController::new(balances, prices, config.endpoints.clone(), config.wallet.clone());
    controller.activate(config.network_mode);

    while !controller.session().is_settled() {
        tokio::select! {
            _ = shutdown.cancelled() => {
                warn!(
                    pending = controller.session().pending(),
                    "Interrupted before all balances arrived"
                );
                break;
            }
            outcome = controller.next_update() => {
                if outcome.is_none() {
                    break;
                }
                let total = controller.session().total(config.filter);
                info!(
                    total = total.value,
                    partial = total.partial,
                    pending = controller.session().pending(),
                    "Portfolio total updated"
                );
            }
        }
    }

    let view = controller.view(config.filter);
    match serde_json::to_string_pretty(&view) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to serialize portfolio view");
            ExitCode::FAILURE
        }
    }
}
