// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! CoinGecko simple-price integration for the USD price index.
//!
//! One batched `GET /simple/price?ids=...&vs_currencies=usd` per fetch cycle.
//! When the request fails the reader answers with a static fallback table,
//! so a settled snapshot always has a price for every tracked identifier.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PriceError;

pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Header carrying the optional CoinGecko demo key.
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

pub const AVAX_PRICE_ID: &str = "avalanche-2";
pub const ETH_PRICE_ID: &str = "ethereum";
pub const USDC_PRICE_ID: &str = "usd-coin";
pub const JOE_PRICE_ID: &str = "trader-joe-2";

/// Identifiers requested from the price service.
pub const TRACKED_PRICE_IDS: [&str; 4] = [AVAX_PRICE_ID, ETH_PRICE_ID, USDC_PRICE_ID, JOE_PRICE_ID];

/// Snapshot served when the price service is unreachable.
pub const FALLBACK_PRICES: &[(&str, f64)] = &[
    (AVAX_PRICE_ID, 9.19),
    (ETH_PRICE_ID, 1980.72),
    (USDC_PRICE_ID, 1.0),
    (JOE_PRICE_ID, 0.14),
];

/// USD unit price of one asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsdPrice {
    pub usd: f64,
}

/// Price identifier -> USD unit price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceIndex(HashMap<String, UsdPrice>);

impl PriceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        let mut index = Self::new();
        for (id, usd) in pairs {
            index.insert(*id, *usd);
        }
        index
    }

    pub fn insert(&mut self, id: impl Into<String>, usd: f64) {
        self.0.insert(id.into(), UsdPrice { usd });
    }

    /// USD price for `id`, if the index has one.
    pub fn usd(&self, id: &str) -> Option<f64> {
        self.0.get(id).map(|p| p.usd)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, p)| (id.as_str(), p.usd))
    }
}

/// Where a snapshot's prices came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceOrigin {
    Live,
    /// Live response with tracked ids filled in from the fallback table
    Mixed,
    Fallback,
}

/// A complete price index as returned by one fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSnapshot {
    pub prices: PriceIndex,
    pub origin: PriceOrigin,
    pub fetched_at: DateTime<Utc>,
}

/// Source of price snapshots. Never fails: degraded fetches still resolve.
pub trait PriceFeed: Send + Sync + 'static {
    fn fetch_prices(&self) -> impl Future<Output = PriceSnapshot> + Send;
}

/// Entry as returned by the service; unknown ids come back as `{}`.
#[derive(Debug, Deserialize)]
struct RawPrice {
    #[serde(default)]
    usd: Option<f64>,
}

/// Price index reader backed by the CoinGecko simple-price endpoint.
#[derive(Debug, Clone)]
pub struct PriceIndexReader {
    http: reqwest::Client,
    url: String,
    ids: Vec<String>,
    fallback: PriceIndex,
    api_key: Option<String>,
}

impl PriceIndexReader {
    /// Create a reader for `url` tracking [`TRACKED_PRICE_IDS`] with the
    /// built-in [`FALLBACK_PRICES`].
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }

        let http = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to build price HTTP client, using defaults without timeout");
            reqwest::Client::new()
        });

        Self {
            http,
            url: url.into(),
            ids: TRACKED_PRICE_IDS.iter().map(|id| id.to_string()).collect(),
            fallback: PriceIndex::from_pairs(FALLBACK_PRICES),
            api_key: None,
        }
    }

    /// Replace the static fallback table.
    pub fn with_fallback(mut self, fallback: PriceIndex) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Fetch the price index, falling back to the static table on any failure.
    pub async fn fetch_prices(&self) -> PriceSnapshot {
        match self.fetch_live().await {
            Ok(prices) => {
                let (prices, completed) = self.complete_from_fallback(prices);
                PriceSnapshot {
                    prices,
                    origin: if completed {
                        PriceOrigin::Mixed
                    } else {
                        PriceOrigin::Live
                    },
                    fetched_at: Utc::now(),
                }
            }
            Err(e) => {
                warn!(error = %e, "Price fetch failed, using fallback prices");
                self.fallback_snapshot()
            }
        }
    }

    /// The static snapshot served when the service is unavailable.
    pub fn fallback_snapshot(&self) -> PriceSnapshot {
        PriceSnapshot {
            prices: self.fallback.clone(),
            origin: PriceOrigin::Fallback,
            fetched_at: Utc::now(),
        }
    }

    async fn fetch_live(&self) -> Result<PriceIndex, PriceError> {
        debug!(url = %self.url, ids = self.ids.len(), "Fetching USD prices");

        let mut request = self
            .http
            .get(&self.url)
            .query(&[("ids", self.ids.join(",")), ("vs_currencies", "usd".to_string())]);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PriceError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PriceError::HttpStatus(response.status()));
        }

        let raw: HashMap<String, RawPrice> = response
            .json()
            .await
            .map_err(|e| PriceError::InvalidResponse(e.to_string()))?;

        let mut prices = PriceIndex::new();
        for (id, entry) in raw {
            match entry.usd {
                Some(usd) if usd.is_finite() && usd >= 0.0 => prices.insert(id, usd),
                other => debug!(id = %id, usd = ?other, "Ignoring unusable price entry"),
            }
        }

        // Rate limiting answers 200 with a `status` object and no prices.
        if !self.ids.iter().any(|id| prices.contains(id)) {
            return Err(PriceError::InvalidResponse(
                "no tracked id was priced".to_string(),
            ));
        }

        Ok(prices)
    }

    /// Fill tracked ids the live response did not price. Returns whether
    /// any entry came from the fallback table.
    fn complete_from_fallback(&self, mut prices: PriceIndex) -> (PriceIndex, bool) {
        let mut completed = false;
        for id in &self.ids {
            if prices.contains(id) {
                continue;
            }
            if let Some(usd) = self.fallback.usd(id) {
                debug!(id = %id, "Live prices missing id, using fallback entry");
                prices.insert(id.clone(), usd);
                completed = true;
            }
        }
        (prices, completed)
    }
}

impl PriceFeed for PriceIndexReader {
    fn fetch_prices(&self) -> impl Future<Output = PriceSnapshot> + Send {
        PriceIndexReader::fetch_prices(self)
    }
}
