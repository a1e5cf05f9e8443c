// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! External data providers.

pub mod coingecko;

pub use coingecko::{
    PriceFeed, PriceIndex, PriceIndexReader, PriceOrigin, PriceSnapshot, UsdPrice,
    DEFAULT_PRICE_API_URL, FALLBACK_PRICES, TRACKED_PRICE_IDS,
};
