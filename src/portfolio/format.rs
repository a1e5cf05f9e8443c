// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Display formatting for fiat amounts and balances.

use crate::blockchain::TokenAmount;

/// Placeholder shown while a balance is unknown.
pub const UNKNOWN_BALANCE: &str = "…";

/// Format a per-holding USD value.
///
/// Values that are at least 1000 after rounding to cents are shown as whole
/// units with thousands separators; smaller values keep exactly two
/// fractional digits. `999.999` therefore renders as `1,000`.
pub fn format_fiat(value: f64) -> String {
    let (sign, magnitude) = split_sign(value);
    let cents = (magnitude * 100.0).round();

    if cents >= 100_000.0 {
        let whole = magnitude.round() as u128;
        format!("{sign}{}", group_thousands(whole))
    } else {
        let cents = cents as u128;
        format!("{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

/// Format a portfolio total: always two fractional digits, grouped.
pub fn format_total(value: f64) -> String {
    let (sign, magnitude) = split_sign(value);
    let cents = (magnitude * 100.0).round() as u128;
    format!("{sign}{}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Format a native balance with four fractional digits, or the unknown
/// placeholder.
pub fn format_balance(amount: Option<&TokenAmount>) -> String {
    match amount {
        Some(amount) => format!("{:.4}", amount.to_f64()),
        None => UNKNOWN_BALANCE.to_string(),
    }
}

fn split_sign(value: f64) -> (&'static str, f64) {
    if value < 0.0 {
        ("-", -value)
    } else {
        ("", value)
    }
}

/// `1234567` -> `1,234,567`.
fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fiat_below_one_thousand_has_cents() {
        assert_eq!(format_fiat(999.99), "999.99");
        assert_eq!(format_fiat(91.9), "91.90");
        assert_eq!(format_fiat(0.0), "0.00");
        assert_eq!(format_fiat(0.005), "0.01");
        assert_eq!(format_fiat(25.0), "25.00");
    }

    #[test]
    fn fiat_rounding_crosses_into_whole_units() {
        assert_eq!(format_fiat(999.999), "1,000");
    }

    #[test]
    fn fiat_at_or_above_one_thousand_is_whole() {
        assert_eq!(format_fiat(1000.0), "1,000");
        assert_eq!(format_fiat(3961.44), "3,961");
        assert_eq!(format_fiat(1234.5), "1,235");
        assert_eq!(format_fiat(1_234_567.89), "1,234,568");
    }

    #[test]
    fn totals_keep_two_digits() {
        assert_eq!(format_total(4053.34), "4,053.34");
        assert_eq!(format_total(91.9), "91.90");
        assert_eq!(format_total(0.0), "0.00");
        assert_eq!(format_total(1_000_000.0), "1,000,000.00");
    }

    #[test]
    fn balances_show_four_digits() {
        let amount = TokenAmount::from_decimal_str("1234567890123456789", 18).unwrap();
        assert_eq!(format_balance(Some(&amount)), "1.2346");
        assert_eq!(format_balance(None), "…");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(123456789), "123,456,789");
    }
}
