//! Utility functions for formatting and common operations
//!
//! Centralized formatting for prices and percentages so the text report,
//! the email body and the CLI tables render numbers identically.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 decimal places, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a price as dollars with exactly 2 decimals: "$1234.50"
///
/// # Examples
/// ```
/// use stockwatch::utils::format_price;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_price(dec!(140)), "$140.00");
/// assert_eq!(format_price(dec!(0.125)), "$0.13");
/// ```
pub fn format_price(value: Decimal) -> String {
    format!("${:.2}", round2(value))
}

/// Format a percentage with an explicit sign and exactly 2 decimals.
///
/// Values that round to zero are always rendered as `+0.00%`.
///
/// # Examples
/// ```
/// use stockwatch::utils::format_signed_percent;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_signed_percent(dec!(3.14159)), "+3.14%");
/// assert_eq!(format_signed_percent(dec!(-1.02)), "-1.02%");
/// assert_eq!(format_signed_percent(dec!(-0.001)), "+0.00%");
/// ```
pub fn format_signed_percent(value: Decimal) -> String {
    let rounded = round2(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        '-'
    } else {
        '+'
    };
    format!("{}{:.2}%", sign, rounded.abs())
}

/// First `max` characters of `s` (not bytes, judgments often start with an emoji).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
