//! Monetary rounding semantics.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a slip line amount to 2 decimal places using round-half-up.
///
/// Every line is rounded individually; aggregates sum already-rounded
/// lines with no re-rounding, so slip line items reconcile by hand.
///
/// # Examples
///
/// ```
/// use payroll_engine::evaluation::round_line;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let raw = Decimal::from_str("1499.755").unwrap();
/// assert_eq!(round_line(raw), Decimal::from_str("1499.76").unwrap());
/// ```
pub fn round_line(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
