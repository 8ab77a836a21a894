//! Flat percentage rule evaluation.

use rust_decimal::Decimal;

/// Computes the raw amount for a `percentage` rule: `base * rate`.
///
/// # Examples
///
/// ```
/// use payroll_engine::evaluation::percentage_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let base = Decimal::from_str("70000").unwrap();
/// let rate = Decimal::from_str("0.015").unwrap();
/// assert_eq!(percentage_amount(base, rate), Decimal::from_str("1050.000").unwrap());
/// ```
pub fn percentage_amount(base: Decimal, rate: Decimal) -> Decimal {
    base * rate
}
