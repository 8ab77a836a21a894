//! Capped percentage rule evaluation.

use rust_decimal::Decimal;

/// Computes the raw amount for a `capped_percentage` rule:
/// `min(base * rate, cap)`.
///
/// Used for contribution schemes with a statutory ceiling, such as NSSF
/// Tier I (6% capped at 420).
///
/// # Examples
///
/// ```
/// use payroll_engine::evaluation::capped_percentage_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rate = Decimal::from_str("0.06").unwrap();
/// let cap = Decimal::from_str("420").unwrap();
///
/// // 6% of 10000 is 600, capped at 420.
/// let base = Decimal::from_str("10000").unwrap();
/// assert_eq!(capped_percentage_amount(base, rate, cap), cap);
///
/// // 6% of 5000 is 300, under the cap.
/// let base = Decimal::from_str("5000").unwrap();
/// assert_eq!(capped_percentage_amount(base, rate, cap), Decimal::from_str("300.00").unwrap());
/// ```
pub fn capped_percentage_amount(base: Decimal, rate: Decimal, cap: Decimal) -> Decimal {
    (base * rate).min(cap)
}
