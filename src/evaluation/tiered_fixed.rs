//! Tiered fixed-amount rule evaluation.

use rust_decimal::Decimal;

use crate::models::FixedTier;

/// Computes the raw amount for a `tiered_fixed` rule: the `amount` of the
/// single tier whose `[min, max]` range contains the base. A tier with
/// `max = None` is the open-ended top tier.
///
/// Returns `None` when no tier contains the base; callers must surface
/// that as a configuration error rather than defaulting to zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::evaluation::tiered_fixed_amount;
/// use payroll_engine::models::FixedTier;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let tiers = vec![
///     FixedTier { min: dec("0"), max: Some(dec("5999")), amount: dec("150") },
///     FixedTier { min: dec("6000"), max: Some(dec("7999")), amount: dec("300") },
///     FixedTier { min: dec("100000"), max: None, amount: dec("1700") },
/// ];
///
/// assert_eq!(tiered_fixed_amount(dec("7500"), &tiers), Some(dec("300")));
/// assert_eq!(tiered_fixed_amount(dec("120000"), &tiers), Some(dec("1700")));
/// ```
pub fn tiered_fixed_amount(base: Decimal, tiers: &[FixedTier]) -> Option<Decimal> {
    tiers
        .iter()
        .find(|tier| tier.min <= base && tier.max.is_none_or(|max| base <= max))
        .map(|tier| tier.amount)
}
