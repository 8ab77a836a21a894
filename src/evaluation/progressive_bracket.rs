//! Progressive bracket rule evaluation.
//!
//! Standard marginal-bracket integration: each bracket taxes only the
//! slice of income that falls inside it, at that bracket's rate.

use rust_decimal::Decimal;

use crate::models::RateBracket;

/// Computes the raw amount for a `progressive_bracket` rule.
///
/// Brackets are treated as contiguous and ordered lowest-first: the slice
/// taxed by bracket `i` runs from the previous bracket's upper bound to
/// `min(base, max_i)`, so adjacent brackets declared as `[0, 24000]` and
/// `[24001, 32333]` integrate without losing the unit between them. A
/// bracket with `max = None` extends to infinity.
///
/// Returns `None` when the base falls inside no bracket (including an
/// empty bracket list). Callers must surface that as a configuration
/// error rather than defaulting to zero, since silent zero would misstate
/// a paycheck.
///
/// # Examples
///
/// ```
/// use payroll_engine::evaluation::progressive_bracket_amount;
/// use payroll_engine::models::RateBracket;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let brackets = vec![
///     RateBracket { min: dec("0"), max: Some(dec("24000")), rate: dec("0.10") },
///     RateBracket { min: dec("24001"), max: Some(dec("32333")), rate: dec("0.25") },
///     RateBracket { min: dec("32334"), max: None, rate: dec("0.30") },
/// ];
///
/// // 24000 * 0.10 + (30000 - 24000) * 0.25 = 2400 + 1500
/// let tax = progressive_bracket_amount(dec("30000"), &brackets).unwrap();
/// assert_eq!(tax, dec("3900.00"));
/// ```
pub fn progressive_bracket_amount(base: Decimal, brackets: &[RateBracket]) -> Option<Decimal> {
    let first = brackets.first()?;

    let covered = brackets
        .iter()
        .any(|b| b.min <= base && b.max.is_none_or(|max| base <= max));
    if !covered {
        return None;
    }

    let mut total = Decimal::ZERO;
    let mut lower = first.min;
    for bracket in brackets {
        let upper = bracket.max.unwrap_or(base);
        let taxed_to = base.min(upper);
        if taxed_to > lower {
            total += bracket.rate * (taxed_to - lower);
        }
        if base <= upper {
            break;
        }
        lower = upper;
    }

    Some(total)
}
