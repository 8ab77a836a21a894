//! Ordered rule evaluation driver.
//!
//! Turns a compensation snapshot and a region's rule set into itemized
//! deduction and employer-contribution lines plus net pay. This is a pure
//! function with no side effects, safe to call concurrently across
//! employees within one run.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Compensation, RuleBasis, RuleKind, RuleSide, SlipLine, TaxRegion, TaxRule};

use super::{
    capped_percentage_amount, percentage_amount, progressive_bracket_amount, round_line,
    tiered_fixed_amount,
};

/// The itemized result of evaluating a rule set against one compensation
/// snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Basic salary plus all allowance components.
    pub gross_salary: Decimal,
    /// Employee deduction lines, in rule evaluation order.
    pub deductions: Vec<SlipLine>,
    /// Employer contribution lines, in rule evaluation order.
    pub employer_contributions: Vec<SlipLine>,
    /// `gross_salary` minus the sum of deduction lines.
    pub net_salary: Decimal,
}

/// Evaluates a region's ordered rule set against a compensation snapshot.
///
/// Semantics:
/// - Inactive and not-yet-effective rules are silently skipped.
/// - Rules run in ascending `order`. The caller's ordering encodes the
///   dependency that taxable-base rules come after the deductible
///   contributions that reduce the base; the engine does not infer it.
/// - Each line is rounded to 2 decimal places (round-half-up) before it is
///   appended or subtracted from the running taxable base, so aggregates
///   are sums of already-rounded lines.
/// - After all rules, the region's personal relief is subtracted from the
///   relief-granting line (the income-tax line), floored at zero.
/// - Employer lines never affect the taxable base or net pay.
///
/// # Errors
///
/// Returns [`EngineError::RuleConfiguration`] when a bracket or tier rule
/// has no coverage for its base. Silent zero would misstate a paycheck.
pub fn evaluate(
    compensation: &Compensation,
    region: &TaxRegion,
    rules: &[TaxRule],
    as_of: NaiveDate,
) -> EngineResult<Evaluation> {
    let gross_salary = compensation.gross();

    let mut ordered: Vec<&TaxRule> = rules.iter().filter(|r| r.is_effective(as_of)).collect();
    ordered.sort_by_key(|r| r.order);

    let mut deductions: Vec<SlipLine> = Vec::new();
    let mut employer_contributions: Vec<SlipLine> = Vec::new();
    let mut relief_line_indexes: Vec<usize> = Vec::new();
    let mut taxable_base = gross_salary;

    for rule in ordered {
        let base = match rule.applies_to {
            RuleBasis::Gross => gross_salary,
            RuleBasis::Taxable => taxable_base,
        };

        let raw = raw_amount(rule, base)?;
        let amount = round_line(raw);
        let line = SlipLine {
            code: rule.code.clone(),
            name: rule.name.clone(),
            amount,
        };

        match rule.side {
            RuleSide::Employee => {
                if rule.grants_personal_relief {
                    relief_line_indexes.push(deductions.len());
                }
                if rule.reduces_taxable_base {
                    taxable_base -= amount;
                }
                deductions.push(line);
            }
            RuleSide::Employer => employer_contributions.push(line),
        }
    }

    // Relief reduces the tax line itself, never the aggregate, and never
    // drives the line below zero.
    for index in relief_line_indexes {
        let line = &mut deductions[index];
        line.amount = (line.amount - region.personal_relief).max(Decimal::ZERO);
    }

    let total_deductions: Decimal = deductions.iter().map(|line| line.amount).sum();
    let net_salary = gross_salary - total_deductions;

    Ok(Evaluation {
        gross_salary,
        deductions,
        employer_contributions,
        net_salary,
    })
}

/// Dispatches to the per-kind amount function, surfacing missing bracket
/// or tier coverage as a named configuration error.
fn raw_amount(rule: &TaxRule, base: Decimal) -> EngineResult<Decimal> {
    match &rule.kind {
        RuleKind::Percentage { rate } => Ok(percentage_amount(base, *rate)),
        RuleKind::CappedPercentage { rate, cap } => Ok(capped_percentage_amount(base, *rate, *cap)),
        RuleKind::ProgressiveBracket { brackets } => progressive_bracket_amount(base, brackets)
            .ok_or_else(|| no_coverage(rule, base, "bracket")),
        RuleKind::TieredFixed { tiers } => {
            tiered_fixed_amount(base, tiers).ok_or_else(|| no_coverage(rule, base, "tier"))
        }
    }
}

fn no_coverage(rule: &TaxRule, base: Decimal, shape: &str) -> EngineError {
    EngineError::RuleConfiguration {
        region: rule.region_code.clone(),
        rule: rule.code.clone(),
        message: format!("no {shape} covers base {base}"),
    }
}
