//! Statutory tax rule model.
//!
//! A [`TaxRule`] is one deduction or contribution definition within a
//! region. The numeric behavior of a rule is a closed sum type
//! ([`RuleKind`]) with one evaluation function per variant, so an unknown
//! rule shape is unrepresentable rather than a runtime surprise.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The base figure a rule is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleBasis {
    /// The employee's gross salary, unaffected by prior deductions.
    Gross,
    /// The running taxable base, after deductible contributions evaluated
    /// earlier in the ordering have been subtracted.
    Taxable,
}

/// Which side of the ledger a rule posts to.
///
/// A single rule row posts exactly one line. A statutory scheme where the
/// employer mirrors the employee contribution is expressed as two paired
/// rule rows, keeping each row's numeric output unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSide {
    /// Posts a deduction line and reduces net pay.
    Employee,
    /// Posts an employer-contribution line; never affects the taxable base
    /// or net pay.
    Employer,
}

/// A marginal rate bracket for progressive income tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBracket {
    /// Lower bound of the bracket (inclusive).
    pub min: Decimal,
    /// Upper bound of the bracket (inclusive). `None` extends to infinity.
    pub max: Option<Decimal>,
    /// Marginal rate applied to income inside this bracket.
    pub rate: Decimal,
}

/// A fixed-amount tier keyed by the base falling inside its range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedTier {
    /// Lower bound of the tier (inclusive).
    pub min: Decimal,
    /// Upper bound of the tier (inclusive). `None` is the open-ended top tier.
    pub max: Option<Decimal>,
    /// The fixed amount posted when the base falls in this tier.
    pub amount: Decimal,
}

/// The numeric behavior of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    /// `base * rate`.
    Percentage {
        /// Rate as a decimal fraction (0.06 means 6%).
        rate: Decimal,
    },
    /// `min(base * rate, cap)`.
    CappedPercentage {
        /// Rate as a decimal fraction.
        rate: Decimal,
        /// Upper bound on the computed amount.
        cap: Decimal,
    },
    /// Standard marginal-bracket integration over ordered brackets.
    ProgressiveBracket {
        /// Ordered brackets, lowest first.
        brackets: Vec<RateBracket>,
    },
    /// The fixed amount of the single tier containing the base.
    TieredFixed {
        /// Ordered tiers, lowest first.
        tiers: Vec<FixedTier>,
    },
}

/// A versioned, region-scoped statutory rule row.
///
/// Within a region, rules are evaluated strictly by ascending [`order`].
/// A rule with `applies_to = Taxable` must be ordered after every
/// deductible rule that reduces the taxable base; the engine trusts
/// `order` to encode this and does not infer the dependency.
///
/// Rule rows referenced by a finalized run are immutable. Changes take
/// effect as new rows with a later [`effective_from`], never as in-place
/// edits to historical rows.
///
/// [`order`]: TaxRule::order
/// [`effective_from`]: TaxRule::effective_from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRule {
    /// The region this rule belongs to.
    pub region_code: String,
    /// Rule code, unique within the region (e.g., "paye", "nssf_tier1").
    pub code: String,
    /// Human-readable rule name shown on slip lines.
    pub name: String,
    /// The numeric behavior of the rule.
    #[serde(flatten)]
    pub kind: RuleKind,
    /// The base figure the rule is computed against.
    pub applies_to: RuleBasis,
    /// Which side of the ledger the rule posts to.
    pub side: RuleSide,
    /// Whether the posted employee deduction is subtracted from the taxable
    /// base for subsequent rules (pension/NSSF-class contributions).
    #[serde(default)]
    pub reduces_taxable_base: bool,
    /// Whether the region's flat personal relief is subtracted from this
    /// rule's line (the income-tax line), floored at zero.
    #[serde(default)]
    pub grants_personal_relief: bool,
    /// Inactive rules are silently skipped during evaluation.
    pub is_active: bool,
    /// Evaluation sequence within the region, ascending.
    pub order: u32,
    /// The rule applies to runs dated on or after this date.
    pub effective_from: NaiveDate,
}

impl TaxRule {
    /// Returns true if the rule is active and effective on `as_of`.
    ///
    /// Inactive or not-yet-effective rules are skipped during evaluation,
    /// not treated as errors.
    pub fn is_effective(&self, as_of: NaiveDate) -> bool {
        self.is_active && self.effective_from <= as_of
    }
}
