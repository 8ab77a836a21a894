//! Configuration file structures.
//!
//! Strongly-typed shapes deserialized from the YAML files in a
//! configuration directory.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{RuleBasis, RuleKind, RuleSide, TaxRule};

/// `region.yaml`: one tax region's identity and relief.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionFile {
    /// Unique region code (e.g., "KE").
    pub code: String,
    /// Human-readable region name.
    pub name: String,
    /// ISO currency code.
    pub currency: String,
    /// Flat monthly personal relief credited against the income-tax line.
    pub personal_relief: Decimal,
    /// Whether the region is available for payroll runs.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// One rule row in `rules.yaml`. The region code is implied by the
/// directory the file lives in.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    /// Rule code, unique within the region.
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
    /// Whether the deduction reduces the taxable base for later rules.
    #[serde(default)]
    pub reduces_taxable_base: bool,
    /// Whether the region's personal relief is applied to this line.
    #[serde(default)]
    pub grants_personal_relief: bool,
    /// Inactive rules are skipped during evaluation.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Evaluation sequence within the region, ascending.
    pub order: u32,
    /// The rule applies to runs dated on or after this date.
    pub effective_from: NaiveDate,
}

impl RuleEntry {
    /// Binds the entry to its region, producing a rule row.
    pub fn into_rule(self, region_code: &str) -> TaxRule {
        TaxRule {
            region_code: region_code.to_string(),
            code: self.code,
            name: self.name,
            kind: self.kind,
            applies_to: self.applies_to,
            side: self.side,
            reduces_taxable_base: self.reduces_taxable_base,
            grants_personal_relief: self.grants_personal_relief,
            is_active: self.is_active,
            order: self.order,
            effective_from: self.effective_from,
        }
    }
}

/// `rules.yaml`: a region's rule rows.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesFile {
    /// The rule rows, in no particular order; evaluation order comes from
    /// each row's `order` field.
    pub rules: Vec<RuleEntry>,
}

/// One salary component the organization pays on top of basic salary.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentDef {
    /// Display name used on compensation records and slips.
    pub name: String,
}

/// `salary_components.yaml`: the organization's allowance components.
#[derive(Debug, Clone, Deserialize)]
pub struct SalaryComponentsFile {
    /// Map of component code to its definition.
    pub components: BTreeMap<String, ComponentDef>,
}

fn default_true() -> bool {
    true
}
