//! Salary slip model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One itemized deduction or employer-contribution line on a slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlipLine {
    /// The rule code that produced this line.
    pub code: String,
    /// Human-readable line name (e.g., "PAYE", "NSSF Tier I").
    pub name: String,
    /// Line amount, rounded to 2 decimal places.
    pub amount: Decimal,
}

/// One employee's computed pay breakdown within a run.
///
/// The employee display fields are denormalized at computation time, not
/// live-joined, so historical slips remain stable if the org structure
/// later changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalarySlip {
    /// Unique slip identifier.
    pub id: Uuid,
    /// The run this slip belongs to. One slip per (run, employee).
    pub run_id: Uuid,
    /// The employee this slip is for.
    pub employee_id: String,
    /// Employee display name at computation time.
    pub employee_name: String,
    /// Designation at computation time.
    pub designation: String,
    /// Department at computation time.
    pub department: String,
    /// Monthly basic salary used in the computation.
    pub basic_salary: Decimal,
    /// Basic salary plus all allowance components.
    pub gross_salary: Decimal,
    /// `gross_salary` minus the sum of deduction lines.
    pub net_salary: Decimal,
    /// Employee deduction lines, in rule evaluation order.
    pub deductions: Vec<SlipLine>,
    /// Employer contribution lines; never affect net pay.
    pub employer_contributions: Vec<SlipLine>,
}

impl SalarySlip {
    /// Sum of the employee deduction lines.
    pub fn total_deductions(&self) -> Decimal {
        self.deductions.iter().map(|line| line.amount).sum()
    }
}
