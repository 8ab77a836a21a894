//! Employee snapshot and compensation models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One salary component paid on top of basic salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceComponent {
    /// Component code from the organization's salary configuration
    /// (e.g., "house", "transport").
    pub code: String,
    /// Human-readable component name.
    pub name: String,
    /// Monthly amount for this component.
    pub amount: Decimal,
}

/// An employee's current compensation assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Allowance components resolved from the organization's salary
    /// configuration.
    #[serde(default)]
    pub allowances: Vec<AllowanceComponent>,
}

impl Compensation {
    /// Gross monthly salary: basic plus all allowance components.
    pub fn gross(&self) -> Decimal {
        self.basic_salary + self.allowances.iter().map(|a| a.amount).sum::<Decimal>()
    }
}

/// A point-in-time view of an employee as read from the directory.
///
/// `compensation` is `None` for employees who have never been assigned a
/// salary; such employees are skipped from payroll runs with a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSnapshot {
    /// Unique employee identifier.
    pub employee_id: String,
    /// Display name, denormalized onto slips at computation time.
    pub name: String,
    /// Department name at computation time.
    pub department: String,
    /// Designation (job title) at computation time.
    pub designation: String,
    /// Current compensation assignment, if any.
    pub compensation: Option<Compensation>,
    /// Inactive employees are excluded from payroll runs.
    pub is_active: bool,
}
