//! Payslip assembly.
//!
//! Builds one employee's salary slip by resolving the compensation
//! snapshot, delegating to the rule evaluator, and denormalizing the
//! employee display fields at build time. Pure value construction: the
//! run orchestrator owns persistence so a run's slips are written
//! transactionally as a set.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::evaluation::evaluate;
use crate::models::{EmployeeSnapshot, SalarySlip, TaxRegion, TaxRule};

/// Builds a salary slip for one employee within a run.
///
/// The employee's name, department, and designation are copied onto the
/// slip at build time rather than joined at read time, so historical
/// slips remain stable if the org structure later changes.
///
/// # Errors
///
/// - [`EngineError::MissingCompensation`] when the employee has never
///   been assigned a salary. The orchestrator downgrades this to a
///   per-employee warning rather than failing the run.
/// - [`EngineError::RuleConfiguration`] from the evaluator, which is
///   fatal to the run.
pub fn build_slip(
    run_id: Uuid,
    employee: &EmployeeSnapshot,
    region: &TaxRegion,
    rules: &[TaxRule],
    as_of: NaiveDate,
) -> EngineResult<SalarySlip> {
    let compensation =
        employee
            .compensation
            .as_ref()
            .ok_or_else(|| EngineError::MissingCompensation {
                employee_id: employee.employee_id.clone(),
            })?;

    let evaluation = evaluate(compensation, region, rules, as_of)?;

    Ok(SalarySlip {
        id: Uuid::new_v4(),
        run_id,
        employee_id: employee.employee_id.clone(),
        employee_name: employee.name.clone(),
        designation: employee.designation.clone(),
        department: employee.department.clone(),
        basic_salary: compensation.basic_salary,
        gross_salary: evaluation.gross_salary,
        net_salary: evaluation.net_salary,
        deductions: evaluation.deductions,
        employer_contributions: evaluation.employer_contributions,
    })
}
