//! Domain models for the payroll engine.

mod change_request;
mod employee;
mod region;
mod rule;
mod run;
mod slip;

pub use change_request::{ChangeStatus, ReviewDecision, SensitiveChange, SensitiveChangeRequest, StatutoryScheme};
pub use employee::{AllowanceComponent, Compensation, EmployeeSnapshot};
pub use region::TaxRegion;
pub use rule::{FixedTier, RateBracket, RuleBasis, RuleKind, RuleSide, TaxRule};
pub use run::{PayrollRun, RunStatus};
pub use slip::{SalarySlip, SlipLine};
