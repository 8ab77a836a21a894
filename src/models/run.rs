//! Payroll run model and lifecycle states.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a payroll run.
///
/// A run is created in `Draft`. Processing flips it to the transient
/// `Processing` marker and back to `Draft` when the rebuilt slip set has
/// been persisted, so a human must explicitly finalize. `Completed` is
/// terminal: the run and its slips become immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Mutable; may be processed, finalized, or deleted.
    Draft,
    /// A recomputation is currently in flight.
    Processing,
    /// Finalized; immutable, no further transitions.
    Completed,
}

impl RunStatus {
    /// Stable lowercase label used in state-transition error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Draft => "draft",
            RunStatus::Processing => "processing",
            RunStatus::Completed => "completed",
        }
    }
}

/// One payroll computation cycle for an organization and period.
///
/// The totals are aggregates over the run's slips, denormalized here for
/// reporting. A run is unique per (org, month, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique run identifier.
    pub id: Uuid,
    /// Owning organization.
    pub org_id: String,
    /// Payroll month (1-12).
    pub month: u32,
    /// Payroll year.
    pub year: i32,
    /// Current lifecycle state.
    pub status: RunStatus,
    /// When the run was created.
    pub run_date: DateTime<Utc>,
    /// Number of employees with a slip in the run.
    pub employee_count: u32,
    /// Sum of slip gross salaries (already-rounded lines, no re-rounding).
    pub total_gross_pay: Decimal,
    /// Sum of slip net salaries.
    pub total_net_pay: Decimal,
}
