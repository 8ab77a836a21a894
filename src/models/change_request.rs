//! Sensitive-change request model (maker-checker workflow).
//!
//! Compensation and statutory-identifier fields are high-blast-radius, so
//! every write to them is redirected through a pending change request that
//! a different privileged actor must approve. The set of fields that can be
//! proposed is a closed sum type ([`SensitiveChange`]), so an invalid target
//! field is a type error rather than a runtime surprise.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AllowanceComponent;

/// Statutory identifier schemes an employee can be enrolled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatutoryScheme {
    /// National tax authority PIN.
    TaxPin,
    /// National social security fund member number.
    SocialSecurity,
    /// National hospital insurance member number.
    HealthInsurance,
}

/// One proposed mutation of a protected employee field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum SensitiveChange {
    /// Replace the employee's monthly basic salary.
    BasicSalary {
        /// The proposed new basic salary.
        amount: Decimal,
    },
    /// Replace the employee's allowance component list.
    Allowances {
        /// The proposed new component list.
        components: Vec<AllowanceComponent>,
    },
    /// Replace the employee's bank account details.
    BankAccount {
        /// Bank name.
        bank_name: String,
        /// Account number at the bank.
        account_number: String,
    },
    /// Replace one of the employee's statutory identifiers.
    StatutoryId {
        /// Which statutory scheme the identifier belongs to.
        scheme: StatutoryScheme,
        /// The proposed identifier value.
        value: String,
    },
}

/// Review lifecycle state of a change request. Both review outcomes are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// Awaiting review.
    Pending,
    /// Approved and applied to the target employee.
    Approved,
    /// Rejected; the target was never mutated.
    Rejected,
}

impl ChangeStatus {
    /// Stable lowercase label used in state-transition error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Pending => "pending",
            ChangeStatus::Approved => "approved",
            ChangeStatus::Rejected => "rejected",
        }
    }
}

/// A reviewer's verdict on a pending request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ReviewDecision {
    /// Apply the proposed changes and mark the request approved.
    Approve,
    /// Mark the request rejected without touching the target.
    Reject {
        /// Mandatory explanation persisted on the request.
        rejection_reason: String,
    },
}

/// A pending or reviewed proposal to mutate protected employee fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitiveChangeRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// Organization scope of the request.
    pub org_id: String,
    /// The employee whose record the changes target.
    pub employee_id: String,
    /// The proposed field mutations.
    pub changes: Vec<SensitiveChange>,
    /// The user who proposed the change. Never equal to `reviewed_by`.
    pub proposed_by: String,
    /// Mandatory free-text justification.
    pub reason: String,
    /// Review lifecycle state.
    pub status: ChangeStatus,
    /// The user who reviewed the request, once reviewed.
    pub reviewed_by: Option<String>,
    /// Mandatory explanation when the request was rejected.
    pub rejection_reason: Option<String>,
    /// When the request was proposed.
    pub created_at: DateTime<Utc>,
}
