//! Authorization context consulted before privileged state transitions.
//!
//! The run orchestrator and the sensitive-change workflow check the caller's
//! role and organization up front; the state machines themselves stay
//! role-agnostic so they can be tested without any auth layer.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The caller's role within their organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A regular employee; may only read their own payslips and propose
    /// nothing.
    Employee,
    /// HR manager; may run payroll and review sensitive changes.
    HrManager,
    /// Organization administrator; same payroll privileges as HR manager.
    OrgAdmin,
}

impl Role {
    /// Whether this role may drive run transitions and review changes.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::HrManager | Role::OrgAdmin)
    }
}

/// The authenticated caller, as resolved by the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthContext {
    /// The caller's organization.
    pub org_id: String,
    /// The caller's user id.
    pub user_id: String,
    /// The caller's role.
    pub role: Role,
}

impl AuthContext {
    /// Errors unless the caller holds a privileged role.
    pub fn require_privileged(&self, action: &str) -> EngineResult<()> {
        if self.role.is_privileged() {
            Ok(())
        } else {
            Err(EngineError::unauthorized(format!(
                "role does not permit {action}"
            )))
        }
    }

    /// Errors unless the caller belongs to `org_id`.
    pub fn require_org(&self, org_id: &str) -> EngineResult<()> {
        if self.org_id == org_id {
            Ok(())
        } else {
            Err(EngineError::unauthorized(
                "resource belongs to another organization",
            ))
        }
    }
}
