//! Request types for the payroll engine API.

use serde::{Deserialize, Serialize};

use crate::models::SensitiveChange;

/// Request body for `POST /runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunRequest {
    /// Payroll month (1-12).
    pub month: u32,
    /// Payroll year.
    pub year: i32,
}

/// Request body for `POST /changes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposeChangeRequest {
    /// The employee whose protected fields the changes target.
    pub employee_id: String,
    /// The proposed field mutations.
    pub changes: Vec<SensitiveChange>,
    /// Mandatory free-text justification.
    pub reason: String,
}
