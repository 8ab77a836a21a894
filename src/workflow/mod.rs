//! Maker-checker workflow for sensitive employee mutations.
//!
//! Writes to compensation, banking, and statutory-identifier fields are
//! never applied directly: they are recorded as pending change requests
//! and applied only when a different privileged actor approves them. This
//! keeps any single manager from both proposing and silently applying a
//! change to another employee's pay.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{EngineError, EngineResult};
use crate::models::{ChangeStatus, ReviewDecision, SensitiveChange, SensitiveChangeRequest};
use crate::store::PayrollStore;

/// Drives the sensitive-change request lifecycle against the store.
#[derive(Clone)]
pub struct ChangeWorkflow {
    store: Arc<PayrollStore>,
}

impl ChangeWorkflow {
    /// Creates a workflow over the given store.
    pub fn new(store: Arc<PayrollStore>) -> Self {
        Self { store }
    }

    /// Records a pending change request against an employee in the
    /// caller's organization. The target is not mutated.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidInput`] when the reason is blank or no
    ///   changes are proposed.
    /// - [`EngineError::DuplicatePendingChange`] when a pending request
    ///   already targets the employee.
    pub fn propose(
        &self,
        ctx: &AuthContext,
        employee_id: &str,
        changes: Vec<SensitiveChange>,
        reason: &str,
    ) -> EngineResult<SensitiveChangeRequest> {
        ctx.require_privileged("propose sensitive changes")?;
        if reason.trim().is_empty() {
            return Err(EngineError::InvalidInput {
                field: "reason".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if changes.is_empty() {
            return Err(EngineError::InvalidInput {
                field: "changes".to_string(),
                message: "must propose at least one change".to_string(),
            });
        }

        // Confirms the target exists and belongs to the caller's org.
        self.store.get_employee(&ctx.org_id, employee_id)?;

        let request = SensitiveChangeRequest {
            id: Uuid::new_v4(),
            org_id: ctx.org_id.clone(),
            employee_id: employee_id.to_string(),
            changes,
            proposed_by: ctx.user_id.clone(),
            reason: reason.to_string(),
            status: ChangeStatus::Pending,
            reviewed_by: None,
            rejection_reason: None,
            created_at: Utc::now(),
        };
        self.store.insert_change(request.clone())?;

        info!(
            request_id = %request.id,
            employee_id = %request.employee_id,
            proposed_by = %request.proposed_by,
            "Sensitive change proposed"
        );
        Ok(request)
    }

    /// Reviews a pending request. Approval applies the proposed changes
    /// to the target atomically with the status transition; rejection
    /// records the reason and leaves the target untouched. The reviewer
    /// must differ from the proposer.
    pub fn review(
        &self,
        ctx: &AuthContext,
        request_id: Uuid,
        decision: ReviewDecision,
    ) -> EngineResult<SensitiveChangeRequest> {
        ctx.require_privileged("review sensitive changes")?;

        let reviewed = self
            .store
            .review_change(request_id, &ctx.org_id, &ctx.user_id, decision)?;
        info!(
            request_id = %reviewed.id,
            employee_id = %reviewed.employee_id,
            reviewed_by = %ctx.user_id,
            status = reviewed.status.as_str(),
            "Sensitive change reviewed"
        );
        Ok(reviewed)
    }

    /// Pending requests visible to the caller: privileged roles see all
    /// pending requests in their organization, others only their own
    /// proposals.
    pub fn list_pending(&self, ctx: &AuthContext) -> Vec<SensitiveChangeRequest> {
        let pending = self.store.pending_changes(&ctx.org_id);
        if ctx.role.is_privileged() {
            pending
        } else {
            pending
                .into_iter()
                .filter(|request| request.proposed_by == ctx.user_id)
                .collect()
        }
    }
}
