//! In-memory transactional payroll store.
//!
//! All mutable payroll state lives behind one `RwLock`, so every compound
//! operation (delete-then-rebuild of a run's slip set, approve-and-apply
//! of a change request) executes as a single bounded transaction. Status
//! preconditions are checked inside the same critical section that
//! mutates, which makes racing callers resolve to exactly one winner and
//! one stale-state loser.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    ChangeStatus, Compensation, EmployeeSnapshot, PayrollRun, ReviewDecision, RunStatus,
    SalarySlip, SensitiveChange, SensitiveChangeRequest, StatutoryScheme,
};

use super::RuleKey;

/// Organization settings consumed by the run orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgProfile {
    /// Organization identifier.
    pub org_id: String,
    /// The tax region the organization's payroll is computed under.
    pub region_code: String,
}

/// An employee row as persisted, including the protected fields that only
/// the sensitive-change workflow may mutate.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    /// Owning organization.
    pub org_id: String,
    /// Directory snapshot: identity, org placement, compensation.
    pub snapshot: EmployeeSnapshot,
    /// Bank name for salary disbursement.
    pub bank_name: Option<String>,
    /// Account number for salary disbursement.
    pub account_number: Option<String>,
    /// Statutory identifiers keyed by scheme.
    pub statutory_ids: HashMap<StatutoryScheme, String>,
}

#[derive(Debug)]
struct RunRecord {
    run: PayrollRun,
    /// Rule rows the last processing pass used; locked on finalize.
    used_rules: Vec<RuleKey>,
}

#[derive(Debug, Default)]
struct Inner {
    orgs: HashMap<String, OrgProfile>,
    employees: HashMap<String, EmployeeRecord>,
    runs: HashMap<Uuid, RunRecord>,
    period_index: HashMap<(String, u32, i32), Uuid>,
    slips: HashMap<Uuid, SalarySlip>,
    run_slips: HashMap<Uuid, Vec<Uuid>>,
    changes: HashMap<Uuid, SensitiveChangeRequest>,
}

/// The in-memory transactional store for runs, slips, employees, and
/// change requests.
#[derive(Debug, Default)]
pub struct PayrollStore {
    inner: RwLock<Inner>,
}

impl PayrollStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Organizations and employees ────────────────────────────────────

    /// Creates or replaces an organization profile.
    pub fn upsert_org(&self, profile: OrgProfile) {
        let mut inner = self.write();
        inner.orgs.insert(profile.org_id.clone(), profile);
    }

    /// Looks up an organization profile.
    pub fn get_org(&self, org_id: &str) -> EngineResult<OrgProfile> {
        let inner = self.read();
        inner
            .orgs
            .get(org_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("organization", org_id))
    }

    /// Creates or replaces an employee record.
    pub fn upsert_employee(&self, record: EmployeeRecord) {
        let mut inner = self.write();
        inner
            .employees
            .insert(record.snapshot.employee_id.clone(), record);
    }

    /// Looks up an employee record within an organization.
    pub fn get_employee(&self, org_id: &str, employee_id: &str) -> EngineResult<EmployeeRecord> {
        let inner = self.read();
        inner
            .employees
            .get(employee_id)
            .filter(|record| record.org_id == org_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("employee", employee_id))
    }

    /// Directory read: active employees of an organization, ordered by
    /// employee id for deterministic fan-out.
    pub fn list_active_employees(&self, org_id: &str) -> Vec<EmployeeSnapshot> {
        let inner = self.read();
        let mut snapshots: Vec<EmployeeSnapshot> = inner
            .employees
            .values()
            .filter(|record| record.org_id == org_id && record.snapshot.is_active)
            .map(|record| record.snapshot.clone())
            .collect();
        snapshots.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        snapshots
    }

    // ─── Payroll runs ───────────────────────────────────────────────────

    /// Creates a draft run for the organization and period.
    ///
    /// # Errors
    ///
    /// [`EngineError::RunAlreadyExists`] when the (org, month, year)
    /// period already has a run.
    pub fn create_run(&self, org_id: &str, month: u32, year: i32) -> EngineResult<PayrollRun> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidInput {
                field: "month".to_string(),
                message: format!("{month} is not a calendar month"),
            });
        }

        let mut inner = self.write();
        let key = (org_id.to_string(), month, year);
        if inner.period_index.contains_key(&key) {
            return Err(EngineError::RunAlreadyExists {
                org_id: org_id.to_string(),
                month,
                year,
            });
        }

        let run = PayrollRun {
            id: Uuid::new_v4(),
            org_id: org_id.to_string(),
            month,
            year,
            status: RunStatus::Draft,
            run_date: Utc::now(),
            employee_count: 0,
            total_gross_pay: Decimal::ZERO,
            total_net_pay: Decimal::ZERO,
        };
        inner.period_index.insert(key, run.id);
        inner.runs.insert(
            run.id,
            RunRecord {
                run: run.clone(),
                used_rules: Vec::new(),
            },
        );
        Ok(run)
    }

    /// Fetches a run by id.
    pub fn get_run(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        let inner = self.read();
        inner
            .runs
            .get(&run_id)
            .map(|record| record.run.clone())
            .ok_or_else(|| EngineError::not_found("run", run_id))
    }

    /// Marks a run as processing.
    ///
    /// Allowed from `Draft` (fresh recomputation) and from `Processing`
    /// (a concurrent recompute; last committed write wins). Rejected once
    /// `Completed`.
    pub fn begin_processing(&self, run_id: Uuid) -> EngineResult<PayrollRun> {
        let mut inner = self.write();
        let record = inner
            .runs
            .get_mut(&run_id)
            .ok_or_else(|| EngineError::not_found("run", run_id))?;

        if record.run.status == RunStatus::Completed {
            return Err(invalid_run_transition(record.run.status, "process"));
        }
        record.run.status = RunStatus::Processing;
        Ok(record.run.clone())
    }

    /// Atomically replaces the run's slip set and aggregates, then returns
    /// the run to `Draft`.
    ///
    /// Recomputation is destructive-then-rebuild: previous slips for the
    /// run are removed, never merged with. The swap happens in one
    /// critical section, so a concurrent reader sees either the old slip
    /// set or the new one, never a mixture.
    pub fn commit_run_slips(
        &self,
        run_id: Uuid,
        slips: Vec<SalarySlip>,
        used_rules: Vec<RuleKey>,
    ) -> EngineResult<PayrollRun> {
        let mut inner = self.write();

        let record = inner
            .runs
            .get_mut(&run_id)
            .ok_or_else(|| EngineError::not_found("run", run_id))?;
        if record.run.status == RunStatus::Completed {
            return Err(invalid_run_transition(record.run.status, "process"));
        }

        record.run.employee_count = slips.len() as u32;
        record.run.total_gross_pay = slips.iter().map(|s| s.gross_salary).sum();
        record.run.total_net_pay = slips.iter().map(|s| s.net_salary).sum();
        record.run.status = RunStatus::Draft;
        record.used_rules = used_rules;
        let run = record.run.clone();

        for slip_id in inner.run_slips.remove(&run_id).unwrap_or_default() {
            inner.slips.remove(&slip_id);
        }
        let slip_ids: Vec<Uuid> = slips.iter().map(|s| s.id).collect();
        for slip in slips {
            inner.slips.insert(slip.id, slip);
        }
        inner.run_slips.insert(run_id, slip_ids);

        Ok(run)
    }

    /// Returns a failed processing pass to `Draft`, leaving the prior
    /// slip set untouched.
    pub fn abort_processing(&self, run_id: Uuid) {
        let mut inner = self.write();
        if let Some(record) = inner.runs.get_mut(&run_id) {
            if record.run.status == RunStatus::Processing {
                record.run.status = RunStatus::Draft;
            }
        }
    }

    /// One-way transition to `Completed`.
    ///
    /// The precondition check shares the critical section with the
    /// transition, so of two racing callers exactly one observes `Draft`
    /// and wins; the loser gets a stale-state error. Returns the
    /// finalized run and the rule keys its slips were computed with.
    pub fn finalize_run(&self, run_id: Uuid) -> EngineResult<(PayrollRun, Vec<RuleKey>)> {
        let mut inner = self.write();

        let slip_count = inner.run_slips.get(&run_id).map_or(0, Vec::len);
        let record = inner
            .runs
            .get_mut(&run_id)
            .ok_or_else(|| EngineError::not_found("run", run_id))?;

        if record.run.status != RunStatus::Draft {
            return Err(invalid_run_transition(record.run.status, "finalize"));
        }
        if slip_count == 0 {
            return Err(EngineError::InvalidStateTransition {
                entity: "run".to_string(),
                current: "draft with no slips".to_string(),
                attempted: "finalize".to_string(),
            });
        }

        record.run.status = RunStatus::Completed;
        Ok((record.run.clone(), record.used_rules.clone()))
    }

    /// Deletes a run and all its slips. Rejected once `Completed`.
    pub fn delete_run(&self, run_id: Uuid) -> EngineResult<()> {
        let mut inner = self.write();

        let record = inner
            .runs
            .get(&run_id)
            .ok_or_else(|| EngineError::not_found("run", run_id))?;
        if record.run.status == RunStatus::Completed {
            return Err(invalid_run_transition(record.run.status, "delete"));
        }

        let key = (
            record.run.org_id.clone(),
            record.run.month,
            record.run.year,
        );
        inner.period_index.remove(&key);
        inner.runs.remove(&run_id);
        for slip_id in inner.run_slips.remove(&run_id).unwrap_or_default() {
            inner.slips.remove(&slip_id);
        }
        Ok(())
    }

    /// Returns a run's slips, ordered by employee id.
    pub fn run_slips(&self, run_id: Uuid) -> EngineResult<Vec<SalarySlip>> {
        let inner = self.read();
        if !inner.runs.contains_key(&run_id) {
            return Err(EngineError::not_found("run", run_id));
        }
        let mut slips: Vec<SalarySlip> = inner
            .run_slips
            .get(&run_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|slip_id| inner.slips.get(slip_id))
            .cloned()
            .collect();
        slips.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(slips)
    }

    /// Fetches a slip by id.
    pub fn get_slip(&self, slip_id: Uuid) -> EngineResult<SalarySlip> {
        let inner = self.read();
        inner
            .slips
            .get(&slip_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("slip", slip_id))
    }

    // ─── Sensitive change requests ──────────────────────────────────────

    /// Records a pending change request.
    ///
    /// # Errors
    ///
    /// [`EngineError::DuplicatePendingChange`] when a pending request
    /// already targets the same employee.
    pub fn insert_change(&self, request: SensitiveChangeRequest) -> EngineResult<()> {
        let mut inner = self.write();

        let duplicate = inner.changes.values().any(|existing| {
            existing.employee_id == request.employee_id
                && existing.status == ChangeStatus::Pending
        });
        if duplicate {
            return Err(EngineError::DuplicatePendingChange {
                employee_id: request.employee_id,
            });
        }

        inner.changes.insert(request.id, request);
        Ok(())
    }

    /// Fetches a change request by id.
    pub fn get_change(&self, request_id: Uuid) -> EngineResult<SensitiveChangeRequest> {
        let inner = self.read();
        inner
            .changes
            .get(&request_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("change request", request_id))
    }

    /// Reviews a pending request: approval applies the proposed changes
    /// to the employee record atomically with the status transition;
    /// rejection records the reason and never touches the target.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthorized`] when the reviewer proposed the
    ///   request themselves or belongs to another organization.
    /// - [`EngineError::InvalidStateTransition`] when the request is no
    ///   longer pending.
    pub fn review_change(
        &self,
        request_id: Uuid,
        reviewer_org: &str,
        reviewer_id: &str,
        decision: ReviewDecision,
    ) -> EngineResult<SensitiveChangeRequest> {
        let mut inner = self.write();

        let request = inner
            .changes
            .get(&request_id)
            .ok_or_else(|| EngineError::not_found("change request", request_id))?;

        if request.org_id != reviewer_org {
            return Err(EngineError::unauthorized(
                "change request belongs to another organization",
            ));
        }
        if request.status != ChangeStatus::Pending {
            return Err(EngineError::InvalidStateTransition {
                entity: "change request".to_string(),
                current: request.status.as_str().to_string(),
                attempted: "review".to_string(),
            });
        }
        if request.proposed_by == reviewer_id {
            return Err(EngineError::unauthorized(
                "proposer cannot review their own change request",
            ));
        }

        let employee_id = request.employee_id.clone();
        let changes = request.changes.clone();

        match decision {
            ReviewDecision::Approve => {
                // Apply-then-mark in one critical section: both succeed or
                // neither does.
                let record = inner
                    .employees
                    .get_mut(&employee_id)
                    .ok_or_else(|| EngineError::not_found("employee", &employee_id))?;
                for change in &changes {
                    apply_change(record, change);
                }
                let request = inner
                    .changes
                    .get_mut(&request_id)
                    .ok_or_else(|| EngineError::not_found("change request", request_id))?;
                request.status = ChangeStatus::Approved;
                request.reviewed_by = Some(reviewer_id.to_string());
                Ok(request.clone())
            }
            ReviewDecision::Reject { rejection_reason } => {
                if rejection_reason.trim().is_empty() {
                    return Err(EngineError::InvalidInput {
                        field: "rejection_reason".to_string(),
                        message: "must not be empty".to_string(),
                    });
                }
                let request = inner
                    .changes
                    .get_mut(&request_id)
                    .ok_or_else(|| EngineError::not_found("change request", request_id))?;
                request.status = ChangeStatus::Rejected;
                request.reviewed_by = Some(reviewer_id.to_string());
                request.rejection_reason = Some(rejection_reason);
                Ok(request.clone())
            }
        }
    }

    /// Pending requests for an organization, oldest first.
    pub fn pending_changes(&self, org_id: &str) -> Vec<SensitiveChangeRequest> {
        let inner = self.read();
        let mut pending: Vec<SensitiveChangeRequest> = inner
            .changes
            .values()
            .filter(|request| request.org_id == org_id && request.status == ChangeStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|request| request.created_at);
        pending
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("payroll store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("payroll store lock poisoned")
    }
}

/// Applies one approved change to the employee record.
fn apply_change(record: &mut EmployeeRecord, change: &SensitiveChange) {
    match change {
        SensitiveChange::BasicSalary { amount } => match &mut record.snapshot.compensation {
            Some(compensation) => compensation.basic_salary = *amount,
            None => {
                record.snapshot.compensation = Some(Compensation {
                    basic_salary: *amount,
                    allowances: Vec::new(),
                });
            }
        },
        SensitiveChange::Allowances { components } => match &mut record.snapshot.compensation {
            Some(compensation) => compensation.allowances = components.clone(),
            None => {
                record.snapshot.compensation = Some(Compensation {
                    basic_salary: Decimal::ZERO,
                    allowances: components.clone(),
                });
            }
        },
        SensitiveChange::BankAccount {
            bank_name,
            account_number,
        } => {
            record.bank_name = Some(bank_name.clone());
            record.account_number = Some(account_number.clone());
        }
        SensitiveChange::StatutoryId { scheme, value } => {
            record.statutory_ids.insert(*scheme, value.clone());
        }
    }
}

fn invalid_run_transition(current: RunStatus, attempted: &str) -> EngineError {
    EngineError::InvalidStateTransition {
        entity: "run".to_string(),
        current: current.as_str().to_string(),
        attempted: attempted.to_string(),
    }
}
