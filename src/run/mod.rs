//! Payroll run orchestration.
//!
//! Owns the run lifecycle (draft, processing, completed), fans the payslip
//! builder out across an organization's active employees, and aggregates
//! run totals. Authorization is checked here, up front; the state-machine
//! preconditions themselves live in the store's atomic sections and stay
//! role-agnostic.

use std::sync::Arc;

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollRun, SalarySlip};
use crate::payslip::build_slip;
use crate::store::{PayrollStore, RuleKey, RuleStore};

/// A recoverable per-employee condition collected during processing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunWarning {
    /// The employee that was skipped.
    pub employee_id: String,
    /// Why the employee produced no slip.
    pub message: String,
}

/// The result of a processing pass: the updated run plus any per-employee
/// warnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessOutcome {
    /// The run after the rebuilt slip set was committed.
    pub run: PayrollRun,
    /// Employees skipped from the slip set, with reasons.
    pub warnings: Vec<RunWarning>,
}

/// Drives payroll run state transitions against the stores.
#[derive(Clone)]
pub struct RunOrchestrator {
    store: Arc<PayrollStore>,
    rules: Arc<RuleStore>,
}

impl RunOrchestrator {
    /// Creates an orchestrator over the given stores.
    pub fn new(store: Arc<PayrollStore>, rules: Arc<RuleStore>) -> Self {
        Self { store, rules }
    }

    /// Creates a draft run for the caller's organization and the given
    /// period. Privileged.
    pub fn create_run(&self, ctx: &AuthContext, month: u32, year: i32) -> EngineResult<PayrollRun> {
        ctx.require_privileged("create payroll runs")?;
        let run = self.store.create_run(&ctx.org_id, month, year)?;
        info!(run_id = %run.id, org_id = %run.org_id, month, year, "Payroll run created");
        Ok(run)
    }

    /// Recomputes the run's slip set: deletes existing slips and rebuilds
    /// one per active employee, then recomputes the aggregates.
    ///
    /// Recomputation is idempotent: a second pass with unchanged inputs
    /// produces an identical slip set. Employees without a compensation
    /// record are skipped with a collected warning; a rule configuration
    /// error aborts the pass and leaves the prior slip set intact.
    pub fn process_run(&self, ctx: &AuthContext, run_id: Uuid) -> EngineResult<ProcessOutcome> {
        ctx.require_privileged("process payroll runs")?;
        let run = self.store.get_run(run_id)?;
        ctx.require_org(&run.org_id)?;

        let org = self.store.get_org(&run.org_id)?;
        let region = self.rules.get_region(&org.region_code)?;
        if !region.is_active {
            return Err(EngineError::InvalidInput {
                field: "region".to_string(),
                message: format!("region '{}' is not active", region.code),
            });
        }
        let as_of = period_end(run.month, run.year)?;
        let rule_set = self.rules.rules_for(&region.code, as_of);
        let used_rules: Vec<RuleKey> = rule_set.iter().map(RuleKey::of).collect();

        self.store.begin_processing(run_id)?;

        let mut slips: Vec<SalarySlip> = Vec::new();
        let mut warnings: Vec<RunWarning> = Vec::new();
        for employee in self.store.list_active_employees(&run.org_id) {
            match build_slip(run_id, &employee, &region, &rule_set, as_of) {
                Ok(slip) => slips.push(slip),
                Err(EngineError::MissingCompensation { employee_id }) => {
                    warn!(
                        run_id = %run_id,
                        employee_id = %employee_id,
                        "Employee skipped: no compensation record"
                    );
                    warnings.push(RunWarning {
                        employee_id,
                        message: "no compensation record".to_string(),
                    });
                }
                Err(err) => {
                    // Fatal: leave the prior slip set in place.
                    self.store.abort_processing(run_id);
                    warn!(run_id = %run_id, error = %err, "Processing aborted");
                    return Err(err);
                }
            }
        }

        let run = self.store.commit_run_slips(run_id, slips, used_rules)?;
        info!(
            run_id = %run.id,
            employee_count = run.employee_count,
            total_gross_pay = %run.total_gross_pay,
            total_net_pay = %run.total_net_pay,
            skipped = warnings.len(),
            "Payroll run processed"
        );
        Ok(ProcessOutcome { run, warnings })
    }

    /// One-way finalization. The run and its slips become immutable, and
    /// the rule rows the run used are locked against in-place edits.
    pub fn finalize_run(&self, ctx: &AuthContext, run_id: Uuid) -> EngineResult<PayrollRun> {
        ctx.require_privileged("finalize payroll runs")?;
        let run = self.store.get_run(run_id)?;
        ctx.require_org(&run.org_id)?;

        let org = self.store.get_org(&run.org_id)?;
        let (run, used_rules) = self.store.finalize_run(run_id)?;
        self.rules.lock_rules(&org.region_code, &used_rules);

        info!(run_id = %run.id, org_id = %run.org_id, "Payroll run finalized");
        Ok(run)
    }

    /// Deletes a run and its slips. Only permitted while not completed.
    pub fn delete_run(&self, ctx: &AuthContext, run_id: Uuid) -> EngineResult<()> {
        ctx.require_privileged("delete payroll runs")?;
        let run = self.store.get_run(run_id)?;
        ctx.require_org(&run.org_id)?;

        self.store.delete_run(run_id)?;
        info!(run_id = %run_id, org_id = %run.org_id, "Payroll run deleted");
        Ok(())
    }

    /// Fetches a run in the caller's organization.
    pub fn get_run(&self, ctx: &AuthContext, run_id: Uuid) -> EngineResult<PayrollRun> {
        let run = self.store.get_run(run_id)?;
        ctx.require_org(&run.org_id)?;
        Ok(run)
    }

    /// Fetches a run's slips. Privileged: the full slip set exposes every
    /// employee's pay.
    pub fn get_run_slips(&self, ctx: &AuthContext, run_id: Uuid) -> EngineResult<Vec<SalarySlip>> {
        ctx.require_privileged("read a run's slip set")?;
        let run = self.store.get_run(run_id)?;
        ctx.require_org(&run.org_id)?;
        self.store.run_slips(run_id)
    }

    /// Fetches one slip. An employee may fetch only their own slip;
    /// privileged roles may fetch any slip in their organization.
    pub fn get_payslip(&self, ctx: &AuthContext, slip_id: Uuid) -> EngineResult<SalarySlip> {
        let slip = self.store.get_slip(slip_id)?;
        let run = self.store.get_run(slip.run_id)?;
        ctx.require_org(&run.org_id)?;
        if !ctx.role.is_privileged() && slip.employee_id != ctx.user_id {
            return Err(EngineError::unauthorized(
                "employees may only read their own payslips",
            ));
        }
        Ok(slip)
    }
}

/// Last calendar day of the run's period; rules are effective-dated
/// against it.
fn period_end(month: u32, year: i32) -> EngineResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .ok_or_else(|| EngineError::InvalidInput {
            field: "period".to_string(),
            message: format!("{month}/{year} is not a valid payroll period"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::models::{
        Compensation, EmployeeSnapshot, RateBracket, RuleBasis, RuleKind, RuleSide, RunStatus,
        TaxRegion, TaxRule,
    };
    use crate::store::EmployeeRecord;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ctx(role: Role) -> AuthContext {
        AuthContext {
            org_id: "org_001".to_string(),
            user_id: "mgr_001".to_string(),
            role,
        }
    }

    fn employee(id: &str, basic: Option<&str>) -> EmployeeRecord {
        EmployeeRecord {
            org_id: "org_001".to_string(),
            snapshot: EmployeeSnapshot {
                employee_id: id.to_string(),
                name: format!("Employee {id}"),
                department: "Finance".to_string(),
                designation: "Accountant".to_string(),
                compensation: basic.map(|b| Compensation {
                    basic_salary: dec(b),
                    allowances: vec![],
                }),
                is_active: true,
            },
            bank_name: None,
            account_number: None,
            statutory_ids: HashMap::new(),
        }
    }

    fn paye_rule() -> TaxRule {
        TaxRule {
            region_code: "KE".to_string(),
            code: "paye".to_string(),
            name: "PAYE".to_string(),
            kind: RuleKind::ProgressiveBracket {
                brackets: vec![
                    RateBracket {
                        min: dec("0"),
                        max: Some(dec("24000")),
                        rate: dec("0.10"),
                    },
                    RateBracket {
                        min: dec("24001"),
                        max: None,
                        rate: dec("0.25"),
                    },
                ],
            },
            applies_to: RuleBasis::Taxable,
            side: RuleSide::Employee,
            reduces_taxable_base: false,
            grants_personal_relief: true,
            is_active: true,
            order: 30,
            effective_from: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        }
    }

    fn orchestrator_with_employees() -> RunOrchestrator {
        let store = Arc::new(PayrollStore::new());
        let rules = Arc::new(RuleStore::new());

        store.upsert_org(crate::store::OrgProfile {
            org_id: "org_001".to_string(),
            region_code: "KE".to_string(),
        });
        store.upsert_employee(employee("emp_001", Some("30000")));
        store.upsert_employee(employee("emp_002", Some("50000")));

        rules.upsert_region(TaxRegion {
            code: "KE".to_string(),
            name: "Kenya".to_string(),
            currency: "KES".to_string(),
            personal_relief: dec("2400"),
            is_active: true,
            updated_at: Utc::now(),
        });
        rules.upsert_rule(paye_rule()).unwrap();

        RunOrchestrator::new(store, rules)
    }

    #[test]
    fn test_unprivileged_roles_cannot_drive_transitions() {
        let orchestrator = orchestrator_with_employees();
        let admin = ctx(Role::OrgAdmin);
        let run = orchestrator.create_run(&admin, 3, 2026).unwrap();

        let employee_ctx = ctx(Role::Employee);
        for result in [
            orchestrator.process_run(&employee_ctx, run.id).map(|_| ()),
            orchestrator.finalize_run(&employee_ctx, run.id).map(|_| ()),
            orchestrator.delete_run(&employee_ctx, run.id),
        ] {
            let err = result.unwrap_err();
            assert!(err.to_string().contains("unauthorized"), "got: {err}");
        }
    }

    #[test]
    fn test_process_builds_slip_per_active_employee() {
        let orchestrator = orchestrator_with_employees();
        let admin = ctx(Role::HrManager);
        let run = orchestrator.create_run(&admin, 3, 2026).unwrap();

        let outcome = orchestrator.process_run(&admin, run.id).unwrap();
        assert_eq!(outcome.run.status, RunStatus::Draft);
        assert_eq!(outcome.run.employee_count, 2);
        assert!(outcome.warnings.is_empty());

        let slips = orchestrator.get_run_slips(&admin, run.id).unwrap();
        assert_eq!(slips.len(), 2);
        for slip in &slips {
            assert_eq!(slip.net_salary, slip.gross_salary - slip.total_deductions());
        }
    }

    #[test]
    fn test_process_is_idempotent() {
        let orchestrator = orchestrator_with_employees();
        let admin = ctx(Role::HrManager);
        let run = orchestrator.create_run(&admin, 3, 2026).unwrap();

        orchestrator.process_run(&admin, run.id).unwrap();
        let first: Vec<_> = orchestrator
            .get_run_slips(&admin, run.id)
            .unwrap()
            .into_iter()
            .map(|s| (s.employee_id, s.gross_salary, s.net_salary, s.deductions))
            .collect();

        let outcome = orchestrator.process_run(&admin, run.id).unwrap();
        let second: Vec<_> = orchestrator
            .get_run_slips(&admin, run.id)
            .unwrap()
            .into_iter()
            .map(|s| (s.employee_id, s.gross_salary, s.net_salary, s.deductions))
            .collect();

        assert_eq!(first, second);
        assert_eq!(outcome.run.employee_count, 2);
    }

    #[test]
    fn test_missing_compensation_is_warning_not_failure() {
        let orchestrator = orchestrator_with_employees();
        orchestrator
            .store
            .upsert_employee(employee("emp_003", None));
        let admin = ctx(Role::HrManager);
        let run = orchestrator.create_run(&admin, 3, 2026).unwrap();

        let outcome = orchestrator.process_run(&admin, run.id).unwrap();
        assert_eq!(outcome.run.employee_count, 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].employee_id, "emp_003");
    }

    #[test]
    fn test_rule_configuration_error_aborts_and_preserves_slips() {
        let orchestrator = orchestrator_with_employees();
        let admin = ctx(Role::HrManager);
        let run = orchestrator.create_run(&admin, 3, 2026).unwrap();
        orchestrator.process_run(&admin, run.id).unwrap();

        // A tier table with a gap makes the next pass fatal.
        orchestrator
            .rules
            .upsert_rule(TaxRule {
                region_code: "KE".to_string(),
                code: "nhif".to_string(),
                name: "NHIF".to_string(),
                kind: RuleKind::TieredFixed {
                    tiers: vec![crate::models::FixedTier {
                        min: dec("0"),
                        max: Some(dec("5999")),
                        amount: dec("150"),
                    }],
                },
                applies_to: RuleBasis::Gross,
                side: RuleSide::Employee,
                reduces_taxable_base: false,
                grants_personal_relief: false,
                is_active: true,
                order: 20,
                effective_from: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            })
            .unwrap();

        let err = orchestrator.process_run(&admin, run.id).unwrap_err();
        assert!(matches!(err, EngineError::RuleConfiguration { .. }));

        // Prior slip set still standing, run back in draft.
        let run = orchestrator.get_run(&admin, run.id).unwrap();
        assert_eq!(run.status, RunStatus::Draft);
        assert_eq!(orchestrator.get_run_slips(&admin, run.id).unwrap().len(), 2);
    }

    #[test]
    fn test_inactive_region_rejects_processing() {
        let orchestrator = orchestrator_with_employees();
        let admin = ctx(Role::HrManager);
        let run = orchestrator.create_run(&admin, 3, 2026).unwrap();

        orchestrator.rules.upsert_region(TaxRegion {
            code: "KE".to_string(),
            name: "Kenya".to_string(),
            currency: "KES".to_string(),
            personal_relief: dec("2400"),
            is_active: false,
            updated_at: Utc::now(),
        });

        let err = orchestrator.process_run(&admin, run.id).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_finalize_is_one_way() {
        let orchestrator = orchestrator_with_employees();
        let admin = ctx(Role::HrManager);
        let run = orchestrator.create_run(&admin, 3, 2026).unwrap();
        orchestrator.process_run(&admin, run.id).unwrap();

        let finalized = orchestrator.finalize_run(&admin, run.id).unwrap();
        assert_eq!(finalized.status, RunStatus::Completed);

        assert!(matches!(
            orchestrator.process_run(&admin, run.id).unwrap_err(),
            EngineError::InvalidStateTransition { .. }
        ));
        assert!(matches!(
            orchestrator.delete_run(&admin, run.id).unwrap_err(),
            EngineError::InvalidStateTransition { .. }
        ));
    }

    #[test]
    fn test_finalize_locks_used_rules() {
        let orchestrator = orchestrator_with_employees();
        let admin = ctx(Role::HrManager);
        let run = orchestrator.create_run(&admin, 3, 2026).unwrap();
        orchestrator.process_run(&admin, run.id).unwrap();
        orchestrator.finalize_run(&admin, run.id).unwrap();

        // In-place edit of the used PAYE row must now fail.
        let err = orchestrator.rules.upsert_rule(paye_rule()).unwrap_err();
        assert!(matches!(err, EngineError::RuleImmutable { .. }));
    }

    #[test]
    fn test_payslip_ownership_check() {
        let orchestrator = orchestrator_with_employees();
        let admin = ctx(Role::HrManager);
        let run = orchestrator.create_run(&admin, 3, 2026).unwrap();
        orchestrator.process_run(&admin, run.id).unwrap();
        let slips = orchestrator.get_run_slips(&admin, run.id).unwrap();
        let own = slips.iter().find(|s| s.employee_id == "emp_001").unwrap();
        let other = slips.iter().find(|s| s.employee_id == "emp_002").unwrap();

        let employee_ctx = AuthContext {
            org_id: "org_001".to_string(),
            user_id: "emp_001".to_string(),
            role: Role::Employee,
        };

        assert!(orchestrator.get_payslip(&employee_ctx, own.id).is_ok());
        let err = orchestrator.get_payslip(&employee_ctx, other.id).unwrap_err();
        assert!(err.to_string().contains("unauthorized"));

        // Privileged roles read any slip in org.
        assert!(orchestrator.get_payslip(&admin, other.id).is_ok());
    }

    #[test]
    fn test_cross_org_run_is_unauthorized() {
        let orchestrator = orchestrator_with_employees();
        let admin = ctx(Role::HrManager);
        let run = orchestrator.create_run(&admin, 3, 2026).unwrap();

        let foreign = AuthContext {
            org_id: "org_999".to_string(),
            user_id: "mgr_999".to_string(),
            role: Role::OrgAdmin,
        };
        let err = orchestrator.get_run(&foreign, run.id).unwrap_err();
        assert!(err.to_string().contains("unauthorized"));
    }

    #[test]
    fn test_period_end_is_last_day_of_month() {
        assert_eq!(
            period_end(2, 2026).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert_eq!(
            period_end(12, 2025).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
    }
}
