//! Application state for the payroll engine API.

use std::sync::Arc;

use crate::run::RunOrchestrator;
use crate::store::{PayrollStore, RuleStore};
use crate::workflow::ChangeWorkflow;

/// Shared application state.
///
/// Contains the stores and the orchestration facades shared across all
/// request handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<PayrollStore>,
    rules: Arc<RuleStore>,
    orchestrator: RunOrchestrator,
    workflow: ChangeWorkflow,
}

impl AppState {
    /// Creates application state over the given stores.
    pub fn new(store: Arc<PayrollStore>, rules: Arc<RuleStore>) -> Self {
        let orchestrator = RunOrchestrator::new(Arc::clone(&store), Arc::clone(&rules));
        let workflow = ChangeWorkflow::new(Arc::clone(&store));
        Self {
            store,
            rules,
            orchestrator,
            workflow,
        }
    }

    /// The payroll store.
    pub fn store(&self) -> &Arc<PayrollStore> {
        &self.store
    }

    /// The rule store.
    pub fn rules(&self) -> &Arc<RuleStore> {
        &self.rules
    }

    /// The run orchestrator.
    pub fn orchestrator(&self) -> &RunOrchestrator {
        &self.orchestrator
    }

    /// The sensitive-change workflow.
    pub fn workflow(&self) -> &ChangeWorkflow {
        &self.workflow
    }
}
