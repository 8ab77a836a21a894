//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll computation,
//! run lifecycle transitions, and the sensitive-change workflow.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "run".to_string(),
///     id: "7a0d".to_string(),
/// };
/// assert_eq!(error.to_string(), "run not found: 7a0d");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A role or ownership check failed. Never retried; surfaced to the caller.
    ///
    /// The display string deliberately starts with "unauthorized" so callers
    /// and tests can match on it without depending on internal detail.
    #[error("unauthorized: {reason}")]
    Unauthorized {
        /// Why the actor was refused.
        reason: String,
    },

    /// An operation was attempted against an entity in the wrong state.
    #[error("invalid state transition for {entity}: cannot {attempted} while {current}")]
    InvalidStateTransition {
        /// The kind of entity ("run", "change request").
        entity: String,
        /// The state the entity was observed in.
        current: String,
        /// The operation that was attempted.
        attempted: String,
    },

    /// A bracket or tier rule has no coverage for the given base amount.
    ///
    /// Fatal to the enclosing run: defaulting to zero would misstate a
    /// paycheck.
    #[error("rule configuration error in '{region}/{rule}': {message}")]
    RuleConfiguration {
        /// The region the rule belongs to.
        region: String,
        /// The rule code.
        rule: String,
        /// What was wrong with the configuration.
        message: String,
    },

    /// An entity lookup by id failed.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: String,
        /// The id that did not resolve.
        id: String,
    },

    /// A payroll run already exists for the organization and period.
    #[error("payroll run already exists for org '{org_id}' period {month}/{year}")]
    RunAlreadyExists {
        /// The organization.
        org_id: String,
        /// Month of the period (1-12).
        month: u32,
        /// Year of the period.
        year: i32,
    },

    /// A pending sensitive-change request already targets this employee.
    #[error("a pending change request already exists for employee '{employee_id}'")]
    DuplicatePendingChange {
        /// The employee already targeted by a pending request.
        employee_id: String,
    },

    /// An employee has no resolvable compensation record.
    ///
    /// During `process_run` this is collected as a per-employee warning and
    /// the employee is excluded from the slip set, not escalated to a run
    /// failure.
    #[error("employee '{employee_id}' has no compensation record")]
    MissingCompensation {
        /// The employee without a salary assignment.
        employee_id: String,
    },

    /// An in-place edit was attempted on a rule row referenced by a
    /// finalized run. Changes must be new rows with a later effective date.
    #[error("rule '{region}/{code}' is referenced by a finalized run and cannot be modified")]
    RuleImmutable {
        /// The region the rule belongs to.
        region: String,
        /// The rule code.
        code: String,
    },

    /// A request field failed validation.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made it invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::Unauthorized`] with the given reason.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`EngineError::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
