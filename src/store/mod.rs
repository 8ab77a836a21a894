//! Persistent state for the payroll engine.
//!
//! Two stores back the core: [`RuleStore`] holds versioned, region-scoped
//! statutory rules, and [`PayrollStore`] holds the mutable payroll state
//! (employees, runs, slips, change requests). Each store keeps all of its
//! state behind a single lock so every compound operation is one bounded
//! transaction; a reader never observes a half-applied mutation.

mod memory;
mod rules;

pub use memory::{EmployeeRecord, OrgProfile, PayrollStore};
pub use rules::{RuleKey, RuleStore};
