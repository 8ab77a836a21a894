//! Configuration loading for the payroll engine.
//!
//! Region definitions (tax regions and their statutory rule sets) and
//! organization salary components are loaded from YAML files at startup
//! and seeded into the rule store.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ComponentDef, RegionFile, RuleEntry, RulesFile, SalaryComponentsFile};
