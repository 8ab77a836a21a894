//! Configuration loading functionality.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AllowanceComponent, TaxRegion, TaxRule};
use crate::store::RuleStore;

use super::types::{ComponentDef, RegionFile, RulesFile, SalaryComponentsFile};

/// Loads and provides access to the engine's configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── salary_components.yaml  # Organization allowance components
/// └── ke/                     # One subdirectory per region
///     ├── region.yaml         # Region identity and personal relief
///     └── rules.yaml          # The region's statutory rule rows
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::store::RuleStore;
///
/// let loader = ConfigLoader::load("./config")?;
/// let rules = RuleStore::new();
/// loader.seed_rule_store(&rules)?;
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    regions: Vec<(TaxRegion, Vec<TaxRule>)>,
    components: BTreeMap<String, ComponentDef>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Every subdirectory containing a `region.yaml` is loaded as a
    /// region; `salary_components.yaml` at the root is required.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let components_path = path.join("salary_components.yaml");
        let components_file = Self::load_yaml::<SalaryComponentsFile>(&components_path)?;

        let entries = fs::read_dir(path).map_err(|_| EngineError::ConfigNotFound {
            path: path.display().to_string(),
        })?;

        let mut regions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: path.display().to_string(),
            })?;
            let region_dir = entry.path();
            if !region_dir.is_dir() || !region_dir.join("region.yaml").exists() {
                continue;
            }

            let region_file = Self::load_yaml::<RegionFile>(&region_dir.join("region.yaml"))?;
            let rules_file = Self::load_yaml::<RulesFile>(&region_dir.join("rules.yaml"))?;

            let region = TaxRegion {
                code: region_file.code.clone(),
                name: region_file.name,
                currency: region_file.currency,
                personal_relief: region_file.personal_relief,
                is_active: region_file.is_active,
                updated_at: Utc::now(),
            };
            let rules = rules_file
                .rules
                .into_iter()
                .map(|entry| entry.into_rule(&region_file.code))
                .collect();
            regions.push((region, rules));
        }

        if regions.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no region directories found)", path.display()),
            });
        }

        regions.sort_by(|a, b| a.0.code.cmp(&b.0.code));
        Ok(Self {
            regions,
            components: components_file.components,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParse {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// The loaded regions and their rule rows.
    pub fn regions(&self) -> &[(TaxRegion, Vec<TaxRule>)] {
        &self.regions
    }

    /// Seeds every loaded region and rule row into a rule store.
    pub fn seed_rule_store(&self, store: &RuleStore) -> EngineResult<()> {
        for (region, rules) in &self.regions {
            store.upsert_region(region.clone());
            for rule in rules {
                store.upsert_rule(rule.clone())?;
            }
        }
        Ok(())
    }

    /// The display name of a salary component.
    pub fn component_name(&self, code: &str) -> EngineResult<&str> {
        self.components
            .get(code)
            .map(|def| def.name.as_str())
            .ok_or_else(|| EngineError::not_found("salary component", code))
    }

    /// Resolves (component code, amount) assignments into allowance
    /// components carrying their configured display names.
    pub fn resolve_allowances(
        &self,
        assignments: &[(String, Decimal)],
    ) -> EngineResult<Vec<AllowanceComponent>> {
        assignments
            .iter()
            .map(|(code, amount)| {
                Ok(AllowanceComponent {
                    code: code.clone(),
                    name: self.component_name(code)?.to_string(),
                    amount: *amount,
                })
            })
            .collect()
    }
}
