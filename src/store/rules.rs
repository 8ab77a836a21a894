//! Versioned rule storage.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::{TaxRegion, TaxRule};

/// Identifies one rule row within a region: versions of a rule share a
/// code and differ by effective date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleKey {
    /// The rule code.
    pub code: String,
    /// The row's effective date.
    pub effective_from: NaiveDate,
}

impl RuleKey {
    /// The key of a rule row.
    pub fn of(rule: &TaxRule) -> Self {
        Self {
            code: rule.code.clone(),
            effective_from: rule.effective_from,
        }
    }
}

#[derive(Debug, Default)]
struct RuleStoreInner {
    regions: HashMap<String, TaxRegion>,
    rules: Vec<TaxRule>,
    /// (region, code, effective_from) triples referenced by a finalized run.
    locked: HashSet<(String, String, NaiveDate)>,
}

/// Holds versioned, region-scoped tax rule definitions.
///
/// Rule rows referenced by a finalized run are locked: an in-place update
/// of a locked row fails with [`EngineError::RuleImmutable`], and changes
/// must instead be inserted as new rows with a later effective date.
#[derive(Debug, Default)]
pub struct RuleStore {
    inner: RwLock<RuleStoreInner>,
}

impl RuleStore {
    /// Creates an empty rule store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces a region definition.
    pub fn upsert_region(&self, region: TaxRegion) {
        let mut inner = self.inner.write().expect("rule store lock poisoned");
        inner.regions.insert(region.code.clone(), region);
    }

    /// Looks up a region by code.
    pub fn get_region(&self, code: &str) -> EngineResult<TaxRegion> {
        let inner = self.inner.read().expect("rule store lock poisoned");
        inner
            .regions
            .get(code)
            .cloned()
            .ok_or_else(|| EngineError::not_found("region", code))
    }

    /// Inserts a rule row, or replaces the row sharing its (code,
    /// effective date) key.
    ///
    /// # Errors
    ///
    /// [`EngineError::RuleImmutable`] when the targeted row is referenced
    /// by a finalized run. Historical rules never change in place; insert
    /// a new row with a later `effective_from` instead.
    pub fn upsert_rule(&self, rule: TaxRule) -> EngineResult<()> {
        let mut inner = self.inner.write().expect("rule store lock poisoned");

        let key = (
            rule.region_code.clone(),
            rule.code.clone(),
            rule.effective_from,
        );
        let existing = inner.rules.iter().position(|r| {
            r.region_code == rule.region_code
                && r.code == rule.code
                && r.effective_from == rule.effective_from
        });

        if let Some(index) = existing {
            if inner.locked.contains(&key) {
                return Err(EngineError::RuleImmutable {
                    region: rule.region_code,
                    code: rule.code,
                });
            }
            inner.rules[index] = rule;
        } else {
            inner.rules.push(rule);
        }
        Ok(())
    }

    /// Returns the rule set effective for a region on `as_of`, sorted by
    /// evaluation order.
    ///
    /// For each rule code, the row with the latest effective date not
    /// after `as_of` wins; an inactive winning row disables the rule for
    /// that date.
    pub fn rules_for(&self, region_code: &str, as_of: NaiveDate) -> Vec<TaxRule> {
        let inner = self.inner.read().expect("rule store lock poisoned");

        let mut current: HashMap<&str, &TaxRule> = HashMap::new();
        for rule in inner
            .rules
            .iter()
            .filter(|r| r.region_code == region_code && r.effective_from <= as_of)
        {
            let winner = current.entry(rule.code.as_str()).or_insert(rule);
            if rule.effective_from > winner.effective_from {
                *winner = rule;
            }
        }

        let mut rules: Vec<TaxRule> = current
            .into_values()
            .filter(|r| r.is_active)
            .cloned()
            .collect();
        rules.sort_by_key(|r| r.order);
        rules
    }

    /// Marks rule rows as referenced by a finalized run.
    pub fn lock_rules(&self, region_code: &str, keys: &[RuleKey]) {
        let mut inner = self.inner.write().expect("rule store lock poisoned");
        for key in keys {
            inner.locked.insert((
                region_code.to_string(),
                key.code.clone(),
                key.effective_from,
            ));
        }
    }

    /// Whether a rule row is locked by a finalized run.
    pub fn is_locked(&self, region_code: &str, key: &RuleKey) -> bool {
        let inner = self.inner.read().expect("rule store lock poisoned");
        inner.locked.contains(&(
            region_code.to_string(),
            key.code.clone(),
            key.effective_from,
        ))
    }
}
