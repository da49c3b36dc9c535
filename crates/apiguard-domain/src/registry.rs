//! Rule definitions and the append-only registry.
//!
//! Rules are pure functions of (item, snapshot-wide context). They must not
//! consult mutable external state and must not depend on other rules'
//! results; the evaluator relies on that independence to run them in
//! parallel and to keep incremental re-runs stable.

use crate::model::{InterfaceItem, Snapshot};
use crate::policy::RulePolicy;
use crate::visibility::VisibilityClosure;
use apiguard_types::{Finding, Severity};
use std::collections::BTreeMap;
use thiserror::Error;

/// Invalid rule selection or suppression configuration. Fatal: surfaced
/// before any evaluation begins.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duplicate rule id registered: {id}")]
    DuplicateRuleId { id: String },

    #[error("unknown rule id: {id}")]
    UnknownRule { id: String },

    #[error("suppression references unknown rule id: {id}")]
    UnknownSuppressionTarget { id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCategory {
    SurfaceMinimality,
    Naming,
    ErrorHandling,
    EscapeHatch,
    FeatureHygiene,
    Documentation,
    /// Synthetic findings emitted by the evaluator itself (rule faults).
    Engine,
    /// Synthetic findings mapped from compatibility deltas.
    Compatibility,
}

/// Snapshot-wide context shared by every application of one rule.
///
/// Glob sets are compiled once per (rule, run) from the policy's patterns and
/// allow list; rules must not recompile them per item.
pub struct RuleContext<'a> {
    pub snapshot: &'a Snapshot,
    pub visibility: &'a VisibilityClosure,
    pub policy: &'a RulePolicy,
    pub patterns: Option<&'a globset::GlobSet>,
    pub allow: Option<&'a globset::GlobSet>,
}

pub type ApplyFn = fn(&InterfaceItem, &RuleContext<'_>) -> bool;
pub type CheckFn = fn(&InterfaceItem, &RuleContext<'_>) -> Vec<Finding>;

/// One check definition. Ids are stable across engine versions and never
/// reused; suppression lists reference them.
#[derive(Clone)]
pub struct Rule {
    pub id: &'static str,
    pub category: RuleCategory,
    pub default_severity: Severity,
    pub applies: ApplyFn,
    pub check: CheckFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("default_severity", &self.default_severity)
            .finish_non_exhaustive()
    }
}

/// Append-only, insertion-ordered rule collection keyed by id.
///
/// The registry is the only long-lived engine object; it is shared read-only
/// across concurrent evaluation runs.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    index: BTreeMap<&'static str, usize>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in rule catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for rule in crate::rules::catalog() {
            registry
                .register(rule)
                .expect("builtin rule ids are unique");
        }
        registry
    }

    pub fn register(&mut self, rule: Rule) -> Result<(), ConfigError> {
        if self.index.contains_key(rule.id) {
            return Err(ConfigError::DuplicateRuleId {
                id: rule.id.to_string(),
            });
        }
        self.index.insert(rule.id, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.index.get(id).map(|&idx| &self.rules[idx])
    }

    /// Rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn by_category(&self, category: RuleCategory) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.category == category)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiguard_types::ids;

    fn never_applies(_: &InterfaceItem, _: &RuleContext<'_>) -> bool {
        false
    }

    fn empty_check(_: &InterfaceItem, _: &RuleContext<'_>) -> Vec<Finding> {
        Vec::new()
    }

    fn stub(id: &'static str) -> Rule {
        Rule {
            id,
            category: RuleCategory::Naming,
            default_severity: Severity::Info,
            applies: never_applies,
            check: empty_check,
        }
    }

    #[test]
    fn register_rejects_duplicate_ids() {
        let mut registry = RuleRegistry::new();
        registry.register(stub("test.one")).expect("first register");
        assert_eq!(
            registry.register(stub("test.one")),
            Err(ConfigError::DuplicateRuleId {
                id: "test.one".to_string()
            })
        );
    }

    #[test]
    fn builtin_catalog_is_complete_and_ordered() {
        let registry = RuleRegistry::builtin();
        let ids: Vec<&str> = registry.iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![
                ids::RULE_SURFACE_MINIMALITY,
                ids::RULE_SURFACE_OVER_GENERIC,
                ids::RULE_API_BOOLEAN_PARAMETER,
                ids::RULE_API_LEAKY_BORROW,
                ids::RULE_API_ERROR_SHAPE,
                ids::RULE_API_ESCAPE_HATCH,
                ids::RULE_FEATURES_HYGIENE,
                ids::RULE_DOCS_CONTRACT,
            ]
        );
        assert!(registry.get(ids::RULE_API_ERROR_SHAPE).is_some());
        assert!(registry.get("no.such.rule").is_none());
    }

    #[test]
    fn by_category_filters() {
        let registry = RuleRegistry::builtin();
        let docs: Vec<&str> = registry
            .by_category(RuleCategory::Documentation)
            .map(|r| r.id)
            .collect();
        assert_eq!(docs, vec![ids::RULE_DOCS_CONTRACT]);
    }
}
