use apiguard_types::{ItemPath, Severity};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

/// Per-rule configuration resolved from presets and caller overrides.
#[derive(Clone, Debug)]
pub struct RulePolicy {
    pub enabled: bool,
    pub severity: Severity,

    /// Glob patterns (semantics are rule-specific; `surface.minimality` treats
    /// them as "should stay internal" path patterns).
    pub patterns: Vec<String>,

    /// Generic allowlist (semantics are rule-specific; `features.hygiene`
    /// treats entries as intentionally default-on capabilities).
    pub allow: Vec<String>,

    /// Caller-configured thresholds. Unset means the threshold check is silent.
    pub max_params: Option<u32>,
    pub max_generic_bounds: Option<u32>,
}

impl RulePolicy {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
            patterns: Vec::new(),
            allow: Vec::new(),
            max_params: None,
            max_generic_bounds: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Info,
            patterns: Vec::new(),
            allow: Vec::new(),
            max_params: None,
            max_generic_bounds: None,
        }
    }
}

/// One suppressed (rule, item) pair from caller configuration.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Suppression {
    pub rule_id: String,
    pub path: ItemPath,
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    pub max_findings: usize,

    /// Upper bound on scheduled (rule, item) work units. `None` is unbounded.
    /// A truncated run is marked as such and must not be treated as exhaustive.
    pub work_budget: Option<usize>,

    pub rules: BTreeMap<String, RulePolicy>,
    pub suppressions: BTreeSet<Suppression>,
}

impl EffectiveConfig {
    pub fn rule_policy(&self, rule_id: &str) -> Option<&RulePolicy> {
        self.rules.get(rule_id).filter(|p| p.enabled)
    }

    pub fn is_suppressed(&self, rule_id: &str, path: Option<&ItemPath>) -> bool {
        let Some(path) = path else { return false };
        self.suppressions.contains(&Suppression {
            rule_id: rule_id.to_string(),
            path: path.clone(),
        })
    }
}
