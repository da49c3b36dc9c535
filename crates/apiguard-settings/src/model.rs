use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `apiguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApiguardConfigV1 {
    /// Optional schema string for tooling (`apiguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// When to fail the review: `error` (default) or `warn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many findings to emit before truncating the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_findings: Option<u32>,

    /// Upper bound on scheduled (rule, item) work units; a truncated run is
    /// marked as such in the report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_budget: Option<u32>,

    /// Map of rule_id -> config.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,

    /// Per-item suppressions, kept out of the default report view.
    #[serde(default)]
    pub suppress: Vec<SuppressionEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override preset severity: `info`, `warning`, `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Glob patterns (semantics are rule-specific; `surface.minimality`
    /// treats them as "should stay internal" path patterns).
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Generic allowlist (semantics are rule-specific; `features.hygiene`
    /// treats entries as intentionally default-on capabilities).
    #[serde(default)]
    pub allow: Vec<String>,

    /// Threshold for `surface.over_generic`; unset keeps that check silent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_params: Option<u32>,

    /// Threshold for `surface.over_generic`; unset keeps that check silent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_generic_bounds: Option<u32>,
}

/// One suppressed (rule, item path) pair.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuppressionEntry {
    pub rule: String,
    pub path: String,
}
