use crate::{model::ApiguardConfigV1, presets};
use anyhow::Context;
use apiguard_domain::policy::{EffectiveConfig, FailOn, RulePolicy, Suppression};
use apiguard_domain::registry::ConfigError;
use apiguard_types::{ItemPath, Severity, explain, ids};
use globset::Glob;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_findings: Option<u32>,
    pub work_budget: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: ApiguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile);

    // max findings / work budget
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        effective.max_findings = mf as usize;
    }
    if let Some(budget) = overrides.work_budget.or(cfg.work_budget) {
        effective.work_budget = Some(budget as usize);
    }

    // per-rule overrides
    for (rule_id, rc) in cfg.rules.iter() {
        if !is_known_rule(rule_id) {
            return Err(ConfigError::UnknownRule {
                id: rule_id.clone(),
            }
            .into());
        }
        let entry = effective
            .rules
            .entry(rule_id.clone())
            .or_insert_with(RulePolicy::disabled);

        if let Some(enabled) = rc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = rc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?;
        }
        if !rc.patterns.is_empty() {
            validate_globs(rule_id, &rc.patterns)?;
            entry.patterns = rc.patterns.clone();
        }
        if !rc.allow.is_empty() {
            validate_globs(rule_id, &rc.allow)?;
            entry.allow = rc.allow.clone();
        }
        if rc.max_params.is_some() {
            entry.max_params = rc.max_params;
        }
        if rc.max_generic_bounds.is_some() {
            entry.max_generic_bounds = rc.max_generic_bounds;
        }
    }

    // suppressions
    for sup in cfg.suppress.iter() {
        if !is_suppressible_rule(&sup.rule) {
            return Err(ConfigError::UnknownSuppressionTarget {
                id: sup.rule.clone(),
            }
            .into());
        }
        effective.suppressions.insert(Suppression {
            rule_id: sup.rule.clone(),
            path: ItemPath::new(&sup.path),
        });
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    Ok(ResolvedConfig { effective })
}

fn is_known_rule(id: &str) -> bool {
    explain::all_rule_ids().iter().any(|known| *known == id)
}

/// Compatibility findings carry the synthetic `compat.surface` rule id, and
/// suppressing one per path is a supported workflow.
fn is_suppressible_rule(id: &str) -> bool {
    is_known_rule(id) || id == ids::RULE_COMPAT_SURFACE
}

fn validate_globs(rule_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid glob for {rule_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
