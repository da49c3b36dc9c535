use apiguard_domain::policy::{EffectiveConfig, FailOn, RulePolicy};
use apiguard_domain::rules;
use apiguard_types::Severity;
use std::collections::{BTreeMap, BTreeSet};

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> EffectiveConfig {
    match profile {
        "warn" => warn_profile(),
        "compat" => compat_profile(),
        // default
        _ => strict_profile(),
    }
}

fn strict_profile() -> EffectiveConfig {
    base("strict", FailOn::Error, default_rules(None))
}

fn warn_profile() -> EffectiveConfig {
    base(
        "warn",
        FailOn::Warning,
        default_rules(Some(Severity::Warning)),
    )
}

fn compat_profile() -> EffectiveConfig {
    // Compatibility mode keeps every rule on but nothing above warning;
    // blocking verdicts come from major diff deltas instead.
    base(
        "compat",
        FailOn::Error,
        default_rules(Some(Severity::Warning)),
    )
}

fn base(profile: &str, fail_on: FailOn, rules: BTreeMap<String, RulePolicy>) -> EffectiveConfig {
    EffectiveConfig {
        profile: profile.to_string(),
        fail_on,
        max_findings: 200,
        work_budget: None,
        rules,
        suppressions: BTreeSet::new(),
    }
}

/// The full catalog at each rule's default severity, optionally capped.
fn default_rules(cap: Option<Severity>) -> BTreeMap<String, RulePolicy> {
    rules::catalog()
        .into_iter()
        .map(|rule| {
            let severity = match cap {
                Some(cap) if rank(rule.default_severity) > rank(cap) => cap,
                _ => rule.default_severity,
            };
            (rule.id.to_string(), RulePolicy::enabled(severity))
        })
        .collect()
}

fn rank(severity: Severity) -> u8 {
    match severity {
        Severity::Info => 0,
        Severity::Warning => 1,
        Severity::Error => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiguard_types::ids;

    #[test]
    fn every_profile_enables_the_full_catalog() {
        for profile in ["strict", "warn", "compat"] {
            let cfg = preset(profile);
            assert_eq!(cfg.profile, profile);
            assert_eq!(cfg.rules.len(), rules::catalog().len());
            assert!(cfg.rules.values().all(|p| p.enabled));
        }
    }

    #[test]
    fn warn_profile_caps_severity_and_fails_on_warning() {
        let cfg = preset("warn");
        assert_eq!(cfg.fail_on, FailOn::Warning);
        assert!(
            cfg.rules
                .values()
                .all(|p| p.severity != Severity::Error)
        );
    }

    #[test]
    fn strict_profile_keeps_catalog_default_severities() {
        let cfg = preset("strict");
        assert_eq!(
            cfg.rules[ids::RULE_API_ESCAPE_HATCH].severity,
            Severity::Error
        );
        assert_eq!(
            cfg.rules[ids::RULE_API_BOOLEAN_PARAMETER].severity,
            Severity::Warning
        );
    }

    #[test]
    fn unknown_profile_falls_back_to_strict() {
        assert_eq!(preset("nonsense").profile, "strict");
    }
}
