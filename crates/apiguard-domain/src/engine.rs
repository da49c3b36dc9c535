//! The evaluator: applies every enabled rule to every applicable item.
//!
//! Rule applications are pure and mutually independent, so they run on a
//! rayon pool. The only synchronization point is collecting per-unit output;
//! ordering is imposed entirely by the final sort, so execution order never
//! affects the report.

use crate::model::{InterfaceItem, Snapshot};
use crate::policy::{EffectiveConfig, RulePolicy};
use crate::registry::{Rule, RuleContext, RuleRegistry};
use crate::report::{EvalReport, compare_findings, compute_verdict, severity_counts};
use crate::rules::utils::build_globset;
use crate::visibility::{self, SnapshotParseError, VisibilityClosure};
use apiguard_types::{Finding, ReviewData, Severity, ids};
use globset::GlobSet;
use rayon::prelude::*;
use serde_json::json;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// One enabled rule with its per-run compiled pattern sets.
struct PreparedRule<'a> {
    rule: &'a Rule,
    policy: &'a RulePolicy,
    patterns: Option<GlobSet>,
    allow: Option<GlobSet>,
}

impl<'a> PreparedRule<'a> {
    fn context<'b>(
        &'b self,
        snapshot: &'b Snapshot,
        visibility: &'b VisibilityClosure,
    ) -> RuleContext<'b> {
        RuleContext {
            snapshot,
            visibility,
            policy: self.policy,
            patterns: self.patterns.as_ref(),
            allow: self.allow.as_ref(),
        }
    }
}

pub fn evaluate(
    snapshot: &Snapshot,
    registry: &RuleRegistry,
    cfg: &EffectiveConfig,
) -> Result<EvalReport, SnapshotParseError> {
    // Validates the snapshot shape; fatal before any rule runs.
    let vis = visibility::closure(snapshot)?;

    let prepared: Vec<PreparedRule<'_>> = registry
        .iter()
        .filter_map(|rule| {
            let policy = cfg.rule_policy(rule.id)?;
            Some(PreparedRule {
                rule,
                policy,
                patterns: build_globset(&policy.patterns),
                allow: build_globset(&policy.allow),
            })
        })
        .collect();

    // Deterministic unit enumeration: registry order x snapshot order.
    let mut units: Vec<(&PreparedRule<'_>, &InterfaceItem)> = Vec::new();
    for prep in &prepared {
        let ctx = prep.context(snapshot, &vis);
        for item in &snapshot.items {
            if (prep.rule.applies)(item, &ctx) {
                units.push((prep, item));
            }
        }
    }

    let applicable_total = units.len();
    let mut truncated = false;
    let mut truncated_reason: Option<String> = None;
    if let Some(budget) = cfg.work_budget {
        if units.len() > budget {
            units.truncate(budget);
            truncated = true;
            truncated_reason = Some(format!(
                "work budget stopped scheduling after {budget} of {applicable_total} units"
            ));
        }
    }

    let mut findings: Vec<Finding> = units
        .par_iter()
        .flat_map_iter(|(prep, item)| {
            let ctx = prep.context(snapshot, &vis);
            // A faulting check is contained: it becomes one synthetic finding
            // and never aborts the remaining work.
            match catch_unwind(AssertUnwindSafe(|| (prep.rule.check)(item, &ctx))) {
                Ok(found) => found,
                Err(_) => vec![rule_fault(prep.rule.id, item)],
            }
        })
        .collect();

    // Deterministic ordering, then collapse of exact duplicates.
    findings.sort_by(compare_findings);
    findings.dedup_by(|a, b| a.rule_id == b.rule_id && a.path == b.path && a.message == b.message);

    let total = findings.len() as u32;

    // Suppression happens after evaluation so the audit view keeps the findings.
    let (suppressed, mut emitted): (Vec<Finding>, Vec<Finding>) = findings
        .into_iter()
        .partition(|f| cfg.is_suppressed(&f.rule_id, f.path.as_ref()));

    if emitted.len() > cfg.max_findings {
        emitted.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let verdict = compute_verdict(&emitted, cfg.fail_on);
    let mut counts = severity_counts(&emitted);
    counts.suppressed = suppressed.len() as u32;

    let data = ReviewData {
        profile: cfg.profile.clone(),
        items_scanned: snapshot.items.len() as u32,
        rules_run: prepared.len() as u32,
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    Ok(EvalReport {
        verdict,
        findings: emitted,
        suppressed,
        counts,
        truncated,
        data,
    })
}

fn rule_fault(rule_id: &str, item: &InterfaceItem) -> Finding {
    Finding {
        severity: Severity::Error,
        rule_id: ids::RULE_ENGINE_FAULT.to_string(),
        code: ids::CODE_RULE_PANIC.to_string(),
        message: format!("rule '{rule_id}' failed while checking '{}'", item.path),
        path: Some(item.path.clone()),
        help: Some("This is a bug in the named rule; the rest of the run completed.".to_string()),
        fingerprint: None,
        data: json!({ "rule": rule_id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemKind, Visibility};
    use crate::policy::{RulePolicy, Suppression};
    use crate::registry::RuleCategory;
    use crate::test_support::{
        bool_ty, config_all_rules, config_with_rule, function, item, module, param, sig, snapshot,
    };
    use apiguard_types::Verdict;

    #[test]
    fn boolean_parameter_scenario_fires_once_with_warning() {
        let snap = snapshot(vec![
            module("pkg", Visibility::Public),
            function(
                "pkg::render",
                Visibility::Public,
                sig(vec![param("compact", bool_ty())], None),
            ),
        ]);
        let registry = RuleRegistry::builtin();
        let cfg = config_all_rules();

        let report = evaluate(&snap, &registry, &cfg).expect("valid snapshot");
        let bool_findings: Vec<&Finding> = report
            .findings
            .iter()
            .filter(|f| f.rule_id == ids::RULE_API_BOOLEAN_PARAMETER)
            .collect();
        assert_eq!(bool_findings.len(), 1);
        assert_eq!(bool_findings[0].severity, Severity::Warning);
        assert_eq!(
            bool_findings[0].path.as_ref().expect("path").as_str(),
            "pkg::render"
        );
    }

    #[test]
    fn evaluation_is_deterministic_under_item_reordering() {
        let mut snap = snapshot(vec![
            module("pkg", Visibility::Public),
            function(
                "pkg::a",
                Visibility::Public,
                sig(vec![param("flag", bool_ty())], None),
            ),
            function(
                "pkg::b",
                Visibility::Public,
                sig(vec![param("flag", bool_ty())], None),
            ),
        ]);
        let registry = RuleRegistry::builtin();
        let cfg = config_all_rules();

        let first = evaluate(&snap, &registry, &cfg).expect("valid snapshot");
        snap.items.reverse();
        let second = evaluate(&snap, &registry, &cfg).expect("valid snapshot");

        assert_eq!(first.findings, second.findings);
        assert_eq!(first.counts, second.counts);
    }

    fn applies_to_functions(item: &InterfaceItem, _: &RuleContext<'_>) -> bool {
        item.is_function()
    }

    fn faulting_check(_: &InterfaceItem, _: &RuleContext<'_>) -> Vec<Finding> {
        panic!("synthetic fault for isolation testing")
    }

    #[test]
    fn faulting_rule_is_contained_per_item() {
        let snap = snapshot(vec![
            module("pkg", Visibility::Public),
            function(
                "pkg::a",
                Visibility::Public,
                sig(vec![param("flag", bool_ty())], None),
            ),
            function("pkg::b", Visibility::Public, sig(vec![], None)),
        ]);

        let mut registry = RuleRegistry::builtin();
        registry
            .register(Rule {
                id: "test.faulty",
                category: RuleCategory::Naming,
                default_severity: Severity::Warning,
                applies: applies_to_functions,
                check: faulting_check,
            })
            .expect("fresh id");

        let mut cfg = config_all_rules();
        cfg.rules
            .insert("test.faulty".to_string(), RulePolicy::enabled(Severity::Warning));

        let report = evaluate(&snap, &registry, &cfg).expect("valid snapshot");

        let faults: Vec<&Finding> = report
            .findings
            .iter()
            .filter(|f| f.rule_id == ids::RULE_ENGINE_FAULT)
            .collect();
        // Exactly one engine finding per applicable item.
        assert_eq!(faults.len(), 2);
        assert!(faults.iter().all(|f| f.severity == Severity::Error));
        assert!(faults.iter().all(|f| f.message.contains("test.faulty")));

        // Other rules still ran.
        assert!(
            report
                .findings
                .iter()
                .any(|f| f.rule_id == ids::RULE_API_BOOLEAN_PARAMETER)
        );
    }

    #[test]
    fn work_budget_truncates_and_marks_report() {
        let snap = snapshot(vec![
            module("pkg", Visibility::Public),
            function(
                "pkg::a",
                Visibility::Public,
                sig(vec![param("flag", bool_ty())], None),
            ),
            function(
                "pkg::b",
                Visibility::Public,
                sig(vec![param("flag", bool_ty())], None),
            ),
        ]);
        let registry = RuleRegistry::builtin();
        let mut cfg = config_all_rules();
        cfg.work_budget = Some(1);

        let report = evaluate(&snap, &registry, &cfg).expect("valid snapshot");
        assert!(report.truncated);
        assert!(
            report
                .data
                .truncated_reason
                .as_deref()
                .is_some_and(|r| r.contains("work budget"))
        );
    }

    #[test]
    fn suppressed_findings_move_to_audit_list_and_spare_the_verdict() {
        let mut unsafe_fn = item("pkg::unsafe_fn", ItemKind::Function, Visibility::Public);
        unsafe_fn.uses_low_level_escape = true;
        let snap = snapshot(vec![module("pkg", Visibility::Public), unsafe_fn]);

        let registry = RuleRegistry::builtin();
        let mut cfg = config_with_rule(ids::RULE_API_ESCAPE_HATCH, Severity::Error);
        cfg.suppressions.insert(Suppression {
            rule_id: ids::RULE_API_ESCAPE_HATCH.to_string(),
            path: "pkg::unsafe_fn".into(),
        });

        let report = evaluate(&snap, &registry, &cfg).expect("valid snapshot");
        assert!(report.findings.is_empty());
        assert_eq!(report.suppressed.len(), 1);
        assert_eq!(report.counts.suppressed, 1);
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn max_findings_truncation_is_recorded() {
        let mut items = vec![module("pkg", Visibility::Public)];
        for i in 0..5 {
            items.push(function(
                &format!("pkg::f{i}"),
                Visibility::Public,
                sig(vec![param("flag", bool_ty())], None),
            ));
        }
        let snap = snapshot(items);
        let registry = RuleRegistry::builtin();
        let mut cfg = config_with_rule(ids::RULE_API_BOOLEAN_PARAMETER, Severity::Warning);
        cfg.max_findings = 3;

        let report = evaluate(&snap, &registry, &cfg).expect("valid snapshot");
        assert_eq!(report.findings.len(), 3);
        assert_eq!(report.data.findings_total, 5);
        assert_eq!(report.data.findings_emitted, 3);
        assert!(
            report
                .data
                .truncated_reason
                .as_deref()
                .is_some_and(|r| r.contains("max_findings"))
        );
    }

    #[test]
    fn malformed_snapshot_aborts_before_evaluation() {
        let snap = snapshot(vec![
            module("pkg", Visibility::Public),
            item("pkg::f", ItemKind::Function, Visibility::Public),
            item("pkg::f", ItemKind::Constant, Visibility::Public),
        ]);
        let registry = RuleRegistry::builtin();
        let cfg = config_all_rules();
        assert!(matches!(
            evaluate(&snap, &registry, &cfg),
            Err(SnapshotParseError::DuplicatePath { .. })
        ));
    }

    #[test]
    fn disabled_rules_do_not_run() {
        let snap = snapshot(vec![
            module("pkg", Visibility::Public),
            function(
                "pkg::render",
                Visibility::Public,
                sig(vec![param("compact", bool_ty())], None),
            ),
        ]);
        let registry = RuleRegistry::builtin();
        let mut cfg = config_all_rules();
        cfg.rules
            .get_mut(ids::RULE_API_BOOLEAN_PARAMETER)
            .expect("catalog rule")
            .enabled = false;

        let report = evaluate(&snap, &registry, &cfg).expect("valid snapshot");
        assert!(
            report
                .findings
                .iter()
                .all(|f| f.rule_id != ids::RULE_API_BOOLEAN_PARAMETER)
        );
    }
}
