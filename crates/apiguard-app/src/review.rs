//! The `review` use case: evaluate policy, optionally diff, produce a report.

use anyhow::Context;
use apiguard_domain::diff;
use apiguard_domain::model::Snapshot;
use apiguard_domain::registry::RuleRegistry;
use apiguard_domain::report::{self, ReviewReport};
use apiguard_settings::{Overrides, ResolvedConfig};
use apiguard_types::{ApiguardReport, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use time::OffsetDateTime;

/// Input for the review use case.
#[derive(Clone, Debug)]
pub struct ReviewInput<'a> {
    /// The surface under review.
    pub snapshot: &'a Snapshot,
    /// Baseline surface; present iff diff mode is requested.
    pub baseline: Option<&'a Snapshot>,
    /// The rule registry to evaluate; shared read-only across runs.
    pub registry: &'a RuleRegistry,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Caller overrides.
    pub overrides: Overrides,
}

/// Output from the review use case.
#[derive(Clone, Debug)]
pub struct ReviewOutput {
    /// The versioned envelope for presentation collaborators.
    pub envelope: ApiguardReport,
    /// The full in-memory report, including the suppressed/audit view.
    pub review: ReviewReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the review use case: resolve config, evaluate the snapshot, diff
/// against the baseline when present, aggregate into one envelope.
pub fn run_review(input: ReviewInput<'_>) -> anyhow::Result<ReviewOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        apiguard_settings::ApiguardConfigV1::default()
    } else {
        apiguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = apiguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let eval = apiguard_domain::evaluate(input.snapshot, input.registry, &resolved.effective)
        .context("evaluate snapshot")?;

    let diff_report = match input.baseline {
        Some(baseline) => Some(
            diff::diff(baseline, input.snapshot, &resolved.effective)
                .context("diff against baseline")?,
        ),
        None => None,
    };

    let review = report::aggregate(eval, diff_report, &resolved.effective);
    let finished_at = OffsetDateTime::now_utc();

    let envelope = ApiguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "apiguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        verdict: review.verdict,
        counts: review.counts.clone(),
        has_blocking_findings: review.has_blocking_findings,
        truncated: review.truncated,
        required_bump: review.required_bump,
        findings: review.findings.clone(),
        deltas: review.deltas.clone(),
        data: review.data.clone(),
    };

    Ok(ReviewOutput {
        envelope,
        review,
        resolved_config: resolved,
    })
}

/// Serialize the envelope to its canonical machine-readable form.
pub fn serialize_report(report: &ApiguardReport) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(report).context("serialize report")?;
    json.push('\n');
    Ok(json)
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiguard_domain::model::{
        InterfaceItem, ItemKind, ParamDesc, Signature, TypeDesc, Visibility,
    };
    use apiguard_types::{Impact, ItemPath, Severity, ids};
    use std::collections::BTreeMap;

    fn item(path: &str, kind: ItemKind, visibility: Visibility) -> InterfaceItem {
        InterfaceItem {
            path: ItemPath::new(path),
            kind,
            visibility,
            signature: None,
            deprecated: None,
            feature_gate: None,
            has_documented_contract: true,
            uses_low_level_escape: false,
            escape_justification: None,
        }
    }

    fn snapshot(version: &str, items: Vec<InterfaceItem>) -> Snapshot {
        Snapshot {
            library: "pkg".to_string(),
            version: version.to_string(),
            items,
            features: BTreeMap::new(),
        }
    }

    fn review(
        snapshot: &Snapshot,
        baseline: Option<&Snapshot>,
        config_text: &str,
    ) -> ReviewOutput {
        let registry = RuleRegistry::builtin();
        run_review(ReviewInput {
            snapshot,
            baseline,
            registry: &registry,
            config_text,
            overrides: Overrides::default(),
        })
        .expect("run_review")
    }

    #[test]
    fn clean_snapshot_passes_with_defaults() {
        let snap = snapshot(
            "1.0.0",
            vec![
                item("pkg", ItemKind::Module, Visibility::Public),
                item("pkg::open", ItemKind::Function, Visibility::Public),
            ],
        );
        let out = review(&snap, None, "");

        assert_eq!(out.resolved_config.effective.profile, "strict");
        assert_eq!(out.envelope.schema, SCHEMA_REPORT_V1);
        assert_eq!(out.envelope.verdict, Verdict::Pass);
        assert!(!out.envelope.has_blocking_findings);
        assert!(out.envelope.required_bump.is_none());
    }

    #[test]
    fn narrowed_visibility_blocks_the_review() {
        let old = snapshot(
            "1.0.0",
            vec![
                item("pkg", ItemKind::Module, Visibility::Public),
                item("pkg::foo", ItemKind::Function, Visibility::Public),
            ],
        );
        let new = snapshot(
            "1.1.0",
            vec![
                item("pkg", ItemKind::Module, Visibility::Public),
                item("pkg::foo", ItemKind::Function, Visibility::Crate),
            ],
        );

        let out = review(&new, Some(&old), "");
        assert!(out.envelope.has_blocking_findings);
        assert_eq!(out.envelope.verdict, Verdict::Fail);
        assert_eq!(out.envelope.required_bump, Some(Impact::Major));
        assert_eq!(verdict_exit_code(out.envelope.verdict), 2);

        let compat: Vec<_> = out
            .review
            .findings
            .iter()
            .filter(|f| f.rule_id == ids::RULE_COMPAT_SURFACE)
            .collect();
        assert_eq!(compat.len(), 1);
        assert_eq!(compat[0].code, ids::CODE_VISIBILITY_NARROWED);
        assert_eq!(compat[0].severity, Severity::Error);
    }

    #[test]
    fn added_public_item_warns_without_blocking() {
        let old = snapshot(
            "1.0.0",
            vec![item("pkg", ItemKind::Module, Visibility::Public)],
        );
        let new = snapshot(
            "1.1.0",
            vec![
                item("pkg", ItemKind::Module, Visibility::Public),
                item("pkg::bar", ItemKind::Function, Visibility::Public),
            ],
        );

        let out = review(&new, Some(&old), "");
        assert!(!out.envelope.has_blocking_findings);
        assert_eq!(out.envelope.required_bump, Some(Impact::Minor));
        assert_eq!(verdict_exit_code(out.envelope.verdict), 0);
        assert!(
            out.review
                .findings
                .iter()
                .any(|f| f.code == ids::CODE_ITEM_ADDED && f.severity == Severity::Warning)
        );
    }

    #[test]
    fn suppressed_finding_moves_to_audit_view() {
        let mut unsafe_fn = item("pkg::unsafe_fn", ItemKind::Function, Visibility::Public);
        unsafe_fn.uses_low_level_escape = true;
        let snap = snapshot(
            "1.0.0",
            vec![item("pkg", ItemKind::Module, Visibility::Public), unsafe_fn],
        );

        let config = r#"
[[suppress]]
rule = "api.escape_hatch"
path = "pkg::unsafe_fn"
"#;
        let out = review(&snap, None, config);

        assert!(!out.envelope.has_blocking_findings);
        assert!(
            out.review
                .findings
                .iter()
                .all(|f| f.rule_id != ids::RULE_API_ESCAPE_HATCH)
        );
        // The audit view still carries it.
        assert!(
            out.review
                .audit_view()
                .iter()
                .any(|f| f.rule_id == ids::RULE_API_ESCAPE_HATCH)
        );
        assert_eq!(out.envelope.counts.suppressed, 1);
    }

    #[test]
    fn malformed_snapshot_surfaces_the_offending_path() {
        let snap = snapshot(
            "1.0.0",
            vec![
                item("pkg", ItemKind::Module, Visibility::Public),
                item("pkg::dup", ItemKind::Function, Visibility::Public),
                item("pkg::dup", ItemKind::Constant, Visibility::Public),
            ],
        );
        let registry = RuleRegistry::builtin();
        let err = run_review(ReviewInput {
            snapshot: &snap,
            baseline: None,
            registry: &registry,
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect_err("duplicate path must fail");
        assert!(format!("{err:#}").contains("pkg::dup"));
    }

    #[test]
    fn bool_param_finding_lands_in_the_envelope() {
        let mut render = item("pkg::render", ItemKind::Function, Visibility::Public);
        render.signature = Some(Signature {
            params: vec![ParamDesc {
                name: "compact".to_string(),
                ty: TypeDesc {
                    name: "bool".to_string(),
                    two_valued: true,
                    ..TypeDesc::default()
                },
                has_default: false,
            }],
            generics: Vec::new(),
            ret: None,
            error: None,
            borrow_note: None,
        });
        let snap = snapshot(
            "1.0.0",
            vec![item("pkg", ItemKind::Module, Visibility::Public), render],
        );

        let out = review(&snap, None, "");
        assert!(
            out.envelope
                .findings
                .iter()
                .any(|f| f.code == ids::CODE_BOOL_PARAM)
        );

        let serialized = serialize_report(&out.envelope).expect("serializes");
        assert!(serialized.contains("\"schema\": \"apiguard.report.v1\""));
        assert!(serialized.contains(ids::CODE_BOOL_PARAM));
    }

    #[test]
    fn verdict_exit_codes() {
        assert_eq!(verdict_exit_code(Verdict::Pass), 0);
        assert_eq!(verdict_exit_code(Verdict::Warn), 0);
        assert_eq!(verdict_exit_code(Verdict::Fail), 2);
    }
}
