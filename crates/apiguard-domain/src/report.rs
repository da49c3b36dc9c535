//! Report shapes and the aggregation step that merges evaluator findings
//! with compatibility deltas into one ordered, deduplicated report.

use crate::diff::{DiffReport, RenameCandidate};
use crate::fingerprint::fingerprint_for_item;
use crate::policy::{EffectiveConfig, FailOn};
use crate::registry::RuleCategory;
use apiguard_types::{
    ChangeKind, CompatibilityDelta, Finding, Impact, ReviewData, Severity, SeverityCounts, Verdict,
    ids,
};
use serde_json::json;

/// Output of one evaluator pass over a single snapshot.
#[derive(Clone, Debug)]
pub struct EvalReport {
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    /// Findings removed by caller suppressions; retained for the audit view.
    pub suppressed: Vec<Finding>,
    pub counts: SeverityCounts,
    /// A work budget stopped scheduling early; not exhaustive.
    pub truncated: bool,
    pub data: ReviewData,
}

/// The merged report consumed by presentation collaborators.
#[derive(Clone, Debug)]
pub struct ReviewReport {
    pub verdict: Verdict,
    /// True iff any unsuppressed error-severity finding exists.
    pub has_blocking_findings: bool,
    pub findings: Vec<Finding>,
    pub suppressed: Vec<Finding>,
    pub deltas: Vec<CompatibilityDelta>,
    pub counts: SeverityCounts,
    pub truncated: bool,
    /// Highest impact across all deltas. Absent without a baseline.
    pub required_bump: Option<Impact>,
    pub data: ReviewData,
}

impl ReviewReport {
    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    pub fn by_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.rule_id == rule_id)
    }

    /// Filter view by rule category. Synthetic findings resolve through
    /// their reserved categories (`engine.*`, `compat.*`).
    pub fn by_category<'a>(
        &'a self,
        registry: &'a crate::registry::RuleRegistry,
        category: RuleCategory,
    ) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| {
            let found = match registry.get(&f.rule_id) {
                Some(rule) => rule.category,
                None if f.rule_id == ids::RULE_ENGINE_FAULT => RuleCategory::Engine,
                None if f.rule_id == ids::RULE_COMPAT_SURFACE => RuleCategory::Compatibility,
                None => return false,
            };
            found == category
        })
    }

    /// The default view plus suppressed findings, in report order.
    pub fn audit_view(&self) -> Vec<&Finding> {
        let mut all: Vec<&Finding> = self.findings.iter().chain(self.suppressed.iter()).collect();
        all.sort_by(|a, b| compare_findings(a, b));
        all
    }
}

/// Merge an evaluator report and an optional diff report.
///
/// Deltas become findings under `compat.surface` with severity derived from
/// impact (major -> error, minor -> warning, patch/none -> info). Suppressions
/// apply to compatibility findings the same way they apply to rule findings.
pub fn aggregate(
    eval: EvalReport,
    diff: Option<DiffReport>,
    cfg: &EffectiveConfig,
) -> ReviewReport {
    let mut findings = eval.findings;
    let mut suppressed = eval.suppressed;
    let mut deltas = Vec::new();
    let mut required_bump = None;
    let mut truncated = eval.truncated;
    let mut data = eval.data;

    if let Some(diff_report) = diff {
        let mut compat: Vec<Finding> =
            diff_report.deltas.iter().map(delta_finding).collect();
        compat.extend(diff_report.renames.iter().map(rename_finding));
        data.findings_total += compat.len() as u32;

        for finding in compat {
            if cfg.is_suppressed(&finding.rule_id, finding.path.as_ref()) {
                suppressed.push(finding);
            } else {
                findings.push(finding);
            }
        }

        required_bump = Some(diff_report.required_bump);
        truncated = truncated || diff_report.truncated;
        deltas = diff_report.deltas;
    }

    findings.sort_by(compare_findings);
    suppressed.sort_by(compare_findings);

    if findings.len() > cfg.max_findings {
        findings.truncate(cfg.max_findings);
        data.truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }
    data.findings_emitted = findings.len() as u32;

    let mut counts = severity_counts(&findings);
    counts.suppressed = suppressed.len() as u32;
    let verdict = compute_verdict(&findings, cfg.fail_on);

    ReviewReport {
        verdict,
        has_blocking_findings: counts.error > 0,
        findings,
        suppressed,
        deltas,
        counts,
        truncated,
        required_bump,
        data,
    }
}

pub(crate) fn severity_counts(findings: &[Finding]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for f in findings {
        match f.severity {
            Severity::Info => counts.info += 1,
            Severity::Warning => counts.warning += 1,
            Severity::Error => counts.error += 1,
        }
    }
    counts
}

pub(crate) fn compute_verdict(findings: &[Finding], fail_on: FailOn) -> Verdict {
    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    if has_error {
        return Verdict::Fail;
    }

    let has_warn = findings.iter().any(|f| f.severity == Severity::Warning);
    if has_warn {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}

pub(crate) fn compare_findings(a: &Finding, b: &Finding) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) severity (error -> warning -> info)
    // 2) item path (missing last)
    // 3) rule_id
    // 4) code
    // 5) message
    let severity_rank = |sev: Severity| match sev {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    };
    let ap = a.path.as_ref().map(|p| p.as_str()).unwrap_or("~");
    let bp = b.path.as_ref().map(|p| p.as_str()).unwrap_or("~");

    severity_rank(a.severity)
        .cmp(&severity_rank(b.severity))
        .then(ap.cmp(bp))
        .then(a.rule_id.cmp(&b.rule_id))
        .then(a.code.cmp(&b.code))
        .then(a.message.cmp(&b.message))
}

fn delta_finding(delta: &CompatibilityDelta) -> Finding {
    let severity = match delta.impact {
        Impact::Major => Severity::Error,
        Impact::Minor => Severity::Warning,
        Impact::Patch | Impact::None => Severity::Info,
    };
    let code = delta_code(delta.change);
    let fingerprint = fingerprint_for_item(
        ids::RULE_COMPAT_SURFACE,
        code,
        delta.path.as_str(),
        None,
    );
    Finding {
        severity,
        rule_id: ids::RULE_COMPAT_SURFACE.to_string(),
        code: code.to_string(),
        message: format!("'{}' {}", delta.path, describe_change(delta.change)),
        path: Some(delta.path.clone()),
        help: None,
        fingerprint: Some(fingerprint),
        data: json!({
            "change": delta.change,
            "impact": delta.impact,
        }),
    }
}

fn rename_finding(candidate: &RenameCandidate) -> Finding {
    let fingerprint = fingerprint_for_item(
        ids::RULE_COMPAT_SURFACE,
        ids::CODE_RENAME_CANDIDATE,
        candidate.removed.as_str(),
        Some(candidate.added.as_str()),
    );
    Finding {
        severity: Severity::Info,
        rule_id: ids::RULE_COMPAT_SURFACE.to_string(),
        code: ids::CODE_RENAME_CANDIDATE.to_string(),
        message: format!(
            "'{}' was removed while structurally similar '{}' was added; possible rename",
            candidate.removed, candidate.added
        ),
        path: Some(candidate.removed.clone()),
        help: Some(
            "Decide whether this is a rename; the engine never merges the pair on its own."
                .to_string(),
        ),
        fingerprint: Some(fingerprint),
        data: json!({
            "removed": candidate.removed.as_str(),
            "added": candidate.added.as_str(),
        }),
    }
}

fn delta_code(change: ChangeKind) -> &'static str {
    match change {
        ChangeKind::Added => ids::CODE_ITEM_ADDED,
        ChangeKind::Removed => ids::CODE_ITEM_REMOVED,
        ChangeKind::SignatureChanged => ids::CODE_SIGNATURE_CHANGED,
        ChangeKind::VisibilityNarrowed => ids::CODE_VISIBILITY_NARROWED,
        ChangeKind::VisibilityWidened => ids::CODE_VISIBILITY_WIDENED,
        ChangeKind::DeprecatedAdded => ids::CODE_DEPRECATED_ADDED,
        ChangeKind::DeprecatedRemoved => ids::CODE_DEPRECATED_REMOVED,
        ChangeKind::FeatureGateChanged => ids::CODE_FEATURE_GATE_CHANGED,
    }
}

fn describe_change(change: ChangeKind) -> &'static str {
    match change {
        ChangeKind::Added => "was added to the surface",
        ChangeKind::Removed => "was removed from the surface",
        ChangeKind::SignatureChanged => "changed its signature",
        ChangeKind::VisibilityNarrowed => "is no longer publicly reachable",
        ChangeKind::VisibilityWidened => "became publicly reachable",
        ChangeKind::DeprecatedAdded => "gained a deprecation marker",
        ChangeKind::DeprecatedRemoved => "lost its deprecation marker",
        ChangeKind::FeatureGateChanged => "changed its feature gate",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiguard_types::ItemPath;

    fn finding(severity: Severity, rule_id: &str, path: &str) -> Finding {
        Finding {
            severity,
            rule_id: rule_id.to_string(),
            code: "c".to_string(),
            message: format!("{rule_id} at {path}"),
            path: Some(ItemPath::new(path)),
            help: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }
    }

    #[test]
    fn verdict_policy() {
        let warn = vec![finding(Severity::Warning, "r", "p")];
        assert_eq!(compute_verdict(&warn, FailOn::Error), Verdict::Warn);
        assert_eq!(compute_verdict(&warn, FailOn::Warning), Verdict::Fail);

        let err = vec![finding(Severity::Error, "r", "p")];
        assert_eq!(compute_verdict(&err, FailOn::Error), Verdict::Fail);
        assert_eq!(compute_verdict(&[], FailOn::Warning), Verdict::Pass);
    }

    #[test]
    fn findings_order_by_severity_then_path_then_rule() {
        let mut findings = vec![
            finding(Severity::Info, "b.rule", "pkg::a"),
            finding(Severity::Error, "z.rule", "pkg::z"),
            finding(Severity::Error, "a.rule", "pkg::a"),
            finding(Severity::Warning, "a.rule", "pkg::m"),
        ];
        findings.sort_by(compare_findings);
        let order: Vec<(Severity, &str)> = findings
            .iter()
            .map(|f| (f.severity, f.path.as_ref().expect("path").as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Severity::Error, "pkg::a"),
                (Severity::Error, "pkg::z"),
                (Severity::Warning, "pkg::m"),
                (Severity::Info, "pkg::a"),
            ]
        );
    }

    #[test]
    fn delta_findings_map_impact_to_severity() {
        let major = delta_finding(&CompatibilityDelta {
            path: ItemPath::new("pkg::gone"),
            change: ChangeKind::Removed,
            impact: Impact::Major,
        });
        assert_eq!(major.severity, Severity::Error);
        assert_eq!(major.code, ids::CODE_ITEM_REMOVED);

        let minor = delta_finding(&CompatibilityDelta {
            path: ItemPath::new("pkg::fresh"),
            change: ChangeKind::Added,
            impact: Impact::Minor,
        });
        assert_eq!(minor.severity, Severity::Warning);

        let patch = delta_finding(&CompatibilityDelta {
            path: ItemPath::new("pkg::kept"),
            change: ChangeKind::DeprecatedRemoved,
            impact: Impact::Patch,
        });
        assert_eq!(patch.severity, Severity::Info);
    }
}
