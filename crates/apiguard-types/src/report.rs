use crate::ItemPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Stable schema identifier for apiguard reports.
pub const SCHEMA_REPORT_V1: &str = "apiguard.report.v1";

/// Severity is intentionally small: it maps cleanly to CI signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub severity: Severity,
    pub rule_id: String,
    pub code: String,
    pub message: String,

    /// The interface item the finding is tied to. Absent for run-level findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<ItemPath>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Stable identifier intended for dedup and trending. Typically a hash of:
    /// `rule_id + code + item path + salient fields`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Rule-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

/// One classified difference between a baseline and a candidate surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityDelta {
    pub path: ItemPath,
    pub change: ChangeKind,
    pub impact: Impact,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    SignatureChanged,
    VisibilityNarrowed,
    VisibilityWidened,
    DeprecatedAdded,
    DeprecatedRemoved,
    FeatureGateChanged,
}

impl ChangeKind {
    /// The kind produced when the same edit is observed from the opposite
    /// direction. Kinds without a directional counterpart are self-inverse.
    pub fn inverse(self) -> ChangeKind {
        match self {
            ChangeKind::Added => ChangeKind::Removed,
            ChangeKind::Removed => ChangeKind::Added,
            ChangeKind::VisibilityNarrowed => ChangeKind::VisibilityWidened,
            ChangeKind::VisibilityWidened => ChangeKind::VisibilityNarrowed,
            ChangeKind::DeprecatedAdded => ChangeKind::DeprecatedRemoved,
            ChangeKind::DeprecatedRemoved => ChangeKind::DeprecatedAdded,
            other => other,
        }
    }
}

/// Semver-style impact of a single delta. Ordered so that `max` yields the
/// bump required for the whole change set.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    None,
    Patch,
    Minor,
    Major,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub info: u32,
    pub warning: u32,
    pub error: u32,
    pub suppressed: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Apiguard-specific summary payload for the report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewData {
    pub profile: String,

    pub items_scanned: u32,
    pub rules_run: u32,

    pub findings_total: u32,
    pub findings_emitted: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_reason: Option<String>,
}

/// A generic report envelope.
///
/// Keeping this generic allows apiguard to embed tool-specific data while still
/// enforcing a stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = ReviewData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub counts: SeverityCounts,
    pub has_blocking_findings: bool,
    /// A work budget stopped scheduling early; the report is not exhaustive.
    pub truncated: bool,
    /// Highest compatibility impact across all deltas. Absent without a baseline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_bump: Option<Impact>,
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deltas: Vec<CompatibilityDelta>,
    pub data: TData,
}

pub type ApiguardReport = ReportEnvelope<ReviewData>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kind_inverse_is_involutive() {
        let kinds = [
            ChangeKind::Added,
            ChangeKind::Removed,
            ChangeKind::SignatureChanged,
            ChangeKind::VisibilityNarrowed,
            ChangeKind::VisibilityWidened,
            ChangeKind::DeprecatedAdded,
            ChangeKind::DeprecatedRemoved,
            ChangeKind::FeatureGateChanged,
        ];
        for kind in kinds {
            assert_eq!(kind.inverse().inverse(), kind);
        }
    }

    #[test]
    fn impact_orders_by_required_bump() {
        assert!(Impact::Major > Impact::Minor);
        assert!(Impact::Minor > Impact::Patch);
        assert!(Impact::Patch > Impact::None);
        assert_eq!([Impact::Patch, Impact::Major, Impact::Minor].into_iter().max(), Some(Impact::Major));
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Warning).expect("serialize"), "\"warning\"");
        assert_eq!(serde_json::to_string(&ChangeKind::VisibilityNarrowed).expect("serialize"), "\"visibility_narrowed\"");
    }
}
