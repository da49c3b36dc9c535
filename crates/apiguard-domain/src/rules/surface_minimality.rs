use crate::fingerprint::fingerprint_for_item;
use crate::model::InterfaceItem;
use crate::registry::{Rule, RuleCategory, RuleContext};
use crate::rules::utils::is_match;
use apiguard_types::{Finding, Severity, ids};
use serde_json::json;

pub fn rule() -> Rule {
    Rule {
        id: ids::RULE_SURFACE_MINIMALITY,
        category: RuleCategory::SurfaceMinimality,
        default_severity: Severity::Error,
        applies,
        check,
    }
}

fn applies(item: &InterfaceItem, ctx: &RuleContext<'_>) -> bool {
    ctx.visibility.is_public(&item.path)
}

pub(super) fn check(item: &InterfaceItem, ctx: &RuleContext<'_>) -> Vec<Finding> {
    if !is_match(ctx.patterns, item.path.as_str()) {
        return Vec::new();
    }

    let fingerprint = fingerprint_for_item(
        ids::RULE_SURFACE_MINIMALITY,
        ids::CODE_INTERNAL_PATTERN_EXPORTED,
        item.path.as_str(),
        None,
    );
    vec![Finding {
        severity: ctx.policy.severity,
        rule_id: ids::RULE_SURFACE_MINIMALITY.to_string(),
        code: ids::CODE_INTERNAL_PATTERN_EXPORTED.to_string(),
        message: format!(
            "'{}' is publicly reachable but matches an internal-only pattern",
            item.path
        ),
        path: Some(item.path.clone()),
        help: Some(
            "Reduce the item's visibility, or remove the matching pattern if the export is deliberate."
                .to_string(),
        ),
        fingerprint: Some(fingerprint),
        data: json!({
            "path": item.path.as_str(),
        }),
    }]
}
