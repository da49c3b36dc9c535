use crate::fingerprint::fingerprint_for_item;
use crate::model::InterfaceItem;
use crate::registry::{Rule, RuleCategory, RuleContext};
use apiguard_types::{Finding, Severity, ids};
use serde_json::json;

pub fn rule() -> Rule {
    Rule {
        id: ids::RULE_API_ESCAPE_HATCH,
        category: RuleCategory::EscapeHatch,
        default_severity: Severity::Error,
        applies,
        check,
    }
}

fn applies(item: &InterfaceItem, _ctx: &RuleContext<'_>) -> bool {
    item.uses_low_level_escape
}

pub(super) fn check(item: &InterfaceItem, ctx: &RuleContext<'_>) -> Vec<Finding> {
    let justified = item
        .escape_justification
        .as_deref()
        .is_some_and(|j| !j.trim().is_empty());
    if justified {
        return Vec::new();
    }

    let fingerprint = fingerprint_for_item(
        ids::RULE_API_ESCAPE_HATCH,
        ids::CODE_MISSING_JUSTIFICATION,
        item.path.as_str(),
        None,
    );
    vec![Finding {
        severity: ctx.policy.severity,
        rule_id: ids::RULE_API_ESCAPE_HATCH.to_string(),
        code: ids::CODE_MISSING_JUSTIFICATION.to_string(),
        message: format!(
            "'{}' bypasses normal safety guarantees without a recorded justification",
            item.path
        ),
        path: Some(item.path.clone()),
        help: Some(
            "Document why the escape is needed and what invariant the caller must uphold."
                .to_string(),
        ),
        fingerprint: Some(fingerprint),
        data: json!({
            "path": item.path.as_str(),
        }),
    }]
}
