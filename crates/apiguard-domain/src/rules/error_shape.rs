use crate::fingerprint::fingerprint_for_item;
use crate::model::InterfaceItem;
use crate::registry::{Rule, RuleCategory, RuleContext};
use apiguard_types::{Finding, Severity, ids};
use serde_json::json;

pub fn rule() -> Rule {
    Rule {
        id: ids::RULE_API_ERROR_SHAPE,
        category: RuleCategory::ErrorHandling,
        default_severity: Severity::Error,
        applies,
        check,
    }
}

fn applies(item: &InterfaceItem, ctx: &RuleContext<'_>) -> bool {
    let fallible = item
        .signature
        .as_ref()
        .is_some_and(|sig| sig.error.is_some());
    item.is_function() && fallible && ctx.visibility.is_public(&item.path)
}

pub(super) fn check(item: &InterfaceItem, ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(error) = item.signature.as_ref().and_then(|sig| sig.error.as_ref()) else {
        return Vec::new();
    };
    if !error.textual {
        return Vec::new();
    }

    let fingerprint = fingerprint_for_item(
        ids::RULE_API_ERROR_SHAPE,
        ids::CODE_TEXTUAL_ERROR,
        item.path.as_str(),
        Some(&error.name),
    );
    vec![Finding {
        severity: ctx.policy.severity,
        rule_id: ids::RULE_API_ERROR_SHAPE.to_string(),
        code: ids::CODE_TEXTUAL_ERROR.to_string(),
        message: format!(
            "public fallible operation '{}' reports errors as unstructured text ({})",
            item.path, error.name
        ),
        path: Some(item.path.clone()),
        help: Some(
            "Introduce a named error classification (enum or kind-carrying struct) instead."
                .to_string(),
        ),
        fingerprint: Some(fingerprint),
        data: json!({
            "error_type": error.name,
        }),
    }]
}
