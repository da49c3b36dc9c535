use crate::fingerprint::fingerprint_for_item;
use crate::model::InterfaceItem;
use crate::registry::{Rule, RuleCategory, RuleContext};
use apiguard_types::{Finding, Severity, ids};
use serde_json::json;

pub fn rule() -> Rule {
    Rule {
        id: ids::RULE_API_BOOLEAN_PARAMETER,
        category: RuleCategory::Naming,
        default_severity: Severity::Warning,
        applies,
        check,
    }
}

fn applies(item: &InterfaceItem, ctx: &RuleContext<'_>) -> bool {
    item.is_function() && item.signature.is_some() && ctx.visibility.is_public(&item.path)
}

pub(super) fn check(item: &InterfaceItem, ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(sig) = item.signature.as_ref() else {
        return Vec::new();
    };
    let mut out = Vec::new();

    for param in &sig.params {
        if !param.ty.two_valued {
            continue;
        }
        let fingerprint = fingerprint_for_item(
            ids::RULE_API_BOOLEAN_PARAMETER,
            ids::CODE_BOOL_PARAM,
            item.path.as_str(),
            Some(&param.name),
        );
        out.push(Finding {
            severity: ctx.policy.severity,
            rule_id: ids::RULE_API_BOOLEAN_PARAMETER.to_string(),
            code: ids::CODE_BOOL_PARAM.to_string(),
            message: format!(
                "public function '{}' takes two-valued parameter '{}'",
                item.path, param.name
            ),
            path: Some(item.path.clone()),
            help: Some(
                "Replace the boolean with a dedicated enum so the call site names the behavior."
                    .to_string(),
            ),
            fingerprint: Some(fingerprint),
            data: json!({
                "parameter": param.name,
                "type": param.ty.name,
            }),
        });
    }

    out
}
