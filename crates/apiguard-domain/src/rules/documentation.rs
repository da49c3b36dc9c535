use crate::fingerprint::fingerprint_for_item;
use crate::model::InterfaceItem;
use crate::registry::{Rule, RuleCategory, RuleContext};
use apiguard_types::{Finding, Severity, ids};
use serde_json::json;

pub fn rule() -> Rule {
    Rule {
        id: ids::RULE_DOCS_CONTRACT,
        category: RuleCategory::Documentation,
        default_severity: Severity::Warning,
        applies,
        check,
    }
}

fn applies(item: &InterfaceItem, ctx: &RuleContext<'_>) -> bool {
    ctx.visibility.is_public(&item.path)
}

pub(super) fn check(item: &InterfaceItem, ctx: &RuleContext<'_>) -> Vec<Finding> {
    if item.has_documented_contract {
        return Vec::new();
    }

    let fingerprint = fingerprint_for_item(
        ids::RULE_DOCS_CONTRACT,
        ids::CODE_MISSING_CONTRACT,
        item.path.as_str(),
        None,
    );
    vec![Finding {
        severity: ctx.policy.severity,
        rule_id: ids::RULE_DOCS_CONTRACT.to_string(),
        code: ids::CODE_MISSING_CONTRACT.to_string(),
        message: format!("public item '{}' has no documented contract", item.path),
        path: Some(item.path.clone()),
        help: Some(
            "Document what the item guarantees: inputs, outputs, errors, and caller obligations."
                .to_string(),
        ),
        fingerprint: Some(fingerprint),
        data: json!({
            "kind": format!("{:?}", item.kind),
        }),
    }]
}
