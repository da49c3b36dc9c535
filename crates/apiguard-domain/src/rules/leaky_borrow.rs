use crate::fingerprint::fingerprint_for_item;
use crate::model::InterfaceItem;
use crate::registry::{Rule, RuleCategory, RuleContext};
use apiguard_types::{Finding, Severity, ids};
use serde_json::json;

pub fn rule() -> Rule {
    Rule {
        id: ids::RULE_API_LEAKY_BORROW,
        category: RuleCategory::SurfaceMinimality,
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
    // A borrow note on the signature justifies every exposed borrow in it.
    if sig.borrow_note.as_deref().is_some_and(|n| !n.trim().is_empty()) {
        return Vec::new();
    }

    let mut out = Vec::new();

    for param in &sig.params {
        if let Some(lifetime) = param.ty.borrowed.as_deref() {
            out.push(borrow_finding(item, ctx, &param.name, &param.ty.name, lifetime));
        }
    }
    if let Some(ret) = sig.ret.as_ref() {
        if let Some(lifetime) = ret.borrowed.as_deref() {
            out.push(borrow_finding(item, ctx, "return value", &ret.name, lifetime));
        }
    }

    out
}

fn borrow_finding(
    item: &InterfaceItem,
    ctx: &RuleContext<'_>,
    descriptor: &str,
    type_name: &str,
    lifetime: &str,
) -> Finding {
    let fingerprint = fingerprint_for_item(
        ids::RULE_API_LEAKY_BORROW,
        ids::CODE_UNJUSTIFIED_BORROW,
        item.path.as_str(),
        Some(descriptor),
    );
    Finding {
        severity: ctx.policy.severity,
        rule_id: ids::RULE_API_LEAKY_BORROW.to_string(),
        code: ids::CODE_UNJUSTIFIED_BORROW.to_string(),
        message: format!(
            "public function '{}' exposes a borrow-scoped reference ({descriptor}) without justification",
            item.path
        ),
        path: Some(item.path.clone()),
        help: Some(
            "Return owned data, or record a borrow justification note on the signature.".to_string(),
        ),
        fingerprint: Some(fingerprint),
        data: json!({
            "descriptor": descriptor,
            "type": type_name,
            "lifetime": lifetime,
        }),
    }
}
