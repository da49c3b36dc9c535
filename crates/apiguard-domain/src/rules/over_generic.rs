use crate::fingerprint::fingerprint_for_item;
use crate::model::InterfaceItem;
use crate::registry::{Rule, RuleCategory, RuleContext};
use apiguard_types::{Finding, Severity, ids};
use serde_json::json;

pub fn rule() -> Rule {
    Rule {
        id: ids::RULE_SURFACE_OVER_GENERIC,
        category: RuleCategory::SurfaceMinimality,
        default_severity: Severity::Warning,
        applies,
        check,
    }
}

fn applies(item: &InterfaceItem, ctx: &RuleContext<'_>) -> bool {
    item.is_function() && item.signature.is_some() && ctx.visibility.is_public(&item.path)
}

/// Thresholds are caller-configured; with neither set this check is silent.
pub(super) fn check(item: &InterfaceItem, ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(sig) = item.signature.as_ref() else {
        return Vec::new();
    };
    let mut out = Vec::new();

    if let Some(max_params) = ctx.policy.max_params {
        let count = sig.params.len();
        if count > max_params as usize {
            let fingerprint = fingerprint_for_item(
                ids::RULE_SURFACE_OVER_GENERIC,
                ids::CODE_EXCESS_PARAMS,
                item.path.as_str(),
                None,
            );
            out.push(Finding {
                severity: ctx.policy.severity,
                rule_id: ids::RULE_SURFACE_OVER_GENERIC.to_string(),
                code: ids::CODE_EXCESS_PARAMS.to_string(),
                message: format!(
                    "public function '{}' takes {count} parameters (limit {max_params})",
                    item.path
                ),
                path: Some(item.path.clone()),
                help: Some(
                    "Group related parameters into a configuration struct or builder.".to_string(),
                ),
                fingerprint: Some(fingerprint),
                data: json!({
                    "params": count,
                    "max_params": max_params,
                }),
            });
        }
    }

    if let Some(max_bounds) = ctx.policy.max_generic_bounds {
        let count: usize = sig.generics.iter().map(|g| g.bounds.len()).sum();
        if count > max_bounds as usize {
            let fingerprint = fingerprint_for_item(
                ids::RULE_SURFACE_OVER_GENERIC,
                ids::CODE_EXCESS_GENERIC_BOUNDS,
                item.path.as_str(),
                None,
            );
            out.push(Finding {
                severity: ctx.policy.severity,
                rule_id: ids::RULE_SURFACE_OVER_GENERIC.to_string(),
                code: ids::CODE_EXCESS_GENERIC_BOUNDS.to_string(),
                message: format!(
                    "public function '{}' carries {count} generic bounds (limit {max_bounds})",
                    item.path
                ),
                path: Some(item.path.clone()),
                help: Some(
                    "Prefer a few meaningful bounds; consider concrete types at the surface."
                        .to_string(),
                ),
                fingerprint: Some(fingerprint),
                data: json!({
                    "generic_bounds": count,
                    "max_generic_bounds": max_bounds,
                }),
            });
        }
    }

    out
}
