use crate::fingerprint::fingerprint_for_item;
use crate::model::InterfaceItem;
use crate::registry::{Rule, RuleCategory, RuleContext};
use crate::rules::utils::is_match;
use apiguard_types::{Finding, Severity, ids};
use serde_json::json;

pub fn rule() -> Rule {
    Rule {
        id: ids::RULE_FEATURES_HYGIENE,
        category: RuleCategory::FeatureHygiene,
        default_severity: Severity::Warning,
        applies,
        check,
    }
}

fn applies(item: &InterfaceItem, _ctx: &RuleContext<'_>) -> bool {
    item.feature_gate.is_some()
}

pub(super) fn check(item: &InterfaceItem, ctx: &RuleContext<'_>) -> Vec<Finding> {
    let Some(gate) = item.feature_gate.as_ref() else {
        return Vec::new();
    };
    let mut out = Vec::new();

    for capability in gate.referenced_flags() {
        match ctx.snapshot.features.get(&capability) {
            None => {
                let fingerprint = fingerprint_for_item(
                    ids::RULE_FEATURES_HYGIENE,
                    ids::CODE_UNDECLARED_CAPABILITY,
                    item.path.as_str(),
                    Some(&capability),
                );
                out.push(Finding {
                    severity: ctx.policy.severity,
                    rule_id: ids::RULE_FEATURES_HYGIENE.to_string(),
                    code: ids::CODE_UNDECLARED_CAPABILITY.to_string(),
                    message: format!(
                        "'{}' is gated on capability '{capability}' which is not declared in the feature universe",
                        item.path
                    ),
                    path: Some(item.path.clone()),
                    help: Some(
                        "Declare the capability in the feature universe, or fix the gate expression."
                            .to_string(),
                    ),
                    fingerprint: Some(fingerprint),
                    data: json!({
                        "capability": capability,
                        "gate": gate.render(),
                    }),
                });
            }
            Some(true) => {
                // Intentionally default-on capabilities are acknowledged via the allow list.
                if is_match(ctx.allow, &capability) {
                    continue;
                }
                let fingerprint = fingerprint_for_item(
                    ids::RULE_FEATURES_HYGIENE,
                    ids::CODE_ACCIDENTAL_DEFAULT_ON,
                    item.path.as_str(),
                    Some(&capability),
                );
                out.push(Finding {
                    severity: ctx.policy.severity,
                    rule_id: ids::RULE_FEATURES_HYGIENE.to_string(),
                    code: ids::CODE_ACCIDENTAL_DEFAULT_ON.to_string(),
                    message: format!(
                        "'{}' is gated on default-on capability '{capability}' not acknowledged by the allow list",
                        item.path
                    ),
                    path: Some(item.path.clone()),
                    help: Some(
                        "Add the capability to the rule's allow list if default-on is deliberate."
                            .to_string(),
                    ),
                    fingerprint: Some(fingerprint),
                    data: json!({
                        "capability": capability,
                        "gate": gate.render(),
                    }),
                });
            }
            Some(false) => {}
        }
    }

    out
}
