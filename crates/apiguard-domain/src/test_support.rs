//! Shared fixture builders for domain tests.

use crate::model::{
    InterfaceItem, ItemKind, ParamDesc, Signature, Snapshot, TypeDesc, Visibility,
};
use crate::policy::{EffectiveConfig, FailOn, RulePolicy};
use apiguard_types::{ItemPath, Severity};
use std::collections::{BTreeMap, BTreeSet};

pub fn item(path: &str, kind: ItemKind, visibility: Visibility) -> InterfaceItem {
    InterfaceItem {
        path: ItemPath::new(path),
        kind,
        visibility,
        signature: None,
        deprecated: None,
        feature_gate: None,
        // Documented by default so unrelated fixtures stay quiet under docs.contract.
        has_documented_contract: true,
        uses_low_level_escape: false,
        escape_justification: None,
    }
}

pub fn module(path: &str, visibility: Visibility) -> InterfaceItem {
    item(path, ItemKind::Module, visibility)
}

pub fn function(path: &str, visibility: Visibility, sig: Signature) -> InterfaceItem {
    let mut it = item(path, ItemKind::Function, visibility);
    it.signature = Some(sig);
    it
}

pub fn snapshot(items: Vec<InterfaceItem>) -> Snapshot {
    Snapshot {
        library: "fixture".to_string(),
        version: "0.1.0".to_string(),
        items,
        features: BTreeMap::new(),
    }
}

pub fn snapshot_with_features(items: Vec<InterfaceItem>, features: &[(&str, bool)]) -> Snapshot {
    let mut snap = snapshot(items);
    snap.features = features
        .iter()
        .map(|(name, on)| (name.to_string(), *on))
        .collect();
    snap
}

pub fn sig(params: Vec<ParamDesc>, ret: Option<TypeDesc>) -> Signature {
    Signature {
        params,
        generics: Vec::new(),
        ret,
        error: None,
        borrow_note: None,
    }
}

pub fn param(name: &str, ty: TypeDesc) -> ParamDesc {
    ParamDesc {
        name: name.to_string(),
        ty,
        has_default: false,
    }
}

pub fn named_ty(name: &str) -> TypeDesc {
    TypeDesc {
        name: name.to_string(),
        ..TypeDesc::default()
    }
}

pub fn bool_ty() -> TypeDesc {
    TypeDesc {
        name: "bool".to_string(),
        two_valued: true,
        ..TypeDesc::default()
    }
}

pub fn text_ty(name: &str) -> TypeDesc {
    TypeDesc {
        name: name.to_string(),
        textual: true,
        ..TypeDesc::default()
    }
}

pub fn borrowed_ty(name: &str, lifetime: &str) -> TypeDesc {
    TypeDesc {
        name: name.to_string(),
        borrowed: Some(lifetime.to_string()),
        ..TypeDesc::default()
    }
}

pub fn config_with_rule(rule_id: &str, severity: Severity) -> EffectiveConfig {
    let mut rules = BTreeMap::new();
    rules.insert(rule_id.to_string(), RulePolicy::enabled(severity));
    base_config(rules)
}

/// All catalog rules enabled at their default severities.
pub fn config_all_rules() -> EffectiveConfig {
    let rules = crate::rules::catalog()
        .into_iter()
        .map(|rule| (rule.id.to_string(), RulePolicy::enabled(rule.default_severity)))
        .collect();
    base_config(rules)
}

fn base_config(rules: BTreeMap<String, RulePolicy>) -> EffectiveConfig {
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        work_budget: None,
        rules,
        suppressions: BTreeSet::new(),
    }
}
