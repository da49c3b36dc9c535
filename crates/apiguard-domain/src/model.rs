use apiguard_types::ItemPath;
use std::collections::{BTreeMap, BTreeSet};

/// One versioned capture of a library's exported surface.
///
/// Built once by an extraction collaborator, immutable thereafter. The engine
/// never retains or mutates a snapshot after returning.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub library: String,
    pub version: String,

    /// All surface items, insertion order (order is not semantically significant).
    pub items: Vec<InterfaceItem>,

    /// The feature-gate universe: capability name -> enabled by default.
    pub features: BTreeMap<String, bool>,
}

impl Snapshot {
    /// Capability names that are on by default.
    pub fn default_capabilities(&self) -> BTreeSet<String> {
        self.features
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// One exported (or potentially-exported) element of a library's surface.
#[derive(Clone, Debug)]
pub struct InterfaceItem {
    /// Module-qualified, unique within a snapshot.
    pub path: ItemPath,
    pub kind: ItemKind,
    /// Declared visibility. Effective visibility additionally requires every
    /// ancestor container to be declared public; see `visibility::closure`.
    pub visibility: Visibility,
    pub signature: Option<Signature>,
    pub deprecated: Option<Deprecation>,
    pub feature_gate: Option<FeatureExpr>,
    pub has_documented_contract: bool,
    pub uses_low_level_escape: bool,
    /// Required when `uses_low_level_escape` is set.
    pub escape_justification: Option<String>,
}

impl InterfaceItem {
    pub fn is_function(&self) -> bool {
        self.kind == ItemKind::Function
    }

    /// Kinds that can contain other items in the path tree.
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Module | ItemKind::Type | ItemKind::TraitCapability
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    Module,
    Function,
    Type,
    TraitCapability,
    Constant,
    Alias,
    MacroLike,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Crate,
    Private,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deprecation {
    pub since: String,
    pub message: String,
}

/// Type descriptor tags, as supplied by the extraction collaborator.
///
/// The engine does not resolve types; it trusts the tags on the descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeDesc {
    pub name: String,
    /// The type has exactly two inhabitants (bool or equivalent).
    pub two_valued: bool,
    /// Unstructured text type (String and friends).
    pub textual: bool,
    /// Borrow-scoped reference; carries the lifetime/borrow label.
    pub borrowed: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDesc {
    pub name: String,
    pub ty: TypeDesc,
    /// The parameter has a default-compatible form (optional/builder-style),
    /// so adding it does not break existing call sites.
    pub has_default: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenericParam {
    pub name: String,
    pub bounds: BTreeSet<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<ParamDesc>,
    pub generics: Vec<GenericParam>,
    pub ret: Option<TypeDesc>,
    /// Error descriptor; present iff the operation is fallible.
    pub error: Option<TypeDesc>,
    /// Justification annotation for borrows exposed by this signature.
    pub borrow_note: Option<String>,
}

/// Boolean expression over named optional capabilities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeatureExpr {
    Flag(String),
    AllOf(Vec<FeatureExpr>),
    AnyOf(Vec<FeatureExpr>),
    Not(Box<FeatureExpr>),
}

impl FeatureExpr {
    pub fn flag<S: Into<String>>(name: S) -> Self {
        FeatureExpr::Flag(name.into())
    }

    /// Evaluate against a set of enabled capability names.
    pub fn eval(&self, enabled: &BTreeSet<String>) -> bool {
        match self {
            FeatureExpr::Flag(name) => enabled.contains(name),
            FeatureExpr::AllOf(exprs) => exprs.iter().all(|e| e.eval(enabled)),
            FeatureExpr::AnyOf(exprs) => exprs.iter().any(|e| e.eval(enabled)),
            FeatureExpr::Not(expr) => !expr.eval(enabled),
        }
    }

    /// All capability names referenced anywhere in the expression.
    pub fn referenced_flags(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_flags(&mut out);
        out
    }

    fn collect_flags(&self, out: &mut BTreeSet<String>) {
        match self {
            FeatureExpr::Flag(name) => {
                out.insert(name.clone());
            }
            FeatureExpr::AllOf(exprs) | FeatureExpr::AnyOf(exprs) => {
                for e in exprs {
                    e.collect_flags(out);
                }
            }
            FeatureExpr::Not(expr) => expr.collect_flags(out),
        }
    }

    /// Canonical text rendering. The diff engine compares gates textually,
    /// so this must stay deterministic.
    pub fn render(&self) -> String {
        match self {
            FeatureExpr::Flag(name) => name.clone(),
            FeatureExpr::AllOf(exprs) => {
                let inner: Vec<String> = exprs.iter().map(FeatureExpr::render).collect();
                format!("all({})", inner.join(", "))
            }
            FeatureExpr::AnyOf(exprs) => {
                let inner: Vec<String> = exprs.iter().map(FeatureExpr::render).collect();
                format!("any({})", inner.join(", "))
            }
            FeatureExpr::Not(expr) => format!("not({})", expr.render()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn feature_expr_eval() {
        let expr = FeatureExpr::AllOf(vec![
            FeatureExpr::flag("net"),
            FeatureExpr::Not(Box::new(FeatureExpr::flag("minimal"))),
        ]);
        assert!(expr.eval(&enabled(&["net"])));
        assert!(!expr.eval(&enabled(&["net", "minimal"])));
        assert!(!expr.eval(&enabled(&[])));
    }

    #[test]
    fn feature_expr_render_is_canonical() {
        let expr = FeatureExpr::AnyOf(vec![
            FeatureExpr::flag("tls"),
            FeatureExpr::AllOf(vec![FeatureExpr::flag("net"), FeatureExpr::flag("http")]),
        ]);
        assert_eq!(expr.render(), "any(tls, all(net, http))");
    }

    #[test]
    fn referenced_flags_walks_the_tree() {
        let expr = FeatureExpr::Not(Box::new(FeatureExpr::AnyOf(vec![
            FeatureExpr::flag("b"),
            FeatureExpr::flag("a"),
        ])));
        let flags: Vec<String> = expr.referenced_flags().into_iter().collect();
        assert_eq!(flags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn default_capabilities_filters_default_off() {
        let mut snapshot = Snapshot::default();
        snapshot.features.insert("net".to_string(), true);
        snapshot.features.insert("minimal".to_string(), false);
        let defaults = snapshot.default_capabilities();
        assert!(defaults.contains("net"));
        assert!(!defaults.contains("minimal"));
    }
}
