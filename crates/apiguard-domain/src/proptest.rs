//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Evaluation determinism under item reordering
//! - Effective-visibility monotonicity
//! - Diff symmetry and impact monotonicity

use crate::diff;
use crate::engine::evaluate;
use crate::model::{FeatureExpr, InterfaceItem, ItemKind, Snapshot, Visibility};
use crate::registry::RuleRegistry;
use crate::test_support::{
    bool_ty, config_all_rules, function, item, module, named_ty, param, sig, snapshot_with_features,
    text_ty,
};
use crate::visibility;
use apiguard_types::{ChangeKind, Impact};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::seq::SliceRandom;

// ============================================================================
// Strategies for generating arbitrary snapshots
// ============================================================================

fn arb_visibility() -> impl Strategy<Value = Visibility> {
    prop_oneof![
        Just(Visibility::Public),
        Just(Visibility::Crate),
        Just(Visibility::Private),
    ]
}

/// Shape of one generated surface item. Indices are resolved against the
/// generated module list so every snapshot is well formed by construction.
#[derive(Clone, Debug)]
struct ItemSpec {
    kind: u8,
    placement: u8,
    vis: Visibility,
    bool_param: bool,
    textual_error: bool,
    documented: bool,
    escape: bool,
    gate: u8,
}

fn arb_item_spec() -> impl Strategy<Value = ItemSpec> {
    (
        0u8..3,
        any::<u8>(),
        arb_visibility(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        0u8..4,
    )
        .prop_map(
            |(kind, placement, vis, bool_param, textual_error, documented, escape, gate)| {
                ItemSpec {
                    kind,
                    placement,
                    vis,
                    bool_param,
                    textual_error,
                    documented,
                    escape,
                    gate,
                }
            },
        )
}

fn build_item(parent: &str, idx: usize, spec: &ItemSpec) -> InterfaceItem {
    let path = format!("{parent}::it{idx}");
    let mut it = match spec.kind {
        0 => {
            let mut params = vec![param("input", named_ty("Request"))];
            if spec.bool_param {
                params.push(param("flag", bool_ty()));
            }
            let mut s = sig(params, Some(named_ty("Response")));
            if spec.textual_error {
                s.error = Some(text_ty("String"));
            }
            function(&path, spec.vis, s)
        }
        1 => item(&path, ItemKind::Constant, spec.vis),
        _ => item(&path, ItemKind::Type, spec.vis),
    };
    it.has_documented_contract = spec.documented;
    it.uses_low_level_escape = spec.escape;
    it.feature_gate = match spec.gate {
        0 => None,
        1 => Some(FeatureExpr::flag("net")),
        2 => Some(FeatureExpr::flag("extras")),
        // Deliberately undeclared so features.hygiene has something to find.
        _ => Some(FeatureExpr::flag("ghost")),
    };
    it
}

/// A well-formed snapshot: a root module, a few submodules, and items placed
/// under existing containers only. Paths are unique by construction.
fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    (
        arb_visibility(),
        prop::collection::vec(arb_visibility(), 0..3),
        prop::collection::vec(arb_item_spec(), 0..8),
    )
        .prop_map(|(root_vis, subs, specs)| {
            let mut items = vec![module("pkg", root_vis)];
            for (i, vis) in subs.iter().enumerate() {
                items.push(module(&format!("pkg::m{i}"), *vis));
            }
            for (idx, spec) in specs.iter().enumerate() {
                let slot = spec.placement as usize % (subs.len() + 1);
                let parent = if slot == 0 {
                    "pkg".to_string()
                } else {
                    format!("pkg::m{}", slot - 1)
                };
                items.push(build_item(&parent, idx, spec));
            }
            snapshot_with_features(items, &[("net", true), ("extras", false)])
        })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Shuffling snapshot items must not change the emitted report: ordering
    /// comes entirely from the final sort, never from execution order.
    #[test]
    fn evaluation_is_deterministic_under_shuffling(snap in arb_snapshot(), seed in any::<u64>()) {
        let registry = RuleRegistry::builtin();
        let cfg = config_all_rules();

        let baseline = evaluate(&snap, &registry, &cfg).expect("generated snapshot is well formed");

        let mut shuffled = snap.clone();
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        shuffled.items.shuffle(&mut rng);
        let reordered = evaluate(&shuffled, &registry, &cfg).expect("shuffling keeps the snapshot well formed");

        prop_assert_eq!(baseline.findings, reordered.findings);
        prop_assert_eq!(baseline.counts, reordered.counts);
        prop_assert_eq!(baseline.verdict, reordered.verdict);
    }

    /// Marking a module non-public never makes any path effectively public
    /// that was not public before.
    #[test]
    fn hiding_a_module_never_widens_visibility(
        snap in arb_snapshot(),
        pick in any::<prop::sample::Index>(),
    ) {
        let before = visibility::closure(&snap).expect("generated snapshot is well formed");

        let mut hidden = snap.clone();
        let module_slots: Vec<usize> = hidden
            .items
            .iter()
            .enumerate()
            .filter(|(_, it)| it.kind == ItemKind::Module)
            .map(|(i, _)| i)
            .collect();
        let slot = module_slots[pick.index(module_slots.len())];
        hidden.items[slot].visibility = Visibility::Crate;

        let after = visibility::closure(&hidden).expect("visibility change keeps the snapshot well formed");
        for (path, public) in after.iter() {
            if public {
                prop_assert!(
                    before.is_public(path),
                    "'{}' became public after hiding a module",
                    path
                );
            }
        }
    }

    /// diff(A,B) and diff(B,A) must contain inverse change kinds per path.
    #[test]
    fn diff_change_kinds_invert(a in arb_snapshot(), b in arb_snapshot()) {
        let cfg = config_all_rules();
        let forward = diff::diff(&a, &b, &cfg).expect("generated snapshots are well formed");
        let backward = diff::diff(&b, &a, &cfg).expect("generated snapshots are well formed");

        let mut inverted: Vec<(String, ChangeKind)> = forward
            .deltas
            .iter()
            .map(|d| (d.path.to_string(), d.change.inverse()))
            .collect();
        let mut observed: Vec<(String, ChangeKind)> = backward
            .deltas
            .iter()
            .map(|d| (d.path.to_string(), d.change))
            .collect();
        inverted.sort();
        observed.sort();
        prop_assert_eq!(inverted, observed);
    }

    /// Adding one public item to an otherwise unchanged snapshot never
    /// requires more than a minor bump.
    #[test]
    fn adding_a_public_item_is_at_worst_minor(snap in arb_snapshot()) {
        let mut grown = snap.clone();
        grown.items.push(function(
            "pkg::entirely_new",
            Visibility::Public,
            sig(vec![], None),
        ));

        let cfg = config_all_rules();
        let report = diff::diff(&snap, &grown, &cfg).expect("generated snapshots are well formed");
        prop_assert!(report.required_bump <= Impact::Minor);
        for delta in &report.deltas {
            prop_assert_eq!(delta.change, ChangeKind::Added);
        }
    }

    /// Evaluate twice on the same inputs: byte-identical serialized findings.
    #[test]
    fn evaluation_is_idempotent(snap in arb_snapshot()) {
        let registry = RuleRegistry::builtin();
        let cfg = config_all_rules();

        let first = evaluate(&snap, &registry, &cfg).expect("generated snapshot is well formed");
        let second = evaluate(&snap, &registry, &cfg).expect("generated snapshot is well formed");

        let a = serde_json::to_string(&first.findings).expect("findings serialize");
        let b = serde_json::to_string(&second.findings).expect("findings serialize");
        prop_assert_eq!(a, b);
    }
}
