//! The compatibility-diff engine: compares a baseline snapshot against a
//! candidate and classifies every change by its impact on consumers.
//!
//! Items are matched by identical path. Path matching is a single-threaded
//! precomputation; the per-path comparisons are independent and run on the
//! rayon pool. Impact is a pure function of the change kind plus the concrete
//! before/after values, so results are reproducible and order-independent.

use crate::fingerprint::signature_fingerprint;
use crate::model::{InterfaceItem, ItemKind, Signature, Snapshot};
use crate::policy::EffectiveConfig;
use crate::visibility::{self, SnapshotParseError, VisibilityClosure};
use apiguard_types::{ChangeKind, CompatibilityDelta, Impact, ItemPath};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// A removed/added pair with identical kind and signature shape under
/// different paths. Reported alongside the literal add/remove deltas, never
/// silently merged; the caller decides whether it is a rename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameCandidate {
    pub removed: ItemPath,
    pub added: ItemPath,
}

/// Output of one diff pass over a (baseline, candidate) snapshot pair.
#[derive(Clone, Debug)]
pub struct DiffReport {
    /// Classified deltas, ordered by path then change kind.
    pub deltas: Vec<CompatibilityDelta>,
    pub renames: Vec<RenameCandidate>,
    /// Highest impact across all deltas; the version bump the change set requires.
    pub required_bump: Impact,
    /// A work budget stopped scheduling early; not exhaustive.
    pub truncated: bool,
}

pub fn diff(
    old: &Snapshot,
    new: &Snapshot,
    cfg: &EffectiveConfig,
) -> Result<DiffReport, SnapshotParseError> {
    // Both snapshots are validated up front; closure failure is fatal.
    let old_vis = visibility::closure(old)?;
    let new_vis = visibility::closure(new)?;

    let old_by_path: BTreeMap<&ItemPath, &InterfaceItem> =
        old.items.iter().map(|it| (&it.path, it)).collect();
    let new_by_path: BTreeMap<&ItemPath, &InterfaceItem> =
        new.items.iter().map(|it| (&it.path, it)).collect();

    // Deterministic unit enumeration: the sorted union of both path sets.
    let mut paths: Vec<&ItemPath> = old_by_path
        .keys()
        .chain(new_by_path.keys())
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut truncated = false;
    if let Some(budget) = cfg.work_budget {
        if paths.len() > budget {
            paths.truncate(budget);
            truncated = true;
        }
    }

    let old_defaults = old.default_capabilities();
    let new_defaults = new.default_capabilities();

    let mut deltas: Vec<CompatibilityDelta> = paths
        .par_iter()
        .flat_map_iter(|path| {
            let before = old_by_path.get(*path).copied();
            let after = new_by_path.get(*path).copied();
            match (before, after) {
                (Some(b), None) => vec![CompatibilityDelta {
                    path: b.path.clone(),
                    change: ChangeKind::Removed,
                    impact: if old_vis.is_public(&b.path) {
                        Impact::Major
                    } else {
                        Impact::None
                    },
                }],
                (None, Some(a)) => vec![CompatibilityDelta {
                    path: a.path.clone(),
                    change: ChangeKind::Added,
                    impact: if new_vis.is_public(&a.path) {
                        Impact::Minor
                    } else {
                        Impact::None
                    },
                }],
                (Some(b), Some(a)) => compare_item(
                    b,
                    a,
                    &old_vis,
                    &new_vis,
                    &old_defaults,
                    &new_defaults,
                ),
                (None, None) => Vec::new(),
            }
        })
        .collect();

    deltas.sort_by(|a, b| a.path.cmp(&b.path).then(a.change.cmp(&b.change)));

    let renames = rename_candidates(&deltas, &old_by_path, &new_by_path, &old_vis, &new_vis);

    let required_bump = deltas
        .iter()
        .map(|d| d.impact)
        .max()
        .unwrap_or(Impact::None);

    Ok(DiffReport {
        deltas,
        renames,
        required_bump,
        truncated,
    })
}

/// Compare one path present in both snapshots. An item may emit several
/// delta kinds in the same pass; each is classified independently.
fn compare_item(
    old: &InterfaceItem,
    new: &InterfaceItem,
    old_vis: &VisibilityClosure,
    new_vis: &VisibilityClosure,
    old_defaults: &BTreeSet<String>,
    new_defaults: &BTreeSet<String>,
) -> Vec<CompatibilityDelta> {
    let mut out = Vec::new();
    let mut push = |change: ChangeKind, impact: Impact| {
        out.push(CompatibilityDelta {
            path: old.path.clone(),
            change,
            impact,
        });
    };

    if let Some(impact) = signature_impact(old.signature.as_ref(), new.signature.as_ref()) {
        push(ChangeKind::SignatureChanged, impact);
    }

    let was_public = old_vis.is_public(&old.path);
    let is_public = new_vis.is_public(&new.path);
    if was_public && !is_public {
        push(ChangeKind::VisibilityNarrowed, Impact::Major);
    } else if !was_public && is_public {
        push(ChangeKind::VisibilityWidened, Impact::Minor);
    }

    match (&old.deprecated, &new.deprecated) {
        (None, Some(_)) => push(ChangeKind::DeprecatedAdded, Impact::Minor),
        (Some(_), None) => push(ChangeKind::DeprecatedRemoved, Impact::Patch),
        _ => {}
    }

    let old_gate = old.feature_gate.as_ref().map(|g| g.render());
    let new_gate = new.feature_gate.as_ref().map(|g| g.render());
    if old_gate != new_gate {
        let available_before = old
            .feature_gate
            .as_ref()
            .map(|g| g.eval(old_defaults))
            .unwrap_or(true);
        let available_after = new
            .feature_gate
            .as_ref()
            .map(|g| g.eval(new_defaults))
            .unwrap_or(true);
        // Losing default availability, or gating a previously unconditional
        // item at all, breaks consumers on the default capability set.
        let breaking = (available_before && !available_after)
            || (old.feature_gate.is_none() && new.feature_gate.is_some());
        push(
            ChangeKind::FeatureGateChanged,
            if breaking { Impact::Major } else { Impact::Patch },
        );
    }

    out
}

/// Classify a structural signature difference, or `None` when the signatures
/// are structurally identical. Parameter names and the borrow note are not
/// structural; changing only those yields no delta.
fn signature_impact(old: Option<&Signature>, new: Option<&Signature>) -> Option<Impact> {
    let (old, new) = match (old, new) {
        (None, None) => return None,
        // Gaining or losing a signature entirely is a reshape of the item.
        (Some(_), None) | (None, Some(_)) => return Some(Impact::Major),
        (Some(o), Some(n)) => (o, n),
    };

    let mut impact: Option<Impact> = None;
    let mut bump = |i: Impact| {
        impact = Some(impact.map_or(i, |prev| prev.max(i)));
    };

    if old.params.len() != new.params.len()
        || old
            .params
            .iter()
            .zip(&new.params)
            .any(|(a, b)| a.ty != b.ty || a.has_default != b.has_default)
    {
        bump(param_change_impact(old, new));
    }

    if old.ret != new.ret || old.error != new.error {
        bump(Impact::Major);
    }

    let old_bounds = bound_set(old);
    let new_bounds = bound_set(new);
    if old_bounds != new_bounds {
        if new_bounds.is_subset(&old_bounds) {
            // Bounds only removed: the function accepts strictly more types.
            bump(Impact::Minor);
        } else {
            // Bounds added (or reshaped): existing instantiations may no longer compile.
            bump(Impact::Major);
        }
    }

    impact
}

/// Parameter-list change: appending only default-compatible parameters keeps
/// existing call sites working; anything else does not.
fn param_change_impact(old: &Signature, new: &Signature) -> Impact {
    let appended_only = new.params.len() > old.params.len()
        && old
            .params
            .iter()
            .zip(&new.params)
            .all(|(a, b)| a.ty == b.ty && a.has_default == b.has_default)
        && new.params[old.params.len()..].iter().all(|p| p.has_default);
    if appended_only {
        Impact::Minor
    } else {
        Impact::Major
    }
}

fn bound_set(sig: &Signature) -> BTreeSet<(String, String)> {
    sig.generics
        .iter()
        .flat_map(|g| {
            g.bounds
                .iter()
                .map(move |b| (g.name.clone(), b.clone()))
        })
        .collect()
}

/// Pair removed and added public items with identical kind and signature
/// shape. Pairing is deterministic: both sides are walked in path order.
/// Only items carrying a signature participate; without one there is no
/// structure to match on.
fn rename_candidates(
    deltas: &[CompatibilityDelta],
    old_by_path: &BTreeMap<&ItemPath, &InterfaceItem>,
    new_by_path: &BTreeMap<&ItemPath, &InterfaceItem>,
    old_vis: &VisibilityClosure,
    new_vis: &VisibilityClosure,
) -> Vec<RenameCandidate> {
    type ShapeKey = (ItemKind, String);

    let mut removed: BTreeMap<ShapeKey, Vec<&ItemPath>> = BTreeMap::new();
    let mut added: BTreeMap<ShapeKey, Vec<&ItemPath>> = BTreeMap::new();

    for delta in deltas {
        let (lookup, vis, bucket) = match delta.change {
            ChangeKind::Removed => (old_by_path, old_vis, &mut removed),
            ChangeKind::Added => (new_by_path, new_vis, &mut added),
            _ => continue,
        };
        let Some(item) = lookup.get(&delta.path) else {
            continue;
        };
        if !vis.is_public(&item.path) {
            continue;
        }
        let Some(sig) = item.signature.as_ref() else {
            continue;
        };
        bucket
            .entry((item.kind, signature_fingerprint(sig)))
            .or_default()
            .push(&item.path);
    }

    let mut out = Vec::new();
    for (key, removed_paths) in &removed {
        let Some(added_paths) = added.get(key) else {
            continue;
        };
        for (r, a) in removed_paths.iter().zip(added_paths.iter()) {
            out.push(RenameCandidate {
                removed: (*r).clone(),
                added: (*a).clone(),
            });
        }
    }
    out.sort_by(|a, b| a.removed.cmp(&b.removed).then(a.added.cmp(&b.added)));
    out
}
