//! Effective-visibility closure over the containment tree.
//!
//! An item is effectively public only if it is declared public and every
//! ancestor container on its path is declared public. A single non-public
//! ancestor makes all descendants non-public regardless of their own
//! declared visibility.

use crate::model::{Snapshot, Visibility};
use apiguard_types::ItemPath;
use std::collections::BTreeMap;
use thiserror::Error;

/// Malformed input snapshot. Fatal: surfaced before any evaluation begins.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SnapshotParseError {
    #[error("duplicate item path in snapshot: {path}")]
    DuplicatePath { path: ItemPath },

    #[error("item '{path}' references parent '{parent}' which is not a container in the snapshot")]
    DanglingParent { path: ItemPath, parent: ItemPath },
}

/// Cached effective-visibility map for one snapshot.
///
/// Computed once per evaluate/diff pass; paths absent from the snapshot
/// report as non-public.
#[derive(Clone, Debug, Default)]
pub struct VisibilityClosure {
    map: BTreeMap<ItemPath, bool>,
}

impl VisibilityClosure {
    pub fn is_public(&self, path: &ItemPath) -> bool {
        self.map.get(path).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemPath, bool)> {
        self.map.iter().map(|(path, public)| (path, *public))
    }
}

/// Compute the effective-visibility closure, validating the snapshot shape.
///
/// Fails on duplicate paths and on items whose parent path does not resolve
/// to a container item (module, type, or trait capability). Containment is a
/// tree, so the ancestor walk terminates without cycle tracking.
pub fn closure(snapshot: &Snapshot) -> Result<VisibilityClosure, SnapshotParseError> {
    let mut declared: BTreeMap<&ItemPath, Visibility> = BTreeMap::new();
    let mut containers: BTreeMap<&ItemPath, bool> = BTreeMap::new();

    for item in &snapshot.items {
        if declared.insert(&item.path, item.visibility).is_some() {
            return Err(SnapshotParseError::DuplicatePath {
                path: item.path.clone(),
            });
        }
        containers.insert(&item.path, item.is_container());
    }

    for item in &snapshot.items {
        if let Some(parent) = item.path.parent() {
            if containers.get(&parent).copied() != Some(true) {
                return Err(SnapshotParseError::DanglingParent {
                    path: item.path.clone(),
                    parent,
                });
            }
        }
    }

    let mut map: BTreeMap<ItemPath, bool> = BTreeMap::new();
    for item in &snapshot.items {
        let mut public = item.visibility == Visibility::Public;
        let mut cursor = item.path.parent();
        while public {
            let Some(parent) = cursor else { break };
            // Ancestors already resolved carry their full chain result.
            if let Some(&known) = map.get(&parent) {
                public = known;
                break;
            }
            public = declared.get(&parent).copied() == Some(Visibility::Public);
            cursor = parent.parent();
        }
        map.insert(item.path.clone(), public);
    }

    Ok(VisibilityClosure { map })
}
