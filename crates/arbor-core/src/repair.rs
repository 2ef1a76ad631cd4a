//! Structural repairs on an assembled node list.
//!
//! Inferred parents come from user-editable data, so they can point at
//! entities that never made it into the tree (hidden, incomplete, or from
//! another bundle) or loop back on themselves. Both leave the widget with
//! something it cannot render. Each repair re-hangs the offending node under
//! the bundle node and reports which entities it moved.

use std::collections::{HashMap, HashSet};

use arbor_types::{BundleId, EntityId, ParentRef, TreeNode};

/// Re-hang nodes whose parent entity is not in `nodes`.
pub fn reattach_orphans(nodes: &mut [TreeNode], bundle: &BundleId) -> Vec<EntityId> {
    let present: HashSet<EntityId> = nodes.iter().filter_map(|n| n.id.as_entity()).collect();

    let mut moved = Vec::new();
    for node in nodes.iter_mut() {
        let Some(parent) = node.parent.as_entity() else {
            continue;
        };
        if !present.contains(&parent) {
            node.parent = ParentRef::bundle(bundle.clone());
            moved.extend(node.id.as_entity());
        }
    }
    moved
}

/// Cut every parent cycle in `nodes`.
///
/// Each cycle loses exactly one edge: the member listed first in `nodes` is
/// re-hung under the bundle node. Nodes that merely lead into a cycle keep
/// their parents. Parents missing from `nodes` end a chain without counting
/// as a cycle.
pub fn break_cycles(nodes: &mut [TreeNode], bundle: &BundleId) -> Vec<EntityId> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let position: HashMap<EntityId, usize> = nodes
        .iter()
        .enumerate()
        .filter_map(|(i, n)| n.id.as_entity().map(|id| (id, i)))
        .collect();

    let mut marks = vec![Mark::Unvisited; nodes.len()];
    let mut moved = Vec::new();

    for start in 0..nodes.len() {
        if marks[start] != Mark::Unvisited || nodes[start].id.as_entity().is_none() {
            continue;
        }

        let mut path: Vec<usize> = Vec::new();
        let mut current = start;
        loop {
            match marks[current] {
                Mark::Done => break,
                Mark::OnPath => {
                    // `current` closes a loop; the cycle is path[from..]
                    let from = path.iter().position(|&i| i == current).unwrap_or(0);
                    if let Some(&victim) = path[from..].iter().min() {
                        nodes[victim].parent = ParentRef::bundle(bundle.clone());
                        moved.extend(nodes[victim].id.as_entity());
                    }
                    break;
                }
                Mark::Unvisited => {
                    marks[current] = Mark::OnPath;
                    path.push(current);
                    match nodes[current].parent.as_entity().and_then(|p| position.get(&p)) {
                        Some(&next) => current = next,
                        None => break,
                    }
                }
            }
        }

        for i in path {
            marks[i] = Mark::Done;
        }
    }
    moved
}

// ============================================================================
// Tests
// ============================================================================
