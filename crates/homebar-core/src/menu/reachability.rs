// ── Reachability tracking ──
//
// A device that stops answering marks every node bound to it unreachable.
// Unreachable nodes lose their submenu; a color light gets its picker back
// once the device answers again. The recovery side collects what is still
// unreachable so one bulk reload can be issued when the menu opens.

use indexmap::IndexSet;

use crate::model::CharacteristicId;

use super::index::NodeIndex;
use super::node::{MenuNode, MenuTree, NodeKind, Submenu};

/// Mark all nodes bound to `id` reachable or not. Returns how many
/// changed state.
pub fn set_reachable(
    tree: &mut MenuTree,
    index: &NodeIndex,
    id: CharacteristicId,
    reachable: bool,
) -> usize {
    let mut changed = 0;
    for &node_id in index.lookup(id) {
        if let Some(node) = tree.get_mut(node_id) {
            if mark(node, reachable) {
                changed += 1;
            }
        }
    }
    changed
}

fn mark(node: &mut MenuNode, reachable: bool) -> bool {
    let was = node.binding.reachable;
    node.binding.reachable = reachable;
    if let NodeKind::LightColor(light) = &mut node.kind {
        light.submenu = reachable.then_some(Submenu::ColorPicker);
    }
    was != reachable
}

/// Identifiers bound to unreachable nodes, deduplicated, in tree order.
pub fn unreachable_identifiers(tree: &MenuTree) -> Vec<CharacteristicId> {
    let ids: IndexSet<CharacteristicId> = tree
        .nodes()
        .iter()
        .filter(|n| !n.binding.reachable)
        .flat_map(|n| n.binding.identifiers.iter().copied())
        .collect();
    ids.into_iter().collect()
}
