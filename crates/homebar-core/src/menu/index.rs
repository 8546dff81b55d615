// ── Node index ──
//
// Secondary index from characteristic id to every node bound to it.
// Built once per tree generation and never mutated afterwards; a
// rebuild replaces tree and index together.

use std::collections::HashMap;

use crate::model::CharacteristicId;

use super::node::{MenuTree, NodeId};

/// Characteristic id -> bound nodes, in tree order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIndex {
    by_characteristic: HashMap<CharacteristicId, Vec<NodeId>>,
}

impl NodeIndex {
    /// Index every identifier bound by every node of `tree`.
    pub fn from_tree(tree: &MenuTree) -> Self {
        let mut by_characteristic: HashMap<CharacteristicId, Vec<NodeId>> = HashMap::new();
        for (node_id, node) in tree.iter() {
            for id in &node.binding.identifiers {
                let nodes = by_characteristic.entry(*id).or_default();
                // A node binding the same id twice is still one match.
                if nodes.last() != Some(&node_id) {
                    nodes.push(node_id);
                }
            }
        }
        Self { by_characteristic }
    }

    /// All nodes bound to `id`. Empty when nothing is.
    pub fn lookup(&self, id: CharacteristicId) -> &[NodeId] {
        self.by_characteristic
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, id: CharacteristicId) -> bool {
        self.by_characteristic.contains_key(&id)
    }

    /// Every indexed identifier, in no particular order.
    pub fn identifiers(&self) -> impl Iterator<Item = CharacteristicId> + '_ {
        self.by_characteristic.keys().copied()
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.by_characteristic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_characteristic.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::menu::node::{
        Binding, DEFAULT_ORDER_PRIORITY, MenuNode, NodeKind, Toggle, ToggleDevice,
    };

    fn toggle(ids: Vec<CharacteristicId>) -> MenuNode {
        MenuNode::new(
            "t",
            Binding::new(ids, DEFAULT_ORDER_PRIORITY),
            NodeKind::Toggle(Toggle {
                device: ToggleDevice::Switch,
                on: false,
            }),
        )
    }

    #[test]
    fn shared_identifier_maps_to_every_node() {
        let a = CharacteristicId::new_v4();
        let b = CharacteristicId::new_v4();
        let tree = MenuTree::from_nodes(vec![
            toggle(vec![a]),
            MenuNode::separator(),
            toggle(vec![a, b]),
        ]);

        let index = NodeIndex::from_tree(&tree);
        assert_eq!(index.lookup(a), &[NodeId::new(0), NodeId::new(2)]);
        assert_eq!(index.lookup(b), &[NodeId::new(2)]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn unbound_identifier_yields_empty_slice() {
        let index = NodeIndex::from_tree(&MenuTree::default());
        assert!(index.lookup(CharacteristicId::new_v4()).is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn duplicate_binding_on_one_node_is_indexed_once() {
        let a = CharacteristicId::new_v4();
        let tree = MenuTree::from_nodes(vec![toggle(vec![a, a])]);
        let index = NodeIndex::from_tree(&tree);
        assert_eq!(index.lookup(a).len(), 1);
    }
}
