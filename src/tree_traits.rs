//! Text outline rendering via `termtree`.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{LabelRule, MindMapArena, PositionedNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self, rule: &LabelRule) -> Tree<String>;
}

impl TreeNodeConvert for MindMapArena {
    fn to_tree_string(&self, rule: &LabelRule) -> Tree<String> {
        fn build_tree(
            arena: &MindMapArena,
            node_idx: Index,
            rule: &LabelRule,
            parent_tree: &mut Tree<String>,
        ) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(rule.display(&child.data.label).into_owned());
                        build_tree(arena, child_idx, rule, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root().and_then(|idx| self.get_node(idx).map(|n| (idx, n))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(rule.display(&root.data.label).into_owned());
                build_tree(self, root_idx, rule, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

impl TreeNodeConvert for PositionedNode {
    fn to_tree_string(&self, rule: &LabelRule) -> Tree<String> {
        let root = format!("{} ({}, {})", rule.display(&self.label), self.x, self.y);
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_string(rule))
            .collect();
        Tree::new(root).with_leaves(leaves)
    }
}
