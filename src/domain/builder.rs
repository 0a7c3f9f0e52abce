//! Tree builder: turns a parsed document into a validated arena.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::arena::{MindMapArena, NodeData};
use crate::domain::document::{parse_document, MindMapNode};
use crate::domain::error::{DomainError, DomainResult};

/// Default nesting limit; corporate training maps stay well below ten levels.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Constructs a [`MindMapArena`] from a [`MindMapNode`] document.
///
/// Rejects empty ids, duplicate ids and nesting beyond `max_depth` levels.
pub struct TreeBuilder {
    max_depth: usize,
    seen_ids: HashSet<String>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            seen_ids: HashSet::new(),
        }
    }

    /// Parse `json` and build its arena.
    #[instrument(level = "debug", skip(self, json))]
    pub fn build_from_json(&mut self, json: &str) -> DomainResult<MindMapArena> {
        let document = parse_document(json)?;
        self.build(&document)
    }

    #[instrument(level = "debug", skip(self, document), fields(root = %document.id))]
    pub fn build(&mut self, document: &MindMapNode) -> DomainResult<MindMapArena> {
        self.seen_ids.clear();

        let mut tree = MindMapArena::new();
        // (node, parent, level) with level 1 for the root
        let mut stack = vec![(document, None, 1usize)];

        while let Some((node, parent_idx, level)) = stack.pop() {
            if level > self.max_depth {
                return Err(DomainError::DepthLimitExceeded {
                    id: node.id.clone(),
                    limit: self.max_depth,
                });
            }
            if node.id.trim().is_empty() {
                return Err(DomainError::InvalidNode {
                    path: self.describe_parent(&tree, parent_idx),
                    reason: "empty id".to_string(),
                });
            }
            if !self.seen_ids.insert(node.id.clone()) {
                return Err(DomainError::DuplicateId(node.id.clone()));
            }

            let current_idx =
                tree.insert_node(NodeData::new(node.id.clone(), node.label.clone()), parent_idx);

            // Reverse so the leftmost child is popped, and therefore inserted, first
            for child in node.children().iter().rev() {
                stack.push((child, Some(current_idx), level + 1));
            }
        }

        debug!("built mind map: {} nodes, depth {}", tree.len(), tree.depth());
        Ok(tree)
    }

    fn describe_parent(
        &self,
        tree: &MindMapArena,
        parent_idx: Option<generational_arena::Index>,
    ) -> String {
        parent_idx
            .and_then(|idx| tree.get_node(idx))
            .map(|p| format!("child of {}", p.data.id))
            .unwrap_or_else(|| "root".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(levels: usize) -> MindMapNode {
        let mut node = MindMapNode::leaf(format!("n{}", levels - 1), "leaf");
        for i in (0..levels - 1).rev() {
            node = MindMapNode::with_children(format!("n{}", i), "level", vec![node]);
        }
        node
    }

    #[test]
    fn given_nested_document_when_building_then_preserves_child_order() {
        let doc = MindMapNode::with_children(
            "root",
            "Root",
            vec![
                MindMapNode::leaf("1", "One"),
                MindMapNode::leaf("2", "Two"),
                MindMapNode::leaf("3", "Three"),
            ],
        );

        let tree = TreeBuilder::new().build(&doc).unwrap();

        let root = tree.get_node(tree.root().unwrap()).unwrap();
        let children: Vec<_> = root
            .children
            .iter()
            .map(|&c| tree.get_node(c).unwrap().data.id.as_str())
            .collect();
        assert_eq!(children, vec!["1", "2", "3"]);
    }

    #[test]
    fn given_duplicate_ids_when_building_then_errors() {
        let doc = MindMapNode::with_children(
            "root",
            "Root",
            vec![MindMapNode::leaf("x", "A"), MindMapNode::leaf("x", "B")],
        );

        let result = TreeBuilder::new().build(&doc);

        assert!(matches!(result, Err(DomainError::DuplicateId(id)) if id == "x"));
    }

    #[test]
    fn given_empty_id_when_building_then_errors() {
        let doc = MindMapNode::with_children("root", "Root", vec![MindMapNode::leaf(" ", "A")]);

        let result = TreeBuilder::new().build(&doc);

        assert!(matches!(result, Err(DomainError::InvalidNode { path, .. }) if path == "child of root"));
    }

    #[test]
    fn given_chain_deeper_than_limit_when_building_then_errors() {
        let result = TreeBuilder::with_max_depth(3).build(&chain(4));

        assert!(matches!(
            result,
            Err(DomainError::DepthLimitExceeded { limit: 3, .. })
        ));
    }

    #[test]
    fn given_chain_at_limit_when_building_then_succeeds() {
        let tree = TreeBuilder::with_max_depth(3).build(&chain(3)).unwrap();
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn given_builder_reused_when_building_then_ids_reset() {
        let mut builder = TreeBuilder::new();
        let doc = MindMapNode::leaf("root", "Root");
        builder.build(&doc).unwrap();
        assert!(builder.build(&doc).is_ok());
    }
}
