use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::document::MindMapNode;
use crate::domain::error::{DomainError, DomainResult};

/// Data payload for mind-map nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Unique node identifier
    pub id: String,
    /// Full label as authored (never truncated)
    pub label: String,
}

impl NodeData {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Node payload
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in display order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based mind-map tree.
///
/// Nodes reference each other through generational indices instead of
/// owning pointers, so every traversal below runs on an explicit stack and
/// nesting depth never translates into call-stack depth.
#[derive(Debug)]
pub struct MindMapArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for MindMapArena {
    fn default() -> Self {
        Self::new()
    }
}

impl MindMapArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a node below `parent`, appended after its existing children.
    /// Inserting with `None` makes the node the root.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub(crate) fn node(&self, idx: Index) -> DomainResult<&TreeNode> {
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::NodeNotFound(format!("{:?}", idx)))
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn find_by_id(&self, id: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.id == id)
            .map(|(idx, _)| idx)
    }

    /// Pre-order traversal from the root, children left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order traversal of the subtree rooted at `start`.
    pub fn iter_from(&self, start: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, Some(start))
    }

    /// Post-order traversal from the root: every child before its parent,
    /// siblings left to right.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, self.root)
    }

    pub fn iter_postorder_from(&self, start: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, Some(start))
    }

    /// Number of levels of the whole tree; 0 for an empty arena.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.root.map(|root| self.depth_of(root)).unwrap_or(0)
    }

    /// Levels from `node_idx` down to its deepest leaf: a leaf is 1, an
    /// internal node is one more than its deepest child.
    #[instrument(level = "trace", skip(self))]
    pub fn depth_of(&self, node_idx: Index) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(node_idx, 1)];

        while let Some((idx, depth)) = stack.pop() {
            if let Some(node) = self.get_node(idx) {
                max_depth = max_depth.max(depth);
                for &child in &node.children {
                    stack.push((child, depth + 1));
                }
            }
        }

        max_depth
    }

    /// Ids of all leaf nodes, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }

    /// Convert the subtree at `idx` back into its wire representation.
    #[instrument(level = "debug", skip(self))]
    pub fn to_document(&self, idx: Index) -> DomainResult<MindMapNode> {
        let mut built: Vec<MindMapNode> = Vec::new();

        for (_, node) in self.iter_postorder_from(idx) {
            let split = built.len().checked_sub(node.children.len()).ok_or_else(|| {
                DomainError::Internal(format!("missing children of {}", node.data.id))
            })?;
            let children = built.split_off(split);
            built.push(MindMapNode {
                id: node.data.id.clone(),
                label: node.data.label.clone(),
                children: if children.is_empty() { None } else { Some(children) },
            });
        }

        built.pop().ok_or_else(|| DomainError::NodeNotFound(format!("{:?}", idx)))
    }
}

pub struct TreeIterator<'a> {
    arena: &'a MindMapArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a MindMapArena, start: Option<Index>) -> Self {
        Self {
            arena,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a MindMapArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a MindMapArena, start: Option<Index>) -> Self {
        Self {
            arena,
            stack: start.map(|idx| (idx, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
