//! Tidy top-down layout of a mind-map tree.
//!
//! Every subtree owns a horizontal span. A leaf's span is one node plus the
//! sibling gap; an internal node's span is exactly the sum of its children's
//! spans (its own width is not added). Siblings' spans are packed left to
//! right without gaps, and each node is centered on its span. There is no
//! compaction: a wide subtree pushes its ancestors' siblings apart.

use std::collections::HashMap;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::MindMapArena;
use crate::domain::error::{DomainError, DomainResult};

/// Geometry constants of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Vertical distance between consecutive levels
    pub level_height: f64,
    pub sibling_gap: f64,
    pub top_margin: f64,
    /// Vertical offset of the connector control points from their anchors
    pub edge_tangent: f64,
    pub min_canvas_width: f64,
    pub bottom_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 120.0,
            node_height: 40.0,
            level_height: 100.0,
            sibling_gap: 20.0,
            top_margin: 40.0,
            edge_tangent: 50.0,
            min_canvas_width: 600.0,
            bottom_margin: 100.0,
        }
    }
}

impl LayoutConfig {
    /// Horizontal span of a leaf subtree.
    pub fn leaf_span(&self) -> f64 {
        self.node_width + self.sibling_gap
    }

    /// Center y of a node at `depth` (root = 0).
    pub fn level_y(&self, depth: usize) -> f64 {
        depth as f64 * self.level_height + self.top_margin
    }

    pub fn validate(&self) -> DomainResult<()> {
        let positive = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("level_height", self.level_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DomainError::InvalidLayoutConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        let non_negative = [
            ("sibling_gap", self.sibling_gap),
            ("top_margin", self.top_margin),
            ("edge_tangent", self.edge_tangent),
            ("min_canvas_width", self.min_canvas_width),
            ("bottom_margin", self.bottom_margin),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DomainError::InvalidLayoutConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// A node with its computed geometry. `x`/`y` are the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub children: Vec<PositionedNode>,
}

impl PositionedNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order traversal, children left to right.
    pub fn iter(&self) -> PositionedIter<'_> {
        PositionedIter { stack: vec![self] }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }
}

pub struct PositionedIter<'a> {
    stack: Vec<&'a PositionedNode>,
}

impl<'a> Iterator for PositionedIter<'a> {
    type Item = &'a PositionedNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Drawing surface size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

/// Canvas for a tree of `depth` levels whose span is `total_width`.
pub fn canvas_size(total_width: f64, depth: usize, config: &LayoutConfig) -> Canvas {
    Canvas {
        width: total_width.max(config.min_canvas_width),
        height: depth as f64 * config.level_height + config.bottom_margin,
    }
}

/// Complete layout of one tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub root: PositionedNode,
    pub total_width: f64,
    pub depth: usize,
    pub canvas: Canvas,
}

/// Lay out the subtree rooted at `node`.
///
/// `depth` is the level of `node` (root = 0) and `start_x` the left edge of
/// its span. Returns the positioned copy of the subtree and its span width.
#[instrument(level = "debug", skip(arena, config))]
pub fn compute_layout(
    arena: &MindMapArena,
    node: Index,
    depth: usize,
    start_x: f64,
    config: &LayoutConfig,
) -> DomainResult<(PositionedNode, f64)> {
    arena.node(node)?;

    // Bottom-up: span of every subtree
    let mut spans: HashMap<Index, f64> = HashMap::new();
    for (idx, current) in arena.iter_postorder_from(node) {
        let span = if current.is_leaf() {
            config.leaf_span()
        } else {
            let mut sum = 0.0;
            for child in &current.children {
                sum += lookup(&spans, *child)?;
            }
            sum
        };
        spans.insert(idx, span);
    }

    // Top-down: left edge and level of every subtree
    let mut placement: HashMap<Index, (f64, usize)> = HashMap::new();
    placement.insert(node, (start_x, depth));
    for (idx, current) in arena.iter_from(node) {
        let (left, level) = lookup(&placement, idx)?;
        let mut cursor = left;
        for &child in &current.children {
            placement.insert(child, (cursor, level + 1));
            cursor += lookup(&spans, child)?;
        }
    }

    // Bottom-up again: assemble owned output, children popped off in order
    let mut built: Vec<PositionedNode> = Vec::new();
    for (idx, current) in arena.iter_postorder_from(node) {
        let split = built
            .len()
            .checked_sub(current.children.len())
            .ok_or_else(|| DomainError::Internal(format!("missing children of {}", current.data.id)))?;
        let children = built.split_off(split);
        let (left, level) = lookup(&placement, idx)?;
        let span = lookup(&spans, idx)?;
        built.push(PositionedNode {
            id: current.data.id.clone(),
            label: current.data.label.clone(),
            x: left + span / 2.0,
            y: config.level_y(level),
            width: config.node_width,
            height: config.node_height,
            children,
        });
    }

    let positioned = built
        .pop()
        .ok_or_else(|| DomainError::Internal("layout produced no nodes".to_string()))?;
    let total_width = lookup(&spans, node)?;
    Ok((positioned, total_width))
}

/// Lay out the whole tree starting at x = 0 and size its canvas.
#[instrument(level = "debug", skip(arena, config))]
pub fn layout_tree(arena: &MindMapArena, config: &LayoutConfig) -> DomainResult<Layout> {
    let root = arena.root().ok_or(DomainError::EmptyTree)?;
    let (positioned, total_width) = compute_layout(arena, root, 0, 0.0, config)?;
    let depth = arena.depth();
    let canvas = canvas_size(total_width, depth, config);
    debug!(
        "layout: {} nodes, width {}, depth {}, canvas {}x{}",
        arena.len(),
        total_width,
        depth,
        canvas.width,
        canvas.height
    );
    Ok(Layout {
        root: positioned,
        total_width,
        depth,
        canvas,
    })
}

fn lookup<T: Copy>(map: &HashMap<Index, T>, idx: Index) -> DomainResult<T> {
    map.get(&idx)
        .copied()
        .ok_or_else(|| DomainError::Internal(format!("node {:?} visited out of order", idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::NodeData;

    #[test]
    fn given_single_leaf_when_laying_out_then_centered_in_leaf_span() {
        let mut arena = MindMapArena::new();
        let root = arena.insert_node(NodeData::new("root", "Root"), None);

        let (node, width) = compute_layout(&arena, root, 0, 0.0, &LayoutConfig::default()).unwrap();

        assert_eq!(width, 140.0);
        assert_eq!(node.x, 70.0);
        assert_eq!(node.y, 40.0);
        assert_eq!((node.width, node.height), (120.0, 40.0));
    }

    #[test]
    fn given_subtree_with_offset_when_laying_out_then_starts_at_offset() {
        let mut arena = MindMapArena::new();
        let root = arena.insert_node(NodeData::new("root", "Root"), None);
        let a = arena.insert_node(NodeData::new("a", "A"), Some(root));

        let (node, width) = compute_layout(&arena, a, 2, 500.0, &LayoutConfig::default()).unwrap();

        assert_eq!(width, 140.0);
        assert_eq!(node.x, 570.0);
        assert_eq!(node.y, 240.0);
    }

    #[test]
    fn given_one_child_parent_when_laying_out_then_width_is_child_span() {
        let mut arena = MindMapArena::new();
        let root = arena.insert_node(NodeData::new("root", "Root"), None);
        arena.insert_node(NodeData::new("a", "A"), Some(root));

        let layout = layout_tree(&arena, &LayoutConfig::default()).unwrap();

        assert_eq!(layout.total_width, 140.0);
        assert_eq!(layout.root.x, layout.root.children[0].x);
    }

    #[test]
    fn given_empty_arena_when_laying_out_then_errors() {
        let result = layout_tree(&MindMapArena::new(), &LayoutConfig::default());
        assert!(matches!(result, Err(DomainError::EmptyTree)));
    }

    #[test]
    fn given_small_tree_when_sizing_canvas_then_uses_minimum_width() {
        let canvas = canvas_size(140.0, 1, &LayoutConfig::default());
        assert_eq!(canvas, Canvas { width: 600.0, height: 200.0 });
    }

    #[test]
    fn given_negative_gap_when_validating_then_rejects() {
        let config = LayoutConfig {
            sibling_gap: -1.0,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(LayoutConfig::default().validate().is_ok());
    }
}
