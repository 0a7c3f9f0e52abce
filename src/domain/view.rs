//! Interactive view state: collapsed nodes, zoom and pan.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::arena::{MindMapArena, NodeData};
use crate::domain::error::{DomainError, DomainResult};

pub const MIN_SCALE: f64 = 0.25;
pub const MAX_SCALE: f64 = 4.0;

/// What the viewer currently sees of a mind map.
///
/// The default shows every node at scale 1 with no pan. A collapsed node is
/// still drawn, its descendants are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub collapsed: BTreeSet<String>,
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            collapsed: BTreeSet::new(),
            scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ViewState {
    /// Only the root expanded: every other internal node starts collapsed.
    pub fn collapsed_below_root(arena: &MindMapArena) -> Self {
        let mut view = Self::default();
        view.collapse_below_root(arena);
        view
    }

    /// Additionally collapse every internal node except the root.
    ///
    /// Scale, pan and already collapsed ids are kept.
    pub fn collapse_below_root(&mut self, arena: &MindMapArena) {
        let root = arena.root();
        self.collapsed.extend(
            arena
                .iter()
                .filter(|(idx, node)| Some(*idx) != root && !node.is_leaf())
                .map(|(_, node)| node.data.id.clone()),
        );
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        !self.collapsed.contains(id)
    }

    /// Flip `id` between expanded and collapsed; returns whether it is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.collapsed.remove(id) {
            true
        } else {
            self.collapsed.insert(id.to_string());
            false
        }
    }

    pub fn collapse(&mut self, id: impl Into<String>) {
        self.collapsed.insert(id.into());
    }

    pub fn expand(&mut self, id: &str) {
        self.collapsed.remove(id);
    }

    /// Multiply the scale by `factor`, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn zoom(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn is_identity_transform(&self) -> bool {
        self.scale == 1.0 && self.pan_x == 0.0 && self.pan_y == 0.0
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(DomainError::InvalidViewState(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !(self.pan_x.is_finite() && self.pan_y.is_finite()) {
            return Err(DomainError::InvalidViewState(format!(
                "pan offset must be finite, got ({}, {})",
                self.pan_x, self.pan_y
            )));
        }
        Ok(())
    }

    /// Copy of `arena` without the descendants of collapsed nodes.
    ///
    /// Ids in `collapsed` that do not occur in the tree are ignored.
    #[instrument(level = "debug", skip(self, arena), fields(collapsed = self.collapsed.len()))]
    pub fn visible_tree(&self, arena: &MindMapArena) -> DomainResult<MindMapArena> {
        let root = arena.root().ok_or(DomainError::EmptyTree)?;
        let mut visible = MindMapArena::new();
        let mut stack = vec![(root, None)];

        while let Some((idx, parent)) = stack.pop() {
            let node = arena.node(idx)?;
            let copied = visible.insert_node(
                NodeData::new(node.data.id.clone(), node.data.label.clone()),
                parent,
            );
            if self.is_expanded(&node.data.id) {
                for &child in node.children.iter().rev() {
                    stack.push((child, Some(copied)));
                }
            }
        }

        Ok(visible)
    }
}
