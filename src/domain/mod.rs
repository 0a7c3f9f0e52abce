//! Domain layer: tree model, layout geometry and view state
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod document;
pub mod edges;
pub mod error;
pub mod label;
pub mod layout;
pub mod view;

pub use arena::{MindMapArena, NodeData, TreeNode};
pub use builder::{TreeBuilder, DEFAULT_MAX_DEPTH};
pub use document::{parse_document, parse_document_bytes, MindMapNode};
pub use edges::{connector, edges, CubicBezier, Edge, Point};
pub use error::{DomainError, DomainResult, ParseError};
pub use label::{display_label, LabelRule};
pub use layout::{canvas_size, compute_layout, layout_tree, Canvas, Layout, LayoutConfig, PositionedNode};
pub use view::{ViewState, MAX_SCALE, MIN_SCALE};
