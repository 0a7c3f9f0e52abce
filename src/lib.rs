//! Mind-map layout engine
//!
//! Turns a hierarchical JSON document into a tidy top-down tree layout,
//! connects parents and children with cubic Bézier curves and renders
//! the result as SVG.
//!
//! Layers, innermost first:
//! - [`domain`]: document model, arena tree, layout geometry, view state
//! - [`application`]: services and SVG rendering
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: command line surface

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{layout_tree, Layout, LayoutConfig, MindMapArena, MindMapNode, PositionedNode, TreeBuilder, ViewState};
