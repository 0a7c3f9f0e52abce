//! Parent-to-child connector curves.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::layout::PositionedNode;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Cubic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicBezier {
    /// True when all four points share one x, i.e. the curve is a vertical line.
    pub fn is_straight(&self) -> bool {
        let x = self.start.x;
        self.control1.x == x && self.control2.x == x && self.end.x == x
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Point {
            x: a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            y: a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        }
    }

    /// SVG path data: `M x y C c1x c1y, c2x c2y, x y`.
    pub fn to_svg_path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// A connector between two positioned nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub parent_id: String,
    pub child_id: String,
    pub curve: CubicBezier,
}

/// Curve from the parent's bottom-center to the child's top-center with both
/// control points `tangent` units vertically away from their anchor.
pub fn connector(parent: &PositionedNode, child: &PositionedNode, tangent: f64) -> CubicBezier {
    let start = Point::new(parent.x, parent.bottom());
    let end = Point::new(child.x, child.top());
    CubicBezier {
        start,
        control1: Point::new(start.x, start.y + tangent),
        control2: Point::new(end.x, end.y - tangent),
        end,
    }
}

/// All connectors of the tree, parents in pre-order, children left to right.
pub fn edges(root: &PositionedNode, tangent: f64) -> Vec<Edge> {
    root.iter()
        .flat_map(|parent| {
            parent.children.iter().map(move |child| Edge {
                parent_id: parent.id.clone(),
                child_id: child.id.clone(),
                curve: connector(parent, child, tangent),
            })
        })
        .collect()
}
