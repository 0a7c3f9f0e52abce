//! Scene construction and SVG serialization.
//!
//! A [`Scene`] is the ordered draw list a vector renderer consumes. Order is
//! the stacking contract: for each node, every child connector is followed
//! by that child's subtree, and the node itself comes last, so node shapes
//! always cover the connectors that reach them.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::domain::{connector, CubicBezier, LabelRule, Layout, PositionedNode, ViewState};

/// Appearance of the rendered SVG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgStyle {
    pub edge_color: String,
    pub edge_width: f64,
    pub node_fill: String,
    pub node_stroke: String,
    pub node_stroke_width: f64,
    pub corner_radius: f64,
    pub text_color: String,
    pub font_size: f64,
    /// Localized text shown when a mind map cannot be loaded
    pub fallback_message: String,
    pub fallback_color: String,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            edge_color: "#CBD5E1".to_string(),
            edge_width: 2.0,
            node_fill: "white".to_string(),
            node_stroke: "#6366F1".to_string(),
            node_stroke_width: 2.0,
            corner_radius: 8.0,
            text_color: "#334155".to_string(),
            font_size: 10.0,
            fallback_message: "Erro ao carregar mapa mental.".to_string(),
            fallback_color: "#EF4444".to_string(),
        }
    }
}

/// One primitive of the scene. Node coordinates are the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawItem {
    Edge {
        parent_id: String,
        child_id: String,
        curve: CubicBezier,
    },
    Node {
        id: String,
        label: String,
        display_label: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub items: Vec<DrawItem>,
}

impl Scene {
    pub fn from_layout(layout: &Layout, rule: &LabelRule, edge_tangent: f64) -> Self {
        let mut items = Vec::with_capacity(layout.root.node_count() * 2);
        push_subtree(&layout.root, rule, edge_tangent, &mut items);
        Self {
            width: layout.canvas.width,
            height: layout.canvas.height,
            items,
        }
    }

    pub fn node_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, DrawItem::Node { .. }))
            .count()
    }

    pub fn edge_count(&self) -> usize {
        self.items.len() - self.node_count()
    }

    /// Serialize as a standalone SVG document with the view transform applied.
    pub fn to_svg(&self, style: &SvgStyle, view: &ViewState) -> String {
        let mut out = String::new();
        open_svg(&mut out, self.width, self.height);

        let transformed = !view.is_identity_transform();
        if transformed {
            let _ = write!(
                out,
                r#"<g transform="translate({} {}) scale({})">"#,
                view.pan_x, view.pan_y, view.scale
            );
        }

        for item in &self.items {
            match item {
                DrawItem::Edge {
                    parent_id,
                    child_id,
                    curve,
                } => {
                    out.push_str(r#"<path data-edge=""#);
                    escape_xml_into(&mut out, parent_id);
                    out.push_str("->");
                    escape_xml_into(&mut out, child_id);
                    let _ = write!(
                        out,
                        r#"" d="{}" stroke="{}" stroke-width="{}" fill="none"/>"#,
                        curve.to_svg_path(),
                        escape_xml(&style.edge_color),
                        style.edge_width
                    );
                }
                DrawItem::Node {
                    id,
                    label,
                    display_label,
                    x,
                    y,
                    width,
                    height,
                } => {
                    out.push_str(r#"<g data-node=""#);
                    escape_xml_into(&mut out, id);
                    let _ = write!(out, r#"" transform="translate({} {})">"#, x, y);
                    out.push_str("<title>");
                    escape_xml_into(&mut out, label);
                    out.push_str("</title>");
                    let _ = write!(
                        out,
                        r#"<rect width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                        width,
                        height,
                        style.corner_radius,
                        escape_xml(&style.node_fill),
                        escape_xml(&style.node_stroke),
                        style.node_stroke_width
                    );
                    let _ = write!(
                        out,
                        r#"<text x="{}" y="{}" dy=".35em" text-anchor="middle" font-size="{}px" font-weight="600" fill="{}">"#,
                        width / 2.0,
                        height / 2.0,
                        style.font_size,
                        escape_xml(&style.text_color)
                    );
                    escape_xml_into(&mut out, display_label);
                    out.push_str("</text></g>");
                }
            }
        }

        if transformed {
            out.push_str("</g>");
        }
        out.push_str("</svg>\n");
        out
    }
}

fn push_subtree(node: &PositionedNode, rule: &LabelRule, tangent: f64, items: &mut Vec<DrawItem>) {
    for child in &node.children {
        items.push(DrawItem::Edge {
            parent_id: node.id.clone(),
            child_id: child.id.clone(),
            curve: connector(node, child, tangent),
        });
        push_subtree(child, rule, tangent, items);
    }
    items.push(DrawItem::Node {
        id: node.id.clone(),
        label: node.label.clone(),
        display_label: rule.display(&node.label).into_owned(),
        x: node.left(),
        y: node.top(),
        width: node.width,
        height: node.height,
    });
}

/// Placeholder document shown instead of a mind map that failed to load.
pub fn fallback_svg(style: &SvgStyle, min_width: f64) -> String {
    let height = 80.0;
    let mut out = String::new();
    open_svg(&mut out, min_width, height);
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="14px" fill="{}" role="alert">"#,
        min_width / 2.0,
        height / 2.0,
        escape_xml(&style.fallback_color)
    );
    escape_xml_into(&mut out, &style.fallback_message);
    out.push_str("</text></svg>\n");
    out
}

fn open_svg(out: &mut String, width: f64, height: f64) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img">"#,
        w = width,
        h = height
    );
}

fn escape_xml_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}
