//! Integration tests for the tidy tree layout.
//!
//! Geometry under the default configuration:
//! - leaf span 140 (node 120 + gap 20), parent span = sum of child spans
//! - x = span start + span / 2, y = level * 100 + 40
//! - canvas = max(total width, 600) by depth * 100 + 100

use std::collections::BTreeMap;
use std::fs;

use rstest::rstest;

use mindmap_layout::domain::{layout_tree, LayoutConfig, PositionedNode, TreeBuilder};
use mindmap_layout::util::testing;

fn layout_json(json: &str) -> mindmap_layout::Layout {
    let arena = TreeBuilder::new().build_from_json(json).expect("valid document");
    layout_tree(&arena, &LayoutConfig::default()).expect("layout")
}

fn find<'a>(root: &'a PositionedNode, id: &str) -> &'a PositionedNode {
    root.iter()
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("node {} not in layout", id))
}

// ============================================================
// Reference scenarios
// ============================================================

#[test]
fn given_root_with_two_leaves_when_layout_then_children_side_by_side() {
    testing::init_test_setup();
    // Arrange
    let json = r#"{"id":"root","label":"Root","children":[
        {"id":"a","label":"A"},{"id":"b","label":"B"}]}"#;

    // Act
    let layout = layout_json(json);

    // Assert
    let a = find(&layout.root, "a");
    let b = find(&layout.root, "b");
    assert_eq!((a.x, a.y), (70.0, 140.0));
    assert_eq!((b.x, b.y), (210.0, 140.0));
    assert_eq!((layout.root.x, layout.root.y), (140.0, 40.0));
    assert_eq!(layout.root.x, (a.x + b.x) / 2.0);
    assert_eq!(layout.total_width, 280.0);
    assert_eq!(layout.depth, 2);
    assert_eq!((layout.canvas.width, layout.canvas.height), (600.0, 300.0));
}

#[test]
fn given_single_root_when_layout_then_one_leaf_span() {
    let layout = layout_json(r#"{"id":"root","label":"Alone"}"#);

    assert_eq!((layout.root.x, layout.root.y), (70.0, 40.0));
    assert_eq!(layout.total_width, 140.0);
    assert_eq!(layout.depth, 1);
    assert_eq!((layout.canvas.width, layout.canvas.height), (600.0, 200.0));
    assert!(layout.root.is_leaf());
}

#[test]
fn given_chain_of_three_when_layout_then_vertical_line() {
    let json = fs::read_to_string("tests/resources/chain.json").unwrap();

    let layout = layout_json(&json);

    let ys: Vec<f64> = layout.root.iter().map(|n| n.y).collect();
    assert_eq!(ys, vec![40.0, 140.0, 240.0]);
    assert!(layout.root.iter().all(|n| n.x == 70.0));
    assert_eq!(layout.depth, 3);
    assert_eq!(layout.canvas.height, 400.0);
}

#[test]
fn given_reference_map_when_layout_then_matches_known_positions() {
    let json = fs::read_to_string("tests/resources/gestao_horizontal.json").unwrap();

    let layout = layout_json(&json);

    // 30 leaves of 140 each
    assert_eq!(layout.total_width, 4200.0);
    assert_eq!(layout.root.node_count(), 40);
    assert_eq!(layout.depth, 4);
    assert_eq!((layout.canvas.width, layout.canvas.height), (4200.0, 500.0));
    assert_eq!((layout.root.x, layout.root.y), (2100.0, 40.0));

    let first = find(&layout.root, "1");
    assert_eq!((first.x, first.y), (210.0, 140.0));
    // "4" starts after 3 + 4 + 7 leaves and spans 7 leaves
    let plan = find(&layout.root, "4");
    assert_eq!(plan.x, 1960.0 + 490.0);
    let deepest = find(&layout.root, "4-1-1");
    assert_eq!((deepest.x, deepest.y), (2030.0, 340.0));
}

// ============================================================
// Structural properties
// ============================================================

#[rstest]
#[case::reference("tests/resources/gestao_horizontal.json")]
#[case::chain("tests/resources/chain.json")]
fn given_document_when_layout_then_children_one_level_below_parent(#[case] path: &str) {
    let layout = layout_json(&fs::read_to_string(path).unwrap());

    for node in layout.root.iter() {
        for child in &node.children {
            assert_eq!(child.y, node.y + 100.0, "{} -> {}", node.id, child.id);
        }
    }
}

#[test]
fn given_reference_map_when_layout_then_same_level_nodes_do_not_overlap() {
    let layout = layout_json(&fs::read_to_string("tests/resources/gestao_horizontal.json").unwrap());

    let mut levels: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for node in layout.root.iter() {
        levels.entry(node.y as i64).or_default().push(node.x);
    }
    for (y, mut xs) in levels {
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in xs.windows(2) {
            assert!(pair[1] - pair[0] >= 140.0, "level y={} too tight: {:?}", y, pair);
        }
    }
}

#[test]
fn given_siblings_when_layout_then_order_is_left_to_right() {
    let layout = layout_json(&fs::read_to_string("tests/resources/gestao_horizontal.json").unwrap());

    for node in layout.root.iter() {
        let xs: Vec<f64> = node.children.iter().map(|c| c.x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]), "children of {} out of order", node.id);
    }
}

#[test]
fn given_same_document_when_layout_twice_then_identical() {
    let json = fs::read_to_string("tests/resources/gestao_horizontal.json").unwrap();
    assert_eq!(layout_json(&json), layout_json(&json));
}

#[test]
fn given_custom_geometry_when_layout_then_uses_it() {
    let config = LayoutConfig {
        node_width: 100.0,
        sibling_gap: 0.0,
        level_height: 50.0,
        top_margin: 10.0,
        ..LayoutConfig::default()
    };
    let arena = TreeBuilder::new()
        .build_from_json(r#"{"id":"r","label":"R","children":[{"id":"a","label":"A"},{"id":"b","label":"B"}]}"#)
        .unwrap();

    let layout = layout_tree(&arena, &config).unwrap();

    assert_eq!(layout.total_width, 200.0);
    assert_eq!((layout.root.x, layout.root.y), (100.0, 10.0));
    assert_eq!(layout.root.children[1].y, 60.0);
}
