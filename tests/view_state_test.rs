use std::fs;

use mindmap_layout::domain::{layout_tree, LayoutConfig, MindMapArena, TreeBuilder, ViewState, MAX_SCALE, MIN_SCALE};

fn reference_arena() -> MindMapArena {
    let json = fs::read_to_string("tests/resources/gestao_horizontal.json").unwrap();
    TreeBuilder::new().build_from_json(&json).unwrap()
}

#[test]
fn given_initial_view_when_collapsed_below_root_then_shows_root_and_sections() {
    // Arrange
    let arena = reference_arena();
    let view = ViewState::collapsed_below_root(&arena);

    // Act
    let visible = view.visible_tree(&arena).unwrap();
    let layout = layout_tree(&visible, &LayoutConfig::default()).unwrap();

    // Assert: root plus its six sections, all drawn as leaves
    assert_eq!(visible.len(), 7);
    assert_eq!(layout.depth, 2);
    assert_eq!(layout.total_width, 6.0 * 140.0);
    assert!(layout.root.children.iter().all(|c| c.is_leaf()));
    assert!(view.is_expanded("root"));
    assert!(!view.is_expanded("4"));
}

#[test]
fn given_collapsed_section_when_toggled_then_relayout_grows() {
    let arena = reference_arena();
    let mut view = ViewState::collapsed_below_root(&arena);

    assert!(view.toggle("4"));
    let visible = view.visible_tree(&arena).unwrap();
    let layout = layout_tree(&visible, &LayoutConfig::default()).unwrap();

    // "4" shows its three phases, themselves still collapsed
    assert_eq!(visible.len(), 10);
    assert_eq!(layout.total_width, 8.0 * 140.0);
    assert_eq!(layout.depth, 3);
}

#[test]
fn given_default_view_when_visible_tree_then_everything_shown() {
    let arena = reference_arena();

    let visible = ViewState::default().visible_tree(&arena).unwrap();

    assert_eq!(visible.len(), arena.len());
    assert_eq!(
        visible.to_document(visible.root().unwrap()).unwrap(),
        arena.to_document(arena.root().unwrap()).unwrap()
    );
}

#[test]
fn given_unknown_collapsed_id_when_visible_tree_then_ignored() {
    let arena = reference_arena();
    let mut view = ViewState::default();
    view.collapse("no-such-node");

    assert_eq!(view.visible_tree(&arena).unwrap().len(), 40);
}

#[test]
fn given_repeated_zoom_when_applied_then_clamped() {
    let mut view = ViewState::default();

    for _ in 0..10 {
        view.zoom(2.0);
    }
    assert_eq!(view.scale, MAX_SCALE);

    for _ in 0..10 {
        view.zoom(0.5);
    }
    assert_eq!(view.scale, MIN_SCALE);
}

#[test]
fn given_view_file_json_when_deserializing_then_missing_fields_default() {
    let view: ViewState = serde_json::from_str(r#"{"collapsed":["1","2"],"pan_x":-30}"#).unwrap();

    assert_eq!(view.scale, 1.0);
    assert_eq!(view.pan_x, -30.0);
    assert!(!view.is_expanded("2"));
    assert!(view.validate().is_ok());
}
