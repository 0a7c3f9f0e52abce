//! Integration tests for Settings loading.
//!
//! Layers, lowest to highest precedence:
//! - compiled defaults
//! - global `mindmap/mindmap.toml`
//! - local `<dir>/.mindmap.toml`
//! - `MINDMAP_<SECTION>__<KEY>` environment variables
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use mindmap_layout::application::services::MindMapService;
use mindmap_layout::application::ApplicationError;
use mindmap_layout::config::{local_config_path, Settings};
use mindmap_layout::domain::ViewState;
use mindmap_layout::infrastructure::traits::RealFileSystem;

#[test]
fn given_no_local_config_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.layout.node_width, 120.0);
    assert_eq!(settings.label.max_chars, 20);
    assert_eq!(settings.render.fallback_message, "Erro ao carregar mapa mental.");
}

#[test]
fn given_local_config_when_load_then_overrides_only_given_keys() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let config = r#"
[layout]
node_width = 150.0

[label]
max_chars = 30
keep_chars = 27
"#;
    fs::write(local_config_path(dir.path()), config).unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.layout.node_width, 150.0);
    assert_eq!(settings.layout.level_height, 100.0, "unspecified keys keep defaults");
    assert_eq!(settings.label.max_chars, 30);
    assert_eq!(settings.label.keep_chars, 27);
    assert_eq!(settings.label.ellipsis, "...");
}

#[test]
fn given_local_geometry_when_rendering_then_layout_uses_it() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "[layout]\nnode_width = 80.0\nsibling_gap = 0.0\n").unwrap();
    let settings = Settings::load(Some(dir.path())).unwrap();
    let service = MindMapService::new(Arc::new(RealFileSystem), Arc::new(settings));

    let arena = service
        .parse(r#"{"id":"r","label":"R","children":[{"id":"a","label":"A"},{"id":"b","label":"B"}]}"#)
        .unwrap();
    let layout = service.layout(&arena, &ViewState::default()).unwrap();

    assert_eq!(layout.total_width, 160.0);
    assert_eq!(layout.root.x, 80.0);
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "[layout\nnode_width = ").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "{:?}", err);
}

#[test]
fn given_inconsistent_label_rule_when_load_then_config_error_names_key() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "[label]\nmax_chars = 5\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().contains("keep_chars"), "{}", err);
}

#[test]
fn given_negative_node_width_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "[layout]\nnode_width = -1.0\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().contains("node_width"), "{}", err);
}

#[test]
fn given_template_when_written_as_local_config_then_loads_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), Settings::template()).unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();

    assert_eq!(settings, Settings::default());
}
