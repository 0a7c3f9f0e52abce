//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mindmap/mindmap.toml`
//! 3. Local config: `<dir>/.mindmap.toml`
//! 4. Environment variables: `MINDMAP_*` prefix, `__` between section and key
//!    (e.g. `MINDMAP_LAYOUT__NODE_WIDTH=150`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::render::SvgStyle;
use crate::application::ApplicationError;
use crate::domain::{LabelRule, LayoutConfig, DEFAULT_MAX_DEPTH};

/// Safety limits on untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of levels a mind map may have
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Unified configuration for mindmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Geometry of the layout pass
    pub layout: LayoutConfig,
    /// Label truncation for display
    pub label: LabelRule,
    /// Input limits
    pub limits: Limits,
    /// SVG appearance and fallback message
    pub render: SvgStyle,
}

/// Raw layout section: `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutConfig {
    pub node_width: Option<f64>,
    pub node_height: Option<f64>,
    pub level_height: Option<f64>,
    pub sibling_gap: Option<f64>,
    pub top_margin: Option<f64>,
    pub edge_tangent: Option<f64>,
    pub min_canvas_width: Option<f64>,
    pub bottom_margin: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLabelRule {
    pub max_chars: Option<usize>,
    pub keep_chars: Option<usize>,
    pub ellipsis: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLimits {
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSvgStyle {
    pub edge_color: Option<String>,
    pub edge_width: Option<f64>,
    pub node_fill: Option<String>,
    pub node_stroke: Option<String>,
    pub node_stroke_width: Option<f64>,
    pub corner_radius: Option<f64>,
    pub text_color: Option<String>,
    pub font_size: Option<f64>,
    pub fallback_message: Option<String>,
    pub fallback_color: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutConfig,
    pub label: RawLabelRule,
    pub limits: RawLimits,
    pub render: RawSvgStyle,
}

fn pick<T: Clone>(overlay: &Option<T>, base: &T) -> T {
    overlay.clone().unwrap_or_else(|| base.clone())
}

impl RawLayoutConfig {
    fn apply(&self, base: &LayoutConfig) -> LayoutConfig {
        LayoutConfig {
            node_width: pick(&self.node_width, &base.node_width),
            node_height: pick(&self.node_height, &base.node_height),
            level_height: pick(&self.level_height, &base.level_height),
            sibling_gap: pick(&self.sibling_gap, &base.sibling_gap),
            top_margin: pick(&self.top_margin, &base.top_margin),
            edge_tangent: pick(&self.edge_tangent, &base.edge_tangent),
            min_canvas_width: pick(&self.min_canvas_width, &base.min_canvas_width),
            bottom_margin: pick(&self.bottom_margin, &base.bottom_margin),
        }
    }
}

impl RawLabelRule {
    fn apply(&self, base: &LabelRule) -> LabelRule {
        LabelRule {
            max_chars: pick(&self.max_chars, &base.max_chars),
            keep_chars: pick(&self.keep_chars, &base.keep_chars),
            ellipsis: pick(&self.ellipsis, &base.ellipsis),
        }
    }
}

impl RawSvgStyle {
    fn apply(&self, base: &SvgStyle) -> SvgStyle {
        SvgStyle {
            edge_color: pick(&self.edge_color, &base.edge_color),
            edge_width: pick(&self.edge_width, &base.edge_width),
            node_fill: pick(&self.node_fill, &base.node_fill),
            node_stroke: pick(&self.node_stroke, &base.node_stroke),
            node_stroke_width: pick(&self.node_stroke_width, &base.node_stroke_width),
            corner_radius: pick(&self.corner_radius, &base.corner_radius),
            text_color: pick(&self.text_color, &base.text_color),
            font_size: pick(&self.font_size, &base.font_size),
            fallback_message: pick(&self.fallback_message, &base.fallback_message),
            fallback_color: pick(&self.fallback_color, &base.fallback_color),
        }
    }
}

/// Get the XDG config directory for mindmap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mindmap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mindmap.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".mindmap.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    parse_raw_settings(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn parse_raw_settings(content: &str) -> Result<RawSettings, toml::de::Error> {
    toml::from_str(content)
}

impl Settings {
    /// Merge overlay config onto self: specified values win, the rest is kept.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            layout: overlay.layout.apply(&self.layout),
            label: overlay.label.apply(&self.label),
            limits: Limits {
                max_depth: pick(&overlay.limits.max_depth, &self.limits.max_depth),
            },
            render: overlay.render.apply(&self.render),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.mindmap.toml`
    ///
    /// The result is validated; an inconsistent layer is reported as a
    /// config error naming the offending key.
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Settings from a TOML string layered onto the defaults (no files, no env).
    pub fn from_toml(content: &str) -> Result<Self, ApplicationError> {
        let raw = parse_raw_settings(content).map_err(|e| ApplicationError::Config {
            message: format!("parse config: {}", e),
        })?;
        let settings = Self::default().merge_with(&raw);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply MINDMAP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MINDMAP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let layout = &mut settings.layout;
        for (key, field) in [
            ("layout.node_width", &mut layout.node_width),
            ("layout.node_height", &mut layout.node_height),
            ("layout.level_height", &mut layout.level_height),
            ("layout.sibling_gap", &mut layout.sibling_gap),
            ("layout.top_margin", &mut layout.top_margin),
            ("layout.edge_tangent", &mut layout.edge_tangent),
            ("layout.min_canvas_width", &mut layout.min_canvas_width),
            ("layout.bottom_margin", &mut layout.bottom_margin),
        ] {
            if let Ok(val) = config.get_float(key) {
                *field = val;
            }
        }

        if let Ok(val) = config.get::<usize>("label.max_chars") {
            settings.label.max_chars = val;
        }
        if let Ok(val) = config.get::<usize>("label.keep_chars") {
            settings.label.keep_chars = val;
        }
        if let Ok(val) = config.get_string("label.ellipsis") {
            settings.label.ellipsis = val;
        }
        if let Ok(val) = config.get::<usize>("limits.max_depth") {
            settings.limits.max_depth = val;
        }
        if let Ok(val) = config.get_string("render.fallback_message") {
            settings.render.fallback_message = val;
        }

        Ok(settings)
    }

    /// Reject settings the layout engine cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.layout.validate().map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })?;
        if self.label.keep_chars > self.label.max_chars {
            return Err(ApplicationError::Config {
                message: format!(
                    "label.keep_chars ({}) must not exceed label.max_chars ({})",
                    self.label.keep_chars, self.label.max_chars
                ),
            });
        }
        if self.limits.max_depth == 0 {
            return Err(ApplicationError::Config {
                message: "limits.max_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# mindmap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/mindmap/mindmap.toml
#   Local:  <dir>/.mindmap.toml
#   Env:    MINDMAP_<SECTION>__<KEY>, e.g. MINDMAP_LAYOUT__NODE_WIDTH=150

[layout]
# node_width = 120.0
# node_height = 40.0
# level_height = 100.0
# sibling_gap = 20.0
# top_margin = 40.0
# edge_tangent = 50.0
# min_canvas_width = 600.0
# bottom_margin = 100.0

[label]
# Labels longer than max_chars show keep_chars characters plus the ellipsis
# max_chars = 20
# keep_chars = 18
# ellipsis = "..."

[limits]
# max_depth = 64

[render]
# edge_color = "#CBD5E1"
# node_stroke = "#6366F1"
# text_color = "#334155"
# fallback_message = "Erro ao carregar mapa mental."
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
