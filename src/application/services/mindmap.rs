//! Mind-map service
//!
//! Loads mind-map documents, applies the view state, lays them out and
//! renders them. Every call starts from the full input; nothing is cached
//! between calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::application::error_ext::IoResultExt;
use crate::application::render::{fallback_svg, Scene};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    edges, layout_tree, parse_document_bytes, DomainError, Edge, Layout, MindMapArena, TreeBuilder, ViewState,
};
use crate::infrastructure::traits::FileSystem;

/// Outcome of rendering one file of a directory batch.
#[derive(Debug)]
pub struct RenderReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Number of rendered nodes, or the error that replaced the drawing
    pub result: Result<usize, String>,
}

impl RenderReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Service for laying out and rendering mind maps.
pub struct MindMapService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl MindMapService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Parse and validate a JSON document.
    #[instrument(level = "debug", skip(self, json))]
    pub fn parse(&self, json: &str) -> ApplicationResult<MindMapArena> {
        let arena = TreeBuilder::with_max_depth(self.settings.limits.max_depth).build_from_json(json)?;
        Ok(arena)
    }

    /// Parse and validate a document given as raw bytes.
    ///
    /// Invalid UTF-8 is rejected like malformed JSON.
    #[instrument(level = "debug", skip(self, bytes), fields(len = bytes.len()))]
    pub fn parse_bytes(&self, bytes: &[u8]) -> ApplicationResult<MindMapArena> {
        let document = parse_document_bytes(bytes).map_err(DomainError::from)?;
        let arena = TreeBuilder::with_max_depth(self.settings.limits.max_depth).build(&document)?;
        Ok(arena)
    }

    /// Read and parse a document from disk.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<MindMapArena> {
        let bytes = self.fs.read(path).with_path_context("read mind map", path)?;
        self.parse_bytes(&bytes)
    }

    /// Layout of the part of `arena` that `view` shows.
    #[instrument(level = "debug", skip(self, arena, view))]
    pub fn layout(&self, arena: &MindMapArena, view: &ViewState) -> ApplicationResult<Layout> {
        view.validate()?;
        let visible = view.visible_tree(arena)?;
        debug!("layout: {} of {} nodes visible", visible.len(), arena.len());
        Ok(layout_tree(&visible, &self.settings.layout)?)
    }

    pub fn edges(&self, layout: &Layout) -> Vec<Edge> {
        edges(&layout.root, self.settings.layout.edge_tangent)
    }

    pub fn scene(&self, layout: &Layout) -> Scene {
        Scene::from_layout(layout, &self.settings.label, self.settings.layout.edge_tangent)
    }

    #[instrument(level = "debug", skip(self, json, view))]
    pub fn render_svg(&self, json: &str, view: &ViewState) -> ApplicationResult<String> {
        let arena = self.parse(json)?;
        self.render_arena(&arena, view)
    }

    pub fn render_arena(&self, arena: &MindMapArena, view: &ViewState) -> ApplicationResult<String> {
        let layout = self.layout(arena, view)?;
        Ok(self.scene(&layout).to_svg(&self.settings.render, view))
    }

    /// Render `json`, or the localized fallback when the document is rejected.
    ///
    /// Invalid documents never propagate; other failures (e.g. an invalid
    /// view state) still do.
    pub fn render_svg_or_fallback(&self, json: &str, view: &ViewState) -> ApplicationResult<String> {
        match self.render_svg(json, view) {
            Ok(svg) => Ok(svg),
            Err(e) if e.is_invalid_input() => {
                warn!("invalid mind map, rendering fallback: {}", e);
                Ok(self.fallback())
            }
            Err(e) => Err(e),
        }
    }

    pub fn fallback(&self) -> String {
        fallback_svg(&self.settings.render, self.settings.layout.min_canvas_width)
    }

    /// Render `input` to `output`; returns the number of drawn nodes.
    pub fn render_file(&self, input: &Path, output: &Path, view: &ViewState) -> ApplicationResult<usize> {
        self.render_file_with(input, output, |_| view.clone())
    }

    /// Like [`render_file`](Self::render_file), with the view chosen per document.
    #[instrument(level = "debug", skip(self, view_for))]
    pub fn render_file_with<F>(&self, input: &Path, output: &Path, view_for: F) -> ApplicationResult<usize>
    where
        F: Fn(&MindMapArena) -> ViewState,
    {
        let arena = self.load(input)?;
        let view = view_for(&arena);
        let layout = self.layout(&arena, &view)?;
        let svg = self.scene(&layout).to_svg(&self.settings.render, &view);
        self.write_output(output, &svg)?;
        Ok(layout.root.node_count())
    }

    /// Render every `*.json` below `dir` into `out_dir` with one shared view.
    pub fn render_directory(
        &self,
        dir: &Path,
        out_dir: &Path,
        view: &ViewState,
    ) -> ApplicationResult<Vec<RenderReport>> {
        self.render_directory_with(dir, out_dir, |_| view.clone())
    }

    /// Render every `*.json` below `dir` into `out_dir`, one SVG per file.
    ///
    /// `view_for` picks the view of each loaded document. Rejected documents
    /// are written as the fallback drawing and reported with their error;
    /// I/O failures abort the batch.
    #[instrument(level = "debug", skip(self, view_for))]
    pub fn render_directory_with<F>(
        &self,
        dir: &Path,
        out_dir: &Path,
        view_for: F,
    ) -> ApplicationResult<Vec<RenderReport>>
    where
        F: Fn(&MindMapArena) -> ViewState,
    {
        if !self.fs.is_dir(dir) {
            return Err(ApplicationError::OperationFailed {
                context: format!("not a directory: {}", dir.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "directory does not exist",
                )),
            });
        }

        let mut inputs = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.with_path_context("scan directory", dir)?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                inputs.push(path.to_path_buf());
            }
        }
        debug!("render_directory: {} documents in {}", inputs.len(), dir.display());

        let mut reports = Vec::with_capacity(inputs.len());
        for input in inputs {
            let relative = input.strip_prefix(dir).unwrap_or(&input);
            let output = out_dir.join(relative).with_extension("svg");

            let result = match self.render_file_with(&input, &output, &view_for) {
                Ok(count) => Ok(count),
                Err(e) if e.is_invalid_input() => {
                    warn!("{}: {}", input.display(), e);
                    self.write_output(&output, &self.fallback())?;
                    Err(e.to_string())
                }
                Err(e) => return Err(e),
            };
            reports.push(RenderReport {
                input,
                output,
                result,
            });
        }

        Ok(reports)
    }

    pub fn write_output(&self, output: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(output)
            .with_path_context("create output directory", output)?;
        self.fs
            .write(output, content)
            .with_path_context("write output", output)
    }
}
