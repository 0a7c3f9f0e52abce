//! Command dispatch: one handler per subcommand

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::MindMapService;
use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands, ViewArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{MindMapArena, ViewState};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;
use crate::util::path::{expand_path, is_stdin};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let command = match &cli.command {
        Some(command) => command,
        None => return Ok(()),
    };

    // Commands that need no settings
    if let Commands::Completion { shell } = command {
        return _completion(*shell);
    }

    let config_dir = config_dir(cli)?;
    if let Commands::Config { command } = command {
        return _config(command, &config_dir);
    }

    let settings = Settings::load(Some(&config_dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Layout {
            input,
            pretty,
            view,
        } => _layout(&container, input, *pretty, view),
        Commands::Render {
            input,
            output,
            strict,
            view,
        } => _render(&container, input, output.as_deref(), *strict, view),
        Commands::RenderDir { dir, out_dir, view } => _render_dir(&container, dir, out_dir, view),
        Commands::Tree {
            input,
            positions,
            view,
        } => _tree(&container, input, *positions, view),
        Commands::Edges { input, view } => _edges(&container, input, view),
        Commands::Depth { input, view } => _depth(&container, input, view),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn config_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(expand_path(dir)),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("current directory", e))),
    }
}

fn read_input(container: &ServiceContainer, input: &Path) -> CliResult<Vec<u8>> {
    if is_stdin(input) {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| CliError::Infra(InfraError::io("read stdin", e)))?;
        return Ok(buf);
    }
    let path = expand_path(input);
    Ok(container
        .fs
        .read(&path)
        .with_path_context("read mind map", &path)?)
}

fn load_arena(container: &ServiceContainer, input: &Path) -> CliResult<MindMapArena> {
    let bytes = read_input(container, input)?;
    Ok(container.mindmap.parse_bytes(&bytes)?)
}

/// View state from `--view FILE`, or the default view.
fn base_view(container: &ServiceContainer, args: &ViewArgs) -> CliResult<ViewState> {
    let Some(path) = &args.view else {
        return Ok(ViewState::default());
    };
    let path = expand_path(path);
    let json = container
        .fs
        .read_to_string(&path)
        .map_err(|e| CliError::InvalidArgs(format!("view file {}: {}", path.display(), e)))?;
    serde_json::from_str::<ViewState>(&json)
        .map_err(|e| CliError::InvalidArgs(format!("view file {}: {}", path.display(), e)))
}

/// View of one document: `base`, then the flags on top of it.
fn document_view(base: &ViewState, args: &ViewArgs, arena: &MindMapArena) -> ViewState {
    let mut view = base.clone();
    if args.collapsed_below_root {
        view.collapse_below_root(arena);
    }
    for id in &args.collapse {
        view.collapse(id.as_str());
    }
    for id in &args.expand {
        view.expand(id);
    }
    if let Some(scale) = args.scale {
        view.scale = scale;
    }
    if let Some(x) = args.pan_x {
        view.pan_x = x;
    }
    if let Some(y) = args.pan_y {
        view.pan_y = y;
    }
    debug!("view: {:?}", view);
    view
}

fn view_state(container: &ServiceContainer, args: &ViewArgs, arena: &MindMapArena) -> CliResult<ViewState> {
    Ok(document_view(&base_view(container, args)?, args, arena))
}

#[instrument(skip(container, view))]
fn _layout(container: &ServiceContainer, input: &Path, pretty: bool, view: &ViewArgs) -> CliResult<()> {
    let arena = load_arena(container, input)?;
    let view = view_state(container, view, &arena)?;
    let layout = container.mindmap.layout(&arena, &view)?;

    let json = if pretty {
        serde_json::to_string_pretty(&layout)?
    } else {
        serde_json::to_string(&layout)?
    };
    output::info(&json);
    Ok(())
}

/// SVG for `bytes`; rejected documents become the fallback unless `strict`.
fn render_document<F>(service: &MindMapService, bytes: &[u8], strict: bool, view_for: F) -> CliResult<String>
where
    F: Fn(&MindMapArena) -> ViewState,
{
    match service.parse_bytes(bytes) {
        Ok(arena) => Ok(service.render_arena(&arena, &view_for(&arena))?),
        Err(e) if e.is_invalid_input() && !strict => {
            output::warning(&format!("{}; rendering fallback", e));
            Ok(service.fallback())
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(container, view))]
fn _render(
    container: &ServiceContainer,
    input: &Path,
    out: Option<&Path>,
    strict: bool,
    view: &ViewArgs,
) -> CliResult<()> {
    let bytes = read_input(container, input)?;
    let base = base_view(container, view)?;
    let service = &container.mindmap;

    let svg = render_document(service, &bytes, strict, |arena| document_view(&base, view, arena))?;

    match out {
        Some(path) => {
            let path = expand_path(path);
            service.write_output(&path, &svg)?;
            output::success(&format!("Wrote {}", path.display()));
        }
        None => output::info(&svg),
    }
    Ok(())
}

#[instrument(skip(container, view))]
fn _render_dir(container: &ServiceContainer, dir: &Path, out_dir: &Path, view: &ViewArgs) -> CliResult<()> {
    let base = base_view(container, view)?;
    let dir = expand_path(dir);
    let out_dir = expand_path(out_dir);

    let reports = container
        .mindmap
        .render_directory_with(&dir, &out_dir, |arena| document_view(&base, view, arena))?;
    for report in &reports {
        match &report.result {
            Ok(count) => output::success_detail(&format!(
                "{} -> {} ({} nodes)",
                report.input.display(),
                report.output.display(),
                count
            )),
            Err(e) => output::failure(&format!("{}: {}", report.input.display(), e)),
        }
    }

    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        return Err(CliError::PartialFailure {
            failed,
            total: reports.len(),
        });
    }
    output::success(&format!("Rendered {} mind maps", reports.len()));
    Ok(())
}

#[instrument(skip(container, view))]
fn _tree(container: &ServiceContainer, input: &Path, positions: bool, view: &ViewArgs) -> CliResult<()> {
    let arena = load_arena(container, input)?;
    let view = view_state(container, view, &arena)?;
    let rule = &container.settings.label;

    if positions {
        let layout = container.mindmap.layout(&arena, &view)?;
        output::info(&layout.root.to_tree_string(rule));
    } else {
        let visible = view.visible_tree(&arena).map_err(ApplicationError::from)?;
        output::info(&visible.to_tree_string(rule));
    }
    Ok(())
}

#[instrument(skip(container, view))]
fn _edges(container: &ServiceContainer, input: &Path, view: &ViewArgs) -> CliResult<()> {
    let arena = load_arena(container, input)?;
    let view = view_state(container, view, &arena)?;
    let layout = container.mindmap.layout(&arena, &view)?;

    let edges = container.mindmap.edges(&layout);
    if edges.is_empty() {
        return Ok(());
    }
    let lines = edges
        .iter()
        .map(|e| format!("{} -> {}: {}", e.parent_id, e.child_id, e.curve))
        .join("\n");
    output::info(&lines);
    Ok(())
}

#[instrument(skip(container, view))]
fn _depth(container: &ServiceContainer, input: &Path, view: &ViewArgs) -> CliResult<()> {
    let arena = load_arena(container, input)?;
    let view = view_state(container, view, &arena)?;
    let layout = container.mindmap.layout(&arena, &view)?;

    output::field("depth", &layout.depth);
    output::field("nodes", &layout.root.node_count());
    output::field("width", &layout.total_width);
    output::field("canvas", &format!("{} x {}", layout.canvas.width, layout.canvas.height));
    Ok(())
}

fn _config(command: &ConfigCommands, config_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(config_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(config_dir)
            };
            init_config(&RealFileSystem, &path)?;
            output::success(&format!("Created {}", path.display()));
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::field("global", &path.display()),
                None => output::field("global", "(unavailable)"),
            }
            output::field("local", &local_config_path(config_dir).display());
        }
    }
    Ok(())
}

/// Write the config template to `path`; an existing file is left alone.
fn init_config(fs: &dyn FileSystem, path: &Path) -> CliResult<()> {
    if fs.exists(path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    fs.ensure_parent(path)
        .map_err(|e| CliError::Infra(InfraError::io("create config directory", e)))?;
    fs.write(path, &Settings::template())
        .map_err(|e| CliError::Infra(InfraError::io("write config", e)))?;
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TreeBuilder;
    use tempfile::TempDir;

    const MAP: &str = r#"{"id":"root","label":"Root","children":[
        {"id":"a","label":"A","children":[{"id":"a1","label":"A1"}]},
        {"id":"b","label":"B","children":[{"id":"b1","label":"B1"}]}]}"#;

    fn container() -> ServiceContainer {
        ServiceContainer::new(Settings::default())
    }

    fn arena() -> MindMapArena {
        TreeBuilder::new().build_from_json(MAP).unwrap()
    }

    #[test]
    fn given_malformed_input_when_rendering_leniently_then_fallback_svg() {
        let svg = render_document(&container().mindmap, b"{\"id\": ", false, |_| ViewState::default()).unwrap();
        assert!(svg.contains("Erro ao carregar mapa mental."));
    }

    #[test]
    fn given_malformed_input_when_rendering_strictly_then_dataerr() {
        let err = render_document(&container().mindmap, b"{\"id\": ", true, |_| ViewState::default()).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_non_utf8_input_when_rendering_leniently_then_fallback_svg() {
        let svg = render_document(&container().mindmap, b"\xff\xfe{", false, |_| ViewState::default()).unwrap();
        assert!(svg.contains("Erro ao carregar mapa mental."));
    }

    #[test]
    fn given_valid_input_when_rendering_then_uses_document_view() {
        let svg = render_document(&container().mindmap, MAP.as_bytes(), true, ViewState::collapsed_below_root).unwrap();
        assert!(svg.contains(r#"data-node="a""#));
        assert!(!svg.contains(r#"data-node="a1""#));
    }

    #[test]
    fn given_view_file_and_collapsed_below_root_when_resolving_then_both_apply() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let view_file = dir.path().join("view.json");
        std::fs::write(&view_file, r#"{"scale": 2.0, "pan_x": 5.0}"#).unwrap();
        let args = ViewArgs {
            view: Some(view_file),
            collapsed_below_root: true,
            expand: vec!["b".to_string()],
            ..ViewArgs::default()
        };

        // Act
        let view = view_state(&container(), &args, &arena()).unwrap();

        // Assert
        assert_eq!((view.scale, view.pan_x), (2.0, 5.0));
        assert!(!view.is_expanded("a"));
        assert!(view.is_expanded("b"));
    }

    #[test]
    fn given_flags_when_resolving_then_override_view_file() {
        let base = ViewState {
            scale: 2.0,
            ..ViewState::default()
        };
        let args = ViewArgs {
            collapse: vec!["b".to_string()],
            scale: Some(0.5),
            ..ViewArgs::default()
        };

        let view = document_view(&base, &args, &arena());

        assert_eq!(view.scale, 0.5);
        assert!(!view.is_expanded("b"));
        assert!(view.is_expanded("a"));
    }

    #[test]
    fn given_unreadable_view_file_when_resolving_then_invalid_args() {
        let args = ViewArgs {
            view: Some(PathBuf::from("/nonexistent/view.json")),
            ..ViewArgs::default()
        };

        let err = base_view(&container(), &args).unwrap_err();

        assert!(matches!(err, CliError::InvalidArgs(_)));
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_collapsed_below_root_when_rendering_directory_then_applied_per_document() {
        // Arrange
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        std::fs::write(input.path().join("map.json"), MAP).unwrap();
        let args = ViewArgs {
            collapsed_below_root: true,
            ..ViewArgs::default()
        };
        let container = container();

        // Act
        let reports = container
            .mindmap
            .render_directory_with(input.path(), output.path(), |arena| {
                document_view(&ViewState::default(), &args, arena)
            })
            .unwrap();

        // Assert
        assert_eq!(reports[0].result, Ok(3));
        let svg = std::fs::read_to_string(output.path().join("map.svg")).unwrap();
        assert!(!svg.contains(r#"data-node="b1""#));
    }

    #[test]
    fn given_existing_config_when_initializing_then_refuses() {
        let dir = TempDir::new().unwrap();
        let path = local_config_path(dir.path());

        init_config(&RealFileSystem, &path).unwrap();
        let err = init_config(&RealFileSystem, &path).unwrap_err();

        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(Settings::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap(), Settings::default());
    }
}
