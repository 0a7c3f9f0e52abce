//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Lay out mind maps as tidy trees and render them as SVG
#[derive(Parser, Debug)]
#[command(name = "mindmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .mindmap.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// What part of the map is shown, and how.
#[derive(Args, Debug, Default, Clone)]
pub struct ViewArgs {
    /// View state JSON file (collapsed ids, scale, pan)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub view: Option<PathBuf>,

    /// Collapse a node (repeatable)
    #[arg(long = "collapse", value_name = "ID")]
    pub collapse: Vec<String>,

    /// Start with only the root expanded (applied on top of --view)
    #[arg(long)]
    pub collapsed_below_root: bool,

    /// Expand a node (repeatable, applied after the collapse options)
    #[arg(long = "expand", value_name = "ID")]
    pub expand: Vec<String>,

    /// Zoom factor
    #[arg(long)]
    pub scale: Option<f64>,

    /// Horizontal pan offset
    #[arg(long, allow_negative_numbers = true)]
    pub pan_x: Option<f64>,

    /// Vertical pan offset
    #[arg(long, allow_negative_numbers = true)]
    pub pan_y: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the positioned tree and canvas as JSON
    Layout {
        /// Mind map JSON file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Render a mind map as SVG
    Render {
        /// Mind map JSON file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Fail on invalid input instead of rendering the fallback message
        #[arg(long)]
        strict: bool,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Render every *.json below a directory
    RenderDir {
        /// Directory to scan
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
        /// Output directory for the SVG files
        #[arg(value_hint = ValueHint::DirPath)]
        out_dir: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show the map as a text outline
    Tree {
        /// Mind map JSON file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Include computed node centers
        #[arg(long)]
        positions: bool,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// List connector curves as SVG path data
    Edges {
        /// Mind map JSON file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show depth, node count and canvas size
    Depth {
        /// Mind map JSON file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
