//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Plan the static build of a website source tree
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: routeplan.toml)
    #[arg(short = 'C', long, global = true, default_value = "routeplan.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Root directory override shared by every subcommand.
    pub fn root(&self) -> Option<&PathBuf> {
        match &self.command {
            Commands::Plan { args, .. }
            | Commands::Check { args, .. }
            | Commands::Classify { args, .. } => args.root.as_ref(),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Emit the build instruction list as JSON
    #[command(visible_alias = "p")]
    Plan {
        #[command(flatten)]
        args: RootArgs,

        /// Write the plan to a file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Plan without output and report warnings
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: RootArgs,

        /// Fail when the plan contains warnings
        #[arg(long)]
        strict: bool,
    },

    /// Show how individual paths are classified
    Classify {
        #[command(flatten)]
        args: RootArgs,

        /// Paths relative to the site root
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },
}

/// Shared arguments for every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct RootArgs {
    /// Site source directory (overrides `root` in the config file)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,
}
