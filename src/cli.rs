//! CLI argument parsing for the installer.
//!
//! The CLI is thin: it collects flags and hands them to the workflow layer,
//! which owns all policy.
use crate::registry::DEFAULT_TIMEOUT;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "pdfx",
    version,
    about = "Install PDF components from a registry as source files in your project",
    after_help = "Examples:\n  pdfx list\n  pdfx add table heading\n  pdfx add table --dry-run\n  pdfx diff table\n  pdfx add table --overwrite",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project root containing pdfx.json (defaults to the current directory)
    #[arg(long, value_name = "DIR", global = true)]
    pub cwd: Option<PathBuf>,

    /// Registry base URL, overriding pdfx.json for this run
    #[arg(long, value_name = "URL", global = true)]
    pub registry: Option<String>,

    /// Registry request deadline in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout: u64,

    /// Emit debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    List(ListArgs),
    Add(AddArgs),
    Diff(DiffArgs),
}

#[derive(Parser, Debug)]
#[command(about = "List registry components and whether each is installed")]
pub struct ListArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Install components and their dependencies into the project")]
pub struct AddArgs {
    /// Components to install
    #[arg(required = true, value_name = "NAME")]
    pub components: Vec<String>,

    /// Replace local files that differ from the registry version
    #[arg(long)]
    pub overwrite: bool,

    /// Show what would be written without touching disk
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the install report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Show how local files differ from the registry version")]
pub struct DiffArgs {
    /// Components to compare (dependencies included)
    #[arg(required = true, value_name = "NAME")]
    pub components: Vec<String>,
}
