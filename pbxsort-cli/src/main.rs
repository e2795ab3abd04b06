//! pbxsort: keep Xcode project files in canonical order.
//!
//! # Usage
//!
//! ```text
//! pbxsort sort [PATH] [--dry-run] [--recursive] [--config FILE]
//! pbxsort check [PATH] [--recursive] [--json] [--config FILE]
//! pbxsort diff [PATH] [--recursive] [--config FILE]
//! pbxsort order <PATH> [--json]
//! ```
//!
//! `PATH` defaults to the current directory and may also name a
//! `.xcodeproj` bundle or a `project.pbxproj` file.

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{check::CheckArgs, diff::DiffArgs, order::OrderArgs, sort::SortArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pbxsort",
    version,
    about = "Sort Xcode project.pbxproj sections into group-tree order",
    long_about = None,
)]
struct Cli {
    /// Increase log output (-v info, -vv debug). `RUST_LOG` applies otherwise.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite project files in canonical order.
    Sort(SortArgs),

    /// Report whether project files are already in canonical order.
    Check(CheckArgs),

    /// Show unified diff of what sort would change.
    Diff(DiffArgs),

    /// Print the canonical order derived from a project's group tree.
    Order(OrderArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Sort(args) => args.run(),
        Commands::Check(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Order(args) => args.run(),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
