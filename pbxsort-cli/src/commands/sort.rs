//! `pbxsort sort`: rewrite project files in canonical order.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use pbxsort_sync::{pipeline, ProjectResult, WriteResult};

use super::{display_path, TargetArgs};

/// Arguments for `pbxsort sort`.
#[derive(Args, Debug)]
pub struct SortArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl SortArgs {
    pub fn run(self) -> Result<()> {
        let config = self.target.load_config()?;
        let results = pipeline::run(&self.target.path, &config, self.dry_run)
            .with_context(|| format!("sort failed for '{}'", self.target.path.display()))?;

        if results.is_empty() {
            println!(
                "No Xcode projects found under '{}'.",
                self.target.path.display()
            );
            return Ok(());
        }

        let failed = print_results(&results, &self.target, self.dry_run);
        if failed > 0 {
            bail!("{failed} of {} project(s) could not be sorted", results.len());
        }
        Ok(())
    }
}

/// Prints one line per project and returns the number of failures.
fn print_results(results: &[ProjectResult], target: &TargetArgs, dry_run: bool) -> usize {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let mut failed = 0;

    for result in results {
        let path = display_path(&result.project.pbxproj, &target.path);
        match &result.outcome {
            Ok(report) => {
                let sections = report.changed.len();
                match &report.write {
                    WriteResult::Written { .. } => {
                        println!("{prefix}✎  {path}  ({sections} section(s) reordered)")
                    }
                    WriteResult::WouldWrite { .. } => {
                        println!("{prefix}~  {path}  ({sections} section(s) would be reordered)")
                    }
                    WriteResult::Unchanged { .. } => {
                        println!("{prefix}·  {path}  (already sorted)")
                    }
                }
                for diagnostic in &report.diagnostics {
                    println!("     {} {diagnostic}", "!".yellow().bold());
                }
            }
            Err(err) => {
                failed += 1;
                eprintln!("{prefix}{}  {path}: {err}", "✗".red().bold());
            }
        }
    }
    failed
}
