//! `pbxsort order <PATH>`: print the canonical order of one project.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use pbxsort_core::{derive_order, HierarchyNode, Order};
use pbxsort_detector::find_projects;

use super::discover_config;

/// Arguments for `pbxsort order`.
#[derive(Args, Debug)]
pub struct OrderArgs {
    /// `.xcodeproj` bundle, `project.pbxproj` file, or a directory holding
    /// exactly one bundle.
    pub path: PathBuf,

    /// Emit the order as a JSON tree.
    #[arg(long)]
    pub json: bool,

    /// YAML config file (default: .pbxsort.yaml, then the user config dir).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl OrderArgs {
    pub fn run(self) -> Result<()> {
        let config = discover_config(&self.path, self.config.as_deref())?;
        let mut projects = find_projects(&self.path, &config)
            .with_context(|| format!("no project at '{}'", self.path.display()))?;
        let project = match projects.len() {
            1 => projects.remove(0),
            0 => bail!("no Xcode project found under '{}'", self.path.display()),
            n => bail!(
                "'{}' holds {n} projects; pass a .xcodeproj bundle instead",
                self.path.display()
            ),
        };

        let text = std::fs::read_to_string(&project.pbxproj)
            .with_context(|| format!("failed to read {}", project.pbxproj.display()))?;
        let order = derive_order(&text)
            .with_context(|| format!("cannot derive order for {}", project.pbxproj.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&order).context("failed to serialize order JSON")?
            );
        } else {
            print_tree(&order);
        }
        Ok(())
    }
}

fn print_tree(order: &Order) {
    for root in &order.roots {
        print_node(root, 0);
    }
}

fn print_node(node: &HierarchyNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let name = node.name.as_deref().unwrap_or("(unnamed)");
    let mut line = format!("{indent}{name}  {}", node.key.as_str().bright_black());
    if let Some(build_key) = &node.build_key {
        line.push_str(&format!("  build {}", build_key.as_str().bright_black()));
    }
    println!("{line}");
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
