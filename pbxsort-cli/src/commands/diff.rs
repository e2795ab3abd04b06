//! `pbxsort diff`: show unified diffs for what sort would change.

use anyhow::{bail, Context, Result};
use clap::Args;

use pbxsort_detector::find_projects;
use pbxsort_sync::diff_project;

use super::{display_path, TargetArgs};

/// Arguments for `pbxsort diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let config = self.target.load_config()?;
        let projects = find_projects(&self.target.path, &config)
            .with_context(|| format!("diff failed for '{}'", self.target.path.display()))?;

        let mut shown = 0;
        let mut failed = 0;
        for project in &projects {
            match diff_project(project, &config, &self.target.path) {
                Ok(Some(diff)) => {
                    shown += 1;
                    print!("{}", diff.unified_diff);
                    if !diff.unified_diff.ends_with('\n') {
                        println!();
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    failed += 1;
                    eprintln!(
                        "{}: {err}",
                        display_path(&project.pbxproj, &self.target.path)
                    );
                }
            }
        }

        if shown == 0 && failed == 0 {
            println!("No differences.");
        }
        if failed > 0 {
            bail!("{failed} of {} project(s) could not be diffed", projects.len());
        }
        Ok(())
    }
}
