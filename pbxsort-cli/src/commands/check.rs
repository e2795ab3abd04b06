//! `pbxsort check`: report projects that are not in canonical order.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use pbxsort_core::SectionKind;
use pbxsort_sync::{pipeline, ProjectResult, ProjectStatus};

use super::{display_path, TargetArgs};

/// Arguments for `pbxsort check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let config = self.target.load_config()?;
        let results = pipeline::run(&self.target.path, &config, true)
            .with_context(|| format!("check failed for '{}'", self.target.path.display()))?;

        let report = build_report(&results, &self.target);
        let unsorted = report.summary.unsorted;
        let failed = report.summary.failed;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize check JSON")?
            );
        } else {
            print_table(&report, &self.target);
        }

        if unsorted + failed > 0 {
            bail!("{unsorted} unsorted, {failed} failed");
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct CheckReport {
    summary: CheckSummary,
    projects: Vec<ProjectCheck>,
}

#[derive(Serialize)]
struct CheckSummary {
    projects: usize,
    sorted: usize,
    unsorted: usize,
    failed: usize,
}

#[derive(Serialize)]
struct ProjectCheck {
    name: String,
    path: String,
    status: ProjectStatus,
    sections: Vec<SectionKind>,
    diagnostics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Tabled)]
struct CheckTableRow {
    #[tabled(rename = "project")]
    name: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn build_report(results: &[ProjectResult], target: &TargetArgs) -> CheckReport {
    let projects: Vec<ProjectCheck> = results
        .iter()
        .map(|result| {
            let (sections, diagnostics, error) = match &result.outcome {
                Ok(report) => (
                    report.changed.clone(),
                    report.diagnostics.iter().map(ToString::to_string).collect(),
                    None,
                ),
                Err(err) => (Vec::new(), Vec::new(), Some(err.to_string())),
            };
            ProjectCheck {
                name: result.project.name.clone(),
                path: display_path(&result.project.pbxproj, &target.path),
                status: result.status(),
                sections,
                diagnostics,
                error,
            }
        })
        .collect();

    let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();
    CheckReport {
        summary: CheckSummary {
            projects: projects.len(),
            sorted: count(ProjectStatus::Sorted),
            unsorted: count(ProjectStatus::Unsorted),
            failed: count(ProjectStatus::Failed),
        },
        projects,
    }
}

fn print_table(report: &CheckReport, target: &TargetArgs) {
    if report.projects.is_empty() {
        println!("No Xcode projects found under '{}'.", target.path.display());
        return;
    }

    let rows: Vec<CheckTableRow> = report
        .projects
        .iter()
        .map(|p| CheckTableRow {
            name: p.name.clone(),
            status: status_label(p.status),
            detail: status_detail(p),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let summary = &report.summary;
    println!(
        "{} projects | {} sorted | {} unsorted | {} failed",
        summary.projects, summary.sorted, summary.unsorted, summary.failed
    );
    if summary.unsorted > 0 {
        println!("Run 'pbxsort sort' to reorder unsorted projects.");
    }
}

fn status_label(status: ProjectStatus) -> String {
    match status {
        ProjectStatus::Sorted => "SORTED".green().bold().to_string(),
        ProjectStatus::Unsorted => "UNSORTED".yellow().bold().to_string(),
        ProjectStatus::Failed => "FAILED".red().bold().to_string(),
    }
}

fn status_detail(project: &ProjectCheck) -> String {
    if let Some(error) = &project.error {
        return error.clone();
    }
    let mut detail = if project.sections.is_empty() {
        "in canonical order".to_string()
    } else {
        project
            .sections
            .iter()
            .map(|kind| kind.section_name())
            .collect::<Vec<_>>()
            .join(", ")
    };
    if !project.diagnostics.is_empty() {
        detail.push_str(&format!(" ({} warning(s))", project.diagnostics.len()));
    }
    detail
}
