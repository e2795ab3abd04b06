//! Engine entry points.

use crate::config::Config;
use crate::error::{Diagnostic, EngineError};
use crate::hierarchy::Hierarchy;
use crate::links::resolve_links;
use crate::order::flatten_all;
use crate::record::extract_groups;
use crate::resync::resync_with_diagnostics;
use crate::section;
use crate::types::{Order, SectionKind};

/// Derives the canonical order from the group and build-file sections.
///
/// # Errors
/// - [`EngineError::SectionNotFound`] / [`EngineError::MalformedSection`] if
///   either section cannot be located.
/// - [`EngineError::CyclicHierarchy`] if the group tree has a cycle.
pub fn derive_order(text: &str) -> Result<Order, EngineError> {
    derive_order_with_diagnostics(text).map(|(order, _)| order)
}

fn derive_order_with_diagnostics(text: &str) -> Result<(Order, Vec<Diagnostic>), EngineError> {
    let groups = section::locate(text, SectionKind::Group.section_name())?;
    let build_files = section::locate(text, SectionKind::BuildFile.section_name())?;

    let (links, mut diagnostics) = resolve_links(build_files.body_text());
    let hierarchy = Hierarchy::build(extract_groups(groups.body_text()), &links);
    let (mut order, flatten_diagnostics) = flatten_all(&hierarchy)?;
    order.unlinked = diagnostics
        .iter()
        .filter_map(|d| match d {
            Diagnostic::UnresolvedLink { build_key } => Some(build_key.clone()),
            _ => None,
        })
        .collect();
    diagnostics.extend(flatten_diagnostics);

    tracing::debug!(
        groups = hierarchy.len(),
        links = links.len(),
        roots = order.roots.len(),
        "derived canonical order"
    );
    Ok((order, diagnostics))
}

/// Result of [`reorder`].
#[derive(Debug, Clone)]
pub struct Reordered {
    pub text: String,
    pub order: Order,
    /// Sections whose body changed.
    pub changed: Vec<SectionKind>,
    /// Optional build-phase sections absent from the file.
    pub skipped: Vec<SectionKind>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Reordered {
    pub fn is_changed(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Derives the order once, then resyncs every configured section in
/// sequence, each on the output of the previous one.
///
/// # Errors
/// Any [`EngineError`] from [`derive_order`] or from a required section.
pub fn reorder(text: &str, config: &Config) -> Result<Reordered, EngineError> {
    let (order, mut diagnostics) = derive_order_with_diagnostics(text)?;

    let mut current = text.to_string();
    let mut changed = Vec::new();
    let mut skipped = Vec::new();

    for kind in config.sections() {
        match resync_with_diagnostics(&current, &order, kind, &mut diagnostics) {
            Ok(next) => {
                if next != current {
                    changed.push(kind);
                    current = next;
                }
            }
            Err(EngineError::SectionNotFound { section })
                if kind.is_build_phase() && !config.require_build_phases =>
            {
                tracing::debug!(section = %section, "optional section absent; skipped");
                skipped.push(kind);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(Reordered {
        text: current,
        order,
        changed,
        skipped,
        diagnostics,
    })
}
