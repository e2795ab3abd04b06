//! Section resynchronizer: rewrite one section to follow an [`Order`].

use std::collections::HashMap;

use crate::error::{Diagnostic, EngineError};
use crate::record::RecordList;
use crate::section;
use crate::types::{Order, SectionKind};

/// Rewrites the `kind` section of `text` so its records follow `order`.
///
/// Only the section body changes. For build-phase sections only the
/// `files = (...)` list inside each phase record is reordered.
///
/// # Errors
/// [`EngineError::SectionNotFound`] or [`EngineError::MalformedSection`]
/// from locating the section.
pub fn resync(text: &str, order: &Order, kind: SectionKind) -> Result<String, EngineError> {
    let mut diagnostics = Vec::new();
    resync_with_diagnostics(text, order, kind, &mut diagnostics)
}

/// [`resync`], collecting recoverable problems into `diagnostics`.
pub fn resync_with_diagnostics(
    text: &str,
    order: &Order,
    kind: SectionKind,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String, EngineError> {
    let section = section::locate(text, kind.section_name())?;
    let list = RecordList::split(text, section.body.clone(), b';');

    let body = if kind.is_build_phase() {
        rebuild_phases(&list, order, kind, diagnostics)
    } else {
        let sequence = canonical_sequence(&list, order, kind, diagnostics);
        list.rebuild(&sequence)
    };

    tracing::debug!(
        section = kind.section_name(),
        records = list.len(),
        changed = body != section.body_text(),
        "resynced section"
    );
    Ok(section.splice(&body))
}

/// Reorders the `files` list of every phase record, leaving the rest of each
/// record untouched.
fn rebuild_phases(
    list: &RecordList<'_>,
    order: &Order,
    kind: SectionKind,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let source = list.source();
    let mut out = String::with_capacity(list.range().len());
    let mut cursor = list.range().start;

    for record in &list.records {
        let Some(files) = list
            .nested(record)
            .and_then(|dict| dict.attribute("files").and_then(|attr| dict.nested(attr)))
        else {
            continue;
        };
        if files.is_empty() {
            continue;
        }
        let sequence = canonical_sequence(&files, order, kind, diagnostics);
        out.push_str(&source[cursor..files.range().start]);
        out.push_str(&files.rebuild(&sequence));
        cursor = files.range().end;
    }

    out.push_str(&source[cursor..list.range().end]);
    out
}

/// Indices of `list.records` in canonical order.
///
/// Records naming an unlinked build file stay at their original index. The
/// remaining slots take the records matched by the order, in order sequence,
/// then records with no key or whose key the order never mentions, in their
/// original relative order.
fn canonical_sequence(
    list: &RecordList<'_>,
    order: &Order,
    kind: SectionKind,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<usize> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(list.len());
    let mut pinned = vec![false; list.len()];
    for (i, record) in list.records.iter().enumerate() {
        match &record.key {
            Some(key) => {
                index.entry(key.as_str()).or_insert(i);
                pinned[i] = kind.uses_build_keys() && order.unlinked.contains(key);
            }
            None => {
                let excerpt: String = record.raw.trim().chars().take(60).collect();
                tracing::warn!(section = kind.section_name(), index = i, %excerpt, "unparseable record moved to the end");
                diagnostics.push(Diagnostic::UnparseableRecord {
                    section: kind.section_name().to_string(),
                    index: i,
                    excerpt,
                });
            }
        }
    }

    let mut taken = pinned.clone();
    let mut movable = Vec::with_capacity(list.len());
    for node in order.iter() {
        let Some(key) = kind.match_key(node) else {
            continue;
        };
        if let Some(&i) = index.get(key.as_str()) {
            if !taken[i] {
                taken[i] = true;
                movable.push(i);
            }
        }
    }

    let unordered = taken.iter().filter(|t| !**t).count();
    if unordered > 0 {
        tracing::debug!(
            section = kind.section_name(),
            unordered,
            "records not in the group tree keep their relative order at the end"
        );
    }
    movable.extend((0..list.len()).filter(|&i| !taken[i]));

    let mut movable = movable.into_iter();
    (0..list.len())
        .filter_map(|slot| if pinned[slot] { Some(slot) } else { movable.next() })
        .collect()
}
