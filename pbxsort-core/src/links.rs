//! Cross-reference resolver: file reference → build file.

use std::collections::HashMap;

use crate::error::Diagnostic;
use crate::record::RecordList;
use crate::types::ObjectId;

/// Maps a reference identifier to the build identifier wrapping it.
///
/// A reference wrapped by several build files (the same file in two targets)
/// keeps only the last one seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap {
    links: HashMap<ObjectId, ObjectId>,
}

impl LinkMap {
    pub fn get(&self, reference: &str) -> Option<&ObjectId> {
        self.links.get(reference)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Builds the link map from a PBXBuildFile section body.
///
/// Records without a `fileRef` attribute (package products, malformed
/// entries) are left out and reported as [`Diagnostic::UnresolvedLink`].
pub fn resolve_links(body: &str) -> (LinkMap, Vec<Diagnostic>) {
    let list = RecordList::split(body, 0..body.len(), b';');
    let mut map = LinkMap::default();
    let mut diagnostics = Vec::new();

    for record in &list.records {
        let Some(build_key) = record.key.clone() else {
            continue;
        };
        let file_ref = list
            .nested(record)
            .and_then(|dict| dict.attribute_token("fileRef"));
        match file_ref {
            Some(reference) => {
                if let Some(previous) = map.links.insert(ObjectId::from(reference), build_key.clone()) {
                    tracing::debug!(
                        reference,
                        previous = %previous,
                        current = %build_key,
                        "file reference wrapped by more than one build file; keeping the last"
                    );
                }
            }
            None => {
                tracing::warn!(build_key = %build_key, "build file has no fileRef");
                diagnostics.push(Diagnostic::UnresolvedLink { build_key });
            }
        }
    }

    (map, diagnostics)
}
