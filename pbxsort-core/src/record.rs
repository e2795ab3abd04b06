//! Record extractor.
//!
//! A record is one terminated entry of a section body, dictionary or list:
//!
//! ```text
//! 		<key> [/* comment */] [= value] ;      (sections and dictionaries)
//! 				<key> [/* comment */] ,        (lists)
//! ```
//!
//! [`RecordList::split`] cuts a range of text into records plus the
//! separators between them, so that `leading + r0 + sep0 + r1 + ... + trailing`
//! reproduces the range exactly. A record that starts on its own line owns its
//! indentation.

use std::ops::Range;

use crate::scanner::{self, Scan};
use crate::types::ObjectId;

/// One record. Ranges index into the source the list was split from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    /// Leading identifier, or `None` if the record does not start with one.
    pub key: Option<ObjectId>,
    /// Trimmed text of the comment following the key.
    pub comment: Option<&'a str>,
    /// Verbatim record text, from indentation through the terminator.
    pub raw: &'a str,
    pub span: Range<usize>,
    /// Text after `=`, up to (not including) the terminator.
    pub value: Option<Range<usize>>,
}

/// The records of one region, with everything needed to rebuild it.
#[derive(Debug, Clone)]
pub struct RecordList<'a> {
    source: &'a str,
    range: Range<usize>,
    pub records: Vec<Record<'a>>,
}

impl<'a> RecordList<'a> {
    /// Splits `source[range]` into records ending in `terminator`.
    ///
    /// Text after the last terminator (e.g. an unterminated final list item)
    /// is kept as trailing text rather than a record. A record with unbalanced
    /// brackets becomes a keyless record running up to the next line that
    /// opens a record at the same or a shallower indentation.
    pub fn split(source: &'a str, range: Range<usize>, terminator: u8) -> Self {
        let bytes = source.as_bytes();
        let mut records = Vec::new();
        let mut pos = range.start;

        loop {
            let first = scanner::skip_whitespace(bytes, pos);
            if first >= range.end {
                break;
            }
            let start = if source[pos..first].contains('\n') || pos == range.start {
                scanner::line_start(bytes, first).max(pos)
            } else {
                first
            };

            match scanner::find_terminator(bytes, first, range.end, terminator) {
                Scan::Found(term) => {
                    let end = term + 1;
                    records.push(parse_head(source, start..end, first, term));
                    pos = end;
                }
                Scan::Exhausted => break,
                Scan::Malformed => {
                    let end = malformed_end(source, first, range.end, terminator);
                    tracing::debug!(
                        record = source[first..end].lines().next().unwrap_or_default(),
                        "unbalanced brackets; record left unparsed"
                    );
                    records.push(Record::unparsed(source, start..end));
                    pos = end;
                }
            }
        }

        Self {
            source,
            range,
            records,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The region of [`RecordList::source`] this list was split from.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Text before the first record.
    pub fn leading(&self) -> &'a str {
        let end = self.records.first().map_or(self.range.end, |r| r.span.start);
        &self.source[self.range.start..end]
    }

    /// Text after the last record.
    pub fn trailing(&self) -> &'a str {
        match self.records.last() {
            Some(last) => &self.source[last.span.end..self.range.end],
            None => "",
        }
    }

    /// Text between record `i` and record `i + 1`.
    pub fn separator(&self, i: usize) -> &'a str {
        &self.source[self.records[i].span.end..self.records[i + 1].span.start]
    }

    /// First record whose key equals `name`, ignoring ASCII case.
    pub fn attribute(&self, name: &str) -> Option<&Record<'a>> {
        self.records.iter().find(|r| {
            r.key
                .as_ref()
                .is_some_and(|k| k.as_str().eq_ignore_ascii_case(name))
        })
    }

    /// Splits the `{...}` or `(...)` value of `record` into its own list.
    ///
    /// Dictionaries use `;` as terminator, lists use `,`.
    pub fn nested(&self, record: &Record<'a>) -> Option<RecordList<'a>> {
        let value = record.value.clone()?;
        let bytes = self.source.as_bytes();
        let terminator = match bytes.get(value.start)? {
            b'{' => b';',
            b'(' => b',',
            _ => return None,
        };
        let close = scanner::matching_close(bytes, value.start, value.end)?;
        Some(RecordList::split(self.source, value.start + 1..close, terminator))
    }

    /// Value of attribute `name` read as a single token.
    pub fn attribute_token(&self, name: &str) -> Option<&'a str> {
        let value = self.attribute(name)?.value.clone()?;
        scanner::read_token(self.source, value.start).map(|(token, _)| token)
    }

    /// Rebuilds the region with records in `sequence` order.
    ///
    /// `sequence` must be a permutation of `0..len()`. Separators stay in
    /// place, so the identity permutation reproduces the region exactly.
    pub fn rebuild(&self, sequence: &[usize]) -> String {
        debug_assert_eq!(sequence.len(), self.records.len());
        let mut out = String::with_capacity(self.range.len());
        out.push_str(self.leading());
        for (slot, &index) in sequence.iter().enumerate() {
            if slot > 0 {
                out.push_str(self.separator(slot - 1));
            }
            out.push_str(self.records[index].raw);
        }
        out.push_str(self.trailing());
        out
    }
}

impl<'a> Record<'a> {
    fn unparsed(source: &'a str, span: Range<usize>) -> Self {
        Record {
            key: None,
            comment: None,
            raw: &source[span.clone()],
            span,
            value: None,
        }
    }
}

/// End of a malformed record starting at `first`.
///
/// The record runs up to the next line, indented no deeper than `first`,
/// whose first token is followed by `=`, a comment or `terminator`. Without
/// such a line it runs to `limit`. Trailing whitespace is left as separator.
fn malformed_end(source: &str, first: usize, limit: usize, terminator: u8) -> usize {
    let bytes = source.as_bytes();
    let indent = first - scanner::line_start(bytes, first);
    let mut resume = limit;
    let mut pos = first;
    while let Some(nl) = bytes[pos..limit].iter().position(|&b| b == b'\n') {
        let line = pos + nl + 1;
        let head = line
            + bytes[line..limit]
                .iter()
                .take_while(|&&b| b == b' ' || b == b'\t')
                .count();
        if head - line <= indent && opens_record(source, head, terminator) {
            resume = line;
            break;
        }
        pos = line;
    }

    let mut end = resume;
    while end > first && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    end
}

fn opens_record(source: &str, pos: usize, terminator: u8) -> bool {
    let Some((_, after)) = scanner::read_token(source, pos) else {
        return false;
    };
    let bytes = source.as_bytes();
    let next = scanner::skip_whitespace(bytes, after);
    match bytes.get(next) {
        Some(&b'=') => true,
        Some(&b) if b == terminator => true,
        Some(&b'/') => bytes.get(next + 1) == Some(&b'*'),
        _ => false,
    }
}

/// Parses key, comment and value out of the record at `span`.
fn parse_head(source: &str, span: Range<usize>, first: usize, term: usize) -> Record<'_> {
    let bytes = source.as_bytes();

    let Some((key, mut pos)) = scanner::read_token(source, first) else {
        return Record::unparsed(source, span);
    };
    let raw = &source[span.clone()];

    pos = scanner::skip_whitespace(bytes, pos);
    let mut comment = None;
    if let Some(end) = scanner::skip_comment(bytes, pos) {
        if end <= term {
            let inner = &source[pos + 2..end];
            comment = Some(inner.strip_suffix("*/").unwrap_or(inner).trim());
            pos = end;
        }
    }

    let after = scanner::skip_trivia(bytes, pos);
    let value = if after < term && bytes[after] == b'=' {
        let start = scanner::skip_trivia(bytes, after + 1);
        let end = source[start..term].trim_end().len() + start;
        Some(start..end.max(start))
    } else {
        None
    };

    Record {
        key: Some(ObjectId::from(key)),
        comment,
        raw,
        span,
        value,
    }
}

// ---------------------------------------------------------------------------
// Group records
// ---------------------------------------------------------------------------

/// A `children` entry of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRef {
    pub key: ObjectId,
    /// Last path component of the child's comment.
    pub name: Option<String>,
}

/// A PBXGroup record reduced to what the hierarchy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub key: ObjectId,
    pub name: Option<String>,
    pub children: Vec<ChildRef>,
}

/// Extracts group records from a PBXGroup section body.
///
/// Records without a key are skipped. A group without a `children` list is
/// returned with no children.
pub fn extract_groups(body: &str) -> Vec<GroupRecord> {
    let list = RecordList::split(body, 0..body.len(), b';');
    list.records
        .iter()
        .filter_map(|record| {
            let key = record.key.clone()?;
            let children = list
                .nested(record)
                .and_then(|dict| {
                    let attr = dict.attribute("children")?;
                    dict.nested(attr)
                })
                .map(|items| {
                    items
                        .records
                        .iter()
                        .filter_map(|item| {
                            Some(ChildRef {
                                key: item.key.clone()?,
                                name: item.comment.map(display_name),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            Some(GroupRecord {
                key,
                name: record.comment.map(str::to_string),
                children,
            })
        })
        .collect()
}

/// `"Sources/App/main.swift"` → `"main.swift"`.
fn display_name(comment: &str) -> String {
    comment
        .rsplit('/')
        .next()
        .unwrap_or(comment)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILD_FILES: &str = "\t\tF3 /* c.m in Sources */ = {isa = PBXBuildFile; fileRef = R3 /* c.m */; };\n\t\tF1 /* a.m in Sources */ = {isa = PBXBuildFile; fileRef = R1 /* a.m */; };";

    #[test]
    fn split_keeps_indentation_and_reproduces_text() {
        let list = RecordList::split(BUILD_FILES, 0..BUILD_FILES.len(), b';');
        assert_eq!(list.len(), 2);
        assert!(list.records[0].raw.starts_with("\t\tF3 "));
        assert!(list.records[1].raw.starts_with("\t\tF1 "));
        assert_eq!(list.separator(0), "\n");
        assert_eq!(list.rebuild(&[0, 1]), BUILD_FILES);
    }

    #[test]
    fn rebuild_swaps_records_but_not_separators() {
        let list = RecordList::split(BUILD_FILES, 0..BUILD_FILES.len(), b';');
        let swapped = list.rebuild(&[1, 0]);
        let lines: Vec<_> = swapped.lines().collect();
        assert!(lines[0].contains("F1"));
        assert!(lines[1].contains("F3"));
    }

    #[test]
    fn head_parses_key_comment_and_value() {
        let list = RecordList::split(BUILD_FILES, 0..BUILD_FILES.len(), b';');
        let record = &list.records[0];
        assert_eq!(record.key.as_ref().unwrap().as_str(), "F3");
        assert_eq!(record.comment, Some("c.m in Sources"));
        let value = &BUILD_FILES[record.value.clone().unwrap()];
        assert!(value.starts_with('{') && value.ends_with('}'));
    }

    #[test]
    fn nested_dictionary_attribute_lookup_is_case_insensitive() {
        let list = RecordList::split(BUILD_FILES, 0..BUILD_FILES.len(), b';');
        let dict = list.nested(&list.records[1]).unwrap();
        assert_eq!(dict.attribute_token("FILEREF"), Some("R1"));
        assert_eq!(dict.attribute_token("isa"), Some("PBXBuildFile"));
        assert_eq!(dict.attribute_token("missing"), None);
    }

    #[test]
    fn record_without_key_is_kept_unparsed() {
        let text = "\t\t= {broken};\n\t\tOK;";
        let list = RecordList::split(text, 0..text.len(), b';');
        assert_eq!(list.len(), 2);
        assert!(list.records[0].key.is_none());
        assert_eq!(list.records[1].key.as_ref().unwrap().as_str(), "OK");
        assert_eq!(list.rebuild(&[0, 1]), text);
    }

    #[test]
    fn unterminated_tail_becomes_trailing_text() {
        let text = "\n\t\t\tA /* a */,\n\t\t\tB /* b */\n\t\t";
        let list = RecordList::split(text, 0..text.len(), b',');
        assert_eq!(list.len(), 1);
        assert_eq!(list.leading(), "\n");
        assert_eq!(list.trailing(), "\n\t\t\tB /* b */\n\t\t");
    }

    #[test]
    fn unbalanced_record_is_isolated_and_later_records_still_split() {
        let text = "\t\tF3 = {isa = PBXBuildFile; fileRef = R3; };\n\t\tFX = {isa = PBXBuildFile; fileRef = RX; });\n\t\tF2 /* b.m */ = {isa = PBXBuildFile; fileRef = R2; };\n\t\tF1 = {isa = PBXBuildFile; fileRef = R1; };\n";
        let list = RecordList::split(text, 0..text.len(), b';');
        let keys: Vec<_> = list
            .records
            .iter()
            .map(|r| r.key.as_ref().map(ObjectId::as_str))
            .collect();
        assert_eq!(keys, [Some("F3"), None, Some("F2"), Some("F1")]);
        assert_eq!(
            list.records[1].raw,
            "\t\tFX = {isa = PBXBuildFile; fileRef = RX; });"
        );
        assert_eq!(list.trailing(), "\n");
        assert_eq!(list.rebuild(&[0, 1, 2, 3]), text);
    }

    #[test]
    fn unclosed_multiline_record_resumes_at_next_sibling() {
        let text = "\t\tG1 = {\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t\tR1,\n\t\t};\n\t\tG2 = {\n\t\t\tisa = PBXGroup;\n\t\t};";
        let list = RecordList::split(text, 0..text.len(), b';');
        assert_eq!(list.len(), 2);
        assert!(list.records[0].key.is_none());
        assert!(list.records[0].raw.ends_with("\t\t};"));
        assert_eq!(list.records[1].key.as_ref().map(ObjectId::as_str), Some("G2"));
        assert_eq!(list.rebuild(&[1, 0]).matches("isa = PBXGroup;").count(), 2);
    }

    #[test]
    fn same_line_list_items_do_not_swallow_spaces() {
        let text = "A, B, C,";
        let list = RecordList::split(text, 0..text.len(), b',');
        let raws: Vec<_> = list.records.iter().map(|r| r.raw).collect();
        assert_eq!(raws, ["A,", "B,", "C,"]);
        assert_eq!(list.rebuild(&[2, 0, 1]), "C, A, B,");
    }

    #[test]
    fn extract_groups_reads_children_and_names() {
        let body = "\t\tG1 /* App */ = {\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t\tR1 /* a.m */,\n\t\t\t\tG2 /* Support/Files */,\n\t\t\t);\n\t\t\tpath = App;\n\t\t};\n\t\tG2 = {\n\t\t\tisa = PBXGroup;\n\t\t};";
        let groups = extract_groups(body);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.as_str(), "G1");
        assert_eq!(groups[0].name.as_deref(), Some("App"));
        let children: Vec<_> = groups[0]
            .children
            .iter()
            .map(|c| (c.key.as_str(), c.name.as_deref()))
            .collect();
        assert_eq!(children, [("R1", Some("a.m")), ("G2", Some("Files"))]);
        assert!(groups[1].children.is_empty());
        assert!(groups[1].name.is_none());
    }
}
