//! Section locator.
//!
//! A section is the region delimited by
//!
//! ```text
//! /* Begin PBXGroup section */
//! 		...records...
//! /* End PBXGroup section */
//! ```
//!
//! [`locate`] splits it into three byte ranges of the full text: the header
//! (begin marker line, including its newline), the body (the records) and the
//! footer (the newline before the end marker plus the end marker line). The
//! body never contains marker text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::EngineError;

/// Matches either marker. Group 1 is `Begin`/`End`, group 2 the section name.
static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/\*\s*(begin|end)\s+(\w+)\s+section\s*\*/").expect("Invalid section marker regex")
});

/// A located section. All ranges index into [`Section::text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub name: String,
    pub text: &'a str,
    pub header: Range<usize>,
    pub body: Range<usize>,
    pub footer: Range<usize>,
}

impl<'a> Section<'a> {
    pub fn header_text(&self) -> &'a str {
        &self.text[self.header.clone()]
    }

    pub fn body_text(&self) -> &'a str {
        &self.text[self.body.clone()]
    }

    pub fn footer_text(&self) -> &'a str {
        &self.text[self.footer.clone()]
    }

    /// Returns the full text with this section's body replaced by `body`.
    pub fn splice(&self, body: &str) -> String {
        let mut out = String::with_capacity(self.text.len() - self.body.len() + body.len());
        out.push_str(&self.text[..self.body.start]);
        out.push_str(body);
        out.push_str(&self.text[self.body.end..]);
        out
    }
}

/// Locates the section called `name` in `text`.
///
/// Marker keywords and the section name are matched case-insensitively.
///
/// # Errors
/// - [`EngineError::SectionNotFound`] if there is no begin marker.
/// - [`EngineError::MalformedSection`] if the begin marker has no matching end
///   marker, or a second begin marker appears before the end.
pub fn locate<'a>(text: &'a str, name: &str) -> Result<Section<'a>, EngineError> {
    let mut begin: Option<Range<usize>> = None;
    let mut end: Option<Range<usize>> = None;

    for caps in MARKER_REGEX.captures_iter(text) {
        if !caps[2].eq_ignore_ascii_case(name) {
            continue;
        }
        let Some(whole) = caps.get(0) else { continue };
        let is_begin = caps[1].eq_ignore_ascii_case("begin");
        match (&begin, is_begin) {
            (None, true) => begin = Some(whole.range()),
            // A stray end marker before any begin marker is not ours.
            (None, false) => {}
            (Some(_), false) => {
                end = Some(whole.range());
                break;
            }
            (Some(_), true) => {
                return Err(EngineError::MalformedSection {
                    section: name.to_string(),
                    reason: "begin marker repeated before end marker".to_string(),
                });
            }
        }
    }

    let Some(begin) = begin else {
        return Err(EngineError::SectionNotFound {
            section: name.to_string(),
        });
    };
    let Some(end) = end else {
        return Err(EngineError::MalformedSection {
            section: name.to_string(),
            reason: "begin marker has no matching end marker".to_string(),
        });
    };

    let bytes = text.as_bytes();

    let header_end = match text[begin.end..end.start].find('\n') {
        Some(nl) => begin.end + nl + 1,
        None => end.start,
    };

    // Pull the end marker's indentation and the newline before it into the
    // footer so the body ends with the last record.
    let mut footer_start = end.start;
    while footer_start > header_end && matches!(bytes[footer_start - 1], b' ' | b'\t') {
        footer_start -= 1;
    }
    if footer_start > header_end && bytes[footer_start - 1] == b'\n' {
        footer_start -= 1;
        if footer_start > header_end && bytes[footer_start - 1] == b'\r' {
            footer_start -= 1;
        }
    }

    let footer_end = text[end.end..]
        .find('\n')
        .map_or(text.len(), |nl| end.end + nl);
    let footer_end = if footer_end > end.end && bytes[footer_end - 1] == b'\r' {
        footer_end - 1
    } else {
        footer_end
    };

    Ok(Section {
        name: name.to_string(),
        text,
        header: begin.start..header_end,
        body: header_end..footer_start,
        footer: footer_start..footer_end,
    })
}
