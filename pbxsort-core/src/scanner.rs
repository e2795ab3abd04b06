//! Byte-level scanning over pbxproj fragments.
//!
//! The format nests `{ ... }` dictionaries and `( ... )` lists, and both
//! comments and quoted strings may contain any bracket or separator. All
//! helpers here skip comments and strings so a separator is only ever found at
//! the nesting depth the caller asked for.

/// Skips a `/* ... */` or `// ...` comment starting at `pos`.
///
/// Returns the position just past the comment, or `None` if `pos` does not
/// start a comment. An unterminated block comment runs to the end of input.
pub(crate) fn skip_comment(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes.get(pos) != Some(&b'/') {
        return None;
    }
    match bytes.get(pos + 1) {
        Some(b'*') => {
            let mut i = pos + 2;
            while i + 1 < bytes.len() {
                if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                    return Some(i + 2);
                }
                i += 1;
            }
            Some(bytes.len())
        }
        Some(b'/') => {
            let mut i = pos + 2;
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            Some(i)
        }
        _ => None,
    }
}

/// Skips a quoted string starting at `pos` (which must hold `"`).
fn skip_string(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skips whitespace only.
pub(crate) fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Skips whitespace and comments.
pub(crate) fn skip_trivia(bytes: &[u8], mut pos: usize) -> usize {
    loop {
        pos = skip_whitespace(bytes, pos);
        match skip_comment(bytes, pos) {
            Some(end) => pos = end,
            None => return pos,
        }
    }
}

/// Result of [`find_terminator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    /// The terminator sits at this position.
    Found(usize),
    /// The range ended at depth zero without a terminator.
    Exhausted,
    /// A closing bracket did not match the innermost open one, or the range
    /// ended with brackets still open.
    Malformed,
}

/// Closing bracket for an opening one.
fn closer(open: u8) -> Option<u8> {
    match open {
        b'{' => Some(b'}'),
        b'(' => Some(b')'),
        _ => None,
    }
}

/// Finds `terminator` at nesting depth zero, scanning `bytes[from..limit]`.
pub(crate) fn find_terminator(bytes: &[u8], from: usize, limit: usize, terminator: u8) -> Scan {
    let mut open = Vec::new();
    let mut i = from;
    while i < limit {
        let b = bytes[i];
        if open.is_empty() && b == terminator {
            return Scan::Found(i);
        }
        match b {
            b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'/' => {
                if let Some(end) = skip_comment(bytes, i) {
                    i = end;
                    continue;
                }
            }
            b'{' | b'(' => open.extend(closer(b)),
            b'}' | b')' => {
                if open.pop() != Some(b) {
                    return Scan::Malformed;
                }
            }
            _ => {}
        }
        i += 1;
    }
    if open.is_empty() {
        Scan::Exhausted
    } else {
        Scan::Malformed
    }
}

/// Finds the bracket closing the one opened at `open`.
pub(crate) fn matching_close(bytes: &[u8], open: usize, limit: usize) -> Option<usize> {
    let mut pending = vec![closer(*bytes.get(open)?)?];
    let mut i = open + 1;
    while i < limit {
        match bytes[i] {
            b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'/' => {
                if let Some(end) = skip_comment(bytes, i) {
                    i = end;
                    continue;
                }
            }
            b @ (b'{' | b'(') => pending.extend(closer(b)),
            b @ (b'}' | b')') => {
                if pending.pop() != Some(b) {
                    return None;
                }
                if pending.is_empty() {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'$')
}

/// Reads an unquoted token or a quoted string at `pos`.
///
/// Returns the token text (quotes stripped) and the position after it.
pub(crate) fn read_token(text: &str, pos: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    match bytes.get(pos)? {
        b'"' => {
            let end = skip_string(bytes, pos);
            let inner_end = end.saturating_sub(1).max(pos + 1);
            Some((&text[pos + 1..inner_end], end))
        }
        b if is_token_byte(*b) => {
            let mut end = pos;
            while end < bytes.len() && is_token_byte(bytes[end]) {
                end += 1;
            }
            Some((&text[pos..end], end))
        }
        _ => None,
    }
}

/// Start of the line containing `pos`.
pub(crate) fn line_start(bytes: &[u8], pos: usize) -> usize {
    bytes[..pos]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |nl| nl + 1)
}
