//! Line-oriented diffs between baseline and current content.

use crate::error::{Result, WatchError};

/// Unified diff turning `previous` into `current`.
///
/// UTF-8 content is diffed as text and round-trips through [`apply_diff`].
/// If either side is not valid UTF-8, both sides are diffed as escaped ASCII
/// (`\xff`) so byte-level edits still show up as changed lines.
pub fn compute_diff(previous: &[u8], current: &[u8]) -> String {
    match (std::str::from_utf8(previous), std::str::from_utf8(current)) {
        (Ok(previous), Ok(current)) => diffy::create_patch(previous, current).to_string(),
        _ => diffy::create_patch(&escaped_lines(previous), &escaped_lines(current)).to_string(),
    }
}

/// Escape every line of `bytes` to printable ASCII, keeping line breaks.
fn escaped_lines(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for line in bytes.split_inclusive(|b| *b == b'\n') {
        match line.strip_suffix(b"\n") {
            Some(body) => {
                out.extend(body.escape_ascii().map(char::from));
                out.push('\n');
            }
            None => out.extend(line.escape_ascii().map(char::from)),
        }
    }
    out
}

/// Apply a diff produced by [`compute_diff`] to `base`.
pub fn apply_diff(base: &[u8], diff: &str) -> Result<Vec<u8>> {
    let base = String::from_utf8_lossy(base);
    let patch =
        diffy::Patch::from_str(diff).map_err(|e| WatchError::MalformedDiff(e.to_string()))?;
    let patched =
        diffy::apply(&base, &patch).map_err(|e| WatchError::MalformedDiff(e.to_string()))?;
    Ok(patched.into_bytes())
}
