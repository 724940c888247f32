//! Plain text comparison stage.
//!
//! The unconditional fallback: one comparable line per physical input line.
//! Content can never fail here; only I/O on file pairs can.

use super::{ComparableLines, CompareView, InputPair, Resolution, Strategy};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Attempts the text stage. Always produces a result.
///
/// # Errors
///
/// Returns an error only if a file cannot be read.
pub(crate) fn attempt(pair: &InputPair, _view: &CompareView) -> Result<Option<Resolution>> {
    let (lines_a, lines_b) = match pair {
        InputPair::Files { a, b } => (file_lines(a)?, file_lines(b)?),
        InputPair::Texts { a, b } => (text_lines(a), text_lines(b)),
    };

    debug!(
        lines_a = lines_a.len(),
        lines_b = lines_b.len(),
        "Text stage produced line sequences"
    );

    Ok(Some(Resolution {
        a: ComparableLines::plain(lines_a),
        b: ComparableLines::plain(lines_b),
        strategy: Strategy::Text,
    }))
}

/// Splits a text block into physical lines.
fn text_lines(text: &str) -> Vec<String> {
    text.lines().map(ToString::to_string).collect()
}

/// Reads a file and splits it into physical lines, replacing invalid
/// UTF-8 rather than failing.
fn file_lines(path: &Path) -> Result<Vec<String>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(text_lines(&String::from_utf8_lossy(&bytes)))
}
