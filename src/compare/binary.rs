//! Binary comparison stage.
//!
//! File pairs that are (or are forced to be) binary are chunked at the
//! configured footprint length; each chunk gets an xxHash3 footprint, and a
//! chunk-level diff over the footprint sequences segments both sides into
//! copy and add/data runs. Copy runs render as footprints, everything else
//! as literal byte runs, so the downstream line comparison sees matching
//! content for matching chunks regardless of position.

use super::{ComparableLines, CompareMode, CompareView, InputPair, Resolution, Strategy};
use anyhow::{Context, Result};
use content_inspector::{ContentType, inspect};
use similar::{Algorithm, DiffOp, capture_diff_slices};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{Level, debug, span};
use xxhash_rust::xxh3::xxh3_64;

/// Characters of positional metadata at the start of every emitted line.
///
/// The `{offset:08x}: ` prefix locates a chunk within its own file and must
/// be excluded from equality comparisons and display.
pub const PREFIX_LENGTH: usize = 10;

/// Check if a file is binary by inspecting its content.
///
/// Reads the first 8KB of the file and uses content inspection to decide
/// between binary and text. An empty file counts as text.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn is_binary_file(path: &Path) -> Result<bool> {
    let span = span!(Level::DEBUG, "binary_sniff", path = %path.display());
    let _guard = span.enter();

    let mut file = File::open(path)
        .with_context(|| format!("Failed to open file for binary check: {}", path.display()))?;

    let mut buffer = [0u8; 8192];
    let n = file
        .read(&mut buffer)
        .with_context(|| format!("Failed to read file for binary check: {}", path.display()))?;

    if n == 0 {
        debug!("File is empty, treating as text");
        return Ok(false);
    }

    let is_binary = matches!(inspect(&buffer[..n]), ContentType::BINARY);

    debug!(is_binary, bytes_checked = n, "Binary detection complete");

    Ok(is_binary)
}

/// Attempts the binary stage.
///
/// Participates only for file pairs, when the mode forces binary or the
/// automatic mode sniffs binary content on either side. When selected this
/// stage is authoritative; no later stage runs.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub(crate) fn attempt(pair: &InputPair, view: &CompareView) -> Result<Option<Resolution>> {
    let InputPair::Files { a, b } = pair else {
        // Text pairs skip the binary stage entirely.
        return Ok(None);
    };

    let participate = match view.mode {
        CompareMode::Binary => true,
        CompareMode::Auto => is_binary_file(a)? || is_binary_file(b)?,
        CompareMode::Xml | CompareMode::Text => false,
    };
    if !participate {
        return Ok(None);
    }

    let bytes_a =
        std::fs::read(a).with_context(|| format!("Failed to read file: {}", a.display()))?;
    let bytes_b =
        std::fs::read(b).with_context(|| format!("Failed to read file: {}", b.display()))?;

    let (lines_a, lines_b) = footprint_lines(&bytes_a, &bytes_b, view.footprint_length);

    debug!(
        lines_a = lines_a.len(),
        lines_b = lines_b.len(),
        footprint_length = view.footprint_length,
        "Binary stage produced line sequences"
    );

    Ok(Some(Resolution {
        a: ComparableLines::with_prefix(lines_a, PREFIX_LENGTH),
        b: ComparableLines::with_prefix(lines_b, PREFIX_LENGTH),
        strategy: Strategy::Binary,
    }))
}

/// Builds the footprint/data line sequences for both sides.
fn footprint_lines(bytes_a: &[u8], bytes_b: &[u8], footprint_length: usize) -> (Vec<String>, Vec<String>) {
    let length = footprint_length.max(1);

    let chunks_a: Vec<&[u8]> = bytes_a.chunks(length).collect();
    let chunks_b: Vec<&[u8]> = bytes_b.chunks(length).collect();
    let footprints_a: Vec<u64> = chunks_a.iter().map(|chunk| xxh3_64(chunk)).collect();
    let footprints_b: Vec<u64> = chunks_b.iter().map(|chunk| xxh3_64(chunk)).collect();

    let ops = capture_diff_slices(Algorithm::Myers, &footprints_a, &footprints_b);

    let mut lines_a = Vec::with_capacity(chunks_a.len());
    let mut lines_b = Vec::with_capacity(chunks_b.len());

    for op in ops {
        match op {
            DiffOp::Equal {
                old_index,
                new_index,
                len,
            } => {
                for i in 0..len {
                    let footprint = footprints_a[old_index + i];
                    lines_a.push(copy_line((old_index + i) * length, footprint));
                    lines_b.push(copy_line((new_index + i) * length, footprint));
                }
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                for i in 0..old_len {
                    lines_a.push(data_line((old_index + i) * length, chunks_a[old_index + i]));
                }
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                for i in 0..new_len {
                    lines_b.push(data_line((new_index + i) * length, chunks_b[new_index + i]));
                }
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                for i in 0..old_len {
                    lines_a.push(data_line((old_index + i) * length, chunks_a[old_index + i]));
                }
                for i in 0..new_len {
                    lines_b.push(data_line((new_index + i) * length, chunks_b[new_index + i]));
                }
            }
        }
    }

    (lines_a, lines_b)
}

/// Renders a copied chunk as its footprint.
fn copy_line(offset: usize, footprint: u64) -> String {
    format!("{offset:08x}: copy {footprint:016x}")
}

/// Renders an added/removed chunk as a literal byte run.
fn data_line(offset: usize, chunk: &[u8]) -> String {
    let hex: Vec<String> = chunk.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("{offset:08x}: data {}", hex.join(" "))
}
