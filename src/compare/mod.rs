//! Strategy resolution for comparison inputs.
//!
//! Given a pair of inputs and a requested compare mode, the resolver
//! decides whether the pair is compared as binary data, as XML markup, or
//! as plain line-oriented text. The cascade is an explicit ordered stage
//! list (binary, then markup, then text); each stage either declines or
//! produces comparable line sequences for *both* sides, and the first
//! success wins. A pair is never split across strategies.

/// Binary sniffing and footprint line production.
pub mod binary;
/// Typed resolver errors.
pub mod errors;
/// XML normalization stage.
pub mod markup;
/// Plain text fallback stage.
pub mod text;

pub use binary::{PREFIX_LENGTH, is_binary_file};
pub use errors::FormatError;

use crate::options::{CompareMode, DiffAlgorithm, Options};
use anyhow::Result;
use similar::Algorithm;
use std::path::PathBuf;
use tracing::{Level, debug, span};

/// Convert the `DiffAlgorithm` option to `similar::Algorithm`
#[must_use]
pub const fn config_to_algorithm(algo: DiffAlgorithm) -> Algorithm {
    match algo {
        DiffAlgorithm::Myers => Algorithm::Myers,
        DiffAlgorithm::Patience => Algorithm::Patience,
    }
}

/// Which input of the pair, by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The left/first input.
    A,
    /// The right/second input.
    B,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::A => "left",
            Self::B => "right",
        };
        write!(f, "{name}")
    }
}

/// A pair of inputs to compare. Identity is positional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPair {
    /// Two files on disk.
    Files {
        /// Left-side path.
        a: PathBuf,
        /// Right-side path.
        b: PathBuf,
    },
    /// Two in-memory text blocks.
    Texts {
        /// Left-side text.
        a: String,
        /// Right-side text.
        b: String,
    },
}

impl InputPair {
    /// Builds a file pair.
    pub fn files(a: impl Into<PathBuf>, b: impl Into<PathBuf>) -> Self {
        Self::Files {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Builds a text pair.
    pub fn texts(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::Texts {
            a: a.into(),
            b: b.into(),
        }
    }
}

/// The strategy a pair was resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Footprint/data lines from the binary stage.
    Binary,
    /// Normalized structural lines from the markup stage.
    Xml,
    /// Physical lines from the text stage.
    Text,
}

/// An ordered sequence of comparable lines for one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparableLines {
    /// The lines, in input order.
    pub lines: Vec<String>,
    /// Leading characters on every line that must be excluded from
    /// equality comparisons and display. Non-zero only for the binary
    /// strategy.
    pub ignored_prefix_len: usize,
}

impl ComparableLines {
    /// Lines with no ignored prefix (text and markup strategies).
    #[must_use]
    pub const fn plain(lines: Vec<String>) -> Self {
        Self {
            lines,
            ignored_prefix_len: 0,
        }
    }

    /// Lines whose first `prefix_len` characters are positional metadata.
    #[must_use]
    pub const fn with_prefix(lines: Vec<String>, prefix_len: usize) -> Self {
        Self {
            lines,
            ignored_prefix_len: prefix_len,
        }
    }

    /// The comparable portion of one line, with the ignored prefix
    /// stripped.
    #[must_use]
    pub fn comparable(&self, index: usize) -> &str {
        self.lines[index]
            .get(self.ignored_prefix_len..)
            .unwrap_or("")
    }
}

/// The outcome of strategy resolution: both sides' comparable lines plus
/// the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Left-side lines.
    pub a: ComparableLines,
    /// Right-side lines.
    pub b: ComparableLines,
    /// The strategy both sides resolved through.
    pub strategy: Strategy,
}

impl Resolution {
    /// Whether the pair resolved through the binary strategy.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.strategy == Strategy::Binary
    }
}

/// Read-only snapshot of the option values the resolver consumes, taken
/// at the start of each resolution. The resolver never mutates options.
#[derive(Debug, Clone, Copy)]
pub struct CompareView {
    /// Requested comparison mode.
    pub mode: CompareMode,
    /// Whether XML normalization drops insignificant whitespace.
    pub ignore_xml_whitespace: bool,
    /// Binary footprint chunk length in bytes.
    pub footprint_length: usize,
}

impl CompareView {
    /// Snapshots the relevant option values.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            mode: options.compare_mode(),
            ignore_xml_whitespace: options.ignore_xml_whitespace(),
            footprint_length: options.binary_footprint_length(),
        }
    }

    /// Overrides the mode, keeping the other values.
    #[must_use]
    pub const fn with_mode(mut self, mode: CompareMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A resolution stage: declines with `None` or produces a full result.
type StageFn = fn(&InputPair, &CompareView) -> Result<Option<Resolution>>;

/// The fixed stage order. Configuration controls *participation* of a
/// stage, never the order.
const STAGES: &[(&str, StageFn)] = &[
    ("binary", binary::attempt),
    ("markup", markup::attempt),
    ("text", text::attempt),
];

/// Resolves a pair of inputs to comparable line sequences.
///
/// Under `Auto` mode this never fails for format reasons: a stage that
/// cannot handle the input silently declines and the next stage runs. The
/// text stage is a total fallback.
///
/// # Errors
///
/// Returns a [`FormatError`] when a non-auto mode forces a stricter
/// strategy than the input supports, and I/O errors from reading file
/// pairs in any mode.
pub fn resolve(pair: &InputPair, view: &CompareView) -> Result<Resolution> {
    let span = span!(Level::DEBUG, "resolve", mode = %view.mode);
    let _guard = span.enter();

    for (name, stage) in STAGES {
        if let Some(resolution) = stage(pair, view)? {
            debug!(stage = name, "Resolution complete");
            return Ok(resolution);
        }
    }

    unreachable!("the text stage always produces a result")
}
