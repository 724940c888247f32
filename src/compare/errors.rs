//! Typed errors surfaced by the strategy resolver.

use super::Side;
use std::fmt;

/// A strict-mode markup parse failure.
///
/// Carries the failing side and the parser's diagnostic verbatim so the
/// caller can present it unchanged. Never produced under automatic mode,
/// where a stage declining is not an error.
#[derive(Debug)]
pub struct FormatError {
    /// Which input failed to parse.
    pub side: Side,
    /// The underlying parser diagnostic.
    pub detail: String,
}

impl FormatError {
    /// Creates a format error for the given side.
    #[must_use]
    pub fn new(side: Side, detail: impl Into<String>) -> Self {
        Self {
            side,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "An XML comparison was attempted, but the {} input failed to parse: {}",
            self.side, self.detail
        )
    }
}

impl std::error::Error for FormatError {}
