//! XML markup comparison stage.
//!
//! Both inputs are parsed and normalized to one structural line per node so
//! that formatting differences disappear and structural differences line up
//! for the downstream edit script. Side A is always converted first: under
//! the strict `xml` mode a parse failure is fatal and names the failing
//! side, while under `auto` the failure silently disqualifies the stage and
//! side B is never parsed.

use super::errors::FormatError;
use super::{ComparableLines, CompareMode, CompareView, InputPair, Resolution, Side, Strategy};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{Level, debug, span};

/// Attempts the markup stage.
///
/// # Errors
///
/// Returns a [`FormatError`] when `mode == Xml` and an input is not
/// well-formed; I/O errors reading file pairs propagate in every mode.
pub(crate) fn attempt(pair: &InputPair, view: &CompareView) -> Result<Option<Resolution>> {
    let participate = matches!(view.mode, CompareMode::Xml | CompareMode::Auto);
    if !participate {
        return Ok(None);
    }

    let strict = view.mode == CompareMode::Xml;
    let span = span!(Level::DEBUG, "markup_stage", strict);
    let _guard = span.enter();

    let text_a = side_text(pair, Side::A)?;
    let lines_a = match structural_lines(&text_a, view.ignore_xml_whitespace) {
        Ok(lines) => lines,
        Err(detail) => {
            if strict {
                return Err(FormatError::new(Side::A, detail).into());
            }
            // A failed to parse: no reason to try B.
            debug!("Side A is not well-formed markup, stage declined");
            return Ok(None);
        }
    };

    let text_b = side_text(pair, Side::B)?;
    let lines_b = match structural_lines(&text_b, view.ignore_xml_whitespace) {
        Ok(lines) => lines,
        Err(detail) => {
            if strict {
                return Err(FormatError::new(Side::B, detail).into());
            }
            debug!("Side B is not well-formed markup, stage declined");
            return Ok(None);
        }
    };

    debug!(
        lines_a = lines_a.len(),
        lines_b = lines_b.len(),
        "Markup stage produced line sequences"
    );

    Ok(Some(Resolution {
        a: ComparableLines::plain(lines_a),
        b: ComparableLines::plain(lines_b),
        strategy: Strategy::Xml,
    }))
}

/// Materializes one side's text, reading the file for file pairs.
fn side_text(pair: &InputPair, side: Side) -> Result<String> {
    match (pair, side) {
        (InputPair::Files { a, .. }, Side::A) => read_lossy(a),
        (InputPair::Files { b, .. }, Side::B) => read_lossy(b),
        (InputPair::Texts { a, .. }, Side::A) => Ok(a.clone()),
        (InputPair::Texts { b, .. }, Side::B) => Ok(b.clone()),
    }
}

/// Reads a file as text, replacing invalid UTF-8 rather than failing.
fn read_lossy(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parses `text` and renders one normalized line per structural node.
///
/// Whitespace-only text nodes are always dropped (they are formatting
/// artifacts); `ignore_whitespace` additionally collapses internal
/// whitespace runs inside text content. The parser diagnostic is returned
/// verbatim on failure.
fn structural_lines(text: &str, ignore_whitespace: bool) -> Result<Vec<String>, String> {
    let document = roxmltree::Document::parse(text).map_err(|e| e.to_string())?;

    let mut lines = Vec::new();
    for child in document.root().children() {
        write_node(&child, 0, ignore_whitespace, &mut lines);
    }
    Ok(lines)
}

/// Appends the normalized lines for one node and its descendants.
fn write_node(node: &roxmltree::Node, depth: usize, ignore_whitespace: bool, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);

    match node.node_type() {
        roxmltree::NodeType::Element => {
            let name = node.tag_name().name();
            let mut open = format!("{indent}<{name}");
            for attribute in node.attributes() {
                open.push_str(&format!(" {}=\"{}\"", attribute.name(), attribute.value()));
            }

            if node.children().next().is_none() {
                open.push_str("/>");
                lines.push(open);
            } else {
                open.push('>');
                lines.push(open);
                for child in node.children() {
                    write_node(&child, depth + 1, ignore_whitespace, lines);
                }
                lines.push(format!("{indent}</{name}>"));
            }
        }
        roxmltree::NodeType::Text => {
            let text = node.text().unwrap_or_default();
            if text.trim().is_empty() {
                return;
            }
            if ignore_whitespace {
                let collapsed: Vec<&str> = text.split_whitespace().collect();
                lines.push(format!("{indent}{}", collapsed.join(" ")));
            } else {
                for line in text.trim_matches('\n').lines() {
                    lines.push(format!("{indent}{line}"));
                }
            }
        }
        roxmltree::NodeType::Comment => {
            let text = node.text().unwrap_or_default();
            lines.push(format!("{indent}<!--{text}-->"));
        }
        // Declarations and processing instructions carry no comparable
        // structure.
        roxmltree::NodeType::Root | roxmltree::NodeType::PI => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_lines_normalize_formatting() {
        let compact = structural_lines("<a><b x=\"1\"/></a>", false).unwrap();
        let spread = structural_lines("<a>\n    <b   x=\"1\" />\n</a>", false).unwrap();
        assert_eq!(compact, spread);
        assert_eq!(compact, vec!["<a>", "  <b x=\"1\"/>", "</a>"]);
    }

    #[test]
    fn test_text_content_preserved() {
        let lines = structural_lines("<a>hello world</a>", false).unwrap();
        assert_eq!(lines, vec!["<a>", "  hello world", "</a>"]);
    }

    #[test]
    fn test_ignore_whitespace_collapses_runs() {
        let kept = structural_lines("<a>hello   world</a>", false).unwrap();
        let collapsed = structural_lines("<a>hello   world</a>", true).unwrap();
        assert_eq!(kept[1], "  hello   world");
        assert_eq!(collapsed[1], "  hello world");
    }

    #[test]
    fn test_comments_survive() {
        let lines = structural_lines("<a><!-- note --></a>", false).unwrap();
        assert!(lines.iter().any(|line| line.contains("<!-- note -->")));
    }

    #[test]
    fn test_malformed_input_reports_parser_detail() {
        let error = structural_lines("<a><unclosed></a>", false).unwrap_err();
        assert!(!error.is_empty());
    }

    #[test]
    fn test_auto_mode_declines_on_malformed_a() {
        let pair = InputPair::texts("not xml at all <<", "<ok/>");
        let view = CompareView {
            mode: CompareMode::Auto,
            ignore_xml_whitespace: false,
            footprint_length: 8,
        };
        let outcome = attempt(&pair, &view).unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_strict_mode_fails_on_malformed_a() {
        let pair = InputPair::texts("not xml at all <<", "<ok/>");
        let view = CompareView {
            mode: CompareMode::Xml,
            ignore_xml_whitespace: false,
            footprint_length: 8,
        };
        let error = attempt(&pair, &view).unwrap_err();
        let format_error = error.downcast_ref::<FormatError>().unwrap();
        assert_eq!(format_error.side, Side::A);
    }
}
