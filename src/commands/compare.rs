//! Compare command: resolve a pair, compute the edit script, print it.

use crate::AppContext;
use crate::compare::{
    ComparableLines, CompareView, InputPair, Resolution, Strategy, config_to_algorithm, resolve,
};
use crate::options::{CompareMode, Options};
use anyhow::Result;
use colored::Colorize;
use similar::{DiffOp, capture_diff_slices};
use tracing::debug;

/// Compares two files.
///
/// Resolves the pair through the strategy cascade, prints the edit script,
/// then records the compared paths as the most recent pair inside one
/// update span and persists the options.
///
/// # Errors
///
/// Returns an error on I/O failure, on a strict-mode format error, or if
/// the options cannot be saved.
pub fn execute_files(
    ctx: &mut AppContext,
    a: &str,
    b: &str,
    mode: Option<CompareMode>,
) -> Result<()> {
    let pair = InputPair::files(a, b);
    let view = effective_view(&ctx.options, mode);

    let resolution = resolve(&pair, &view)?;
    print_report(&ctx.options, &resolution, a, b);

    ctx.options.update(|options| {
        options.set_last_file_a(a);
        options.set_last_file_b(b);
    });
    ctx.save_options()?;

    Ok(())
}

/// Compares two literal text blocks.
///
/// # Errors
///
/// Returns an error on a strict-mode format error.
pub fn execute_text(ctx: &AppContext, a: &str, b: &str, mode: Option<CompareMode>) -> Result<()> {
    let pair = InputPair::texts(a, b);
    let view = effective_view(&ctx.options, mode);

    let resolution = resolve(&pair, &view)?;
    print_report(&ctx.options, &resolution, "left text", "right text");

    Ok(())
}

/// Snapshots option values, applying a per-run mode override.
fn effective_view(options: &Options, mode: Option<CompareMode>) -> CompareView {
    let view = CompareView::from_options(options);
    match mode {
        Some(mode) => view.with_mode(mode),
        None => view,
    }
}

/// Computes and prints the edit script for a resolution.
fn print_report(options: &Options, resolution: &Resolution, label_a: &str, label_b: &str) {
    // Case and whitespace flags only apply to the text strategy; the
    // binary prefix already carries no comparable meaning and markup
    // whitespace was handled during normalization.
    let is_text = resolution.strategy == Strategy::Text;
    let ignore_case = is_text && options.ignore_case();
    let ignore_whitespace = is_text && options.ignore_text_whitespace();

    let keys_a = comparison_keys(&resolution.a, ignore_case, ignore_whitespace);
    let keys_b = comparison_keys(&resolution.b, ignore_case, ignore_whitespace);

    let algorithm = config_to_algorithm(options.diff_algorithm());
    let ops = capture_diff_slices(algorithm, &keys_a, &keys_b);

    debug!(
        strategy = ?resolution.strategy,
        ops = ops.len(),
        ignore_case,
        ignore_whitespace,
        "Edit script computed"
    );

    println!("{}", format!("--- {label_a}").red());
    println!("{}", format!("+++ {label_b}").green());
    if resolution.is_binary() {
        println!("{}", "(binary comparison)".dimmed());
    }

    let show_whitespace = options.show_whitespace();
    let as_delete_insert = options.show_change_as_delete_insert();
    let mut added = 0usize;
    let mut deleted = 0usize;
    let mut changed = 0usize;

    for op in &ops {
        match *op {
            DiffOp::Equal { old_index, len, .. } => {
                for i in 0..len {
                    let text = display_line(resolution.a.comparable(old_index + i), show_whitespace);
                    println!("  {}", text.dimmed());
                }
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                deleted += old_len;
                for i in 0..old_len {
                    let text = display_line(resolution.a.comparable(old_index + i), show_whitespace);
                    println!("{}", format!("- {text}").red());
                }
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                added += new_len;
                for i in 0..new_len {
                    let text = display_line(resolution.b.comparable(new_index + i), show_whitespace);
                    println!("{}", format!("+ {text}").green());
                }
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                if as_delete_insert {
                    deleted += old_len;
                    added += new_len;
                    for i in 0..old_len {
                        let text =
                            display_line(resolution.a.comparable(old_index + i), show_whitespace);
                        println!("{}", format!("- {text}").red());
                    }
                    for i in 0..new_len {
                        let text =
                            display_line(resolution.b.comparable(new_index + i), show_whitespace);
                        println!("{}", format!("+ {text}").green());
                    }
                } else {
                    changed += old_len.max(new_len);
                    for i in 0..old_len {
                        let text =
                            display_line(resolution.a.comparable(old_index + i), show_whitespace);
                        println!("{}", format!("! {text}").yellow());
                    }
                    for i in 0..new_len {
                        let text =
                            display_line(resolution.b.comparable(new_index + i), show_whitespace);
                        println!("{}", format!("! {text}").yellow());
                    }
                }
            }
        }
    }

    let summary = format!(
        "{:?} comparison: {added} added, {deleted} deleted, {changed} changed",
        resolution.strategy
    );
    crate::output::info(&summary);
}

/// Builds the comparison keys one side feeds to the edit script, applying
/// the strategy-gated flags.
fn comparison_keys(lines: &ComparableLines, ignore_case: bool, ignore_whitespace: bool) -> Vec<String> {
    (0..lines.lines.len())
        .map(|index| {
            let mut key = lines.comparable(index).to_string();
            if ignore_whitespace {
                let words: Vec<&str> = key.split_whitespace().collect();
                key = words.join(" ");
            }
            if ignore_case {
                key = key.to_lowercase();
            }
            key
        })
        .collect()
}

/// Renders whitespace visibly when the option is on.
fn display_line(text: &str, show_whitespace: bool) -> String {
    if show_whitespace {
        text.replace(' ', "\u{b7}").replace('\t', "\u{2192}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Strategy;

    #[test]
    fn test_comparison_keys_gate_flags() {
        let lines = ComparableLines::plain(vec!["Hello   World".to_string()]);

        let raw = comparison_keys(&lines, false, false);
        assert_eq!(raw[0], "Hello   World");

        let folded = comparison_keys(&lines, true, true);
        assert_eq!(folded[0], "hello world");
    }

    #[test]
    fn test_comparison_keys_strip_binary_prefix() {
        let lines = ComparableLines::with_prefix(
            vec![
                "00000000: copy aa".to_string(),
                "00000008: copy aa".to_string(),
            ],
            10,
        );
        let keys = comparison_keys(&lines, false, false);
        assert_eq!(keys[0], keys[1], "offset prefix must not affect equality");
    }

    #[test]
    fn test_display_line_whitespace_markers() {
        assert_eq!(display_line("a b", false), "a b");
        assert_eq!(display_line("a b", true), "a\u{b7}b");
        assert_eq!(display_line("a\tb", true), "a\u{2192}b");
    }

    #[test]
    fn test_effective_view_override() {
        let options = Options::default();
        assert_eq!(effective_view(&options, None).mode, CompareMode::Auto);
        assert_eq!(
            effective_view(&options, Some(CompareMode::Xml)).mode,
            CompareMode::Xml
        );
    }

    #[test]
    fn test_text_resolution_reports_text_strategy() {
        let pair = InputPair::texts("a\nb", "a\nc");
        let view = CompareView {
            mode: CompareMode::Text,
            ignore_xml_whitespace: false,
            footprint_length: 8,
        };
        let resolution = resolve(&pair, &view).unwrap();
        assert_eq!(resolution.strategy, Strategy::Text);
    }
}
