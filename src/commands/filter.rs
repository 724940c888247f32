//! Filter command: manage the MRU file-filter history.

use crate::AppContext;
use anyhow::Result;
use colored::Colorize;

/// Pushes a filter onto the history and persists the options.
///
/// # Errors
///
/// Returns an error if the options cannot be saved.
pub fn add(ctx: &mut AppContext, filter: &str) -> Result<()> {
    ctx.options.add_custom_filter(filter);
    ctx.save_options()?;
    crate::output::success(&format!("Added filter: {filter}"));
    Ok(())
}

/// Lists the filter history, newest first.
///
/// # Errors
///
/// Infallible today; kept fallible for command-dispatch uniformity.
pub fn list(ctx: &AppContext) -> Result<()> {
    let entries = ctx.options.custom_filters().entries();
    if entries.is_empty() {
        crate::output::info("No filters in history");
        return Ok(());
    }

    for (index, filter) in entries.iter().enumerate() {
        println!("{:>3}  {}", format!("{index}").dimmed(), filter);
    }
    Ok(())
}
