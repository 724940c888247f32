//! Config command: get, set, list, and reset options by key.

use crate::AppContext;
use crate::options::Options;
use anyhow::Result;
use colored::Colorize;

/// Executes the config command.
///
/// With no key, requires `--list`. With a key alone, prints the value.
/// With a key and value, sets and persists it. `--unset` resets a key to
/// its built-in default.
///
/// # Errors
///
/// Returns an error for unknown keys, unparseable values, or when the
/// options cannot be saved.
pub fn execute(
    ctx: &mut AppContext,
    key: Option<&str>,
    value: Option<String>,
    unset: bool,
    list: bool,
) -> Result<()> {
    if list {
        for (key, value) in ctx.options.list() {
            println!("{} = {}", key.cyan(), value);
        }
        return Ok(());
    }

    let Some(key) = key else {
        return Err(anyhow::anyhow!(
            "No option key given (use --list to show all options)"
        ));
    };

    if unset {
        let defaults = Options::default();
        let default_value = defaults
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("Unknown option key: {key}"))?;
        ctx.options.set(key, &default_value)?;
        ctx.save_options()?;
        crate::output::success(&format!("Reset {key} to {default_value}"));
        return Ok(());
    }

    match value {
        Some(value) => {
            ctx.options.set(key, &value)?;
            ctx.save_options()?;
            crate::output::success(&format!("Set {key} = {value}"));
        }
        None => {
            let value = ctx
                .options
                .get(key)
                .ok_or_else(|| anyhow::anyhow!("Unknown option key: {key}"))?;
            println!("{value}");
        }
    }

    Ok(())
}
