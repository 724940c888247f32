#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Simple counters and offsets cannot overflow
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # Twindiff - Strategy-Resolving Comparison Tool
//!
//! Twindiff compares two files or two text blocks by first deciding *how*
//! they should be compared: as raw binary data, as structured XML markup,
//! or as plain line-oriented text. The automatic mode tries the stricter
//! strategies first and falls back without ever surfacing a format error.
//!
//! ## Features
//!
//! - **Strategy resolution**: Binary → XML → Text cascade with per-mode
//!   participation rules and short-circuit on first success
//! - **Binary footprints**: xxHash3 chunk footprints drive copy/add
//!   segmentation for binary pairs
//! - **Batched option updates**: any number of setting mutations inside one
//!   update span coalesce into a single change notification
//! - **MRU filter history**: bounded, case-insensitively deduplicated
//! - **TOML persistence**: settings survive restarts, missing keys fall
//!   back to defaults
//!
//! ## Architecture
//!
//! The codebase is organized into several key modules:
//!
//! - [`compare`]: Strategy resolver and the three comparison stages
//! - [`options`]: Options store, update scoping, history, font resolution
//! - [`commands`]: CLI command implementations (files, text, config, filter)
//! - [`output`]: Output formatting and styling
//!
//! ## Example Usage
//!
//! ```no_run
//! use twindiff::AppContext;
//! use twindiff::compare::{CompareView, InputPair, resolve};
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = AppContext::new()?;
//! let pair = InputPair::texts("<a/>", "<a><b/></a>");
//! let view = CompareView::from_options(&ctx.options);
//! let resolution = resolve(&pair, &view)?;
//! println!("compared as {:?}", resolution.strategy);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Commands module containing all CLI command implementations.
pub mod commands;

/// Strategy resolution and the binary/markup/text comparison stages.
pub mod compare;

/// Options store with batched change notification and persistence.
pub mod options;

/// Output formatting and styling.
pub mod output;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Current version of the twindiff binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file path relative to the home directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/twindiff/config";

/// Central context for all twindiff operations.
///
/// Holds the options store and the path it was loaded from. Constructed
/// once per process; commands read option values through it and mutate
/// them inside update spans.
#[derive(Debug)]
pub struct AppContext {
    /// Path to the configuration file.
    pub config_path: PathBuf,

    /// Loaded options store.
    pub options: options::Options,
}

impl AppContext {
    /// Creates a new `AppContext` by loading options from the default path.
    ///
    /// The `TWINDIFF_CONFIG_PATH` environment variable overrides the
    /// default location under the home directory.
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined or if
    /// the configuration file cannot be read or created.
    pub fn new() -> Result<Self> {
        let config_path = if let Ok(path) = std::env::var("TWINDIFF_CONFIG_PATH") {
            PathBuf::from(path)
        } else {
            let home = dirs::home_dir().context("Could not find home directory")?;
            home.join(DEFAULT_CONFIG_PATH)
        };

        let options = options::Options::load(&config_path)?;

        Ok(Self {
            config_path,
            options,
        })
    }

    /// Creates a new `AppContext` with an explicit config path.
    /// This avoids environment variable manipulation in tests.
    ///
    /// # Errors
    /// Returns an error if the options cannot be loaded or created.
    pub fn new_explicit(config_path: PathBuf) -> Result<Self> {
        let options = options::Options::load(&config_path)?;
        Ok(Self {
            config_path,
            options,
        })
    }

    /// Persists the current option values back to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the file or its parent directories cannot be
    /// written.
    pub fn save_options(&self) -> Result<()> {
        self.options.save(&self.config_path)
    }
}
