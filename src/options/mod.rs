//! Options store with batched change notification.
//!
//! All long-lived user configuration lives here: compare mode, comparison
//! flags, the view font, and the MRU filter history. Mutations are tracked
//! by an update scope so that any number of setting changes inside one
//! logical operation coalesce into a single change notification.

/// View-font descriptor and host font probing.
pub mod fonts;
/// Bounded MRU filter history.
pub mod history;

pub use fonts::{FontDescriptor, FontProbe, FontStyle, SystemFonts};
pub use history::{FilterHistory, MAX_FILTERS};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// How a pair of inputs should be compared.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Try binary, then XML, then fall back to plain text.
    #[default]
    Auto,
    /// Force a binary comparison.
    Binary,
    /// Force an XML comparison; malformed input is an error.
    Xml,
    /// Force a plain line-oriented text comparison.
    Text,
}

impl std::fmt::Display for CompareMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Binary => "binary",
            Self::Xml => "xml",
            Self::Text => "text",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for CompareMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "binary" => Ok(Self::Binary),
            "xml" => Ok(Self::Xml),
            "text" => Ok(Self::Text),
            other => Err(anyhow::anyhow!("Unknown compare mode: {other}")),
        }
    }
}

/// Edit-script algorithm forwarded to the downstream computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    /// Classic Myers edit-distance.
    #[default]
    Myers,
    /// Patience diff, better for reordered blocks.
    Patience,
}

impl std::fmt::Display for DiffAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Myers => "myers",
            Self::Patience => "patience",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for DiffAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "myers" => Ok(Self::Myers),
            "patience" => Ok(Self::Patience),
            other => Err(anyhow::anyhow!("Unknown diff algorithm: {other}")),
        }
    }
}

/// `end_update` was called without a matching `begin_update`.
///
/// This is a programming error in the caller, not a user-facing condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbalancedScopeError;

impl std::fmt::Display for UnbalancedScopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "end_update called without a matching begin_update")
    }
}

impl std::error::Error for UnbalancedScopeError {}

/// Default binary footprint length in bytes.
const DEFAULT_FOOTPRINT_LENGTH: usize = 8;

/// Built-in filters seeded on first run, grouped by language/category.
pub const DEFAULT_FILTERS: &[&str] = &[
    "*.rs",
    "*.c;*.cpp;*.h;*.hpp;*.inl",
    "*.cs",
    "*.py",
    "*.xml",
    "*.htm;*.html",
    "*.txt",
    "*.sql",
    "*.toml;*.json;*.yaml;*.yml",
    "*.o;*.obj;*.so;*.dll;*.exe;*.bin",
];

/// Nesting state for batched notification.
#[derive(Debug, Default)]
struct UpdateScope {
    /// Current nesting depth; notifications fire only at depth zero.
    depth: u32,
    /// Whether any setting changed inside the current span.
    dirty: bool,
}

/// Listener invoked when a batch of option changes completes.
type ChangeListener = Box<dyn Fn()>;

/// The options store.
///
/// Constructed once per process with hard-coded defaults, optionally
/// overwritten by [`Options::load`], mutated by user commands, and flushed
/// with [`Options::save`]. Setters compare against the current value first;
/// a call that does not change anything never dirties the store and never
/// fires the change notification.
pub struct Options {
    /// Requested comparison mode.
    compare_mode: CompareMode,
    /// Edit-script algorithm.
    diff_algorithm: DiffAlgorithm,
    /// Case-insensitive line comparison (text strategy only).
    ignore_case: bool,
    /// Whitespace-insensitive line comparison (text strategy only).
    ignore_text_whitespace: bool,
    /// Drop insignificant whitespace when normalizing XML.
    ignore_xml_whitespace: bool,
    /// Render whitespace visibly in comparison views.
    show_whitespace: bool,
    /// Render changed lines as delete+insert instead of paired changes.
    show_change_as_delete_insert: bool,
    /// Chunk size for binary footprints, in bytes.
    binary_footprint_length: usize,
    /// Most recently compared left-side file.
    last_file_a: String,
    /// Most recently compared right-side file.
    last_file_b: String,
    /// Font used for comparison views.
    view_font: FontDescriptor,
    /// MRU file-filter history.
    custom_filters: FilterHistory,
    /// Batching state.
    scope: UpdateScope,
    /// Registered change listeners.
    listeners: Vec<ChangeListener>,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("compare_mode", &self.compare_mode)
            .field("diff_algorithm", &self.diff_algorithm)
            .field("ignore_case", &self.ignore_case)
            .field("ignore_text_whitespace", &self.ignore_text_whitespace)
            .field("ignore_xml_whitespace", &self.ignore_xml_whitespace)
            .field("show_whitespace", &self.show_whitespace)
            .field(
                "show_change_as_delete_insert",
                &self.show_change_as_delete_insert,
            )
            .field("binary_footprint_length", &self.binary_footprint_length)
            .field("last_file_a", &self.last_file_a)
            .field("last_file_b", &self.last_file_b)
            .field("view_font", &self.view_font)
            .field("custom_filters", &self.custom_filters)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            compare_mode: CompareMode::Auto,
            diff_algorithm: DiffAlgorithm::Myers,
            ignore_case: false,
            ignore_text_whitespace: false,
            ignore_xml_whitespace: false,
            show_whitespace: false,
            show_change_as_delete_insert: false,
            binary_footprint_length: DEFAULT_FOOTPRINT_LENGTH,
            last_file_a: String::new(),
            last_file_b: String::new(),
            view_font: FontDescriptor::default(),
            custom_filters: builtin_filters(),
            scope: UpdateScope::default(),
            listeners: Vec::new(),
        }
    }
}

/// On-disk shape of the options file. Missing keys fall back to the
/// in-memory defaults; a missing `custom_filters` key (as opposed to an
/// empty list) marks a first run.
#[derive(Debug, Serialize, Deserialize)]
struct OptionsFile {
    /// See [`Options::compare_mode`].
    #[serde(default)]
    compare_mode: CompareMode,
    /// See [`Options::diff_algorithm`].
    #[serde(default)]
    diff_algorithm: DiffAlgorithm,
    /// See [`Options::ignore_case`].
    #[serde(default)]
    ignore_case: bool,
    /// See [`Options::ignore_text_whitespace`].
    #[serde(default)]
    ignore_text_whitespace: bool,
    /// See [`Options::ignore_xml_whitespace`].
    #[serde(default)]
    ignore_xml_whitespace: bool,
    /// See [`Options::show_whitespace`].
    #[serde(default)]
    show_whitespace: bool,
    /// See [`Options::show_change_as_delete_insert`].
    #[serde(default)]
    show_change_as_delete_insert: bool,
    /// See [`Options::binary_footprint_length`].
    #[serde(default = "default_footprint_length")]
    binary_footprint_length: usize,
    /// See [`Options::last_file_a`].
    #[serde(default)]
    last_file_a: String,
    /// See [`Options::last_file_b`].
    #[serde(default)]
    last_file_b: String,
    /// Ordered filter history, newest first. Must stay before the font
    /// table so the TOML serializer emits values before tables.
    #[serde(default)]
    custom_filters: Option<Vec<String>>,
    /// See [`Options::view_font`].
    #[serde(default)]
    view_font: FontDescriptor,
}

/// Serde default for the footprint length.
const fn default_footprint_length() -> usize {
    DEFAULT_FOOTPRINT_LENGTH
}

/// Seeds the built-in filter set, preserving the declared order.
fn builtin_filters() -> FilterHistory {
    let saved: Vec<String> = DEFAULT_FILTERS.iter().map(|f| (*f).to_string()).collect();
    FilterHistory::from_saved(&saved)
}

impl Options {
    // ---- Lifecycle -------------------------------------------------------

    /// Loads options from `path`, probing the system font catalog to
    /// resolve the view-font family.
    ///
    /// A missing file is created with defaults, matching first-run
    /// behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or created.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_probe(path, &SystemFonts::new())
    }

    /// Loads options from `path` with an explicit font probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or created.
    pub fn load_with_probe(path: &Path, probe: &dyn FontProbe) -> Result<Self> {
        if !path.exists() {
            let mut options = Self::default();
            options.view_font.family = fonts::resolve_family(
                probe,
                &[fonts::DEFAULT_FONT_FAMILY, "Courier New", "monospace"],
            );
            options.save(path)?;
            return Ok(options);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {}", path.display()))?;
        let file: OptionsFile =
            toml::from_str(&content).with_context(|| "Failed to parse TOML options")?;

        debug!(path = %path.display(), "Options loaded");
        Ok(Self::from_file(file, probe))
    }

    /// Builds the in-memory store from the on-disk shape.
    fn from_file(file: OptionsFile, probe: &dyn FontProbe) -> Self {
        let family = fonts::resolve_family(
            probe,
            &[
                file.view_font.family.as_str(),
                fonts::DEFAULT_FONT_FAMILY,
                "Courier New",
                "monospace",
            ],
        );

        let custom_filters = match file.custom_filters {
            Some(saved) => FilterHistory::from_saved(&saved),
            // First run: the sub-list has never been written.
            None => builtin_filters(),
        };

        Self {
            compare_mode: file.compare_mode,
            diff_algorithm: file.diff_algorithm,
            ignore_case: file.ignore_case,
            ignore_text_whitespace: file.ignore_text_whitespace,
            ignore_xml_whitespace: file.ignore_xml_whitespace,
            show_whitespace: file.show_whitespace,
            show_change_as_delete_insert: file.show_change_as_delete_insert,
            binary_footprint_length: file.binary_footprint_length,
            last_file_a: file.last_file_a,
            last_file_b: file.last_file_b,
            view_font: FontDescriptor {
                family,
                size: file.view_font.size,
                style: file.view_font.style,
            },
            custom_filters,
            scope: UpdateScope::default(),
            listeners: Vec::new(),
        }
    }

    /// Saves the current values to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories or the file cannot be written,
    /// or if TOML serialization fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OptionsFile {
            compare_mode: self.compare_mode,
            diff_algorithm: self.diff_algorithm,
            ignore_case: self.ignore_case,
            ignore_text_whitespace: self.ignore_text_whitespace,
            ignore_xml_whitespace: self.ignore_xml_whitespace,
            show_whitespace: self.show_whitespace,
            show_change_as_delete_insert: self.show_change_as_delete_insert,
            binary_footprint_length: self.binary_footprint_length,
            last_file_a: self.last_file_a.clone(),
            last_file_b: self.last_file_b.clone(),
            custom_filters: Some(self.custom_filters.entries().to_vec()),
            view_font: self.view_font.clone(),
        };

        let toml_str = toml::to_string_pretty(&file)?;
        let mut out = std::fs::File::create(path)
            .with_context(|| format!("Failed to create options file: {}", path.display()))?;
        out.write_all(toml_str.as_bytes())?;
        Ok(())
    }

    // ---- Update scoping --------------------------------------------------

    /// Opens an update span. Nestable; the change notification is deferred
    /// until the outermost span closes.
    pub fn begin_update(&mut self) {
        self.scope.depth += 1;
    }

    /// Closes an update span. When the outermost span closes dirty, the
    /// change notification fires exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`UnbalancedScopeError`] when no span is open.
    pub fn end_update(&mut self) -> Result<(), UnbalancedScopeError> {
        if self.scope.depth == 0 {
            return Err(UnbalancedScopeError);
        }

        self.scope.depth -= 1;
        if self.scope.depth == 0 && self.scope.dirty {
            self.scope.dirty = false;
            self.notify();
        }
        Ok(())
    }

    /// Runs `f` inside one update span.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_update();
        let result = f(self);
        if self.end_update().is_err() {
            unreachable!("update scope balanced by construction");
        }
        result
    }

    /// Registers a listener fired after each dirty outermost span.
    pub fn subscribe(&mut self, listener: impl Fn() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Records a value change. Outside any span this is an implicit
    /// one-mutation span, so the notification fires immediately.
    fn mark_dirty(&mut self) {
        self.scope.dirty = true;
        if self.scope.depth == 0 {
            self.scope.dirty = false;
            self.notify();
        }
    }

    /// Fires the change notification.
    fn notify(&self) {
        debug!(listeners = self.listeners.len(), "Options changed");
        for listener in &self.listeners {
            listener();
        }
    }

    // ---- Getters ---------------------------------------------------------

    /// Requested comparison mode.
    #[must_use]
    pub const fn compare_mode(&self) -> CompareMode {
        self.compare_mode
    }

    /// Edit-script algorithm.
    #[must_use]
    pub const fn diff_algorithm(&self) -> DiffAlgorithm {
        self.diff_algorithm
    }

    /// Case-insensitive comparison flag (meaningful for text strategy).
    #[must_use]
    pub const fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Whitespace-insensitive comparison flag (meaningful for text strategy).
    #[must_use]
    pub const fn ignore_text_whitespace(&self) -> bool {
        self.ignore_text_whitespace
    }

    /// Whether XML normalization drops insignificant whitespace.
    #[must_use]
    pub const fn ignore_xml_whitespace(&self) -> bool {
        self.ignore_xml_whitespace
    }

    /// Whether comparison views render whitespace visibly.
    #[must_use]
    pub const fn show_whitespace(&self) -> bool {
        self.show_whitespace
    }

    /// Whether changed lines render as delete+insert pairs.
    #[must_use]
    pub const fn show_change_as_delete_insert(&self) -> bool {
        self.show_change_as_delete_insert
    }

    /// Binary footprint chunk length in bytes.
    #[must_use]
    pub const fn binary_footprint_length(&self) -> usize {
        self.binary_footprint_length
    }

    /// Most recently compared left-side file.
    #[must_use]
    pub fn last_file_a(&self) -> &str {
        &self.last_file_a
    }

    /// Most recently compared right-side file.
    #[must_use]
    pub fn last_file_b(&self) -> &str {
        &self.last_file_b
    }

    /// View font descriptor.
    #[must_use]
    pub const fn view_font(&self) -> &FontDescriptor {
        &self.view_font
    }

    /// Filter history, newest first.
    #[must_use]
    pub const fn custom_filters(&self) -> &FilterHistory {
        &self.custom_filters
    }

    // ---- Setters ---------------------------------------------------------

    /// Sets the comparison mode.
    pub fn set_compare_mode(&mut self, value: CompareMode) {
        if self.compare_mode != value {
            self.compare_mode = value;
            self.mark_dirty();
        }
    }

    /// Sets the edit-script algorithm.
    pub fn set_diff_algorithm(&mut self, value: DiffAlgorithm) {
        if self.diff_algorithm != value {
            self.diff_algorithm = value;
            self.mark_dirty();
        }
    }

    /// Sets case-insensitive comparison.
    pub fn set_ignore_case(&mut self, value: bool) {
        if self.ignore_case != value {
            self.ignore_case = value;
            self.mark_dirty();
        }
    }

    /// Sets whitespace-insensitive comparison.
    pub fn set_ignore_text_whitespace(&mut self, value: bool) {
        if self.ignore_text_whitespace != value {
            self.ignore_text_whitespace = value;
            self.mark_dirty();
        }
    }

    /// Sets XML whitespace handling.
    pub fn set_ignore_xml_whitespace(&mut self, value: bool) {
        if self.ignore_xml_whitespace != value {
            self.ignore_xml_whitespace = value;
            self.mark_dirty();
        }
    }

    /// Sets visible-whitespace rendering.
    pub fn set_show_whitespace(&mut self, value: bool) {
        if self.show_whitespace != value {
            self.show_whitespace = value;
            self.mark_dirty();
        }
    }

    /// Sets delete+insert rendering of changes.
    pub fn set_show_change_as_delete_insert(&mut self, value: bool) {
        if self.show_change_as_delete_insert != value {
            self.show_change_as_delete_insert = value;
            self.mark_dirty();
        }
    }

    /// Sets the binary footprint length.
    pub fn set_binary_footprint_length(&mut self, value: usize) {
        if self.binary_footprint_length != value {
            self.binary_footprint_length = value;
            self.mark_dirty();
        }
    }

    /// Records the most recently compared left-side file.
    pub fn set_last_file_a(&mut self, value: impl Into<String>) {
        let value = value.into();
        if self.last_file_a != value {
            self.last_file_a = value;
            self.mark_dirty();
        }
    }

    /// Records the most recently compared right-side file.
    pub fn set_last_file_b(&mut self, value: impl Into<String>) {
        let value = value.into();
        if self.last_file_b != value {
            self.last_file_b = value;
            self.mark_dirty();
        }
    }

    /// Sets the view font.
    pub fn set_view_font(&mut self, value: FontDescriptor) {
        if self.view_font != value {
            self.view_font = value;
            self.mark_dirty();
        }
    }

    /// Pushes a filter onto the MRU history.
    ///
    /// Participates in the batched-notification mechanism like any other
    /// setting: a call that does not change the stored list does not dirty
    /// the store.
    pub fn add_custom_filter(&mut self, filter: &str) {
        if self.custom_filters.insert(filter) {
            self.mark_dirty();
        }
    }

    // ---- Key-based access (config command) -------------------------------

    /// Gets a setting's value by its persisted key name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "compare_mode" => Some(self.compare_mode.to_string()),
            "diff_algorithm" => Some(self.diff_algorithm.to_string()),
            "ignore_case" => Some(self.ignore_case.to_string()),
            "ignore_text_whitespace" => Some(self.ignore_text_whitespace.to_string()),
            "ignore_xml_whitespace" => Some(self.ignore_xml_whitespace.to_string()),
            "show_whitespace" => Some(self.show_whitespace.to_string()),
            "show_change_as_delete_insert" => Some(self.show_change_as_delete_insert.to_string()),
            "binary_footprint_length" => Some(self.binary_footprint_length.to_string()),
            "last_file_a" => Some(self.last_file_a.clone()),
            "last_file_b" => Some(self.last_file_b.clone()),
            "font_family" => Some(self.view_font.family.clone()),
            "font_size" => Some(self.view_font.size.to_string()),
            "font_style" => Some(self.view_font.style.to_string()),
            _ => None,
        }
    }

    /// Sets a setting's value by its persisted key name, parsing the
    /// string form. Routes through the typed setters so notification
    /// semantics hold.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// or is out of range.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "compare_mode" => self.set_compare_mode(value.parse()?),
            "diff_algorithm" => self.set_diff_algorithm(value.parse()?),
            "ignore_case" => self.set_ignore_case(parse_bool(key, value)?),
            "ignore_text_whitespace" => self.set_ignore_text_whitespace(parse_bool(key, value)?),
            "ignore_xml_whitespace" => self.set_ignore_xml_whitespace(parse_bool(key, value)?),
            "show_whitespace" => self.set_show_whitespace(parse_bool(key, value)?),
            "show_change_as_delete_insert" => {
                self.set_show_change_as_delete_insert(parse_bool(key, value)?);
            }
            "binary_footprint_length" => {
                let length: usize = value
                    .parse()
                    .with_context(|| format!("Invalid footprint length: {value}"))?;
                if !(1..=64).contains(&length) {
                    return Err(anyhow::anyhow!(
                        "Footprint length must be between 1 and 64"
                    ));
                }
                self.set_binary_footprint_length(length);
            }
            "last_file_a" => self.set_last_file_a(value),
            "last_file_b" => self.set_last_file_b(value),
            "font_family" => {
                let mut font = self.view_font.clone();
                font.family = value.to_string();
                self.set_view_font(font);
            }
            "font_size" => {
                let size: f32 = value
                    .parse()
                    .with_context(|| format!("Invalid font size: {value}"))?;
                let mut font = self.view_font.clone();
                font.size = size;
                self.set_view_font(font);
            }
            "font_style" => {
                let mut font = self.view_font.clone();
                font.style = value.parse()?;
                self.set_view_font(font);
            }
            _ => return Err(anyhow::anyhow!("Unknown option key: {key}")),
        }
        Ok(())
    }

    /// All gettable keys in display order, for `config --list`.
    #[must_use]
    pub fn list(&self) -> Vec<(&'static str, String)> {
        const KEYS: &[&str] = &[
            "compare_mode",
            "diff_algorithm",
            "ignore_case",
            "ignore_text_whitespace",
            "ignore_xml_whitespace",
            "show_whitespace",
            "show_change_as_delete_insert",
            "binary_footprint_length",
            "last_file_a",
            "last_file_b",
            "font_family",
            "font_size",
            "font_style",
        ];
        KEYS.iter()
            .map(|key| (*key, self.get(key).unwrap_or_default()))
            .collect()
    }
}

/// Parses a boolean setting value with a key-specific error.
fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .with_context(|| format!("Invalid boolean for {key}: {value}"))
}
