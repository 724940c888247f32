//! View-font descriptor and host font-catalog probing.
//!
//! Font installation is host-environment-dependent, so the lookup is
//! abstracted behind [`FontProbe`]; the resolution algorithm itself stays
//! deterministic and testable without a real display environment.

use serde::{Deserialize, Serialize};

/// Default view-font point size.
pub const DEFAULT_FONT_SIZE: f32 = 9.75;

/// Default view-font family, subject to host resolution on load.
pub const DEFAULT_FONT_FAMILY: &str = "Consolas";

/// Style variant of the view font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Regular weight, upright.
    #[default]
    Regular,
    /// Bold weight.
    Bold,
    /// Italic slant.
    Italic,
}

impl std::str::FromStr for FontStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "bold" => Ok(Self::Bold),
            "italic" => Ok(Self::Italic),
            other => Err(anyhow::anyhow!("Unknown font style: {other}")),
        }
    }
}

impl std::fmt::Display for FontStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Regular => "regular",
            Self::Bold => "bold",
            Self::Italic => "italic",
        };
        write!(f, "{name}")
    }
}

/// The font used to render comparison views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// Font family name.
    #[serde(default = "default_family")]
    pub family: String,
    /// Point size.
    #[serde(default = "default_size")]
    pub size: f32,
    /// Style variant.
    #[serde(default)]
    pub style: FontStyle,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: DEFAULT_FONT_SIZE,
            style: FontStyle::Regular,
        }
    }
}

/// Serde default for the font family.
fn default_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

/// Serde default for the font size.
const fn default_size() -> f32 {
    DEFAULT_FONT_SIZE
}

/// Capability to ask whether a font family is installed on the host.
pub trait FontProbe {
    /// Returns `true` if the named family is available.
    fn is_family_installed(&self, family: &str) -> bool;
}

/// Host font catalog backed by the system font database.
pub struct SystemFonts {
    /// Loaded system font database.
    db: fontdb::Database,
}

impl SystemFonts {
    /// Enumerates the fonts installed on the host.
    #[must_use]
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self { db }
    }
}

impl Default for SystemFonts {
    fn default() -> Self {
        Self::new()
    }
}

impl FontProbe for SystemFonts {
    fn is_family_installed(&self, family: &str) -> bool {
        let query = fontdb::Query {
            families: &[fontdb::Family::Name(family)],
            ..fontdb::Query::default()
        };
        self.db.query(&query).is_some()
    }
}

/// Returns the first candidate family that is installed on the host.
///
/// Falls back to the *last* candidate when none are installed, so the
/// result is always a usable (if unmatched) family name. Empty candidate
/// lists yield an empty string; callers always pass at least one name.
#[must_use]
pub fn resolve_family(probe: &dyn FontProbe, candidates: &[&str]) -> String {
    let mut result = String::new();

    for candidate in candidates {
        // Record the candidate first so the last one survives a full miss.
        result = (*candidate).to_string();
        if probe.is_family_installed(candidate) {
            break;
        }
    }

    result
}
