//! Supported file formats

use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// A serialization format, chosen from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    /// Detect the format from an extension (case-insensitive, no dot).
    ///
    /// - `toml` -> TOML
    /// - `json` -> JSON
    /// - `yaml`, `yml` -> YAML
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "toml" => Ok(Format::Toml),
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Detect the format from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy())
            .unwrap_or_default();
        Self::from_extension(&extension)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Toml => write!(f, "TOML"),
            Format::Json => write!(f, "JSON"),
            Format::Yaml => write!(f, "YAML"),
        }
    }
}
