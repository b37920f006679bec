//! Checkpoint file formats

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported checkpoint formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFormat {
    /// JSON format (`.ckpt`, `.json`)
    Json,
    /// YAML format (`.yaml`, `.yml`)
    Yaml,
}

impl ModelFormat {
    /// Get format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "ckpt" | "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Detect the format of `path`, failing on unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| Error::UnsupportedFormat {
            format: if ext.is_empty() { "<none>".to_string() } else { ext.to_string() },
        })
    }
}

/// Options for writing a checkpoint
#[derive(Debug, Clone)]
pub struct SaveConfig {
    /// Output format
    pub format: ModelFormat,
    /// Pretty-print JSON
    pub pretty: bool,
}

impl SaveConfig {
    /// Create a new save configuration
    pub fn new(format: ModelFormat) -> Self {
        Self { format, pretty: false }
    }

    /// Configuration matching the extension of `path`.
    pub fn for_path(path: &Path) -> Result<Self> {
        ModelFormat::from_path(path).map(Self::new)
    }

    /// Set pretty printing
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
