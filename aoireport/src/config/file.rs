//! Loading the combined configuration document.

use super::catalog::ServiceCatalog;
use super::options::ReportOptions;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors loading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Document was not valid configuration JSON
    #[error("failed to parse config document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The configuration document a host application ships: both catalogs
/// plus the report options block. Unknown sections (map extent, UI
/// settings) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(flatten)]
    catalog: ServiceCatalog,
    #[serde(default)]
    report: ReportOptions,
}

impl ConfigFile {
    /// Parse a configuration document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a configuration document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Split into the catalog and options the engine consumes.
    pub fn into_parts(self) -> (ServiceCatalog, ReportOptions) {
        (self.catalog, self.report)
    }
}
