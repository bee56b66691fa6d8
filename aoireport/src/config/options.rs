//! Report option values.

use super::defaults::{
    DEFAULT_MAX_EXPORT_FEATURES, DEFAULT_MAX_FIELDS_IN_TABLE,
    DEFAULT_MAX_SAMPLE_FEATURES_PER_LAYER, DEFAULT_PAGE_SIZE,
};
use serde::Deserialize;

/// Numeric options governing a report run.
///
/// # Example
///
/// ```
/// use aoireport::config::ReportOptions;
///
/// // Using defaults
/// let options = ReportOptions::default();
/// assert_eq!(options.max_sample_features_per_layer(), 25);
/// assert_eq!(options.page_size(), 1000);
///
/// // Custom configuration
/// let options = ReportOptions::new()
///     .with_page_size(500)
///     .with_max_export_features(10_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportOptions {
    /// Sample rows fetched per layer for previews
    max_sample_features_per_layer: u64,
    /// Columns shown in a preview table
    max_fields_in_table: usize,
    /// Features requested per export page
    page_size: u64,
    /// Hard cap on one full export; 0 disables the cap
    max_export_features: u64,
}

impl ReportOptions {
    /// Create report options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-layer sample cap. 0 disables sample queries entirely.
    pub fn with_max_sample_features_per_layer(mut self, cap: u64) -> Self {
        self.max_sample_features_per_layer = cap;
        self
    }

    /// Set the preview table column cap.
    pub fn with_max_fields_in_table(mut self, cap: usize) -> Self {
        self.max_fields_in_table = cap;
        self
    }

    /// Set the export page size.
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the full-export feature cap. 0 disables the cap.
    pub fn with_max_export_features(mut self, cap: u64) -> Self {
        self.max_export_features = cap;
        self
    }

    /// Get the per-layer sample cap.
    pub fn max_sample_features_per_layer(&self) -> u64 {
        self.max_sample_features_per_layer
    }

    /// Get the preview table column cap.
    pub fn max_fields_in_table(&self) -> usize {
        self.max_fields_in_table
    }

    /// Get the export page size.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Get the full-export feature cap.
    pub fn max_export_features(&self) -> u64 {
        self.max_export_features
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_sample_features_per_layer: DEFAULT_MAX_SAMPLE_FEATURES_PER_LAYER,
            max_fields_in_table: DEFAULT_MAX_FIELDS_IN_TABLE,
            page_size: DEFAULT_PAGE_SIZE,
            max_export_features: DEFAULT_MAX_EXPORT_FEATURES,
        }
    }
}
