//! Service catalogs.

use crate::remote::normalize_url;
use serde::Deserialize;
use std::collections::HashSet;

/// One configured service entry: a human title, the service or layer URL,
/// and an optional rendering hint for the host application's map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub symbology_hint: Option<String>,
}

impl ServiceDescriptor {
    /// Create a descriptor without a symbology hint.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            symbology_hint: None,
        }
    }
}

/// The configured catalogs: selection-role layers (AOI sources) and
/// report-role layers (always reported on).
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCatalog {
    #[serde(default)]
    selection_layers: Vec<ServiceDescriptor>,
    #[serde(default)]
    report_layers: Vec<ServiceDescriptor>,
}

impl ServiceCatalog {
    /// Build a catalog from explicit descriptor lists.
    pub fn new(
        selection_layers: Vec<ServiceDescriptor>,
        report_layers: Vec<ServiceDescriptor>,
    ) -> Self {
        Self {
            selection_layers,
            report_layers,
        }
    }

    /// The selection-role descriptors, in configuration order.
    pub fn selection_layers(&self) -> &[ServiceDescriptor] {
        &self.selection_layers
    }

    /// The report-role descriptors, in configuration order.
    pub fn report_layers(&self) -> &[ServiceDescriptor] {
        &self.report_layers
    }

    /// Look a descriptor up by URL, across both roles.
    pub fn descriptor_by_url(&self, url: &str) -> Option<&ServiceDescriptor> {
        let wanted = normalize_url(url);
        self.selection_layers
            .iter()
            .chain(&self.report_layers)
            .find(|d| normalize_url(&d.url) == wanted)
    }

    /// Both catalogs merged in configuration order (selection first),
    /// de-duplicated by normalized URL: a report run must process each
    /// physical service once even when both roles reference it.
    pub fn merged_descriptors(&self) -> Vec<&ServiceDescriptor> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.selection_layers
            .iter()
            .chain(&self.report_layers)
            .filter(|d| seen.insert(normalize_url(&d.url)))
            .collect()
    }
}
