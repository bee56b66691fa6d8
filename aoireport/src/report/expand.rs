//! Expansion of catalog descriptors into queryable layer targets.
//!
//! A configured URL is either a layer URL (directly queryable) or a
//! service root that groups sublayers and must be expanded through its
//! metadata document before anything can be queried. Expansion never
//! fails a batch: a descriptor whose metadata cannot be fetched degrades
//! to a single tombstone resolution and the batch continues.

use super::error::ExpansionError;
use crate::config::ServiceDescriptor;
use crate::remote::{normalize_url, FeatureService, ESRI_GEOMETRY_POLYGON};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A URL known to support feature queries directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryableLayerTarget {
    pub title: String,
    pub url: String,
}

/// Outcome of expanding one descriptor position: a concrete target, or a
/// tombstone carrying the failure in its place.
#[derive(Debug)]
pub enum TargetResolution {
    /// A queryable layer target
    Resolved(QueryableLayerTarget),
    /// The descriptor could not be expanded; the batch continues
    Failed {
        title: String,
        url: String,
        error: ExpansionError,
    },
}

impl TargetResolution {
    /// The URL this resolution stands for, used for de-duplication.
    fn url(&self) -> &str {
        match self {
            TargetResolution::Resolved(target) => &target.url,
            TargetResolution::Failed { url, .. } => url,
        }
    }
}

/// Classify a URL as a service root (expandable) rather than a layer URL.
///
/// Roots end in the service suffix itself; layer URLs carry a trailing
/// layer id segment.
pub fn is_service_root(url: &str) -> bool {
    let trimmed = normalize_url(url);
    trimmed.ends_with("/FeatureServer") || trimmed.ends_with("/MapServer")
}

/// Expands catalog descriptors into queryable layer targets.
pub struct ExpansionResolver<'a, S> {
    service: &'a S,
}

impl<'a, S: FeatureService> ExpansionResolver<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Expand one descriptor into its queryable targets.
    ///
    /// A layer URL resolves to exactly one target with the descriptor's
    /// own title; a service root resolves to one target per listed
    /// sublayer, titled `"{descriptor}: {sublayer}"`.
    pub async fn expand(&self, descriptor: &ServiceDescriptor) -> Vec<TargetResolution> {
        self.expand_inner(descriptor, false).await
    }

    /// Expand one descriptor, keeping only polygon layers.
    ///
    /// Used for AOI-selection catalogs, where only polygon layers make
    /// sense as selection sources. Targets whose geometry type cannot be
    /// determined are excluded.
    pub async fn expand_polygon_only(&self, descriptor: &ServiceDescriptor) -> Vec<TargetResolution> {
        self.expand_inner(descriptor, true).await
    }

    /// Expand a batch of descriptors in order, de-duplicating targets by
    /// normalized URL: each physical layer is processed once per run even
    /// if several catalog entries reach it.
    pub async fn expand_all(
        &self,
        descriptors: &[&ServiceDescriptor],
        polygon_only: bool,
    ) -> Vec<TargetResolution> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut resolutions = Vec::new();
        for descriptor in descriptors {
            for resolution in self.expand_inner(descriptor, polygon_only).await {
                let key = normalize_url(resolution.url()).to_string();
                if seen.insert(key) {
                    resolutions.push(resolution);
                } else {
                    debug!(
                        url = resolution.url(),
                        "skipping duplicate target reachable from multiple catalog entries"
                    );
                }
            }
        }
        resolutions
    }

    async fn expand_inner(
        &self,
        descriptor: &ServiceDescriptor,
        polygon_only: bool,
    ) -> Vec<TargetResolution> {
        if !is_service_root(&descriptor.url) {
            let target = QueryableLayerTarget {
                title: descriptor.title.clone(),
                url: descriptor.url.clone(),
            };
            if polygon_only && !self.is_polygon_layer(&target.url, None).await {
                return Vec::new();
            }
            return vec![TargetResolution::Resolved(target)];
        }

        let root = normalize_url(&descriptor.url);
        let info = match self.service.service_info(root).await {
            Ok(info) => info,
            Err(source) => {
                warn!(url = root, error = %source, "service root expansion failed");
                return vec![TargetResolution::Failed {
                    title: format!("{} (failed to expand)", descriptor.title),
                    url: descriptor.url.clone(),
                    error: ExpansionError::Metadata {
                        url: root.to_string(),
                        source,
                    },
                }];
            }
        };

        let mut targets = Vec::with_capacity(info.layers.len());
        for sublayer in &info.layers {
            let name = sublayer
                .name
                .clone()
                .unwrap_or_else(|| format!("Layer {}", sublayer.id));
            let url = format!("{}/{}", root, sublayer.id);

            if polygon_only
                && !self
                    .is_polygon_layer(&url, sublayer.geometry_type.as_deref())
                    .await
            {
                continue;
            }

            targets.push(TargetResolution::Resolved(QueryableLayerTarget {
                title: format!("{}: {}", descriptor.title, name),
                url,
            }));
        }
        targets
    }

    /// Determine whether a layer holds polygons.
    ///
    /// Root metadata does not reliably carry a sublayer's geometry type,
    /// so when the hint is absent the layer's own metadata is consulted.
    /// A layer whose type cannot be determined is excluded.
    async fn is_polygon_layer(&self, url: &str, hint: Option<&str>) -> bool {
        if let Some(geometry_type) = hint {
            return geometry_type == ESRI_GEOMETRY_POLYGON;
        }
        match self.service.layer_info(url).await {
            Ok(info) => match info.geometry_type.as_deref() {
                Some(geometry_type) => geometry_type == ESRI_GEOMETRY_POLYGON,
                None => {
                    warn!(url, "layer metadata lacks geometry type; excluding from selection");
                    false
                }
            },
            Err(error) => {
                warn!(url, %error, "layer metadata lookup failed; excluding from selection");
                false
            }
        }
    }
}
