//! Per-target intersect querying.

use super::entry::QueriedLayer;
use super::error::QueryError;
use super::expand::QueryableLayerTarget;
use crate::config::{ReportOptions, SAMPLE_REQUEST_CEILING};
use crate::geometry::AreaOfInterest;
use crate::remote::{FeatureService, IntersectQuery};
use crate::tabular::flatten_features;
use tracing::debug;

/// Runs the count and bounded sample queries for one layer target.
pub struct IntersectQueryEngine<'a, S> {
    service: &'a S,
    options: &'a ReportOptions,
}

impl<'a, S: FeatureService> IntersectQueryEngine<'a, S> {
    pub fn new(service: &'a S, options: &'a ReportOptions) -> Self {
        Self { service, options }
    }

    /// Query one target against an AOI.
    ///
    /// Issues the feature-count query, then, only when features intersect
    /// and a sample cap is configured, a bounded attributes-only sample
    /// query for the preview. The base query is packaged into the result
    /// so a later full export reuses the identical spatial filter.
    ///
    /// # Errors
    ///
    /// Any service failure is returned tagged with the target's title and
    /// URL; the caller records it as an errored entry and continues with
    /// the remaining targets.
    pub async fn query(
        &self,
        target: &QueryableLayerTarget,
        aoi: &AreaOfInterest,
    ) -> Result<QueriedLayer, QueryError> {
        let query = IntersectQuery::new(aoi.clone());

        let count = self
            .service
            .query_count(&target.url, &query)
            .await
            .map_err(|source| QueryError::Count {
                title: target.title.clone(),
                url: target.url.clone(),
                source,
            })?;
        debug!(title = %target.title, count, "intersect count query completed");

        let sample_cap = self.options.max_sample_features_per_layer();
        let mut sample_rows = Vec::new();
        if count > 0 && sample_cap > 0 {
            let limit = sample_cap.min(SAMPLE_REQUEST_CEILING);
            let page = self
                .service
                .query_page(&target.url, &query, 0, limit)
                .await
                .map_err(|source| QueryError::Sample {
                    title: target.title.clone(),
                    url: target.url.clone(),
                    source,
                })?;
            sample_rows = flatten_features(page.features);
        }

        Ok(QueriedLayer::new(count, sample_rows, query))
    }
}
