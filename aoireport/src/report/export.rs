//! Full-result export via offset pagination.

use super::error::ExportError;
use crate::remote::{FeatureService, IntersectQuery};
use crate::tabular::{flatten_features, Row};
use tracing::debug;

/// Pages through every feature matching a base query, up to a hard cap.
pub struct PaginatedExportEngine<'a, S> {
    service: &'a S,
}

impl<'a, S: FeatureService> PaginatedExportEngine<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Fetch all matching rows for one layer.
    ///
    /// Starting at offset 0, requests `page_size` attribute-only features
    /// per page and accumulates them until a page comes back short (the
    /// result set is exhausted) or the accumulator reaches `max_features`
    /// (the result is truncated to exactly the cap). A cap of 0 means
    /// uncapped. Callers distinguish the two endings by comparing the
    /// returned length against the cap.
    ///
    /// # Errors
    ///
    /// A failed page aborts the export; the accumulated prefix is
    /// dropped and the error carries the failing offset. There is no
    /// automatic retry.
    pub async fn export_all(
        &self,
        url: &str,
        query: &IntersectQuery,
        page_size: u64,
        max_features: u64,
    ) -> Result<Vec<Row>, ExportError> {
        // A zero page size would never terminate.
        let page_size = page_size.max(1);

        let mut rows: Vec<Row> = Vec::new();
        let mut offset = 0u64;
        loop {
            let page = self
                .service
                .query_page(url, query, offset, page_size)
                .await
                .map_err(|source| ExportError::PageFetch {
                    url: url.to_string(),
                    offset,
                    source,
                })?;

            let fetched = page.features.len() as u64;
            rows.extend(flatten_features(page.features));

            if max_features > 0 && rows.len() as u64 >= max_features {
                rows.truncate(max_features as usize);
                debug!(url, total = rows.len(), "export reached feature cap");
                break;
            }
            if fetched < page_size {
                debug!(url, total = rows.len(), "export exhausted result set");
                break;
            }
            offset += page_size;
        }

        Ok(rows)
    }
}
