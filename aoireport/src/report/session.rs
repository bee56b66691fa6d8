//! Report session orchestration.

use super::entry::{EntryFailure, EntryOutcome, FailureStage, LayerReportEntry, ReportRun};
use super::error::ExportError;
use super::expand::{ExpansionResolver, TargetResolution};
use super::export::PaginatedExportEngine;
use super::query::IntersectQueryEngine;
use crate::config::{ReportOptions, ServiceCatalog};
use crate::geometry::AreaOfInterest;
use crate::remote::FeatureService;
use crate::tabular::{preview_columns, safe_filename, to_csv, FieldValue, Row, LAYER_COLUMN};
use tracing::{debug, info, warn};

/// Filename of the combined all-layers export.
pub const COMBINED_EXPORT_FILENAME: &str = "intersect_report_ALL_FULL.csv";

/// Progress signal emitted after each target completes: a monotonic
/// "i of N" a caller can render incrementally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProgress {
    pub completed: usize,
    pub total: usize,
    pub title: String,
}

/// How an export's rows were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportProvenance {
    /// The complete result set
    Full,
    /// The feature cap ended the export before exhaustion
    Capped,
    /// Degenerate state: no export query was attached, sample rows were
    /// substituted
    SampleFallback,
}

/// Result of a per-layer export request.
#[derive(Debug)]
pub struct LayerExport<'a> {
    pub rows: &'a [Row],
    pub provenance: ExportProvenance,
}

/// CSV text plus its derived download filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub filename: String,
    pub text: String,
}

/// Owns the state of report runs against one remote service stack.
///
/// A session is created once by the caller and holds the current
/// [`ReportRun`] plus each entry's export cache. All state is exclusively
/// owned and mutated through `&mut self`, so overlapping runs on one
/// session are unrepresentable; anyone substituting real parallelism must
/// add synchronization around cache population and run replacement.
pub struct ReportSession<S> {
    service: S,
    options: ReportOptions,
    run: Option<ReportRun>,
    next_generation: u64,
}

impl<S: FeatureService> ReportSession<S> {
    pub fn new(service: S, options: ReportOptions) -> Self {
        Self {
            service,
            options,
            run: None,
            next_generation: 0,
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// The remote service stack this session queries through.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The current run, if one has been executed.
    pub fn current_run(&self) -> Option<&ReportRun> {
        self.run.as_ref()
    }

    /// Drop the current run and its caches.
    pub fn clear(&mut self) {
        self.run = None;
    }

    /// Columns for an entry's on-screen sample preview, bounded by the
    /// configured table width. Empty for tombstones and unknown indices.
    pub fn preview_columns(&self, index: usize) -> Vec<String> {
        self.run
            .as_ref()
            .and_then(|run| run.entry(index))
            .and_then(|entry| entry.queried())
            .map(|layer| preview_columns(layer.sample_rows(), self.options.max_fields_in_table()))
            .unwrap_or_default()
    }

    /// Execute a report run. See [`Self::run_with_progress`].
    pub async fn run(&mut self, aoi: &AreaOfInterest, catalog: &ServiceCatalog) -> &ReportRun {
        self.run_with_progress(aoi, catalog, |_| {}).await
    }

    /// Execute a report run, invoking `progress` after each target.
    ///
    /// The selection and report catalogs are merged and de-duplicated by
    /// resolved URL, expanded, and the resulting targets are queried
    /// strictly sequentially against `aoi`. Every target yields exactly
    /// one entry, failed ones as tombstones, in expansion order. The new
    /// run wholly replaces any previous one.
    ///
    /// An empty catalog is not an error; it yields an empty run.
    pub async fn run_with_progress(
        &mut self,
        aoi: &AreaOfInterest,
        catalog: &ServiceCatalog,
        mut progress: impl FnMut(RunProgress),
    ) -> &ReportRun {
        let descriptors = catalog.merged_descriptors();
        let resolver = ExpansionResolver::new(&self.service);
        let resolutions = resolver.expand_all(&descriptors, false).await;
        let total = resolutions.len();
        info!(targets = total, "report run started");

        let engine = IntersectQueryEngine::new(&self.service, &self.options);
        let mut entries = Vec::with_capacity(total);
        for (index, resolution) in resolutions.into_iter().enumerate() {
            let entry = match resolution {
                TargetResolution::Failed { title, url, error } => LayerReportEntry::errored(
                    title,
                    url,
                    EntryFailure::new(FailureStage::Expansion, error.to_string()),
                ),
                TargetResolution::Resolved(target) => match engine.query(&target, aoi).await {
                    Ok(layer) => LayerReportEntry::new_queried(target.title, target.url, layer),
                    Err(error) => {
                        warn!(%error, "target query failed; continuing with remaining targets");
                        LayerReportEntry::errored(
                            target.title,
                            target.url,
                            EntryFailure::new(FailureStage::Query, error.to_string()),
                        )
                    }
                },
            };
            progress(RunProgress {
                completed: index + 1,
                total,
                title: entry.title().to_string(),
            });
            entries.push(entry);
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        info!(generation, entries = entries.len(), "report run completed");
        self.run.insert(ReportRun::new(generation, entries))
    }

    /// Fetch (or serve from cache) the full rows of one entry.
    ///
    /// The first request pages through the complete result set with the
    /// entry's retained base query and caches it; any later request
    /// returns the cached rows without touching the network. An entry
    /// that somehow carries no export query falls back to its sample
    /// rows, loudly: the substitution is logged and marked in the
    /// returned provenance. A failed page leaves the cache unpopulated,
    /// so the export stays retryable.
    pub async fn export_layer(&mut self, index: usize) -> Result<LayerExport<'_>, ExportError> {
        let Self {
            service,
            options,
            run,
            ..
        } = self;
        let run = run.as_mut().ok_or(ExportError::NoActiveRun)?;
        let entry = run.entry_mut(index).ok_or(ExportError::UnknownEntry(index))?;
        let title = entry.title().to_string();
        let url = entry.url().to_string();
        let layer = match entry.outcome_mut() {
            EntryOutcome::Queried(layer) => layer,
            EntryOutcome::Errored(_) => return Err(ExportError::ErroredEntry { title }),
        };

        if layer.full_rows.is_none() {
            let Some(query) = layer.export_query.as_ref() else {
                warn!(title = %title, "entry has no export query; falling back to sample rows");
                return Ok(LayerExport {
                    rows: layer.sample_rows(),
                    provenance: ExportProvenance::SampleFallback,
                });
            };
            debug!(title = %title, "fetching full export");
            let engine = PaginatedExportEngine::new(&*service);
            let rows = engine
                .export_all(&url, query, options.page_size(), options.max_export_features())
                .await?;
            info!(title = %title, rows = rows.len(), "full export cached");
            layer.full_rows = Some(rows);
        } else {
            debug!(title = %title, "serving cached full export");
        }

        let rows = layer.full_rows.as_deref().unwrap_or_default();
        let cap = options.max_export_features();
        let provenance = if cap > 0 && rows.len() as u64 >= cap {
            ExportProvenance::Capped
        } else {
            ExportProvenance::Full
        };
        Ok(LayerExport { rows, provenance })
    }

    /// Export one entry as CSV text with a filename derived from its
    /// title. The sample-fallback case is visible in the filename.
    pub async fn export_layer_csv(&mut self, index: usize) -> Result<CsvDocument, ExportError> {
        let export = self.export_layer(index).await?;
        let provenance = export.provenance;
        let text = to_csv(export.rows, &[]);

        let entry = self
            .run
            .as_ref()
            .ok_or(ExportError::NoActiveRun)?
            .entry(index)
            .ok_or(ExportError::UnknownEntry(index))?;
        let suffix = if provenance == ExportProvenance::SampleFallback {
            "_SAMPLE.csv"
        } else {
            "_FULL.csv"
        };
        Ok(CsvDocument {
            filename: format!("{}{}", safe_filename(entry.title()), suffix),
            text,
        })
    }

    /// Export every entry's full rows as one combined CSV, each row
    /// annotated with its source layer title under the reserved
    /// [`LAYER_COLUMN`] column.
    ///
    /// Entries lacking a cache are populated through [`Self::export_layer`]
    /// first, sequentially. Errored entries are excluded; an entry whose
    /// export fails is skipped, its cache left unpopulated, and the rest
    /// of the loop continues.
    pub async fn export_all_csv(&mut self) -> Result<CsvDocument, ExportError> {
        let total = self.run.as_ref().ok_or(ExportError::NoActiveRun)?.len();
        let mut combined: Vec<Row> = Vec::new();
        let mut skipped = 0usize;

        for index in 0..total {
            let (is_errored, title) = {
                let entry = match self.run.as_ref().and_then(|r| r.entry(index)) {
                    Some(entry) => entry,
                    None => continue,
                };
                (entry.is_errored(), entry.title().to_string())
            };
            if is_errored {
                debug!(title = %title, "excluding errored entry from combined export");
                skipped += 1;
                continue;
            }

            match self.export_layer(index).await {
                Ok(export) => {
                    for row in export.rows {
                        let mut combined_row = row.clone();
                        combined_row
                            .insert(LAYER_COLUMN.to_string(), FieldValue::Text(title.clone()));
                        combined.push(combined_row);
                    }
                }
                Err(error) => {
                    warn!(title = %title, %error, "skipping layer in combined export");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            info!(skipped, "combined export skipped entries");
        }
        Ok(CsvDocument {
            filename: COMBINED_EXPORT_FILENAME.to_string(),
            text: to_csv(&combined, &[LAYER_COLUMN]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceDescriptor;
    use crate::remote::RemoteError;
    use crate::report::testing::{numbered_features, test_aoi, ScriptedService};

    const ROADS: &str = "https://host/R/FeatureServer/1";
    const PARCELS: &str = "https://host/P/FeatureServer/0";

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::new(
            Vec::new(),
            vec![
                ServiceDescriptor::new("Parcels", PARCELS),
                ServiceDescriptor::new("Roads", ROADS),
            ],
        )
    }

    fn scripted() -> ScriptedService {
        ScriptedService::new()
            .with_count(PARCELS, 3)
            .with_features(PARCELS, numbered_features(3))
            .with_count(ROADS, 7)
            .with_features(ROADS, numbered_features(7))
    }

    #[tokio::test]
    async fn test_run_replaces_previous_run_and_bumps_generation() {
        let mut session = ReportSession::new(scripted(), ReportOptions::default());
        let aoi = test_aoi();

        let first = session.run(&aoi, &catalog()).await.generation();
        let second = session.run(&aoi, &catalog()).await.generation();
        assert!(second > first);
        assert_eq!(session.current_run().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_export_layer_is_memoized() {
        let mut session = ReportSession::new(scripted(), ReportOptions::default());
        session.run(&test_aoi(), &catalog()).await;

        let first_len = session.export_layer(1).await.unwrap().rows.len();
        let pages_after_first = session_pages(&session);
        let second_len = session.export_layer(1).await.unwrap().rows.len();
        let pages_after_second = session_pages(&session);

        assert_eq!(first_len, 7);
        assert_eq!(second_len, 7);
        // The second export issues no further page requests.
        assert_eq!(pages_after_first, pages_after_second);
    }

    fn session_pages(session: &ReportSession<ScriptedService>) -> usize {
        session.service.page_requests().len()
    }

    #[tokio::test]
    async fn test_export_errored_entry_is_rejected() {
        let service = ScriptedService::new()
            .with_count_error(PARCELS, RemoteError::HttpError("down".to_string()))
            .with_count(ROADS, 7)
            .with_features(ROADS, numbered_features(7));
        let mut session = ReportSession::new(service, ReportOptions::default());
        session.run(&test_aoi(), &catalog()).await;

        let err = session.export_layer(0).await.unwrap_err();
        assert!(matches!(err, ExportError::ErroredEntry { .. }));
    }

    #[tokio::test]
    async fn test_export_without_run_is_rejected() {
        let mut session = ReportSession::new(scripted(), ReportOptions::default());
        assert!(matches!(
            session.export_layer(0).await,
            Err(ExportError::NoActiveRun)
        ));
        assert!(matches!(
            session.export_all_csv().await,
            Err(ExportError::NoActiveRun)
        ));
    }

    #[tokio::test]
    async fn test_missing_export_query_falls_back_to_samples() {
        let mut session = ReportSession::new(scripted(), ReportOptions::default());
        session.run(&test_aoi(), &catalog()).await;

        // Force the degenerate state the fallback guards against.
        if let Some(entry) = session.run.as_mut().and_then(|r| r.entry_mut(0)) {
            if let EntryOutcome::Queried(layer) = entry.outcome_mut() {
                layer.export_query = None;
            }
        }

        let export = session.export_layer(0).await.unwrap();
        assert_eq!(export.provenance, ExportProvenance::SampleFallback);
        assert_eq!(export.rows.len(), 3);

        let document = session.export_layer_csv(0).await.unwrap();
        assert_eq!(document.filename, "Parcels_SAMPLE.csv");
    }

    #[tokio::test]
    async fn test_export_layer_csv_derives_filename() {
        let mut session = ReportSession::new(scripted(), ReportOptions::default());
        session.run(&test_aoi(), &catalog()).await;

        let document = session.export_layer_csv(1).await.unwrap();
        assert_eq!(document.filename, "Roads_FULL.csv");
        assert!(document.text.starts_with("OBJECTID"));
    }

    #[tokio::test]
    async fn test_clear_drops_run_and_caches() {
        let mut session = ReportSession::new(scripted(), ReportOptions::default());
        session.run(&test_aoi(), &catalog()).await;
        session.clear();
        assert!(session.current_run().is_none());
    }
}
