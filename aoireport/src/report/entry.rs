//! Report run state.

use crate::remote::IntersectQuery;
use crate::tabular::Row;
use std::fmt;

/// The stage at which a target failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// The descriptor could not be expanded into targets
    Expansion,
    /// The target's count or sample query failed
    Query,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Expansion => f.write_str("expansion"),
            FailureStage::Query => f.write_str("query"),
        }
    }
}

/// Why an entry carries no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    stage: FailureStage,
    message: String,
}

impl EntryFailure {
    pub(crate) fn new(stage: FailureStage, message: String) -> Self {
        Self { stage, message }
    }

    pub fn stage(&self) -> FailureStage {
        self.stage
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Data captured for a successfully queried target.
#[derive(Debug, Clone)]
pub struct QueriedLayer {
    count: u64,
    sample_rows: Vec<Row>,
    /// Base query retained for full export; absent only in degenerate
    /// states where the export falls back to sample rows.
    pub(crate) export_query: Option<IntersectQuery>,
    /// Full export cache, populated at most once per run.
    pub(crate) full_rows: Option<Vec<Row>>,
}

impl QueriedLayer {
    pub(crate) fn new(count: u64, sample_rows: Vec<Row>, export_query: IntersectQuery) -> Self {
        Self {
            count,
            sample_rows,
            export_query: Some(export_query),
            full_rows: None,
        }
    }

    /// Authoritative total of intersecting features.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The bounded preview rows.
    pub fn sample_rows(&self) -> &[Row] {
        &self.sample_rows
    }

    /// The cached full export, if one has been fetched this run.
    pub fn full_rows(&self) -> Option<&[Row]> {
        self.full_rows.as_deref()
    }

    /// Whether the full export has been fetched and cached.
    pub fn is_exported(&self) -> bool {
        self.full_rows.is_some()
    }
}

/// What became of one target.
#[derive(Debug, Clone)]
pub enum EntryOutcome {
    /// The target was queried; count and samples are populated
    Queried(QueriedLayer),
    /// The target failed; this entry is its tombstone
    Errored(EntryFailure),
}

/// One row of a report run: a processed target, successful or not.
#[derive(Debug, Clone)]
pub struct LayerReportEntry {
    title: String,
    url: String,
    outcome: EntryOutcome,
}

impl LayerReportEntry {
    pub(crate) fn new_queried(title: String, url: String, layer: QueriedLayer) -> Self {
        Self {
            title,
            url,
            outcome: EntryOutcome::Queried(layer),
        }
    }

    pub(crate) fn errored(title: String, url: String, failure: EntryFailure) -> Self {
        Self {
            title,
            url,
            outcome: EntryOutcome::Errored(failure),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn outcome(&self) -> &EntryOutcome {
        &self.outcome
    }

    pub(crate) fn outcome_mut(&mut self) -> &mut EntryOutcome {
        &mut self.outcome
    }

    /// The queried payload, unless this entry is a tombstone.
    pub fn queried(&self) -> Option<&QueriedLayer> {
        match &self.outcome {
            EntryOutcome::Queried(layer) => Some(layer),
            EntryOutcome::Errored(_) => None,
        }
    }

    pub fn is_errored(&self) -> bool {
        matches!(self.outcome, EntryOutcome::Errored(_))
    }
}

/// One report run: ordered entries, one per resolved target, stamped with
/// a generation so callers can tell replacement runs apart.
#[derive(Debug, Clone)]
pub struct ReportRun {
    generation: u64,
    entries: Vec<LayerReportEntry>,
}

impl ReportRun {
    pub(crate) fn new(generation: u64, entries: Vec<LayerReportEntry>) -> Self {
        Self {
            generation,
            entries,
        }
    }

    /// Monotonic stamp distinguishing this run from the session's other
    /// runs.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entries(&self) -> &[LayerReportEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&LayerReportEntry> {
        self.entries.get(index)
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> Option<&mut LayerReportEntry> {
        self.entries.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
