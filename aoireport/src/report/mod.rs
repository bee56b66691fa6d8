//! The intersect report engine.
//!
//! The pipeline, in processing order:
//!
//! 1. [`ExpansionResolver`] turns catalog descriptors into concrete
//!    queryable layer targets, expanding service roots through their
//!    metadata.
//! 2. [`IntersectQueryEngine`] runs the count and bounded sample queries
//!    for one target, isolating per-target failures.
//! 3. [`ReportSession`] drives both over a whole catalog, strictly
//!    sequentially, accumulating one [`LayerReportEntry`] per target.
//! 4. On demand, [`PaginatedExportEngine`] pages through a target's full
//!    result set, memoized on the entry, for CSV export.
//!
//! Failures never cross an entry boundary: a dead service produces a
//! tombstone entry and the run continues.

mod entry;
mod error;
mod expand;
mod export;
mod query;
mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use entry::{
    EntryFailure, EntryOutcome, FailureStage, LayerReportEntry, QueriedLayer, ReportRun,
};
pub use error::{ExpansionError, ExportError, QueryError};
pub use expand::{is_service_root, ExpansionResolver, QueryableLayerTarget, TargetResolution};
pub use export::PaginatedExportEngine;
pub use query::IntersectQueryEngine;
pub use session::{
    CsvDocument, ExportProvenance, LayerExport, ReportSession, RunProgress,
    COMBINED_EXPORT_FILENAME,
};
