//! Default values for report options.

/// Maximum sample rows fetched per layer for the on-screen preview.
pub const DEFAULT_MAX_SAMPLE_FEATURES_PER_LAYER: u64 = 25;

/// Maximum columns shown in a preview table.
pub const DEFAULT_MAX_FIELDS_IN_TABLE: usize = 8;

/// Features requested per page during a full export.
pub const DEFAULT_PAGE_SIZE: u64 = 1000;

/// Hard cap on features accumulated by one full export.
pub const DEFAULT_MAX_EXPORT_FEATURES: u64 = 50000;

/// Upper bound on a single sample request, regardless of the configured
/// sample cap. Services reject larger record counts.
pub const SAMPLE_REQUEST_CEILING: u64 = 2000;
