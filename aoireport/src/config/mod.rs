//! Configuration types for the report engine.
//!
//! Configuration is consumed, not produced, by the engine: ordered
//! catalogs of service descriptors for the "selection" and "report"
//! roles, plus numeric report options. Both load from the same JSON
//! document a host application ships.

mod catalog;
mod defaults;
mod file;
mod options;

pub use catalog::{ServiceCatalog, ServiceDescriptor};
pub use defaults::{
    DEFAULT_MAX_EXPORT_FEATURES, DEFAULT_MAX_FIELDS_IN_TABLE,
    DEFAULT_MAX_SAMPLE_FEATURES_PER_LAYER, DEFAULT_PAGE_SIZE, SAMPLE_REQUEST_CEILING,
};
pub use file::{ConfigError, ConfigFile};
pub use options::ReportOptions;
