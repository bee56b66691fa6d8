//! AOIReport - intersect reporting over remotely hosted feature services
//!
//! This library resolves a configured catalog of feature-service targets into
//! concrete queryable layers, runs spatial intersect queries against each one
//! for a caller-supplied area of interest, and aggregates the results into a
//! report that can be exported as CSV.
//!
//! # High-Level API
//!
//! Most callers only need a [`report::ReportSession`] wired to a remote
//! service implementation:
//!
//! ```ignore
//! use aoireport::config::{ConfigFile, ReportOptions};
//! use aoireport::geometry::AreaOfInterest;
//! use aoireport::remote::{AsyncReqwestClient, RestFeatureService};
//! use aoireport::report::ReportSession;
//!
//! let (catalog, options) = ConfigFile::from_path("config.json")?.into_parts();
//! let service = RestFeatureService::new(AsyncReqwestClient::new()?);
//! let mut session = ReportSession::new(service, options);
//!
//! let aoi = AreaOfInterest::new(rings, 4326)?;
//! let run = session.run(&aoi, &catalog).await;
//! let combined = session.export_all_csv().await?;
//! ```
//!
//! Targets are processed strictly sequentially and every per-target failure
//! is isolated into an error entry, so one unreachable service never aborts
//! a whole report run.

pub mod config;
pub mod geometry;
pub mod logging;
pub mod remote;
pub mod report;
pub mod tabular;

/// Version of the AOIReport library.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
