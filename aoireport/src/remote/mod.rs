//! Remote feature-service access.
//!
//! This module provides the transport abstraction and the REST-shaped
//! client the report engine consumes. Every operation the engine needs
//! from a remote service is behind the [`FeatureService`] trait:
//!
//! - metadata for a service root (sublayer enumeration)
//! - metadata for a single layer (geometry type)
//! - a spatial intersect count query
//! - a paged, attributes-only intersect feature query
//!
//! The HTTP transport is likewise behind [`AsyncHttpClient`] so every
//! network-touching component can be tested against a mock client.

mod http;
mod rest;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use rest::{
    Feature, FeaturePage, FeatureService, IntersectQuery, LayerInfo, RestFeatureService,
    ServiceInfo, SublayerSummary, ESRI_GEOMETRY_POLYGON,
};
pub use types::RemoteError;

#[cfg(test)]
pub(crate) use http::tests::MockHttpClient;

/// Normalize a service or layer URL for identity comparison.
///
/// Two catalog entries reaching the same physical layer through URLs that
/// differ only by trailing slashes must be treated as one target.
pub fn normalize_url(url: &str) -> &str {
    url.trim_end_matches('/')
}
