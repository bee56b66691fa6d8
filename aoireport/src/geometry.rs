//! Area-of-interest geometry.
//!
//! The engine only ever queries with a single polygon: the area of interest
//! the user selected or drew. The polygon is carried as ordered rings of
//! coordinate pairs plus a spatial reference, and serializes to the JSON
//! geometry object the remote services consume.

use serde::Serialize;
use thiserror::Error;

/// Errors produced when constructing an [`AreaOfInterest`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// The polygon has no rings at all
    #[error("polygon must have at least one ring")]
    EmptyPolygon,

    /// A ring has fewer vertices than a polygon ring can have
    #[error("ring {index} has {len} vertices; a polygon ring needs at least 3")]
    DegenerateRing { index: usize, len: usize },
}

/// Spatial reference of a geometry, identified by well-known ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

/// A polygon area of interest.
///
/// Exactly one AOI is active per report run; the engine receives it by
/// reference on every invocation and holds no AOI state of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaOfInterest {
    rings: Vec<Vec<[f64; 2]>>,
    spatial_reference: SpatialReference,
}

impl AreaOfInterest {
    /// Create a polygon AOI from ordered rings and a spatial reference WKID.
    ///
    /// # Errors
    ///
    /// Returns an error if the ring set is empty or any ring has fewer than
    /// 3 vertices.
    pub fn new(rings: Vec<Vec<[f64; 2]>>, wkid: u32) -> Result<Self, GeometryError> {
        if rings.is_empty() {
            return Err(GeometryError::EmptyPolygon);
        }
        for (index, ring) in rings.iter().enumerate() {
            if ring.len() < 3 {
                return Err(GeometryError::DegenerateRing {
                    index,
                    len: ring.len(),
                });
            }
        }
        Ok(Self {
            rings,
            spatial_reference: SpatialReference { wkid },
        })
    }

    /// The polygon rings.
    pub fn rings(&self) -> &[Vec<[f64; 2]>] {
        &self.rings
    }

    /// The spatial reference WKID.
    pub fn wkid(&self) -> u32 {
        self.spatial_reference.wkid
    }

    /// Render the geometry as the JSON object remote services expect:
    /// `{"rings": [...], "spatialReference": {"wkid": N}}`.
    pub fn to_service_json(&self) -> String {
        // A polygon of plain numbers always serializes.
        serde_json::to_string(self).expect("polygon geometry serializes to JSON")
    }
}
