//! REST wire documents and the feature-service client.
//!
//! Feature services expose a metadata document per endpoint (`?f=json`)
//! and a `/query` operation that supports spatial filters, count-only
//! responses, and offset pagination. Everything the engine sends is a GET
//! with URL-encoded parameters; everything it receives is JSON.
//!
//! Services report request-level failures inside a 200 response through an
//! error envelope (`{"error": {code, message}}`), so parsing checks for
//! the envelope before the expected document.

use super::http::AsyncHttpClient;
use super::normalize_url;
use super::types::RemoteError;
use crate::geometry::AreaOfInterest;
use crate::tabular::Row;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;

/// Geometry type tag a layer must carry to be selectable as an AOI source.
pub const ESRI_GEOMETRY_POLYGON: &str = "esriGeometryPolygon";

/// Metadata document of a service root: the sublayers it groups.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfo {
    #[serde(default, rename = "serviceDescription")]
    pub service_description: Option<String>,
    #[serde(default)]
    pub layers: Vec<SublayerSummary>,
}

/// One sublayer as listed in a service root's metadata.
///
/// The root document does not reliably carry `geometryType`; callers that
/// need it must fall back to the sublayer's own metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct SublayerSummary {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "geometryType")]
    pub geometry_type: Option<String>,
}

/// Metadata document of a single queryable layer.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "geometryType")]
    pub geometry_type: Option<String>,
}

/// One feature from a query response. Only attributes are ever requested;
/// geometry is suppressed because reporting does not need it.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Row,
}

/// One page of a feature query response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturePage {
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default, rename = "exceededTransferLimit")]
    pub exceeded_transfer_limit: bool,
}

/// The immutable base query for one layer target: the AOI geometry, the
/// intersects predicate, and the full field list.
///
/// Built once when a target is first queried and reused verbatim by the
/// export engine, so pagination never re-derives the spatial filter.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectQuery {
    geometry: AreaOfInterest,
    out_fields: Vec<String>,
}

impl IntersectQuery {
    /// Build the base query for an AOI, requesting all fields.
    pub fn new(geometry: AreaOfInterest) -> Self {
        Self {
            geometry,
            out_fields: vec!["*".to_string()],
        }
    }

    /// Restrict the requested fields.
    pub fn with_out_fields(mut self, out_fields: Vec<String>) -> Self {
        self.out_fields = out_fields;
        self
    }

    /// The AOI geometry this query filters by.
    pub fn geometry(&self) -> &AreaOfInterest {
        &self.geometry
    }

    /// The `outFields` parameter value.
    pub fn out_fields_param(&self) -> String {
        self.out_fields.join(",")
    }
}

/// Trait for the remote operations the report engine consumes.
///
/// Implementors translate these calls into whatever protocol their service
/// speaks; [`RestFeatureService`] is the REST implementation. Tests
/// substitute scripted implementations.
pub trait FeatureService: Send + Sync {
    /// Fetch the metadata document of a service root.
    fn service_info(
        &self,
        root_url: &str,
    ) -> impl Future<Output = Result<ServiceInfo, RemoteError>> + Send;

    /// Fetch the metadata document of a single layer.
    fn layer_info(
        &self,
        layer_url: &str,
    ) -> impl Future<Output = Result<LayerInfo, RemoteError>> + Send;

    /// Count the features of a layer intersecting the query's AOI.
    fn query_count(
        &self,
        layer_url: &str,
        query: &IntersectQuery,
    ) -> impl Future<Output = Result<u64, RemoteError>> + Send;

    /// Fetch one page of intersecting features' attributes.
    ///
    /// A response carrying fewer than `limit` features unambiguously
    /// signals that the result set is exhausted.
    fn query_page(
        &self,
        layer_url: &str,
        query: &IntersectQuery,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = Result<FeaturePage, RemoteError>> + Send;
}

/// REST implementation of [`FeatureService`] over an injected HTTP client.
#[derive(Clone)]
pub struct RestFeatureService<C> {
    client: C,
}

impl<C: AsyncHttpClient> RestFeatureService<C> {
    /// Create a service client over an HTTP transport.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    async fn fetch_document<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let bytes = self.client.get_with_params(url, params).await?;
        parse_document(&bytes, url)
    }

    fn spatial_params(query: &IntersectQuery) -> Vec<(&'static str, String)> {
        vec![
            ("f", "json".to_string()),
            ("geometry", query.geometry().to_service_json()),
            ("geometryType", ESRI_GEOMETRY_POLYGON.to_string()),
            ("inSR", query.geometry().wkid().to_string()),
            ("spatialRel", "esriSpatialRelIntersects".to_string()),
        ]
    }

    fn query_url(layer_url: &str) -> String {
        format!("{}/query", normalize_url(layer_url))
    }
}

impl<C: AsyncHttpClient> FeatureService for RestFeatureService<C> {
    async fn service_info(&self, root_url: &str) -> Result<ServiceInfo, RemoteError> {
        self.fetch_document(normalize_url(root_url), &[("f", "json".to_string())])
            .await
    }

    async fn layer_info(&self, layer_url: &str) -> Result<LayerInfo, RemoteError> {
        self.fetch_document(normalize_url(layer_url), &[("f", "json".to_string())])
            .await
    }

    async fn query_count(
        &self,
        layer_url: &str,
        query: &IntersectQuery,
    ) -> Result<u64, RemoteError> {
        let mut params = Self::spatial_params(query);
        params.push(("returnCountOnly", "true".to_string()));

        let document: CountDocument = self
            .fetch_document(&Self::query_url(layer_url), &params)
            .await?;
        Ok(document.count)
    }

    async fn query_page(
        &self,
        layer_url: &str,
        query: &IntersectQuery,
        offset: u64,
        limit: u64,
    ) -> Result<FeaturePage, RemoteError> {
        let mut params = Self::spatial_params(query);
        params.push(("outFields", query.out_fields_param()));
        params.push(("returnGeometry", "false".to_string()));
        params.push(("resultOffset", offset.to_string()));
        params.push(("resultRecordCount", limit.to_string()));

        self.fetch_document(&Self::query_url(layer_url), &params)
            .await
    }
}

#[derive(Debug, Deserialize)]
struct CountDocument {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

fn parse_document<T: DeserializeOwned>(bytes: &[u8], url: &str) -> Result<T, RemoteError> {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(bytes) {
        return Err(RemoteError::ServiceFault {
            code: envelope.error.code,
            message: envelope.error.message,
        });
    }
    serde_json::from_slice(bytes)
        .map_err(|e| RemoteError::InvalidResponse(format!("{} from {}", e, url)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockHttpClient;

    fn aoi() -> AreaOfInterest {
        AreaOfInterest::new(vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]]], 4326).unwrap()
    }

    fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[tokio::test]
    async fn test_service_info_parses_sublayers() {
        let body = br#"{
            "serviceDescription": "Utilities",
            "layers": [
                {"id": 0, "name": "Mains"},
                {"id": 1, "name": "Valves", "geometryType": "esriGeometryPoint"}
            ]
        }"#;
        let client = MockHttpClient::single(Ok(body.to_vec()));
        let service = RestFeatureService::new(client);

        let info = service
            .service_info("https://host/arcgis/rest/services/U/FeatureServer/")
            .await
            .unwrap();

        assert_eq!(info.service_description.as_deref(), Some("Utilities"));
        assert_eq!(info.layers.len(), 2);
        assert_eq!(info.layers[0].id, 0);
        assert_eq!(info.layers[0].name.as_deref(), Some("Mains"));
        assert_eq!(
            info.layers[1].geometry_type.as_deref(),
            Some("esriGeometryPoint")
        );

        let calls = service.client.calls();
        assert_eq!(calls[0].0, "https://host/arcgis/rest/services/U/FeatureServer");
        assert_eq!(param(&calls[0].1, "f"), Some("json"));
    }

    #[tokio::test]
    async fn test_query_count_builds_spatial_request() {
        let client = MockHttpClient::single(Ok(b"{\"count\": 42}".to_vec()));
        let service = RestFeatureService::new(client);
        let query = IntersectQuery::new(aoi());

        let count = service
            .query_count("https://host/FeatureServer/3", &query)
            .await
            .unwrap();
        assert_eq!(count, 42);

        let calls = service.client.calls();
        assert_eq!(calls[0].0, "https://host/FeatureServer/3/query");
        let params = &calls[0].1;
        assert_eq!(param(params, "returnCountOnly"), Some("true"));
        assert_eq!(param(params, "spatialRel"), Some("esriSpatialRelIntersects"));
        assert_eq!(param(params, "geometryType"), Some(ESRI_GEOMETRY_POLYGON));
        assert_eq!(param(params, "inSR"), Some("4326"));
        assert!(param(params, "geometry").unwrap().contains("\"rings\""));
    }

    #[tokio::test]
    async fn test_query_page_requests_attributes_only() {
        let body = br#"{
            "features": [
                {"attributes": {"OBJECTID": 1, "NAME": "a"}},
                {"attributes": {"OBJECTID": 2, "NAME": null}}
            ],
            "exceededTransferLimit": true
        }"#;
        let client = MockHttpClient::single(Ok(body.to_vec()));
        let service = RestFeatureService::new(client);
        let query = IntersectQuery::new(aoi());

        let page = service
            .query_page("https://host/FeatureServer/3", &query, 200, 100)
            .await
            .unwrap();
        assert_eq!(page.features.len(), 2);
        assert!(page.exceeded_transfer_limit);

        let calls = service.client.calls();
        let params = &calls[0].1;
        assert_eq!(param(params, "returnGeometry"), Some("false"));
        assert_eq!(param(params, "outFields"), Some("*"));
        assert_eq!(param(params, "resultOffset"), Some("200"));
        assert_eq!(param(params, "resultRecordCount"), Some("100"));
    }

    #[tokio::test]
    async fn test_error_envelope_surfaces_as_service_fault() {
        let body = br#"{"error": {"code": 400, "message": "Invalid geometry"}}"#;
        let client = MockHttpClient::single(Ok(body.to_vec()));
        let service = RestFeatureService::new(client);
        let query = IntersectQuery::new(aoi());

        let err = service
            .query_count("https://host/FeatureServer/0", &query)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RemoteError::ServiceFault {
                code: 400,
                message: "Invalid geometry".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let client = MockHttpClient::single(Ok(b"<html>gateway timeout</html>".to_vec()));
        let service = RestFeatureService::new(client);

        let err = service.layer_info("https://host/FeatureServer/0").await;
        assert!(matches!(err, Err(RemoteError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client = MockHttpClient::single(Err(RemoteError::HttpError("down".to_string())));
        let service = RestFeatureService::new(client);

        let err = service
            .service_info("https://host/FeatureServer")
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::HttpError(_)));
    }
}
