//! Scripted feature service used by the engine unit tests.

use crate::geometry::AreaOfInterest;
use crate::remote::{
    normalize_url, Feature, FeaturePage, FeatureService, IntersectQuery, LayerInfo, RemoteError,
    ServiceInfo,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// A [`FeatureService`] whose answers are scripted per URL, recording
/// every call so tests can assert on request sequences.
#[derive(Default)]
pub(crate) struct ScriptedService {
    service_infos: HashMap<String, Result<ServiceInfo, RemoteError>>,
    layer_infos: HashMap<String, Result<LayerInfo, RemoteError>>,
    counts: HashMap<String, Result<u64, RemoteError>>,
    features: HashMap<String, Vec<Feature>>,
    page_errors: HashMap<(String, u64), RemoteError>,
    service_info_log: Mutex<Vec<String>>,
    layer_info_log: Mutex<Vec<String>>,
    page_log: Mutex<Vec<(String, u64, u64)>>,
}

pub(crate) fn test_aoi() -> AreaOfInterest {
    AreaOfInterest::new(vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]]], 4326).unwrap()
}

pub(crate) fn test_query() -> IntersectQuery {
    IntersectQuery::new(test_aoi())
}

/// Build `n` features with an `OBJECTID` attribute `0..n`.
pub(crate) fn numbered_features(n: usize) -> Vec<Feature> {
    (0..n)
        .map(|i| {
            serde_json::from_value(serde_json::json!({"attributes": {"OBJECTID": i}})).unwrap()
        })
        .collect()
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_service_info(mut self, url: &str, json: &str) -> Self {
        let info: ServiceInfo = serde_json::from_str(json).unwrap();
        self.service_infos
            .insert(normalize_url(url).to_string(), Ok(info));
        self
    }

    pub(crate) fn with_service_info_error(mut self, url: &str, error: RemoteError) -> Self {
        self.service_infos
            .insert(normalize_url(url).to_string(), Err(error));
        self
    }

    pub(crate) fn with_layer_info(mut self, url: &str, json: &str) -> Self {
        let info: LayerInfo = serde_json::from_str(json).unwrap();
        self.layer_infos
            .insert(normalize_url(url).to_string(), Ok(info));
        self
    }

    pub(crate) fn with_count(mut self, url: &str, count: u64) -> Self {
        self.counts.insert(normalize_url(url).to_string(), Ok(count));
        self
    }

    pub(crate) fn with_count_error(mut self, url: &str, error: RemoteError) -> Self {
        self.counts
            .insert(normalize_url(url).to_string(), Err(error));
        self
    }

    pub(crate) fn with_features(mut self, url: &str, features: Vec<Feature>) -> Self {
        self.features
            .insert(normalize_url(url).to_string(), features);
        self
    }

    pub(crate) fn with_page_error_at(mut self, url: &str, offset: u64, error: RemoteError) -> Self {
        self.page_errors
            .insert((normalize_url(url).to_string(), offset), error);
        self
    }

    pub(crate) fn service_info_calls(&self) -> usize {
        self.service_info_log.lock().unwrap().len()
    }

    pub(crate) fn layer_info_calls(&self) -> usize {
        self.layer_info_log.lock().unwrap().len()
    }

    /// Every page request issued, as (url, offset, limit).
    pub(crate) fn page_requests(&self) -> Vec<(String, u64, u64)> {
        self.page_log.lock().unwrap().clone()
    }
}

impl FeatureService for ScriptedService {
    async fn service_info(&self, root_url: &str) -> Result<ServiceInfo, RemoteError> {
        let key = normalize_url(root_url).to_string();
        self.service_info_log.lock().unwrap().push(key.clone());
        self.service_infos
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(RemoteError::InvalidResponse("no scripted service".into())))
    }

    async fn layer_info(&self, layer_url: &str) -> Result<LayerInfo, RemoteError> {
        let key = normalize_url(layer_url).to_string();
        self.layer_info_log.lock().unwrap().push(key.clone());
        self.layer_infos
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(RemoteError::InvalidResponse("no scripted layer".into())))
    }

    async fn query_count(
        &self,
        layer_url: &str,
        _query: &IntersectQuery,
    ) -> Result<u64, RemoteError> {
        let key = normalize_url(layer_url).to_string();
        self.counts
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(RemoteError::InvalidResponse("no scripted count".into())))
    }

    async fn query_page(
        &self,
        layer_url: &str,
        _query: &IntersectQuery,
        offset: u64,
        limit: u64,
    ) -> Result<FeaturePage, RemoteError> {
        let key = normalize_url(layer_url).to_string();
        self.page_log.lock().unwrap().push((key.clone(), offset, limit));

        if let Some(error) = self.page_errors.get(&(key.clone(), offset)) {
            return Err(error.clone());
        }

        let all = self
            .features
            .get(&key)
            .ok_or_else(|| RemoteError::InvalidResponse("no scripted features".into()))?;
        let start = (offset as usize).min(all.len());
        let end = (offset as usize).saturating_add(limit as usize).min(all.len());
        Ok(FeaturePage {
            features: all[start..end].to_vec(),
            exceeded_transfer_limit: end < all.len(),
        })
    }
}
