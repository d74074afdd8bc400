use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::api::Endpoint;

#[derive(Debug, Clone)]
struct CacheEntry {
    endpoint: Endpoint,
    response: Value,
}

/// Shared memo of resolved backend responses.
///
/// Constructed explicitly and handed to each fetch controller behind an
/// `Arc`, so every test can start from an empty cache.
#[derive(Debug, Default)]
pub struct RequestCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic key for a request.
    ///
    /// `serde_json` objects keep their fields sorted, so two parameter sets
    /// with the same content always produce the same key.
    pub fn key(endpoint: Endpoint, params: &Value) -> String {
        format!("{}{}", endpoint.name(), params)
    }

    pub fn get(&self, endpoint: Endpoint, params: &Value) -> Option<Value> {
        let key = Self::key(endpoint, params);
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .map(|entry| entry.response.clone())
    }

    pub fn set(&self, endpoint: Endpoint, params: &Value, response: Value) {
        let key = Self::key(endpoint, params);
        debug!(%key, "Caching response");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, CacheEntry { endpoint, response });
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Drop every entry recorded for `endpoint`.
    pub fn clear_endpoint(&self, endpoint: Endpoint) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.endpoint != endpoint);
        debug!(%endpoint, removed = before - entries.len(), "Cleared cache entries");
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
