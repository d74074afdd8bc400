use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiError, ApiResult, Backend, Endpoint};
use crate::cache::RequestCache;

/// Observer for a controller's in-flight state.
///
/// Cloning shares the underlying counter, so a front end can hold one while
/// the controller is busy awaiting the backend.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicUsize>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }

    fn start(&self) -> LoadingGuard<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(self)
    }
}

/// Clears the flag when the call finishes, fails or is dropped.
struct LoadingGuard<'a>(&'a LoadingFlag);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0 .0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Wraps backend calls for one data controller.
///
/// Each controller owns its own `FetchController` (and so its own loading
/// flag) while all of them share a single `RequestCache`.
pub struct FetchController {
    backend: Arc<dyn Backend>,
    cache: Arc<RequestCache>,
    loading: LoadingFlag,
}

impl FetchController {
    pub fn new(backend: Arc<dyn Backend>, cache: Arc<RequestCache>) -> Self {
        Self {
            backend,
            cache,
            loading: LoadingFlag::default(),
        }
    }

    /// A new controller over the same backend and cache, with its own flag.
    pub fn sibling(&self) -> Self {
        Self::new(Arc::clone(&self.backend), Arc::clone(&self.cache))
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub fn cache(&self) -> &Arc<RequestCache> {
        &self.cache
    }

    /// Serve from the cache when this exact request already resolved,
    /// otherwise call the backend and remember the response.
    pub async fn fetch_with_cache<T, P>(&self, endpoint: Endpoint, params: &P) -> ApiResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let params = encode_params(params)?;

        if let Some(cached) = self.cache.get(endpoint, &params) {
            debug!(%endpoint, %params, "Cache hit");
            return Ok(serde_json::from_value(cached)?);
        }

        let response = self.call(endpoint, params.clone()).await?;
        let decoded = serde_json::from_value(response.clone())?;
        self.cache.set(endpoint, &params, response);
        Ok(decoded)
    }

    /// Always call the backend; neither reads nor writes the cache.
    pub async fn fetch_without_cache<T, P>(&self, endpoint: Endpoint, params: &P) -> ApiResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let params = encode_params(params)?;
        let response = self.call(endpoint, params).await?;
        Ok(serde_json::from_value(response)?)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn clear_cache_by_endpoint(&self, endpoints: &[Endpoint]) {
        for &endpoint in endpoints {
            self.cache.clear_endpoint(endpoint);
        }
    }

    async fn call(&self, endpoint: Endpoint, params: Value) -> ApiResult<Value> {
        let _guard = self.loading.start();
        debug!(%endpoint, %params, "Backend request");

        self.backend.fetch(endpoint, params).await.map_err(|e| {
            warn!(%endpoint, error = %e, "Backend request failed");
            e
        })
    }
}

fn encode_params<P: Serialize + ?Sized>(params: &P) -> ApiResult<Value> {
    serde_json::to_value(params)
        .map_err(|e| ApiError::BadRequest(format!("Failed to encode request params: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FixtureBackend, PaginatedRequestParams};
    use crate::models::{Employee, PaginatedResponse, Transaction};
    use std::time::Duration;

    fn setup() -> (Arc<FixtureBackend>, FetchController) {
        let backend = Arc::new(FixtureBackend::bundled().unwrap());
        let controller = FetchController::new(backend.clone(), Arc::new(RequestCache::new()));
        (backend, controller)
    }

    #[tokio::test]
    async fn test_second_identical_request_is_served_from_cache() {
        let (backend, controller) = setup();

        let first: Vec<Employee> = controller.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();
        let second: Vec<Employee> = controller.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_different_params_miss_the_cache() {
        let (backend, controller) = setup();

        let _: PaginatedResponse<Vec<Transaction>> = controller
            .fetch_with_cache(Endpoint::PaginatedTransactions, &PaginatedRequestParams::page(0))
            .await
            .unwrap();
        let _: PaginatedResponse<Vec<Transaction>> = controller
            .fetch_with_cache(Endpoint::PaginatedTransactions, &PaginatedRequestParams::page(1))
            .await
            .unwrap();

        assert_eq!(backend.call_count(), 2);
        assert_eq!(controller.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_cache_is_shared_between_siblings() {
        let (backend, controller) = setup();
        let sibling = controller.sibling();

        let _: Vec<Employee> = controller.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();
        let _: Vec<Employee> = sibling.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();

        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_without_cache_always_calls_backend() {
        let (backend, controller) = setup();

        let _: Vec<Employee> = controller.fetch_without_cache(Endpoint::Employees, &()).await.unwrap();
        let _: Vec<Employee> = controller.fetch_without_cache(Endpoint::Employees, &()).await.unwrap();

        assert_eq!(backend.call_count(), 2);
        assert!(controller.cache().is_empty());
    }

    #[tokio::test]
    async fn test_failure_propagates_and_is_not_cached() {
        let (backend, controller) = setup();
        backend.fail_next(ApiError::ServerError("boom".to_string()));

        let err = controller
            .fetch_with_cache::<Vec<Employee>, _>(Endpoint::Employees, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ServerError(msg) if msg == "boom"));
        assert!(!controller.is_loading());
        assert!(controller.cache().is_empty());

        let employees: Vec<Employee> = controller.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();
        assert_eq!(employees.len(), 4);
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_undecodable_response_is_not_cached() {
        let (backend, controller) = setup();

        let err = controller
            .fetch_with_cache::<Vec<Transaction>, _>(Endpoint::Employees, &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert!(controller.cache().is_empty());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_by_endpoint_forces_refetch() {
        let (backend, controller) = setup();

        let _: Vec<Employee> = controller.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();
        controller.clear_cache_by_endpoint(&[Endpoint::Employees]);
        let _: Vec<Employee> = controller.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();
        assert_eq!(backend.call_count(), 2);

        controller.clear_cache();
        assert!(controller.cache().is_empty());
    }

    #[tokio::test]
    async fn test_loading_is_set_only_while_in_flight() {
        let backend = Arc::new(FixtureBackend::bundled().unwrap().with_latency(Duration::from_millis(20)));
        let controller = FetchController::new(backend.clone(), Arc::new(RequestCache::new()));
        let flag = controller.loading_flag();
        assert!(!flag.is_loading());

        let request = controller.fetch_with_cache::<Vec<Employee>, _>(Endpoint::Employees, &());
        let observe = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            flag.is_loading()
        };
        let (result, seen_loading) = futures::join!(request, observe);

        assert!(result.is_ok());
        assert!(seen_loading);
        assert!(!controller.is_loading());

        // A cache hit never touches the flag or the backend.
        let _: Vec<Employee> = controller.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();
        assert!(!controller.is_loading());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_identical_requests_both_reach_backend() {
        let backend = Arc::new(FixtureBackend::bundled().unwrap().with_latency(Duration::from_millis(10)));
        let cache = Arc::new(RequestCache::new());
        let a = FetchController::new(backend.clone(), cache.clone());
        let b = FetchController::new(backend.clone(), cache.clone());

        let (first, second) = futures::join!(
            a.fetch_with_cache::<Vec<Employee>, _>(Endpoint::Employees, &()),
            b.fetch_with_cache::<Vec<Employee>, _>(Endpoint::Employees, &()),
        );

        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(backend.call_count(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_request_clears_loading() {
        let backend = Arc::new(FixtureBackend::bundled().unwrap().with_latency(Duration::from_millis(50)));
        let controller = FetchController::new(backend, Arc::new(RequestCache::new()));

        let timed_out = tokio::time::timeout(
            Duration::from_millis(5),
            controller.fetch_with_cache::<Vec<Employee>, _>(Endpoint::Employees, &()),
        )
        .await;

        assert!(timed_out.is_err());
        assert!(!controller.is_loading());
    }
}
