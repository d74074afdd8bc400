//! In-memory backend serving a fixed dataset.
//!
//! Paging follows the server rules the views are written against: pages are
//! zero-based, hold `TRANSACTIONS_PER_PAGE` items, and `nextPage` is null on
//! the last page. Every call is recorded so callers can check how many
//! requests actually reached the backend.

use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::backend::{Backend, Endpoint, PaginatedRequestParams, RequestByEmployeeParams};
use super::{ApiError, ApiResult};
use crate::models::{Employee, PaginatedResponse, Transaction};

pub const TRANSACTIONS_PER_PAGE: usize = 5;

/// Dataset bundled with the crate, used when no fixture file is configured.
const BUNDLED_DATASET: &str = include_str!("../../data/fixture.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub employees: Vec<Employee>,
    pub transactions: Vec<Transaction>,
}

impl Dataset {
    pub fn bundled() -> Result<Self> {
        serde_json::from_str(BUNDLED_DATASET).context("Failed to parse bundled dataset")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse fixture file: {}", path.display()))
    }
}

pub struct FixtureBackend {
    dataset: Dataset,
    latency: Option<Duration>,
    calls: Mutex<Vec<Endpoint>>,
    pending_failure: Mutex<Option<ApiError>>,
}

impl FixtureBackend {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            latency: None,
            calls: Mutex::new(Vec::new()),
            pending_failure: Mutex::new(None),
        }
    }

    pub fn bundled() -> Result<Self> {
        Ok(Self::new(Dataset::bundled()?))
    }

    /// Delay every response, the way a slow network would.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Total number of requests that reached this backend.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn calls_for(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|&&e| e == endpoint)
            .count()
    }

    /// Make the next request fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        *self
            .pending_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    fn employees(&self) -> ApiResult<Value> {
        Ok(serde_json::to_value(&self.dataset.employees)?)
    }

    fn paginated_transactions(&self, params: Value) -> ApiResult<Value> {
        let params: PaginatedRequestParams =
            serde_json::from_value(params).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let page = params
            .page
            .ok_or_else(|| ApiError::BadRequest("Page cannot be null".to_string()))?;

        let response = page_of(&self.dataset.transactions, page);
        Ok(serde_json::to_value(&response)?)
    }

    fn transactions_by_employee(&self, params: Value) -> ApiResult<Value> {
        let params: RequestByEmployeeParams =
            serde_json::from_value(params).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        if params.employee_id.is_empty() {
            return Err(ApiError::BadRequest("Employee id cannot be empty".to_string()));
        }

        let owned: Vec<Transaction> = self
            .dataset
            .transactions
            .iter()
            .filter(|t| t.belongs_to(&params.employee_id))
            .cloned()
            .collect();

        let response = page_of(&owned, params.page.unwrap_or(0));
        Ok(serde_json::to_value(&response)?)
    }
}

/// Slice one page out of `items`.
fn page_of(items: &[Transaction], page: u32) -> PaginatedResponse<Vec<Transaction>> {
    let start = (page as usize).saturating_mul(TRANSACTIONS_PER_PAGE);
    let end = start.saturating_add(TRANSACTIONS_PER_PAGE);
    let next_page = if end < items.len() { Some(page + 1) } else { None };
    let data = items.iter().skip(start).take(TRANSACTIONS_PER_PAGE).cloned().collect();
    PaginatedResponse::new(data, next_page)
}

#[async_trait]
impl Backend for FixtureBackend {
    async fn fetch(&self, endpoint: Endpoint, params: Value) -> ApiResult<Value> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(endpoint);
        debug!(%endpoint, %params, "Fixture request");

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self
            .pending_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(error) = failure {
            warn!(%endpoint, error = %error, "Injected fixture failure");
            return Err(error);
        }

        match endpoint {
            Endpoint::Employees => self.employees(),
            Endpoint::PaginatedTransactions => self.paginated_transactions(params),
            Endpoint::TransactionsByEmployee => self.transactions_by_employee(params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> PaginatedResponse<Vec<Transaction>> {
        serde_json::from_value(value).expect("paginated response")
    }

    #[test]
    fn test_bundled_dataset_parses() {
        let dataset = Dataset::bundled().expect("bundled dataset");
        assert_eq!(dataset.employees.len(), 4);
        assert_eq!(dataset.transactions.len(), 17);
        assert!(dataset.employees.iter().all(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn test_paginated_pages_until_exhausted() {
        let backend = FixtureBackend::bundled().unwrap();

        let first = decode(
            backend
                .fetch(Endpoint::PaginatedTransactions, json!({"page": 0}))
                .await
                .unwrap(),
        );
        assert_eq!(first.data.len(), TRANSACTIONS_PER_PAGE);
        assert_eq!(first.data[0].id, "t-0001");
        assert_eq!(first.next_page, Some(1));

        let last = decode(
            backend
                .fetch(Endpoint::PaginatedTransactions, json!({"page": 3}))
                .await
                .unwrap(),
        );
        assert_eq!(last.data.len(), 2);
        assert_eq!(last.data[1].id, "t-0017");
        assert_eq!(last.next_page, None);

        let beyond = decode(
            backend
                .fetch(Endpoint::PaginatedTransactions, json!({"page": 9}))
                .await
                .unwrap(),
        );
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.next_page, None);
        assert_eq!(backend.calls_for(Endpoint::PaginatedTransactions), 3);
    }

    #[tokio::test]
    async fn test_paginated_rejects_null_page() {
        let backend = FixtureBackend::bundled().unwrap();
        let err = backend
            .fetch(Endpoint::PaginatedTransactions, json!({"page": null}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "Page cannot be null"));
    }

    #[tokio::test]
    async fn test_by_employee_filters_and_rejects_empty_id() {
        let backend = FixtureBackend::bundled().unwrap();

        let page = decode(
            backend
                .fetch(Endpoint::TransactionsByEmployee, json!({"employeeId": "e-71c2"}))
                .await
                .unwrap(),
        );
        assert_eq!(page.data.len(), 4);
        assert!(page.data.iter().all(|t| t.belongs_to("e-71c2")));
        assert_eq!(page.next_page, None);

        let err = backend
            .fetch(Endpoint::TransactionsByEmployee, json!({"employeeId": ""}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "Employee id cannot be empty"));
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let backend = FixtureBackend::bundled().unwrap();
        backend.fail_next(ApiError::Unavailable("down".to_string()));

        let err = backend.fetch(Endpoint::Employees, Value::Null).await.unwrap_err();
        assert!(matches!(err, ApiError::Unavailable(_)));

        let employees = backend.fetch(Endpoint::Employees, Value::Null).await.unwrap();
        assert_eq!(employees.as_array().map(Vec::len), Some(4));
        assert_eq!(backend.call_count(), 2);
    }

    #[test]
    fn test_page_of_exact_multiple_has_no_next_page() {
        let dataset = Dataset::bundled().unwrap();
        let ten: Vec<Transaction> = dataset.transactions.into_iter().take(10).collect();
        assert_eq!(page_of(&ten, 0).next_page, Some(1));
        assert_eq!(page_of(&ten, 1).next_page, None);
    }
}
