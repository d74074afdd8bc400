//! REST backend for a remote transactions service.
//!
//! Routes:
//! - `GET {base}/employees`
//! - `GET {base}/transactions?page=N`
//! - `GET {base}/employees/{id}/transactions?page=N`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde_json::Value;
use tracing::debug;

use super::backend::{Backend, Endpoint, PaginatedRequestParams, RequestByEmployeeParams};
use super::{ApiError, ApiResult};

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::BadRequest(format!("Invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BadRequest(format!(
                "Base URL cannot carry a path: {}",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    fn url_with_segments(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::BadRequest(format!("Base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build the request URL for an endpoint and its parameters.
    fn request_url(&self, endpoint: Endpoint, params: Value) -> ApiResult<Url> {
        match endpoint {
            Endpoint::Employees => self.url_with_segments(&["employees"]),
            Endpoint::PaginatedTransactions => {
                let params: PaginatedRequestParams = serde_json::from_value(params)
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                let page = params
                    .page
                    .ok_or_else(|| ApiError::BadRequest("Page cannot be null".to_string()))?;
                let mut url = self.url_with_segments(&["transactions"])?;
                url.query_pairs_mut().append_pair("page", &page.to_string());
                Ok(url)
            }
            Endpoint::TransactionsByEmployee => {
                let params: RequestByEmployeeParams = serde_json::from_value(params)
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                if params.employee_id.is_empty() {
                    return Err(ApiError::BadRequest("Employee id cannot be empty".to_string()));
                }
                let mut url =
                    self.url_with_segments(&["employees", &params.employee_id, "transactions"])?;
                if let Some(page) = params.page {
                    url.query_pairs_mut().append_pair("page", &page.to_string());
                }
                Ok(url)
            }
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch(&self, endpoint: Endpoint, params: Value) -> ApiResult<Value> {
        let url = self.request_url(endpoint, params)?;
        debug!(%endpoint, %url, "GET");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }
}
