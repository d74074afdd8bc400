use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiResult;

/// The logical operations the transaction views depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Employees,
    PaginatedTransactions,
    TransactionsByEmployee,
}

impl Endpoint {
    /// Stable name, used as the prefix of request cache keys.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Employees => "employees",
            Endpoint::PaginatedTransactions => "paginatedTransactions",
            Endpoint::TransactionsByEmployee => "transactionsByEmployee",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedRequestParams {
    pub page: Option<u32>,
}

impl PaginatedRequestParams {
    pub fn page(page: u32) -> Self {
        Self { page: Some(page) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestByEmployeeParams {
    pub employee_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl RequestByEmployeeParams {
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            page: None,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// A source of transaction data.
///
/// Implementations receive request parameters and return the response as
/// raw JSON so that responses can be memoized by the request cache before
/// being decoded into typed models.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch(&self, endpoint: Endpoint, params: Value) -> ApiResult<Value>;
}
