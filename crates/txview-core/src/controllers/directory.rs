use tracing::info;

use crate::api::{ApiResult, Endpoint};
use crate::fetch::{FetchController, LoadingFlag};
use crate::models::Employee;

/// The full employee list, loaded in one request.
pub struct EmployeeDirectory {
    fetch: FetchController,
    data: Option<Vec<Employee>>,
}

impl EmployeeDirectory {
    pub fn new(fetch: FetchController) -> Self {
        Self { fetch, data: None }
    }

    pub fn data(&self) -> Option<&[Employee]> {
        self.data.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_loading()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.fetch.loading_flag()
    }

    pub fn find(&self, employee_id: &str) -> Option<&Employee> {
        self.data()?.iter().find(|e| e.id == employee_id)
    }

    pub async fn fetch_all(&mut self) -> ApiResult<()> {
        let employees: Vec<Employee> = self.fetch.fetch_with_cache(Endpoint::Employees, &()).await?;
        info!(count = employees.len(), "Employees loaded");
        self.data = Some(employees);
        Ok(())
    }

    /// Forget the list and its cached response.
    pub fn invalidate_data(&mut self) {
        self.data = None;
        self.fetch.clear_cache_by_endpoint(&[Endpoint::Employees]);
    }
}
