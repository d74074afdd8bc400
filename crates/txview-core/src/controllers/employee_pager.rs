use tracing::{debug, info};

use super::TransactionPages;
use crate::api::{ApiResult, Endpoint, RequestByEmployeeParams};
use crate::fetch::{FetchController, LoadingFlag};
use crate::models::Transaction;

/// Page-by-page loader over one employee's transactions.
///
/// `fetch_by_id` switches to an employee and replaces whatever was loaded;
/// `fetch_more` continues the stream of the employee recorded by the last
/// successful `fetch_by_id`.
pub struct EmployeeTransactionPager {
    fetch: FetchController,
    employee_id: Option<String>,
    data: Option<TransactionPages>,
}

impl EmployeeTransactionPager {
    pub fn new(fetch: FetchController) -> Self {
        Self {
            fetch,
            employee_id: None,
            data: None,
        }
    }

    pub fn data(&self) -> Option<&TransactionPages> {
        self.data.as_ref()
    }

    pub fn transactions(&self) -> Option<&[Transaction]> {
        self.data.as_ref().map(|d| d.data.as_slice())
    }

    pub fn employee_id(&self) -> Option<&str> {
        self.employee_id.as_deref()
    }

    pub fn next_page(&self) -> Option<u32> {
        self.data.as_ref().and_then(|d| d.next_page)
    }

    pub fn has_more(&self) -> bool {
        self.next_page().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_loading()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.fetch.loading_flag()
    }

    /// Load the first page for `employee_id`, replacing the current data.
    pub async fn fetch_by_id(&mut self, employee_id: &str) -> ApiResult<()> {
        let page: TransactionPages = self
            .fetch
            .fetch_with_cache(
                Endpoint::TransactionsByEmployee,
                &RequestByEmployeeParams::new(employee_id),
            )
            .await?;

        info!(employee_id, count = page.len(), next_page = ?page.next_page, "Employee transactions loaded");
        self.employee_id = Some(employee_id.to_string());
        self.data = Some(page);
        Ok(())
    }

    /// Append the next page for the current employee.
    ///
    /// Does nothing when nothing is loaded, when the loaded set is empty, or
    /// when the last page has been reached.
    pub async fn fetch_more(&mut self) -> ApiResult<()> {
        let (Some(employee_id), Some(data)) = (self.employee_id.as_deref(), self.data.as_ref()) else {
            debug!("No employee transactions loaded, nothing to extend");
            return Ok(());
        };
        if data.is_empty() {
            debug!(employee_id, "Loaded page is empty, not requesting more");
            return Ok(());
        }
        let Some(next_page) = data.next_page else {
            debug!(employee_id, "Employee transactions exhausted");
            return Ok(());
        };

        let params = RequestByEmployeeParams::new(employee_id).with_page(next_page);
        let page: TransactionPages = self
            .fetch
            .fetch_with_cache(Endpoint::TransactionsByEmployee, &params)
            .await?;

        debug!(page = next_page, count = page.len(), "Employee transactions page loaded");
        match self.data.as_mut() {
            Some(data) => data.append(page),
            None => self.data = Some(page),
        }
        Ok(())
    }

    pub fn invalidate_data(&mut self) {
        self.data = None;
        self.employee_id = None;
    }
}
