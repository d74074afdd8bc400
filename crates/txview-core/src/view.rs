//! View state for the transaction browser.
//!
//! `ViewController` sits between a front end and the data controllers. It
//! owns the employee filter, decides which pager is authoritative, and keeps
//! the local approval overrides. Only one pager exists at a time: the query
//! mode owns it, so the all-employees and single-employee results can never
//! both be visible.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{ApiResult, Backend};
use crate::cache::RequestCache;
use crate::controllers::{EmployeeDirectory, EmployeeTransactionPager, TransactionPager};
use crate::fetch::FetchController;
use crate::models::{Employee, Transaction};

/// Which transactions are being browsed, and the pager loading them.
pub enum QueryMode {
    AllEmployees(TransactionPager),
    SingleEmployee(EmployeeTransactionPager),
}

impl QueryMode {
    pub fn transactions(&self) -> Option<&[Transaction]> {
        match self {
            QueryMode::AllEmployees(pager) => pager.transactions(),
            QueryMode::SingleEmployee(pager) => pager.transactions(),
        }
    }

    pub fn is_loading(&self) -> bool {
        match self {
            QueryMode::AllEmployees(pager) => pager.is_loading(),
            QueryMode::SingleEmployee(pager) => pager.is_loading(),
        }
    }

    pub fn has_more(&self) -> bool {
        match self {
            QueryMode::AllEmployees(pager) => pager.has_more(),
            QueryMode::SingleEmployee(pager) => pager.has_more(),
        }
    }

    pub fn is_all_employees(&self) -> bool {
        matches!(self, QueryMode::AllEmployees(_))
    }

    pub fn invalidate_data(&mut self) {
        match self {
            QueryMode::AllEmployees(pager) => pager.invalidate_data(),
            QueryMode::SingleEmployee(pager) => pager.invalidate_data(),
        }
    }

    async fn fetch_more(&mut self) -> ApiResult<()> {
        match self {
            QueryMode::AllEmployees(pager) => pager.fetch_more().await,
            QueryMode::SingleEmployee(pager) => pager.fetch_more().await,
        }
    }
}

pub struct ViewController {
    backend: Arc<dyn Backend>,
    cache: Arc<RequestCache>,
    directory: EmployeeDirectory,
    mode: QueryMode,
    selected_employee: Employee,
    approvals: HashMap<String, bool>,
}

impl ViewController {
    pub fn new(backend: Arc<dyn Backend>, cache: Arc<RequestCache>) -> Self {
        let directory = EmployeeDirectory::new(FetchController::new(backend.clone(), cache.clone()));
        let pager = TransactionPager::new(FetchController::new(backend.clone(), cache.clone()));

        Self {
            backend,
            cache,
            directory,
            mode: QueryMode::AllEmployees(pager),
            selected_employee: Employee::empty(),
            approvals: HashMap::new(),
        }
    }

    fn fetch_controller(&self) -> FetchController {
        FetchController::new(self.backend.clone(), self.cache.clone())
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn selected_employee(&self) -> &Employee {
        &self.selected_employee
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    pub fn employees(&self) -> Option<&[Employee]> {
        self.directory.data()
    }

    /// Items for the employee filter: the "All Employees" entry first, then
    /// every loaded employee. Empty until the directory has loaded.
    pub fn employee_options(&self) -> Vec<Employee> {
        match self.directory.data() {
            Some(employees) => std::iter::once(Employee::empty())
                .chain(employees.iter().cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn mode(&self) -> &QueryMode {
        &self.mode
    }

    pub fn transactions(&self) -> Option<&[Transaction]> {
        self.mode.transactions()
    }

    pub fn is_loading(&self) -> bool {
        self.directory.is_loading() || self.mode.is_loading()
    }

    /// Whether a "View More" control should be offered.
    ///
    /// Only the all-employees listing pages on demand; a filtered listing
    /// never shows it.
    pub fn show_view_more(&self) -> bool {
        match &self.mode {
            QueryMode::AllEmployees(pager) => {
                pager.transactions().is_some_and(|t| !t.is_empty()) && pager.has_more()
            }
            QueryMode::SingleEmployee(_) => false,
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// First load: only runs when the employee list is neither loaded nor
    /// in flight.
    pub async fn initialize(&mut self) -> ApiResult<()> {
        if self.directory.data().is_some() || self.directory.is_loading() {
            debug!("View already initialized");
            return Ok(());
        }
        self.load_all_transactions().await
    }

    /// Switch to the all-employees listing and load the employee list and
    /// the first page of transactions.
    pub async fn load_all_transactions(&mut self) -> ApiResult<()> {
        self.enter_all_employees_mode();

        self.directory.fetch_all().await?;
        if let QueryMode::AllEmployees(pager) = &mut self.mode {
            pager.fetch_all().await?;
        }
        Ok(())
    }

    /// Change the employee filter. `None` and the "All Employees" entry both
    /// clear the filter.
    pub async fn select_employee(&mut self, employee: Option<Employee>) -> ApiResult<()> {
        let employee = employee.unwrap_or_else(Employee::empty);
        info!(employee_id = %employee.id, name = %employee.full_name(), "Employee filter changed");
        self.selected_employee = employee;

        if self.selected_employee.is_empty() {
            return self.load_all_transactions().await;
        }

        self.enter_single_employee_mode();
        let employee_id = self.selected_employee.id.clone();
        if let QueryMode::SingleEmployee(pager) = &mut self.mode {
            pager.fetch_by_id(&employee_id).await?;
        }
        Ok(())
    }

    /// Load the next page of the active listing. Ignored while that listing
    /// is still loading.
    pub async fn load_more(&mut self) -> ApiResult<()> {
        if self.mode.is_loading() {
            debug!("Listing busy, ignoring load more");
            return Ok(());
        }
        self.mode.fetch_more().await
    }

    fn enter_all_employees_mode(&mut self) {
        if !self.mode.is_all_employees() {
            self.mode.invalidate_data();
            self.mode = QueryMode::AllEmployees(TransactionPager::new(self.fetch_controller()));
        }
    }

    fn enter_single_employee_mode(&mut self) {
        if self.mode.is_all_employees() {
            self.mode.invalidate_data();
            self.mode =
                QueryMode::SingleEmployee(EmployeeTransactionPager::new(self.fetch_controller()));
        }
    }

    // =========================================================================
    // Approvals
    // =========================================================================

    /// Record a local approval decision. Never touches the backend.
    pub fn set_approval(&mut self, transaction_id: impl Into<String>, approved: bool) {
        let transaction_id = transaction_id.into();
        debug!(%transaction_id, approved, "Approval toggled");
        self.approvals.insert(transaction_id, approved);
    }

    /// Effective approval state: the local decision if one was made,
    /// otherwise the value the backend sent.
    pub fn approval(&self, transaction: &Transaction) -> bool {
        self.approvals
            .get(&transaction.id)
            .copied()
            .unwrap_or(transaction.approved)
    }

    pub fn approvals(&self) -> &HashMap<String, bool> {
        &self.approvals
    }
}
