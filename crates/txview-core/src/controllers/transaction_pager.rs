use tracing::{debug, info};

use super::TransactionPages;
use crate::api::{ApiResult, Endpoint, PaginatedRequestParams};
use crate::fetch::{FetchController, LoadingFlag};
use crate::models::Transaction;

/// Page-by-page loader over the transactions of every employee.
///
/// `data` is `None` until the first page arrives. Later pages are appended
/// in fetch order; the cursor always comes from the most recent page.
pub struct TransactionPager {
    fetch: FetchController,
    data: Option<TransactionPages>,
}

impl TransactionPager {
    pub fn new(fetch: FetchController) -> Self {
        Self { fetch, data: None }
    }

    pub fn data(&self) -> Option<&TransactionPages> {
        self.data.as_ref()
    }

    pub fn transactions(&self) -> Option<&[Transaction]> {
        self.data.as_ref().map(|d| d.data.as_slice())
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

    /// Load the first page, replacing anything accumulated so far.
    pub async fn fetch_all(&mut self) -> ApiResult<()> {
        let page = self.fetch_page(0).await?;
        info!(count = page.len(), next_page = ?page.next_page, "First transactions page loaded");
        self.data = Some(page);
        Ok(())
    }

    /// Append the next page. Does nothing before the first page or after
    /// the last one.
    pub async fn fetch_more(&mut self) -> ApiResult<()> {
        let Some(next_page) = self.next_page() else {
            debug!(loaded = self.data.is_some(), "No further transactions page to load");
            return Ok(());
        };

        let page = self.fetch_page(next_page).await?;
        debug!(page = next_page, count = page.len(), "Transactions page loaded");
        match self.data.as_mut() {
            Some(data) => data.append(page),
            None => self.data = Some(page),
        }
        Ok(())
    }

    pub fn invalidate_data(&mut self) {
        self.data = None;
    }

    async fn fetch_page(&self, page: u32) -> ApiResult<TransactionPages> {
        self.fetch
            .fetch_with_cache(Endpoint::PaginatedTransactions, &PaginatedRequestParams::page(page))
            .await
    }
}
