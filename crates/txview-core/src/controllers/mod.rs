//! Stateful data controllers consumed by the view.
//!
//! Each controller exposes the same surface: its current `data` (`None`
//! until loaded), an `is_loading` flag, a fetch operation and
//! `invalidate_data`. Pagers additionally merge successive pages into one
//! growing result.

pub mod directory;
pub mod employee_pager;
pub mod transaction_pager;

pub use directory::EmployeeDirectory;
pub use employee_pager::EmployeeTransactionPager;
pub use transaction_pager::TransactionPager;

use crate::models::{PaginatedResponse, Transaction};

/// Accumulated pages of transactions.
pub type TransactionPages = PaginatedResponse<Vec<Transaction>>;
