//! Data models shared by the backend, the fetch controllers and the view.
//!
//! - `Employee`: a spender, plus the "All Employees" placeholder used by the
//!   employee filter
//! - `Transaction`: a single card transaction
//! - `PaginatedResponse`: one page of results and the cursor to the next page

pub mod employee;
pub mod paginated;
pub mod transaction;

pub use employee::{Employee, EMPTY_EMPLOYEE_ID};
pub use paginated::PaginatedResponse;
pub use transaction::Transaction;
