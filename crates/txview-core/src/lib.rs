//! Core library for txview.
//!
//! Browse transactions across all employees or for a single employee, page
//! by page, with local approval toggles. The pieces, leaf to root:
//!
//! - `cache::RequestCache`: memo of backend responses keyed by request
//! - `fetch::FetchController`: cache-aware backend calls with a loading flag
//! - `controllers`: the employee directory and the two transaction pagers
//! - `view::ViewController`: filter selection, query mode and approvals
//!
//! Backends implement `api::Backend`; `config::Config` picks one.

pub mod api;
pub mod cache;
pub mod config;
pub mod controllers;
pub mod fetch;
pub mod models;
pub mod utils;
pub mod view;

pub use api::{ApiError, ApiResult, Backend, Endpoint};
pub use cache::RequestCache;
pub use config::Config;
pub use controllers::{EmployeeDirectory, EmployeeTransactionPager, TransactionPager};
pub use fetch::{FetchController, LoadingFlag};
pub use models::{Employee, PaginatedResponse, Transaction};
pub use view::{QueryMode, ViewController};
