//! Backend access for txview.
//!
//! The fetch controllers only see the `Backend` trait: an async
//! `fetch(endpoint, params) -> response` call over JSON values. Two
//! implementations ship with the crate:
//!
//! - `FixtureBackend`: an in-memory dataset with server-side paging rules
//!   and optional simulated latency
//! - `HttpBackend`: a REST client talking to a remote transactions service

pub mod backend;
pub mod client;
pub mod error;
pub mod fixture;

pub use backend::{Backend, Endpoint, PaginatedRequestParams, RequestByEmployeeParams};
pub use client::HttpBackend;
pub use error::{ApiError, ApiResult};
pub use fixture::{Dataset, FixtureBackend, TRANSACTIONS_PER_PAGE};
