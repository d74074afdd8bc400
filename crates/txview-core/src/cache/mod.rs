//! Request-level response cache.
//!
//! `RequestCache` memoizes backend responses keyed by endpoint name plus the
//! serialized request parameters. It knows nothing about paging: each page
//! request is its own entry and merging happens in the pagers. Entries never
//! expire; they stay until cleared by their owner.

pub mod request_cache;

pub use request_cache::RequestCache;
