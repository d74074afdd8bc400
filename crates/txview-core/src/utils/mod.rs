//! Display formatting for amounts, dates and table cells.

pub mod format;

pub use format::{format_amount, format_date, truncate_string};
