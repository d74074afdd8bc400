//! Cache-aware backend calls with an observable loading flag.

pub mod controller;

pub use controller::{FetchController, LoadingFlag};
