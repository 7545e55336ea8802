//! Dublin Bikes - An in-memory bike-share station catalogue
//!
//! Provides a concurrent station store with filtering, search, sorting and
//! paging, a TTL cache in front of its reads, and a background task that
//! simulates a live availability feed.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod stations;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, StationError};
pub use tasks::{spawn_cleanup_task, spawn_simulator};
