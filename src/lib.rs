//! Property Catalog - listing service with a cache-aside read/write layer
//!
//! Reads go through a cache (in-process or Redis) and fall back to the
//! backing store; writes commit to the store and then invalidate the keys
//! they made stale.

pub mod api;
pub mod auth;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use catalog::PropertyCatalog;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
