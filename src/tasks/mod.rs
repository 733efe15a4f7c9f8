//! Background Tasks Module
//!
//! - TTL Cleanup: sweeps expired entries from the in-process cache engine

mod cleanup;

pub use cleanup::spawn_cleanup_task;
