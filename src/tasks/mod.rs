//! Background Tasks Module
//!
//! # Tasks
//! - TTL Purge: Removes expired cached results at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
