//! Background Tasks Module
//!
//! # Tasks
//! - Cache purge: eagerly removes stale read-cache entries at a fixed interval

mod purge;

pub use purge::spawn_purge_task;
