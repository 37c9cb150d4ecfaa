//! Database layer for actlog
//!
//! This module provides the event store using SQLite with:
//! - Idempotent schema migrations with additive column evolution
//! - Append with time-windowed dedup and bounded retention
//! - Filtered listing and the aggregate queries behind the analytics

pub mod repo;
pub mod schema;

pub use repo::Database;
