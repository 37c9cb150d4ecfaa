//! # actlog-core
//!
//! Core library for actlog - a local activity recorder and analyzer.
//!
//! This library provides:
//! - An append-only event store on SQLite with dedup and bounded retention
//! - Collectors for shell history, processes, logged-in users and open files
//! - Analytics: work sessions, productivity score, patterns, weekly trend, insights
//! - CSV export, configuration and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows in one direction:
//! - **Collectors** snapshot a source and emit [`NewEvent`]s
//! - **Store** ([`Database`]) appends them, dropping repeats inside the
//!   dedup window and evicting the oldest rows past the retention cap
//! - **Analytics** ([`analytics::AnalyticsEngine`]) derive reports on demand;
//!   nothing derived is persisted
//!
//! ## Example
//!
//! ```rust,no_run
//! use actlog_core::{Config, Database, EventType, NewEvent};
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open database
//! let db = Database::open(&Config::database_path())
//!     .expect("failed to open database")
//!     .with_store_config(config.store.clone());
//! db.migrate().expect("failed to run migrations");
//!
//! db.save_event(&NewEvent::new(EventType::BashCommand, "cargo build"));
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod collector;
pub mod config;
pub mod db;
pub mod dedup;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod types;
