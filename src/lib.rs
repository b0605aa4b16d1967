//! Bookkeeper - personal expense tracking with budgets
//!
//! This library provides the core of the Bookkeeper expense tracker: a small
//! persistence layer over three record types (categories, expenses and
//! budgets), budget recompute against the expense ledger, and the services
//! the command line client is built on.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Record types and the field-descriptor schema they declare
//! - `storage`: Generic repositories with in-memory and SQLite backends
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use bookkeeper::config::{paths::BookkeeperPaths, settings::Settings};
//! use bookkeeper::services::ExpenseService;
//! use bookkeeper::storage::Storage;
//!
//! let paths = BookkeeperPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths, &settings)?;
//! let (expense, status) = ExpenseService::new(&storage).add_expense("250", "books", "")?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BookkeeperError, BookkeeperResult};
