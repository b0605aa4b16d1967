//! Core data models for Bookkeeper
//!
//! This module contains the records persisted by the repositories
//! (categories, expenses, budgets), the record capability they share, and
//! the outline parser used for bulk category import.

pub mod budget;
pub mod category;
pub mod expense;
pub mod outline;
pub mod period;
pub mod record;

pub use budget::Budget;
pub use category::Category;
pub use expense::{format_timestamp, parse_amount, parse_timestamp, Expense};
pub use outline::{read_tree, Forest};
pub use period::Period;
pub use record::{FieldDescriptor, FieldValue, Filter, HasIdentity, Pk, Record, Schema, UNSAVED_PK};
