//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display.

pub mod budget;
pub mod category;
pub mod expense;

pub use budget::{format_budget_table, format_exceeded_warning};
pub use category::{category_names, format_category_tree};
pub use expense::{format_expense_register, format_expense_row};
