//! Service layer for Bookkeeper
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, name normalization, cascades and budget recompute.

pub mod budget;
pub mod category;
pub mod expense;

pub use budget::{BudgetService, BudgetStatus};
pub use category::CategoryService;
pub use expense::{ExpenseField, ExpenseService};
