//! Storage initialization
//!
//! Creates the tables for a fresh database and seeds default data. This is
//! bootstrap only: existing tables are left untouched.

use std::path::Path;

use rusqlite::Connection;

use super::Storage;
use crate::config::settings::Settings;
use crate::error::BookkeeperResult;
use crate::models::{read_tree, Budget, Category, Expense, Filter, Period, Record, Schema};

/// Category outline imported into an empty category table
pub const DEFAULT_CATEGORIES: &str = "
groceries
    meat
        raw meat
        meat products
    sweets
books
clothes
";

fn create_table_sql(schema: &Schema) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        schema.table,
        schema.field_names().join(", ")
    )
}

/// Create one table per record type if missing
pub fn initialize_schema(db_file: &Path) -> BookkeeperResult<()> {
    let conn = Connection::open(db_file)?;
    for schema in [Category::schema(), Expense::schema(), Budget::schema()] {
        let sql = create_table_sql(schema);
        tracing::debug!(%sql, "creating table");
        conn.execute_batch(&sql)?;
    }
    Ok(())
}

/// Seed default categories and one budget per period that has none
///
/// Returns the number of records created.
pub fn seed_defaults(storage: &Storage, settings: &Settings) -> BookkeeperResult<usize> {
    let mut created = 0;

    if storage.categories.get_all(None)?.is_empty() {
        let forest = read_tree(DEFAULT_CATEGORIES.lines())?;
        created += Category::create_from_tree(&forest, storage.categories.as_ref())?.len();
    }

    for period in Period::all() {
        let existing = storage
            .budgets
            .get_all(Some(&Filter::new().field("period", period.as_str())))?;
        if existing.is_empty() {
            let mut budget = Budget::for_period(settings.default_budgets.limit_for(*period), *period);
            budget.update_spent(storage.expenses.as_ref())?;
            storage.budgets.add(&mut budget)?;
            created += 1;
        }
    }

    tracing::info!(created, "seeded default data");
    Ok(created)
}
