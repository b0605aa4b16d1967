//! Expense CLI commands
//!
//! Implements CLI commands for recording and editing expenses.

use clap::Subcommand;

use crate::display::{category_names, format_exceeded_warning, format_expense_register};
use crate::error::BookkeeperResult;
use crate::models::Pk;
use crate::services::{BudgetStatus, CategoryService, ExpenseField, ExpenseService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// List expenses
    List {
        /// Only show the most recent N expenses
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Record an expense dated now
    Add {
        /// Amount spent (whole number)
        amount: String,
        /// Category name
        category: String,
        /// Comment
        #[arg(short, long, default_value = "")]
        comment: String,
    },

    /// Change one field of an expense
    Edit {
        /// Expense ID
        id: Pk,
        /// Field to change: amount, category, date or comment
        field: ExpenseField,
        /// New value
        value: String,
    },

    /// Delete expenses
    Delete {
        /// Expense IDs
        #[arg(required = true)]
        ids: Vec<Pk>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(storage: &Storage, cmd: ExpenseCommands) -> BookkeeperResult<()> {
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::List { limit } => {
            let mut expenses = service.list()?;
            if let Some(limit) = limit {
                let start = expenses.len().saturating_sub(limit);
                expenses.drain(..start);
            }
            let names = category_names(&CategoryService::new(storage).list()?);
            print!("{}", format_expense_register(&expenses, &names));
        }

        ExpenseCommands::Add {
            amount,
            category,
            comment,
        } => {
            let (expense, status) = service.add_expense(&amount, &category, &comment)?;
            println!("Added expense #{}: {}", expense.pk, expense);
            warn_exceeded(&status);
        }

        ExpenseCommands::Edit { id, field, value } => {
            let (expense, status) = service.modify_expense(id, field, &value)?;
            println!("Updated expense #{}: {}", expense.pk, expense);
            warn_exceeded(&status);
        }

        ExpenseCommands::Delete { ids } => {
            let status = service.delete_expenses(&ids)?;
            println!("Deleted {} expense(s)", ids.len());
            warn_exceeded(&status);
        }
    }

    Ok(())
}

fn warn_exceeded(status: &BudgetStatus) {
    eprint!("{}", format_exceeded_warning(&status.exceeded()));
}
