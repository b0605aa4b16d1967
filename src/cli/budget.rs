//! Budget CLI commands
//!
//! Budgets are addressed by period. When several budgets share a period
//! the oldest one is changed.

use clap::Subcommand;

use crate::display::{format_budget_table, format_exceeded_warning};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Budget, Period};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show budgets with up-to-date spending
    List,

    /// Set the limit for a period, adding a budget if there is none
    Set {
        /// Period: day, week or month
        period: Period,
        /// Spending limit (whole number)
        limit: String,
    },

    /// Remove the budget for a period
    Remove {
        /// Period: day, week or month
        period: Period,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> BookkeeperResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::List => {
            let status = service.refresh()?;
            print!("{}", format_budget_table(&status.budgets));
        }

        BudgetCommands::Set { period, limit } => {
            let existing = find_for_period(&service, period)?;
            let status = service.modify_budget(existing.map(|b| b.pk), &limit, period.as_str())?;
            println!("Set {} budget to {}", period, limit.trim());
            eprint!("{}", format_exceeded_warning(&status.exceeded()));
        }

        BudgetCommands::Remove { period } => {
            let existing = find_for_period(&service, period)?.ok_or_else(|| {
                BookkeeperError::NotFound {
                    entity_type: "Budget",
                    identifier: period.to_string(),
                }
            })?;
            service.modify_budget(Some(existing.pk), "", period.as_str())?;
            println!("Removed {} budget", period);
        }
    }

    Ok(())
}

fn find_for_period(service: &BudgetService<'_>, period: Period) -> BookkeeperResult<Option<Budget>> {
    Ok(service.list()?.into_iter().find(|b| b.period == period))
}
