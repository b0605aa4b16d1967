//! Budget service
//!
//! Recomputes spending for every budget against the expense ledger and
//! handles limit changes entered by the user.

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Budget, Pk};
use crate::storage::Storage;

/// Budgets as of the last recompute
///
/// Returned by every operation that can move spending, so callers can react
/// when a cap has been crossed.
#[derive(Debug, Clone, Default)]
pub struct BudgetStatus {
    pub budgets: Vec<Budget>,
}

impl BudgetStatus {
    /// Budgets whose spending is over their limitation
    pub fn exceeded(&self) -> Vec<&Budget> {
        self.budgets.iter().filter(|b| b.is_exceeded()).collect()
    }

    /// Whether any budget is over its limitation
    pub fn is_exceeded(&self) -> bool {
        self.budgets.iter().any(Budget::is_exceeded)
    }
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All budgets in identity order
    pub fn list(&self) -> BookkeeperResult<Vec<Budget>> {
        self.storage.budgets.get_all(None)
    }

    /// Recompute and persist `spent` for every budget
    pub fn refresh(&self) -> BookkeeperResult<BudgetStatus> {
        let mut budgets = self.storage.budgets.get_all(None)?;
        for budget in &mut budgets {
            budget.update_spent(self.storage.expenses.as_ref())?;
            self.storage.budgets.update(budget)?;
        }

        let status = BudgetStatus { budgets };
        for budget in status.exceeded() {
            tracing::warn!(
                budget = budget.pk,
                period = %budget.period,
                spent = budget.spent,
                limitation = budget.limitation,
                "budget exceeded"
            );
        }

        Ok(status)
    }

    /// Add, change or remove a budget from user input
    ///
    /// - an empty `new_limit` removes the budget `pk` (nothing happens when
    ///   `pk` is `None`)
    /// - otherwise `new_limit` must be a non-negative whole number
    /// - `pk == None` adds a budget for `period`; an existing budget only has
    ///   its limitation changed
    ///
    /// Budgets are recomputed on every path, including rejected input.
    pub fn modify_budget(
        &self,
        pk: Option<Pk>,
        new_limit: &str,
        period: &str,
    ) -> BookkeeperResult<BudgetStatus> {
        let new_limit = new_limit.trim();

        if new_limit.is_empty() {
            if let Some(pk) = pk {
                self.delete_budget(pk)?;
            }
            return self.refresh();
        }

        let limitation = match parse_limitation(new_limit) {
            Ok(limitation) => limitation,
            Err(e) => {
                self.refresh()?;
                return Err(e);
            }
        };

        match pk {
            None => {
                let mut budget = Budget::new(limitation, period)?;
                self.storage.budgets.add(&mut budget)?;
                self.storage.log_create(&budget);
                tracing::info!(budget = budget.pk, period = %budget.period, limitation, "added budget");
            }
            Some(pk) => {
                let before = self
                    .storage
                    .budgets
                    .get(pk)?
                    .ok_or_else(|| BookkeeperError::record_not_found("Budget", pk))?;
                let mut budget = before.clone();
                budget.limitation = limitation;
                self.storage.budgets.update(&budget)?;
                self.storage.log_update(
                    &before,
                    &budget,
                    Some(format!("limit {} -> {}", before.limitation, limitation)),
                );
                tracing::info!(budget = pk, limitation, "changed budget limit");
            }
        }

        self.refresh()
    }

    fn delete_budget(&self, pk: Pk) -> BookkeeperResult<()> {
        let budget = self
            .storage
            .budgets
            .get(pk)?
            .ok_or_else(|| BookkeeperError::record_not_found("Budget", pk))?;
        self.storage.budgets.delete(pk)?;
        self.storage.log_delete(&budget);
        tracing::info!(budget = pk, period = %budget.period, "removed budget");
        Ok(())
    }
}

fn parse_limitation(input: &str) -> BookkeeperResult<i64> {
    let limitation: i64 = input.parse().map_err(|_| {
        BookkeeperError::Validation(format!("Limit must be a whole number, got '{}'", input))
    })?;

    if limitation < 0 {
        return Err(BookkeeperError::Validation(format!(
            "Limit cannot be negative, got {}",
            limitation
        )));
    }

    Ok(limitation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, Period};
    use crate::storage::RepositoryFactory;

    fn create_test_storage() -> Storage {
        Storage::new(&RepositoryFactory::memory())
    }

    #[test]
    fn test_add_budget() {
        let storage = create_test_storage();
        let service = BudgetService::new(&storage);

        let status = service.modify_budget(None, "1000", "day").unwrap();
        assert_eq!(status.budgets.len(), 1);
        assert_eq!(status.budgets[0].limitation, 1000);
        assert_eq!(status.budgets[0].period, Period::Day);
        assert!(!status.is_exceeded());
    }

    #[test]
    fn test_add_budget_invalid_period() {
        let storage = create_test_storage();
        let service = BudgetService::new(&storage);

        let err = service.modify_budget(None, "1000", "year").unwrap_err();
        assert!(err.is_validation());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_change_limit_keeps_period() {
        let storage = create_test_storage();
        let service = BudgetService::new(&storage);

        let status = service.modify_budget(None, "1000", "week").unwrap();
        let pk = status.budgets[0].pk;

        let status = service.modify_budget(Some(pk), "500", "day").unwrap();
        assert_eq!(status.budgets[0].limitation, 500);
        assert_eq!(status.budgets[0].period, Period::Week);
    }

    #[test]
    fn test_empty_limit_removes() {
        let storage = create_test_storage();
        let service = BudgetService::new(&storage);

        let pk = service.modify_budget(None, "1000", "month").unwrap().budgets[0].pk;
        let status = service.modify_budget(Some(pk), "", "month").unwrap();
        assert!(status.budgets.is_empty());

        // Nothing to remove
        let status = service.modify_budget(None, "", "month").unwrap();
        assert!(status.budgets.is_empty());
    }

    #[test]
    fn test_rejects_bad_limits() {
        let storage = create_test_storage();
        let service = BudgetService::new(&storage);

        assert!(service.modify_budget(None, "abc", "day").unwrap_err().is_validation());
        assert!(service.modify_budget(None, "-5", "day").unwrap_err().is_validation());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_change_unknown_budget() {
        let storage = create_test_storage();
        let service = BudgetService::new(&storage);

        let err = service.modify_budget(Some(42), "100", "day").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_refresh_reports_exceeded() {
        let storage = create_test_storage();
        let service = BudgetService::new(&storage);

        service.modify_budget(None, "100", "day").unwrap();
        service.modify_budget(None, "1000", "month").unwrap();

        let mut expense = Expense::new(150, None);
        storage.expenses.add(&mut expense).unwrap();

        let status = service.refresh().unwrap();
        assert!(status.is_exceeded());
        assert_eq!(status.exceeded().len(), 1);
        assert_eq!(status.exceeded()[0].period, Period::Day);

        // Recomputed values are persisted
        let stored = service.list().unwrap();
        assert!(stored.iter().all(|b| b.spent == 150));
    }

    #[test]
    fn test_spent_equal_to_limit_is_not_exceeded() {
        let storage = create_test_storage();
        let service = BudgetService::new(&storage);

        service.modify_budget(None, "150", "day").unwrap();
        let mut expense = Expense::new(150, None);
        storage.expenses.add(&mut expense).unwrap();

        assert!(!service.refresh().unwrap().is_exceeded());
    }
}
