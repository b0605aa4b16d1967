//! Expense service
//!
//! Records, edits and removes expenses. Every mutation recomputes the
//! budgets and hands the result back so the caller can warn about caps
//! that were crossed.

use std::fmt;
use std::str::FromStr;

use super::budget::{BudgetService, BudgetStatus};
use super::category::CategoryService;
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{parse_amount, parse_timestamp, Expense, Pk};
use crate::storage::Storage;

/// An editable expense field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Amount,
    Category,
    Date,
    Comment,
}

impl ExpenseField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Date => "date",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for ExpenseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseField {
    type Err = BookkeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            "date" | "expense_date" => Ok(Self::Date),
            "comment" => Ok(Self::Comment),
            other => Err(BookkeeperError::Validation(format!(
                "Unknown expense field '{}'. Use amount, category, date or comment",
                other
            ))),
        }
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All expenses in identity order
    pub fn list(&self) -> BookkeeperResult<Vec<Expense>> {
        self.storage.expenses.get_all(None)
    }

    /// Record an expense dated now
    ///
    /// Input is fully validated before anything is written.
    pub fn add_expense(
        &self,
        amount: &str,
        category: &str,
        comment: &str,
    ) -> BookkeeperResult<(Expense, BudgetStatus)> {
        let amount = parse_amount(amount)?;
        let category = CategoryService::new(self.storage).check_category(category)?;

        let mut expense = Expense::new(amount, Some(category.pk)).with_comment(comment);
        self.storage.expenses.add(&mut expense)?;
        self.storage.log_create(&expense);
        tracing::info!(expense = expense.pk, amount, category = %category.name, "added expense");

        let status = self.budgets().refresh()?;
        Ok((expense, status))
    }

    /// Change one field of an expense from user input
    pub fn modify_expense(
        &self,
        pk: Pk,
        field: ExpenseField,
        raw: &str,
    ) -> BookkeeperResult<(Expense, BudgetStatus)> {
        let before = self
            .storage
            .expenses
            .get(pk)?
            .ok_or_else(|| BookkeeperError::record_not_found("Expense", pk))?;

        let mut expense = before.clone();
        match field {
            ExpenseField::Amount => expense.amount = parse_amount(raw)?,
            ExpenseField::Category => {
                let category = CategoryService::new(self.storage).check_category(raw)?;
                expense.category = Some(category.pk);
            }
            ExpenseField::Date => expense.expense_date = parse_timestamp(raw)?,
            ExpenseField::Comment => expense.comment = raw.to_string(),
        }

        self.storage.expenses.update(&expense)?;
        self.storage
            .log_update(&before, &expense, Some(format!("{} changed", field)));
        tracing::info!(expense = pk, %field, "modified expense");

        let status = self.budgets().refresh()?;
        Ok((expense, status))
    }

    /// Delete expenses by identity
    ///
    /// Stops at the first identity that does not exist; earlier deletions
    /// stay applied.
    pub fn delete_expenses(&self, pks: &[Pk]) -> BookkeeperResult<BudgetStatus> {
        for &pk in pks {
            let expense = self
                .storage
                .expenses
                .get(pk)?
                .ok_or_else(|| BookkeeperError::record_not_found("Expense", pk))?;
            self.storage.expenses.delete(pk)?;
            self.storage.log_delete(&expense);
            tracing::info!(expense = pk, "deleted expense");
        }

        self.budgets().refresh()
    }

    fn budgets(&self) -> BudgetService<'a> {
        BudgetService::new(self.storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLogger;
    use crate::models::{Budget, Period};
    use crate::storage::RepositoryFactory;

    fn create_test_storage() -> Storage {
        let storage = Storage::new(&RepositoryFactory::memory());
        CategoryService::new(&storage).add_category("books", None).unwrap();
        CategoryService::new(&storage).add_category("meat", None).unwrap();
        storage
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("amount".parse::<ExpenseField>().unwrap(), ExpenseField::Amount);
        assert_eq!("Category".parse::<ExpenseField>().unwrap(), ExpenseField::Category);
        assert_eq!("expense_date".parse::<ExpenseField>().unwrap(), ExpenseField::Date);
        assert_eq!("date".parse::<ExpenseField>().unwrap(), ExpenseField::Date);
        assert_eq!("comment".parse::<ExpenseField>().unwrap(), ExpenseField::Comment);
        assert!("pk".parse::<ExpenseField>().unwrap_err().is_validation());
    }

    #[test]
    fn test_add_expense() {
        let storage = create_test_storage();
        let service = ExpenseService::new(&storage);

        let (expense, status) = service.add_expense("250", "Books", "novel").unwrap();
        assert_eq!(expense.amount, 250);
        assert_eq!(expense.comment, "novel");
        assert_eq!(
            storage.categories.get(expense.category.unwrap()).unwrap().unwrap().name,
            "books"
        );
        assert!(!status.is_exceeded());
        assert_eq!(service.list().unwrap(), vec![expense]);
    }

    #[test]
    fn test_add_expense_survives_audit_failure() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let storage = create_test_storage()
            .with_audit(AuditLogger::new(temp_dir.path().to_path_buf()));
        let mut budget = Budget::for_period(100, Period::Day);
        storage.budgets.add(&mut budget).unwrap();
        let service = ExpenseService::new(&storage);

        let (expense, status) = service.add_expense("150", "books", "").unwrap();
        assert!(status.is_exceeded());
        assert!(storage.expenses.get(expense.pk).unwrap().is_some());
        assert_eq!(storage.budgets.get(budget.pk).unwrap().unwrap().spent, 150);
    }

    #[test]
    fn test_add_expense_rejects_bad_input() {
        let storage = create_test_storage();
        let service = ExpenseService::new(&storage);

        assert!(service.add_expense("12.5", "books", "").unwrap_err().is_validation());
        assert!(service.add_expense("0", "books", "").unwrap_err().is_validation());
        assert!(service.add_expense("-3", "books", "").unwrap_err().is_validation());
        assert!(service.add_expense("100", "cars", "").unwrap_err().is_validation());
        assert!(service
            .add_expense(&i64::MAX.to_string(), "books", "")
            .unwrap_err()
            .is_validation());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_add_expense_signals_exceeded_budget() {
        let storage = create_test_storage();
        let mut budget = Budget::for_period(100, Period::Day);
        storage.budgets.add(&mut budget).unwrap();
        let service = ExpenseService::new(&storage);

        let (_, status) = service.add_expense("100", "books", "").unwrap();
        assert!(!status.is_exceeded());

        // The mutation is kept even though the cap is crossed
        let (expense, status) = service.add_expense("1", "books", "").unwrap();
        assert!(status.is_exceeded());
        assert!(storage.expenses.get(expense.pk).unwrap().is_some());
        assert_eq!(storage.budgets.get(budget.pk).unwrap().unwrap().spent, 101);
    }

    #[test]
    fn test_modify_expense_fields() {
        let storage = create_test_storage();
        let service = ExpenseService::new(&storage);
        let (expense, _) = service.add_expense("100", "books", "").unwrap();

        let (updated, _) = service
            .modify_expense(expense.pk, ExpenseField::Amount, "300")
            .unwrap();
        assert_eq!(updated.amount, 300);

        let (updated, _) = service
            .modify_expense(expense.pk, ExpenseField::Category, "MEAT")
            .unwrap();
        let meat = CategoryService::new(&storage).check_category("meat").unwrap();
        assert_eq!(updated.category, Some(meat.pk));

        let (updated, _) = service
            .modify_expense(expense.pk, ExpenseField::Date, "2024-03-01 12:30")
            .unwrap();
        assert_eq!(crate::models::format_timestamp(&updated.expense_date), "2024-03-01 12:30");

        let (updated, _) = service
            .modify_expense(expense.pk, ExpenseField::Comment, "steak")
            .unwrap();
        assert_eq!(updated.comment, "steak");

        assert_eq!(storage.expenses.get(expense.pk).unwrap().unwrap(), updated);
    }

    #[test]
    fn test_modify_expense_rejects_bad_input() {
        let storage = create_test_storage();
        let service = ExpenseService::new(&storage);
        let (expense, _) = service.add_expense("100", "books", "").unwrap();

        assert!(service
            .modify_expense(expense.pk, ExpenseField::Amount, "-1")
            .unwrap_err()
            .is_validation());
        assert!(service
            .modify_expense(expense.pk, ExpenseField::Category, "cars")
            .unwrap_err()
            .is_validation());
        assert!(service
            .modify_expense(expense.pk, ExpenseField::Date, "yesterday")
            .unwrap_err()
            .is_validation());
        assert!(service
            .modify_expense(999, ExpenseField::Comment, "x")
            .unwrap_err()
            .is_not_found());

        assert_eq!(storage.expenses.get(expense.pk).unwrap().unwrap(), expense);
    }

    #[test]
    fn test_delete_expenses() {
        let storage = create_test_storage();
        let mut budget = Budget::for_period(100, Period::Month);
        storage.budgets.add(&mut budget).unwrap();
        let service = ExpenseService::new(&storage);

        let (a, _) = service.add_expense("80", "books", "").unwrap();
        let (b, status) = service.add_expense("80", "books", "").unwrap();
        let (c, _) = service.add_expense("10", "books", "").unwrap();
        assert!(status.is_exceeded());

        let status = service.delete_expenses(&[a.pk, b.pk]).unwrap();
        assert!(!status.is_exceeded());
        assert_eq!(service.list().unwrap(), vec![c]);
    }

    #[test]
    fn test_delete_missing_expense() {
        let storage = create_test_storage();
        let service = ExpenseService::new(&storage);
        let (a, _) = service.add_expense("80", "books", "").unwrap();

        let err = service.delete_expenses(&[a.pk, 42]).unwrap_err();
        assert!(err.is_not_found());
        assert!(service.list().unwrap().is_empty());
    }
}
