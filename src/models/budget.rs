//! Budget model
//!
//! A budget caps spending over a period. `spent` is derived data: it is
//! recomputed from the expense ledger by [`Budget::update_spent`] and never
//! trusted on its own.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::Expense;
use super::period::Period;
use super::record::{take_values, FieldDescriptor, FieldValue, Filter, HasIdentity, Pk, Record, Schema, UNSAVED_PK};
use crate::error::{BookkeeperError, BookkeeperResult};
use crate::storage::Repository;

static BUDGET_SCHEMA: Schema = Schema {
    table: "budget",
    fields: &[
        FieldDescriptor::new("limitation", 0),
        FieldDescriptor::new("period", 1),
        FieldDescriptor::new("spent", 2),
    ],
};

/// A spending cap for a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Spending cap (non-negative)
    pub limitation: i64,

    /// Window the cap applies to
    pub period: Period,

    /// Amount spent in the current window, as of the last recompute
    pub spent: i64,

    /// Store-assigned identity, 0 while unsaved
    pub pk: Pk,
}

impl Budget {
    /// Create a new unsaved budget
    ///
    /// The period name is validated before anything else.
    pub fn new(limitation: i64, period: &str) -> BookkeeperResult<Self> {
        let period: Period = period.parse()?;
        Ok(Self::for_period(limitation, period))
    }

    /// Create a new unsaved budget from an already-validated period
    pub fn for_period(limitation: i64, period: Period) -> Self {
        Self {
            limitation,
            period,
            spent: 0,
            pk: UNSAVED_PK,
        }
    }

    pub fn with_spent(mut self, spent: i64) -> Self {
        self.spent = spent;
        self
    }

    /// Whether recorded spending is over the cap
    pub fn is_exceeded(&self) -> bool {
        self.spent > self.limitation
    }

    /// Amount left before the cap is reached (negative when exceeded)
    pub fn remaining(&self) -> i64 {
        self.limitation - self.spent
    }

    /// Recompute `spent` over the window containing today's local date
    pub fn update_spent(&mut self, expenses: &dyn Repository<Expense>) -> BookkeeperResult<()> {
        self.update_spent_at(expenses, Local::now().date_naive())
    }

    /// Recompute `spent` over the window containing `today`
    ///
    /// `spent` is only assigned once every window query has succeeded and
    /// the total fits in an `i64`.
    pub fn update_spent_at(
        &mut self,
        expenses: &dyn Repository<Expense>,
        today: NaiveDate,
    ) -> BookkeeperResult<()> {
        let mut total: i64 = 0;
        for prefix in self.period.window_prefixes(today) {
            let matching = expenses.get_all_like(&Filter::new().field("expense_date", prefix))?;
            for expense in &matching {
                total = total.checked_add(expense.amount).ok_or_else(|| {
                    BookkeeperError::Validation(format!(
                        "Spending for the {} budget is too large to total",
                        self.period
                    ))
                })?;
            }
        }

        tracing::debug!(budget = self.pk, period = %self.period, spent = total, "recomputed budget");
        self.spent = total;
        Ok(())
    }
}

impl HasIdentity for Budget {
    fn pk(&self) -> Pk {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = pk;
    }
}

impl Record for Budget {
    fn schema() -> &'static Schema {
        &BUDGET_SCHEMA
    }

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            self.limitation.into(),
            self.period.as_str().into(),
            self.spent.into(),
        ]
    }

    fn from_values(pk: Pk, values: Vec<FieldValue>) -> BookkeeperResult<Self> {
        let [limitation, period, spent] = take_values(&BUDGET_SCHEMA, values)?;
        let period = period
            .into_text("period")?
            .parse()
            .map_err(|e: BookkeeperError| BookkeeperError::Storage(e.to_string()))?;
        Ok(Self {
            limitation: limitation.into_integer("limitation")?,
            period,
            spent: spent.into_integer("spent")?,
            pk,
        })
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} / {}", self.period, self.spent, self.limitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryRepository;
    use chrono::{Datelike, Duration, NaiveDateTime};

    fn noon(date: NaiveDate) -> NaiveDateTime {
        date.and_hms_opt(12, 0, 0).unwrap()
    }

    fn add_expense(repo: &MemoryRepository<Expense>, amount: i64, date: NaiveDate) {
        let mut expense = Expense::new(amount, Some(1)).with_expense_date(noon(date));
        repo.add(&mut expense).unwrap();
    }

    #[test]
    fn test_create_budget() {
        let budget = Budget::new(1000, "day").unwrap();
        assert_eq!(budget.limitation, 1000);
        assert_eq!(budget.period, Period::Day);
        assert_eq!(budget.spent, 0);
        assert_eq!(budget.pk, 0);

        let budget = Budget::new(1000, "week").unwrap().with_spent(100);
        assert_eq!(budget.period, Period::Week);
        assert_eq!(budget.spent, 100);
    }

    #[test]
    fn test_invalid_period_fails() {
        let err = Budget::new(1000, "century").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_exceeded() {
        let budget = Budget::new(100, "day").unwrap().with_spent(100);
        assert!(!budget.is_exceeded());
        let budget = budget.with_spent(101);
        assert!(budget.is_exceeded());
        assert_eq!(budget.remaining(), -1);
    }

    #[test]
    fn test_update_spent_day() {
        let repo = MemoryRepository::<Expense>::new();
        for _ in 0..3 {
            let mut expense = Expense::new(100, Some(1));
            repo.add(&mut expense).unwrap();
        }

        let mut budget = Budget::new(100, "day").unwrap();
        budget.update_spent(&repo).unwrap();
        assert_eq!(budget.spent, 300);
    }

    #[test]
    fn test_update_spent_month() {
        let repo = MemoryRepository::<Expense>::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        for day in [1, 6, 31] {
            add_expense(&repo, 100, today.with_day(day).unwrap());
        }
        add_expense(&repo, 100, NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());
        add_expense(&repo, 100, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        add_expense(&repo, 100, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());

        let mut budget = Budget::new(100, "month").unwrap();
        budget.update_spent_at(&repo, today).unwrap();
        assert_eq!(budget.spent, 300);
    }

    #[test]
    fn test_update_spent_week_excludes_neighbours() {
        let repo = MemoryRepository::<Expense>::new();
        // Thursday
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let monday = today - Duration::days(3);

        // Prior Sunday through next Monday: 9 days, 7 inside the window
        for offset in -1..8 {
            add_expense(&repo, 100, monday + Duration::days(offset));
        }

        let mut budget = Budget::new(100, "week").unwrap();
        budget.update_spent_at(&repo, today).unwrap();
        assert_eq!(budget.spent, 700);
    }

    #[test]
    fn test_update_spent_is_idempotent() {
        let repo = MemoryRepository::<Expense>::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        add_expense(&repo, 40, today);

        let mut budget = Budget::new(10, "day").unwrap().with_spent(9999);
        budget.update_spent_at(&repo, today).unwrap();
        budget.update_spent_at(&repo, today).unwrap();
        assert_eq!(budget.spent, 40);
    }

    #[test]
    fn test_update_spent_overflow_is_an_error() {
        let repo = MemoryRepository::<Expense>::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        add_expense(&repo, i64::MAX, today);
        add_expense(&repo, 1, today);

        let mut budget = Budget::new(10, "day").unwrap().with_spent(5);
        let err = budget.update_spent_at(&repo, today).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(budget.spent, 5);
    }

    #[test]
    fn test_values_round_trip() {
        let budget = Budget::new(7000, "week").unwrap().with_spent(350);
        let restored = Budget::from_values(3, budget.to_values()).unwrap();
        assert_eq!(restored.limitation, 7000);
        assert_eq!(restored.period, Period::Week);
        assert_eq!(restored.spent, 350);
        assert_eq!(restored.pk, 3);

        let bad = vec![1.into(), "fortnight".into(), 0.into()];
        assert!(Budget::from_values(1, bad).is_err());
    }
}
