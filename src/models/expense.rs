//! Expense model
//!
//! An expense is a single spending event. Dates are stored as text in
//! `YYYY-MM-DD HH:MM` form so that lexical prefix matching doubles as date
//! range filtering.

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::record::{take_values, FieldDescriptor, FieldValue, HasIdentity, Pk, Record, Schema, UNSAVED_PK};
use crate::error::{BookkeeperError, BookkeeperResult};

/// Storage format for expense timestamps (minute precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Storage format of the date part of a timestamp
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EXPENSE_SCHEMA: Schema = Schema {
    table: "expense",
    fields: &[
        FieldDescriptor::new("amount", 0),
        FieldDescriptor::new("category", 1),
        FieldDescriptor::new("expense_date", 2),
        FieldDescriptor::new("added_date", 3),
        FieldDescriptor::new("comment", 4),
    ],
};

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Amount spent (positive, currency-agnostic)
    pub amount: i64,

    /// Category identity, `None` once the category has been deleted
    pub category: Option<Pk>,

    /// When the money was spent
    pub expense_date: NaiveDateTime,

    /// When the expense was recorded
    pub added_date: NaiveDateTime,

    /// Free-form note
    #[serde(default)]
    pub comment: String,

    /// Store-assigned identity, 0 while unsaved
    pub pk: Pk,
}

impl Expense {
    /// Create a new unsaved expense dated now
    pub fn new(amount: i64, category: Option<Pk>) -> Self {
        let now = now_minutes();
        Self {
            amount,
            category,
            expense_date: now,
            added_date: now,
            comment: String::new(),
            pk: UNSAVED_PK,
        }
    }

    /// Set the date the money was spent (truncated to minutes)
    pub fn with_expense_date(mut self, date: NaiveDateTime) -> Self {
        self.expense_date = truncate_to_minutes(date);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

impl HasIdentity for Expense {
    fn pk(&self) -> Pk {
        self.pk
    }

    fn set_pk(&mut self, pk: Pk) {
        self.pk = pk;
    }
}

impl Record for Expense {
    fn schema() -> &'static Schema {
        &EXPENSE_SCHEMA
    }

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            self.amount.into(),
            self.category.into(),
            format_timestamp(&self.expense_date).into(),
            format_timestamp(&self.added_date).into(),
            self.comment.clone().into(),
        ]
    }

    fn from_values(pk: Pk, values: Vec<FieldValue>) -> BookkeeperResult<Self> {
        let [amount, category, expense_date, added_date, comment] =
            take_values(&EXPENSE_SCHEMA, values)?;
        Ok(Self {
            amount: amount.into_integer("amount")?,
            category: category.into_optional_integer("category")?,
            expense_date: stored_timestamp(expense_date.into_text("expense_date")?)?,
            added_date: stored_timestamp(added_date.into_text("added_date")?)?,
            comment: comment.into_text("comment")?,
            pk,
        })
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_timestamp(&self.expense_date), self.amount)?;
        if !self.comment.is_empty() {
            write!(f, " ({})", self.comment)?;
        }
        Ok(())
    }
}

/// Current local time truncated to minutes
pub fn now_minutes() -> NaiveDateTime {
    truncate_to_minutes(Local::now().naive_local())
}

fn truncate_to_minutes(date: NaiveDateTime) -> NaiveDateTime {
    date.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(date)
}

/// Render a timestamp in storage form
pub fn format_timestamp(date: &NaiveDateTime) -> String {
    date.format(TIMESTAMP_FORMAT).to_string()
}

/// Render a date as the prefix shared by every timestamp on that day
pub fn date_prefix(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse user-supplied timestamps
///
/// Accepts `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]` and a bare
/// `YYYY-MM-DD` (midnight). The result is truncated to minutes.
pub fn parse_timestamp(input: &str) -> BookkeeperResult<NaiveDateTime> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d\t%H:%M",
    ];

    let input = input.trim();
    for format in FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(truncate_to_minutes(date));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    Err(BookkeeperError::Validation(format!(
        "Invalid date '{}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM",
        input
    )))
}

fn stored_timestamp(text: String) -> BookkeeperResult<NaiveDateTime> {
    parse_timestamp(&text)
        .map_err(|_| BookkeeperError::Storage(format!("Malformed stored timestamp '{}'", text)))
}

/// Largest amount accepted for a single expense
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Parse a user-supplied amount: a positive integer up to [`MAX_AMOUNT`]
pub fn parse_amount(input: &str) -> BookkeeperResult<i64> {
    let amount: i64 = input.trim().parse().map_err(|_| {
        BookkeeperError::Validation(format!("Amount must be a whole number, got '{}'", input))
    })?;

    if amount <= 0 {
        return Err(BookkeeperError::Validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }

    if amount > MAX_AMOUNT {
        return Err(BookkeeperError::Validation(format!(
            "Amount cannot exceed {}, got {}",
            MAX_AMOUNT, amount
        )));
    }

    Ok(amount)
}
