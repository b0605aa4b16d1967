//! Budget period representation
//!
//! A budget recomputes its spending over the current day, week (Monday
//! through Sunday) or calendar month.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::expense::date_prefix;
use crate::error::BookkeeperError;

/// The window a budget's spending is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    /// All periods in display order
    pub fn all() -> &'static [Self] {
        &[Self::Day, Self::Week, Self::Month]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// First and last day (inclusive) of the window containing `today`
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Day => (today, today),
            Self::Week => {
                let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
                (monday, monday + Duration::days(6))
            }
            Self::Month => {
                let first = today.with_day(1).unwrap_or(today);
                let next_month = if first.month() == 12 {
                    NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
                };
                let last = next_month
                    .and_then(|d| d.pred_opt())
                    .unwrap_or(first);
                (first, last)
            }
        }
    }

    /// Expense date prefixes selecting the window containing `today`
    ///
    /// One prefix per day for `Day` and `Week`, a single `YYYY-MM-` prefix
    /// for `Month`.
    pub fn window_prefixes(&self, today: NaiveDate) -> Vec<String> {
        match self {
            Self::Day => vec![date_prefix(&today)],
            Self::Week => {
                let (monday, _) = self.bounds(today);
                (0..7)
                    .map(|offset| date_prefix(&(monday + Duration::days(offset))))
                    .collect()
            }
            Self::Month => vec![today.format("%Y-%m-").to_string()],
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = BookkeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(BookkeeperError::Validation(format!(
                "Unknown budget period '{}': expected \"day\", \"week\" or \"month\"",
                other
            ))),
        }
    }
}
