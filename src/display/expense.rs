//! Expense display formatting
//!
//! Formats the expense ledger as a register.

use std::collections::HashMap;

use crate::models::{format_timestamp, Expense, Pk};

/// Format a single expense as a register row
pub fn format_expense_row(expense: &Expense, categories: &HashMap<Pk, String>) -> String {
    let category = expense
        .category
        .and_then(|pk| categories.get(&pk))
        .map(String::as_str)
        .unwrap_or("-");

    format!(
        "{:>5}  {:16}  {:>10}  {:20}  {}",
        expense.pk,
        format_timestamp(&expense.expense_date),
        expense.amount,
        truncate(category, 20),
        expense.comment
    )
}

/// Format a list of expenses as a register
pub fn format_expense_register(expenses: &[Expense], categories: &HashMap<Pk, String>) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:16}  {:>10}  {:20}  {}\n",
        "ID", "Date", "Amount", "Category", "Comment"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense, categories));
        output.push('\n');
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
