//! Budget display formatting

use crate::models::Budget;

/// Format budgets as a table with remaining amounts
pub fn format_budget_table(budgets: &[Budget]) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n\nRun 'bookkeeper budget set <period> <limit>' to add one.\n"
            .to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:8}  {:>10}  {:>10}  {:>10}\n",
        "ID", "Period", "Limit", "Spent", "Remaining"
    ));
    output.push_str(&"-".repeat(51));
    output.push('\n');

    for budget in budgets {
        let marker = if budget.is_exceeded() { "  OVER" } else { "" };
        output.push_str(&format!(
            "{:>5}  {:8}  {:>10}  {:>10}  {:>10}{}\n",
            budget.pk,
            budget.period.as_str(),
            budget.limitation,
            budget.spent,
            budget.remaining(),
            marker
        ));
    }

    output
}

/// Warning lines for budgets over their limitation, empty when none are
pub fn format_exceeded_warning(exceeded: &[&Budget]) -> String {
    let mut output = String::new();
    for budget in exceeded {
        output.push_str(&format!(
            "Warning: {} budget exceeded ({} spent of {})\n",
            budget.period, budget.spent, budget.limitation
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;

    #[test]
    fn test_budget_table_marks_exceeded() {
        let budgets = vec![
            Budget::for_period(1000, Period::Day).with_spent(200),
            Budget::for_period(100, Period::Week).with_spent(150),
        ];

        let output = format_budget_table(&budgets);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("day") && lines[2].contains("800"));
        assert!(!lines[2].ends_with("OVER"));
        assert!(lines[3].contains("-50") && lines[3].ends_with("OVER"));
    }

    #[test]
    fn test_exceeded_warning() {
        let budget = Budget::for_period(100, Period::Month).with_spent(150);
        assert_eq!(
            format_exceeded_warning(&[&budget]),
            "Warning: month budget exceeded (150 spent of 100)\n"
        );
        assert!(format_exceeded_warning(&[]).is_empty());
    }
}
