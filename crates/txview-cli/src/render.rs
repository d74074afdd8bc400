//! Plain-text rendering of the view state.

use txview_core::utils::{format_amount, format_date, truncate_string};
use txview_core::{Employee, Transaction};

/// Width of the merchant column.
const MERCHANT_WIDTH: usize = 24;

/// Width of the employee name column.
const EMPLOYEE_WIDTH: usize = 18;

pub const HELP: &str = "\
Commands:
  employees             List employees for the filter
  select <id|name|all>  Filter by employee, or show all employees
  list                  Show loaded transactions
  more                  Load the next page
  approve <id>          Mark a transaction approved
  unapprove <id>        Clear a transaction's approval
  status                Show backend and loading state
  help                  Show this message
  quit                  Exit
";

pub fn employee_list(options: &[Employee], selected: &Employee) -> String {
    if options.is_empty() {
        return "Loading employees...".to_string();
    }

    options
        .iter()
        .map(|e| {
            let marker = if e == selected { '*' } else { ' ' };
            let id = if e.is_empty() { "all" } else { e.id.as_str() };
            format!("{} {:<10} {}", marker, id, e.full_name())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn transaction_row(transaction: &Transaction, approved: bool) -> String {
    format!(
        "[{}] {:<8} {:<12} {:<mw$} {:<ew$} {:>12}",
        if approved { 'x' } else { ' ' },
        transaction.id,
        format_date(&transaction.date),
        truncate_string(&transaction.merchant, MERCHANT_WIDTH),
        truncate_string(&transaction.employee.full_name(), EMPLOYEE_WIDTH),
        format_amount(transaction.amount),
        mw = MERCHANT_WIDTH,
        ew = EMPLOYEE_WIDTH,
    )
}

/// The transaction table with a trailing hint when more pages can be loaded.
pub fn transaction_table(
    transactions: Option<&[Transaction]>,
    approval: impl Fn(&Transaction) -> bool,
    view_more: bool,
) -> String {
    let Some(transactions) = transactions else {
        return "Loading transactions...".to_string();
    };
    if transactions.is_empty() {
        return "No transactions.".to_string();
    }

    let mut lines: Vec<String> = transactions
        .iter()
        .map(|t| transaction_row(t, approval(t)))
        .collect();
    if view_more {
        lines.push("-- more available: type `more` --".to_string());
    }
    lines.join("\n")
}
