//! Parsing of the interactive commands.

use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectTarget {
    All,
    /// An employee id or full name.
    Employee(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Employees,
    Select(SelectTarget),
    List,
    More,
    Approve { transaction_id: String, approved: bool },
    Status,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "" | "help" | "?" => Command::Help,
            "employees" | "e" => Command::Employees,
            "select" | "s" => match rest {
                "" => bail!("Usage: select <employee-id|name|all>"),
                r if r.eq_ignore_ascii_case("all") => Command::Select(SelectTarget::All),
                r => Command::Select(SelectTarget::Employee(r.to_string())),
            },
            "list" | "l" => Command::List,
            "more" | "m" => Command::More,
            "approve" | "a" => approval(rest, true)?,
            "unapprove" | "u" => approval(rest, false)?,
            "status" => Command::Status,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("Unknown command: {} (type `help`)", other),
        };

        Ok(command)
    }
}

fn approval(rest: &str, approved: bool) -> Result<Command> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        bail!("Usage: {} <transaction-id>", if approved { "approve" } else { "unapprove" });
    }
    Ok(Command::Approve {
        transaction_id: rest.to_string(),
        approved,
    })
}
