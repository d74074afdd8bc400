//! Executes commands against the view and produces the text to show.

use anyhow::{anyhow, Result};
use tracing::debug;

use txview_core::{Employee, ViewController};

use crate::commands::{Command, SelectTarget};
use crate::render;

pub enum Outcome {
    Continue(String),
    Quit,
}

pub struct Session {
    view: ViewController,
    backend_description: String,
}

impl Session {
    pub fn new(view: ViewController, backend_description: String) -> Self {
        Self {
            view,
            backend_description,
        }
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub async fn start(&mut self) -> Result<String> {
        self.view.initialize().await?;
        Ok(self.listing())
    }

    pub async fn execute(&mut self, command: Command) -> Result<Outcome> {
        debug!(?command, "Executing command");

        let output = match command {
            Command::Help => render::HELP.to_string(),
            Command::Employees => {
                render::employee_list(&self.view.employee_options(), self.view.selected_employee())
            }
            Command::Select(target) => {
                let employee = self.resolve(target)?;
                self.view.select_employee(employee).await?;
                self.listing()
            }
            Command::List => self.listing(),
            Command::More => {
                let before = self.view.transactions().map_or(0, <[_]>::len);
                self.view.load_more().await?;
                if self.view.transactions().map_or(0, <[_]>::len) == before {
                    "No more transactions to load.".to_string()
                } else {
                    self.listing()
                }
            }
            Command::Approve {
                transaction_id,
                approved,
            } => {
                let visible = self
                    .view
                    .transactions()
                    .unwrap_or_default()
                    .iter()
                    .any(|t| t.id == transaction_id);
                if !visible {
                    return Err(anyhow!("No loaded transaction with id {}", transaction_id));
                }
                self.view.set_approval(transaction_id.clone(), approved);
                format!(
                    "{} {}",
                    transaction_id,
                    if approved { "approved" } else { "unapproved" }
                )
            }
            Command::Status => self.status(),
            Command::Quit => return Ok(Outcome::Quit),
        };

        Ok(Outcome::Continue(output))
    }

    /// Map a selection to the employee to filter by; `None` clears the filter.
    fn resolve(&self, target: SelectTarget) -> Result<Option<Employee>> {
        let query = match target {
            SelectTarget::All => return Ok(None),
            SelectTarget::Employee(query) => query,
        };

        let employees = self
            .view
            .employees()
            .ok_or_else(|| anyhow!("Employees are not loaded yet"))?;

        employees
            .iter()
            .find(|e| e.id == query || e.full_name().eq_ignore_ascii_case(&query))
            .cloned()
            .map(Some)
            .ok_or_else(|| anyhow!("No employee matches {:?} (type `employees`)", query))
    }

    fn listing(&self) -> String {
        render::transaction_table(
            self.view.transactions(),
            |t| self.view.approval(t),
            self.view.show_view_more(),
        )
    }

    fn status(&self) -> String {
        let selected = self.view.selected_employee();
        format!(
            "Backend:      {}\nFilter:       {}\nLoaded:       {} transactions\nMore pages:   {}\nCached:       {} responses\nLoading:      {}",
            self.backend_description,
            selected.full_name(),
            self.view.transactions().map_or(0, <[_]>::len),
            if self.view.mode().has_more() { "yes" } else { "no" },
            self.view.cache().len(),
            if self.view.is_loading() { "yes" } else { "no" },
        )
    }
}
