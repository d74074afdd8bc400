use serde::{Deserialize, Serialize};

/// Id carried by the "All Employees" placeholder. Real employees never use it.
pub const EMPTY_EMPLOYEE_ID: &str = "";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Employee {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// The placeholder entry meaning "no employee filter".
    pub fn empty() -> Self {
        Self::new(EMPTY_EMPLOYEE_ID, "All", "Employees")
    }

    /// True for the "All Employees" placeholder.
    pub fn is_empty(&self) -> bool {
        self.id == EMPTY_EMPLOYEE_ID
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Default for Employee {
    fn default() -> Self {
        Self::empty()
    }
}
