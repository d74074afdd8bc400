use serde::{Deserialize, Serialize};

use super::Employee;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub employee: Employee,
    pub merchant: String,
    pub date: String,
    #[serde(default)]
    pub approved: bool,
}

impl Transaction {
    pub fn belongs_to(&self, employee_id: &str) -> bool {
        self.employee.id == employee_id
    }
}
