use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Unknown values never score, so they fall back to `Pending`.
    pub fn from_db(value: &str) -> Self {
        value.trim().parse().unwrap_or(LeaveStatus::Pending)
    }
}

/// Inclusive leave range for one employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveInterval {
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
}

impl LeaveInterval {
    pub fn approved(employee_id: u64, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            employee_id,
            start_date,
            end_date,
            status: LeaveStatus::Approved,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct LeaveRow {
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

impl From<LeaveRow> for LeaveInterval {
    fn from(row: LeaveRow) -> Self {
        Self {
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            status: LeaveStatus::from_db(&row.status),
        }
    }
}
