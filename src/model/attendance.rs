use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One time-clock event. Several punches may exist for the same employee and
/// day; only the earliest check-in is used for scoring.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendancePunch {
    pub employee_id: u64,
    pub date: NaiveDate,
    /// Raw wall-clock text as exported by the machine, e.g. "7:05 AM" or "19:45".
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

impl AttendancePunch {
    pub fn new(employee_id: u64, date: NaiveDate, check_in: Option<&str>) -> Self {
        Self {
            employee_id,
            date,
            check_in: check_in.map(str::to_string),
            check_out: None,
        }
    }
}
