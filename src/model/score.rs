use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of a countable day. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    OnLeave,
    OnTime,
    Late,
    Absent,
}

/// Per-day verdict shown in breakdowns, including days that do not count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Weekend,
    Holiday,
    OnLeave,
    OnTime,
    Late,
    Absent,
}

impl DayStatus {
    pub fn is_countable(&self) -> bool {
        !matches!(self, DayStatus::Weekend | DayStatus::Holiday)
    }
}

impl From<DayOutcome> for DayStatus {
    fn from(outcome: DayOutcome) -> Self {
        match outcome {
            DayOutcome::OnLeave => DayStatus::OnLeave,
            DayOutcome::OnTime => DayStatus::OnTime,
            DayOutcome::Late => DayStatus::Late,
            DayOutcome::Absent => DayStatus::Absent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayScore {
    #[schema(example = "2026-01-04", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "on_time")]
    pub status: DayStatus,
    #[schema(example = 1.0)]
    pub points: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "total_points": 4.0,
    "total_countable_days": 5,
    "percentage": 80.0,
    "normalized_score": 8.0
}))]
pub struct AttendanceScoreSummary {
    pub total_points: f64,
    pub total_countable_days: u32,
    /// 0 to 100
    pub percentage: f64,
    /// `percentage / 10`, for display next to other KPI metrics
    pub normalized_score: f64,
}

impl AttendanceScoreSummary {
    pub fn from_totals(total_points: f64, total_countable_days: u32) -> Self {
        if total_countable_days == 0 {
            return Self::default();
        }

        let percentage = (total_points / f64::from(total_countable_days)) * 100.0;
        Self {
            total_points,
            total_countable_days,
            percentage,
            normalized_score: percentage / 10.0,
        }
    }
}
