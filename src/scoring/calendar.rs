use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::leave_request::LeaveInterval;

/// Non-working weekdays. Indices follow 0=Sunday..6=Saturday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekendPolicy {
    days: HashSet<Weekday>,
}

impl Default for WeekendPolicy {
    fn default() -> Self {
        Self::new([Weekday::Fri, Weekday::Sat])
    }
}

impl WeekendPolicy {
    pub fn new(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    /// Indices outside `0..=6` are ignored.
    pub fn from_indices(indices: impl IntoIterator<Item = u8>) -> Self {
        Self::new(indices.into_iter().filter_map(weekday_from_sunday_index))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    pub fn indices(&self) -> Vec<u8> {
        let mut out: Vec<u8> = self
            .days
            .iter()
            .map(|d| d.num_days_from_sunday() as u8)
            .collect();
        out.sort_unstable();
        out
    }
}

fn weekday_from_sunday_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Company-wide weekend and holiday configuration.
#[derive(Debug, Clone, Default)]
pub struct WorkCalendar {
    pub weekend: WeekendPolicy,
    pub holidays: HashSet<NaiveDate>,
}

impl WorkCalendar {
    pub fn new(weekend: WeekendPolicy, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            weekend,
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend.contains(date.weekday())
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }
}

/// Every date in `[start, end]`, ascending. Empty when `end < start`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Days in `[start, end]` covered by this employee's approved leave.
///
/// Intervals are clipped to the range first, so the cost is bounded by the
/// number of leave days that can actually matter.
pub fn expand_leave(
    employee_id: u64,
    leave: &[LeaveInterval],
    start: NaiveDate,
    end: NaiveDate,
) -> HashSet<NaiveDate> {
    leave
        .iter()
        .filter(|l| l.employee_id == employee_id && l.is_approved())
        .flat_map(|l| days_inclusive(l.start_date.max(start), l.end_date.min(end)))
        .collect()
}
