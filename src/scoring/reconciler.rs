use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use super::calendar::{WorkCalendar, expand_leave};
use super::time_classifier::{CheckInPolicy, ParsedTime, TimeParseError, parse_check_in};
use crate::model::attendance::AttendancePunch;
use crate::model::leave_request::LeaveInterval;
use crate::model::score::{AttendanceScoreSummary, DayOutcome, DayScore, DayStatus};

/// Authoritative check-in for a day.
#[derive(Debug, Clone, PartialEq)]
pub enum EarliestCheckIn {
    At(ParsedTime),
    Malformed(TimeParseError),
}

impl EarliestCheckIn {
    fn from_raw(raw: &str) -> Self {
        match parse_check_in(raw) {
            Ok(time) => EarliestCheckIn::At(time),
            Err(e) => EarliestCheckIn::Malformed(e),
        }
    }

    /// A readable time always beats a malformed one.
    fn is_earlier_than(&self, other: &Self) -> bool {
        match (self, other) {
            (EarliestCheckIn::At(a), EarliestCheckIn::At(b)) => a < b,
            (EarliestCheckIn::At(_), EarliestCheckIn::Malformed(_)) => true,
            (EarliestCheckIn::Malformed(_), _) => false,
        }
    }

    fn outcome(&self, policy: &CheckInPolicy) -> DayOutcome {
        match self {
            EarliestCheckIn::At(time) => policy.outcome_for(*time),
            EarliestCheckIn::Malformed(_) => DayOutcome::Absent,
        }
    }
}

/// Folds the employee's in-range punches into one check-in per date, keeping
/// the earliest. Punches without a check-in are skipped.
pub fn earliest_check_ins(
    employee_id: u64,
    punches: &[AttendancePunch],
    start: NaiveDate,
    end: NaiveDate,
) -> HashMap<NaiveDate, EarliestCheckIn> {
    punches
        .iter()
        .filter(|p| p.employee_id == employee_id && p.date >= start && p.date <= end)
        .filter_map(|p| p.check_in.as_deref().map(|raw| (p.date, EarliestCheckIn::from_raw(raw))))
        .fold(HashMap::new(), |mut by_date, (date, candidate)| {
            let replace = by_date
                .get(&date)
                .is_none_or(|current| candidate.is_earlier_than(current));
            if replace {
                by_date.insert(date, candidate);
            }
            by_date
        })
}

/// Walks one employee's range day by day in ascending order.
pub struct DayWalk<'a> {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
    calendar: &'a WorkCalendar,
    policy: &'a CheckInPolicy,
    on_leave: HashSet<NaiveDate>,
    check_ins: HashMap<NaiveDate, EarliestCheckIn>,
}

impl<'a> DayWalk<'a> {
    pub fn new(
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        punches: &[AttendancePunch],
        leave: &[LeaveInterval],
        calendar: &'a WorkCalendar,
        policy: &'a CheckInPolicy,
    ) -> Self {
        Self {
            cursor: Some(start),
            end,
            calendar,
            policy,
            on_leave: expand_leave(employee_id, leave, start, end),
            check_ins: earliest_check_ins(employee_id, punches, start, end),
        }
    }

    fn score(&self, date: NaiveDate) -> DayScore {
        // weekend and holiday are decided before leave or punches are consulted
        let status = if self.calendar.is_weekend(date) {
            DayStatus::Weekend
        } else if self.calendar.is_holiday(date) {
            DayStatus::Holiday
        } else if self.on_leave.contains(&date) {
            DayStatus::OnLeave
        } else {
            self.check_ins
                .get(&date)
                .map_or(DayOutcome::Absent, |c| c.outcome(self.policy))
                .into()
        };

        let points = match status {
            DayStatus::Weekend | DayStatus::Holiday => 0.0,
            DayStatus::OnLeave => self.policy.points_for(DayOutcome::OnLeave),
            DayStatus::OnTime => self.policy.points_for(DayOutcome::OnTime),
            DayStatus::Late => self.policy.points_for(DayOutcome::Late),
            DayStatus::Absent => self.policy.points_for(DayOutcome::Absent),
        };

        DayScore {
            date,
            status,
            points,
        }
    }
}

impl Iterator for DayWalk<'_> {
    type Item = DayScore;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.cursor.filter(|d| *d <= self.end)?;
        self.cursor = date.succ_opt();
        Some(self.score(date))
    }
}

pub fn summarize(days: impl IntoIterator<Item = DayScore>) -> AttendanceScoreSummary {
    let (points, countable) = days
        .into_iter()
        .filter(|day| day.status.is_countable())
        .fold((0.0_f64, 0_u32), |(points, countable), day| {
            (points + day.points, countable + 1)
        });
    AttendanceScoreSummary::from_totals(points, countable)
}
