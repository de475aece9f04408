//! Attendance scoring engine.
//!
//! Pure and synchronous: every input is passed in by the caller, nothing is
//! cached between calls, so one employee's score can be computed on any
//! thread independently of another's.

pub mod calendar;
pub mod reconciler;
pub mod time_classifier;

use chrono::NaiveDate;

use crate::model::attendance::AttendancePunch;
use crate::model::leave_request::LeaveInterval;
use crate::model::score::{AttendanceScoreSummary, DayScore};

pub use calendar::{WeekendPolicy, WorkCalendar};
pub use reconciler::DayWalk;
pub use time_classifier::{CheckInPolicy, parse_check_in};

/// Scores `employee_id` over `[start_date, end_date]`.
///
/// Weekends and holidays are skipped first. A countable day then scores by
/// approved leave, else the earliest check-in, else absence. Leave intervals
/// that are not approved or belong to someone else are ignored, so callers
/// may pass either pre-filtered or raw leave lists. An inverted range yields
/// the zero summary.
pub fn compute_attendance_score(
    employee_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    punches: &[AttendancePunch],
    leave: &[LeaveInterval],
    calendar: &WorkCalendar,
    policy: &CheckInPolicy,
) -> AttendanceScoreSummary {
    reconciler::summarize(DayWalk::new(
        employee_id,
        start_date,
        end_date,
        punches,
        leave,
        calendar,
        policy,
    ))
}

/// Same walk as [`compute_attendance_score`], one entry per calendar day.
pub fn score_breakdown(
    employee_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    punches: &[AttendancePunch],
    leave: &[LeaveInterval],
    calendar: &WorkCalendar,
    policy: &CheckInPolicy,
) -> Vec<DayScore> {
    DayWalk::new(
        employee_id,
        start_date,
        end_date,
        punches,
        leave,
        calendar,
        policy,
    )
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::LeaveStatus;
    use crate::model::score::DayStatus;

    // January 2026: Thu 1, Fri 2, Sat 3, Sun 4, Mon 5, Tue 6, Wed 7, Thu 8, Fri 9
    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn punch(day: u32, check_in: &str) -> AttendancePunch {
        AttendancePunch::new(7, d(day), Some(check_in))
    }

    fn score(
        start: u32,
        end: u32,
        punches: &[AttendancePunch],
        leave: &[LeaveInterval],
        calendar: &WorkCalendar,
    ) -> AttendanceScoreSummary {
        compute_attendance_score(
            7,
            d(start),
            d(end),
            punches,
            leave,
            calendar,
            &CheckInPolicy::default(),
        )
    }

    #[test]
    fn mixed_week_scores_eighty_percent() {
        // Sun 4 .. Thu 8 is five countable days under the Fri/Sat weekend
        let punches = vec![punch(4, "07:00"), punch(5, "7:15 AM"), punch(6, "07:30")];
        let leave = vec![LeaveInterval::approved(7, d(8), d(8))];

        let summary = score(4, 8, &punches, &leave, &WorkCalendar::default());

        assert_eq!(summary.total_points, 4.0);
        assert_eq!(summary.total_countable_days, 5);
        assert_eq!(summary.percentage, 80.0);
        assert_eq!(summary.normalized_score, 8.0);
    }

    #[test]
    fn holiday_and_weekend_drop_out_even_with_a_punch() {
        // Thu 1 .. Thu 8 has Fri 2 and Sat 3 as weekend; Tue 6 is a holiday
        let calendar = WorkCalendar::new(WeekendPolicy::default(), [d(6)]);
        let punches = vec![
            punch(1, "07:00"),
            punch(2, "07:00"),
            punch(4, "07:00"),
            punch(5, "07:00"),
            punch(6, "07:00"),
            punch(7, "07:00"),
            punch(8, "07:00"),
        ];

        let summary = score(1, 8, &punches, &[], &calendar);

        assert_eq!(summary.total_countable_days, 5);
        assert_eq!(summary.total_points, 5.0);
        assert_eq!(summary.percentage, 100.0);
    }

    #[test]
    fn single_weekend_day_is_all_zero() {
        let summary = score(3, 3, &[punch(3, "07:00")], &[], &WorkCalendar::default());
        assert_eq!(summary, AttendanceScoreSummary::default());
    }

    #[test]
    fn inverted_range_is_all_zero() {
        let summary = score(8, 4, &[punch(5, "07:00")], &[], &WorkCalendar::default());
        assert_eq!(summary, AttendanceScoreSummary::default());
        assert!(
            score_breakdown(
                7,
                d(8),
                d(4),
                &[],
                &[],
                &WorkCalendar::default(),
                &CheckInPolicy::default()
            )
            .is_empty()
        );
    }

    #[test]
    fn leave_beats_a_late_punch() {
        let punches = vec![punch(5, "11:45 AM")];
        let leave = vec![LeaveInterval::approved(7, d(5), d(5))];
        let summary = score(5, 5, &punches, &leave, &WorkCalendar::default());
        assert_eq!(summary.total_points, 1.0);
        assert_eq!(summary.total_countable_days, 1);
    }

    #[test]
    fn holiday_beats_leave() {
        let calendar = WorkCalendar::new(WeekendPolicy::default(), [d(5)]);
        let leave = vec![LeaveInterval::approved(7, d(4), d(6))];
        let summary = score(4, 6, &[], &leave, &calendar);
        assert_eq!(summary.total_countable_days, 2);
        assert_eq!(summary.total_points, 2.0);
    }

    #[test]
    fn earliest_punch_of_the_day_decides() {
        let punches = vec![punch(5, "09:00"), punch(5, "07:00")];
        let summary = score(5, 5, &punches, &[], &WorkCalendar::default());
        assert_eq!(summary.total_points, 1.0);
    }

    #[test]
    fn late_and_malformed_punches() {
        let punches = vec![punch(4, "07:31 AM"), punch(5, "7:45pm"), punch(6, "abc")];
        let summary = score(4, 6, &punches, &[], &WorkCalendar::default());
        assert_eq!(summary.total_countable_days, 3);
        assert_eq!(summary.total_points, 1.0);
    }

    #[test]
    fn unknown_employee_scores_as_fully_absent() {
        let summary = compute_attendance_score(
            99,
            d(4),
            d(8),
            &[punch(4, "07:00")],
            &[LeaveInterval::approved(7, d(5), d(5))],
            &WorkCalendar::default(),
            &CheckInPolicy::default(),
        );
        assert_eq!(summary.total_points, 0.0);
        assert_eq!(summary.total_countable_days, 5);
        assert_eq!(summary.percentage, 0.0);
    }

    #[test]
    fn pending_and_rejected_leave_do_not_score() {
        let leave = vec![
            LeaveInterval {
                employee_id: 7,
                start_date: d(4),
                end_date: d(4),
                status: LeaveStatus::Pending,
            },
            LeaveInterval {
                employee_id: 7,
                start_date: d(5),
                end_date: d(5),
                status: LeaveStatus::Rejected,
            },
        ];
        let summary = score(4, 5, &[], &leave, &WorkCalendar::default());
        assert_eq!(summary.total_points, 0.0);
        assert_eq!(summary.total_countable_days, 2);
    }

    #[test]
    fn custom_weekend_changes_denominator() {
        // Sat/Sun weekend: Thu 1 .. Thu 8 leaves Thu 1, Fri 2, Mon 5 .. Thu 8
        let calendar = WorkCalendar::new(WeekendPolicy::from_indices([0, 6]), []);
        let summary = score(1, 8, &[], &[], &calendar);
        assert_eq!(summary.total_countable_days, 6);
    }

    #[test]
    fn repeated_calls_agree() {
        let punches = vec![punch(4, "07:00"), punch(5, "08:00"), punch(5, "7:20")];
        let leave = vec![LeaveInterval::approved(7, d(7), d(9))];
        let calendar = WorkCalendar::new(WeekendPolicy::default(), [d(6)]);
        let first = score(1, 31, &punches, &leave, &calendar);
        let second = score(1, 31, &punches, &leave, &calendar);
        assert_eq!(first, second);
    }

    #[test]
    fn breakdown_matches_summary() {
        let punches = vec![punch(4, "07:00"), punch(5, "08:00"), punch(6, "x")];
        let leave = vec![LeaveInterval::approved(7, d(8), d(9))];
        let calendar = WorkCalendar::new(WeekendPolicy::default(), [d(7)]);
        let policy = CheckInPolicy::default();

        let days = score_breakdown(7, d(1), d(10), &punches, &leave, &calendar, &policy);
        let statuses: Vec<_> = days.iter().map(|day| day.status).collect();
        assert_eq!(
            statuses,
            vec![
                DayStatus::Absent,
                DayStatus::Weekend,
                DayStatus::Weekend,
                DayStatus::OnTime,
                DayStatus::Late,
                DayStatus::Absent,
                DayStatus::Holiday,
                DayStatus::OnLeave,
                DayStatus::Weekend,
                DayStatus::Weekend,
            ]
        );

        let summary = compute_attendance_score(7, d(1), d(10), &punches, &leave, &calendar, &policy);
        assert_eq!(reconciler::summarize(days), summary);
        assert_eq!(summary.total_countable_days, 5);
        assert_eq!(summary.total_points, 2.5);
    }

    #[test]
    fn bounds_hold_across_a_long_range() {
        let punches: Vec<_> = (1..=31)
            .map(|day| punch(day, if day % 3 == 0 { "09:10" } else { "07:05" }))
            .collect();
        let leave = vec![LeaveInterval::approved(7, d(10), d(20))];
        let calendar = WorkCalendar::new(WeekendPolicy::default(), [d(14), d(15)]);

        for end in 1..=31 {
            let summary = score(1, end, &punches, &leave, &calendar);
            assert!(summary.total_points >= 0.0);
            assert!(summary.total_points <= f64::from(summary.total_countable_days));
            assert!((0.0..=100.0).contains(&summary.percentage));
            assert!((0.0..=10.0).contains(&summary.normalized_score));
            if summary.total_countable_days == 0 {
                assert_eq!(summary.percentage, 0.0);
                assert_eq!(summary.normalized_score, 0.0);
            }
        }
    }
}
