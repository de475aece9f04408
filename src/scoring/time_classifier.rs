use chrono::{NaiveTime, Timelike};
use derive_more::Display;

use crate::model::score::DayOutcome;

pub const DEFAULT_CUTOFF_HOUR: u32 = 7;
pub const DEFAULT_CUTOFF_MINUTE: u32 = 30;
pub const DEFAULT_LATE_POINT: f64 = 0.5;

/// Cutoff and late credit used to turn a check-in into points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckInPolicy {
    pub cutoff: NaiveTime,
    late_point: f64,
}

impl Default for CheckInPolicy {
    fn default() -> Self {
        Self::new(default_cutoff(), DEFAULT_LATE_POINT)
    }
}

impl CheckInPolicy {
    /// `late_point` is clamped into `[0, 1]`; a NaN falls back to the default.
    pub fn new(cutoff: NaiveTime, late_point: f64) -> Self {
        let late_point = if late_point.is_nan() {
            DEFAULT_LATE_POINT
        } else {
            late_point.clamp(0.0, 1.0)
        };
        Self { cutoff, late_point }
    }

    pub fn late_point(&self) -> f64 {
        self.late_point
    }

    pub fn points_for(&self, outcome: DayOutcome) -> f64 {
        match outcome {
            DayOutcome::OnLeave | DayOutcome::OnTime => 1.0,
            DayOutcome::Late => self.late_point,
            DayOutcome::Absent => 0.0,
        }
    }

    pub fn outcome_for(&self, time: ParsedTime) -> DayOutcome {
        if time.minutes_from_midnight() <= minutes_of(self.cutoff) {
            DayOutcome::OnTime
        } else {
            DayOutcome::Late
        }
    }

    /// Degrades anything unparseable (or missing) to `Absent`.
    pub fn classify(&self, raw: Option<&str>) -> DayOutcome {
        match raw.map(parse_check_in) {
            Some(Ok(time)) => self.outcome_for(time),
            Some(Err(_)) | None => DayOutcome::Absent,
        }
    }
}

fn default_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_CUTOFF_HOUR, DEFAULT_CUTOFF_MINUTE, 0).unwrap_or_default()
}

fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// A check-in as minutes from midnight after 12-to-24-hour conversion.
///
/// Values past 23:59 (e.g. "7:75" or "25:00") are kept as-is and simply
/// compare as later than any cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParsedTime(u32);

impl ParsedTime {
    pub fn minutes_from_midnight(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TimeParseError {
    #[display(fmt = "empty check-in value")]
    Empty,
    #[display(fmt = "no minute component")]
    MissingMinute,
    #[display(fmt = "invalid hour `{}`", _0)]
    InvalidHour(String),
    #[display(fmt = "invalid minute `{}`", _0)]
    InvalidMinute(String),
}

impl std::error::Error for TimeParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Parses loosely formatted clock text: "7:05", "07:05", "7:05pm", "07:05 PM".
///
/// Without an AM/PM marker the hour is taken as already 24-hour. Anything
/// after the minute (e.g. seconds) is ignored.
pub fn parse_check_in(raw: &str) -> Result<ParsedTime, TimeParseError> {
    let lowered = raw.trim().to_ascii_lowercase();
    if lowered.is_empty() {
        return Err(TimeParseError::Empty);
    }

    let meridiem = if lowered.contains("pm") {
        Some(Meridiem::Pm)
    } else if lowered.contains("am") {
        Some(Meridiem::Am)
    } else {
        None
    };
    let digits = lowered.replace("pm", "").replace("am", "");

    let mut parts = digits.trim().split(':');
    let hour_part = parts.next().unwrap_or_default().trim();
    let minute_part = parts.next().ok_or(TimeParseError::MissingMinute)?.trim();

    let mut hour: u32 = hour_part
        .parse()
        .map_err(|_| TimeParseError::InvalidHour(hour_part.to_string()))?;
    let minute: u32 = minute_part
        .parse()
        .map_err(|_| TimeParseError::InvalidMinute(minute_part.to_string()))?;

    match meridiem {
        Some(Meridiem::Pm) if hour < 12 => hour += 12,
        Some(Meridiem::Am) if hour == 12 => hour = 0,
        _ => {}
    }

    Ok(ParsedTime(hour.saturating_mul(60).saturating_add(minute)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(raw: &str) -> (u32, u32) {
        let minutes = parse_check_in(raw).unwrap().minutes_from_midnight();
        (minutes / 60, minutes % 60)
    }

    #[test]
    fn parses_common_shapes() {
        assert_eq!(hm("7:05"), (7, 5));
        assert_eq!(hm("07:05"), (7, 5));
        assert_eq!(hm(" 07:05 AM "), (7, 5));
        assert_eq!(hm("7:05am"), (7, 5));
        assert_eq!(hm("7:45pm"), (19, 45));
        assert_eq!(hm("07:45 PM"), (19, 45));
        assert_eq!(hm("07:30:59"), (7, 30));
    }

    #[test]
    fn twelve_oclock_edges() {
        assert_eq!(hm("12:10 AM"), (0, 10));
        assert_eq!(hm("12:10 PM"), (12, 10));
        assert_eq!(hm("12:10"), (12, 10));
    }

    #[test]
    fn no_marker_is_taken_as_24_hour() {
        assert_eq!(hm("19:45"), (19, 45));
        assert_eq!(hm("3:00"), (3, 0));
    }

    #[test]
    fn malformed_values_are_tagged_failures() {
        assert_eq!(parse_check_in("abc"), Err(TimeParseError::MissingMinute));
        assert_eq!(parse_check_in(""), Err(TimeParseError::Empty));
        assert_eq!(parse_check_in("   "), Err(TimeParseError::Empty));
        assert_eq!(
            parse_check_in("x:30"),
            Err(TimeParseError::InvalidHour("x".to_string()))
        );
        assert_eq!(
            parse_check_in("7:3o"),
            Err(TimeParseError::InvalidMinute("3o".to_string()))
        );
    }

    #[test]
    fn out_of_range_clock_values_still_parse() {
        assert_eq!(parse_check_in("7:75").unwrap().minutes_from_midnight(), 495);
        assert_eq!(parse_check_in("25:00").unwrap().minutes_from_midnight(), 1500);
        assert_eq!(parse_check_in("4294967295:00").unwrap().minutes_from_midnight(), u32::MAX);
    }

    #[test]
    fn out_of_range_clock_values_score_late() {
        let policy = CheckInPolicy::default();
        assert_eq!(policy.classify(Some("7:75")), DayOutcome::Late);
        assert_eq!(policy.classify(Some("25:00")), DayOutcome::Late);
        assert_eq!(policy.classify(Some("07:30")), DayOutcome::OnTime);
        assert_eq!(policy.points_for(policy.classify(Some("7:75"))), 0.5);
    }

    #[test]
    fn parse_error_messages_are_readable() {
        assert_eq!(
            TimeParseError::InvalidHour("x".into()).to_string(),
            "invalid hour `x`"
        );
        assert_eq!(
            TimeParseError::InvalidMinute("3o".into()).to_string(),
            "invalid minute `3o`"
        );
    }

    #[test]
    fn classifies_against_default_cutoff() {
        let policy = CheckInPolicy::default();
        assert_eq!(policy.classify(Some("07:30 AM")), DayOutcome::OnTime);
        assert_eq!(policy.classify(Some("07:31 AM")), DayOutcome::Late);
        assert_eq!(policy.classify(Some("7:45pm")), DayOutcome::Late);
        assert_eq!(policy.classify(Some("6:59")), DayOutcome::OnTime);
        assert_eq!(policy.classify(Some("abc")), DayOutcome::Absent);
        assert_eq!(policy.classify(None), DayOutcome::Absent);
    }

    #[test]
    fn default_points() {
        let policy = CheckInPolicy::default();
        assert_eq!(policy.points_for(policy.classify(Some("07:30 AM"))), 1.0);
        assert_eq!(policy.points_for(policy.classify(Some("07:31 AM"))), 0.5);
        assert_eq!(policy.points_for(policy.classify(Some("7:45pm"))), 0.5);
        assert_eq!(policy.points_for(policy.classify(Some("abc"))), 0.0);
        assert_eq!(policy.points_for(DayOutcome::OnLeave), 1.0);
    }

    #[test]
    fn custom_policy_moves_cutoff_and_late_credit() {
        let policy = CheckInPolicy::new(NaiveTime::from_hms_opt(9, 0, 0).unwrap(), 0.25);
        assert_eq!(policy.classify(Some("08:45")), DayOutcome::OnTime);
        assert_eq!(policy.classify(Some("09:01")), DayOutcome::Late);
        assert_eq!(policy.points_for(DayOutcome::Late), 0.25);
    }

    #[test]
    fn late_point_is_clamped() {
        let cutoff = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        assert_eq!(CheckInPolicy::new(cutoff, 3.0).late_point(), 1.0);
        assert_eq!(CheckInPolicy::new(cutoff, -1.0).late_point(), 0.0);
        assert_eq!(CheckInPolicy::new(cutoff, f64::NAN).late_point(), DEFAULT_LATE_POINT);
    }
}
