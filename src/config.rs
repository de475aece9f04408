use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use dotenvy::dotenv;

use crate::scoring::{CheckInPolicy, WeekendPolicy};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    // Scoring defaults, handed to the engine per request
    pub weekend_days: Vec<u8>,
    pub check_in_cutoff: NaiveTime,
    pub late_point: f64,

    // Request bounds
    pub max_range_days: i64,
    pub max_batch_employees: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),

            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", "1000")?,

            weekend_days: parse_weekend_days(&optional("WEEKEND_DAYS", "5,6"))
                .context("WEEKEND_DAYS must be a comma separated list of numbers")?,
            check_in_cutoff: NaiveTime::parse_from_str(&optional("CHECK_IN_CUTOFF", "07:30"), "%H:%M")
                .context("CHECK_IN_CUTOFF must look like HH:MM")?,
            late_point: parsed("LATE_POINT", "0.5")?,

            max_range_days: parsed("MAX_RANGE_DAYS", "1830")?,
            max_batch_employees: parsed("MAX_BATCH_EMPLOYEES", "200")?,
        })
    }

    pub fn weekend_policy(&self) -> WeekendPolicy {
        WeekendPolicy::from_indices(self.weekend_days.iter().copied())
    }

    pub fn check_in_policy(&self) -> CheckInPolicy {
        CheckInPolicy::new(self.check_in_cutoff, self.late_point)
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn optional(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional(key, default)
        .trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value"))
}

/// "5,6" -> [5, 6]. Blank entries are skipped; an empty string means no weekend.
fn parse_weekend_days(raw: &str) -> Result<Vec<u8>, std::num::ParseIntError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn config() -> Config {
        Config {
            database_url: "mysql://localhost/hrm".into(),
            jwt_secret: "secret".into(),
            server_addr: "127.0.0.1:8080".into(),
            api_prefix: "/api".into(),
            log_dir: "logs".into(),
            rate_protected_per_min: 1000,
            weekend_days: vec![5, 6],
            check_in_cutoff: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            late_point: 0.5,
            max_range_days: 1830,
            max_batch_employees: 200,
        }
    }

    #[test]
    fn weekend_days_parse() {
        assert_eq!(parse_weekend_days("5,6").unwrap(), vec![5, 6]);
        assert_eq!(parse_weekend_days(" 0 , 6 ,").unwrap(), vec![0, 6]);
        assert!(parse_weekend_days("").unwrap().is_empty());
        assert!(parse_weekend_days("fri").is_err());
    }

    #[test]
    fn default_policies_match_engine_defaults() {
        let config = config();
        assert_eq!(config.weekend_policy(), WeekendPolicy::default());
        assert_eq!(config.check_in_policy(), CheckInPolicy::default());
    }

    #[test]
    fn out_of_range_weekend_index_is_dropped() {
        let config = Config {
            weekend_days: vec![0, 9],
            ..config()
        };
        let weekend = config.weekend_policy();
        assert!(weekend.contains(Weekday::Sun));
        assert_eq!(weekend.indices(), vec![0]);
    }
}
