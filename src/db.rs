use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use crate::model::attendance::AttendancePunch;
use crate::model::holiday::Holiday;
use crate::model::leave_request::{LeaveInterval, LeaveRow};

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Punches for the given employees inside `[start, end]`.
pub async fn fetch_punches(
    pool: &MySqlPool,
    employee_ids: &[u64],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<AttendancePunch>, sqlx::Error> {
    if employee_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = punches_sql(employee_ids.len());
    let mut query = sqlx::query_as::<_, AttendancePunch>(&sql);
    for id in employee_ids {
        query = query.bind(*id);
    }
    query.bind(start).bind(end).fetch_all(pool).await
}

/// Approved leave overlapping `[start, end]` for the given employees.
pub async fn fetch_approved_leave(
    pool: &MySqlPool,
    employee_ids: &[u64],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<LeaveInterval>, sqlx::Error> {
    if employee_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        r#"
        SELECT employee_id, start_date, end_date, status
        FROM leave_requests
        WHERE employee_id IN ({})
        AND status = 'approved'
        AND start_date <= ?
        AND end_date >= ?
        "#,
        placeholders(employee_ids.len())
    );

    let mut query = sqlx::query_as::<_, LeaveRow>(&sql);
    for id in employee_ids {
        query = query.bind(*id);
    }
    let rows = query.bind(end).bind(start).fetch_all(pool).await?;

    Ok(rows.into_iter().map(LeaveInterval::from).collect())
}

/// Holidays inside `[start, end]`. A deployment without a `holidays` table
/// gets an empty set so scoring still runs.
pub async fn fetch_holidays(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Holiday>, sqlx::Error> {
    let result = sqlx::query_as::<_, Holiday>(
        r#"
        SELECT date, name
        FROM holidays
        WHERE date BETWEEN ? AND ?
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await;

    match result {
        Err(sqlx::Error::Database(db_err)) if is_missing_table_code(db_err.code().as_deref()) => {
            tracing::warn!(error = %db_err, "holidays table missing; scoring without holidays");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// `check_in`/`check_out` are TIME columns; cast them so they decode as text.
fn punches_sql(n: usize) -> String {
    format!(
        r#"
        SELECT employee_id, date,
               CAST(check_in AS CHAR) AS check_in,
               CAST(check_out AS CHAR) AS check_out
        FROM attendance
        WHERE employee_id IN ({})
        AND date BETWEEN ? AND ?
        ORDER BY employee_id, date
        "#,
        placeholders(n)
    )
}

/// SQLSTATE 42S02: base table or view not found.
fn is_missing_table_code(code: Option<&str>) -> bool {
    code == Some("42S02")
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_list() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }

    #[test]
    fn punch_times_are_read_as_text() {
        let sql = punches_sql(2);
        assert!(sql.contains("CAST(check_in AS CHAR) AS check_in"));
        assert!(sql.contains("CAST(check_out AS CHAR) AS check_out"));
        assert!(sql.contains("employee_id IN (?, ?)"));
        assert!(!sql.contains("date, check_in, check_out"));
    }

    #[test]
    fn only_missing_table_errors_fall_back() {
        assert!(is_missing_table_code(Some("42S02")));
        assert!(!is_missing_table_code(Some("42000")));
        assert!(!is_missing_table_code(Some("23000")));
        assert!(!is_missing_table_code(None));
    }
}
