use std::collections::{BTreeSet, HashMap};

use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::db;
use crate::model::attendance::AttendancePunch;
use crate::model::leave_request::LeaveInterval;
use crate::model::score::{AttendanceScoreSummary, DayScore};
use crate::scoring::{self, WorkCalendar, parse_check_in};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ScoreQuery {
    /// Employee to score; defaults to the caller's own record
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    /// First day of the range (inclusive)
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    #[param(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive)
    #[schema(example = "2026-01-31", format = "date", value_type = String)]
    #[param(value_type = String, format = "date")]
    pub end_date: NaiveDate,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AttendanceScoreResponse {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-31", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub summary: AttendanceScoreSummary,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DayBreakdownResponse {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-31", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub days: Vec<DayScore>,
    pub summary: AttendanceScoreSummary,
}

#[derive(Deserialize, ToSchema)]
pub struct BatchScoreRequest {
    #[schema(example = json!([1000, 1001]))]
    pub employee_ids: Vec<u64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-31", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BatchScoreResponse {
    pub data: Vec<AttendanceScoreResponse>,
}

/// Everything the engine needs for one request.
#[derive(Default)]
struct ScoringInputs {
    punches: Vec<AttendancePunch>,
    leave: Vec<LeaveInterval>,
    calendar: WorkCalendar,
}

fn check_range(config: &Config, start: NaiveDate, end: NaiveDate) -> actix_web::Result<()> {
    let days = (end - start).num_days() + 1;
    if days > config.max_range_days {
        return Err(actix_web::error::ErrorBadRequest(format!(
            "Date range may cover at most {} days",
            config.max_range_days
        )));
    }
    Ok(())
}

/// Reads punches, approved leave and holidays. An inverted range never hits
/// the database since it scores as empty anyway.
async fn load_inputs(
    pool: &MySqlPool,
    config: &Config,
    employee_ids: &[u64],
    start: NaiveDate,
    end: NaiveDate,
) -> actix_web::Result<ScoringInputs> {
    let mut inputs = ScoringInputs {
        calendar: WorkCalendar::new(config.weekend_policy(), []),
        ..Default::default()
    };
    if end < start {
        return Ok(inputs);
    }

    inputs.punches = db::fetch_punches(pool, employee_ids, start, end)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, ?employee_ids, "Failed to fetch attendance punches");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    inputs.leave = db::fetch_approved_leave(pool, employee_ids, start, end)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, ?employee_ids, "Failed to fetch approved leave");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let holidays = db::fetch_holidays(pool, start, end).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch holidays");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    inputs.calendar = WorkCalendar::new(config.weekend_policy(), holidays.into_iter().map(|h| h.date));

    warn_malformed_check_ins(&inputs.punches);

    Ok(inputs)
}

/// Bad clock data scores as zero; surface it so a human can audit.
fn warn_malformed_check_ins(punches: &[AttendancePunch]) {
    for punch in punches {
        let Some(raw) = punch.check_in.as_deref() else {
            continue;
        };
        if let Err(reason) = parse_check_in(raw) {
            tracing::warn!(
                employee_id = punch.employee_id,
                date = %punch.date,
                raw,
                %reason,
                "Unreadable check-in time, scoring day as absent"
            );
        }
    }
}

/// Attendance score for one employee over a date range
#[utoipa::path(
    get,
    path = "/api/attendance/score",
    params(ScoreQuery),
    responses(
        (status = 200, description = "Attendance score", body = AttendanceScoreResponse),
        (status = 400, description = "Date range too long"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn get_score(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<ScoreQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.scoped_employee(query.employee_id)?;
    check_range(&config, query.start_date, query.end_date)?;

    let inputs = load_inputs(
        pool.get_ref(),
        &config,
        &[employee_id],
        query.start_date,
        query.end_date,
    )
    .await?;

    let summary = scoring::compute_attendance_score(
        employee_id,
        query.start_date,
        query.end_date,
        &inputs.punches,
        &inputs.leave,
        &inputs.calendar,
        &config.check_in_policy(),
    );

    tracing::debug!(
        employee_id,
        requested_by = %auth.username,
        countable_days = summary.total_countable_days,
        percentage = summary.percentage,
        "Attendance score computed"
    );

    Ok(HttpResponse::Ok().json(AttendanceScoreResponse {
        employee_id,
        start_date: query.start_date,
        end_date: query.end_date,
        summary,
    }))
}

/// Day-by-day attendance breakdown with its summary
#[utoipa::path(
    get,
    path = "/api/attendance/score/days",
    params(ScoreQuery),
    responses(
        (status = 200, description = "Per-day attendance outcomes", body = DayBreakdownResponse),
        (status = 400, description = "Date range too long"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn get_score_days(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<ScoreQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.scoped_employee(query.employee_id)?;
    check_range(&config, query.start_date, query.end_date)?;

    let inputs = load_inputs(
        pool.get_ref(),
        &config,
        &[employee_id],
        query.start_date,
        query.end_date,
    )
    .await?;

    let days = scoring::score_breakdown(
        employee_id,
        query.start_date,
        query.end_date,
        &inputs.punches,
        &inputs.leave,
        &inputs.calendar,
        &config.check_in_policy(),
    );
    let summary = scoring::reconciler::summarize(days.iter().cloned());

    Ok(HttpResponse::Ok().json(DayBreakdownResponse {
        employee_id,
        start_date: query.start_date,
        end_date: query.end_date,
        days,
        summary,
    }))
}

/// Attendance scores for several employees (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/attendance/score/batch",
    request_body(
        content = BatchScoreRequest,
        description = "Employees and date range to score",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "One score per requested employee", body = BatchScoreResponse),
        (status = 400, description = "Too many employees or date range too long"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn batch_scores(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<BatchScoreRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let employee_ids: Vec<u64> = payload
        .employee_ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if employee_ids.len() > config.max_batch_employees {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": format!("At most {} employees per batch", config.max_batch_employees)
        })));
    }
    check_range(&config, payload.start_date, payload.end_date)?;

    let inputs = load_inputs(
        pool.get_ref(),
        &config,
        &employee_ids,
        payload.start_date,
        payload.end_date,
    )
    .await?;

    let data = score_each(
        &employee_ids,
        payload.start_date,
        payload.end_date,
        inputs,
        &config.check_in_policy(),
    );

    tracing::info!(
        employees = data.len(),
        requested_by = auth.user_id,
        "Batch attendance scores computed"
    );

    Ok(HttpResponse::Ok().json(BatchScoreResponse { data }))
}

/// Splits the shared inputs per employee and scores each one independently.
fn score_each(
    employee_ids: &[u64],
    start_date: NaiveDate,
    end_date: NaiveDate,
    inputs: ScoringInputs,
    policy: &scoring::CheckInPolicy,
) -> Vec<AttendanceScoreResponse> {
    let mut punches: HashMap<u64, Vec<AttendancePunch>> = HashMap::new();
    for punch in inputs.punches {
        punches.entry(punch.employee_id).or_default().push(punch);
    }
    let mut leave: HashMap<u64, Vec<LeaveInterval>> = HashMap::new();
    for interval in inputs.leave {
        leave.entry(interval.employee_id).or_default().push(interval);
    }

    employee_ids
        .iter()
        .map(|&employee_id| AttendanceScoreResponse {
            employee_id,
            start_date,
            end_date,
            summary: scoring::compute_attendance_score(
                employee_id,
                start_date,
                end_date,
                punches.get(&employee_id).map(Vec::as_slice).unwrap_or_default(),
                leave.get(&employee_id).map(Vec::as_slice).unwrap_or_default(),
                &inputs.calendar,
                policy,
            ),
        })
        .collect()
}
