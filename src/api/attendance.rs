use std::collections::HashSet;

use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::api::employee::{fetch_active_employees, fetch_employee};
use crate::config::Config;
use crate::engine::calendar;
use crate::engine::error::EngineError;
use crate::engine::report;
use crate::model::leave::LeaveInterval;
use crate::model::session::AttendanceSession;
use crate::utils::holiday_cache;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ScorePeriod {
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TeamDayQuery {
    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    #[param(example = "2026-03-02", value_type = String, format = "date")]
    pub date: NaiveDate,
    /// Comma-separated roles excluded from the team view.
    /// Defaults to the configured set (admin + RH).
    #[schema(example = "admin,rh")]
    pub exclude_roles: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TeamMonthQuery {
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    /// Comma-separated roles excluded from the team view.
    /// Defaults to the configured set (admin + RH).
    #[schema(example = "admin,rh")]
    pub exclude_roles: Option<String>,
}

fn exclusion_set(param: Option<&str>, config: &Config) -> Vec<String> {
    match param {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => config.team_exclude_roles.clone(),
    }
}

async fn fetch_sessions(
    pool: &MySqlPool,
    user_id: Option<u64>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<AttendanceSession>, sqlx::Error> {
    let mut sql = String::from(
        "SELECT id, user_id, date, session_type, check_in, check_out, \
         duration_minutes, anomaly_detected, anomaly_reason \
         FROM attendance_sessions WHERE date BETWEEN ? AND ?",
    );
    if user_id.is_some() {
        sql.push_str(" AND user_id = ?");
    }
    sql.push_str(" ORDER BY date, session_type, check_in");

    let mut query = sqlx::query_as::<_, AttendanceSession>(&sql).bind(from).bind(to);
    if let Some(id) = user_id {
        query = query.bind(id);
    }
    query.fetch_all(pool).await
}

/// Approved intervals overlapping `[from, to]`. Status is filtered here so
/// pending/rejected requests never reach the engine.
async fn fetch_approved_leaves(
    pool: &MySqlPool,
    user_id: Option<u64>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<LeaveInterval>, sqlx::Error> {
    let mut sql = String::from(
        "SELECT id, user_id, start_date, end_date, leave_type, status \
         FROM leave_requests \
         WHERE status = 'approved' AND start_date <= ? AND end_date >= ?",
    );
    if user_id.is_some() {
        sql.push_str(" AND user_id = ?");
    }

    let mut query = sqlx::query_as::<_, LeaveInterval>(&sql).bind(to).bind(from);
    if let Some(id) = user_id {
        query = query.bind(id);
    }
    query.fetch_all(pool).await
}

async fn holiday_dates(
    pool: &MySqlPool,
    year: i32,
) -> Result<HashSet<NaiveDate>, sqlx::Error> {
    let holidays = holiday_cache::holidays_for_year(pool, year).await?;
    Ok(holidays.iter().map(|h| h.date).collect())
}

/// Monthly attendance score for one employee
#[utoipa::path(
    get,
    path = "/api/v1/attendance/score/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee whose month is scored"),
        ScorePeriod
    ),
    responses(
        (status = 200, description = "Monthly score", body = crate::engine::scoring::MonthlyScore),
        (status = 400, description = "Invalid year/month", body = Object, example = json!({
            "message": "invalid range: month 13 is not a valid month of 2026"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn monthly_score(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    query: web::Query<ScorePeriod>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let (year, month) = (query.year, query.month);

    let (from, to) = match calendar::month_bounds(year, month) {
        Ok(bounds) => bounds,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(json!({ "message": e.to_string() })));
        }
    };

    let employee = fetch_employee(pool.get_ref(), employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;
    if employee.is_none() {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    let sessions = fetch_sessions(pool.get_ref(), Some(employee_id), from, to)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch attendance sessions");
            ErrorInternalServerError("Internal Server Error")
        })?;
    let leaves = fetch_approved_leaves(pool.get_ref(), Some(employee_id), from, to)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch approved leaves");
            ErrorInternalServerError("Internal Server Error")
        })?;
    let holidays = holiday_dates(pool.get_ref(), year).await.map_err(|e| {
        error!(error = %e, year, "Failed to fetch holidays");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let today = Utc::now().date_naive();
    match report::monthly_score(
        year,
        month,
        &holidays,
        &sessions,
        &leaves,
        today,
        &config.anomaly_policy(),
    ) {
        Ok(score) => Ok(HttpResponse::Ok().json(score)),
        Err(EngineError::InvalidRange(msg)) => {
            Ok(HttpResponse::BadRequest().json(json!({ "message": msg })))
        }
        Err(e) => {
            error!(error = %e, employee_id, "Monthly score computation failed");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}

/// Team snapshot for a single day
#[utoipa::path(
    get,
    path = "/api/v1/attendance/team/day",
    params(TeamDayQuery),
    responses(
        (status = 200, description = "Per-employee presence for the date", body = crate::engine::report::TeamDaySnapshot),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn team_day(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<TeamDayQuery>,
) -> actix_web::Result<impl Responder> {
    let exclude_roles = exclusion_set(query.exclude_roles.as_deref(), &config);

    let employees = fetch_active_employees(pool.get_ref(), &exclude_roles)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch active employees");
            ErrorInternalServerError("Internal Server Error")
        })?;
    let sessions = fetch_sessions(pool.get_ref(), None, query.date, query.date)
        .await
        .map_err(|e| {
            error!(error = %e, date = %query.date, "Failed to fetch attendance sessions");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let snapshot = report::team_day_snapshot(query.date, &employees, &sessions);
    Ok(HttpResponse::Ok().json(snapshot))
}

/// Team grid for a full month
#[utoipa::path(
    get,
    path = "/api/v1/attendance/team/month",
    params(TeamMonthQuery),
    responses(
        (status = 200, description = "Per-employee daily cells and summaries", body = crate::engine::report::TeamMonthGrid),
        (status = 400, description = "Invalid year/month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn team_month(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<TeamMonthQuery>,
) -> actix_web::Result<impl Responder> {
    let (year, month) = (query.year, query.month);

    let (from, to) = match calendar::month_bounds(year, month) {
        Ok(bounds) => bounds,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(json!({ "message": e.to_string() })));
        }
    };

    let exclude_roles = exclusion_set(query.exclude_roles.as_deref(), &config);
    let employees = fetch_active_employees(pool.get_ref(), &exclude_roles)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch active employees");
            ErrorInternalServerError("Internal Server Error")
        })?;
    let sessions = fetch_sessions(pool.get_ref(), None, from, to).await.map_err(|e| {
        error!(error = %e, "Failed to fetch attendance sessions");
        ErrorInternalServerError("Internal Server Error")
    })?;
    let leaves = fetch_approved_leaves(pool.get_ref(), None, from, to)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch approved leaves");
            ErrorInternalServerError("Internal Server Error")
        })?;
    let holidays = holiday_dates(pool.get_ref(), year).await.map_err(|e| {
        error!(error = %e, year, "Failed to fetch holidays");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let today = Utc::now().date_naive();
    match report::team_month_grid(
        year,
        month,
        &holidays,
        &employees,
        &sessions,
        &leaves,
        today,
        &config.anomaly_policy(),
    ) {
        Ok(grid) => Ok(HttpResponse::Ok().json(grid)),
        Err(EngineError::InvalidRange(msg)) => {
            Ok(HttpResponse::BadRequest().json(json!({ "message": msg })))
        }
        Err(e) => {
            error!(error = %e, "Team month grid computation failed");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}
