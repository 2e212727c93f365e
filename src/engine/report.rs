use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::engine::anomaly::AnomalyPolicy;
use crate::engine::calendar;
use crate::engine::classify::{self, DayRecord, PresenceState};
use crate::engine::error::EngineError;
use crate::engine::scoring::{self, MonthlyScore};
use crate::engine::sessions::{self, DaySessions, SessionSlice};
use crate::model::employee::Employee;
use crate::model::leave::LeaveInterval;
use crate::model::session::AttendanceSession;

/// Single-employee monthly score: calendar, sessions and leave folded into
/// the gamified view. Pure projection: identical inputs give identical
/// output.
pub fn monthly_score(
    year: i32,
    month: u32,
    holiday_dates: &HashSet<NaiveDate>,
    session_rows: &[AttendanceSession],
    leaves: &[LeaveInterval],
    today: NaiveDate,
    policy: &AnomalyPolicy,
) -> Result<MonthlyScore, EngineError> {
    let days = classify_month(year, month, holiday_dates, session_rows, leaves, today, policy)?;
    Ok(scoring::score_month(year, month, days))
}

fn classify_month(
    year: i32,
    month: u32,
    holiday_dates: &HashSet<NaiveDate>,
    session_rows: &[AttendanceSession],
    leaves: &[LeaveInterval],
    today: NaiveDate,
    policy: &AnomalyPolicy,
) -> Result<Vec<DayRecord>, EngineError> {
    let month_days = calendar::resolve_month(year, month, holiday_dates)?;
    let by_day = sessions::aggregate(session_rows);
    Ok(month_days
        .iter()
        .map(|day| classify::classify_day(day, by_day.get(&day.date), leaves, today, policy))
        .collect())
}

/// Four-state status of the single-day team view, derived from check-in/out
/// presence only, coarser than `PresenceState`. No scoring behind it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Absent,
    Partial,
    Present,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamMemberDay {
    #[schema(example = 1000)]
    pub employee_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub morning: Option<SessionSlice>,
    pub afternoon: Option<SessionSlice>,
    pub total_minutes: i64,
    pub day_status: DayStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamDaySnapshot {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub members: Vec<TeamMemberDay>,
    pub present: u32,
    pub absent: u32,
    pub complete: u32,
}

fn day_status(day: &DaySessions) -> DayStatus {
    let morning_in = day.morning.as_ref().is_some_and(SessionSlice::has_check_in);
    let afternoon_in = day.afternoon.as_ref().is_some_and(SessionSlice::has_check_in);
    let morning_done = day.morning.as_ref().is_some_and(SessionSlice::is_complete);
    let afternoon_done = day.afternoon.as_ref().is_some_and(SessionSlice::is_complete);

    if !morning_in && !afternoon_in {
        DayStatus::Absent
    } else if morning_done && afternoon_done {
        DayStatus::Complete
    } else if morning_in && afternoon_in {
        DayStatus::Present
    } else {
        DayStatus::Partial
    }
}

/// One date, every supplied employee. The caller decides which employees are
/// in scope (active, role exclusions applied upstream).
pub fn team_day_snapshot(
    date: NaiveDate,
    employees: &[Employee],
    session_rows: &[AttendanceSession],
) -> TeamDaySnapshot {
    let mut rows_by_user: HashMap<u64, Vec<&AttendanceSession>> = HashMap::new();
    for row in session_rows.iter().filter(|r| r.date == date) {
        rows_by_user.entry(row.user_id).or_default().push(row);
    }

    let mut members = Vec::with_capacity(employees.len());
    let (mut present, mut absent, mut complete) = (0u32, 0u32, 0u32);

    for employee in employees {
        let day = rows_by_user
            .get(&employee.id)
            .and_then(|rows| sessions::aggregate(rows.iter().copied()).remove(&date))
            .unwrap_or_default();
        let status = day_status(&day);
        match status {
            DayStatus::Absent => absent += 1,
            DayStatus::Complete => {
                present += 1;
                complete += 1;
            }
            DayStatus::Partial | DayStatus::Present => present += 1,
        }
        members.push(TeamMemberDay {
            employee_id: employee.id,
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            total_minutes: day.total_minutes(),
            day_status: status,
            morning: day.morning,
            afternoon: day.afternoon,
        });
    }

    TeamDaySnapshot {
        date,
        members,
        present,
        absent,
        complete,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MemberMonthSummary {
    /// Full days count 1, partial days 0.5.
    #[schema(example = 17.5)]
    pub worked_days: f64,
    pub absent_days: u32,
    pub leave_days: u32,
    pub total_minutes: i64,
    pub anomalies: u32,
    /// `round((worked_days + leave_days) / working_days × 100)`.
    #[schema(example = 95)]
    pub attendance_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MemberMonth {
    #[schema(example = 1000)]
    pub employee_id: u64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = Object)]
    pub daily: BTreeMap<NaiveDate, DayRecord>,
    pub summary: MemberMonthSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamMonthGrid {
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    pub working_days: u32,
    pub members: Vec<MemberMonth>,
}

/// Full-month grid for every supplied employee: the calendar day list is
/// built once, then each employee is classified in a single pass over it.
pub fn team_month_grid(
    year: i32,
    month: u32,
    holiday_dates: &HashSet<NaiveDate>,
    employees: &[Employee],
    session_rows: &[AttendanceSession],
    leaves: &[LeaveInterval],
    today: NaiveDate,
    policy: &AnomalyPolicy,
) -> Result<TeamMonthGrid, EngineError> {
    let month_days = calendar::resolve_month(year, month, holiday_dates)?;
    let working_days = calendar::working_day_count(&month_days);

    let mut rows_by_user: HashMap<u64, Vec<&AttendanceSession>> = HashMap::new();
    for row in session_rows {
        rows_by_user.entry(row.user_id).or_default().push(row);
    }
    let mut leaves_by_user: HashMap<u64, Vec<&LeaveInterval>> = HashMap::new();
    for leave in leaves {
        leaves_by_user.entry(leave.user_id).or_default().push(leave);
    }
    let no_rows: Vec<&AttendanceSession> = Vec::new();

    let mut members = Vec::with_capacity(employees.len());
    for employee in employees {
        let user_rows = rows_by_user.get(&employee.id).unwrap_or(&no_rows);
        let by_day = sessions::aggregate(user_rows.iter().copied());
        let user_leaves: Vec<LeaveInterval> = leaves_by_user
            .get(&employee.id)
            .map(|ls| ls.iter().map(|l| (*l).clone()).collect())
            .unwrap_or_default();

        let mut daily = BTreeMap::new();
        let mut summary = MemberMonthSummary {
            worked_days: 0.0,
            absent_days: 0,
            leave_days: 0,
            total_minutes: 0,
            anomalies: 0,
            attendance_rate: 0,
        };

        for day in &month_days {
            let record = classify::classify_day(
                day,
                by_day.get(&day.date),
                &user_leaves,
                today,
                policy,
            );
            match record.presence {
                PresenceState::Full => summary.worked_days += 1.0,
                PresenceState::Partial => summary.worked_days += 0.5,
                PresenceState::Absent => summary.absent_days += 1,
                PresenceState::Leave => summary.leave_days += 1,
                PresenceState::Pending | PresenceState::NonWorkday => {}
            }
            summary.total_minutes += record.total_minutes;
            summary.anomalies += record.anomaly_count;
            daily.insert(record.date, record);
        }

        if working_days > 0 {
            let covered = summary.worked_days + f64::from(summary.leave_days);
            summary.attendance_rate =
                (covered / f64::from(working_days) * 100.0).round() as u32;
        }

        members.push(MemberMonth {
            employee_id: employee.id,
            employee_code: employee.employee_code.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            daily,
            summary,
        });
    }

    Ok(TeamMonthGrid {
        year,
        month,
        working_days,
        members,
    })
}
