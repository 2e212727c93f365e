use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::engine::anomaly::{self, AnomalyPolicy};
use crate::engine::calendar::{CalendarDay, CalendarKind};
use crate::engine::leave::leave_on;
use crate::engine::sessions::{DaySessions, SessionSlice};
use crate::model::leave::LeaveInterval;
use crate::model::session::SessionType;

/// Classification of one employee's one day. Exactly one state applies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceState {
    Full,
    Partial,
    Absent,
    Leave,
    NonWorkday,
    /// Future workday with no sessions yet: not due, never counted absent.
    Pending,
}

/// Derived view of one day. Recomputed on every query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayRecord {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    /// Short weekday label ("Mon".."Sun").
    pub day_of_week: String,
    pub kind: CalendarKind,
    pub morning: Option<SessionSlice>,
    pub afternoon: Option<SessionSlice>,
    pub presence: PresenceState,
    pub leave_type: Option<String>,
    pub anomalies: Vec<String>,
    pub anomaly_count: u32,
    pub total_minutes: i64,
}

/// Combines calendar kind, leave overlay and session completeness into the
/// day's presence state.
///
/// Resolution order matters: leave is checked before sessions, so an
/// employee on approved leave with a stray session row is still `Leave`;
/// and a workday with no check-in is `Absent` only once `date <= today`.
pub fn classify_day(
    day: &CalendarDay,
    sessions: Option<&DaySessions>,
    leaves: &[LeaveInterval],
    today: NaiveDate,
    policy: &AnomalyPolicy,
) -> DayRecord {
    let mut record = DayRecord {
        date: day.date,
        day_of_week: day.weekday.to_string(),
        kind: day.kind,
        morning: None,
        afternoon: None,
        presence: PresenceState::NonWorkday,
        leave_type: None,
        anomalies: Vec::new(),
        anomaly_count: 0,
        total_minutes: 0,
    };

    if day.kind != CalendarKind::Workday {
        return record;
    }

    if let Some(leave) = leave_on(leaves, day.date) {
        record.presence = PresenceState::Leave;
        record.leave_type = Some(leave.leave_type.clone());
        return record;
    }

    if let Some(day_sessions) = sessions {
        record.morning = day_sessions.morning.clone();
        record.afternoon = day_sessions.afternoon.clone();
        record.total_minutes = day_sessions.total_minutes();
    }

    for (slot, session_type) in [
        (&record.morning, SessionType::Morning),
        (&record.afternoon, SessionType::Afternoon),
    ] {
        if let Some(slice) = slot {
            record
                .anomalies
                .extend(anomaly::detect(slice, session_type, policy));
        }
    }
    record.anomaly_count = record.anomalies.len() as u32;

    let morning_complete = record.morning.as_ref().is_some_and(SessionSlice::is_complete);
    let afternoon_complete = record.afternoon.as_ref().is_some_and(SessionSlice::is_complete);
    let any_check_in = record.morning.as_ref().is_some_and(SessionSlice::has_check_in)
        || record.afternoon.as_ref().is_some_and(SessionSlice::has_check_in);

    record.presence = if morning_complete && afternoon_complete {
        PresenceState::Full
    } else if any_check_in {
        PresenceState::Partial
    } else if day.date <= today {
        PresenceState::Absent
    } else {
        PresenceState::Pending
    };

    record
}
