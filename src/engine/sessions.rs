use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::session::{AttendanceSession, SessionType};

/// One half-day session reduced to what classification and scoring need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionSlice {
    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub check_in: Option<NaiveDateTime>,
    #[schema(value_type = String, format = "date-time", nullable = true)]
    pub check_out: Option<NaiveDateTime>,
    pub duration_minutes: Option<i64>,
    pub anomaly: bool,
    pub anomaly_reason: Option<String>,
}

impl SessionSlice {
    fn from_row(row: &AttendanceSession) -> Self {
        Self {
            check_in: row.check_in,
            check_out: row.check_out,
            duration_minutes: row.duration_minutes,
            anomaly: row.anomaly_detected,
            anomaly_reason: row.anomaly_reason.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_some()
    }

    pub fn has_check_in(&self) -> bool {
        self.check_in.is_some()
    }
}

/// Morning and afternoon slices for one calendar day. A slice exists only if
/// the recorder persisted a row for that slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DaySessions {
    pub morning: Option<SessionSlice>,
    pub afternoon: Option<SessionSlice>,
}

impl DaySessions {
    pub fn total_minutes(&self) -> i64 {
        [&self.morning, &self.afternoon]
            .into_iter()
            .flatten()
            .filter_map(|s| s.duration_minutes)
            .sum()
    }
}

/// Groups raw session rows into per-day morning/afternoon slices.
///
/// Concurrent check-in submissions can race to create duplicate rows for one
/// `(date, session_type)`; uniqueness is not assumed. The row with both
/// timestamps wins, and among equally complete rows the later check-in wins.
/// Rows with an unknown session type are skipped.
pub fn aggregate<'a, I>(rows: I) -> BTreeMap<NaiveDate, DaySessions>
where
    I: IntoIterator<Item = &'a AttendanceSession>,
{
    let mut out: BTreeMap<NaiveDate, DaySessions> = BTreeMap::new();
    for row in rows {
        let Ok(session_type) = SessionType::from_str(&row.session_type) else {
            tracing::debug!(row_id = row.id, session_type = %row.session_type, "Skipping row with unknown session type");
            continue;
        };
        let day = out.entry(row.date).or_default();
        let slot = match session_type {
            SessionType::Morning => &mut day.morning,
            SessionType::Afternoon => &mut day.afternoon,
        };
        let candidate = SessionSlice::from_row(row);
        *slot = Some(match slot.take() {
            Some(current) => pick_authoritative(current, candidate),
            None => candidate,
        });
    }
    out
}

fn pick_authoritative(current: SessionSlice, candidate: SessionSlice) -> SessionSlice {
    match (current.is_complete(), candidate.is_complete()) {
        (true, false) => current,
        (false, true) => candidate,
        // Option ordering puts None first, so a checked-in row beats an empty one.
        _ => {
            if candidate.check_in >= current.check_in {
                candidate
            } else {
                current
            }
        }
    }
}
