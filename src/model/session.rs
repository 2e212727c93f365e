use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Half-day slot a session row belongs to. Stored as a plain string column
/// by the session recorder.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionType {
    Morning,
    Afternoon,
}

/// Raw half-day attendance row as persisted by the session recorder.
/// Read-only input: this service never writes to the table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceSession {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub user_id: u64,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    /// "MORNING" or "AFTERNOON"; rows with any other value are ignored.
    #[schema(example = "MORNING")]
    pub session_type: String,

    #[schema(example = "2026-01-05T08:58:12", value_type = String, format = "date-time", nullable = true)]
    pub check_in: Option<NaiveDateTime>,

    /// Null while the session is still in progress.
    #[schema(example = "2026-01-05T12:30:00", value_type = String, format = "date-time", nullable = true)]
    pub check_out: Option<NaiveDateTime>,

    /// Computed by the recorder at check-out time; null before check-out.
    #[schema(example = 212, nullable = true)]
    pub duration_minutes: Option<i64>,

    /// Duration anomaly flag set by the recorder (too short / too long).
    /// Consumed unchanged, never recomputed here.
    pub anomaly_detected: bool,

    #[schema(example = "Durée de session anormale: 12 min", nullable = true)]
    pub anomaly_reason: Option<String>,
}
