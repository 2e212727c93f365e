use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Declared non-working day, independent of weekday.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Holiday {
    pub id: u64,
    pub date: NaiveDate,
    pub name: String,
    pub year: i32,
}
