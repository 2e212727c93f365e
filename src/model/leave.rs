use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const LEAVE_STATUS_APPROVED: &str = "approved";

/// Approved-leave row produced by the leave ledger. Only `status = approved`
/// rows take part in reconciliation; the fetch layer already filters on it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveInterval {
    pub id: u64,
    pub user_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: String,
    pub status: String,
}
