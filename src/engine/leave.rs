use chrono::NaiveDate;

use crate::model::leave::{LEAVE_STATUS_APPROVED, LeaveInterval};

/// Returns the approved interval covering `date`, if any.
///
/// Containment is inclusive on both ends: day-level comparison of
/// `start_date <= date <= end_date`, the normalized form of
/// `start 00:00:00 <= d <= end 23:59:59`. Non-approved rows are ignored
/// even if the fetch layer let one through.
pub fn leave_on(intervals: &[LeaveInterval], date: NaiveDate) -> Option<&LeaveInterval> {
    intervals.iter().find(|l| {
        l.status.eq_ignore_ascii_case(LEAVE_STATUS_APPROVED)
            && l.start_date <= date
            && date <= l.end_date
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, day).unwrap()
    }

    fn interval(start: u32, end: u32, status: &str) -> LeaveInterval {
        LeaveInterval {
            id: 1,
            user_id: 1000,
            start_date: d(start),
            end_date: d(end),
            leave_type: "annual".to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let intervals = vec![interval(6, 10, "approved")];
        assert!(leave_on(&intervals, d(6)).is_some());
        assert!(leave_on(&intervals, d(8)).is_some());
        assert!(leave_on(&intervals, d(10)).is_some());
        assert!(leave_on(&intervals, d(5)).is_none());
        assert!(leave_on(&intervals, d(11)).is_none());
    }

    #[test]
    fn single_day_interval() {
        let intervals = vec![interval(15, 15, "approved")];
        assert_eq!(
            leave_on(&intervals, d(15)).map(|l| l.leave_type.as_str()),
            Some("annual")
        );
    }

    #[test]
    fn pending_interval_does_not_cover() {
        let intervals = vec![interval(6, 10, "pending")];
        assert!(leave_on(&intervals, d(8)).is_none());
    }
}
