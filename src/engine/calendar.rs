use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::engine::error::EngineError;

/// Calendar classification of one day, before any employee data is looked at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalendarKind {
    Weekend,
    Holiday,
    Workday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub kind: CalendarKind,
}

/// First day of the month, or `InvalidRange` for a month outside 1..=12.
pub fn month_start(year: i32, month: u32) -> Result<NaiveDate, EngineError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        EngineError::InvalidRange(format!("month {} is not a valid month of {}", month, year))
    })
}

/// Last day of the month.
pub fn month_end(year: i32, month: u32) -> Result<NaiveDate, EngineError> {
    let first = month_start(year, month)?;
    Ok(first
        .iter_days()
        .take_while(|d| d.month() == month)
        .last()
        .unwrap_or(first))
}

/// Rejects ranges whose end precedes their start.
pub fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), EngineError> {
    if to < from {
        return Err(EngineError::InvalidRange(format!(
            "end date {} precedes start date {}",
            to, from
        )));
    }
    Ok(())
}

/// Validated `[first, last]` bounds of the month, ready for store queries.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), EngineError> {
    let from = month_start(year, month)?;
    let to = month_end(year, month)?;
    validate_range(from, to)?;
    Ok((from, to))
}

/// Classifies every day of the month in date order.
///
/// All date math happens on `NaiveDate`: one calendar convention for the
/// whole engine, so a timestamp stored near midnight can never shift a day
/// into the neighbouring classification.
pub fn resolve_month(
    year: i32,
    month: u32,
    holidays: &HashSet<NaiveDate>,
) -> Result<Vec<CalendarDay>, EngineError> {
    let first = month_start(year, month)?;
    Ok(first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| {
            let weekday = date.weekday();
            let kind = if matches!(weekday, Weekday::Sat | Weekday::Sun) {
                CalendarKind::Weekend
            } else if holidays.contains(&date) {
                CalendarKind::Holiday
            } else {
                CalendarKind::Workday
            };
            CalendarDay {
                date,
                weekday,
                kind,
            }
        })
        .collect())
}

pub fn working_day_count(days: &[CalendarDay]) -> u32 {
    days.iter()
        .filter(|d| d.kind == CalendarKind::Workday)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_is_fully_partitioned() {
        // June 2026: 30 days, 8 weekend days, 4 declared holidays on weekdays.
        let holidays: HashSet<NaiveDate> = [d(2026, 6, 1), d(2026, 6, 8), d(2026, 6, 15), d(2026, 6, 25)]
            .into_iter()
            .collect();
        let days = resolve_month(2026, 6, &holidays).unwrap();

        assert_eq!(days.len(), 30);
        let weekends = days.iter().filter(|d| d.kind == CalendarKind::Weekend).count();
        let hols = days.iter().filter(|d| d.kind == CalendarKind::Holiday).count();
        assert_eq!(weekends, 8);
        assert_eq!(hols, 4);
        assert_eq!(working_day_count(&days), 18);
    }

    #[test]
    fn holiday_on_weekend_stays_weekend() {
        // 2026-06-06 is a Saturday; the weekend rule wins.
        let holidays: HashSet<NaiveDate> = [d(2026, 6, 6)].into_iter().collect();
        let days = resolve_month(2026, 6, &holidays).unwrap();
        assert_eq!(days[5].date, d(2026, 6, 6));
        assert_eq!(days[5].kind, CalendarKind::Weekend);
    }

    #[test]
    fn december_ends_on_the_31st() {
        let days = resolve_month(2025, 12, &HashSet::new()).unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(days.last().unwrap().date, d(2025, 12, 31));
        assert_eq!(month_end(2025, 12).unwrap(), d(2025, 12, 31));
    }

    #[test]
    fn february_leap_year() {
        let days = resolve_month(2024, 2, &HashSet::new()).unwrap();
        assert_eq!(days.len(), 29);
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(matches!(
            resolve_month(2026, 13, &HashSet::new()),
            Err(EngineError::InvalidRange(_))
        ));
        assert!(matches!(
            resolve_month(2026, 0, &HashSet::new()),
            Err(EngineError::InvalidRange(_))
        ));
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let (from, to) = month_bounds(2026, 2).unwrap();
        assert_eq!(from, d(2026, 2, 1));
        assert_eq!(to, d(2026, 2, 28));
        assert!(month_bounds(2026, 14).is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            validate_range(d(2026, 2, 10), d(2026, 2, 1)),
            Err(EngineError::InvalidRange(_))
        ));
        assert!(validate_range(d(2026, 2, 1), d(2026, 2, 1)).is_ok());
    }
}
