use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::calendar::CalendarKind;
use crate::engine::classify::{DayRecord, PresenceState};

pub const POINTS_FULL_DAY: i64 = 10;
pub const POINTS_PARTIAL_DAY: i64 = 5;
pub const POINTS_ABSENCE: i64 = -10;
pub const POINTS_PER_ANOMALY: i64 = -2;

/// Accumulator carried across the date-ordered fold. One `step` per day
/// keeps every transition independently testable.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreAcc {
    pub presence: i64,
    pub absence: i64,
    pub late: i64,
    pub streak_bonus: i64,
    pub current_streak: u32,
    pub best_streak: u32,
    pub days_present: u32,
    pub days_absent: u32,
    pub days_late: u32,
}

impl ScoreAcc {
    /// Applies one day. Only workdays move the accumulator; leave days earn
    /// nothing but leave the streak intact, and pending days are not due yet.
    pub fn step(mut self, day: &DayRecord) -> Self {
        if day.kind != CalendarKind::Workday {
            return self;
        }
        match day.presence {
            PresenceState::Full => {
                self.presence += POINTS_FULL_DAY;
                self.days_present += 1;
                if day.anomaly_count == 0 {
                    self.current_streak += 1;
                    // The bonus is the streak length after this day: the 5th
                    // consecutive clean day is worth +5.
                    self.streak_bonus += i64::from(self.current_streak);
                } else {
                    self.current_streak = 0;
                }
            }
            PresenceState::Partial => {
                self.presence += POINTS_PARTIAL_DAY;
                self.days_present += 1;
                self.current_streak = 0;
            }
            PresenceState::Absent => {
                self.absence += POINTS_ABSENCE;
                self.days_absent += 1;
                self.current_streak = 0;
            }
            PresenceState::Leave | PresenceState::Pending | PresenceState::NonWorkday => {}
        }
        if day.anomaly_count > 0 {
            self.late += POINTS_PER_ANOMALY * i64::from(day.anomaly_count);
            self.days_late += 1;
        }
        self.best_streak = self.best_streak.max(self.current_streak);
        self
    }

    pub fn total(&self) -> i64 {
        self.presence + self.absence + self.late + self.streak_bonus
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreBreakdown {
    pub presence: i64,
    pub absence: i64,
    pub late: i64,
    pub streak_bonus: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreStats {
    pub days_present: u32,
    pub days_absent: u32,
    pub days_late: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyScore {
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: u32,
    pub total_points: i64,
    pub max_possible_points: i64,
    #[schema(example = 87)]
    pub score_percent: u32,
    #[schema(example = "Très bien")]
    pub level: String,
    pub breakdown: ScoreBreakdown,
    pub stats: ScoreStats,
    pub daily_breakdown: Vec<DayRecord>,
}

/// Ceiling for `n` workdays: every day full, zero anomalies, and a streak
/// growing from day 1: `10n + n(n+1)/2`. Weekends interrupt real streaks
/// but not this formula, so 100% is a relative yardstick, not a target.
pub fn max_possible_points(workdays: u32) -> i64 {
    let n = i64::from(workdays);
    POINTS_FULL_DAY * n + n * (n + 1) / 2
}

pub fn level_label(percent: u32) -> &'static str {
    match percent {
        p if p >= 90 => "Excellent",
        p if p >= 75 => "Très bien",
        p if p >= 60 => "Bien",
        p if p >= 40 => "À améliorer",
        _ => "Insuffisant",
    }
}

/// Folds the classified month into the gamified score view.
pub fn score_month(year: i32, month: u32, days: Vec<DayRecord>) -> MonthlyScore {
    let acc = days.iter().fold(ScoreAcc::default(), ScoreAcc::step);
    let workdays = days
        .iter()
        .filter(|d| d.kind == CalendarKind::Workday)
        .count() as u32;
    let max_points = max_possible_points(workdays);
    let total = acc.total();
    let score_percent = if max_points > 0 {
        (total as f64 / max_points as f64 * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };

    MonthlyScore {
        year,
        month,
        total_points: total,
        max_possible_points: max_points,
        score_percent,
        level: level_label(score_percent).to_string(),
        breakdown: ScoreBreakdown {
            presence: acc.presence,
            absence: acc.absence,
            late: acc.late,
            streak_bonus: acc.streak_bonus,
        },
        stats: ScoreStats {
            days_present: acc.days_present,
            days_absent: acc.days_absent,
            days_late: acc.days_late,
            current_streak: acc.current_streak,
            best_streak: acc.best_streak,
        },
        daily_breakdown: days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calendar::CalendarKind;
    use chrono::NaiveDate;

    fn day(n: u32, kind: CalendarKind, presence: PresenceState, anomalies: u32) -> DayRecord {
        DayRecord {
            date: NaiveDate::from_ymd_opt(2026, 3, n).unwrap(),
            day_of_week: "Mon".to_string(),
            kind,
            morning: None,
            afternoon: None,
            presence,
            leave_type: None,
            anomalies: (0..anomalies).map(|i| format!("anomalie {}", i)).collect(),
            anomaly_count: anomalies,
            total_minutes: 0,
        }
    }

    fn full(n: u32) -> DayRecord {
        day(n, CalendarKind::Workday, PresenceState::Full, 0)
    }

    #[test]
    fn five_clean_days_earn_sixty_five() {
        let days: Vec<_> = (2..=6).map(full).collect();
        let score = score_month(2026, 3, days);
        // 5×10 presence + (1+2+3+4+5) streak bonus
        assert_eq!(score.total_points, 65);
        assert_eq!(score.breakdown.streak_bonus, 15);
        assert_eq!(score.stats.best_streak, 5);
        assert_eq!(score.score_percent, 100);
        assert_eq!(score.level, "Excellent");
    }

    #[test]
    fn absence_costs_ten_and_resets_streak() {
        let mut days: Vec<_> = (2..=6).map(full).collect();
        days.push(day(9, CalendarKind::Workday, PresenceState::Absent, 0));
        let score = score_month(2026, 3, days);
        assert_eq!(score.total_points, 55);
        assert_eq!(score.stats.current_streak, 0);
        assert_eq!(score.stats.best_streak, 5);
        assert_eq!(score.stats.days_absent, 1);
    }

    #[test]
    fn partial_day_breaks_streak_even_without_anomaly() {
        let days = vec![
            full(2),
            full(3),
            day(4, CalendarKind::Workday, PresenceState::Partial, 0),
            full(5),
        ];
        let score = score_month(2026, 3, days);
        // 10+1, 10+2, 5, 10+1
        assert_eq!(score.total_points, 39);
        assert_eq!(score.stats.current_streak, 1);
        assert_eq!(score.stats.best_streak, 2);
    }

    #[test]
    fn anomalous_full_day_keeps_base_points_but_resets_streak() {
        let days = vec![
            full(2),
            day(3, CalendarKind::Workday, PresenceState::Full, 1),
            full(4),
        ];
        let score = score_month(2026, 3, days);
        // 10+1, 10−2, 10+1
        assert_eq!(score.total_points, 30);
        assert_eq!(score.breakdown.late, -2);
        assert_eq!(score.stats.days_late, 1);
        assert_eq!(score.stats.best_streak, 1);
    }

    #[test]
    fn two_anomalies_one_day_cost_four() {
        let days = vec![day(2, CalendarKind::Workday, PresenceState::Full, 2)];
        let score = score_month(2026, 3, days);
        assert_eq!(score.breakdown.late, -4);
        assert_eq!(score.stats.days_late, 1);
    }

    #[test]
    fn leave_earns_nothing_and_keeps_streak() {
        let days = vec![
            full(2),
            full(3),
            day(4, CalendarKind::Workday, PresenceState::Leave, 0),
            full(5),
        ];
        let score = score_month(2026, 3, days);
        // 10+1, 10+2, leave, 10+3: streak survives the leave day
        assert_eq!(score.total_points, 36);
        assert_eq!(score.stats.days_absent, 0);
        assert_eq!(score.stats.best_streak, 3);
    }

    #[test]
    fn non_workdays_and_pending_days_are_inert() {
        let days = vec![
            full(2),
            day(7, CalendarKind::Weekend, PresenceState::NonWorkday, 0),
            day(23, CalendarKind::Workday, PresenceState::Pending, 0),
        ];
        let score = score_month(2026, 3, days);
        assert_eq!(score.total_points, 11);
        // Ceiling still counts the pending workday, not the weekend.
        assert_eq!(score.max_possible_points, max_possible_points(2));
    }

    #[test]
    fn max_possible_formula() {
        assert_eq!(max_possible_points(0), 0);
        assert_eq!(max_possible_points(1), 11);
        // 10N + N(N+1)/2
        assert_eq!(max_possible_points(18), 180 + 171);
        assert_eq!(max_possible_points(22), 220 + 253);
    }

    #[test]
    fn negative_total_clamps_to_zero_percent() {
        let days: Vec<_> = (2..=6)
            .map(|n| day(n, CalendarKind::Workday, PresenceState::Absent, 0))
            .collect();
        let score = score_month(2026, 3, days);
        assert_eq!(score.total_points, -50);
        assert_eq!(score.score_percent, 0);
        assert_eq!(score.level, "Insuffisant");
    }

    #[test]
    fn level_bands() {
        assert_eq!(level_label(95), "Excellent");
        assert_eq!(level_label(90), "Excellent");
        assert_eq!(level_label(89), "Très bien");
        assert_eq!(level_label(75), "Très bien");
        assert_eq!(level_label(60), "Bien");
        assert_eq!(level_label(40), "À améliorer");
        assert_eq!(level_label(39), "Insuffisant");
    }

    #[test]
    fn scoring_is_deterministic() {
        let days: Vec<_> = (2..=6).map(full).collect();
        let a = score_month(2026, 3, days.clone());
        let b = score_month(2026, 3, days);
        assert_eq!(a, b);
    }
}
