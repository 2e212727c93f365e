use chrono::NaiveTime;

use crate::engine::sessions::SessionSlice;
use crate::model::session::SessionType;

/// Late-arrival thresholds. Policy, not physics: tunable through `Config`.
#[derive(Debug, Clone)]
pub struct AnomalyPolicy {
    pub morning_late_after: NaiveTime,
    pub afternoon_late_after: NaiveTime,
}

impl Default for AnomalyPolicy {
    fn default() -> Self {
        Self {
            morning_late_after: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            afternoon_late_after: NaiveTime::from_hms_opt(13, 10, 0).unwrap(),
        }
    }
}

/// Anomaly reasons for one session slice. Nothing runs until a check-in
/// exists. Late arrival is detected here; the recorder's own duration flag
/// (too short / too long, computed at check-out) is carried through
/// unchanged. Anomalies never change the day's presence state.
pub fn detect(slice: &SessionSlice, session_type: SessionType, policy: &AnomalyPolicy) -> Vec<String> {
    let Some(check_in) = slice.check_in else {
        return Vec::new();
    };

    let mut reasons = Vec::new();
    let (label, threshold) = match session_type {
        SessionType::Morning => ("Matin", policy.morning_late_after),
        SessionType::Afternoon => ("Après-midi", policy.afternoon_late_after),
    };

    let arrived = check_in.time();
    if arrived > threshold {
        // Report whole minutes, rounded up so a 30-second slip reads "+1 min".
        let late_minutes = ((arrived - threshold).num_seconds() + 59) / 60;
        reasons.push(format!(
            "{} retard: arrivée à {} (+{} min)",
            label,
            arrived.format("%H:%M"),
            late_minutes
        ));
    }

    if slice.anomaly {
        reasons.push(
            slice
                .anomaly_reason
                .clone()
                .unwrap_or_else(|| "Durée de session anormale".to_string()),
        );
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn slice(check_in: Option<NaiveDateTime>) -> SessionSlice {
        SessionSlice {
            check_in,
            check_out: None,
            duration_minutes: None,
            anomaly: false,
            anomaly_reason: None,
        }
    }

    #[test]
    fn morning_late_arrival_is_flagged() {
        let reasons = detect(&slice(Some(at(9, 7))), SessionType::Morning, &AnomalyPolicy::default());
        assert_eq!(reasons, vec!["Matin retard: arrivée à 09:07 (+2 min)".to_string()]);
    }

    #[test]
    fn on_time_morning_is_clean() {
        // Exactly at the threshold is not late.
        let reasons = detect(&slice(Some(at(9, 5))), SessionType::Morning, &AnomalyPolicy::default());
        assert!(reasons.is_empty());
        let reasons = detect(&slice(Some(at(8, 45))), SessionType::Morning, &AnomalyPolicy::default());
        assert!(reasons.is_empty());
    }

    #[test]
    fn afternoon_threshold_differs_from_morning() {
        let policy = AnomalyPolicy::default();
        assert!(detect(&slice(Some(at(13, 8))), SessionType::Afternoon, &policy).is_empty());
        let reasons = detect(&slice(Some(at(13, 25))), SessionType::Afternoon, &policy);
        assert_eq!(reasons, vec!["Après-midi retard: arrivée à 13:25 (+15 min)".to_string()]);
    }

    #[test]
    fn recorder_duration_flag_is_carried_through() {
        let mut s = slice(Some(at(8, 50)));
        s.anomaly = true;
        s.anomaly_reason = Some("Durée de session anormale: 12 min".to_string());
        let reasons = detect(&s, SessionType::Morning, &AnomalyPolicy::default());
        assert_eq!(reasons, vec!["Durée de session anormale: 12 min".to_string()]);
    }

    #[test]
    fn late_and_duration_flag_stack() {
        let mut s = slice(Some(at(9, 10)));
        s.anomaly = true;
        let reasons = detect(&s, SessionType::Morning, &AnomalyPolicy::default());
        assert_eq!(reasons.len(), 2);
        assert!(reasons[0].contains("+5 min"));
    }

    #[test]
    fn no_check_in_no_anomaly() {
        let mut s = slice(None);
        s.anomaly = true;
        assert!(detect(&s, SessionType::Morning, &AnomalyPolicy::default()).is_empty());
    }
}
