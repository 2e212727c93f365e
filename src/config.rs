use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

use crate::engine::anomaly::AnomalyPolicy;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_reports_per_min: u32,
    pub rate_team_per_min: u32,

    // Late-arrival thresholds fed to the anomaly detector
    pub morning_late_after: NaiveTime,
    pub afternoon_late_after: NaiveTime,

    /// Default roles excluded from team views when the request does not
    /// supply its own exclusion set.
    pub team_exclude_roles: Vec<String>,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            rate_reports_per_min: env::var("RATE_REPORTS_PER_MIN")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap(),
            rate_team_per_min: env::var("RATE_TEAM_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),

            morning_late_after: env_time("MORNING_LATE_AFTER", "09:05:00"),
            afternoon_late_after: env_time("AFTERNOON_LATE_AFTER", "13:10:00"),

            team_exclude_roles: env::var("TEAM_EXCLUDE_ROLES")
                .unwrap_or_else(|_| "admin,rh".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    pub fn anomaly_policy(&self) -> AnomalyPolicy {
        AnomalyPolicy {
            morning_late_after: self.morning_late_after,
            afternoon_late_after: self.afternoon_late_after,
        }
    }
}

fn env_time(key: &str, default: &str) -> NaiveTime {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M:%S").unwrap()
}
