use anyhow::Result;
use chrono::{Datelike, Utc};
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::Arc;
use std::time::Duration;

use crate::model::holiday::Holiday;

/// Holiday lists are tiny and change at most a few times a year; cache them
/// per year so month and team queries do not re-read the table on every
/// request.
pub static HOLIDAY_CACHE: Lazy<Cache<i32, Arc<Vec<Holiday>>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(16)
        .time_to_live(Duration::from_secs(3600)) // 1h TTL
        .build()
});

async fn fetch_year(pool: &MySqlPool, year: i32) -> Result<Vec<Holiday>, sqlx::Error> {
    sqlx::query_as::<_, Holiday>(
        "SELECT id, date, name, year FROM holidays WHERE year = ? ORDER BY date",
    )
    .bind(year)
    .fetch_all(pool)
    .await
}

/// Read-through lookup. A failed fetch propagates to the caller; it is never
/// replaced with an empty list, since missing holidays would silently turn
/// non-working days into absences.
pub async fn holidays_for_year(
    pool: &MySqlPool,
    year: i32,
) -> Result<Arc<Vec<Holiday>>, sqlx::Error> {
    if let Some(cached) = HOLIDAY_CACHE.get(&year).await {
        return Ok(cached);
    }
    let fresh = Arc::new(fetch_year(pool, year).await?);
    HOLIDAY_CACHE.insert(year, fresh.clone()).await;
    Ok(fresh)
}

/// Preload the current and adjacent years at startup.
pub async fn warmup_holiday_cache(pool: &MySqlPool) -> Result<()> {
    let current = Utc::now().year();
    let years = [current - 1, current, current + 1];

    let mut loaded = Vec::with_capacity(years.len());
    for year in years {
        let rows = fetch_year(pool, year).await?;
        loaded.push((year, Arc::new(rows)));
    }

    // Await all insertions concurrently
    futures::future::join_all(
        loaded
            .into_iter()
            .map(|(year, rows)| HOLIDAY_CACHE.insert(year, rows)),
    )
    .await;

    tracing::info!(?years, "Holiday cache warmed");
    Ok(())
}
