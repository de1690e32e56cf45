use crate::ledger::Ledger;
use crate::models::{CategoryCount, DailyPoint, StatsResponse};
use crate::rolling_log::{RollingLog, WINDOW_DAYS};
use chrono::{Duration, NaiveDate};

pub fn build_stats(ledger: &Ledger) -> StatsResponse {
    build_stats_at(ledger.today(), ledger)
}

pub fn build_stats_at(today: NaiveDate, ledger: &Ledger) -> StatsResponse {
    let categories = ledger
        .category_breakdown()
        .into_iter()
        .map(|(name, value)| CategoryCount { name, value })
        .collect();

    StatsResponse {
        last_7_days: daily_series(today, ledger.rolling_log()),
        categories,
        total_habits: ledger.habits().len(),
        completed_today: ledger.completed().count(),
        longest_streak: ledger
            .habits()
            .iter()
            .map(|habit| habit.streak)
            .max()
            .unwrap_or(0),
    }
}

/// One point per day ending at `today`; days missing from the log are empty.
pub fn daily_series(today: NaiveDate, log: &RollingLog) -> Vec<DailyPoint> {
    let mut points = Vec::with_capacity(WINDOW_DAYS);
    for offset in (0..WINDOW_DAYS).rev() {
        let date = today - Duration::days(offset as i64);
        let values = log.get(date).cloned().unwrap_or_default();
        let total = values.values().map(|value| u64::from(*value)).sum();
        points.push(DailyPoint { date, values, total });
    }
    points
}
