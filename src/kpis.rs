use crate::errors::EngineError;
use crate::models::{
    HabitConfig, HabitReport, KpiSummary, StreakInterval, TrackerRecord, TrackerStatus, days_before,
};
use crate::streaks::{compute_streaks, in_domain};
use chrono::NaiveDate;

const RATE_WINDOW_DAYS: u32 = 30;

/// Streaks and KPIs for one habit in a single pass over its history.
pub fn summarize(
    config: &HabitConfig,
    records: &[TrackerRecord],
    today: NaiveDate,
) -> Result<HabitReport, EngineError> {
    let streaks = compute_streaks(config, records, today)?;
    let kpis = compute_kpis(config, &streaks, records, today);
    Ok(HabitReport { streaks, kpis })
}

/// Derives the KPI summary. Never fails: empty streaks and empty history give zeros.
pub fn compute_kpis(
    config: &HabitConfig,
    streaks: &[StreakInterval],
    records: &[TrackerRecord],
    today: NaiveDate,
) -> KpiSummary {
    let longest_streak = streaks
        .iter()
        .map(StreakInterval::length_days)
        .max()
        .unwrap_or(0);

    let current_streak = match streaks.last() {
        Some(last) if last.end_date >= today => last.length_days(),
        _ => 0,
    };

    let window_start = days_before(today, RATE_WINDOW_DAYS - 1);
    let mut total_completions = 0u32;
    let mut recent_completions = 0u32;
    let mut last_completed_date: Option<NaiveDate> = None;

    for record in in_domain(config, records) {
        if record.status != TrackerStatus::Completed {
            continue;
        }
        total_completions = total_completions.saturating_add(1);
        if record.dated >= window_start && record.dated <= today {
            recent_completions += 1;
        }
        last_completed_date = last_completed_date.max(Some(record.dated));
    }

    let days_elapsed = (today - config.created_date).num_days();
    let overall_completion_rate = if days_elapsed <= 0 {
        0.0
    } else {
        percentage(f64::from(total_completions), days_elapsed as f64)
    };

    KpiSummary {
        current_streak,
        longest_streak,
        total_completions,
        thirty_day_completion_rate: percentage(
            f64::from(recent_completions),
            f64::from(RATE_WINDOW_DAYS),
        ),
        overall_completion_rate,
        last_completed_date,
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    (part / whole * 100.0).clamp(0.0, 100.0)
}
