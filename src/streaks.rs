//! Streak computation.
//!
//! Scans every day from the habit's creation through `today`, marks the days
//! whose trailing `range`-day window holds at least `frequency` completions,
//! adds skipped days, and folds the result into inclusive intervals. An
//! interval's start is backdated by `range - 1` days so it covers the window
//! that first satisfied the cadence.

use crate::errors::EngineError;
use crate::models::{HabitConfig, StreakInterval, TrackerRecord, TrackerStatus, days_before};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;
use tracing::debug;

pub fn compute_streaks(
    config: &HabitConfig,
    records: &[TrackerRecord],
    today: NaiveDate,
) -> Result<Vec<StreakInterval>, EngineError> {
    validate(config)?;

    let mut completed = BTreeSet::new();
    let mut skipped = BTreeSet::new();
    for record in in_domain(config, records) {
        match record.status {
            TrackerStatus::Completed => {
                completed.insert(record.dated);
            }
            TrackerStatus::Skipped => {
                skipped.insert(record.dated);
            }
            TrackerStatus::NotCompleted => {}
        }
    }

    let mut streak_days = compliant_days(config, &completed, today);
    streak_days.extend(skipped);

    let intervals = merge_days(&streak_days, config.range);
    debug!(
        created = %config.created_date,
        %today,
        streak_days = streak_days.len(),
        intervals = intervals.len(),
        "computed streaks"
    );
    Ok(intervals)
}

pub fn validate(config: &HabitConfig) -> Result<(), EngineError> {
    if config.frequency < 1 || config.range < 1 {
        return Err(EngineError::InvalidConfig {
            frequency: config.frequency,
            range: config.range,
        });
    }
    Ok(())
}

/// Records dated before the habit existed are outside the computation.
pub(crate) fn in_domain<'a>(
    config: &'a HabitConfig,
    records: &'a [TrackerRecord],
) -> impl Iterator<Item = &'a TrackerRecord> + 'a {
    records
        .iter()
        .filter(move |record| record.dated >= config.created_date)
}

/// Days in `[created_date, today]` whose trailing window holds enough completions.
fn compliant_days(
    config: &HabitConfig,
    completed: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) -> BTreeSet<NaiveDate> {
    let mut days = BTreeSet::new();
    if today < config.created_date {
        return days;
    }

    let span = (today - config.created_date).num_days() as usize + 1;
    let mut hits = vec![false; span];
    for date in completed.range(config.created_date..=today) {
        hits[(*date - config.created_date).num_days() as usize] = true;
    }

    let range = config.range as usize;
    let mut in_window = 0u32;
    for offset in 0..span {
        if hits[offset] {
            in_window += 1;
        }
        if offset >= range && hits[offset - range] {
            in_window -= 1;
        }
        if in_window >= config.frequency {
            days.insert(config.created_date + Duration::days(offset as i64));
        }
    }
    days
}

fn merge_days(streak_days: &BTreeSet<NaiveDate>, range: u32) -> Vec<StreakInterval> {
    let mut intervals = Vec::new();
    let mut current: Option<StreakInterval> = None;

    for &day in streak_days {
        current = match current {
            Some(mut open) if (day - open.end_date).num_days() <= i64::from(range) => {
                open.end_date = day;
                Some(open)
            }
            previous => {
                intervals.extend(previous);
                Some(StreakInterval {
                    start_date: days_before(day, range - 1),
                    end_date: day,
                })
            }
        };
    }

    intervals.extend(current);
    intervals
}
