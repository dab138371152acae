use crate::errors::{AppError, ReorderError};
use crate::models::{AppData, Habit, TrackerRecord};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs;
use tracing::error;

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

impl AppData {
    pub fn next_id(&mut self) -> u64 {
        self.next_habit_id += 1;
        self.next_habit_id
    }

    /// Position after every existing habit.
    pub fn next_sort_order(&self) -> u32 {
        self.habits
            .values()
            .map(|habit| habit.sort_order.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Inserts a new habit or replaces the stored one with the same id.
    pub fn insert_habit(&mut self, habit: Habit) {
        self.trackers.entry(habit.id).or_default();
        self.habits.insert(habit.id, habit);
    }

    pub fn habit(&self, id: u64) -> Option<&Habit> {
        self.habits.get(&id)
    }

    pub fn habits_in_display_order(&self) -> Vec<Habit> {
        let mut habits: Vec<Habit> = self.habits.values().cloned().collect();
        habits.sort_by_key(|habit| (habit.sort_order, habit.id));
        habits
    }

    /// Gives the listed habits ascending display positions in request order.
    /// Archived habits are not renumbered, and the slots of archived habits
    /// missing from the list stay reserved.
    pub fn reorder(&mut self, ids: &[u64]) -> Result<(), ReorderError> {
        if ids.is_empty() {
            return Err(ReorderError::Empty);
        }
        let requested: BTreeSet<u64> = ids.iter().copied().collect();
        if requested.len() != ids.len() {
            return Err(ReorderError::Duplicate);
        }
        let missing: Vec<u64> = ids
            .iter()
            .copied()
            .filter(|id| !self.habits.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(ReorderError::Unknown(missing));
        }

        let reserved: BTreeSet<u32> = self
            .habits
            .values()
            .filter(|habit| habit.archived && !requested.contains(&habit.id))
            .map(|habit| habit.sort_order)
            .collect();

        let mut next = 0u32;
        for id in ids {
            let Some(habit) = self.habits.get_mut(id) else {
                continue;
            };
            if habit.archived {
                continue;
            }
            while reserved.contains(&next) {
                next += 1;
            }
            habit.sort_order = next;
            next += 1;
        }
        Ok(())
    }

    pub fn remove_habit(&mut self, id: u64) -> Option<Habit> {
        self.trackers.remove(&id);
        self.habits.remove(&id)
    }

    /// Inserts or replaces the tracker for `record.dated`; one record per habit per day.
    pub fn upsert_tracker(
        &mut self,
        habit_id: u64,
        record: TrackerRecord,
    ) -> Option<TrackerRecord> {
        self.trackers
            .entry(habit_id)
            .or_default()
            .insert(record.dated, record)
    }

    pub fn remove_tracker(&mut self, habit_id: u64, dated: NaiveDate) -> Option<TrackerRecord> {
        self.trackers.get_mut(&habit_id)?.remove(&dated)
    }

    pub fn tracker(&self, habit_id: u64, dated: NaiveDate) -> Option<&TrackerRecord> {
        self.trackers.get(&habit_id)?.get(&dated)
    }

    /// All trackers of a habit, oldest first.
    pub fn tracker_records(&self, habit_id: u64) -> Vec<TrackerRecord> {
        self.trackers
            .get(&habit_id)
            .map(|days| days.values().cloned().collect())
            .unwrap_or_default()
    }
}
