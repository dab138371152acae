use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub next_habit_id: u64,
    #[serde(default)]
    pub habits: BTreeMap<u64, Habit>,
    /// Trackers per habit id, keyed by calendar day.
    #[serde(default)]
    pub trackers: BTreeMap<u64, BTreeMap<NaiveDate, TrackerRecord>>,
}

/// Cadence of a habit as seen by the streak engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitConfig {
    pub created_date: NaiveDate,
    /// Completions required inside one window.
    pub frequency: u32,
    /// Window width in days.
    pub range: u32,
}

impl HabitConfig {
    pub fn new(created_date: NaiveDate, frequency: u32, range: u32) -> Self {
        Self {
            created_date,
            frequency,
            range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerStatus {
    #[default]
    NotCompleted,
    Skipped,
    Completed,
}

impl TrackerStatus {
    /// Maps the legacy `completed`/`skipped` flag pair. A completion wins over a skip.
    pub fn from_flags(completed: bool, skipped: bool) -> Self {
        match (completed, skipped) {
            (true, _) => Self::Completed,
            (false, true) => Self::Skipped,
            (false, false) => Self::NotCompleted,
        }
    }

    /// Maps the legacy integer column (0 = not completed, 1 = skipped, 2 = completed).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::NotCompleted),
            1 => Some(Self::Skipped),
            2 => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerRecord {
    pub dated: NaiveDate,
    pub status: TrackerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TrackerRecord {
    pub fn new(dated: NaiveDate, status: TrackerStatus) -> Self {
        Self {
            dated,
            status,
            note: None,
        }
    }

    pub fn completed(dated: NaiveDate) -> Self {
        Self::new(dated, TrackerStatus::Completed)
    }

    pub fn skipped(dated: NaiveDate) -> Self {
        Self::new(dated, TrackerStatus::Skipped)
    }

    pub fn has_note(&self) -> bool {
        self.note.as_deref().is_some_and(|note| !note.trim().is_empty())
    }
}

/// Inclusive date range of one unbroken compliance period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInterval {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl StreakInterval {
    pub fn length_days(&self) -> u32 {
        ((self.end_date - self.start_date).num_days() + 1).clamp(0, i64::from(u32::MAX)) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KpiSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    pub thirty_day_completion_rate: f64,
    pub overall_completion_rate: f64,
    pub last_completed_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitReport {
    pub streaks: Vec<StreakInterval>,
    pub kpis: KpiSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: u64,
    pub name: String,
    pub question: String,
    pub color: String,
    pub frequency: u32,
    pub range: u32,
    pub reminder: bool,
    pub notes: Option<String>,
    pub archived: bool,
    /// Display position, ascending.
    #[serde(default)]
    pub sort_order: u32,
    pub created_date: NaiveDate,
    pub updated_date: Option<NaiveDate>,
}

impl Habit {
    pub fn config(&self) -> HabitConfig {
        HabitConfig::new(self.created_date, self.frequency, self.range)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewHabit {
    pub name: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub color: String,
    pub frequency: u32,
    pub range: u32,
    #[serde(default)]
    pub reminder: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_date: Option<NaiveDate>,
}

impl NewHabit {
    pub fn into_habit(self, id: u64, sort_order: u32, today: NaiveDate) -> Habit {
        Habit {
            id,
            name: self.name.trim().to_string(),
            question: self.question,
            color: self.color,
            frequency: self.frequency,
            range: self.range,
            reminder: self.reminder,
            notes: self.notes,
            archived: false,
            sort_order,
            created_date: self.created_date.unwrap_or(today),
            updated_date: None,
        }
    }
}

/// Partial update for a habit. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub question: Option<String>,
    pub color: Option<String>,
    pub frequency: Option<u32>,
    pub range: Option<u32>,
    pub reminder: Option<bool>,
    pub notes: Option<String>,
    pub archived: Option<bool>,
    pub sort_order: Option<u32>,
}

impl HabitPatch {
    pub fn apply(self, habit: &mut Habit, today: NaiveDate) {
        if let Some(name) = self.name {
            habit.name = name.trim().to_string();
        }
        if let Some(question) = self.question {
            habit.question = question;
        }
        if let Some(color) = self.color {
            habit.color = color;
        }
        if let Some(frequency) = self.frequency {
            habit.frequency = frequency;
        }
        if let Some(range) = self.range {
            habit.range = range;
        }
        if let Some(reminder) = self.reminder {
            habit.reminder = reminder;
        }
        if let Some(notes) = self.notes {
            habit.notes = Some(notes);
        }
        if let Some(archived) = self.archived {
            habit.archived = archived;
        }
        if let Some(sort_order) = self.sort_order {
            habit.sort_order = sort_order;
        }
        habit.updated_date = Some(today);
    }
}

/// Full replacement of a habit's editable fields. Identity and creation date are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct HabitReplace {
    pub name: String,
    pub question: String,
    pub color: String,
    pub frequency: u32,
    pub range: u32,
    pub reminder: bool,
    pub notes: Option<String>,
    pub archived: bool,
    pub sort_order: u32,
}

impl HabitReplace {
    pub fn apply(self, habit: &mut Habit, today: NaiveDate) {
        habit.name = self.name.trim().to_string();
        habit.question = self.question;
        habit.color = self.color;
        habit.frequency = self.frequency;
        habit.range = self.range;
        habit.reminder = self.reminder;
        habit.notes = self.notes;
        habit.archived = self.archived;
        habit.sort_order = self.sort_order;
        habit.updated_date = Some(today);
    }
}

#[derive(Debug, Serialize)]
pub struct HabitView {
    #[serde(flatten)]
    pub habit: Habit,
    pub completed_today: bool,
    pub skipped_today: bool,
}

/// Tracker status as sent by clients: a name or the legacy integer code.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum StatusInput {
    Named(TrackerStatus),
    Code(u8),
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackerUpsert {
    #[serde(default)]
    pub dated: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<StatusInput>,
    /// Legacy flag pair, only read when `status` is absent.
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub skipped: Option<bool>,
    #[serde(default)]
    pub note: Option<String>,
}

impl TrackerUpsert {
    /// Resolves the requested status, defaulting to completed.
    /// Returns `None` for an unknown status code.
    pub fn resolve_status(&self) -> Option<TrackerStatus> {
        match self.status {
            Some(StatusInput::Named(status)) => Some(status),
            Some(StatusInput::Code(code)) => TrackerStatus::from_code(code),
            None if self.completed.is_some() || self.skipped.is_some() => {
                let skipped = self.skipped.unwrap_or(false);
                let completed = self.completed.unwrap_or(!skipped);
                Some(TrackerStatus::from_flags(completed, skipped))
            }
            None => Some(TrackerStatus::Completed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrackerList {
    pub trackers: Vec<TrackerRecord>,
    pub total: usize,
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct TrackerLite {
    pub dated: NaiveDate,
    pub status: TrackerStatus,
    pub has_note: bool,
}

#[derive(Debug, Serialize)]
pub struct TrackerLiteList {
    pub trackers: Vec<TrackerLite>,
    pub total: usize,
    pub end_date: NaiveDate,
    pub days: u32,
    pub has_previous: bool,
}

#[derive(Debug, Serialize)]
pub struct KpiResponse {
    pub id: u64,
    #[serde(flatten)]
    pub kpis: KpiSummary,
}

/// Saturates at the earliest representable date instead of overflowing.
pub(crate) fn days_before(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_habit() -> Habit {
        NewHabit {
            name: "  Read  ".to_string(),
            question: "Did you read today?".to_string(),
            color: "#ff6b4a".to_string(),
            frequency: 1,
            range: 1,
            reminder: false,
            notes: None,
            created_date: None,
        }
        .into_habit(7, 2, day(2026, 1, 5))
    }

    #[test]
    fn legacy_flags_never_produce_both_states() {
        assert_eq!(TrackerStatus::from_flags(true, true), TrackerStatus::Completed);
        assert_eq!(TrackerStatus::from_flags(false, true), TrackerStatus::Skipped);
        assert_eq!(TrackerStatus::from_flags(false, false), TrackerStatus::NotCompleted);
    }

    #[test]
    fn legacy_codes_map_to_status() {
        assert_eq!(TrackerStatus::from_code(0), Some(TrackerStatus::NotCompleted));
        assert_eq!(TrackerStatus::from_code(1), Some(TrackerStatus::Skipped));
        assert_eq!(TrackerStatus::from_code(2), Some(TrackerStatus::Completed));
        assert_eq!(TrackerStatus::from_code(3), None);
    }

    #[test]
    fn status_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&TrackerStatus::NotCompleted).unwrap();
        assert_eq!(json, "\"NOT_COMPLETED\"");
    }

    #[test]
    fn interval_length_is_inclusive() {
        let interval = StreakInterval {
            start_date: day(2026, 1, 1),
            end_date: day(2026, 1, 3),
        };
        assert_eq!(interval.length_days(), 3);
    }

    #[test]
    fn new_habit_defaults_created_date_to_today() {
        let habit = sample_habit();
        assert_eq!(habit.id, 7);
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.created_date, day(2026, 1, 5));
        assert!(habit.updated_date.is_none());
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut habit = sample_habit();
        let patch = HabitPatch {
            frequency: Some(3),
            range: Some(7),
            archived: Some(true),
            ..HabitPatch::default()
        };
        patch.apply(&mut habit, day(2026, 1, 9));

        assert_eq!(habit.frequency, 3);
        assert_eq!(habit.range, 7);
        assert!(habit.archived);
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.question, "Did you read today?");
        assert_eq!(habit.updated_date, Some(day(2026, 1, 9)));
    }

    #[test]
    fn blank_note_is_not_a_note() {
        let mut record = TrackerRecord::completed(day(2026, 1, 5));
        assert!(!record.has_note());
        record.note = Some("   ".to_string());
        assert!(!record.has_note());
        record.note = Some("felt good".to_string());
        assert!(record.has_note());
    }

    #[test]
    fn replace_overwrites_every_editable_field() {
        let mut habit = sample_habit();
        habit.notes = Some("old".to_string());
        let replace = HabitReplace {
            name: " Write ".to_string(),
            question: "Did you write?".to_string(),
            color: "#2f4858".to_string(),
            frequency: 4,
            range: 7,
            reminder: true,
            notes: None,
            archived: true,
            sort_order: 9,
        };
        replace.apply(&mut habit, day(2026, 1, 8));

        assert_eq!(habit.id, 7);
        assert_eq!(habit.created_date, day(2026, 1, 5));
        assert_eq!(habit.name, "Write");
        assert_eq!((habit.frequency, habit.range), (4, 7));
        assert!(habit.notes.is_none());
        assert!(habit.archived);
        assert_eq!(habit.sort_order, 9);
        assert_eq!(habit.updated_date, Some(day(2026, 1, 8)));
    }

    #[test]
    fn upsert_status_accepts_names_codes_and_legacy_flags() {
        let parse = |json: &str| serde_json::from_str::<TrackerUpsert>(json).unwrap();

        assert_eq!(parse("{}").resolve_status(), Some(TrackerStatus::Completed));
        assert_eq!(
            parse(r#"{"status": "SKIPPED"}"#).resolve_status(),
            Some(TrackerStatus::Skipped)
        );
        assert_eq!(
            parse(r#"{"status": 0}"#).resolve_status(),
            Some(TrackerStatus::NotCompleted)
        );
        assert_eq!(parse(r#"{"status": 7}"#).resolve_status(), None);
        assert_eq!(
            parse(r#"{"skipped": true}"#).resolve_status(),
            Some(TrackerStatus::Skipped)
        );
        assert_eq!(
            parse(r#"{"completed": true, "skipped": true}"#).resolve_status(),
            Some(TrackerStatus::Completed)
        );
        assert_eq!(
            parse(r#"{"completed": false}"#).resolve_status(),
            Some(TrackerStatus::NotCompleted)
        );
    }

    #[test]
    fn days_before_saturates_at_the_earliest_date() {
        let date = day(2026, 1, 5);
        assert_eq!(days_before(date, 4), day(2026, 1, 1));
        assert_eq!(days_before(date, u32::MAX), NaiveDate::MIN);
    }

    #[test]
    fn habit_without_sort_order_loads_with_zero() {
        let json = r#"{
            "id": 1, "name": "Read", "question": "", "color": "",
            "frequency": 1, "range": 1, "reminder": false, "notes": null,
            "archived": false, "created_date": "2026-01-05", "updated_date": null
        }"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.sort_order, 0);
    }
}
