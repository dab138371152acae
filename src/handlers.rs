use crate::errors::AppError;
use crate::kpis::summarize;
use crate::models::{
    AppData, Habit, HabitConfig, HabitPatch, HabitReplace, HabitView, KpiResponse, NewHabit,
    StreakInterval, TrackerList, TrackerLite, TrackerLiteList, TrackerRecord, TrackerStatus,
    TrackerUpsert, days_before,
};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::streaks::{compute_streaks, validate};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

const DEFAULT_TRACKER_LIMIT: usize = 5;
const MAX_TRACKER_LIMIT: usize = 1000;
const DEFAULT_LITE_DAYS: u32 = 42;
const MAX_LITE_DAYS: u32 = 365;

#[derive(Debug, Deserialize)]
pub struct TrackerListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TrackerLiteQuery {
    pub end_date: Option<NaiveDate>,
    pub days: Option<u32>,
}

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    let data = state.data.lock().await;
    Json(data.habits_in_display_order())
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabit>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }

    let today = state.today();
    validate(&HabitConfig::new(today, payload.frequency, payload.range))?;

    let mut data = state.data.lock().await;
    let id = data.next_id();
    let sort_order = data.next_sort_order();
    let habit = payload.into_habit(id, sort_order, today);

    data.insert_habit(habit.clone());
    persist_data(&state.data_path, &data).await?;

    info!(
        id,
        name = %habit.name,
        frequency = habit.frequency,
        range = habit.range,
        "habit created"
    );
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<HabitView>, AppError> {
    let today = state.today();
    let data = state.data.lock().await;
    let habit = find_habit(&data, id)?.clone();
    let today_status = data.tracker(id, today).map(|record| record.status);

    Ok(Json(HabitView {
        habit,
        completed_today: today_status == Some(TrackerStatus::Completed),
        skipped_today: today_status == Some(TrackerStatus::Skipped),
    }))
}

pub async fn patch_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<HabitPatch>,
) -> Result<Json<Habit>, AppError> {
    if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(AppError::bad_request("name must not be empty"));
    }

    let today = state.today();
    let mut data = state.data.lock().await;
    let mut habit = find_habit(&data, id)?.clone();
    patch.apply(&mut habit, today);
    validate(&habit.config())?;

    data.insert_habit(habit.clone());
    persist_data(&state.data_path, &data).await?;

    Ok(Json(habit))
}

pub async fn replace_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(replace): Json<HabitReplace>,
) -> Result<Json<Habit>, AppError> {
    if replace.name.trim().is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }

    let today = state.today();
    let mut data = state.data.lock().await;
    let mut habit = find_habit(&data, id)?.clone();
    replace.apply(&mut habit, today);
    validate(&habit.config())?;

    data.insert_habit(habit.clone());
    persist_data(&state.data_path, &data).await?;

    Ok(Json(habit))
}

pub async fn sort_habits(
    State(state): State<AppState>,
    Json(ids): Json<Vec<u64>>,
) -> Result<Json<Vec<Habit>>, AppError> {
    let mut data = state.data.lock().await;
    data.reorder(&ids)?;
    persist_data(&state.data_path, &data).await?;

    info!(count = ids.len(), "habits reordered");
    Ok(Json(data.habits_in_display_order()))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    if data.remove_habit(id).is_none() {
        return Err(habit_not_found(id));
    }
    persist_data(&state.data_path, &data).await?;

    info!(id, "habit deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_trackers(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<TrackerListQuery>,
) -> Result<Json<TrackerList>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_TRACKER_LIMIT);
    if !(1..=MAX_TRACKER_LIMIT).contains(&limit) {
        return Err(AppError::bad_request(format!(
            "limit must be between 1 and {MAX_TRACKER_LIMIT}"
        )));
    }

    let data = state.data.lock().await;
    find_habit(&data, id)?;
    let trackers: Vec<TrackerRecord> = data
        .tracker_records(id)
        .into_iter()
        .rev()
        .take(limit)
        .collect();

    Ok(Json(TrackerList {
        total: trackers.len(),
        trackers,
        limit,
    }))
}

pub async fn list_trackers_lite(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<TrackerLiteQuery>,
) -> Result<Json<TrackerLiteList>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_LITE_DAYS);
    if !(1..=MAX_LITE_DAYS).contains(&days) {
        return Err(AppError::bad_request(format!(
            "days must be between 1 and {MAX_LITE_DAYS}"
        )));
    }
    let end_date = query.end_date.unwrap_or_else(|| state.today());
    let start_date = days_before(end_date, days - 1);

    let data = state.data.lock().await;
    find_habit(&data, id)?;
    let records = data.tracker_records(id);

    let trackers: Vec<TrackerLite> = records
        .iter()
        .rev()
        .filter(|record| record.dated >= start_date && record.dated <= end_date)
        .map(|record| TrackerLite {
            dated: record.dated,
            status: record.status,
            has_note: record.has_note(),
        })
        .collect();
    let has_previous = records.iter().any(|record| record.dated < start_date);

    Ok(Json(TrackerLiteList {
        total: trackers.len(),
        trackers,
        end_date,
        days,
        has_previous,
    }))
}

pub async fn upsert_tracker(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<TrackerUpsert>,
) -> Result<Json<TrackerRecord>, AppError> {
    let today = state.today();
    let mut data = state.data.lock().await;
    let created_date = find_habit(&data, id)?.created_date;

    let status = payload
        .resolve_status()
        .ok_or_else(|| AppError::bad_request("status code must be 0, 1 or 2"))?;
    let record = TrackerRecord {
        dated: payload.dated.unwrap_or(today),
        status,
        note: payload.note,
    };
    if record.dated < created_date {
        return Err(AppError::bad_request(format!(
            "tracker date {} is before the habit was created ({created_date})",
            record.dated
        )));
    }

    data.upsert_tracker(id, record.clone());
    persist_data(&state.data_path, &data).await?;

    Ok(Json(record))
}

pub async fn delete_tracker(
    State(state): State<AppState>,
    Path((id, dated)): Path<(u64, NaiveDate)>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    find_habit(&data, id)?;
    if data.remove_tracker(id, dated).is_none() {
        return Err(AppError::not_found(format!("no tracker for habit {id} on {dated}")));
    }
    persist_data(&state.data_path, &data).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_streaks(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<StreakInterval>>, AppError> {
    let today = state.today();
    let data = state.data.lock().await;
    let habit = find_habit(&data, id)?;
    let streaks = compute_streaks(&habit.config(), &data.tracker_records(id), today)?;
    Ok(Json(streaks))
}

pub async fn get_kpis(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<KpiResponse>, AppError> {
    let today = state.today();
    let data = state.data.lock().await;
    let habit = find_habit(&data, id)?;
    let report = summarize(&habit.config(), &data.tracker_records(id), today)?;
    Ok(Json(KpiResponse {
        id,
        kpis: report.kpis,
    }))
}

fn find_habit(data: &AppData, id: u64) -> Result<&Habit, AppError> {
    data.habit(id).ok_or_else(|| habit_not_found(id))
}

fn habit_not_found(id: u64) -> AppError {
    AppError::not_found(format!("habit {id} not found"))
}
