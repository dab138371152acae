use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/habits",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route("/api/habits/sort", put(handlers::sort_habits))
        .route(
            "/api/habits/:id",
            get(handlers::get_habit)
                .put(handlers::replace_habit)
                .patch(handlers::patch_habit)
                .delete(handlers::delete_habit),
        )
        .route(
            "/api/habits/:id/trackers",
            get(handlers::list_trackers).put(handlers::upsert_tracker),
        )
        .route("/api/habits/:id/trackers/lite", get(handlers::list_trackers_lite))
        .route("/api/habits/:id/trackers/:date", delete(handlers::delete_tracker))
        .route("/api/habits/:id/streaks", get(handlers::get_streaks))
        .route("/api/habits/:id/kpis", get(handlers::get_kpis))
        .with_state(state)
}
