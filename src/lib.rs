pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod kpis;
pub mod models;
pub mod state;
pub mod storage;
pub mod streaks;

pub use app::router;
pub use config::{AppConfig, Clock};
pub use errors::EngineError;
pub use kpis::{compute_kpis, summarize};
pub use models::{
    HabitConfig, HabitReport, KpiSummary, StreakInterval, TrackerRecord, TrackerStatus,
};
pub use state::AppState;
pub use storage::load_data;
pub use streaks::compute_streaks;
