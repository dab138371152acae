use crate::config::Clock;
use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub clock: Clock,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, clock: Clock, data: AppData) -> Self {
        Self {
            data_path,
            clock,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }
}
