use crate::errors::ConfigError;
use chrono::{Local, NaiveDate};
use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/habits.json";

/// Source of "today" for the host. The engine itself always takes the date as an argument.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn system() -> Self {
        Self::System
    }

    pub fn fixed(date: NaiveDate) -> Self {
        Self::Fixed(date)
    }

    pub fn today(&self) -> NaiveDate {
        match self {
            Self::System => Local::now().date_naive(),
            Self::Fixed(date) => *date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub clock: Clock,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let clock = match lookup("APP_TODAY") {
            Some(value) => {
                let date = value.trim().parse::<NaiveDate>().map_err(|_| {
                    ConfigError::InvalidValue {
                        key: "APP_TODAY",
                        value: value.clone(),
                    }
                })?;
                Clock::fixed(date)
            }
            None => Clock::system(),
        };

        Ok(Self {
            port,
            data_path,
            clock,
        })
    }
}
