use axum::http::StatusCode;
use thiserror::Error;

/// Rejections raised by the streak engine before any computation happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid habit: frequency ({frequency}) and range ({range}) must both be at least 1")]
    InvalidConfig { frequency: u32, range: u32 },
}

/// Rejections for a display-order request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReorderError {
    #[error("habit id list cannot be empty")]
    Empty,
    #[error("duplicate habit ids in request")]
    Duplicate,
    #[error("habits not found: {0:?}")]
    Unknown(Vec<u64>),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: err.to_string(),
        }
    }
}

impl From<ReorderError> for AppError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::Unknown(_) => Self::not_found(err.to_string()),
            ReorderError::Empty | ReorderError::Duplicate => Self::bad_request(err.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
