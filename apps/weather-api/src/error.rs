use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub const UPSTREAM_FAILURE_MESSAGE: &str = "Error fetching weather data.";

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("{0}")]
    MissingInput(String),
    #[error("{0}")]
    InvalidDateFormat(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("SMHI responded with HTTP {status}")]
    Upstream { status: u16 },
    #[error("SMHI request failed: {0}")]
    Transport(String),
    #[error("failed to parse forecast document: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn is_client_input(&self) -> bool {
        matches!(
            self,
            WeatherError::MissingInput(_)
                | WeatherError::InvalidDateFormat(_)
                | WeatherError::InvalidInput(_)
        )
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => WeatherError::Upstream {
                status: status.as_u16(),
            },
            None => WeatherError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Parse(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        if err.is_client_input() {
            tracing::warn!(error = %err, "rejected weather request");
            return AppError::bad_request(err.to_string());
        }
        // Upstream causes stay in the log; callers get the generic message.
        tracing::error!(error = %err, "Error fetching weather data");
        AppError::bad_request(UPSTREAM_FAILURE_MESSAGE)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
