use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::assistant::AssistantError;
use crate::workflows::attendance::{DatasetError, PersonalLogError, UnknownMonth};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Dataset(DatasetError),
    Assistant(AssistantError),
    PersonalLog(PersonalLogError),
    BadRequest(String),
    NotFound(String),
    Unauthorized,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Dataset(err) => write!(f, "dataset error: {}", err),
            AppError::Assistant(AssistantError::InvalidRequest(message)) => f.write_str(message),
            AppError::Assistant(err) => write!(f, "Error generating response: {}", err),
            AppError::PersonalLog(err) => write!(f, "attendance log error: {}", err),
            AppError::BadRequest(message) => write!(f, "bad request: {}", message),
            AppError::NotFound(what) => write!(f, "{} not found", what),
            AppError::Unauthorized => write!(f, "Invalid username or password"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Dataset(err) => Some(err),
            AppError::Assistant(err) => Some(err),
            AppError::PersonalLog(err) => Some(err),
            AppError::BadRequest(_) | AppError::NotFound(_) | AppError::Unauthorized => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadRequest(_)
            | AppError::PersonalLog(_)
            | AppError::Assistant(AssistantError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Assistant(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<DatasetError> for AppError {
    fn from(value: DatasetError) -> Self {
        Self::Dataset(value)
    }
}

impl From<AssistantError> for AppError {
    fn from(value: AssistantError) -> Self {
        Self::Assistant(value)
    }
}

impl From<PersonalLogError> for AppError {
    fn from(value: PersonalLogError) -> Self {
        Self::PersonalLog(value)
    }
}

impl From<UnknownMonth> for AppError {
    fn from(value: UnknownMonth) -> Self {
        Self::BadRequest(value.to_string())
    }
}
