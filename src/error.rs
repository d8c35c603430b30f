use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Query failed: {0}")]
    Query(String),
    #[error("Expected exactly one active talk row, found {0}")]
    NotSingle(usize),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Corrupt storage file: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Enquete not found")]
    EnqueteNotFound,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for PanelError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            PanelError::InvalidRequest => (StatusCode::BAD_REQUEST, "Invalid request"),
            PanelError::EnqueteNotFound => (StatusCode::NOT_FOUND, "Enquete not found"),
            PanelError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.as_str()),
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for RemoteError {
    fn from(error: sqlx::Error) -> Self {
        RemoteError::Query(error.to_string())
    }
}

impl From<sqlx::Error> for PanelError {
    fn from(error: sqlx::Error) -> Self {
        PanelError::DatabaseError(error.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::Unavailable(error.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::Corrupt(error.to_string())
    }
}
