//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::{ErrorKind, HousePriceError};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Core(#[from] HousePriceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Core(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Io(_) | ServerError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServerError::Io(e) => {
                tracing::error!(detail = %e, "IO error");
                "A file system error occurred".to_string()
            }
            ServerError::Task(e) => {
                tracing::error!(detail = %e, "Blocking task failed");
                "An internal error occurred".to_string()
            }
            other if status.is_server_error() => {
                tracing::error!(detail = %other, "Internal server error");
                other.to_string()
            }
            other => {
                tracing::warn!(status = status.as_u16(), detail = %other, "Request rejected");
                other.to_string()
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
