use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fleet_state::LogError;
use thiserror::Error;
use types::errors::VinError;

/// Central error type for the Gateway application
///
/// Responses carry a plain-text body with the error message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    /// Unparsable request parameters
    #[error("{0}")]
    InvalidInput(String),

    /// Position older than the last one recorded for the vehicle
    #[error("{0}")]
    Stale(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // the wire contract reports bad input and stale writes alike as 500
            AppError::InvalidInput(_) | AppError::Stale(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<VinError> for AppError {
    fn from(err: VinError) -> Self {
        AppError::NotFound(format!("bad vin: {}", err))
    }
}

impl From<LogError> for AppError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::UnknownVin(_) => AppError::NotFound(err.to_string()),
            LogError::RejectedStale { .. } => AppError::Stale(err.to_string()),
            LogError::ReaderClosed => AppError::InternalError(err.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::InternalError(err) => tracing::error!(error = %err, "Request failed"),
            other => tracing::warn!(status = status.as_u16(), error = %other, "Request rejected"),
        }

        (status, self.to_string()).into_response()
    }
}
