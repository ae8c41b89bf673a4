use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::model::ScoringError;

/// Application-level errors surfaced at the HTTP boundary
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The model failed to load at startup; every request fails fast.
    #[error("the model could not be initialized at startup")]
    ModelUnavailable,

    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short machine-readable code included in the error payload.
    fn code(&self) -> &'static str {
        match self {
            AppError::ModelUnavailable => "Model-Unavailable",
            AppError::MissingParameter(_) => "Missing-Parameter",
            AppError::InvalidParameter(_) => "Invalid-Parameter",
            AppError::Scoring(_) => "Scoring-Error",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) => "Internal-Error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) | AppError::InvalidParameter(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ModelUnavailable | AppError::Scoring(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.code(),
            "message": self.to_string(),
            "status": "error",
        }));

        (self.status(), body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
