//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::CostError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CostError> for ServerError {
    fn from(err: CostError) -> Self {
        match err {
            CostError::ArtifactNotFound(path) => ServerError::NotFound(format!(
                "No trained model at {}. Run `construction-cost train` first.",
                path.display()
            )),
            CostError::InvalidParameter { .. }
            | CostError::ShapeError { .. }
            | CostError::FeatureNotFound(_) => ServerError::BadRequest(err.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred".to_string())
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_artifact_maps_to_not_found() {
        let err: ServerError = CostError::ArtifactNotFound(PathBuf::from("model.json")).into();
        assert!(matches!(err, ServerError::NotFound(ref msg) if msg.contains("model.json")));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_parameter_maps_to_bad_request() {
        let err: ServerError = CostError::InvalidParameter {
            name: "currency_rate".into(),
            value: "-1".into(),
            reason: "must be a positive number".into(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
