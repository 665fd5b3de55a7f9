//! Error taxonomy for the analysis pipeline and API layer.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

/// Every failure the service can surface, tagged so callers can react
/// programmatically instead of string-matching.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// User-correctable request problems (missing text, url, credentials).
    #[error("{0}")]
    InputValidation(String),

    /// A collaborator (Instagram, Gemini, Groq) failed or returned garbage.
    #[error("{0}")]
    Upstream(String),

    /// The pipeline had nothing to work with (empty comment or score set).
    #[error("{0}")]
    Data(String),
}

impl AnalysisError {
    pub fn input(msg: impl Into<String>) -> Self {
        AnalysisError::InputValidation(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        AnalysisError::Upstream(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        AnalysisError::Data(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::InputValidation(_) => StatusCode::BAD_REQUEST,
            AnalysisError::Upstream(_) | AnalysisError::Data(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Wire shape for failures: `{"error": "..."}`, matching the dashboard's
/// expectations.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = AnalysisError::input("Text is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_and_data_map_to_500() {
        assert_eq!(
            AnalysisError::upstream("Gemini: quota exceeded").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AnalysisError::data("No comments found to analyze.").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn message_passes_through_display() {
        let err = AnalysisError::data("No comments found to analyze.");
        assert_eq!(err.to_string(), "No comments found to analyze.");
    }
}
