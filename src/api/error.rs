//! HTTP mapping for pipeline errors: user-correctable problems are 400s,
//! service faults are 500s, both wrapped in the uniform envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::pipeline::IntakeError;

use super::types::Envelope;

pub struct ApiError(pub IntakeError);

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            IntakeError::Validation(_) | IntakeError::EntityNotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            IntakeError::Extraction(_)
            | IntakeError::Ledger(_)
            | IntakeError::Assembly(_) => {
                tracing::error!(error = %self.0, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(Envelope::fail(self.0.to_string()))).into_response()
    }
}
