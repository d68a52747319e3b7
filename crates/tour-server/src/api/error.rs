//! Mapping of planner failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tour_core::{ErrorKind, PlannerError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Planner(#[from] PlannerError),
    #[error("no plan with id {0}")]
    PlanNotFound(String),
    #[error("{0}")]
    BadRequest(String),
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::GeocodeNotFound => StatusCode::NOT_FOUND,
        ErrorKind::NoRouteFound => StatusCode::BAD_GATEWAY,
        ErrorKind::EmptyCandidatePool => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::InvalidTransition | ErrorKind::UnknownCandidate => StatusCode::CONFLICT,
        ErrorKind::InvalidBandConfiguration => StatusCode::BAD_REQUEST,
        ErrorKind::DatasetUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, kind) = match &self {
            ApiError::Planner(err) => (status_for(err.kind()), json!(err.kind())),
            ApiError::PlanNotFound(_) => (StatusCode::NOT_FOUND, json!("plan_not_found")),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, json!("bad_request")),
        };
        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_status() {
        assert_eq!(status_for(ErrorKind::GeocodeNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::NoRouteFound), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(ErrorKind::EmptyCandidatePool),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for(ErrorKind::UnknownCandidate), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorKind::DatasetUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn planner_errors_keep_their_message() {
        let err = ApiError::from(PlannerError::InvalidBandConfiguration("min > max".into()));
        assert!(err.to_string().contains("min > max"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
