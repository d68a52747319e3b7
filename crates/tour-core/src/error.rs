//! Planner error kinds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures surfaced by the planning engine and its collaborators.
///
/// Every variant is recoverable at the step boundary: the planner stays in
/// its last stable state when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error("location not found: {0}")]
    GeocodeNotFound(String),

    #[error("no route from {from} to {to}: {reason}")]
    NoRouteFound {
        from: String,
        to: String,
        reason: String,
    },

    #[error("no candidates between {min_km} and {max_km} km")]
    EmptyCandidatePool { min_km: f64, max_km: f64 },

    #[error("municipality dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("invalid band configuration: {0}")]
    InvalidBandConfiguration(String),

    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: String,
    },

    #[error("candidate '{0}' was not offered at this step")]
    UnknownCandidate(String),
}

/// Serializable tag for [`PlannerError`], used in events and API bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    GeocodeNotFound,
    NoRouteFound,
    EmptyCandidatePool,
    DatasetUnavailable,
    InvalidBandConfiguration,
    InvalidTransition,
    UnknownCandidate,
}

impl PlannerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlannerError::GeocodeNotFound(_) => ErrorKind::GeocodeNotFound,
            PlannerError::NoRouteFound { .. } => ErrorKind::NoRouteFound,
            PlannerError::EmptyCandidatePool { .. } => ErrorKind::EmptyCandidatePool,
            PlannerError::DatasetUnavailable(_) => ErrorKind::DatasetUnavailable,
            PlannerError::InvalidBandConfiguration(_) => ErrorKind::InvalidBandConfiguration,
            PlannerError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            PlannerError::UnknownCandidate(_) => ErrorKind::UnknownCandidate,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
