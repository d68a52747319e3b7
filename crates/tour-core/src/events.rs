//! Ordered notifications for the presentation layer.

use crate::error::ErrorKind;
use crate::models::{Candidate, RouteSegment, Waypoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlanEvent {
    OriginResolved {
        waypoint: Waypoint,
    },
    CandidatesProposed {
        step: usize,
        candidates: Vec<Candidate>,
        relaxed: bool,
    },
    WaypointAdded {
        waypoint: Waypoint,
    },
    SegmentAdded {
        segment: RouteSegment,
    },
    PlanComplete {
        legs: usize,
    },
    PlanReset,
    ErrorOccurred {
        kind: ErrorKind,
        message: String,
    },
}
