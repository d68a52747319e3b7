pub mod aggregate;
pub mod candidates;
pub mod config;
pub mod dataset;
pub mod error;
pub mod events;
pub mod models;
pub mod planner;
pub mod routing;
pub mod spatial;

pub use aggregate::{format_duration, summarize, PlanSummary, SegmentLine};
pub use candidates::{CandidatePool, CandidateSelector, Selection};
pub use config::{DistanceBand, EmptyPoolPolicy, PlannerConfig};
pub use dataset::{normalize, parse_dataset, MunicipalityDatasetLoader};
pub use error::{ErrorKind, PlannerError};
pub use events::PlanEvent;
pub use models::{
    Candidate, GeoPoint, Municipality, PlanState, RouteLeg, RouteSegment, TravelMode, Waypoint,
    WaypointRole,
};
pub use planner::{PlannerState, RoutePlanner};
pub use routing::{Geocoder, Router};
pub use spatial::{distance_km, hubeny_distance_km};
