//! Core data models for the tour planner.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A position in degrees, optionally labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            name: None,
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True when both coordinates are finite and inside WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A destination candidate from the municipality dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    pub name: String,
    /// Prefecture or other administrative region.
    #[serde(default)]
    pub region: Option<String>,
    pub location: GeoPoint,
}

impl Municipality {
    pub fn new(name: impl Into<String>, region: Option<String>, lat: f64, lon: f64) -> Self {
        let name = name.into();
        Self {
            location: GeoPoint::new(lat, lon).with_name(name.clone()),
            name,
            region,
        }
    }
}

/// A municipality offered at a planning step, with its straight-line
/// distance from the previous waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub municipality: Municipality,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum WaypointRole {
    Origin,
    /// Destination number, starting at 1.
    Destination(usize),
}

impl fmt::Display for WaypointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaypointRole::Origin => write!(f, "origin"),
            WaypointRole::Destination(n) => write!(f, "destination {}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub point: GeoPoint,
    pub role: WaypointRole,
}

/// A routed leg between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub from: Waypoint,
    pub to: Waypoint,
    pub distance_km: f64,
    pub duration_min: f64,
    /// Router geometry, passed through untouched (GeoJSON for OSRM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
}

/// Raw router output for one leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
    pub distance_m: f64,
    pub duration_s: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Cycling,
    Walking,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Cycling => "cycling",
            TravelMode::Walking => "walking",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" | "car" | "drive" => Ok(TravelMode::Driving),
            "cycling" | "bicycle" | "bike" => Ok(TravelMode::Cycling),
            "walking" | "foot" | "walk" => Ok(TravelMode::Walking),
            other => Err(format!("unknown travel mode '{}'", other)),
        }
    }
}

/// Accumulated plan: the origin, each chosen destination and the legs
/// between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanState {
    pub waypoints: Vec<Waypoint>,
    pub segments: Vec<RouteSegment>,
    /// Step currently being planned, 1-based.
    pub step: usize,
    pub complete: bool,
}

impl Default for PlanState {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            segments: Vec::new(),
            step: 1,
            complete: false,
        }
    }
}

impl PlanState {
    pub(crate) fn with_origin(origin: Waypoint) -> Self {
        Self {
            waypoints: vec![origin],
            segments: Vec::new(),
            step: 1,
            complete: false,
        }
    }

    pub fn last_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_mode_accepts_ui_aliases() {
        assert_eq!("bicycle".parse::<TravelMode>(), Ok(TravelMode::Cycling));
        assert_eq!("Driving".parse::<TravelMode>(), Ok(TravelMode::Driving));
        assert_eq!("foot".parse::<TravelMode>(), Ok(TravelMode::Walking));
        assert!("train".parse::<TravelMode>().is_err());
    }

    #[test]
    fn geo_point_bounds() {
        assert!(GeoPoint::new(35.68, 139.76).is_valid());
        assert!(!GeoPoint::new(95.0, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn waypoint_role_serializes_with_index() {
        let json = serde_json::to_value(WaypointRole::Destination(2)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "destination", "index": 2}));
    }
}
