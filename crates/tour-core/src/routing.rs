//! Interfaces to the external geocoding and routing services.

use crate::error::Result;
use crate::models::{GeoPoint, RouteLeg, TravelMode};
use async_trait::async_trait;

/// Resolves a free-form address or a `"lat, lon"` string to a point.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<GeoPoint>;
}

/// Computes a road route between two points.
///
/// Implementations own their timeouts; a timeout is reported like any other
/// `NoRouteFound`.
#[async_trait]
pub trait Router: Send + Sync {
    async fn route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        mode: TravelMode,
    ) -> Result<RouteLeg>;
}
