//! OSRM route service client.

use crate::client::{join_url, HttpSettings};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tour_core::error::Result;
use tour_core::{GeoPoint, PlannerError, RouteLeg, Router, TravelMode};

pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Option<serde_json::Value>,
}

pub struct OsrmRouter {
    client: Client,
    base_url: String,
}

impl OsrmRouter {
    pub fn new(base_url: impl Into<String>, settings: &HttpSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: settings.build_client()?,
            base_url: base_url.into(),
        })
    }

    fn route_url(&self, origin: &GeoPoint, destination: &GeoPoint, mode: TravelMode) -> String {
        // OSRM takes lon,lat pairs.
        let path = format!(
            "route/v1/{}/{},{};{},{}",
            profile(mode),
            origin.lon(),
            origin.lat(),
            destination.lon(),
            destination.lat()
        );
        join_url(&self.base_url, &path)
    }
}

/// OSRM profile name for a travel mode.
pub fn profile(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Driving => "driving",
        TravelMode::Cycling => "cycling",
        TravelMode::Walking => "walking",
    }
}

#[async_trait]
impl Router for OsrmRouter {
    async fn route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        mode: TravelMode,
    ) -> Result<RouteLeg> {
        let no_route = |reason: String| PlannerError::NoRouteFound {
            from: label(origin),
            to: label(destination),
            reason,
        };

        let url = self.route_url(origin, destination, mode);
        let response = self
            .client
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("OSRM request failed: {}", e);
                no_route(e.to_string())
            })?;

        // OSRM reports NoRoute and friends with a 400 and a JSON body.
        let status = response.status();
        let body: RouteResponse = response
            .json()
            .await
            .map_err(|e| no_route(format!("HTTP {}: unreadable response: {}", status, e)))?;

        leg_from_response(body).map_err(no_route)
    }
}

fn leg_from_response(body: RouteResponse) -> std::result::Result<RouteLeg, String> {
    if body.code != "Ok" {
        return Err(match body.message {
            Some(message) => format!("{}: {}", body.code, message),
            None => body.code,
        });
    }
    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| "response contained no routes".to_string())?;
    Ok(RouteLeg {
        geometry: route.geometry,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}

fn label(point: &GeoPoint) -> String {
    match point.name() {
        Some(name) => name.to_string(),
        None => format!("{:.5},{:.5}", point.lat(), point.lon()),
    }
}
