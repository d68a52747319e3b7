//! Nominatim (OpenStreetMap) geocoder.

use crate::client::{join_url, HttpSettings};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tour_core::error::Result;
use tour_core::{GeoPoint, Geocoder, PlannerError};

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Label for coordinate input when reverse lookup is off or fails.
pub const CURRENT_LOCATION: &str = "Current location";

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<ReverseAddress>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    province: Option<String>,
    county: Option<String>,
}

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    reverse_lookup: bool,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, settings: &HttpSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: settings.build_client()?,
            base_url: base_url.into(),
            reverse_lookup: true,
        })
    }

    /// Name coordinate input via reverse geocoding (on by default).
    pub fn with_reverse_lookup(mut self, enabled: bool) -> Self {
        self.reverse_lookup = enabled;
        self
    }

    /// Forward search, first hit only.
    pub async fn search(&self, query: &str) -> Result<GeoPoint> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PlannerError::GeocodeNotFound("empty query".to_string()));
        }
        let url = join_url(&self.base_url, "search");
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!("Nominatim search for '{}' failed: {}", query, e);
                PlannerError::GeocodeNotFound(format!("{}: {}", query, e))
            })?;

        let hits: Vec<SearchHit> = response.json().await.map_err(|e| {
            PlannerError::GeocodeNotFound(format!("{}: unreadable response: {}", query, e))
        })?;

        let point = hits
            .first()
            .and_then(parse_hit)
            .ok_or_else(|| PlannerError::GeocodeNotFound(query.to_string()))?;
        tracing::debug!(query, lat = point.lat(), lon = point.lon(), "geocoded");
        Ok(point.with_name(query))
    }

    /// Best-effort place name for a point.
    pub async fn reverse(&self, point: &GeoPoint) -> Option<String> {
        let url = join_url(&self.base_url, "reverse");
        let lat = point.lat().to_string();
        let lon = point.lon().to_string();
        let result = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status());
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("reverse geocode failed: {}", e);
                return None;
            }
        };
        let body: ReverseResponse = response.json().await.ok()?;
        place_name(&body)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, query: &str) -> Result<GeoPoint> {
        let Some(point) = parse_coordinates(query) else {
            return self.search(query).await;
        };
        let name = if self.reverse_lookup {
            self.reverse(&point).await
        } else {
            None
        };
        Ok(point.with_name(name.unwrap_or_else(|| CURRENT_LOCATION.to_string())))
    }
}

/// Parse `"lat, lon"` input such as a browser or GPS fix.
pub fn parse_coordinates(query: &str) -> Option<GeoPoint> {
    let (lat, lon) = query.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    let point = GeoPoint::new(lat, lon);
    point.is_valid().then_some(point)
}

fn parse_hit(hit: &SearchHit) -> Option<GeoPoint> {
    let lat = hit.lat.trim().parse().ok()?;
    let lon = hit.lon.trim().parse().ok()?;
    let point = GeoPoint::new(lat, lon);
    point.is_valid().then_some(point)
}

fn place_name(body: &ReverseResponse) -> Option<String> {
    let from_address = body.address.as_ref().and_then(|a| {
        a.city
            .clone()
            .or_else(|| a.town.clone())
            .or_else(|| a.village.clone())
            .or_else(|| a.province.clone())
            .or_else(|| a.county.clone())
    });
    from_address
        .or_else(|| {
            body.display_name
                .as_deref()
                .and_then(|name| name.split(',').next())
                .map(|s| s.trim().to_string())
        })
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_input() {
        let point = parse_coordinates("34.7108, 137.7263").unwrap();
        assert_eq!(point.lat(), 34.7108);
        assert_eq!(point.lon(), 137.7263);
        assert!(parse_coordinates("Hamamatsu, Shizuoka").is_none());
        assert!(parse_coordinates("134.0, 10.0").is_none());
        assert!(parse_coordinates("35.0").is_none());
    }

    #[test]
    fn search_hit_strings_to_point() {
        let hits: Vec<SearchHit> =
            serde_json::from_str(r#"[{"lat": "35.681", "lon": "139.767", "display_name": "Tokyo"}]"#)
                .unwrap();
        let point = parse_hit(&hits[0]).unwrap();
        assert_eq!(point.lat(), 35.681);
    }

    #[test]
    fn reverse_prefers_city_then_town() {
        let body: ReverseResponse = serde_json::from_str(
            r#"{"address": {"town": "Kosai", "county": "Hamana"}, "display_name": "x"}"#,
        )
        .unwrap();
        assert_eq!(place_name(&body).as_deref(), Some("Kosai"));

        let body: ReverseResponse =
            serde_json::from_str(r#"{"display_name": "Chuo Ward, Hamamatsu, Japan"}"#).unwrap();
        assert_eq!(place_name(&body).as_deref(), Some("Chuo Ward"));

        assert_eq!(place_name(&ReverseResponse::default()), None);
    }

    #[tokio::test]
    async fn coordinates_skip_network_when_reverse_disabled() {
        // Unroutable base URL: any HTTP call would fail the test.
        let geocoder = NominatimGeocoder::new("http://127.0.0.1:9", &HttpSettings::default())
            .unwrap()
            .with_reverse_lookup(false);
        let point = geocoder.resolve("35.0, 135.0").await.unwrap();
        assert_eq!(point.name(), Some(CURRENT_LOCATION));
    }

    #[tokio::test]
    async fn unreachable_service_is_not_found() {
        let geocoder =
            NominatimGeocoder::new("http://127.0.0.1:9", &HttpSettings::default()).unwrap();
        let err = geocoder.resolve("Hamamatsu").await.unwrap_err();
        assert!(matches!(err, PlannerError::GeocodeNotFound(_)));
    }
}
