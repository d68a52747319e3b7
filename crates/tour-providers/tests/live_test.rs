//! Live service checks against the public Nominatim and OSRM endpoints.
//!
//! Run with: cargo test -p tour-providers --test live_test -- --ignored

use tour_core::{Geocoder, MunicipalityDatasetLoader, Router, TravelMode};
use tour_providers::{
    HttpDatasetLoader, HttpSettings, NominatimGeocoder, OsrmRouter, DEFAULT_DATASET_URL,
    DEFAULT_NOMINATIM_URL, DEFAULT_OSRM_URL,
};

#[tokio::test]
#[ignore]
async fn test_geocode_and_route() {
    let settings = HttpSettings::default();
    let geocoder = NominatimGeocoder::new(DEFAULT_NOMINATIM_URL, &settings).unwrap();
    let router = OsrmRouter::new(DEFAULT_OSRM_URL, &settings).unwrap();

    let origin = geocoder.resolve("Hamamatsu Station").await.expect("geocode");
    assert!((origin.lat() - 34.70).abs() < 0.2, "unexpected origin {:?}", origin);

    let destination = geocoder.resolve("34.9756, 138.3828").await.expect("coordinates");
    let leg = router
        .route(&origin, &destination, TravelMode::Driving)
        .await
        .expect("route");
    assert!(leg.distance_m > 60_000.0, "Road distance should exceed 60 km");
    assert!(leg.geometry.is_some());
}

#[tokio::test]
#[ignore]
async fn test_dataset_download() {
    let loader = HttpDatasetLoader::new(DEFAULT_DATASET_URL, &HttpSettings::default()).unwrap();
    let municipalities = loader.load().await.expect("dataset");
    assert!(municipalities.len() > 1000, "Japan has well over 1000 municipalities");
}
