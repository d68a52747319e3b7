//! Tour providers - HTTP collaborators for the planner
//!
//! Geocoding (Nominatim), routing (OSRM) and municipality dataset loading.

pub mod client;
pub mod dataset;
pub mod nominatim;
pub mod osrm;

pub use client::HttpSettings;
pub use dataset::{loader_for, FileDatasetLoader, HttpDatasetLoader, DEFAULT_DATASET_URL};
pub use nominatim::{NominatimGeocoder, DEFAULT_NOMINATIM_URL};
pub use osrm::{OsrmRouter, DEFAULT_OSRM_URL};
