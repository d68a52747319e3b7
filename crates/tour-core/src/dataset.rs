//! Municipality dataset normalization.
//!
//! Published datasets disagree on field names (`lat`/`latitude`,
//! `lon`/`lng`/`longitude`/`long`, `name`/`municipality`/`pref`+`city`).
//! Everything is folded into [`Municipality`] here so the selector never
//! sees the variants.

use crate::error::{PlannerError, Result};
use crate::models::Municipality;
use async_trait::async_trait;
use serde_json::{Map, Value};

const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LON_KEYS: &[&str] = &["lon", "lng", "longitude", "long"];
const REGION_KEYS: &[&str] = &["pref", "prefecture", "region"];

/// Source of the municipality list, loaded once before planning starts.
#[async_trait]
pub trait MunicipalityDatasetLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<Municipality>>;
}

/// Parse a dataset document: either a top-level array or an object with a
/// `municipalities` array.
pub fn parse_dataset(text: &str) -> Result<Vec<Municipality>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PlannerError::DatasetUnavailable(format!("invalid JSON: {}", e)))?;
    normalize(&value)
}

pub fn normalize(document: &Value) -> Result<Vec<Municipality>> {
    let records = match document {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("municipalities") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(PlannerError::DatasetUnavailable(
                    "expected an array or a 'municipalities' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(PlannerError::DatasetUnavailable(
                "expected an array or a 'municipalities' array".to_string(),
            ))
        }
    };

    let municipalities: Vec<Municipality> = records
        .iter()
        .filter_map(|record| record.as_object().and_then(normalize_record))
        .collect();

    let skipped = records.len() - municipalities.len();
    if skipped > 0 {
        tracing::warn!(skipped, "dataset records without usable name or coordinates");
    }
    if municipalities.is_empty() {
        return Err(PlannerError::DatasetUnavailable(
            "no usable municipality records".to_string(),
        ));
    }
    tracing::info!(count = municipalities.len(), "municipality dataset loaded");
    Ok(municipalities)
}

fn normalize_record(record: &Map<String, Value>) -> Option<Municipality> {
    let lat = first_number(record, LAT_KEYS)?;
    let lon = first_number(record, LON_KEYS)?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    let region = first_string(record, REGION_KEYS);
    let name = record_name(record, region.as_deref())?;
    Some(Municipality::new(name, region, lat, lon))
}

fn record_name(record: &Map<String, Value>, region: Option<&str>) -> Option<String> {
    if let Some(name) = first_string(record, &["name", "municipality"]) {
        return Some(name);
    }
    let city = first_string(record, &["city"])?;
    Some(match region {
        Some(pref) => format!("{}{}", pref, city),
        None => city,
    })
}

fn first_number(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(|value| match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|v| v.is_finite())
}

fn first_string(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(|value| value.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_field_name_variants() {
        let doc = json!([
            {"name": "Hamamatsu", "lat": 34.71, "lng": 137.73},
            {"municipality": "Shizuoka", "latitude": "34.98", "longitude": 138.38},
            {"pref": "静岡県", "city": "磐田市", "lat": 34.72, "long": 137.85},
            {"city": "Kakegawa", "latitude": 34.77, "lon": 138.01}
        ]);
        let municipalities = normalize(&doc).unwrap();
        let names: Vec<_> = municipalities.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Hamamatsu", "Shizuoka", "静岡県磐田市", "Kakegawa"]);
        assert_eq!(municipalities[1].location.lat(), 34.98);
        assert_eq!(municipalities[2].region.as_deref(), Some("静岡県"));
        assert_eq!(municipalities[3].location.lon(), 138.01);
    }

    #[test]
    fn accepts_wrapped_document() {
        let text = r#"{"municipalities": [{"name": "Tsu", "lat": 34.73, "lon": 136.51}]}"#;
        let municipalities = parse_dataset(text).unwrap();
        assert_eq!(municipalities.len(), 1);
    }

    #[test]
    fn skips_records_without_coordinates() {
        let doc = json!([
            {"name": "NoCoords"},
            {"name": "Zero", "lat": "n/a", "lon": 10.0},
            {"name": "Ok", "lat": 35.0, "lon": 135.0}
        ]);
        let municipalities = normalize(&doc).unwrap();
        assert_eq!(municipalities.len(), 1);
        assert_eq!(municipalities[0].name, "Ok");
    }

    #[test]
    fn empty_or_malformed_is_unavailable() {
        assert!(matches!(
            normalize(&json!([])),
            Err(PlannerError::DatasetUnavailable(_))
        ));
        assert!(matches!(
            normalize(&json!({"items": []})),
            Err(PlannerError::DatasetUnavailable(_))
        ));
        assert!(matches!(
            parse_dataset("not json"),
            Err(PlannerError::DatasetUnavailable(_))
        ));
    }
}
