//! Distance and time totals over a plan.

use crate::models::PlanState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentLine {
    /// `"{from} → {to}"`
    pub label: String,
    pub distance_km: f64,
    /// Rounded for display.
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_distance_km: f64,
    /// Unrounded sum of segment durations.
    pub total_minutes: f64,
    /// `total_minutes` rounded once, e.g. `3h35m`.
    pub total_time: String,
    pub per_segment: Vec<SegmentLine>,
}

/// Summarize the segments of `plan`.
///
/// Totals accumulate raw values; only the display fields are rounded.
pub fn summarize(plan: &PlanState) -> PlanSummary {
    let per_segment = plan
        .segments
        .iter()
        .map(|segment| SegmentLine {
            label: format!("{} → {}", segment.from.name, segment.to.name),
            distance_km: segment.distance_km,
            minutes: round_minutes(segment.duration_min),
        })
        .collect();

    let total_distance_km = plan.segments.iter().map(|s| s.distance_km).sum();
    let total_minutes = plan.segments.iter().map(|s| s.duration_min).sum();

    PlanSummary {
        total_distance_km,
        total_minutes,
        total_time: format_duration(total_minutes),
        per_segment,
    }
}

/// Split minutes into whole hours and remaining minutes after rounding.
pub fn hours_minutes(minutes: f64) -> (u64, u64) {
    let total = round_minutes(minutes);
    (total / 60, total % 60)
}

pub fn format_duration(minutes: f64) -> String {
    let (h, m) = hours_minutes(minutes);
    format!("{}h{:02}m", h, m)
}

fn round_minutes(minutes: f64) -> u64 {
    if minutes.is_finite() && minutes > 0.0 {
        minutes.round() as u64
    } else {
        0
    }
}
