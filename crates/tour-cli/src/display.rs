//! Plain-text rendering for the terminal.

use std::fmt::Write;
use tour_core::{Candidate, PlanEvent, PlanSummary};

/// Numbered offer, one candidate per line.
pub fn format_candidates(step: usize, candidates: &[Candidate], relaxed: bool) -> String {
    let mut out = format!("Destination {} candidates:\n", step);
    if relaxed {
        out.push_str("  (nothing inside the distance band, showing the nearest instead)\n");
    }
    for (i, candidate) in candidates.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}) {}  ({:.1} km)",
            i + 1,
            candidate.municipality.name,
            candidate.distance_km
        );
    }
    out
}

/// One line for events worth echoing, `None` for the rest.
pub fn describe_event(event: &PlanEvent) -> Option<String> {
    match event {
        PlanEvent::OriginResolved { waypoint } => Some(format!(
            "Origin: {} ({:.5}, {:.5})",
            waypoint.name,
            waypoint.point.lat(),
            waypoint.point.lon()
        )),
        PlanEvent::SegmentAdded { segment } => Some(format!(
            "Leg {} → {}: {:.1} km, {:.0} min",
            segment.from.name, segment.to.name, segment.distance_km, segment.duration_min
        )),
        PlanEvent::PlanComplete { legs } => Some(format!("Plan complete with {} legs.", legs)),
        PlanEvent::PlanReset => Some("Plan reset.".to_string()),
        PlanEvent::ErrorOccurred { message, .. } => Some(format!("Error: {}", message)),
        PlanEvent::CandidatesProposed { .. } | PlanEvent::WaypointAdded { .. } => None,
    }
}

/// Per-leg table followed by the totals.
pub fn format_summary(summary: &PlanSummary) -> String {
    let width = summary
        .per_segment
        .iter()
        .map(|line| line.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Total".len());

    let mut out = String::new();
    for (i, line) in summary.per_segment.iter().enumerate() {
        let pad = width - line.label.chars().count();
        let _ = writeln!(
            out,
            "{:>2}. {}{}  {:>8.1} km  {:>5} min",
            i + 1,
            line.label,
            " ".repeat(pad),
            line.distance_km,
            line.minutes
        );
    }
    let _ = writeln!(
        out,
        "    {:<width$}  {:>8.1} km  {:>9}",
        "Total",
        summary.total_distance_km,
        summary.total_time,
        width = width
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tour_core::{
        summarize, GeoPoint, Municipality, PlanState, RouteSegment, Waypoint, WaypointRole,
    };

    fn waypoint(name: &str, role: WaypointRole) -> Waypoint {
        Waypoint {
            name: name.to_string(),
            point: GeoPoint::new(35.0, 137.0),
            role,
        }
    }

    fn segment(from: &str, to: &str, step: usize, km: f64, min: f64) -> RouteSegment {
        let from_role = if step == 1 {
            WaypointRole::Origin
        } else {
            WaypointRole::Destination(step - 1)
        };
        RouteSegment {
            from: waypoint(from, from_role),
            to: waypoint(to, WaypointRole::Destination(step)),
            distance_km: km,
            duration_min: min,
            geometry: None,
        }
    }

    #[test]
    fn candidates_are_numbered_from_one() {
        let candidates = vec![
            Candidate {
                municipality: Municipality::new("Tsu", None, 34.73, 136.51),
                distance_km: 152.34,
            },
            Candidate {
                municipality: Municipality::new("Gifu", None, 35.42, 136.76),
                distance_km: 201.0,
            },
        ];
        let text = format_candidates(1, &candidates, false);
        assert!(text.contains("  1) Tsu  (152.3 km)"));
        assert!(text.contains("  2) Gifu  (201.0 km)"));
        assert!(!text.contains("nearest"));
        assert!(format_candidates(2, &candidates, true).contains("nearest"));
    }

    #[test]
    fn summary_table_has_rows_and_totals() {
        let plan = PlanState {
            waypoints: Vec::new(),
            segments: vec![
                segment("Tokyo", "Shizuoka", 1, 120.4, 95.0),
                segment("Shizuoka", "Hamamatsu", 2, 60.0, 50.0),
                segment("Hamamatsu", "Nagoya", 3, 80.1, 70.0),
            ],
            step: 3,
            complete: true,
        };
        let text = format_summary(&summarize(&plan));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with(" 1. Tokyo → Shizuoka"));
        assert!(lines[0].contains("120.4 km"));
        assert!(lines[3].contains("Total"));
        assert!(lines[3].contains("260.5 km"));
        assert!(lines[3].ends_with("3h35m"));
    }

    #[test]
    fn quiet_events_are_skipped() {
        let event = PlanEvent::WaypointAdded {
            waypoint: waypoint("Tsu", WaypointRole::Destination(1)),
        };
        assert_eq!(describe_event(&event), None);
        assert_eq!(
            describe_event(&PlanEvent::PlanComplete { legs: 3 }).as_deref(),
            Some("Plan complete with 3 legs.")
        );
    }
}
