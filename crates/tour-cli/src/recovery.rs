//! What the terminal loop does when a step fails.

use tour_core::{ErrorKind, PlannerError};

#[derive(Debug, PartialEq)]
pub enum Recovery {
    /// Stop planning and print the legs routed so far.
    Finish,
    /// Keep the current offer open and ask again.
    Retry,
    /// Not recoverable at the step boundary.
    Abort(PlannerError),
}

/// Empty bands end the run with the partial plan; a missing road lets an
/// interactive user pick another candidate.
pub fn recovery_for(err: PlannerError, auto: bool) -> Recovery {
    match err.kind() {
        ErrorKind::EmptyCandidatePool => Recovery::Finish,
        ErrorKind::NoRouteFound if auto => Recovery::Finish,
        ErrorKind::NoRouteFound => Recovery::Retry,
        _ => Recovery::Abort(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_band() -> PlannerError {
        PlannerError::EmptyCandidatePool {
            min_km: 50.0,
            max_km: 100.0,
        }
    }

    fn no_route() -> PlannerError {
        PlannerError::NoRouteFound {
            from: "Shizuoka".to_string(),
            to: "Oshima".to_string(),
            reason: "NoRoute".to_string(),
        }
    }

    #[test]
    fn empty_band_keeps_partial_plan() {
        assert_eq!(recovery_for(empty_band(), false), Recovery::Finish);
        assert_eq!(recovery_for(empty_band(), true), Recovery::Finish);
    }

    #[test]
    fn missing_route_retries_only_when_interactive() {
        assert_eq!(recovery_for(no_route(), false), Recovery::Retry);
        assert_eq!(recovery_for(no_route(), true), Recovery::Finish);
    }

    #[test]
    fn other_errors_abort() {
        let err = PlannerError::InvalidBandConfiguration("min > max".to_string());
        assert_eq!(recovery_for(err.clone(), false), Recovery::Abort(err));
    }
}
