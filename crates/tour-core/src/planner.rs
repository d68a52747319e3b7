//! Sequential waypoint-selection state machine.
//!
//! `start` → (`propose` → `choose`) × N → complete. The planner owns the
//! [`PlanState`] and only mutates it after an external call has succeeded,
//! so a failed or cancelled call leaves the plan exactly as it was.

use crate::candidates::{CandidatePool, CandidateSelector};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::events::PlanEvent;
use crate::models::{
    Candidate, Municipality, PlanState, RouteSegment, TravelMode, Waypoint, WaypointRole,
};
use crate::routing::{Geocoder, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlannerState {
    Idle,
    /// Origin or previous destination fixed; candidates for `step` not drawn yet.
    Proposing { step: usize },
    AwaitingSelection {
        step: usize,
        candidates: Vec<Candidate>,
        relaxed: bool,
    },
    Complete,
}

impl fmt::Display for PlannerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerState::Idle => write!(f, "idle"),
            PlannerState::Proposing { step } => write!(f, "proposing step {}", step),
            PlannerState::AwaitingSelection { step, .. } => {
                write!(f, "awaiting selection for step {}", step)
            }
            PlannerState::Complete => write!(f, "complete"),
        }
    }
}

pub struct RoutePlanner {
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn Router>,
    selector: CandidateSelector,
    config: PlannerConfig,
    rng: StdRng,
    plan: PlanState,
    state: PlannerState,
    events: Vec<PlanEvent>,
}

impl RoutePlanner {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn Router>,
        pool: Arc<CandidatePool>,
        config: PlannerConfig,
    ) -> Result<Self> {
        Self::with_rng(geocoder, router, pool, config, StdRng::from_os_rng())
    }

    /// Build a planner with a caller-supplied random source (seeded in tests).
    ///
    /// The selector's empty-pool policy is always `config.empty_pool_policy`.
    pub fn with_rng(
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn Router>,
        pool: Arc<CandidatePool>,
        config: PlannerConfig,
        rng: StdRng,
    ) -> Result<Self> {
        config.validate()?;
        let selector = CandidateSelector::new(pool, config.empty_pool_policy);
        Ok(Self {
            geocoder,
            router,
            selector,
            config,
            rng,
            plan: PlanState::default(),
            state: PlannerState::Idle,
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn plan(&self) -> &PlanState {
        &self.plan
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Candidates currently on offer, empty unless awaiting a selection.
    pub fn offered(&self) -> &[Candidate] {
        match &self.state {
            PlannerState::AwaitingSelection { candidates, .. } => candidates,
            _ => &[],
        }
    }

    /// Drain queued events in the order they happened.
    pub fn take_events(&mut self) -> Vec<PlanEvent> {
        std::mem::take(&mut self.events)
    }

    /// Resolve the origin and begin a new plan at step 1.
    ///
    /// Accepted from `Idle`, or from `Complete` to plan a fresh route.
    pub async fn start(&mut self, origin_query: &str) -> Result<&PlanState> {
        if !matches!(self.state, PlannerState::Idle | PlannerState::Complete) {
            let err = invalid("start", &self.state);
            return Err(self.fail(err));
        }

        let resolved = self.geocoder.resolve(origin_query).await;
        let point = match resolved {
            Ok(point) if point.is_valid() => point,
            Ok(_) => {
                let err = PlannerError::GeocodeNotFound(origin_query.to_string());
                return Err(self.fail(err));
            }
            Err(err) => return Err(self.fail(err)),
        };

        let name = point
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| origin_query.trim().to_string());
        let origin = Waypoint {
            name,
            point,
            role: WaypointRole::Origin,
        };
        tracing::info!(
            origin = %origin.name,
            lat = origin.point.lat(),
            lon = origin.point.lon(),
            "origin resolved"
        );

        self.plan = PlanState::with_origin(origin.clone());
        self.state = PlannerState::Proposing { step: 1 };
        self.events.push(PlanEvent::OriginResolved { waypoint: origin });
        Ok(&self.plan)
    }

    /// Draw candidates for the current step.
    ///
    /// Also accepted while awaiting a selection, to re-draw the offer.
    pub fn propose(&mut self) -> Result<&[Candidate]> {
        let step = match &self.state {
            PlannerState::Proposing { step } | PlannerState::AwaitingSelection { step, .. } => {
                *step
            }
            other => {
                let err = invalid("propose", other);
                return Err(self.fail(err));
            }
        };
        let Some(base) = self.plan.last_waypoint().map(|wp| wp.point.clone()) else {
            let err = invalid("propose", &self.state);
            return Err(self.fail(err));
        };

        let band = self.config.band_for_step(step);
        let selection = match self.selector.select(
            &base,
            band,
            self.config.candidate_count,
            &mut self.rng,
        ) {
            Ok(selection) => selection,
            Err(err) => return Err(self.fail(err)),
        };

        if selection.is_empty() {
            let err = PlannerError::EmptyCandidatePool {
                min_km: band.min_km,
                max_km: band.max_km,
            };
            return Err(self.fail(err));
        }

        tracing::debug!(
            step,
            count = selection.candidates.len(),
            relaxed = selection.relaxed,
            "candidates proposed"
        );
        self.events.push(PlanEvent::CandidatesProposed {
            step,
            candidates: selection.candidates.clone(),
            relaxed: selection.relaxed,
        });
        self.state = PlannerState::AwaitingSelection {
            step,
            candidates: selection.candidates,
            relaxed: selection.relaxed,
        };
        Ok(self.offered())
    }

    /// Route from the last waypoint to `candidate` and append the leg.
    ///
    /// On router failure nothing is appended and the same offer stays open,
    /// so another candidate can be chosen.
    pub async fn choose(
        &mut self,
        candidate: &Municipality,
        mode: TravelMode,
    ) -> Result<RouteSegment> {
        let step = match self.awaiting_step(candidate) {
            Ok(step) => step,
            Err(err) => return Err(self.fail(err)),
        };
        let Some(previous) = self.plan.last_waypoint().cloned() else {
            let err = invalid("choose", &self.state);
            return Err(self.fail(err));
        };

        let destination = Waypoint {
            name: candidate.name.clone(),
            point: candidate.location.clone(),
            role: WaypointRole::Destination(step),
        };

        let routed = self
            .router
            .route(&previous.point, &destination.point, mode)
            .await;
        let leg = match routed {
            Ok(leg) if leg.distance_m.is_finite() && leg.duration_s.is_finite() => leg,
            Ok(leg) => {
                let err = PlannerError::NoRouteFound {
                    from: previous.name.clone(),
                    to: destination.name.clone(),
                    reason: format!(
                        "router returned distance {} m, duration {} s",
                        leg.distance_m, leg.duration_s
                    ),
                };
                return Err(self.fail(err));
            }
            Err(err) => return Err(self.fail(err)),
        };

        let segment = RouteSegment {
            from: previous,
            to: destination.clone(),
            distance_km: leg.distance_m / 1000.0,
            duration_min: leg.duration_s / 60.0,
            geometry: leg.geometry,
        };
        tracing::info!(
            step,
            mode = %mode,
            from = %segment.from.name,
            to = %segment.to.name,
            distance_km = segment.distance_km,
            duration_min = segment.duration_min,
            "leg added"
        );

        self.plan.waypoints.push(destination.clone());
        self.plan.segments.push(segment.clone());
        self.events.push(PlanEvent::WaypointAdded {
            waypoint: destination,
        });
        self.events.push(PlanEvent::SegmentAdded {
            segment: segment.clone(),
        });

        if step < self.config.leg_count {
            self.plan.step = step + 1;
            self.state = PlannerState::Proposing { step: step + 1 };
        } else {
            self.plan.complete = true;
            self.state = PlannerState::Complete;
            self.events.push(PlanEvent::PlanComplete {
                legs: self.plan.segments.len(),
            });
        }
        Ok(segment)
    }

    /// [`choose`](Self::choose) by position in the current offer.
    pub async fn choose_index(&mut self, index: usize, mode: TravelMode) -> Result<RouteSegment> {
        let Some(candidate) = self.offered().get(index).map(|c| c.municipality.clone()) else {
            let err = match self.state {
                PlannerState::AwaitingSelection { .. } => {
                    PlannerError::UnknownCandidate(format!("#{}", index))
                }
                _ => invalid("choose", &self.state),
            };
            return Err(self.fail(err));
        };
        self.choose(&candidate, mode).await
    }

    /// Drop the plan and return to `Idle`. Valid from any state.
    pub fn reset(&mut self) {
        self.plan = PlanState::default();
        self.state = PlannerState::Idle;
        self.events.push(PlanEvent::PlanReset);
        tracing::debug!("plan reset");
    }

    fn awaiting_step(&self, candidate: &Municipality) -> Result<usize> {
        match &self.state {
            PlannerState::AwaitingSelection {
                step, candidates, ..
            } => {
                if candidates.iter().any(|c| &c.municipality == candidate) {
                    Ok(*step)
                } else {
                    Err(PlannerError::UnknownCandidate(candidate.name.clone()))
                }
            }
            other => Err(invalid("choose", other)),
        }
    }

    fn fail(&mut self, err: PlannerError) -> PlannerError {
        tracing::warn!(kind = ?err.kind(), state = %self.state, "{}", err);
        self.events.push(PlanEvent::ErrorOccurred {
            kind: err.kind(),
            message: err.to_string(),
        });
        err
    }
}

fn invalid(operation: &'static str, state: &PlannerState) -> PlannerError {
    PlannerError::InvalidTransition {
        operation,
        state: state.to_string(),
    }
}
