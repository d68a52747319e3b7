//! Plan session endpoints.
//!
//! Every handler takes the session lock before touching the planner, so
//! requests against one plan are serialized.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tour_core::{
    summarize, Candidate, PlanEvent, PlanState, PlanSummary, PlannerState, TravelMode,
};

use crate::api::error::ApiError;
use crate::state::{AppState, PlanEntry, PlanSession};

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub origin: String,
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChooseRequest {
    /// Position in the current offer, zero-based.
    pub index: usize,
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanView {
    pub id: String,
    pub mode: TravelMode,
    pub created_at: DateTime<Utc>,
    pub state: PlannerState,
    pub plan: PlanState,
    pub candidates: Vec<Candidate>,
    /// Events since the previous response for this plan.
    pub events: Vec<PlanEvent>,
}

fn view(session: &PlanSession, entry: &mut PlanEntry) -> PlanView {
    PlanView {
        id: session.id.clone(),
        mode: entry.mode,
        created_at: session.created_at,
        state: entry.planner.state().clone(),
        plan: entry.planner.plan().clone(),
        candidates: entry.planner.offered().to_vec(),
        events: entry.planner.take_events(),
    }
}

fn parse_mode(mode: Option<&str>) -> Result<Option<TravelMode>, ApiError> {
    mode.map(|m| m.parse::<TravelMode>().map_err(ApiError::BadRequest))
        .transpose()
}

fn lookup(state: &AppState, id: &str) -> Result<Arc<PlanSession>, ApiError> {
    state
        .session(id)
        .ok_or_else(|| ApiError::PlanNotFound(id.to_string()))
}

/// Create a plan, resolve its origin and draw the first offer.
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanView>), ApiError> {
    if req.origin.trim().is_empty() {
        return Err(ApiError::BadRequest("origin must not be empty".to_string()));
    }
    let mode = parse_mode(req.mode.as_deref())?.unwrap_or_default();

    let session = state.create_session(mode)?;
    let mut entry = session.lock().await;

    let started = entry.planner.start(&req.origin).await.map(|_| ());
    let proposed = started.and_then(|_| entry.planner.propose().map(|_| ()));
    if let Err(err) = proposed {
        // A plan that cannot offer its first step is discarded.
        drop(entry);
        state.remove_session(&session.id);
        return Err(err.into());
    }

    tracing::info!(plan_id = %session.id, origin = %req.origin, %mode, "plan created");
    let body = view(&session, &mut entry);
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlanView>, ApiError> {
    let session = lookup(&state, &id)?;
    let mut entry = session.lock().await;
    Ok(Json(view(&session, &mut entry)))
}

/// Re-draw the offer for the current step.
pub async fn propose(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlanView>, ApiError> {
    let session = lookup(&state, &id)?;
    let mut entry = session.lock().await;
    entry.planner.propose()?;
    Ok(Json(view(&session, &mut entry)))
}

/// Choose an offered candidate. When more legs remain the next offer is
/// drawn straight away.
pub async fn choose(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ChooseRequest>,
) -> Result<Json<PlanView>, ApiError> {
    let session = lookup(&state, &id)?;
    let mode = parse_mode(req.mode.as_deref())?;
    let mut entry = session.lock().await;
    if let Some(mode) = mode {
        entry.mode = mode;
    }

    let mode = entry.mode;
    entry.planner.choose_index(req.index, mode).await?;

    if matches!(entry.planner.state(), PlannerState::Proposing { .. }) {
        // The leg is kept; an empty next band shows up as an error event.
        if let Err(err) = entry.planner.propose() {
            tracing::warn!(plan_id = %session.id, "next offer unavailable: {}", err);
        }
    }
    Ok(Json(view(&session, &mut entry)))
}

pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlanView>, ApiError> {
    let session = lookup(&state, &id)?;
    let mut entry = session.lock().await;
    entry.planner.reset();
    Ok(Json(view(&session, &mut entry)))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlanSummary>, ApiError> {
    let session = lookup(&state, &id)?;
    let entry = session.lock().await;
    Ok(Json(summarize(entry.planner.plan())))
}

pub async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    if state.remove_session(&id) {
        tracing::info!(plan_id = %id, "plan deleted");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

