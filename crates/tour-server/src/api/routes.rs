//! REST API routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::plans;
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/plans", post(plans::create_plan))
        .route(
            "/v1/plans/:id",
            get(plans::get_plan).delete(plans::delete_plan),
        )
        .route("/v1/plans/:id/propose", post(plans::propose))
        .route("/v1/plans/:id/choose", post(plans::choose))
        .route("/v1/plans/:id/reset", post(plans::reset))
        .route("/v1/plans/:id/summary", get(plans::summary))
        .route("/v1/config", get(planner_config))
}

/// Active bands and counts, for clients that label their offers.
async fn planner_config(State(state): State<Arc<AppState>>) -> Json<Value> {
    let config = state.planner_config();
    Json(json!({
        "step1_band": config.step1_band,
        "later_band": config.later_band,
        "leg_count": config.leg_count,
        "candidate_count": config.candidate_count,
        "empty_pool_policy": config.empty_pool_policy,
        "active_plans": state.session_count(),
    }))
}
