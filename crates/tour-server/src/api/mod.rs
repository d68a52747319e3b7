//! API routes for the tour server.

pub mod error;
pub mod plans;
mod routes;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}
