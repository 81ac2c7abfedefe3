use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use auth_cell::SessionStore;

use crate::handlers;
use crate::services::DashboardController;

#[derive(Clone)]
pub struct DashboardAppState {
    pub controller: Arc<DashboardController>,
    pub session: Arc<SessionStore>,
}

pub fn dashboard_routes(state: DashboardAppState) -> Router {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/view", post(handlers::select_view))
        .route(
            "/psychologists/{psychologist_id}/consultations",
            post(handlers::view_psychologist_consultations),
        )
        .route(
            "/psychologists/{psychologist_id}/deactivate",
            put(handlers::deactivate_psychologist),
        )
        .route("/logout", post(handlers::logout))
        .with_state(state)
}
