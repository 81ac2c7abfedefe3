use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::{LoginService, SessionStore};

#[derive(Clone)]
pub struct AuthState {
    pub login: Arc<LoginService>,
    pub session: Arc<SessionStore>,
}

pub fn auth_routes(state: AuthState) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/session", get(handlers::session_status))
        .with_state(state)
}
