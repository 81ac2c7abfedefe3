use axum::{extract::State, Json};
use tracing::debug;

use shared_models::AppError;

use crate::models::{LoginRequest, LoginResponse, SessionStatus};
use crate::router::AuthState;

#[axum::debug_handler]
pub async fn login(
    State(state): State<AuthState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = state.login
        .login(&request, &state.session)
        .await?;

    Ok(Json(response))
}

pub async fn session_status(State(state): State<AuthState>) -> Json<SessionStatus> {
    debug!("Checking admin session");

    Json(SessionStatus {
        authenticated: state.session.is_authenticated().await,
    })
}
