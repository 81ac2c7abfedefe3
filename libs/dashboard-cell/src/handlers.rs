use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, info};

use shared_models::AppError;

use crate::models::{SelectViewRequest, ViewSelector};
use crate::router::DashboardAppState;
use crate::services::DashboardSnapshot;

pub async fn get_dashboard(State(state): State<DashboardAppState>) -> Json<DashboardSnapshot> {
    Json(state.controller.snapshot().await)
}

/// Runs a view transition. Fetch failures surface as notices in the snapshot.
#[axum::debug_handler]
pub async fn select_view(
    State(state): State<DashboardAppState>,
    Json(request): Json<SelectViewRequest>,
) -> Result<Json<DashboardSnapshot>, AppError> {
    let view: ViewSelector = request.view.parse().map_err(AppError::BadRequest)?;

    if view == ViewSelector::FilteredConsultations {
        return Err(AppError::BadRequest(
            "filteredConsultations is opened from a psychologist's consultations".to_string(),
        ));
    }

    let outcome = state.controller.select_view(view).await;
    debug!("Transition to {} finished: {:?}", view, outcome);

    Ok(Json(state.controller.snapshot().await))
}

pub async fn view_psychologist_consultations(
    State(state): State<DashboardAppState>,
    Path(psychologist_id): Path<String>,
) -> Json<DashboardSnapshot> {
    state.controller.view_consultations_for(&psychologist_id).await;

    Json(state.controller.snapshot().await)
}

pub async fn deactivate_psychologist(
    State(state): State<DashboardAppState>,
    Path(psychologist_id): Path<String>,
) -> Json<DashboardSnapshot> {
    if let Err(err) = state.controller.deactivate(&psychologist_id).await {
        debug!("Deactivation of {} reported as notice: {}", psychologist_id, err);
    }

    Json(state.controller.snapshot().await)
}

pub async fn logout(State(state): State<DashboardAppState>) -> Json<DashboardSnapshot> {
    state.session.clear_admin_token().await;
    state.controller.logout().await;
    info!("Admin logged out");

    Json(state.controller.snapshot().await)
}
