use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::{auth_routes, AuthState, LoginService, SessionStore};
use dashboard_cell::{dashboard_routes, DashboardAppState, DashboardController};
use shared_config::AppConfig;

/// Everything the console keeps between requests. The session store is
/// shared: login writes the token, dashboard logout clears it.
#[derive(Clone)]
pub struct ConsoleState {
    pub auth: AuthState,
    pub dashboard: DashboardAppState,
}

impl ConsoleState {
    pub fn new(config: &AppConfig) -> Self {
        let session = Arc::new(SessionStore::new());

        Self {
            auth: AuthState {
                login: Arc::new(LoginService::new(config)),
                session: session.clone(),
            },
            dashboard: DashboardAppState {
                controller: Arc::new(DashboardController::new(config)),
                session,
            },
        }
    }
}

pub fn create_router(state: ConsoleState) -> Router {
    Router::new()
        .route("/", get(|| async { "SnapAutism admin console is running!" }))
        .nest("/auth", auth_routes(state.auth))
        .nest("/dashboard", dashboard_routes(state.dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use serde_json::Value;
    use tower::ServiceExt;

    use shared_utils::test_utils::TestConfig;

    #[tokio::test]
    async fn test_root_is_alive() {
        let app = create_router(ConsoleState::new(&TestConfig::default().to_app_config()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_session_is_shared_between_cells() {
        let state = ConsoleState::new(&TestConfig::default().to_app_config());
        state.auth.session.set(auth_cell::ADMIN_TOKEN_KEY, "tok".to_string()).await;
        let app = create_router(state.clone());

        let logout = Request::builder()
            .method("POST")
            .uri("/dashboard/logout")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(logout).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let status = Request::builder().uri("/auth/session").body(Body::empty()).unwrap();
        let response = app.oneshot(status).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["authenticated"], false);
    }
}
