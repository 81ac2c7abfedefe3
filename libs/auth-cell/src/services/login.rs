use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_resource::{ConsultationApiClient, FetchError};

use crate::models::{
    LoginError, LoginRequest, LoginResponse, INVALID_CREDENTIALS_MESSAGE, LOGIN_SUCCESS_MESSAGE,
    NETWORK_ERROR_MESSAGE,
};
use crate::services::session::{SessionStore, ADMIN_TOKEN_KEY};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub struct LoginService {
    client: ConsultationApiClient,
}

impl LoginService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(ConsultationApiClient::new(config))
    }

    pub fn with_client(client: ConsultationApiClient) -> Self {
        Self { client }
    }

    /// Checks the login form the same way the form itself would before submitting.
    pub fn validate(request: &LoginRequest) -> Result<(), LoginError> {
        if request.email.is_empty() {
            return Err(LoginError::Validation("Please input your email!".to_string()));
        }
        if !EMAIL_PATTERN.is_match(&request.email) {
            return Err(LoginError::Validation("Please enter a valid email address!".to_string()));
        }
        if request.password.is_empty() {
            return Err(LoginError::Validation("Please input your password!".to_string()));
        }
        Ok(())
    }

    /// Posts the credentials and, on success, stores the token in the session.
    pub async fn login(&self, request: &LoginRequest, session: &SessionStore) -> Result<LoginResponse, LoginError> {
        Self::validate(request)?;
        debug!("Logging in admin {}", request.email);

        let body = self.client
            .login_admin(&request.email, &request.password)
            .await
            .map_err(|err| match err {
                FetchError::HttpStatus { message, .. } => {
                    LoginError::Rejected(message.unwrap_or_else(|| INVALID_CREDENTIALS_MESSAGE.to_string()))
                }
                FetchError::Network(_) | FetchError::Decode(_) => {
                    warn!("Login request failed: {}", err);
                    LoginError::Network(NETWORK_ERROR_MESSAGE.to_string())
                }
            })?;

        let Some(token) = body.get("token").and_then(Value::as_str) else {
            let message = body.get("message").and_then(Value::as_str).unwrap_or(INVALID_CREDENTIALS_MESSAGE);
            warn!("Login response carried no token");
            return Err(LoginError::Rejected(message.to_string()));
        };

        session.set(ADMIN_TOKEN_KEY, token.to_string()).await;
        info!("Admin {} logged in", request.email);

        Ok(LoginResponse {
            message: LOGIN_SUCCESS_MESSAGE.to_string(),
            token: token.to_string(),
        })
    }
}
