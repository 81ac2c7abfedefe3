use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::AppError;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials! Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error! Please check your connection.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub authenticated: bool,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoginError {
    /// The form was not filled in correctly; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The server answered but did not accept the credentials.
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Network(String),
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::Validation(msg) => AppError::ValidationError(msg),
            LoginError::Rejected(msg) => AppError::Auth(msg),
            LoginError::Network(msg) => AppError::ExternalService(msg),
        }
    }
}
