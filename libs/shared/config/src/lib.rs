use std::env;
use tracing::warn;

pub const DEFAULT_CONSULTATION_API_URL: &str = "https://snapautism-backendd.onrender.com";
pub const DEFAULT_CONSOLE_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub consultation_api_url: String,
    pub console_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            consultation_api_url: env::var("CONSULTATION_API_URL")
                .unwrap_or_else(|_| {
                    warn!("CONSULTATION_API_URL not set, using default");
                    DEFAULT_CONSULTATION_API_URL.to_string()
                }),
            console_port: match env::var("CONSOLE_PORT") {
                Ok(raw) => raw.parse().unwrap_or_else(|_| {
                    warn!("CONSOLE_PORT is not a valid port ({}), using default", raw);
                    DEFAULT_CONSOLE_PORT
                }),
                Err(_) => DEFAULT_CONSOLE_PORT,
            },
        };

        if !config.is_configured() {
            warn!("Console not fully configured - consultation API URL is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.consultation_api_url.is_empty()
    }

    /// Joins an endpoint path onto the consultation API base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.consultation_api_url.trim_end_matches('/'), path)
    }
}
