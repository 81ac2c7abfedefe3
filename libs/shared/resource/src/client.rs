use reqwest::{
    Client, Method, Response,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
};
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::endpoints;
use crate::error::FetchError;

/// Thin client over the consultation management API. No retries, no timeouts:
/// every failure goes straight back to the caller.
#[derive(Clone)]
pub struct ConsultationApiClient {
    client: Client,
    config: AppConfig,
}

impl ConsultationApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Sends the request and fails on transport errors and non-success statuses.
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Response, FetchError> {
        let url = self.config.endpoint(path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url)
            .headers(self.get_headers());

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            FetchError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            let message = serde_json::from_str::<Value>(&error_text)
                .ok()
                .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string));

            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Performs a request and returns the parsed JSON body. An empty body reads as `null`.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, FetchError> {
        let response = self.send(method, path, body).await?;

        let bytes = response.bytes().await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }

    pub async fn fetch_psychologists(&self) -> Result<Value, FetchError> {
        self.request(Method::GET, endpoints::PSYCHOLOGISTS, None).await
    }

    pub async fn fetch_users(&self) -> Result<Value, FetchError> {
        self.request(Method::GET, endpoints::USERS, None).await
    }

    pub async fn fetch_consultations(&self) -> Result<Value, FetchError> {
        self.request(Method::GET, endpoints::CONSULTATIONS, None).await
    }

    /// Marks a psychologist inactive upstream. Only the status matters; the body is ignored.
    pub async fn inactivate_psychologist(&self, psychologist_id: &str) -> Result<(), FetchError> {
        let path = endpoints::inactivate_psychologist(psychologist_id);

        self.send(Method::PUT, &path, Some(json!({ "isActive": false }))).await?;
        Ok(())
    }

    pub async fn login_admin(&self, email: &str, password: &str) -> Result<Value, FetchError> {
        self.request(
            Method::POST,
            endpoints::LOGIN_ADMIN,
            Some(json!({ "email": email, "password": password })),
        ).await
    }
}
