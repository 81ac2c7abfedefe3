use std::sync::Arc;
use serde_json::{json, Value};

use shared_config::{AppConfig, DEFAULT_CONSOLE_PORT};

pub struct TestConfig {
    pub consultation_api_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            // Nothing listens here; requests fail at the transport level.
            consultation_api_url: "http://127.0.0.1:9".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_api_url(url: impl Into<String>) -> Self {
        Self {
            consultation_api_url: url.into(),
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            consultation_api_url: self.consultation_api_url.clone(),
            console_port: DEFAULT_CONSOLE_PORT,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned payloads shaped like the consultation management API.
pub struct MockConsultationApiResponses;

impl MockConsultationApiResponses {
    pub fn psychologist(id: &str, username: &str, is_active: bool) -> Value {
        json!({
            "_id": id,
            "username": username,
            "email": format!("{}@clinic.example", username),
            "specialization": "Child Psychology",
            "isActive": is_active
        })
    }

    pub fn user(id: &str, username: &str, children: usize) -> Value {
        let children: Vec<Value> = (0..children)
            .map(|n| json!({ "_id": format!("{}-child-{}", id, n), "name": format!("Child {}", n) }))
            .collect();

        json!({
            "_id": id,
            "username": username,
            "email": format!("{}@family.example", username),
            "children": children
        })
    }

    pub fn consultation(id: &str, user_id: &str, psychologist_id: &str) -> Value {
        json!({
            "_id": id,
            "userId": user_id,
            "psychologistId": psychologist_id,
            "status": "scheduled",
            "timeSlot": {
                "startTime": "2024-12-25T10:00:00Z",
                "endTime": "2024-12-25T10:30:00Z"
            },
            "meetLink": format!("https://meet.example/{}", id),
            "verifiedByUser": false,
            "CompletedByPsychologist": false
        })
    }

    pub fn psychologists_response(psychologists: Vec<Value>) -> Value {
        json!({ "data": psychologists })
    }

    pub fn users_response(users: Vec<Value>) -> Value {
        json!({ "data": users })
    }

    /// The consultations endpoint answers with a bare array.
    pub fn consultations_response(consultations: Vec<Value>) -> Value {
        Value::Array(consultations)
    }

    pub fn login_response(token: &str) -> Value {
        json!({
            "token": token,
            "message": "Login successful"
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({ "message": message })
    }
}
