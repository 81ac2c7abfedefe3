use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

/// Key the admin session token is stored under.
pub const ADMIN_TOKEN_KEY: &str = "adminToken";

/// Process-local key/value storage for client-side session state.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, key: &str, value: String) {
        debug!("Storing session entry {}", key);
        self.entries.write().await.insert(key.to_string(), value);
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn remove(&self, key: &str) -> Option<String> {
        self.entries.write().await.remove(key)
    }

    pub async fn admin_token(&self) -> Option<String> {
        self.get(ADMIN_TOKEN_KEY).await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.entries.read().await.contains_key(ADMIN_TOKEN_KEY)
    }

    pub async fn clear_admin_token(&self) {
        self.remove(ADMIN_TOKEN_KEY).await;
    }
}
