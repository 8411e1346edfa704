//! In-memory session storage keyed by an opaque session id.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Attribute storage for one caller's session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn set_attribute(&self, key: &str, value: Value);
    async fn get_attribute(&self, key: &str) -> Option<Value>;
    async fn remove_attribute(&self, key: &str);
}

/// Session state for a single client.
#[derive(Debug, Default)]
pub struct MemorySession {
    attrs: RwLock<HashMap<String, Value>>,
}

#[async_trait]
impl SessionStore for MemorySession {
    async fn set_attribute(&self, key: &str, value: Value) {
        self.attrs.write().await.insert(key.to_string(), value);
    }

    async fn get_attribute(&self, key: &str) -> Option<Value> {
        self.attrs.read().await.get(key).cloned()
    }

    async fn remove_attribute(&self, key: &str) {
        self.attrs.write().await.remove(key);
    }
}

/// Maps session ids to live sessions. Sessions are created on first use and
/// kept until the process exits; no expiry is defined for this service.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<MemorySession>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Fetch the session for `id`, creating an empty one if absent.
    pub async fn session(&self, id: &str) -> Arc<MemorySession> {
        if let Some(session) = self.sessions.read().await.get(id) {
            return session.clone();
        }
        let mut sessions = self.sessions.write().await;
        sessions.entry(id.to_string()).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn attributes_roundtrip_within_a_session() {
        let session = MemorySession::default();
        session.set_attribute("who", json!({"id": 7})).await;
        assert_eq!(session.get_attribute("who").await, Some(json!({"id": 7})));

        session.remove_attribute("who").await;
        assert_eq!(session.get_attribute("who").await, None);
    }

    #[tokio::test]
    async fn sessions_are_isolated_by_id() {
        let manager = SessionManager::new();
        let a = manager.session("a").await;
        let b = manager.session("b").await;

        a.set_attribute("who", json!("alice")).await;
        assert_eq!(b.get_attribute("who").await, None);

        // same id resolves to the same session
        let a_again = manager.session("a").await;
        assert_eq!(a_again.get_attribute("who").await, Some(json!("alice")));
    }
}
