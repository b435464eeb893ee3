use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::SessionRecord;
use storage::Storage;
use tokio::sync::RwLock;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_ID_KEY: &str = "user_id";

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Writes token and user id as one unit.
    async fn store_session(&self, record: &SessionRecord) -> Result<()> {
        self.set(AUTH_TOKEN_KEY, record.token.as_str()).await?;
        self.set(USER_ID_KEY, record.user_id.as_str()).await
    }

    async fn load_session(&self) -> Result<Option<SessionRecord>> {
        let token = self.get(AUTH_TOKEN_KEY).await?;
        let user_id = self.get(USER_ID_KEY).await?;
        Ok(match (token, user_id) {
            (Some(token), Some(user_id)) => Some(SessionRecord::new(token, user_id)),
            _ => None,
        })
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn store_session(&self, record: &SessionRecord) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(AUTH_TOKEN_KEY.to_string(), record.token.0.clone());
        entries.insert(USER_ID_KEY.to_string(), record.user_id.0.clone());
        Ok(())
    }
}

/// Session keys kept in the SQLite key/value table so they survive restarts.
#[derive(Clone)]
pub struct SqliteSessionStore {
    storage: Storage,
}

impl SqliteSessionStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn open(database_url: &str) -> Result<Self> {
        Ok(Self::new(Storage::new(database_url).await?))
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set(key, value).await
    }

    async fn store_session(&self, record: &SessionRecord) -> Result<()> {
        self.storage
            .set_many(&[
                (AUTH_TOKEN_KEY, record.token.as_str()),
                (USER_ID_KEY, record.user_id.as_str()),
            ])
            .await
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
