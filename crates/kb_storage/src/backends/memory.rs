use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kb_core::{Article, Error, Result, SessionId, SessionStore};
use tokio::sync::RwLock;
use tracing::debug;

use crate::DEFAULT_SESSION_TTL;

#[derive(Debug, Clone)]
pub struct MemoryConfig {
    pub ttl: Duration,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_SESSION_TTL,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    article: Article,
    stored_at: DateTime<Utc>,
}

struct MemoryStore {
    entries: HashMap<SessionId, Entry>,
    ttl: chrono::Duration,
}

impl MemoryStore {
    fn new(ttl: chrono::Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    fn is_live(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.stored_at < self.ttl
    }

    fn get(&self, session: SessionId, now: DateTime<Utc>) -> Option<Article> {
        self.entries
            .get(&session)
            .filter(|entry| self.is_live(entry, now))
            .map(|entry| entry.article.clone())
    }

    fn take(&mut self, session: SessionId, now: DateTime<Utc>) -> Option<Article> {
        let entry = self.entries.remove(&session)?;
        self.is_live(&entry, now).then_some(entry.article)
    }

    fn purge(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.stored_at < ttl);
        before - self.entries.len()
    }
}

/// Session store kept in process memory. One pending article per session;
/// a newer `put` replaces the older one.
#[derive(Clone)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new(config: MemoryConfig) -> Result<Self> {
        let ttl = chrono::Duration::from_std(config.ttl)
            .map_err(|e| Error::Storage(format!("invalid session ttl: {}", e)))?;
        if ttl <= chrono::Duration::zero() {
            return Err(Error::Storage("session ttl must be positive".to_string()));
        }
        Ok(Self {
            store: Arc::new(RwLock::new(MemoryStore::new(ttl))),
        })
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    #[cfg(test)]
    async fn backdate(&self, session: SessionId, by: chrono::Duration) {
        if let Some(entry) = self.store.write().await.entries.get_mut(&session) {
            entry.stored_at = entry.stored_at - by;
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStorage {
    async fn put(&self, session: SessionId, article: Article) -> Result<()> {
        let mut store = self.store.write().await;
        store.entries.insert(
            session,
            Entry {
                article,
                stored_at: Utc::now(),
            },
        );
        debug!("Stored pending article for session {}", session);
        Ok(())
    }

    async fn get(&self, session: SessionId) -> Result<Option<Article>> {
        let store = self.store.read().await;
        Ok(store.get(session, Utc::now()))
    }

    async fn take(&self, session: SessionId) -> Result<Option<Article>> {
        let mut store = self.store.write().await;
        Ok(store.take(session, Utc::now()))
    }

    async fn purge_expired(&self) -> Result<usize> {
        let mut store = self.store.write().await;
        let purged = store.purge(Utc::now());
        if purged > 0 {
            debug!("Purged {} expired sessions", purged);
        }
        Ok(purged)
    }
}
