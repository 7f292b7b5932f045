use async_trait::async_trait;
use uuid::Uuid;

use crate::types::Article;
use crate::Result;

pub type SessionId = Uuid;

/// Per-browser-session holder for the article waiting to be classified.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store (or replace) the current article of a session
    async fn put(&self, session: SessionId, article: Article) -> Result<()>;

    /// Peek at the current article without consuming it
    async fn get(&self, session: SessionId) -> Result<Option<Article>>;

    /// Remove and return the current article
    async fn take(&self, session: SessionId) -> Result<Option<Article>>;

    /// Drop every expired entry, returning how many were removed
    async fn purge_expired(&self) -> Result<usize>;
}
