// Resume ingestion: upload → temp file → text extraction → ephemeral in-process store.
// Documents live until a session is started from them, the TTL passes, or the
// process exits.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::extraction::ResumeFormat;
use crate::session::store::is_expired;

pub const DEFAULT_RESUME_TTL: Duration = Duration::from_secs(60 * 60);

/// Extracted resume text awaiting question generation.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub id: Uuid,
    pub file_name: String,
    pub format: ResumeFormat,
    pub text: String,
    pub uploaded_at: DateTime<Utc>,
}

impl ResumeDocument {
    pub fn new(file_name: String, format: ResumeFormat, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            format,
            text,
            uploaded_at: Utc::now(),
        }
    }
}

/// Best-effort, process-local resume storage keyed by document id.
/// Documents never consumed are evicted once older than the TTL.
#[derive(Clone)]
pub struct ResumeStore {
    inner: Arc<RwLock<HashMap<Uuid, ResumeDocument>>>,
    ttl: Duration,
}

impl ResumeStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_RESUME_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn insert(&self, document: ResumeDocument) -> Uuid {
        let id = document.id;
        let now = Utc::now();
        let mut documents = self.inner.write().await;
        let before = documents.len();
        documents.retain(|_, d| !is_expired(d.uploaded_at, self.ttl, now));
        if documents.len() < before {
            debug!("Evicted {} unclaimed resumes", before - documents.len());
        }
        documents.insert(id, document);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<ResumeDocument> {
        self.inner
            .read()
            .await
            .get(&id)
            .filter(|d| !is_expired(d.uploaded_at, self.ttl, Utc::now()))
            .cloned()
    }

    pub async fn remove(&self, id: Uuid) -> Option<ResumeDocument> {
        self.inner.write().await.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resume_store_insert_get_remove() {
        let store = ResumeStore::new();
        let id = store
            .insert(ResumeDocument::new(
                "cv.png".to_string(),
                ResumeFormat::Image,
                "Jane Doe, Rust engineer".to_string(),
            ))
            .await;

        assert_eq!(store.get(id).await.unwrap().file_name, "cv.png");
        assert!(store.remove(id).await.is_some());
        assert!(store.get(id).await.is_none());
        assert!(store.remove(id).await.is_none());
    }

    #[tokio::test]
    async fn test_unclaimed_resumes_expire() {
        let store = ResumeStore::with_ttl(Duration::from_secs(60 * 60));
        let mut stale = ResumeDocument::new(
            "old.pdf".to_string(),
            ResumeFormat::Pdf,
            "Never used for an interview".to_string(),
        );
        stale.uploaded_at = Utc::now() - chrono::Duration::hours(3);
        let stale = store.insert(stale).await;
        assert!(store.get(stale).await.is_none());

        let fresh = store
            .insert(ResumeDocument::new(
                "new.pdf".to_string(),
                ResumeFormat::Pdf,
                "Fresh upload".to_string(),
            ))
            .await;
        assert!(store.get(fresh).await.is_some());
        let documents = store.inner.read().await;
        assert_eq!(documents.len(), 1);
        assert!(!documents.contains_key(&stale));
    }
}
