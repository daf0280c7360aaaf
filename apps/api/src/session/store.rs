use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::session::models::InterviewSession;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// True once more than `ttl` has passed since `since`. Timestamps in the future never expire.
pub fn is_expired(since: DateTime<Utc>, ttl: Duration, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(since)
        .to_std()
        .map_or(false, |age| age > ttl)
}

/// In-process interview sessions keyed by session id.
///
/// Each session is independent; nothing is shared between users. State is lost on restart.
/// Sessions older than the TTL are dropped the next time one is inserted.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, InterviewSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn insert(&self, session: InterviewSession) -> Uuid {
        let id = session.id;
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !is_expired(s.created_at, self.ttl, now));
        if sessions.len() < before {
            debug!("Evicted {} expired sessions", before - sessions.len());
        }
        sessions.insert(id, session);
        id
    }


    /// Snapshot of a session. Do not hold it across a model call expecting it to stay current.
    pub async fn get(&self, id: Uuid) -> Option<InterviewSession> {
        self.inner
            .read()
            .await
            .get(&id)
            .filter(|s| !is_expired(s.created_at, self.ttl, Utc::now()))
            .cloned()
    }

    /// Runs `f` against the live session under the write lock.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut InterviewSession) -> R) -> Option<R> {
        self.inner
            .write()
            .await
            .get_mut(&id)
            .filter(|s| !is_expired(s.created_at, self.ttl, Utc::now()))
            .map(f)
    }

    pub async fn remove(&self, id: Uuid) -> Option<InterviewSession> {
        self.inner.write().await.remove(&id)
    }

    /// Drops every session owned by `owner`, returning how many were removed.
    pub async fn remove_owned_by(&self, owner: &str) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.owner.as_deref() != Some(owner));
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluator::Evaluation;
    use crate::questions::generator::InterviewRound;
    use crate::session::models::QuestionSource;

    fn session_for(owner: Option<&str>) -> InterviewSession {
        InterviewSession::new(
            owner.map(String::from),
            QuestionSource::Role {
                role: "QA Engineer".to_string(),
                round: InterviewRound::Hr,
            },
            vec!["Why this team?".to_string(), "Biggest failure?".to_string()],
        )
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.insert(session_for(Some("alice"))).await;
        let b = store.insert(session_for(Some("bob"))).await;

        store
            .update(a, |s| s.record_answer(0, "Growth".to_string(), Evaluation::fallback()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(store.get(a).await.unwrap().cursor(), 1);
        assert_eq!(store.get(b).await.unwrap().cursor(), 0);
        assert_eq!(store.get(b).await.unwrap().aggregator().answered(), 0);
    }

    #[tokio::test]
    async fn test_expired_sessions_evicted_on_insert() {
        let store = SessionStore::with_ttl(Duration::from_secs(60 * 60));
        let mut stale = session_for(None);
        stale.created_at = Utc::now() - chrono::Duration::hours(2);
        let stale = store.insert(stale).await;
        assert!(store.get(stale).await.is_none());
        assert!(store.update(stale, |s| s.cursor()).await.is_none());
        assert!(store.inner.read().await.contains_key(&stale));

        let fresh = store.insert(session_for(Some("alice"))).await;
        assert!(!store.inner.read().await.contains_key(&stale));
        assert!(store.get(fresh).await.is_some());
        assert_eq!(store.inner.read().await.len(), 1);
    }

    #[test]
    fn test_is_expired_boundaries() {
        let now = Utc::now();
        let ttl = Duration::from_secs(60);
        assert!(!is_expired(now, ttl, now));
        assert!(!is_expired(now - chrono::Duration::seconds(60), ttl, now));
        assert!(is_expired(now - chrono::Duration::seconds(61), ttl, now));
        assert!(!is_expired(now + chrono::Duration::seconds(600), ttl, now));
    }

    #[tokio::test]
    async fn test_update_missing_session_is_none() {
        let store = SessionStore::new();
        assert!(store.update(Uuid::new_v4(), |s| s.cursor()).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_owned_by_only_touches_that_owner() {
        let store = SessionStore::new();
        store.insert(session_for(Some("alice"))).await;
        store.insert(session_for(Some("alice"))).await;
        let bob = store.insert(session_for(Some("bob"))).await;
        let anonymous = store.insert(session_for(None)).await;

        assert_eq!(store.remove_owned_by("alice").await, 2);
        assert!(store.get(bob).await.is_some());
        assert!(store.get(anonymous).await.is_some());
    }

    #[tokio::test]
    async fn test_remove_returns_session() {
        let store = SessionStore::new();
        let id = store.insert(session_for(None)).await;
        assert!(store.remove(id).await.is_some());
        assert!(store.get(id).await.is_none());
    }
}
