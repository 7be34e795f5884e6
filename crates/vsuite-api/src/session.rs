//! In-memory session store.
//!
//! A session carries the caller's API key and the most recent video
//! analysis. Replacing or removing the analysis drops its frame artifacts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use vsuite_models::{Credential, SessionId};
use vsuite_pipeline::VideoAnalysis;

use crate::error::{ApiError, ApiResult};
use crate::security::is_valid_session_id;

#[derive(Debug)]
pub struct Session {
    pub credential: Option<Credential>,
    pub video: Option<VideoAnalysis>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_demo(&self) -> bool {
        self.credential.is_none()
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, credential: Option<Credential>) -> SessionId {
        let id = SessionId::new();
        let session = Session {
            credential,
            video: None,
            created_at: Utc::now(),
        };
        info!(session_id = %id, demo = session.is_demo(), "Session created");
        self.sessions.write().await.insert(id.clone(), session);
        id
    }

    /// Remove a session; its artifacts go with it.
    pub async fn remove(&self, id: &str) -> ApiResult<()> {
        let key = Self::key(id)?;
        match self.sessions.write().await.remove(&key) {
            Some(_) => {
                info!(session_id = %id, "Session closed");
                Ok(())
            }
            None => Err(ApiError::session_not_found(id)),
        }
    }

    /// Credential of a session; `None` means demo mode.
    pub async fn credential(&self, id: &str) -> ApiResult<Option<Credential>> {
        let key = Self::key(id)?;
        self.sessions
            .read()
            .await
            .get(&key)
            .map(|s| s.credential.clone())
            .ok_or_else(|| ApiError::session_not_found(id))
    }

    /// Store a new video analysis, dropping the previous one.
    pub async fn set_video(&self, id: &str, analysis: Option<VideoAnalysis>) -> ApiResult<()> {
        let key = Self::key(id)?;
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&key)
            .ok_or_else(|| ApiError::session_not_found(id))?;
        session.video = analysis;
        Ok(())
    }

    /// Run `f` against the session's latest video analysis.
    pub async fn with_video<T>(
        &self,
        id: &str,
        f: impl FnOnce(Option<&VideoAnalysis>) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let key = Self::key(id)?;
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&key)
            .ok_or_else(|| ApiError::session_not_found(id))?;
        f(session.video.as_ref())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn key(id: &str) -> ApiResult<SessionId> {
        if !is_valid_session_id(id) {
            return Err(ApiError::session_not_found(id));
        }
        Ok(SessionId::from_string(id))
    }
}
