use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::error;
use uuid::Uuid;

/// Authenticated identity handed back by the backend on login.
///
/// The session carries the backend bearer token plus the display fields the
/// dashboard navbar shows. There is no expiry of our own; a 401/403 from the
/// backend is what invalidates a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: String,
}

/// Durable store of active sessions, keyed by the id placed in the browser
/// cookie. The map is mirrored to a JSON file so sessions survive restarts.
#[derive(Clone)]
pub struct SessionStore {
    path: Arc<PathBuf>,
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub async fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let sessions = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("failed to parse session store at {}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read session store at {}", path.display())
                });
            }
        };

        Ok(Self {
            path: Arc::new(path),
            sessions: Arc::new(RwLock::new(sessions)),
        })
    }

    /// Record a fresh session and return the id to place in the cookie.
    pub async fn save(&self, token: String, username: String, role: String) -> Uuid {
        let id = Uuid::new_v4();
        {
            let mut guard = self.sessions.write().await;
            guard.insert(
                id,
                Session {
                    token,
                    username,
                    role,
                },
            );
        }
        self.persist().await;
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let guard = self.sessions.read().await;
        guard.get(&id).cloned()
    }

    pub async fn clear(&self, id: Uuid) {
        let removed = {
            let mut guard = self.sessions.write().await;
            guard.remove(&id)
        };
        if removed.is_some() {
            self.persist().await;
        }
    }

    pub async fn is_logged_in(&self, id: Uuid) -> bool {
        self.get(id).await.is_some()
    }

    // Persist failures are logged, never fatal: the in-memory map stays
    // authoritative for the lifetime of the process.
    async fn persist(&self) {
        let snapshot = {
            let guard = self.sessions.read().await;
            guard.clone()
        };

        let bytes = match serde_json::to_vec_pretty(&snapshot) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(?err, "failed to encode session store");
                return;
            }
        };

        if let Err(err) = tokio::fs::write(self.path.as_ref(), bytes).await {
            error!(?err, path = %self.path.display(), "failed to persist session store");
        }
    }
}
