//! Auth session: cached token plus logout signalling.

use crate::error::Result;
use crate::storage::TokenStorage;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Default bound on the startup token load.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(2);

/// Emitted once when the server rejects the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutEvent {
    /// HTTP status that triggered the logout (401 or 403)
    pub status: u16,
}

/// Holds the auth token for the lifetime of the app.
///
/// The token is read synchronously by request signing. Writes go through to
/// the backing [`TokenStorage`].
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    token: RwLock<Option<String>>,
    logout_tx: broadcast::Sender<LogoutEvent>,
}

impl SessionStore {
    /// Create an empty session over `storage` without reading it.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let (logout_tx, _) = broadcast::channel(8);
        Self {
            storage,
            token: RwLock::new(None),
            logout_tx,
        }
    }

    /// Create a session and load the stored token, waiting at most `timeout`.
    ///
    /// A slow or failing storage leaves the session unauthenticated.
    pub async fn load(storage: Arc<dyn TokenStorage>, timeout: Duration) -> Self {
        let session = Self::new(storage);

        match tokio::time::timeout(timeout, session.storage.load()).await {
            Ok(Ok(token)) => {
                debug!(authenticated = token.is_some(), "Session loaded");
                *session.write() = token;
            }
            Ok(Err(e)) => warn!(error = %e, "Failed to load stored token"),
            Err(_) => warn!(timeout_ms = timeout.as_millis() as u64, "Timed out loading stored token"),
        }

        session
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<String>> {
        self.token.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.token.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Current token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Persist and cache a new token.
    pub async fn save_token(&self, token: &str) -> Result<()> {
        self.storage.save(token).await?;
        *self.write() = Some(token.to_string());
        Ok(())
    }

    /// Forget the token locally and in storage.
    pub async fn clear(&self) -> Result<()> {
        *self.write() = None;
        self.storage.delete().await
    }

    /// Subscribe to logout events.
    pub fn subscribe_logout(&self) -> broadcast::Receiver<LogoutEvent> {
        self.logout_tx.subscribe()
    }

    /// React to a 401/403 from an authenticated request.
    ///
    /// Clears the token and broadcasts a [`LogoutEvent`]. Only the call that
    /// actually removes a token broadcasts, so concurrent rejections of the
    /// same session produce a single event.
    pub async fn handle_auth_failure(&self, status: u16) {
        let had_token = self.write().take().is_some();
        if !had_token {
            debug!(status, "Auth failure without a session");
            return;
        }

        if let Err(e) = self.storage.delete().await {
            warn!(error = %e, "Failed to delete stored token");
        }

        info!(status, "Session rejected by server, logging out");
        // No receivers is fine: nobody is listening yet.
        let _ = self.logout_tx.send(LogoutEvent { status });
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::storage::{MemoryTokenStorage, MockTokenStorage};
    use tokio::sync::broadcast::error::TryRecvError;

    #[tokio::test]
    async fn load_reads_stored_token() {
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = SessionStore::load(storage, DEFAULT_LOAD_TIMEOUT).await;
        assert_eq!(session.token().as_deref(), Some("stored"));
    }

    #[tokio::test]
    async fn load_failure_starts_unauthenticated() {
        let mut storage = MockTokenStorage::new();
        storage
            .expect_load()
            .times(1)
            .returning(|| Err(ClientError::Storage("disk gone".to_string())));

        let session = SessionStore::load(Arc::new(storage), DEFAULT_LOAD_TIMEOUT).await;
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn save_failure_does_not_cache() {
        let mut storage = MockTokenStorage::new();
        storage
            .expect_save()
            .returning(|_| Err(ClientError::Storage("read-only".to_string())));

        let session = SessionStore::new(Arc::new(storage));
        assert!(session.save_token("t").await.is_err());
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn auth_failure_broadcasts_once() {
        let storage = Arc::new(MemoryTokenStorage::with_token("t"));
        let session = SessionStore::load(storage.clone(), DEFAULT_LOAD_TIMEOUT).await;
        let mut rx = session.subscribe_logout();

        session.handle_auth_failure(401).await;
        session.handle_auth_failure(403).await;

        assert_eq!(rx.try_recv().unwrap(), LogoutEvent { status: 401 });
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(session.token(), None);
        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_removes_token() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let session = SessionStore::new(storage.clone());
        session.save_token("t").await.unwrap();
        assert!(session.is_authenticated());

        session.clear().await.unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(storage.load().await.unwrap(), None);
    }
}
