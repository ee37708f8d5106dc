//! Session state with write-through persistence.
//!
//! [`AuthStore`] is the single source of truth for the current user and token
//! pair. It is a cheap, clonable handle: every component that needs the
//! session (the API client, the shells) receives a clone explicitly instead
//! of reaching for a global.
//!
//! Every mutation persists through the configured [`SessionStorage`] while the
//! state lock is held, so storage and memory never diverge by more than the
//! single write in progress.

use crate::auth::AuthProvider;
use crate::credentials::{MemorySessionStorage, SessionRecord, SessionStorage, AUTH_STORAGE_KEY};
use crate::error::Result;
use crate::models::UserInfo;
use log::{debug, warn};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory view of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl AuthState {
    /// True iff both tokens are present.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }
}

struct Inner {
    state: AuthState,
    storage: Box<dyn SessionStorage>,
}

/// Shared handle to the session state.
///
/// # Example
///
/// ```rust
/// use pdfkit_link::{AuthStore, credentials::MemorySessionStorage};
///
/// let store = AuthStore::new(MemorySessionStorage::new());
/// store.load_stored_auth();
/// assert!(!store.is_authenticated());
/// ```
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<RwLock<Inner>>,
    key: Arc<str>,
}

impl AuthStore {
    /// Create a logged-out store backed by `storage`.
    ///
    /// Call [`load_stored_auth`](Self::load_stored_auth) once at startup to
    /// restore a previous session.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self::with_key(storage, AUTH_STORAGE_KEY)
    }

    /// Same as [`new`](Self::new) with a custom storage key.
    pub fn with_key(storage: impl SessionStorage + 'static, key: impl Into<String>) -> Self {
        let key: String = key.into();
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state: AuthState::default(),
                storage: Box::new(storage),
            })),
            key: Arc::from(key),
        }
    }

    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStorage::new())
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a session. Persists the record first, then updates memory.
    ///
    /// Tokens are opaque; no shape validation happens here.
    pub fn login(
        &self,
        user: UserInfo,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<()> {
        let record = SessionRecord {
            user: Some(user),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        };

        let mut inner = self.write();
        inner.storage.save(&self.key, &record)?;
        debug!("[AUTH_STORE] Session started for user id={}", record.user.as_ref().map(|u| u.id.as_str()).unwrap_or("?"));
        inner.state = AuthState {
            user: record.user,
            access_token: Some(record.access_token),
            refresh_token: Some(record.refresh_token),
        };
        Ok(())
    }

    /// End the session. Idempotent.
    ///
    /// Memory is cleared even when the storage backend fails to delete the
    /// record; the storage error is still returned.
    pub fn logout(&self) -> Result<()> {
        let mut inner = self.write();
        let key = self.key.clone();
        let deleted = inner.storage.delete(&key);
        inner.state = AuthState::default();
        debug!("[AUTH_STORE] Session cleared");
        deleted
    }

    /// Replace the token pair, keeping the current user. Used by the refresh flow.
    pub fn update_tokens(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<()> {
        let mut inner = self.write();
        let record = SessionRecord {
            user: inner.state.user.clone(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        };
        let key = self.key.clone();
        inner.storage.save(&key, &record)?;
        inner.state.access_token = Some(record.access_token);
        inner.state.refresh_token = Some(record.refresh_token);
        debug!("[AUTH_STORE] Token pair replaced");
        Ok(())
    }

    /// Restore a persisted session. Never fails.
    ///
    /// A missing record leaves the store logged out. A corrupted or
    /// unreadable record is logged and ignored so it cannot block startup.
    /// Returns whether a session was restored.
    pub fn load_stored_auth(&self) -> bool {
        let mut inner = self.write();
        match inner.storage.load(&self.key) {
            Ok(Some(record)) => {
                inner.state = AuthState {
                    user: record.user,
                    access_token: Some(record.access_token),
                    refresh_token: Some(record.refresh_token),
                };
                debug!("[AUTH_STORE] Restored stored session");
                true
            }
            Ok(None) => {
                debug!("[AUTH_STORE] No stored session");
                false
            }
            Err(e) => {
                warn!("[AUTH_STORE] Failed to load stored session, starting logged out: {}", e);
                inner.state = AuthState::default();
                false
            }
        }
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.read().state.access_token.clone()
    }

    /// Current refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.read().state.refresh_token.clone()
    }

    /// Current user, if any.
    pub fn user(&self) -> Option<UserInfo> {
        self.read().state.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().state.is_authenticated()
    }

    /// Copy of the whole state.
    pub fn snapshot(&self) -> AuthState {
        self.read().state.clone()
    }

    /// Credentials to attach to the next request.
    pub fn auth_provider(&self) -> AuthProvider {
        AuthProvider::from_access_token(self.access_token())
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.snapshot();
        f.debug_struct("AuthStore")
            .field("key", &self.key)
            .field("authenticated", &state.is_authenticated())
            .field("user", &state.user.as_ref().map(|u| u.id.clone()))
            .finish()
    }
}
