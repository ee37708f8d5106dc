//! Session storage abstraction for pdfkit clients.
//!
//! The [`AuthStore`](crate::AuthStore) writes the current session through a
//! [`SessionStorage`] backend on every mutation and reads it back once at
//! startup. Backends decide where the record lives: a permission-restricted
//! file for the CLI, an OS keychain, browser storage, or plain memory in tests.

use crate::error::{PdfLinkError, Result};
use crate::models::UserInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Fixed key under which the session record is stored.
pub const AUTH_STORAGE_KEY: &str = "auth_data";

/// Persisted session: the user plus the current token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// User the tokens belong to; absent if tokens were set before any login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
    pub access_token: String,
    pub refresh_token: String,
}

/// Trait for session storage backends.
///
/// # Security Note
///
/// Implementations hold live credentials:
/// - Files should use restrictive permissions (0600 on Unix)
/// - Tokens should never be logged
pub trait SessionStorage: Send + Sync {
    /// Read the record stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored; errors on unreadable or
    /// corrupted records.
    fn load(&self, key: &str) -> Result<Option<SessionRecord>>;

    /// Store the record under `key`, replacing any previous one.
    fn save(&mut self, key: &str, record: &SessionRecord) -> Result<()>;

    /// Remove the record under `key`.
    ///
    /// Returns `Ok(())` even if nothing was stored.
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// In-memory session storage for tests and ephemeral sessions.
///
/// Clones share the same backing map, so a clone handed to a second
/// [`AuthStore`](crate::AuthStore) behaves like the same device after a
/// process restart. Records are kept serialized to exercise the same
/// encode/decode path as durable backends.
///
/// # Example
///
/// ```rust
/// use pdfkit_link::credentials::{MemorySessionStorage, SessionRecord, SessionStorage};
///
/// let mut storage = MemorySessionStorage::new();
/// let record = SessionRecord {
///     user: None,
///     access_token: "access".to_string(),
///     refresh_token: "refresh".to_string(),
/// };
///
/// storage.save("auth_data", &record).unwrap();
/// assert_eq!(storage.load("auth_data").unwrap(), Some(record));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStorage {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStorage {
    /// Create a new empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw, unvalidated payload under `key`.
    pub fn insert_raw(&self, key: &str, raw: impl Into<String>) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(key.to_string(), raw.into());
        }
    }

    /// Whether anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.records
            .lock()
            .map(|records| records.contains_key(key))
            .unwrap_or(false)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.records
            .lock()
            .map_err(|_| PdfLinkError::StorageError("memory storage lock poisoned".into()))
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self, key: &str) -> Result<Option<SessionRecord>> {
        let records = self.lock()?;
        match records.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, key: &str, record: &SessionRecord) -> Result<()> {
        let raw = serde_json::to_string(record)?;
        self.lock()?.insert(key.to_string(), raw);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
