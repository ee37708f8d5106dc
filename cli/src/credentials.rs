//! File-based session storage for the CLI
//!
//! Keeps the signed-in user and token pair in TOML with secure file
//! permissions (0600 on Unix), so a session survives between invocations.
//!
//! # File Location
//!
//! - Windows: `~/.pdfkit/session.toml`
//! - Linux/macOS: `~/.config/pdfkit/session.toml`
//!
//! # File Format
//!
//! ```toml
//! [sessions.auth_data]
//! access_token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
//! refresh_token = "d9b2c1..."
//!
//! [sessions.auth_data.user]
//! id = "42"
//! email = "alice@example.com"
//! first_name = "Alice"
//! last_name = "Liddell"
//! roles = ["USER"]
//! ```

use pdfkit_link::credentials::{SessionRecord, SessionStorage};
use pdfkit_link::{PdfLinkError, Result, UserInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based session storage
///
/// The file is read on every `load` rather than cached, so an edit or a
/// logout from another shell is seen by the next invocation.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    file_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct StoredUser {
    id: String,
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct StoredSession {
    access_token: String,
    refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<StoredUser>,
}

/// Top-level TOML structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    sessions: HashMap<String, StoredSession>,
}

impl From<&SessionRecord> for StoredSession {
    fn from(record: &SessionRecord) -> Self {
        Self {
            access_token: record.access_token.clone(),
            refresh_token: record.refresh_token.clone(),
            user: record.user.as_ref().map(|u| StoredUser {
                id: u.id.clone(),
                email: u.email.clone(),
                first_name: u.first_name.clone(),
                last_name: u.last_name.clone(),
                roles: u.roles.clone(),
            }),
        }
    }
}

impl From<StoredSession> for SessionRecord {
    fn from(stored: StoredSession) -> Self {
        Self {
            access_token: stored.access_token,
            refresh_token: stored.refresh_token,
            user: stored.user.map(|u| UserInfo {
                id: u.id,
                email: u.email,
                first_name: u.first_name,
                last_name: u.last_name,
                roles: u.roles,
            }),
        }
    }
}

impl FileSessionStorage {
    /// Default session file path
    /// - Windows: `~/.pdfkit/session.toml`
    /// - Linux/macOS: `~/.config/pdfkit/session.toml`
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".pdfkit").join("session.toml")
            } else {
                PathBuf::from(".pdfkit").join("session.toml")
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("pdfkit").join("session.toml")
            } else if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("pdfkit").join("session.toml")
            } else {
                PathBuf::from(".pdfkit").join("session.toml")
            }
        }
    }

    /// Storage at the default location
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    /// Storage at a custom location
    pub fn with_path(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    /// Get the file path used by this storage
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_file(&self) -> Result<SessionFile> {
        if !self.file_path.exists() {
            return Ok(SessionFile::default());
        }

        let contents = fs::read_to_string(&self.file_path).map_err(|e| {
            PdfLinkError::StorageError(format!(
                "Cannot read session file '{}': {}",
                self.file_path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            PdfLinkError::StorageError(format!(
                "Corrupted session file '{}': {}. Delete it and run `pdfkit login`",
                self.file_path.display(),
                e.message()
            ))
        })
    }

    fn write_file(&self, file: &SessionFile) -> Result<()> {
        let contents = toml::to_string_pretty(file).map_err(|e| {
            PdfLinkError::StorageError(format!("Failed to serialize session: {}", e))
        })?;

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PdfLinkError::StorageError(format!(
                    "Failed to create session directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&self.file_path, contents).map_err(|e| {
            PdfLinkError::StorageError(format!(
                "Failed to write session file at '{}': {}",
                self.file_path.display(),
                e
            ))
        })?;

        // Set file permissions to 0600 (owner read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.file_path, permissions).map_err(|e| {
                PdfLinkError::StorageError(format!(
                    "Failed to set file permissions for '{}': {}",
                    self.file_path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Current file contents, or an empty file when the old one is unreadable.
    ///
    /// Writes must not be blocked by a corrupted file; they replace it.
    fn read_for_update(&self) -> SessionFile {
        self.read_file().unwrap_or_else(|e| {
            log::warn!("[SESSION] Replacing unreadable session file: {}", e);
            SessionFile::default()
        })
    }
}

impl Default for FileSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self, key: &str) -> Result<Option<SessionRecord>> {
        let mut file = self.read_file()?;
        Ok(file.sessions.remove(key).map(SessionRecord::from))
    }

    fn save(&mut self, key: &str, record: &SessionRecord) -> Result<()> {
        let mut file = self.read_for_update();
        file.sessions.insert(key.to_string(), StoredSession::from(record));
        self.write_file(&file)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if !self.file_path.exists() {
            return Ok(());
        }
        let mut file = self.read_for_update();
        file.sessions.remove(key);
        if file.sessions.is_empty() {
            return fs::remove_file(&self.file_path).map_err(|e| {
                PdfLinkError::StorageError(format!(
                    "Failed to remove session file '{}': {}",
                    self.file_path.display(),
                    e
                ))
            });
        }
        self.write_file(&file)
    }
}
