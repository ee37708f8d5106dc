//! Session lifecycle event handlers for the pdfkit client.
//!
//! Callback hooks that let a shell react to changes the API client makes to
//! the session on its own:
//!
//! - [`on_tokens_refreshed`](SessionEvents::on_tokens_refreshed): a 401 was recovered by refreshing the token pair
//! - [`on_session_expired`](SessionEvents::on_session_expired): refresh was impossible or failed and the session was cleared
//!
//! # Example
//!
//! ```rust,no_run
//! use pdfkit_link::{PdfLinkClient, SessionEvents};
//!
//! # fn example() -> pdfkit_link::Result<()> {
//! let events = SessionEvents::new()
//!     .on_session_expired(|reason| {
//!         eprintln!("Signed out: {}. Run `pdfkit login` again.", reason);
//!     });
//!
//! let client = PdfLinkClient::builder()
//!     .base_url("http://localhost:8080")
//!     .event_handlers(events)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

/// Why the client forced a logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionExpiredReason {
    /// A 401 arrived and no refresh token was stored.
    NoRefreshToken,
    /// The refresh endpoint rejected the refresh token or could not be reached.
    RefreshFailed(String),
}

impl fmt::Display for SessionExpiredReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRefreshToken => write!(f, "session expired and no refresh token is available"),
            Self::RefreshFailed(msg) => write!(f, "token refresh failed: {}", msg),
        }
    }
}

/// Type alias for the on_tokens_refreshed callback.
pub type OnTokensRefreshedCallback = Arc<dyn Fn() + Send + Sync>;

/// Type alias for the on_session_expired callback.
pub type OnSessionExpiredCallback = Arc<dyn Fn(SessionExpiredReason) + Send + Sync>;

/// Session lifecycle event handlers. All handlers are optional.
#[derive(Clone, Default)]
pub struct SessionEvents {
    pub(crate) on_tokens_refreshed: Option<OnTokensRefreshedCallback>,
    pub(crate) on_session_expired: Option<OnSessionExpiredCallback>,
}

impl fmt::Debug for SessionEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEvents")
            .field("on_tokens_refreshed", &self.on_tokens_refreshed.is_some())
            .field("on_session_expired", &self.on_session_expired.is_some())
            .finish()
    }
}

impl SessionEvents {
    /// Create a new empty `SessionEvents` (no callbacks registered).
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked after a successful transparent token refresh.
    pub fn on_tokens_refreshed(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_tokens_refreshed = Some(Arc::new(f));
        self
    }

    /// Register a callback invoked after the client cleared the session.
    ///
    /// This is where a shell sends the user back to its sign-in entry point.
    pub fn on_session_expired(
        mut self,
        f: impl Fn(SessionExpiredReason) + Send + Sync + 'static,
    ) -> Self {
        self.on_session_expired = Some(Arc::new(f));
        self
    }

    /// Check if any handlers are registered.
    pub fn has_any(&self) -> bool {
        self.on_tokens_refreshed.is_some() || self.on_session_expired.is_some()
    }

    pub(crate) fn emit_tokens_refreshed(&self) {
        if let Some(cb) = &self.on_tokens_refreshed {
            cb();
        }
    }

    pub(crate) fn emit_session_expired(&self, reason: SessionExpiredReason) {
        if let Some(cb) = &self.on_session_expired {
            cb(reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_empty_handlers() {
        let events = SessionEvents::new();
        assert!(!events.has_any());
        // Emitting without handlers is a no-op
        events.emit_tokens_refreshed();
        events.emit_session_expired(SessionExpiredReason::NoRefreshToken);
    }

    #[test]
    fn test_handlers_fire() {
        let refreshed = Arc::new(AtomicUsize::new(0));
        let expired = Arc::new(Mutex::new(Vec::new()));

        let r = refreshed.clone();
        let e = expired.clone();
        let events = SessionEvents::new()
            .on_tokens_refreshed(move || {
                r.fetch_add(1, Ordering::SeqCst);
            })
            .on_session_expired(move |reason| {
                e.lock().unwrap().push(reason);
            });

        assert!(events.has_any());
        events.emit_tokens_refreshed();
        events.emit_session_expired(SessionExpiredReason::RefreshFailed("401".into()));

        assert_eq!(refreshed.load(Ordering::SeqCst), 1);
        assert_eq!(
            expired.lock().unwrap().as_slice(),
            &[SessionExpiredReason::RefreshFailed("401".into())]
        );
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(
            SessionExpiredReason::RefreshFailed("invalid token".into()).to_string(),
            "token refresh failed: invalid token"
        );
        assert!(SessionExpiredReason::NoRefreshToken
            .to_string()
            .contains("no refresh token"));
    }

    #[test]
    fn test_debug_hides_closures() {
        let events = SessionEvents::new().on_tokens_refreshed(|| {});
        let debug = format!("{:?}", events);
        assert!(debug.contains("on_tokens_refreshed: true"));
        assert!(debug.contains("on_session_expired: false"));
    }
}
