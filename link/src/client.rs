//! Main pdfkit client with builder pattern.
//!
//! Bundles one HTTP connection pool, one [`AuthStore`] and the gateways that
//! share them.

use crate::{
    api_client::{ApiClient, ApiRequest},
    auth_store::AuthStore,
    error::{PdfLinkError, Result},
    event_handlers::SessionEvents,
    files::FileTransferGateway,
    jobs::JobClient,
    models::{AuthResponse, HttpVersion, LoginRequest, RefreshTokenRequest, RegisterRequest},
    timeouts::PdfLinkTimeouts,
};
use log::{debug, warn};
use std::time::Instant;

/// Main pdfkit client.
///
/// Use [`PdfLinkClientBuilder`] to construct instances with custom configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use pdfkit_link::PdfLinkClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = PdfLinkClient::builder()
///     .base_url("http://localhost:8080")
///     .build()?;
///
/// client.login("alice@example.com", "secret123").await?;
///
/// let uploaded = client.files().upload_path("report.pdf", "application/pdf", true).await?;
/// let created = client.jobs().submit_compress(&uploaded.file_id, Default::default()).await?;
/// let file_id = client.jobs().poller(created.clone()).spawn().wait().await?
///     .into_result(&created.job_id)?;
/// let bytes = client.files().download(&file_id).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PdfLinkClient {
    api: ApiClient,
    files: FileTransferGateway,
    jobs: JobClient,
}

impl PdfLinkClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> PdfLinkClientBuilder {
        PdfLinkClientBuilder::new()
    }

    /// Session shared by every request this client makes.
    pub fn auth_store(&self) -> &AuthStore {
        self.api.auth_store()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn files(&self) -> &FileTransferGateway {
        &self.files
    }

    pub fn jobs(&self) -> &JobClient {
        &self.jobs
    }

    /// Get the configured timeouts
    pub fn timeouts(&self) -> &PdfLinkTimeouts {
        self.api.timeouts()
    }

    /// Sign in and start a session in the [`AuthStore`].
    ///
    /// A 401 here means wrong credentials; it never triggers a token refresh.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        debug!("[LOGIN] Authenticating '{}' at {}", email, self.api.base_url());

        let request = ApiRequest::post("/api/v1/auth/login")
            .without_refresh()
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })?;

        let start = Instant::now();
        let auth: AuthResponse = self.api.send_json(request).await?;
        self.start_session(&auth)?;
        debug!("[LOGIN] Authenticated '{}' in {:?}", email, start.elapsed());
        Ok(auth)
    }

    /// Create an account and start a session for it.
    pub async fn register(&self, registration: RegisterRequest) -> Result<AuthResponse> {
        if registration.email.trim().is_empty() || registration.password.is_empty() {
            return Err(PdfLinkError::ValidationError(
                "email and password are required".into(),
            ));
        }
        debug!("[REGISTER] Creating account '{}'", registration.email);

        let request = ApiRequest::post("/api/v1/auth/register")
            .without_refresh()
            .json(&registration)?;

        let auth: AuthResponse = self.api.send_json(request).await?;
        self.start_session(&auth)?;
        Ok(auth)
    }

    /// End the session server-side (best effort) and locally.
    ///
    /// The local session is always cleared; a failed server call is only logged.
    pub async fn logout(&self) -> Result<()> {
        if let Some(refresh_token) = self.auth_store().refresh_token() {
            let sent = ApiRequest::post("/api/v1/auth/logout")
                .without_refresh()
                .json(&RefreshTokenRequest { refresh_token });
            let result = match sent {
                Ok(request) => self.api.send_void(request).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                warn!("[LOGOUT] Server-side logout failed, clearing local session anyway: {}", e);
            }
        }
        self.auth_store().logout()
    }

    fn start_session(&self, auth: &AuthResponse) -> Result<()> {
        self.auth_store().login(
            auth.user.clone(),
            auth.access_token.clone(),
            auth.refresh_token.clone(),
        )
    }
}

/// Builder for configuring [`PdfLinkClient`] instances.
pub struct PdfLinkClientBuilder {
    base_url: Option<String>,
    timeouts: PdfLinkTimeouts,
    auth_store: Option<AuthStore>,
    events: SessionEvents,
    http_version: HttpVersion,
}

impl PdfLinkClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            timeouts: PdfLinkTimeouts::default(),
            auth_store: None,
            events: SessionEvents::default(),
            http_version: HttpVersion::default(),
        }
    }

    /// Set the base URL of the backend, e.g. `http://localhost:8080`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set timeout and polling configuration for all operations
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use pdfkit_link::{PdfLinkClient, PdfLinkTimeouts};
    ///
    /// # fn example() -> pdfkit_link::Result<()> {
    /// let client = PdfLinkClient::builder()
    ///     .base_url("http://localhost:8080")
    ///     .timeouts(PdfLinkTimeouts::relaxed())
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn timeouts(mut self, timeouts: PdfLinkTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Use an existing session store instead of a fresh in-memory one.
    ///
    /// The store is used as is; call [`AuthStore::load_stored_auth`] beforehand
    /// to restore a persisted session.
    pub fn auth_store(mut self, store: AuthStore) -> Self {
        self.auth_store = Some(store);
        self
    }

    pub fn event_handlers(mut self, events: SessionEvents) -> Self {
        self.events = events;
        self
    }

    /// Set the HTTP protocol version to use
    ///
    /// - `HttpVersion::Http1` - HTTP/1.1 (default, maximum compatibility)
    /// - `HttpVersion::Http2` - HTTP/2 with prior knowledge
    /// - `HttpVersion::Auto` - Let the client negotiate with the server
    pub fn http_version(mut self, version: HttpVersion) -> Self {
        self.http_version = version;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PdfLinkClient> {
        let base_url = self
            .base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| PdfLinkError::ConfigurationError("base_url is required".into()))?;

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(PdfLinkError::ConfigurationError(format!(
                "base_url '{}' must start with http:// or https://",
                base_url
            )));
        }

        // Per-request timeouts are set on every dispatch; only connect is global
        let mut client_builder = reqwest::Client::builder()
            .connect_timeout(self.timeouts.connection_timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(90));

        client_builder = match self.http_version {
            HttpVersion::Http1 => {
                debug!("[CLIENT] Using HTTP/1.1 only");
                client_builder.http1_only()
            }
            HttpVersion::Http2 => {
                debug!("[CLIENT] Using HTTP/2 with prior knowledge");
                client_builder.http2_prior_knowledge()
            }
            HttpVersion::Auto => {
                debug!("[CLIENT] Using automatic HTTP version negotiation");
                client_builder
            }
        };

        let http_client = client_builder
            .build()
            .map_err(|e| PdfLinkError::ConfigurationError(e.to_string()))?;

        let auth_store = self.auth_store.unwrap_or_else(AuthStore::in_memory);
        let api = ApiClient::new(base_url, http_client, auth_store, self.events, self.timeouts);

        Ok(PdfLinkClient {
            files: FileTransferGateway::new(api.clone()),
            jobs: JobClient::new(api.clone()),
            api,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = PdfLinkClient::builder().build();
        assert!(matches!(result, Err(PdfLinkError::ConfigurationError(_))));

        let result = PdfLinkClient::builder().base_url("   ").build();
        assert!(matches!(result, Err(PdfLinkError::ConfigurationError(_))));
    }

    #[test]
    fn test_builder_rejects_non_http_url() {
        let result = PdfLinkClient::builder().base_url("ftp://files").build();
        assert!(matches!(result, Err(PdfLinkError::ConfigurationError(_))));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = PdfLinkClient::builder()
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(client.api().base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_builder_with_timeouts_and_store() {
        let store = AuthStore::in_memory();
        let client = PdfLinkClient::builder()
            .base_url("http://localhost:8080")
            .timeouts(PdfLinkTimeouts::fast())
            .auth_store(store.clone())
            .http_version(HttpVersion::Auto)
            .build()
            .unwrap();

        assert_eq!(client.timeouts(), &PdfLinkTimeouts::fast());
        assert!(!client.auth_store().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_without_session_is_local() {
        let client = PdfLinkClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        assert!(client.logout().await.is_ok());
    }

    #[tokio::test]
    async fn test_register_requires_credentials() {
        let client = PdfLinkClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let result = client
            .register(RegisterRequest {
                email: "".into(),
                password: "pw".into(),
                first_name: "A".into(),
                last_name: "B".into(),
            })
            .await;
        assert!(matches!(result, Err(PdfLinkError::ValidationError(_))));
    }
}
