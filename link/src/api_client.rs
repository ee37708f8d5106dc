//! Authenticated HTTP dispatch with one-shot token refresh.
//!
//! Every request is described by an owned [`ApiRequest`] so it can be rebuilt
//! for a second attempt (request builders with bodies cannot be cloned). The
//! request carries its own [`RetryState`]:
//!
//! ```text
//! NotRetried --(401 + refresh ok)--> RetriedOnce --> final
//! ```
//!
//! A request never returns to `NotRetried`, which bounds every call to at most
//! one refresh and one re-issue.

use crate::{
    auth_store::AuthStore,
    error::{PdfLinkError, Result},
    event_handlers::{SessionEvents, SessionExpiredReason},
    models::{ApiResponse, RefreshTokenRequest, TokenPair},
    timeouts::PdfLinkTimeouts,
};
use bytes::Bytes;
use log::{debug, warn};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::{Duration, Instant};

pub(crate) const REFRESH_PATH: &str = "/api/v1/auth/refresh";

/// Whether a request has already been re-issued after a token refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryState {
    #[default]
    NotRetried,
    RetriedOnce,
}

/// A single file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartPart {
    pub field_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub content: Bytes,
}

/// Request body, kept in a form that can be replayed.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartPart),
}

/// Owned description of an API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    timeout: Option<Duration>,
    refreshable: bool,
    retry_state: RetryState,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            timeout: None,
            refreshable: true,
            retry_state: RetryState::NotRetried,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a single-file multipart body.
    pub fn multipart(mut self, file: MultipartPart) -> Self {
        self.body = RequestBody::Multipart(file);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Override the client's default request timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Never attempt a token refresh for this call (credential endpoints).
    pub fn without_refresh(mut self) -> Self {
        self.refreshable = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn retry_state(&self) -> RetryState {
        self.retry_state
    }
}

/// HTTP client bound to one backend and one session.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: reqwest::Client,
    auth: AuthStore,
    events: SessionEvents,
    timeouts: PdfLinkTimeouts,
}

impl ApiClient {
    pub(crate) fn new(
        base_url: String,
        http_client: reqwest::Client,
        auth: AuthStore,
        events: SessionEvents,
        timeouts: PdfLinkTimeouts,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            auth,
            events,
            timeouts,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_store(&self) -> &AuthStore {
        &self.auth
    }

    pub fn timeouts(&self) -> &PdfLinkTimeouts {
        &self.timeouts
    }

    /// Dispatch a request, refreshing the session at most once on 401.
    ///
    /// Returns the successful response, or the error of the last attempt.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<reqwest::Response> {
        let overall_start = Instant::now();

        loop {
            let response = self.dispatch(&request).await?;
            let status = response.status();

            if status.is_success() {
                debug!(
                    "[API] {} {} ok status={} total_ms={}",
                    request.method,
                    request.path,
                    status,
                    overall_start.elapsed().as_millis()
                );
                return Ok(response);
            }

            let error = Self::error_from_response(response).await;

            if status != StatusCode::UNAUTHORIZED || !request.refreshable {
                warn!(
                    "[API] {} {} failed status={} error=\"{}\"",
                    request.method, request.path, status, error
                );
                return Err(error);
            }

            match request.retry_state {
                RetryState::RetriedOnce => {
                    warn!(
                        "[API] {} {} still unauthorized after refresh, giving up",
                        request.method, request.path
                    );
                    return Err(error);
                }
                RetryState::NotRetried => {
                    request.retry_state = RetryState::RetriedOnce;
                    debug!(
                        "[REFRESH] {} {} returned 401, attempting token refresh",
                        request.method, request.path
                    );

                    match self.refresh_session().await {
                        Ok(()) => {
                            self.events.emit_tokens_refreshed();
                            continue;
                        }
                        Err(reason) => {
                            warn!("[REFRESH] Forcing logout: {}", reason);
                            if let Err(e) = self.auth.logout() {
                                warn!("[REFRESH] Failed to clear stored session: {}", e);
                            }
                            self.events.emit_session_expired(reason);
                            return Err(error);
                        }
                    }
                }
            }
        }
    }

    /// Dispatch and decode the envelope's `data` payload.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(request).await?;
        Self::decode_envelope(response).await
    }

    /// Dispatch a call whose envelope carries no payload.
    pub async fn send_void(&self, request: ApiRequest) -> Result<()> {
        let response = self.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(PdfLinkError::ServerError {
                status_code: status.as_u16(),
                message: envelope.message.unwrap_or_else(|| "Request failed".to_string()),
            });
        }
        Ok(())
    }

    /// Dispatch and return the raw response body.
    pub async fn send_bytes(&self, request: ApiRequest) -> Result<Bytes> {
        let response = self.execute(request).await?;
        Ok(response.bytes().await?)
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .timeout(request.timeout.unwrap_or(self.timeouts.request_timeout));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(file) => {
                let part = reqwest::multipart::Part::bytes(file.content.to_vec())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime_type)
                    .map_err(|e| {
                        PdfLinkError::ValidationError(format!(
                            "invalid mime type '{}': {}",
                            file.mime_type, e
                        ))
                    })?;
                builder.multipart(reqwest::multipart::Form::new().part(file.field_name.clone(), part))
            }
        };

        // Token is read at dispatch time so a retried request picks up the refreshed one
        builder = self.auth.auth_provider().apply_to_request(builder);

        let attempt_start = Instant::now();
        debug!(
            "[API] Sending {} {} ({:?})",
            request.method, url, request.retry_state
        );

        builder.send().await.map_err(|e| {
            warn!(
                "[API] Transport error for {} {}: {} duration_ms={}",
                request.method,
                request.path,
                e,
                attempt_start.elapsed().as_millis()
            );
            PdfLinkError::from(e)
        })
    }

    /// Exchange the stored refresh token for a new pair and persist it.
    async fn refresh_session(&self) -> std::result::Result<(), SessionExpiredReason> {
        let refresh_token = self
            .auth
            .refresh_token()
            .ok_or(SessionExpiredReason::NoRefreshToken)?;

        let url = format!("{}{}", self.base_url, REFRESH_PATH);
        let start = Instant::now();
        let response = self
            .http_client
            .post(&url)
            .timeout(self.timeouts.request_timeout)
            .json(&RefreshTokenRequest { refresh_token })
            .send()
            .await
            .map_err(|e| SessionExpiredReason::RefreshFailed(e.to_string()))?;

        let status = response.status();
        debug!(
            "[REFRESH] Response received in {:?}, status={}",
            start.elapsed(),
            status
        );

        if !status.is_success() {
            let error = Self::error_from_response(response).await;
            return Err(SessionExpiredReason::RefreshFailed(error.to_string()));
        }

        let pair: TokenPair = Self::decode_envelope(response)
            .await
            .map_err(|e| SessionExpiredReason::RefreshFailed(e.to_string()))?;

        self.auth
            .update_tokens(pair.access_token, pair.refresh_token)
            .map_err(|e| SessionExpiredReason::RefreshFailed(e.to_string()))?;

        debug!("[REFRESH] Token pair refreshed in {:?}", start.elapsed());
        Ok(())
    }

    pub(crate) async fn decode_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;

        if !envelope.success {
            return Err(PdfLinkError::ServerError {
                status_code: status.as_u16(),
                message: envelope.message.unwrap_or_else(|| "Request failed".to_string()),
            });
        }

        envelope.data.ok_or_else(|| {
            PdfLinkError::SerializationError("response envelope carried no data".to_string())
        })
    }

    async fn error_from_response(response: reqwest::Response) -> PdfLinkError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = extract_error_message(status, &error_text);

        if status == StatusCode::UNAUTHORIZED {
            PdfLinkError::AuthenticationError(message)
        } else {
            PdfLinkError::ServerError {
                status_code: status.as_u16(),
                message,
            }
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

/// Prefer the envelope's `message`, then the raw body, then the status text.
fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(body) {
        if let Some(message) = envelope.message.filter(|m| !m.trim().is_empty()) {
            return message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_starts_not_retried() {
        let request = ApiRequest::get("/api/v1/pdf/jobs/1");
        assert_eq!(request.retry_state(), RetryState::NotRetried);
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/api/v1/pdf/jobs/1");
        assert!(request.refreshable);
        assert!(!request.without_refresh().refreshable);
    }

    #[test]
    fn test_request_builder_collects_parts() {
        let request = ApiRequest::post("/api/v1/files")
            .query("temporary", true)
            .timeout(Duration::from_secs(300))
            .multipart(MultipartPart {
                field_name: "file".into(),
                file_name: "a.pdf".into(),
                mime_type: "application/pdf".into(),
                content: Bytes::from_static(b"%PDF-1.7"),
            });

        assert_eq!(request.query, vec![("temporary".to_string(), "true".to_string())]);
        assert_eq!(request.timeout, Some(Duration::from_secs(300)));
        assert!(matches!(request.body, RequestBody::Multipart(_)));
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::post("/api/v1/auth/refresh")
            .json(&RefreshTokenRequest {
                refresh_token: "r1".into(),
            })
            .unwrap();
        match request.body {
            RequestBody::Json(value) => assert_eq!(value["refreshToken"], "r1"),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_extract_error_message_prefers_envelope() {
        let body = r#"{"success":false,"data":null,"message":"File not found"}"#;
        assert_eq!(
            extract_error_message(StatusCode::NOT_FOUND, body),
            "File not found"
        );
    }

    #[test]
    fn test_extract_error_message_falls_back() {
        assert_eq!(
            extract_error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
        assert_eq!(
            extract_error_message(StatusCode::BAD_GATEWAY, "  "),
            "Bad Gateway"
        );
    }
}
