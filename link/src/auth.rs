//! Authentication header handling for pdfkit requests.
//!
//! The access token is read from the [`AuthStore`](crate::AuthStore) at
//! dispatch time and attached as a bearer token. Without a token the request
//! goes out unauthenticated and the server decides whether that is an error.

/// Credentials attached to a single outgoing request.
///
/// # Examples
///
/// ```rust
/// use pdfkit_link::AuthProvider;
///
/// let auth = AuthProvider::bearer_token("eyJhbGc...".to_string());
/// assert!(auth.is_authenticated());
///
/// let anonymous = AuthProvider::from_access_token(None);
/// assert!(!anonymous.is_authenticated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthProvider {
    /// `Authorization: Bearer <token>`
    BearerToken(String),

    /// No authentication header
    None,
}

impl AuthProvider {
    /// Create bearer token authentication
    pub fn bearer_token(token: String) -> Self {
        Self::BearerToken(token)
    }

    /// Bearer auth when a token is present, otherwise anonymous.
    pub fn from_access_token(token: Option<String>) -> Self {
        match token {
            Some(token) => Self::BearerToken(token),
            None => Self::None,
        }
    }

    /// No authentication
    pub fn none() -> Self {
        Self::None
    }

    /// Attach authentication headers to an HTTP request builder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::BearerToken(token) => request.bearer_auth(token),
            Self::None => request,
        }
    }

    /// Check if authentication is configured
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}
