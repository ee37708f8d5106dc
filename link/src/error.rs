//! Error types for pdfkit-link.

/// Result alias used throughout the client library.
pub type Result<T> = std::result::Result<T, PdfLinkError>;

/// Errors produced by the pdfkit client.
#[derive(Debug, thiserror::Error)]
pub enum PdfLinkError {
    /// Transport failure (DNS, connect, reset, TLS).
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The request did not complete within its timeout.
    #[error("Request timed out: {0}")]
    TimeoutError(String),

    /// The server rejected the credentials and the session could not be refreshed.
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Non-2xx response, or a 2xx envelope with `success: false`.
    #[error("Server error ({status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    /// Response body could not be decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Client was built with invalid settings.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Input rejected client-side before any network call.
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// Session storage could not be read or written.
    #[error("Session storage error: {0}")]
    StorageError(String),

    /// The backend reported the job as failed.
    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    /// Polling gave up before the job reached a terminal state.
    #[error("Job {job_id} timed out after {attempts} status checks")]
    JobTimedOut { job_id: String, attempts: u32 },

    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,
}

impl PdfLinkError {
    /// HTTP status carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ServerError { status_code, .. } => Some(*status_code),
            Self::AuthenticationError(_) => Some(401),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PdfLinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PdfLinkError::TimeoutError(err.to_string())
        } else if err.is_decode() {
            PdfLinkError::SerializationError(err.to_string())
        } else {
            PdfLinkError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PdfLinkError {
    fn from(err: serde_json::Error) -> Self {
        PdfLinkError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PdfLinkError::ServerError {
            status_code: 413,
            message: "File too large".into(),
        };
        assert_eq!(err.to_string(), "Server error (413): File too large");
        assert_eq!(err.status_code(), Some(413));

        let err = PdfLinkError::JobTimedOut {
            job_id: "job-1".into(),
            attempts: 60,
        };
        assert_eq!(err.to_string(), "Job job-1 timed out after 60 status checks");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_failed_and_timed_out_are_distinct() {
        let failed = PdfLinkError::JobFailed {
            job_id: "j".into(),
            message: "corrupt file".into(),
        };
        let timed_out = PdfLinkError::JobTimedOut {
            job_id: "j".into(),
            attempts: 60,
        };
        assert!(matches!(failed, PdfLinkError::JobFailed { .. }));
        assert!(matches!(timed_out, PdfLinkError::JobTimedOut { .. }));
        assert_ne!(failed.to_string(), timed_out.to_string());
    }

    #[test]
    fn test_serde_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let converted: PdfLinkError = err.into();
        assert!(matches!(converted, PdfLinkError::SerializationError(_)));
    }
}
