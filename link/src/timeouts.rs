//! Timeout configuration for pdfkit client operations.
//!
//! Centralizes every timing knob the client uses: HTTP connect/request
//! timeouts, the extended upload timeout, and the job polling cadence.

use std::time::Duration;

/// Timeout configuration for pdfkit client operations.
///
/// # Examples
///
/// ```rust
/// use pdfkit_link::PdfLinkTimeouts;
/// use std::time::Duration;
///
/// // Use defaults (recommended for most cases)
/// let timeouts = PdfLinkTimeouts::default();
///
/// // Slow uplink: give uploads more room
/// let timeouts = PdfLinkTimeouts::builder()
///     .upload_timeout(Duration::from_secs(900))
///     .build();
///
/// // Aggressive timeouts for local development
/// let timeouts = PdfLinkTimeouts::fast();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfLinkTimeouts {
    /// Timeout for establishing connections (TCP + TLS handshake).
    /// Default: 10 seconds
    pub connection_timeout: Duration,

    /// Timeout for a regular API request, response body included.
    /// Default: 60 seconds
    pub request_timeout: Duration,

    /// Timeout for multipart uploads, which may carry large payloads.
    /// Default: 5 minutes
    pub upload_timeout: Duration,

    /// Delay between two job status checks.
    /// Default: 5 seconds
    pub poll_interval: Duration,

    /// Number of status checks before a job is reported as timed out.
    /// Default: 60 (about five minutes with the default interval)
    pub max_poll_attempts: u32,
}

impl Default for PdfLinkTimeouts {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            upload_timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
            max_poll_attempts: 60,
        }
    }
}

impl PdfLinkTimeouts {
    /// Create a new builder for custom timeout configuration.
    pub fn builder() -> PdfLinkTimeoutsBuilder {
        PdfLinkTimeoutsBuilder::new()
    }

    /// Create timeouts optimized for a backend running on localhost.
    pub fn fast() -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            upload_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
            max_poll_attempts: 120,
        }
    }

    /// Create timeouts for high-latency or unreliable networks.
    pub fn relaxed() -> Self {
        Self {
            connection_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            upload_timeout: Duration::from_secs(900),
            poll_interval: Duration::from_secs(10),
            max_poll_attempts: 90,
        }
    }

    /// Tight timeouts with a short polling cadence, for tests against a local fake backend.
    pub fn for_testing(poll_interval_ms: u64, max_poll_attempts: u32) -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
            upload_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(poll_interval_ms),
            max_poll_attempts,
        }
    }

    /// Upper bound on how long a poll loop can run before timing out.
    pub fn max_poll_duration(&self) -> Duration {
        self.poll_interval * self.max_poll_attempts
    }
}

/// Builder for creating custom [`PdfLinkTimeouts`] configurations.
#[derive(Debug, Clone)]
pub struct PdfLinkTimeoutsBuilder {
    timeouts: PdfLinkTimeouts,
}

impl PdfLinkTimeoutsBuilder {
    fn new() -> Self {
        Self {
            timeouts: PdfLinkTimeouts::default(),
        }
    }

    /// Set the connection timeout (TCP + TLS handshake).
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connection_timeout = timeout;
        self
    }

    /// Set the connection timeout in seconds.
    pub fn connection_timeout_secs(self, secs: u64) -> Self {
        self.connection_timeout(Duration::from_secs(secs))
    }

    /// Set the default request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self
    }

    /// Set the default request timeout in seconds.
    pub fn request_timeout_secs(self, secs: u64) -> Self {
        self.request_timeout(Duration::from_secs(secs))
    }

    /// Set the upload timeout.
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.upload_timeout = timeout;
        self
    }

    /// Set the upload timeout in seconds.
    pub fn upload_timeout_secs(self, secs: u64) -> Self {
        self.upload_timeout(Duration::from_secs(secs))
    }

    /// Set the delay between job status checks.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.timeouts.poll_interval = interval;
        self
    }

    /// Set the delay between job status checks in seconds.
    pub fn poll_interval_secs(self, secs: u64) -> Self {
        self.poll_interval(Duration::from_secs(secs))
    }

    /// Set how many status checks run before polling gives up.
    pub fn max_poll_attempts(mut self, attempts: u32) -> Self {
        self.timeouts.max_poll_attempts = attempts;
        self
    }

    /// Build the timeout configuration.
    pub fn build(self) -> PdfLinkTimeouts {
        self.timeouts
    }
}
