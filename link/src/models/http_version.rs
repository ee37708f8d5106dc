use serde::{Deserialize, Serialize};

/// HTTP protocol version to use for API connections.
///
/// # Example
///
/// ```rust
/// use pdfkit_link::{PdfLinkClient, HttpVersion};
///
/// # fn example() -> pdfkit_link::Result<()> {
/// let client = PdfLinkClient::builder()
///     .base_url("http://localhost:8080")
///     .http_version(HttpVersion::Http2)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HttpVersion {
    /// HTTP/1.1 (default) - widely compatible
    #[default]
    #[serde(rename = "http1", alias = "http/1.1", alias = "1.1")]
    Http1,

    /// HTTP/2 with prior knowledge
    #[serde(rename = "http2", alias = "http/2", alias = "2")]
    Http2,

    /// Let the client negotiate via ALPN
    #[serde(rename = "auto")]
    Auto,
}

impl HttpVersion {
    /// Parse a loosely formatted version string (config files, CLI flags).
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "http1" | "http/1" | "http/1.1" | "1.1" => HttpVersion::Http1,
            "http2" | "http/2" | "2" => HttpVersion::Http2,
            _ => HttpVersion::Auto,
        }
    }
}
