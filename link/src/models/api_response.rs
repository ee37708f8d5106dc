use serde::{Deserialize, Serialize};

/// Envelope wrapping every JSON response from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the backend considers the call successful
    #[serde(default = "default_success")]
    pub success: bool,
    /// Payload; absent for void endpoints such as logout or delete
    pub data: Option<T>,
    /// Human-readable status or error message
    #[serde(default)]
    pub message: Option<String>,
    /// Server timestamp (ISO-8601)
    #[serde(default)]
    pub timestamp: Option<String>,
}

fn default_success() -> bool {
    true
}
