use serde::{Deserialize, Serialize};

/// Aggregate storage consumption for the current user (display only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub file_count: u64,
    #[serde(default)]
    pub formatted_used: Option<String>,
    #[serde(default)]
    pub formatted_total: Option<String>,
}

impl StorageUsage {
    /// Used share of the quota in percent, 0 when the quota is unknown.
    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 * 100.0 / self.total_bytes as f64
        }
    }
}
