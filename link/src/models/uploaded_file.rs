use serde::{Deserialize, Serialize};

/// Descriptor of a file held by the remote store.
///
/// `file_id` is an opaque identifier minted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_id: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    #[serde(default)]
    pub download_url: Option<String>,
}
