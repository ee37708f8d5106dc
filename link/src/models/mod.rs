//! Data models for pdfkit-link.
//!
//! Request and response structures exchanged with the backend. All JSON
//! responses arrive wrapped in [`ApiResponse`].

pub mod api_response;
pub mod auth_response;
pub mod file_list;
pub mod http_version;
pub mod job;
pub mod job_status;
pub mod job_type;
pub mod login_request;
pub mod page;
pub mod pdf_requests;
pub mod register_request;
pub mod storage_usage;
pub mod token_pair;
pub mod uploaded_file;
pub mod user_info;


pub use api_response::ApiResponse;
pub use auth_response::AuthResponse;
pub use file_list::{FileEntry, FileList};
pub use http_version::HttpVersion;
pub use job::{Job, JobCreated};
pub use job_status::JobStatus;
pub use job_type::JobType;
pub use login_request::LoginRequest;
pub use page::Page;
pub use pdf_requests::{
    CompressRequest, CompressionLevel, MergeRequest, ProtectRequest, RotateRequest, SplitRequest,
    UnlockRequest, WatermarkPosition, WatermarkRequest,
};
pub use register_request::RegisterRequest;
pub use storage_usage::StorageUsage;
pub use token_pair::{RefreshTokenRequest, TokenPair};
pub use uploaded_file::UploadedFile;
pub use user_info::UserInfo;

use serde::{Deserialize, Deserializer};

/// Decode an explicit `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
