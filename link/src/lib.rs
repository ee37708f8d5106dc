//! # pdfkit-link: pdfkit Client Library
//!
//! Client-side plumbing for the pdfkit document-processing API: session
//! handling, file transfer, and the submit-then-poll job flow.
//!
//! ## Features
//!
//! - **Session Store**: write-through persistence of the user and token pair
//! - **Transparent Refresh**: a 401 is recovered by one token refresh and one retry
//! - **File Transfer**: multipart upload, binary download, metadata and usage
//! - **Job Polling**: cancellable polling that tells failure apart from timeout
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfkit_link::{CompressionLevel, PdfLinkClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PdfLinkClient::builder()
//!         .base_url("http://localhost:8080")
//!         .build()?;
//!
//!     client.login("alice@example.com", "secret123").await?;
//!
//!     let input = client.files().upload_path("scan.pdf", "application/pdf", true).await?;
//!     let created = client
//!         .jobs()
//!         .submit_compress(&input.file_id, CompressionLevel::High)
//!         .await?;
//!
//!     let mut handle = client.jobs().poller(created.clone()).spawn();
//!     let mut state = handle.state();
//!     tokio::spawn(async move {
//!         while state.changed().await.is_ok() {
//!             println!("{:?}", *state.borrow());
//!         }
//!     });
//!
//!     let result_id = handle.wait().await?.into_result(&created.job_id)?;
//!     let bytes = client.files().download(&result_id).await?;
//!     tokio::fs::write("scan.min.pdf", bytes).await?;
//!     Ok(())
//! }
//! ```

pub mod api_client;
pub mod auth;
pub mod auth_store;
pub mod client;
pub mod credentials;
pub mod error;
pub mod event_handlers;
pub mod files;
pub mod jobs;
pub mod models;
pub mod timeouts;

// Re-export main types for convenience
pub use api_client::{ApiClient, ApiRequest, MultipartPart, RequestBody, RetryState};
pub use auth::AuthProvider;
pub use auth_store::{AuthState, AuthStore};
pub use client::{PdfLinkClient, PdfLinkClientBuilder};
pub use credentials::{MemorySessionStorage, SessionRecord, SessionStorage, AUTH_STORAGE_KEY};
pub use error::{PdfLinkError, Result};
pub use event_handlers::{SessionEvents, SessionExpiredReason};
pub use files::FileTransferGateway;
pub use jobs::{JobClient, JobPoller, JobStatusSource, PollHandle, PollOutcome, PollState};
pub use models::{
    AuthResponse, CompressionLevel, FileEntry, FileList, HttpVersion, Job, JobCreated, JobStatus,
    JobType, Page, RegisterRequest, StorageUsage, UploadedFile, UserInfo, WatermarkPosition,
};
pub use timeouts::{PdfLinkTimeouts, PdfLinkTimeoutsBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
