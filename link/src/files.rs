//! Binary upload and download against the remote file store.

use crate::{
    api_client::{ApiClient, ApiRequest, MultipartPart},
    error::{PdfLinkError, Result},
    models::{FileList, StorageUsage, UploadedFile},
};
use bytes::Bytes;
use log::debug;
use std::path::Path;

const FILES_PATH: &str = "/api/v1/files";
const UPLOAD_FIELD: &str = "file";

/// Gateway to `/api/v1/files`.
///
/// Uploads use the longer upload timeout from [`PdfLinkTimeouts`](crate::PdfLinkTimeouts);
/// everything else uses the default request timeout.
#[derive(Debug, Clone)]
pub struct FileTransferGateway {
    api: ApiClient,
}

impl FileTransferGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload raw bytes as a single multipart file.
    ///
    /// `temporary` marks the file for automatic expiry on the server, which is
    /// what tool inputs use.
    pub async fn upload(
        &self,
        content: impl Into<Bytes>,
        file_name: &str,
        mime_type: &str,
        temporary: bool,
    ) -> Result<UploadedFile> {
        let content = content.into();
        if content.is_empty() {
            return Err(PdfLinkError::ValidationError(
                "cannot upload an empty file".into(),
            ));
        }
        if file_name.trim().is_empty() {
            return Err(PdfLinkError::ValidationError(
                "file name must not be empty".into(),
            ));
        }

        debug!(
            "[FILES] Uploading '{}' ({} bytes, temporary={})",
            file_name,
            content.len(),
            temporary
        );

        let request = ApiRequest::post(FILES_PATH)
            .query("temporary", temporary)
            .timeout(self.api.timeouts().upload_timeout)
            .multipart(MultipartPart {
                field_name: UPLOAD_FIELD.to_string(),
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
                content,
            });

        let uploaded: UploadedFile = self.api.send_json(request).await?;
        debug!("[FILES] Uploaded '{}' as {}", file_name, uploaded.file_id);
        Ok(uploaded)
    }

    /// Read a local file and upload it under its own file name.
    pub async fn upload_path(
        &self,
        path: impl AsRef<Path>,
        mime_type: &str,
        temporary: bool,
    ) -> Result<UploadedFile> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PdfLinkError::ValidationError(format!("'{}' has no file name", path.display()))
            })?
            .to_string();

        let content = tokio::fs::read(path).await.map_err(|e| {
            PdfLinkError::ValidationError(format!("cannot read '{}': {}", path.display(), e))
        })?;

        self.upload(content, &file_name, mime_type, temporary).await
    }

    /// Fetch the raw bytes of a stored file.
    pub async fn download(&self, file_id: &str) -> Result<Bytes> {
        require_file_id(file_id)?;
        let request = ApiRequest::get(format!("{}/{}/download", FILES_PATH, file_id))
            .timeout(self.api.timeouts().upload_timeout);
        let bytes = self.api.send_bytes(request).await?;
        debug!("[FILES] Downloaded {} ({} bytes)", file_id, bytes.len());
        Ok(bytes)
    }

    pub async fn metadata(&self, file_id: &str) -> Result<UploadedFile> {
        require_file_id(file_id)?;
        self.api
            .send_json(ApiRequest::get(format!("{}/{}/metadata", FILES_PATH, file_id)))
            .await
    }

    pub async fn delete(&self, file_id: &str) -> Result<()> {
        require_file_id(file_id)?;
        self.api
            .send_void(ApiRequest::delete(format!("{}/{}", FILES_PATH, file_id)))
            .await
    }

    /// One page of the current user's files (0-based page index).
    pub async fn list(&self, page: u32, size: u32) -> Result<FileList> {
        let request = ApiRequest::get(FILES_PATH)
            .query("page", page)
            .query("size", size);
        self.api.send_json(request).await
    }

    pub async fn usage(&self) -> Result<StorageUsage> {
        self.api
            .send_json(ApiRequest::get(format!("{}/usage", FILES_PATH)))
            .await
    }
}

fn require_file_id(file_id: &str) -> Result<()> {
    if file_id.trim().is_empty() {
        Err(PdfLinkError::ValidationError("file id must not be empty".into()))
    } else {
        Ok(())
    }
}
