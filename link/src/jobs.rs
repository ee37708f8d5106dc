//! Job submission and observation for the PDF tool endpoints.
//!
//! Every tool is a two-step exchange: a submit call that answers with a job id,
//! then repeated status reads until the backend settles the job. Submit calls
//! validate their input before touching the network.

pub mod page_ranges;
pub mod poller;

pub use page_ranges::{normalize_page_ranges, parse_page_ranges, PageRange};
pub use poller::{JobPoller, JobStatusSource, PollHandle, PollOutcome, PollState};

use crate::{
    api_client::{ApiClient, ApiRequest},
    error::{PdfLinkError, Result},
    models::{
        CompressRequest, CompressionLevel, Job, JobCreated, JobType, MergeRequest, Page,
        ProtectRequest, RotateRequest, SplitRequest, UnlockRequest, WatermarkPosition,
        WatermarkRequest,
    },
};
use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use std::sync::Arc;

const PDF_PATH: &str = "/api/v1/pdf";
const ROTATION_ANGLES: [u16; 3] = [90, 180, 270];

/// Client for `/api/v1/pdf`.
#[derive(Debug, Clone)]
pub struct JobClient {
    api: ApiClient,
}

impl JobClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Combine two or more files, in order, into one document.
    pub async fn submit_merge(
        &self,
        file_ids: Vec<String>,
        output_file_name: Option<String>,
    ) -> Result<JobCreated> {
        if file_ids.len() < 2 {
            return Err(PdfLinkError::ValidationError(format!(
                "merge needs at least 2 files, got {}",
                file_ids.len()
            )));
        }
        for id in &file_ids {
            require_file_id(id)?;
        }
        let output_file_name = output_file_name.filter(|n| !n.trim().is_empty());

        self.submit(
            JobType::Merge,
            &MergeRequest {
                file_ids,
                output_file_name,
            },
        )
        .await
    }

    /// Split a document by a range expression such as `1-3,5,7-10`.
    pub async fn submit_split(&self, file_id: &str, page_ranges: &str) -> Result<JobCreated> {
        require_file_id(file_id)?;
        let page_ranges = normalize_page_ranges(page_ranges)?;

        self.submit(
            JobType::Split,
            &SplitRequest {
                file_id: file_id.to_string(),
                page_ranges,
            },
        )
        .await
    }

    pub async fn submit_compress(
        &self,
        file_id: &str,
        compression_level: CompressionLevel,
    ) -> Result<JobCreated> {
        require_file_id(file_id)?;
        self.submit(
            JobType::Compress,
            &CompressRequest {
                file_id: file_id.to_string(),
                compression_level,
            },
        )
        .await
    }

    pub async fn submit_watermark(
        &self,
        file_id: &str,
        watermark_text: &str,
        position: WatermarkPosition,
    ) -> Result<JobCreated> {
        require_file_id(file_id)?;
        if watermark_text.trim().is_empty() {
            return Err(PdfLinkError::ValidationError(
                "watermark text must not be empty".into(),
            ));
        }

        self.submit(
            JobType::Watermark,
            &WatermarkRequest {
                file_id: file_id.to_string(),
                watermark_text: watermark_text.to_string(),
                position,
            },
        )
        .await
    }

    /// Encrypt a document. An empty owner password falls back to the user password.
    pub async fn submit_protect(
        &self,
        file_id: &str,
        user_password: &str,
        owner_password: Option<&str>,
    ) -> Result<JobCreated> {
        require_file_id(file_id)?;
        if user_password.is_empty() {
            return Err(PdfLinkError::ValidationError(
                "password must not be empty".into(),
            ));
        }
        let owner_password = owner_password
            .filter(|p| !p.is_empty())
            .unwrap_or(user_password);

        self.submit(
            JobType::Protect,
            &ProtectRequest {
                file_id: file_id.to_string(),
                user_password: user_password.to_string(),
                owner_password: owner_password.to_string(),
            },
        )
        .await
    }

    pub async fn submit_unlock(&self, file_id: &str, password: &str) -> Result<JobCreated> {
        require_file_id(file_id)?;
        if password.is_empty() {
            return Err(PdfLinkError::ValidationError(
                "password must not be empty".into(),
            ));
        }

        self.submit(
            JobType::Unlock,
            &UnlockRequest {
                file_id: file_id.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// Rotate pages clockwise. `page_numbers` of `None` rotates every page.
    pub async fn submit_rotate(
        &self,
        file_id: &str,
        angle: u16,
        page_numbers: Option<Vec<u32>>,
    ) -> Result<JobCreated> {
        require_file_id(file_id)?;
        if !ROTATION_ANGLES.contains(&angle) {
            return Err(PdfLinkError::ValidationError(format!(
                "rotation angle must be 90, 180 or 270, got {}",
                angle
            )));
        }
        if let Some(pages) = &page_numbers {
            if pages.is_empty() || pages.contains(&0) {
                return Err(PdfLinkError::ValidationError(
                    "page numbers must be non-empty and start at 1".into(),
                ));
            }
        }

        self.submit(
            JobType::Rotate,
            &RotateRequest {
                file_id: file_id.to_string(),
                angle,
                page_numbers,
            },
        )
        .await
    }

    /// Current snapshot of a job.
    pub async fn job(&self, job_id: &str) -> Result<Job> {
        if job_id.trim().is_empty() {
            return Err(PdfLinkError::ValidationError("job id must not be empty".into()));
        }
        self.api
            .send_json(ApiRequest::get(format!("{}/jobs/{}", PDF_PATH, job_id)))
            .await
    }

    /// One page of the current user's jobs (0-based page index).
    pub async fn list_jobs(&self, page: u32, size: u32) -> Result<Page<Job>> {
        let request = ApiRequest::get(format!("{}/jobs", PDF_PATH))
            .query("page", page)
            .query("size", size);
        self.api.send_json(request).await
    }

    /// Poller for a job this client submitted, using the client's poll settings.
    pub fn poller(&self, created: JobCreated) -> JobPoller {
        JobPoller::new(Arc::new(self.clone()), created, self.api.timeouts())
    }

    async fn submit<B: Serialize>(&self, job_type: JobType, body: &B) -> Result<JobCreated> {
        let endpoint = job_type.endpoint().ok_or_else(|| {
            PdfLinkError::ValidationError(format!("{} jobs cannot be submitted", job_type))
        })?;

        let request = ApiRequest::post(format!("{}/{}", PDF_PATH, endpoint)).json(body)?;
        let created: JobCreated = self.api.send_json(request).await?;
        debug!(
            "[JOBS] Submitted {} job {} (status={})",
            job_type, created.job_id, created.status
        );
        Ok(created)
    }
}

#[async_trait]
impl JobStatusSource for JobClient {
    async fn fetch_status(&self, job_id: &str) -> Result<Job> {
        self.job(job_id).await
    }
}

fn require_file_id(file_id: &str) -> Result<()> {
    if file_id.trim().is_empty() {
        Err(PdfLinkError::ValidationError("file id must not be empty".into()))
    } else {
        Ok(())
    }
}
