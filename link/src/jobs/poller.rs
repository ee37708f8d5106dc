//! Polling loop that follows a submitted job to a terminal state.
//!
//! The loop waits a fixed interval, fetches the job, and stops on the first
//! of: a terminal status, an `errorMessage` in the fetch, the attempt limit,
//! or a cancel signal. Each step is published on a `watch` channel so a shell
//! can render progress without owning the loop.

use crate::{
    error::{PdfLinkError, Result},
    models::{Job, JobCreated, JobStatus},
    timeouts::PdfLinkTimeouts,
};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

const DEFAULT_FAILURE_MESSAGE: &str = "Job failed";
const CANCELLED_BY_SERVER_MESSAGE: &str = "job was cancelled";
const MISSING_RESULT_MESSAGE: &str = "job completed without a result file";

/// Where the poller reads job status from.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn fetch_status(&self, job_id: &str) -> Result<Job>;
}

/// Observable progress of a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Status reported by the submit call; nothing fetched yet.
    Submitted { status: JobStatus },
    /// Latest fetched status after `attempt` fetches.
    Polling {
        attempt: u32,
        status: JobStatus,
        progress: u8,
    },
    Succeeded(String),
    Failed(String),
    TimedOut { attempts: u32 },
    Cancelled,
    /// A status fetch itself failed (transport, auth, server error).
    Errored(String),
}

impl PollState {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Submitted { .. } | Self::Polling { .. })
    }
}

/// How a poll ended, when every status fetch went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Job completed; carries the result file id.
    Succeeded(String),
    /// Job reported an error message, FAILED, or was cancelled server-side.
    Failed(String),
    /// Attempt limit reached before a terminal status.
    TimedOut { attempts: u32 },
    /// Caller stopped polling.
    Cancelled,
}

impl PollOutcome {
    /// Outcome of a job that needs no polling: one that already carries an
    /// error message or a terminal status. `None` while it is still running.
    pub fn from_settled_job(job: &Job) -> Option<Self> {
        if let Some(message) = job.error_message.as_deref().filter(|m| !m.trim().is_empty()) {
            return Some(Self::Failed(message.to_string()));
        }
        match job.status {
            JobStatus::Completed => Some(match job.result_file_id {
                Some(ref file_id) => Self::Succeeded(file_id.clone()),
                None => Self::Failed(MISSING_RESULT_MESSAGE.to_string()),
            }),
            JobStatus::Failed => Some(Self::Failed(DEFAULT_FAILURE_MESSAGE.to_string())),
            JobStatus::Cancelled => Some(Self::Failed(CANCELLED_BY_SERVER_MESSAGE.to_string())),
            JobStatus::Pending | JobStatus::Processing => None,
        }
    }

    /// Result file id on success, a distinct error for every other ending.
    pub fn into_result(self, job_id: &str) -> Result<String> {
        match self {
            Self::Succeeded(file_id) => Ok(file_id),
            Self::Failed(message) => Err(PdfLinkError::JobFailed {
                job_id: job_id.to_string(),
                message,
            }),
            Self::TimedOut { attempts } => Err(PdfLinkError::JobTimedOut {
                job_id: job_id.to_string(),
                attempts,
            }),
            Self::Cancelled => Err(PdfLinkError::Cancelled),
        }
    }

    fn as_state(&self) -> PollState {
        match self {
            Self::Succeeded(id) => PollState::Succeeded(id.clone()),
            Self::Failed(msg) => PollState::Failed(msg.clone()),
            Self::TimedOut { attempts } => PollState::TimedOut {
                attempts: *attempts,
            },
            Self::Cancelled => PollState::Cancelled,
        }
    }
}

/// Follows one job until it settles.
pub struct JobPoller {
    source: Arc<dyn JobStatusSource>,
    job_id: String,
    initial_status: JobStatus,
    interval: Duration,
    max_attempts: u32,
}

impl JobPoller {
    pub fn new(
        source: Arc<dyn JobStatusSource>,
        created: JobCreated,
        timeouts: &PdfLinkTimeouts,
    ) -> Self {
        Self {
            source,
            job_id: created.job_id,
            initial_status: created.status,
            interval: timeouts.poll_interval,
            max_attempts: timeouts.max_poll_attempts,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Poll in the current task until the job settles or `cancel` fires.
    ///
    /// Dropping the sender half of `cancel` also counts as cancellation.
    pub async fn run(self, mut cancel: oneshot::Receiver<()>) -> Result<PollOutcome> {
        let (state_tx, _state_rx) = watch::channel(PollState::Submitted {
            status: self.initial_status,
        });
        self.drive(&mut cancel, &state_tx).await
    }

    /// Poll on a background task.
    pub fn spawn(self) -> PollHandle {
        let (close_tx, mut close_rx) = oneshot::channel();
        let (state_tx, state_rx) = watch::channel(PollState::Submitted {
            status: self.initial_status,
        });
        let job_id = self.job_id.clone();

        let task = tokio::spawn(async move { self.drive(&mut close_rx, &state_tx).await });

        PollHandle {
            job_id,
            close_tx: Some(close_tx),
            state_rx,
            task: Some(task),
        }
    }

    async fn drive(
        &self,
        cancel: &mut oneshot::Receiver<()>,
        state: &watch::Sender<PollState>,
    ) -> Result<PollOutcome> {
        let result = self.poll_loop(cancel, state).await;
        match &result {
            Ok(outcome) => {
                state.send_replace(outcome.as_state());
            }
            Err(e) => {
                state.send_replace(PollState::Errored(e.to_string()));
            }
        }
        result
    }

    async fn poll_loop(
        &self,
        cancel: &mut oneshot::Receiver<()>,
        state: &watch::Sender<PollState>,
    ) -> Result<PollOutcome> {
        let mut status = self.initial_status;
        let mut result_file_id: Option<String> = None;
        let mut attempts: u32 = 0;

        debug!(
            "[POLL] Following job {} (status={}, interval={:?}, max_attempts={})",
            self.job_id, status, self.interval, self.max_attempts
        );

        while !status.is_terminal() && attempts < self.max_attempts {
            tokio::select! {
                biased;
                _ = &mut *cancel => return Ok(self.cancelled(attempts)),
                _ = tokio::time::sleep(self.interval) => {}
            }

            let job = tokio::select! {
                biased;
                _ = &mut *cancel => return Ok(self.cancelled(attempts)),
                fetched = self.source.fetch_status(&self.job_id) => fetched?,
            };

            attempts += 1;
            status = job.status;
            if job.result_file_id.is_some() {
                result_file_id = job.result_file_id;
            }

            if let Some(message) = job.error_message.filter(|m| !m.trim().is_empty()) {
                warn!(
                    "[POLL] Job {} reported an error after {} checks: {}",
                    self.job_id, attempts, message
                );
                return Ok(PollOutcome::Failed(message));
            }

            debug!(
                "[POLL] Job {} attempt {}/{} status={} progress={}",
                self.job_id, attempts, self.max_attempts, status, job.progress
            );
            state.send_replace(PollState::Polling {
                attempt: attempts,
                status,
                progress: job.progress,
            });
        }

        let outcome = match status {
            JobStatus::Completed => {
                if result_file_id.is_none() && attempts == 0 {
                    // Submit already reported COMPLETED; the result id only comes with a fetch
                    let job = tokio::select! {
                        biased;
                        _ = &mut *cancel => return Ok(self.cancelled(attempts)),
                        fetched = self.source.fetch_status(&self.job_id) => fetched?,
                    };
                    result_file_id = job.result_file_id;
                }
                match result_file_id {
                    Some(file_id) => PollOutcome::Succeeded(file_id),
                    None => PollOutcome::Failed(MISSING_RESULT_MESSAGE.to_string()),
                }
            }
            JobStatus::Failed => PollOutcome::Failed(DEFAULT_FAILURE_MESSAGE.to_string()),
            JobStatus::Cancelled => PollOutcome::Failed(CANCELLED_BY_SERVER_MESSAGE.to_string()),
            JobStatus::Pending | JobStatus::Processing => PollOutcome::TimedOut { attempts },
        };

        info!(
            "[POLL] Job {} settled after {} checks: {:?}",
            self.job_id, attempts, outcome
        );
        Ok(outcome)
    }

    fn cancelled(&self, attempts: u32) -> PollOutcome {
        debug!(
            "[POLL] Stopped following job {} after {} checks",
            self.job_id, attempts
        );
        PollOutcome::Cancelled
    }
}

impl std::fmt::Debug for JobPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobPoller")
            .field("job_id", &self.job_id)
            .field("initial_status", &self.initial_status)
            .field("interval", &self.interval)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Handle to a poll running on a background task.
///
/// Dropping the handle cancels the poll.
#[derive(Debug)]
pub struct PollHandle {
    job_id: String,
    close_tx: Option<oneshot::Sender<()>>,
    state_rx: watch::Receiver<PollState>,
    task: Option<JoinHandle<Result<PollOutcome>>>,
}

impl PollHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Stop polling. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Receiver of state updates; the latest value is always available.
    pub fn state(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }

    /// Wait for the poll to settle.
    pub async fn wait(mut self) -> Result<PollOutcome> {
        let Some(task) = self.task.take() else {
            return Ok(PollOutcome::Cancelled);
        };
        match task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(PollOutcome::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        // No-op when cancel() already ran or the loop has finished.
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
    }
}
