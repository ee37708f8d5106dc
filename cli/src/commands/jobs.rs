use pdfkit_cli::{CLISession, Result};
use pdfkit_link::{JobCreated, PollOutcome, PollState};
use std::path::Path;

use super::files::write_output;

/// Spinner text for one poll state
fn describe(job_id: &str, state: &PollState) -> String {
    match state {
        PollState::Submitted { status } => format!("Job {} {}", job_id, status),
        PollState::Polling {
            attempt,
            status,
            progress,
        } => format!("Job {} {} {}% (check {})", job_id, status, progress, attempt),
        PollState::Succeeded(_) => format!("Job {} completed", job_id),
        PollState::Failed(msg) => format!("Job {} failed: {}", job_id, msg),
        PollState::TimedOut { attempts } => {
            format!("Job {} still running after {} checks", job_id, attempts)
        }
        PollState::Cancelled => format!("Job {} no longer followed", job_id),
        PollState::Errored(msg) => format!("Job {} status check failed: {}", job_id, msg),
    }
}

/// Follow a job until it settles and return its result file id.
///
/// Ctrl-C stops following the job; the server keeps processing it.
pub async fn wait_for_result(session: &CLISession, created: JobCreated) -> Result<String> {
    let job_id = created.job_id.clone();
    let mut handle = session.client().jobs().poller(created).spawn();
    let mut state = handle.state();
    let spinner = session.create_spinner(&describe(&job_id, &state.borrow()));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = state.changed() => {
                // Sender dropped: the poll task has ended
                if changed.is_err() {
                    break;
                }
                let current = state.borrow_and_update().clone();
                log::debug!("[JOBS] {}", describe(&job_id, &current));
                if let Some(ref pb) = spinner {
                    pb.set_message(describe(&job_id, &current));
                }
                if current.is_finished() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                log::debug!("[JOBS] Interrupted, cancelling poll for {}", job_id);
                handle.cancel();
                break;
            }
        }
    }

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let outcome = handle.wait().await?;
    Ok(outcome.into_result(&job_id)?)
}

pub async fn list(session: &CLISession, page: u32, size: u32) -> Result<()> {
    let jobs = session.client().jobs().list_jobs(page, size).await?;
    session.print(&session.formatter().format_jobs(&jobs)?);
    Ok(())
}

pub async fn show(
    session: &CLISession,
    job_id: &str,
    wait: bool,
    output: Option<&Path>,
) -> Result<()> {
    let job = session.client().jobs().job(job_id).await?;

    if !wait && output.is_none() {
        session.print(&session.formatter().format_job(&job)?);
        return Ok(());
    }

    let result_file_id = match PollOutcome::from_settled_job(&job) {
        Some(outcome) => outcome.into_result(job_id)?,
        None => {
            let created = JobCreated {
                job_id: job.id.clone(),
                status: job.status,
            };
            wait_for_result(session, created).await?
        }
    };

    match output {
        Some(path) => {
            let bytes = session.client().files().download(&result_file_id).await?;
            write_output(path, &bytes).await?;
            session.success(&format!("Job {} completed, saved {}", job_id, path.display()));
        }
        None => {
            let job = session.client().jobs().job(job_id).await?;
            session.print(&session.formatter().format_job(&job)?);
        }
    }
    Ok(())
}
