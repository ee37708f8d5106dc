//! PDF tool subcommands: upload inputs, submit, follow the job, download.

use pdfkit_cli::{CLIError, CLISession, OutputFormatter, Result};
use pdfkit_link::{CompressionLevel, JobCreated, JobType, WatermarkPosition};
use std::path::{Path, PathBuf};

use super::auth::password_or_prompt;
use super::files::{guess_mime, write_output};
use super::jobs::wait_for_result;

/// `<dir>/<stem>-<tool>.pdf` next to the input
pub fn default_output(input: &Path, job_type: JobType) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let name = format!("{}-{}.pdf", stem, job_type.as_str().to_lowercase());
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

async fn upload_input(session: &CLISession, path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(CLIError::FileError(format!("'{}' is not a file", path.display())));
    }
    let spinner = session.create_spinner(&format!("Uploading {}...", path.display()));
    let result = session
        .client()
        .files()
        .upload_path(path, guess_mime(path), true)
        .await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    Ok(result?.file_id)
}

/// Follow a submitted job and save its result
async fn finish(session: &CLISession, created: JobCreated, output: &Path) -> Result<()> {
    let job_id = created.job_id.clone();
    log::info!("[JOBS] Submitted job {}", job_id);

    let result_file_id = wait_for_result(session, created).await?;

    let spinner = session.create_spinner("Downloading result...");
    let result = session.client().files().download(&result_file_id).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let bytes = result?;
    write_output(output, &bytes).await?;

    if session.is_json() {
        session.print(
            &serde_json::json!({
                "jobId": job_id,
                "resultFileId": result_file_id,
                "output": output.display().to_string(),
                "sizeBytes": bytes.len(),
            })
            .to_string(),
        );
    } else {
        session.success(&format!(
            "Job {} completed, saved {} ({})",
            job_id,
            output.display(),
            OutputFormatter::format_bytes(bytes.len() as u64)
        ));
    }
    Ok(())
}

pub async fn merge(session: &CLISession, inputs: &[PathBuf], output: Option<PathBuf>) -> Result<()> {
    let mut file_ids = Vec::with_capacity(inputs.len());
    for input in inputs {
        file_ids.push(upload_input(session, input).await?);
    }

    let output = output.unwrap_or_else(|| PathBuf::from("merged.pdf"));
    let output_name = output
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string);
    let created = session.client().jobs().submit_merge(file_ids, output_name).await?;
    finish(session, created, &output).await
}

pub async fn split(
    session: &CLISession,
    input: &Path,
    pages: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    // Reject bad ranges before spending an upload on them
    let pages = pdfkit_link::jobs::normalize_page_ranges(pages)?;
    let file_id = upload_input(session, input).await?;
    let created = session.client().jobs().submit_split(&file_id, &pages).await?;
    let output = output.unwrap_or_else(|| default_output(input, JobType::Split));
    finish(session, created, &output).await
}

pub async fn compress(
    session: &CLISession,
    input: &Path,
    level: CompressionLevel,
    output: Option<PathBuf>,
) -> Result<()> {
    let file_id = upload_input(session, input).await?;
    let created = session.client().jobs().submit_compress(&file_id, level).await?;
    let output = output.unwrap_or_else(|| default_output(input, JobType::Compress));
    finish(session, created, &output).await
}

pub async fn watermark(
    session: &CLISession,
    input: &Path,
    text: &str,
    position: WatermarkPosition,
    output: Option<PathBuf>,
) -> Result<()> {
    let file_id = upload_input(session, input).await?;
    let created = session
        .client()
        .jobs()
        .submit_watermark(&file_id, text, position)
        .await?;
    let output = output.unwrap_or_else(|| default_output(input, JobType::Watermark));
    finish(session, created, &output).await
}

pub async fn protect(
    session: &CLISession,
    input: &Path,
    user_password: Option<String>,
    owner_password: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let user_password = password_or_prompt(user_password, "Password for the protected file: ")?;
    let file_id = upload_input(session, input).await?;
    let created = session
        .client()
        .jobs()
        .submit_protect(&file_id, &user_password, owner_password.as_deref())
        .await?;
    let output = output.unwrap_or_else(|| default_output(input, JobType::Protect));
    finish(session, created, &output).await
}

pub async fn unlock(
    session: &CLISession,
    input: &Path,
    password: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let password = password_or_prompt(password, "Current password: ")?;
    let file_id = upload_input(session, input).await?;
    let created = session.client().jobs().submit_unlock(&file_id, &password).await?;
    let output = output.unwrap_or_else(|| default_output(input, JobType::Unlock));
    finish(session, created, &output).await
}

pub async fn rotate(
    session: &CLISession,
    input: &Path,
    angle: u16,
    pages: Vec<u32>,
    output: Option<PathBuf>,
) -> Result<()> {
    let page_numbers = if pages.is_empty() { None } else { Some(pages) };
    let file_id = upload_input(session, input).await?;
    let created = session
        .client()
        .jobs()
        .submit_rotate(&file_id, angle, page_numbers)
        .await?;
    let output = output.unwrap_or_else(|| default_output(input, JobType::Rotate));
    finish(session, created, &output).await
}
