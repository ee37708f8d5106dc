use pdfkit_cli::{CLISession, OutputFormatter, Result};
use std::path::Path;

/// MIME type from the file extension, `application/octet-stream` when unknown
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Write downloaded bytes, creating parent directories as needed
pub async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

pub async fn upload(
    session: &CLISession,
    path: &Path,
    temporary: bool,
    content_type: Option<String>,
) -> Result<()> {
    let mime = content_type.unwrap_or_else(|| guess_mime(path).to_string());
    let spinner = session.create_spinner(&format!("Uploading {}...", path.display()));
    let result = session.client().files().upload_path(path, &mime, temporary).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let uploaded = result?;
    session.print(&session.formatter().format_uploaded(&uploaded)?);
    Ok(())
}

pub async fn download(session: &CLISession, file_id: &str, output: &Path) -> Result<()> {
    let spinner = session.create_spinner(&format!("Downloading {}...", file_id));
    let result = session.client().files().download(file_id).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let bytes = result?;
    write_output(output, &bytes).await?;
    session.success(&format!(
        "Saved {} ({})",
        output.display(),
        OutputFormatter::format_bytes(bytes.len() as u64)
    ));
    Ok(())
}

pub async fn list(session: &CLISession, page: u32, size: u32) -> Result<()> {
    let files = session.client().files().list(page, size).await?;
    session.print(&session.formatter().format_files(&files)?);
    if !session.is_json() && files.total_pages > page + 1 {
        println!("Page {} of {}, use --page {} for more", page + 1, files.total_pages, page + 1);
    }
    Ok(())
}

pub async fn info(session: &CLISession, file_id: &str) -> Result<()> {
    let file = session.client().files().metadata(file_id).await?;
    session.print(&session.formatter().format_uploaded(&file)?);
    Ok(())
}

pub async fn delete(session: &CLISession, file_id: &str) -> Result<()> {
    session.client().files().delete(file_id).await?;
    session.success(&format!("Deleted {}", file_id));
    Ok(())
}

pub async fn usage(session: &CLISession) -> Result<()> {
    let usage = session.client().files().usage().await?;
    session.print(&session.formatter().format_usage(&usage)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("a/report.PDF")), "application/pdf");
        assert_eq!(guess_mime(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("noext")), "application/octet-stream");
    }
}
