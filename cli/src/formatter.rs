//! Output formatters for listings and job results
//!
//! Renders server responses either as psql-style box tables or as pretty
//! JSON for scripting.

use colored::*;
use pdfkit_link::{FileList, Job, JobStatus, Page, StorageUsage, UploadedFile, UserInfo};
use serde::Serialize;

use crate::{
    error::{CLIError, Result},
    session::OutputFormat,
};

/// Maximum column width before truncation
const MAX_COLUMN_WIDTH: usize = 40;

/// Formats responses for display
pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl OutputFormatter {
    /// Create a new formatter
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Truncate a string to max width with ellipsis
    fn truncate_value(value: &str, max_width: usize) -> String {
        if value.chars().count() <= max_width {
            value.to_string()
        } else if max_width <= 3 {
            value.chars().take(max_width).collect()
        } else {
            let take = max_width - 3;
            format!("{}...", value.chars().take(take).collect::<String>())
        }
    }

    /// Human readable byte count (binary units)
    pub fn format_bytes(bytes: u64) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
        if bytes < 1024 {
            return format!("{} B", bytes);
        }
        let mut value = bytes as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        format!("{:.1} {}", value, UNITS[unit])
    }

    fn to_json<T: Serialize>(value: &T) -> Result<String> {
        serde_json::to_string_pretty(value).map_err(|e| CLIError::FormatError(e.to_string()))
    }

    /// Render rows as a box table with a row-count footer
    fn render_table(columns: &[&str], rows: &[Vec<String>]) -> String {
        let mut col_widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
        for row in rows {
            for (i, value) in row.iter().enumerate() {
                col_widths[i] = col_widths[i].max(value.chars().count()).min(MAX_COLUMN_WIDTH);
            }
        }

        let mut output = Self::border(&col_widths, '┌', '┬', '┐');
        output.push_str(&Self::row_line(&col_widths, columns.iter().copied()));
        output.push_str(&Self::border(&col_widths, '├', '┼', '┤'));
        for row in rows {
            output.push_str(&Self::row_line(&col_widths, row.iter().map(String::as_str)));
        }
        output.push_str(&Self::border(&col_widths, '└', '┴', '┘'));

        let row_label = if rows.len() == 1 { "row" } else { "rows" };
        output.push_str(&format!("({} {})", rows.len(), row_label));
        output
    }

    fn border(col_widths: &[usize], left: char, mid: char, right: char) -> String {
        let mut line = String::new();
        line.push(left);
        for (idx, width) in col_widths.iter().enumerate() {
            line.push_str(&"─".repeat(width + 2));
            line.push(if idx == col_widths.len() - 1 { right } else { mid });
        }
        line.push('\n');
        line
    }

    fn row_line<'a>(col_widths: &[usize], values: impl Iterator<Item = &'a str>) -> String {
        let mut line = String::from("│");
        for (i, value) in values.enumerate() {
            let truncated = Self::truncate_value(value, col_widths[i]);
            line.push_str(&format!(" {:width$} │", truncated, width = col_widths[i]));
        }
        line.push('\n');
        line
    }

    pub fn format_files(&self, files: &FileList) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::to_json(files),
            OutputFormat::Table => {
                let rows: Vec<Vec<String>> = files
                    .files
                    .iter()
                    .map(|f| {
                        vec![
                            f.file_id.clone(),
                            f.file_name.clone(),
                            Self::format_bytes(f.size_bytes),
                            f.created_at.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                Ok(Self::render_table(&["id", "name", "size", "created"], &rows))
            }
        }
    }

    pub fn format_jobs(&self, jobs: &Page<Job>) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::to_json(jobs),
            OutputFormat::Table => {
                let rows: Vec<Vec<String>> = jobs
                    .content
                    .iter()
                    .map(|j| {
                        vec![
                            j.id.clone(),
                            j.job_type.map(|t| t.to_string()).unwrap_or_default(),
                            j.status.to_string(),
                            format!("{}%", j.progress),
                            j.result_file_id.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                Ok(Self::render_table(
                    &["id", "type", "status", "progress", "result"],
                    &rows,
                ))
            }
        }
    }

    pub fn format_job(&self, job: &Job) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Self::to_json(job);
        }

        let mut lines = vec![
            format!("Job:      {}", job.id),
            format!("Status:   {}", self.paint_status(job.status)),
            format!("Progress: {}%", job.progress),
        ];
        if let Some(job_type) = job.job_type {
            lines.insert(1, format!("Type:     {}", job_type));
        }
        if let Some(ref result) = job.result_file_id {
            lines.push(format!("Result:   {}", result));
        }
        if let Some(ref error) = job.error_message {
            lines.push(format!("Error:    {}", error));
        }
        Ok(lines.join("\n"))
    }

    pub fn format_uploaded(&self, file: &UploadedFile) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::to_json(file),
            OutputFormat::Table => Ok(Self::render_table(
                &["id", "name", "type", "size"],
                &[vec![
                    file.file_id.clone(),
                    file.file_name.clone(),
                    file.content_type.clone(),
                    Self::format_bytes(file.size_bytes),
                ]],
            )),
        }
    }

    pub fn format_usage(&self, usage: &StorageUsage) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::to_json(usage),
            OutputFormat::Table => {
                let used = usage
                    .formatted_used
                    .clone()
                    .unwrap_or_else(|| Self::format_bytes(usage.used_bytes));
                let total = usage
                    .formatted_total
                    .clone()
                    .unwrap_or_else(|| Self::format_bytes(usage.total_bytes));
                Ok(format!(
                    "Used {} of {} ({:.1}%), {} available, {} files",
                    used,
                    total,
                    usage.used_percent(),
                    Self::format_bytes(usage.available_bytes),
                    usage.file_count
                ))
            }
        }
    }

    pub fn format_user(&self, user: &UserInfo) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::to_json(user),
            OutputFormat::Table => {
                let roles = if user.roles.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", user.roles.join(", "))
                };
                Ok(format!("{} <{}>{}", user.display_name(), user.email, roles))
            }
        }
    }

    fn paint_status(&self, status: JobStatus) -> String {
        if !self.color {
            return status.to_string();
        }
        match status {
            JobStatus::Completed => status.as_str().green().to_string(),
            JobStatus::Failed | JobStatus::Cancelled => status.as_str().red().to_string(),
            JobStatus::Pending | JobStatus::Processing => status.as_str().yellow().to_string(),
        }
    }
}
