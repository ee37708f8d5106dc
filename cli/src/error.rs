//! Error types for pdfkit-cli
//!
//! Wraps library errors with wording meant for a terminal user. A job that
//! failed and a job that never finished get different messages.

use pdfkit_link::PdfLinkError;
use std::fmt;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CLIError>;

/// Errors that can occur in the CLI
#[derive(Debug)]
pub enum CLIError {
    /// Error from pdfkit-link library
    LinkError(PdfLinkError),

    /// Configuration file error
    ConfigurationError(String),

    /// File I/O error
    FileError(String),

    /// Interactive prompt could not be read
    InputError(String),

    /// Output could not be rendered
    FormatError(String),

    /// User cancelled operation
    Cancelled,
}

impl CLIError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CLIError::Cancelled | CLIError::LinkError(PdfLinkError::Cancelled) => 130,
            CLIError::LinkError(PdfLinkError::JobTimedOut { .. }) => 3,
            CLIError::LinkError(PdfLinkError::JobFailed { .. }) => 2,
            _ => 1,
        }
    }

    fn format_link_error(err: &PdfLinkError) -> String {
        match err {
            PdfLinkError::NetworkError(msg) => {
                format!("Cannot reach the server: {}", Self::clean_nested_message(msg))
            }
            PdfLinkError::AuthenticationError(msg) => {
                format!("{} (run `pdfkit login` to sign in again)", msg)
            }
            PdfLinkError::JobFailed { job_id, message } => {
                format!("Job {} failed: {}", job_id, message)
            }
            PdfLinkError::JobTimedOut { job_id, attempts } => format!(
                "Job {} timed out: still running after {} status checks. \
                 Check later with `pdfkit job {}`",
                job_id, attempts, job_id
            ),
            PdfLinkError::ServerError {
                status_code,
                message,
            } => format!("Server error ({}): {}", status_code, message),
            PdfLinkError::ValidationError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    fn clean_nested_message(message: &str) -> String {
        let mut cleaned = message.trim();
        let prefixes = [
            "Connection failed:",
            "connection failed:",
            "Network error:",
            "network error:",
        ];

        loop {
            let mut stripped = false;
            for prefix in &prefixes {
                if let Some(rest) = cleaned.strip_prefix(prefix) {
                    cleaned = rest.trim_start();
                    stripped = true;
                    break;
                }
            }

            if !stripped {
                break;
            }
        }

        cleaned.to_string()
    }
}

impl fmt::Display for CLIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CLIError::LinkError(e) => write!(f, "{}", Self::format_link_error(e)),
            CLIError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            CLIError::FileError(msg) => write!(f, "File error: {}", msg),
            CLIError::InputError(msg) => write!(f, "Input error: {}", msg),
            CLIError::FormatError(msg) => write!(f, "Format error: {}", msg),
            CLIError::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for CLIError {}

impl From<PdfLinkError> for CLIError {
    fn from(err: PdfLinkError) -> Self {
        CLIError::LinkError(err)
    }
}

impl From<std::io::Error> for CLIError {
    fn from(err: std::io::Error) -> Self {
        CLIError::FileError(err.to_string())
    }
}

impl From<toml::de::Error> for CLIError {
    fn from(err: toml::de::Error) -> Self {
        CLIError::ConfigurationError(format!("TOML parse error: {}", err))
    }
}
