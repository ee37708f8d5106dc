use clap::{Parser, Subcommand};
use pdfkit_cli::OutputFormat;
use pdfkit_link::{CompressionLevel, WatermarkPosition};
use std::path::PathBuf;

/// pdfkit - Terminal client for the pdfkit document-processing API
#[derive(Parser, Debug)]
#[command(name = "pdfkit")]
#[command(version)]
#[command(about = "Merge, split, compress and protect PDFs through the pdfkit API", long_about = None)]
pub struct Cli {
    /// Server URL (e.g., http://localhost:8080)
    #[arg(short = 'u', long = "url", env = "PDFKIT_API_URL", global = true)]
    pub url: Option<String>,

    /// Configuration file path
    #[arg(long = "config", default_value = "~/.pdfkit/config.toml", global = true)]
    pub config: PathBuf,

    /// Session file path (defaults to the user config directory)
    #[arg(long = "session-file", global = true)]
    pub session_file: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable JSON output (shorthand for --format=json)
    #[arg(long = "json", conflicts_with = "format", global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Disable spinners/animations
    #[arg(long = "no-spinner", global = true)]
    pub no_spinner: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Use fast timeout preset (local development)
    #[arg(long = "fast-timeouts", conflicts_with = "relaxed_timeouts", global = true)]
    pub fast_timeouts: bool,

    /// Use relaxed timeout preset (high-latency networks)
    #[arg(long = "relaxed-timeouts", global = true)]
    pub relaxed_timeouts: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,

        #[arg(long = "first-name")]
        first_name: String,

        #[arg(long = "last-name")]
        last_name: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Upload a file
    Upload {
        path: PathBuf,

        /// Mark the upload as temporary (removed by the server later)
        #[arg(long)]
        temporary: bool,

        /// MIME type (guessed from the extension when omitted)
        #[arg(long = "content-type")]
        content_type: Option<String>,
    },

    /// Download a stored file
    Download {
        file_id: String,

        #[arg(short = 'o', long = "output")]
        output: PathBuf,
    },

    /// List stored files
    Files {
        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        size: u32,
    },

    /// Show a stored file's metadata
    FileInfo { file_id: String },

    /// Delete a stored file
    DeleteFile { file_id: String },

    /// Show storage usage
    Usage,

    /// List jobs
    Jobs {
        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        size: u32,
    },

    /// Show a job, optionally waiting for it to finish
    Job {
        job_id: String,

        /// Poll until the job completes, fails or times out
        #[arg(long)]
        wait: bool,

        /// Download the result here once the job completes (implies --wait)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Merge two or more PDFs into one
    Merge {
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,

        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Extract page ranges from a PDF
    Split {
        input: PathBuf,

        /// Page ranges, e.g. "1-3,5"
        #[arg(long = "pages")]
        pages: String,

        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Reduce PDF file size
    Compress {
        input: PathBuf,

        /// low, medium or high
        #[arg(long = "level", default_value = "medium")]
        level: CompressionLevel,

        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Stamp text onto every page
    Watermark {
        input: PathBuf,

        #[arg(long = "text")]
        text: String,

        /// center, top-left, top-right, bottom-left, bottom-right or diagonal
        #[arg(long = "position", default_value = "center")]
        position: WatermarkPosition,

        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Encrypt a PDF with a password
    Protect {
        input: PathBuf,

        /// Password required to open the file (prompted when omitted)
        #[arg(long = "user-password")]
        user_password: Option<String>,

        /// Password for changing permissions (defaults to the user password)
        #[arg(long = "owner-password")]
        owner_password: Option<String>,

        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Remove password protection
    Unlock {
        input: PathBuf,

        /// Current password (prompted when omitted)
        #[arg(long = "password")]
        password: Option<String>,

        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Rotate pages
    Rotate {
        input: PathBuf,

        /// 90, 180 or 270
        #[arg(long = "angle")]
        angle: u16,

        /// Comma separated page numbers (all pages when omitted)
        #[arg(long = "pages", value_delimiter = ',')]
        pages: Vec<u32>,

        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_merge_needs_two_inputs() {
        assert!(Cli::try_parse_from(["pdfkit", "merge", "a.pdf"]).is_err());
        let cli = Cli::try_parse_from(["pdfkit", "merge", "a.pdf", "b.pdf"]).unwrap();
        assert!(matches!(cli.command, Command::Merge { ref inputs, .. } if inputs.len() == 2));
    }

    #[test]
    fn test_tool_options_parse() {
        let cli = Cli::try_parse_from([
            "pdfkit", "--json", "compress", "in.pdf", "--level", "high",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Compress { level: CompressionLevel::High, .. }
        ));

        let cli = Cli::try_parse_from(["pdfkit", "rotate", "in.pdf", "--angle", "90", "--pages", "1,3"])
            .unwrap();
        match cli.command {
            Command::Rotate { angle, pages, .. } => {
                assert_eq!(angle, 90);
                assert_eq!(pages, vec![1, 3]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
