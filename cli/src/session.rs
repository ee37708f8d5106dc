//! CLI session state
//!
//! Holds the connected client together with the presentation settings for
//! one invocation (output format, colors, spinners).

use clap::ValueEnum;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use pdfkit_link::PdfLinkClient;
use std::time::Duration;

use crate::formatter::OutputFormatter;

/// Output format for listings and results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// CLI session state
pub struct CLISession {
    /// pdfkit API client
    client: PdfLinkClient,

    /// Output formatter
    formatter: OutputFormatter,

    /// Enable colored output
    color: bool,

    /// Enable spinners/animations
    animations: bool,
}

impl CLISession {
    pub fn new(client: PdfLinkClient, format: OutputFormat, color: bool, animations: bool) -> Self {
        if !color {
            colored::control::set_override(false);
        }
        Self {
            client,
            formatter: OutputFormatter::new(format, color),
            color,
            animations,
        }
    }

    pub fn client(&self) -> &PdfLinkClient {
        &self.client
    }

    pub fn formatter(&self) -> &OutputFormatter {
        &self.formatter
    }

    pub fn is_json(&self) -> bool {
        self.formatter.format() == OutputFormat::Json
    }

    /// Print already formatted output to stdout
    pub fn print(&self, output: &str) {
        println!("{}", output);
    }

    /// Print a confirmation line; suppressed in JSON mode to keep stdout parseable
    pub fn success(&self, message: &str) {
        if self.is_json() {
            return;
        }
        if self.color {
            println!("{} {}", "✓".green(), message);
        } else {
            println!("✓ {}", message);
        }
    }

    /// Create a spinner for long-running operations, or `None` with animations disabled
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.animations {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    }
}
