//! pdfkit - Terminal client for the pdfkit document-processing API
//!
//! # Usage
//!
//! ```bash
//! # Sign in once; the session is kept in the user config directory
//! pdfkit login --email alice@example.com
//!
//! # Compress a PDF and save the result next to it
//! pdfkit compress report.pdf --level high
//!
//! # JSON output for scripting
//! pdfkit --json jobs
//! ```

use clap::Parser;
use colored::*;

use pdfkit_cli::{CLIConfiguration, CLIError, Result};

mod args;
mod commands;
mod connect;

use args::Cli;
use connect::create_session;

fn init_logging(verbose: bool) {
    let mut builder = if verbose {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(log::LevelFilter::Debug);
        builder
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
    };
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = CLIConfiguration::load(&cli.config)?;
    let session = create_session(&cli, &config)?;
    commands::dispatch(&session, cli.command).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        report(&e);
        std::process::exit(e.exit_code());
    }
}

fn report(error: &CLIError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
