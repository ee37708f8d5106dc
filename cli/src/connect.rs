use crate::args::Cli;
use colored::*;
use pdfkit_cli::{CLIConfiguration, CLISession, FileSessionStorage, OutputFormat, Result};
use pdfkit_link::{
    AuthStore, PdfLinkClient, PdfLinkTimeouts, SessionEvents, SessionExpiredReason,
};

/// Pick timeouts: preset flags win over the config file
fn build_timeouts(cli: &Cli, config: &CLIConfiguration) -> PdfLinkTimeouts {
    if cli.fast_timeouts {
        return PdfLinkTimeouts::fast();
    }
    if cli.relaxed_timeouts {
        return PdfLinkTimeouts::relaxed();
    }
    config.to_timeouts()
}

fn session_events(color: bool) -> SessionEvents {
    SessionEvents::new().on_session_expired(move |reason| {
        let detail = match reason {
            SessionExpiredReason::NoRefreshToken => "no refresh token stored".to_string(),
            SessionExpiredReason::RefreshFailed(msg) => msg,
        };
        let hint = "Session expired, run `pdfkit login` to sign in again";
        if color {
            eprintln!("{} ({})", hint.yellow(), detail);
        } else {
            eprintln!("{} ({})", hint, detail);
        }
    })
}

pub fn create_session(cli: &Cli, config: &CLIConfiguration) -> Result<CLISession> {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        cli.format
    };
    let color = !cli.no_color;

    let storage = match cli.session_file.clone() {
        Some(path) => FileSessionStorage::with_path(path),
        None => FileSessionStorage::new(),
    };
    log::debug!(
        "[CLIENT] pdfkit-link {}, session file {}",
        pdfkit_link::VERSION,
        storage.path().display()
    );

    let auth_store = AuthStore::new(storage);
    if auth_store.load_stored_auth() {
        log::debug!("[CLIENT] Restored stored session");
    }

    let client = PdfLinkClient::builder()
        .base_url(config.server_url(cli.url.as_deref()))
        .timeouts(build_timeouts(cli, config))
        .http_version(config.http_version())
        .auth_store(auth_store)
        .event_handlers(session_events(color))
        .build()?;

    Ok(CLISession::new(client, format, color, !cli.no_spinner))
}
