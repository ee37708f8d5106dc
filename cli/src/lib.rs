//! Library entry point for pdfkit-cli components.
//!
//! Exposes the reusable modules (configuration, session storage, formatter,
//! session) so tests can exercise them without going through the binary.

pub mod config;
pub mod credentials;
pub mod error;
pub mod formatter;
pub mod session;

pub use config::CLIConfiguration;
pub use credentials::FileSessionStorage;
pub use error::{CLIError, Result};
pub use formatter::OutputFormatter;
pub use session::{CLISession, OutputFormat};
