//! Configuration file management
//!
//! `CLIConfiguration` is read from `~/.pdfkit/config.toml`; every key is
//! optional and falls back to the library defaults.
//!
//! # Configuration Format
//!
//! ```toml
//! [server]
//! url = "http://localhost:8080"  # pdfkit API base URL
//! timeout = 60                   # request timeout in seconds
//! upload_timeout = 300           # upload timeout in seconds
//! http_version = "http1"         # HTTP version: "http1", "http2", "auto"
//!
//! [polling]
//! interval_secs = 5              # delay between job status checks
//! max_attempts = 60              # status checks before a job times out
//! ```

use pdfkit_link::{HttpVersion, PdfLinkTimeouts};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CLIError, Result};

/// Base URL used when neither flag, environment nor config file set one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// CLI configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CLIConfiguration {
    /// Server connection settings
    pub server: Option<ServerConfig>,

    /// Job polling cadence
    pub polling: Option<PollingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server URL (e.g., http://localhost:8080)
    pub url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Upload timeout in seconds
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout: u64,

    /// HTTP version preference: "http1", "http2", "auto" (default: "http1")
    #[serde(default = "default_http_version")]
    pub http_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_timeout() -> u64 {
    60
}

fn default_upload_timeout() -> u64 {
    300
}

fn default_http_version() -> String {
    "http1".to_string()
}

fn default_interval_secs() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    60
}

pub fn expand_config_path(path: &Path) -> PathBuf {
    let path_str = path.to_str().unwrap_or("~/.pdfkit/config.toml");
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    path.to_path_buf()
}

pub fn default_config_path() -> PathBuf {
    expand_config_path(Path::new("~/.pdfkit/config.toml"))
}

impl CLIConfiguration {
    /// Load configuration from file
    ///
    /// Returns default configuration if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if !path.exists() {
            log::debug!("[CONFIG] No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            CLIError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        let config: CLIConfiguration = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CLIError::ConfigurationError(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn resolved_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or(ServerConfig {
            url: None,
            timeout: default_timeout(),
            upload_timeout: default_upload_timeout(),
            http_version: default_http_version(),
        })
    }

    pub fn resolved_polling(&self) -> PollingConfig {
        self.polling.clone().unwrap_or(PollingConfig {
            interval_secs: default_interval_secs(),
            max_attempts: default_max_attempts(),
        })
    }

    /// Server URL with precedence: explicit value (flag or env), config file, default.
    pub fn server_url(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.server.as_ref().and_then(|s| s.url.clone()))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Timeouts and polling cadence for the client library.
    pub fn to_timeouts(&self) -> PdfLinkTimeouts {
        let server = self.resolved_server();
        let polling = self.resolved_polling();
        PdfLinkTimeouts::builder()
            .request_timeout_secs(server.timeout)
            .upload_timeout_secs(server.upload_timeout)
            .poll_interval_secs(polling.interval_secs)
            .max_poll_attempts(polling.max_attempts)
            .build()
    }

    /// Get the HTTP version setting from config
    pub fn http_version(&self) -> HttpVersion {
        self.server
            .as_ref()
            .map(|s| HttpVersion::parse_lenient(&s.http_version))
            .unwrap_or_default()
    }
}
