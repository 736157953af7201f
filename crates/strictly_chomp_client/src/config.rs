//! Client configuration.
//!
//! Settings come from, in order of precedence: command-line flags (and
//! their environment variables), an optional TOML file, and finally
//! interactive prompts for whatever is still missing.

use crate::error::ClientError;
use crate::input::LineInput;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Configuration for one client run.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server host name or address.
    #[serde(default)]
    host: Option<String>,

    /// Server port.
    #[serde(default)]
    port: Option<u16>,

    /// Log filter directive (overridden by `RUST_LOG`).
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Write logs here instead of standard error.
    #[serde(default)]
    log_file: Option<PathBuf>,
}

#[instrument]
fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            log_filter: default_log_filter(),
            log_file: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = ?config.host, port = ?config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Lets explicitly given values win over the file.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        log_file: Option<PathBuf>,
    ) -> Self {
        if host.is_some() {
            self.host = host;
        }
        if port.is_some() {
            self.port = port;
        }
        if log_file.is_some() {
            self.log_file = log_file;
        }
        self
    }

    /// Returns host and port, asking the player for whichever is missing.
    #[instrument(skip(self, input))]
    pub async fn resolve_endpoint(
        &self,
        input: &mut (impl LineInput + ?Sized),
    ) -> Result<(String, u16), ClientError> {
        let host = match &self.host {
            Some(host) => host.clone(),
            None => loop {
                let line = input
                    .prompt("enter host: ")
                    .await?
                    .ok_or_else(|| ConfigError::new("No host given".to_string()))?;
                let line = line.trim();
                if !line.is_empty() {
                    break line.to_string();
                }
            },
        };

        let port = match self.port {
            Some(port) => port,
            None => {
                let mut prompt = "enter port: ";
                loop {
                    let line = input
                        .prompt(prompt)
                        .await?
                        .ok_or_else(|| ConfigError::new("No port given".to_string()))?;
                    match line.trim().parse::<u16>() {
                        Ok(port) => break port,
                        Err(e) => {
                            warn!(input = %line, error = %e, "Rejected port");
                            prompt = "port must be a number from 0 to 65535, enter port: ";
                        }
                    }
                }
            }
        };

        Ok((host, port))
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
