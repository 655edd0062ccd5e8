//! Configuration management for the vault server
//!
//! All values are loaded once at startup: defaults first, then an optional
//! `config.toml`, then `TEXTVAULT_*` environment overrides. The GitHub token
//! is deliberately optional; without it the file listing degrades to empty
//! instead of failing the admin page.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration loaded during server initialization
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    /// Secret path segment exposing the admin editor page
    pub admin_path: String,

    /// GitHub repository coordinates backing the file store
    pub github_owner: String,
    pub github_repo: String,
    pub github_branch: String,

    /// Access token for the contents API; `None` degrades the file listing
    /// Environment: TEXTVAULT_GITHUB_TOKEN
    pub github_token: Option<String>,

    /// Base URLs for the contents API and the raw mirror (overridable in tests)
    pub github_api_base: String,
    pub github_raw_base: String,

    /// Directory holding the key-value state files
    pub state_dir: String,

    /// Timeout applied to every outbound remote call
    pub request_timeout_secs: u64,

    /// Upper bound on concurrent per-file commit-date lookups
    pub list_fanout: usize,
}

impl StartupConfig {
    /// Load configuration from defaults, optional config.toml, and environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", "127.0.0.1")?
            .set_default("port", 8080_i64)?
            .set_default("admin_path", "admin")?
            .set_default("github_owner", "")?
            .set_default("github_repo", "")?
            .set_default("github_branch", "main")?
            .set_default("github_api_base", "https://api.github.com")?
            .set_default("github_raw_base", "https://raw.githubusercontent.com")?
            .set_default("state_dir", "./vault_state")?
            .set_default("request_timeout_secs", 10_i64)?
            .set_default("list_fanout", 4_i64)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("TEXTVAULT"))
            .build()?;

        let config: StartupConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("Port cannot be 0".into()));
        }

        if self.admin_path.is_empty() || self.admin_path.contains('/') {
            return Err(config::ConfigError::Message(
                "admin_path must be a single non-empty path segment".into(),
            ));
        }

        if self.github_owner.is_empty() || self.github_repo.is_empty() {
            return Err(config::ConfigError::Message(
                "github_owner and github_repo must be configured".into(),
            ));
        }

        if self.github_branch.is_empty() {
            return Err(config::ConfigError::Message(
                "github_branch cannot be empty".into(),
            ));
        }

        if self.state_dir.is_empty() {
            return Err(config::ConfigError::Message(
                "state_dir cannot be empty".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.list_fanout == 0 {
            return Err(config::ConfigError::Message(
                "list_fanout must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as a socket address string
    pub fn bind_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get the state directory as a PathBuf
    pub fn state_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.state_dir)
    }

    /// Get the outbound request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full admin page path, with leading slash
    pub fn admin_route(&self) -> String {
        format!("/{}", self.admin_path)
    }
}
