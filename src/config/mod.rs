//! Configuration for the relay server
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/editor-relay/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! The loaded `Config` is immutable and handed to the relay at startup.
//! Handlers never read the process environment themselves.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod serialization;
mod upstream;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use observability::{LogRotation, LoggingConfig};

use observability::FileLogging;
use upstream::{FileUpstream, UpstreamConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the upstream API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_API_URL: &str = "https://api.openai.com/v1/responses";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_ALLOWED_ORIGIN: &str = "https://YOUR-SITE.framer.website";

/// Editor persona sent as the system-role message
pub const DEFAULT_SYSTEM_PROMPT: &str = concat!(
    "You are a senior magazine editor. ",
    "Always start with: This sounds like one for our [section] section. ",
    "Then give a gut take, 3–6 questions, a headline and dek, and a decision (greenlight/revise/pass). ",
    "Use short sentences and plain language. Use metric units."
);

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Address to bind the relay server to
    pub bind_addr: SocketAddr,

    /// Upstream completion endpoint (full URL, not a base)
    pub api_url: String,

    /// Bearer credential for the upstream API. Env only, never persisted.
    pub api_key: Option<String>,

    /// Model identifier sent upstream
    pub model: String,

    /// Origin echoed in Access-Control-Allow-Origin
    pub allowed_origin: String,

    /// Persona instructions sent as the system-role message
    pub system_prompt: String,

    /// Upstream connection and read timeouts
    pub upstream: UpstreamConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            upstream: UpstreamConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// The API key must never end up in logs, so Debug is written by hand.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("allowed_origin", &self.allowed_origin)
            .field("system_prompt", &self.system_prompt)
            .field("upstream", &self.upstream)
            .field("logging", &self.logging)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (everything except the secret)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub bind_addr: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub allowed_origin: Option<String>,
    pub system_prompt: Option<String>,

    /// Optional [upstream] section
    pub upstream: Option<FileUpstream>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/editor-relay/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("editor-relay").join("config.toml"))
    }

    /// Write the default template if no config file exists yet.
    /// Returns the path when a file was created.
    pub fn write_default_config() -> Result<Option<PathBuf>> {
        let path = Self::config_path().context("Could not determine config path")?;

        if path.exists() {
            return Ok(None);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(&path, Self::default().to_toml())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(Some(path))
    }

    /// Load the config file if it exists.
    ///
    /// A missing file means defaults. A file that exists but cannot be read
    /// or parsed is an error: a broken config should fail fast rather than
    /// silently fall back to defaults.
    fn load_file_config() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read config file {}", path.display()))
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Result<Self> {
        let file = Self::load_file_config()?;
        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Merge a parsed config file with environment lookups.
    ///
    /// `env` is injected so precedence can be exercised without touching
    /// the real process environment.
    pub(crate) fn resolve<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // Bind address: env > file > default
        let bind_addr = env("EDITOR_RELAY_BIND")
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind_addr))?;

        // Upstream endpoint: env > file > default
        let api_url = env("EDITOR_RELAY_API_URL")
            .or(file.api_url)
            .unwrap_or(defaults.api_url);

        // Secret: env only. Empty counts as missing.
        let api_key = env(API_KEY_ENV).filter(|key| !key.trim().is_empty());

        let model = env("EDITOR_RELAY_MODEL")
            .or(file.model)
            .unwrap_or(defaults.model);

        let allowed_origin = env("EDITOR_RELAY_ALLOWED_ORIGIN")
            .or(file.allowed_origin)
            .unwrap_or(defaults.allowed_origin);

        // Persona: file > default
        let system_prompt = file.system_prompt.unwrap_or(defaults.system_prompt);

        let mut upstream = UpstreamConfig::from_file(file.upstream);
        if let Some(secs) = env("EDITOR_RELAY_READ_TIMEOUT") {
            upstream.read_timeout_secs = secs
                .parse()
                .with_context(|| format!("Invalid EDITOR_RELAY_READ_TIMEOUT: {}", secs))?;
        }
        upstream
            .validate()
            .context("Invalid upstream timeout settings")?;

        let logging = LoggingConfig::from_file(file.logging);

        Ok(Self {
            bind_addr,
            api_url,
            api_key,
            model,
            allowed_origin,
            system_prompt,
            upstream,
            logging,
        })
    }

    /// Whether the upstream credential is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
