//! Relay state shared by all handler invocations

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

use crate::config::Config;

/// Shared, read-only state for the relay server
#[derive(Clone)]
pub struct RelayState {
    /// HTTP client for the upstream completion API
    pub(crate) client: reqwest::Client,
    /// Configuration injected at startup
    pub(crate) config: Arc<Config>,
    /// Allowed origin, validated once as a header value
    pub(crate) cors_origin: HeaderValue,
}

impl RelayState {
    pub fn new(config: Config) -> Result<Self> {
        // Build the HTTP client with connect timeout and connection pooling.
        // No overall request timeout: streams may legitimately run long, the
        // per-chunk read timeout bounds silence instead.
        let client = reqwest::Client::builder()
            .connect_timeout(config.upstream.connect_timeout())
            .pool_max_idle_per_host(10)
            .build()
            .context("Failed to create HTTP client")?;

        let cors_origin = HeaderValue::from_str(&config.allowed_origin).with_context(|| {
            format!(
                "Allowed origin is not a valid header value: {}",
                config.allowed_origin
            )
        })?;

        Ok(Self {
            client,
            config: Arc::new(config),
            cors_origin,
        })
    }
}
