//! Client configuration.
//!
//! [`ClientConfig`] is plain data: the client and the cache store never read
//! the environment themselves. [`ClientConfig::from_env`] is the one place
//! that does, for applications that configure through environment variables.

use crate::{Error, ErrorContext, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_CACHE_DIR: &str = ".cache/deepseek";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub cache_dir: PathBuf,
    /// Pause between consecutive attempts of one batch.
    pub request_delay: Duration,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from the environment.
    ///
    /// - `DEEPSEEK_API_KEY` (required)
    /// - `DEEPSEEK_API_BASE` (default `https://api.deepseek.com`)
    /// - `DEEPSEEK_MODEL` (default `deepseek-chat`)
    /// - `DEEPSEEK_CACHE_DIR` (default `.cache/deepseek`)
    /// - `DEEPSEEK_REQUEST_DELAY_MS` (default 500)
    /// - `DEEPSEEK_HTTP_TIMEOUT_SECS` (default 300)
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("DEEPSEEK_API_KEY").map_err(|_| {
            Error::configuration_with_context(
                "DEEPSEEK_API_KEY is not set",
                ErrorContext::new()
                    .with_field_path("DEEPSEEK_API_KEY")
                    .with_source("client_config"),
            )
        })?;

        let mut config = Self::new(api_key);
        if let Ok(base) = env::var("DEEPSEEK_API_BASE") {
            config.api_base = base;
        }
        if let Ok(model) = env::var("DEEPSEEK_MODEL") {
            config.model = model;
        }
        if let Ok(dir) = env::var("DEEPSEEK_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(ms) = env::var("DEEPSEEK_REQUEST_DELAY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.request_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = env::var("DEEPSEEK_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
        {
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that could never produce a request.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(missing("API key is empty", "config.api_key"));
        }
        if self.model.trim().is_empty() {
            return Err(missing("model identifier is empty", "config.model"));
        }
        let base = Url::parse(&self.api_base).map_err(|e| {
            Error::configuration_with_context(
                "API base URL is invalid",
                ErrorContext::new()
                    .with_field_path("config.api_base")
                    .with_details(format!("{}: {}", self.api_base, e))
                    .with_source("client_config"),
            )
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                "API base URL must use http or https",
                ErrorContext::new()
                    .with_field_path("config.api_base")
                    .with_details(self.api_base.clone())
                    .with_source("client_config"),
            ));
        }
        Ok(())
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

fn missing(message: &str, field: &str) -> Error {
    Error::configuration_with_context(
        message,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("client_config"),
    )
}
