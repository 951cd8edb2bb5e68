use crate::cache::{compute_fingerprint, CacheEntry, Fingerprint};
use crate::types::{SamplingOptions, UserPrompt};
use crate::{Error, ErrorContext, Result};
use serde_json::Value;

use super::core::CompletionClient;

/// Everything that defines one `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub system_prompt: String,
    pub user_prompt: UserPrompt,
    pub options: SamplingOptions,
    pub completion_count: usize,
    /// Skip the cache lookup. The result is still written back.
    pub bypass_cache: bool,
}

impl GenerateRequest {
    pub fn new(user_prompt: impl Into<UserPrompt>, system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            options: SamplingOptions::default(),
            completion_count: 1,
            bypass_cache: false,
        }
    }

    pub fn with_options(mut self, options: SamplingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_completion_count(mut self, n: usize) -> Self {
        self.completion_count = n;
        self
    }

    pub fn with_bypass_cache(mut self, bypass: bool) -> Self {
        self.bypass_cache = bypass;
        self
    }

    pub fn fingerprint(&self) -> Fingerprint {
        compute_fingerprint(&self.system_prompt, &self.user_prompt, &self.options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.completion_count == 0 {
            return Err(Error::validation_with_context(
                "completion count must be at least 1",
                ErrorContext::new()
                    .with_field_path("request.completion_count")
                    .with_source("request_validator"),
            ));
        }
        if !self.options.temperature.is_finite() {
            return Err(Error::validation_with_context(
                "temperature must be a finite number",
                ErrorContext::new()
                    .with_field_path("request.options.temperature")
                    .with_details(self.options.temperature.to_string())
                    .with_source("request_validator"),
            ));
        }
        let conflicts = self.options.reserved_conflicts();
        if !conflicts.is_empty() {
            return Err(Error::validation_with_context(
                "extra options shadow fields set by the client",
                ErrorContext::new()
                    .with_field_path("request.options")
                    .with_details(conflicts.join(", "))
                    .with_source("request_validator"),
            ));
        }
        Ok(())
    }
}

/// Fluent builder over [`CompletionClient::generate`].
pub struct CompletionRequest<'a> {
    client: &'a CompletionClient,
    request: GenerateRequest,
}

impl<'a> CompletionRequest<'a> {
    pub(crate) fn new(client: &'a CompletionClient, user_prompt: UserPrompt) -> Self {
        Self {
            client,
            request: GenerateRequest::new(user_prompt, String::new()),
        }
    }

    pub fn system(mut self, system_prompt: impl Into<String>) -> Self {
        self.request.system_prompt = system_prompt.into();
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.request.options.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.request.options.max_tokens = max_tokens;
        self
    }

    /// Set a provider-specific option (e.g. `top_p`, `stop`).
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request.options.extra.insert(key.into(), value.into());
        self
    }

    pub fn completions(mut self, n: usize) -> Self {
        self.request.completion_count = n;
        self
    }

    pub fn bypass_cache(mut self, bypass: bool) -> Self {
        self.request.bypass_cache = bypass;
        self
    }

    pub fn build(self) -> GenerateRequest {
        self.request
    }

    pub async fn execute(self) -> Result<CacheEntry> {
        self.client.generate(&self.request).await
    }
}
