use crate::cache::{CacheEntry, CacheStats, CacheStore, Fingerprint};
use crate::config::ClientConfig;
use crate::transport::HttpTransport;
use crate::types::{Message, UserPrompt};
use crate::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::attempt::AttemptOutcome;
use super::request::{CompletionRequest, GenerateRequest};

/// Caching chat completion client.
///
/// Each distinct request is answered from the network once; afterwards the
/// stored batch is returned as-is until the caller asks to bypass the cache.
pub struct CompletionClient {
    config: ClientConfig,
    transport: HttpTransport,
    store: CacheStore,
}

impl CompletionClient {
    /// Validate `config` and build the client. Fails before any request is
    /// made when credentials, model, or base URL are unusable.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        let store = CacheStore::new(config.cache_dir.clone());
        info!(model = %config.model, cache_dir = %config.cache_dir.display(), "completion client ready");
        Ok(Self {
            config,
            transport,
            store,
        })
    }

    /// Build a client from `DEEPSEEK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache_store(&self) -> &CacheStore {
        &self.store
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.store.stats()
    }

    pub fn fingerprint(&self, request: &GenerateRequest) -> Fingerprint {
        request.fingerprint()
    }

    /// Start a fluent request for `user_prompt`.
    pub fn completion(&self, user_prompt: impl Into<UserPrompt>) -> CompletionRequest<'_> {
        CompletionRequest::new(self, user_prompt.into())
    }

    /// Return the batch for `request`, from the cache when possible.
    ///
    /// On a miss (or with `bypass_cache`), issues `completion_count` requests
    /// one after another, substituting error text for any attempt that fails,
    /// then stores the whole batch. Only local problems are returned as
    /// errors: an invalid request, a corrupt cache record, or a failed write.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<CacheEntry> {
        request.validate()?;
        let fingerprint = request.fingerprint();
        debug!(fingerprint = %fingerprint, bypass = request.bypass_cache, "generate");

        if !request.bypass_cache {
            if let Some(entry) = self.store.lookup(&fingerprint)? {
                return Ok(entry);
            }
        }

        let body = self.request_body(request)?;
        let n = request.completion_count;
        let mut completions = Vec::with_capacity(n);
        for attempt in 0..n {
            let outcome = AttemptOutcome::from(self.transport.complete(&body).await);
            if !outcome.is_completed() {
                warn!(attempt = attempt + 1, total = n, error = outcome.text(), "completion attempt failed");
            }
            completions.push(outcome.into_variants());

            if attempt + 1 < n {
                tokio::time::sleep(self.config.request_delay).await;
            }
        }

        let entry = CacheEntry::new(&request.user_prompt, completions);
        self.store.store(&fingerprint, &entry)?;
        Ok(entry)
    }

    fn request_body(&self, request: &GenerateRequest) -> Result<Value> {
        let messages = vec![
            Message::system(request.system_prompt.clone()),
            Message::user(&request.user_prompt),
        ];
        let mut body = request.options.to_json_map();
        body.insert("model".into(), Value::from(self.config.model.clone()));
        body.insert("messages".into(), serde_json::to_value(&messages)?);
        Ok(Value::Object(body))
    }
}
