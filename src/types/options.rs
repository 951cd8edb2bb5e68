//! Sampling options sent alongside every completion request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 40960;

/// Keys the request body sets itself; extra options may not shadow them.
pub const RESERVED_OPTION_KEYS: &[&str] = &["model", "messages", "temperature", "max_tokens"];

/// Sampling parameters for a request.
///
/// `extra` carries provider-specific options (`top_p`, `stop`, ...). They are
/// merged into the request body as top-level fields and take part in the
/// request fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            extra: BTreeMap::new(),
        }
    }
}

impl SamplingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Extra option keys that collide with fields the client sets itself.
    pub fn reserved_conflicts(&self) -> Vec<&str> {
        self.extra
            .keys()
            .map(String::as_str)
            .filter(|k| RESERVED_OPTION_KEYS.contains(k))
            .collect()
    }

    /// All options as one flat JSON object, as they appear in the request body.
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("temperature".into(), Value::from(self.temperature));
        map.insert("max_tokens".into(), Value::from(self.max_tokens));
        for (k, v) in &self.extra {
            map.insert(k.clone(), v.clone());
        }
        map
    }
}
