//! Request fingerprinting.

use crate::types::{SamplingOptions, UserPrompt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Hex SHA-256 digest identifying a (system prompt, user prompt, options) triple.
///
/// Identity only: good enough to keep distinct prompts apart, not meant to
/// resist deliberately constructed collisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the fingerprint of a request.
///
/// The canonical form is a JSON object holding `system_prompt`, `user_prompt`
/// and every sampling option at top level, serialized with object keys sorted
/// at every depth. Option insertion order therefore never matters. The
/// cache-bypass flag and the completion count are not inputs.
pub fn compute_fingerprint(
    system_prompt: &str,
    user_prompt: &UserPrompt,
    options: &SamplingOptions,
) -> Fingerprint {
    let mut record = options.to_json_map();
    record.insert("system_prompt".into(), Value::from(system_prompt));
    // UserPrompt holds only strings and JSON values, serialization cannot fail.
    record.insert(
        "user_prompt".into(),
        serde_json::to_value(user_prompt).unwrap_or(Value::Null),
    );

    let mut canonical = String::new();
    write_canonical(&Value::Object(record), &mut canonical);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let hash: String = hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    Fingerprint(hash)
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_object(map: &Map<String, Value>, out: &mut String) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    out.push('{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_canonical(&map[key], out);
    }
    out.push('}');
}
