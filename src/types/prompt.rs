//! Caller-facing prompt model: plain text or an ordered list of content blocks.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// The user side of a request.
///
/// Serializes untagged: a JSON string for text prompts, a JSON array of block
/// objects for multi-modal prompts. This is also the shape echoed back in
/// [`CacheEntry::prompts`](crate::cache::CacheEntry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserPrompt {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl UserPrompt {
    pub fn text(text: impl Into<String>) -> Self {
        UserPrompt::Text(text.into())
    }

    pub fn blocks(blocks: Vec<ContentBlock>) -> Self {
        UserPrompt::Blocks(blocks)
    }
}

impl From<&str> for UserPrompt {
    fn from(s: &str) -> Self {
        UserPrompt::Text(s.to_string())
    }
}

impl From<String> for UserPrompt {
    fn from(s: String) -> Self {
        UserPrompt::Text(s)
    }
}

impl From<Vec<ContentBlock>> for UserPrompt {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        UserPrompt::Blocks(blocks)
    }
}

/// One unit of a multi-modal prompt.
///
/// Known kinds are `text` and `image_url`. Any other object with a `"type"`
/// field is kept verbatim as [`ContentBlock::Other`] so that echoes and
/// fingerprints stay faithful to what the caller sent; such blocks are left
/// out of the provider payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum ContentBlock {
    Text { text: String },
    ImageUrl { url: String },
    Other(RawBlock),
}

/// Verbatim JSON of a block whose kind this crate does not send.
///
/// Only built through [`ContentBlock::other`] or deserialization, so the
/// payload is always an object with a string `"type"` other than `text` or
/// `image_url`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock(Value);

impl RawBlock {
    pub fn kind(&self) -> &str {
        self.0.get("type").and_then(Value::as_str).unwrap_or("")
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentBlock::ImageUrl { url: url.into() }
    }

    /// Read an image from disk and inline it as a base64 `data:` URL.
    pub fn image_from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let media_type = guess_media_type(path).unwrap_or("application/octet-stream");
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(Self::image_url(format!("data:{};base64,{}", media_type, data)))
    }

    /// Wrap a block of a kind without a dedicated variant.
    ///
    /// Fails for non-objects, objects without a string `"type"`, and for the
    /// `text` and `image_url` kinds, which have their own constructors.
    pub fn other(value: Value) -> Result<Self, String> {
        match ContentBlock::try_from(value)? {
            other @ ContentBlock::Other(_) => Ok(other),
            known => Err(format!(
                "\"{}\" blocks must be built with ContentBlock::{}",
                known.kind(),
                known.kind()
            )),
        }
    }

    /// The block's `"type"` tag.
    pub fn kind(&self) -> &str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::ImageUrl { .. } => "image_url",
            ContentBlock::Other(raw) => raw.kind(),
        }
    }
}

impl TryFrom<Value> for ContentBlock {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| "content block must be an object with a string \"type\"".to_string())?;

        match kind.as_str() {
            "text" => value
                .get("text")
                .and_then(Value::as_str)
                .map(ContentBlock::text)
                .ok_or_else(|| "text block is missing a string \"text\" field".to_string()),
            "image_url" => {
                // Accept both the flat form and the OpenAI nested form.
                let url = match value.get("image_url") {
                    Some(Value::String(url)) => Some(url.clone()),
                    Some(Value::Object(obj)) => {
                        obj.get("url").and_then(Value::as_str).map(str::to_string)
                    }
                    _ => None,
                };
                url.map(ContentBlock::image_url)
                    .ok_or_else(|| "image_url block is missing its url".to_string())
            }
            _ => Ok(ContentBlock::Other(RawBlock(value))),
        }
    }
}

impl From<ContentBlock> for Value {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Text { text } => json!({ "type": "text", "text": text }),
            ContentBlock::ImageUrl { url } => json!({ "type": "image_url", "image_url": url }),
            ContentBlock::Other(raw) => raw.0,
        }
    }
}

fn guess_media_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    let mt = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => return None,
    };
    Some(mt)
}
