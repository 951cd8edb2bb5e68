//! Wire-level chat messages in the OpenAI-compatible format.

use super::prompt::{ContentBlock, UserPrompt};
use serde::Serialize;
use tracing::debug;

/// Chat message as sent to the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Translate a caller prompt into a user message.
    ///
    /// Blocks of an unrecognized kind are dropped from the payload.
    pub fn user(prompt: &UserPrompt) -> Self {
        let content = match prompt {
            UserPrompt::Text(text) => MessageContent::Text(text.clone()),
            UserPrompt::Blocks(blocks) => MessageContent::Parts(
                blocks
                    .iter()
                    .filter_map(|block| match block {
                        ContentBlock::Text { text } => Some(ContentPart::Text { text: text.clone() }),
                        ContentBlock::ImageUrl { url } => Some(ContentPart::ImageUrl {
                            image_url: ImageUrl { url: url.clone() },
                        }),
                        ContentBlock::Other(_) => {
                            debug!(kind = block.kind(), "dropping unsupported content block");
                            None
                        }
                    })
                    .collect(),
            ),
        };
        Self {
            role: MessageRole::User,
            content,
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// Message content (can be string or array of content parts)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}
