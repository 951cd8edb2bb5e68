//! # Types Module
//!
//! Prompt and message types.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`UserPrompt`] | Caller prompt: plain text or ordered content blocks |
//! | [`ContentBlock`] | One unit of a multi-modal prompt (text, image URL, or passthrough) |
//! | [`SamplingOptions`] | Temperature, token limit and provider-specific extras |
//! | [`Message`] | Chat message in the provider wire format |
//!
//! ## Example
//!
//! ```rust
//! use completion_cache::types::{ContentBlock, Message, UserPrompt};
//!
//! let prompt = UserPrompt::blocks(vec![
//!     ContentBlock::text("What is in this picture?"),
//!     ContentBlock::image_url("https://example.com/cat.png"),
//! ]);
//! let messages = vec![Message::system("You are concise."), Message::user(&prompt)];
//! assert_eq!(messages.len(), 2);
//! ```

pub mod message;
pub mod options;
pub mod prompt;

pub use message::{ContentPart, ImageUrl, Message, MessageContent, MessageRole};
pub use options::SamplingOptions;
pub use prompt::{ContentBlock, RawBlock, UserPrompt};
