//! # completion-cache
//!
//! Content-addressed caching client for OpenAI-compatible chat completion
//! APIs (DeepSeek by default).
//!
//! ## Overview
//!
//! Every request is reduced to a [`Fingerprint`]: a SHA-256 digest of the
//! system prompt, the user prompt and all sampling options, canonicalized with
//! sorted keys. The first time a fingerprint is seen, the client issues the
//! requested number of completions one after another and writes the whole
//! batch to disk; later identical requests are served from that record with no
//! network traffic.
//!
//! - **Deterministic keys**: option insertion order never changes the fingerprint
//! - **Whole-record writes**: entries appear atomically, never half-written
//! - **Batch availability**: a failed attempt yields error text in its slot
//!   instead of failing the batch
//! - **Multi-modal prompts**: text plus image URLs via [`ContentBlock`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use completion_cache::{ClientConfig, CompletionClient};
//!
//! #[tokio::main]
//! async fn main() -> completion_cache::Result<()> {
//!     let client = CompletionClient::new(
//!         ClientConfig::new("your-api-key").with_cache_dir(".cache/deepseek"),
//!     )?;
//!
//!     let (prompts, completions) = client
//!         .completion("Summarize: cats are mammals.")
//!         .system("You are concise.")
//!         .temperature(0.0)
//!         .completions(2)
//!         .execute()
//!         .await?
//!         .into_parts();
//!
//!     assert_eq!(prompts.len(), completions.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Fingerprinting and the on-disk record store |
//! | [`client`] | The caching completion client |
//! | [`config`] | Client configuration and environment loading |
//! | [`transport`] | HTTP calls to the completions endpoint |
//! | [`types`] | Prompt, content block and wire message types |

pub mod cache;
pub mod client;
pub mod config;
pub mod transport;
pub mod types;

pub use cache::{CacheEntry, CacheStats, CacheStore, Fingerprint};
pub use client::{AttemptOutcome, CompletionClient, CompletionRequest, GenerateRequest};
pub use config::ClientConfig;
pub use types::{ContentBlock, SamplingOptions, UserPrompt};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
