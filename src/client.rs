//! Completion orchestration: cache lookup, sequential attempts, write-back.

mod attempt;
mod core;
mod request;

pub use attempt::{AttemptOutcome, ERROR_PREFIX};
pub use self::core::CompletionClient;
pub use request::{CompletionRequest, GenerateRequest};
