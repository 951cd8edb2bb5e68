//! # Response Cache
//!
//! Content-addressed persistence of completion batches, so identical requests
//! never pay for the network twice.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Fingerprint`] | Deterministic digest of a request |
//! | [`compute_fingerprint`] | Canonicalizes and hashes a request |
//! | [`CacheStore`] | Directory of one JSON record per fingerprint |
//! | [`CacheEntry`] | The persisted `{prompts, completions}` record |
//! | [`CacheStats`] | Hit, miss, write and corruption counters |
//!
//! ## Example
//!
//! ```rust
//! use completion_cache::cache::{compute_fingerprint, CacheEntry, CacheStore};
//! use completion_cache::types::{SamplingOptions, UserPrompt};
//!
//! # fn main() -> completion_cache::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let store = CacheStore::new(dir.path());
//! let prompt = UserPrompt::from("Summarize: cats are mammals.");
//! let fp = compute_fingerprint("You are concise.", &prompt, &SamplingOptions::default());
//!
//! assert!(store.lookup(&fp)?.is_none());
//! store.store(&fp, &CacheEntry::new(&prompt, vec![vec!["Cats are mammals.".into()]]))?;
//! assert_eq!(store.lookup(&fp)?.map(|e| e.len()), Some(1));
//! # Ok(())
//! # }
//! ```

mod key;
mod store;

pub use key::{compute_fingerprint, Fingerprint};
pub use store::{CacheEntry, CacheStats, CacheStore};
