//! HTTP transport for the chat completions endpoint.

mod http;

pub use http::{extract_first_choice, HttpTransport, TransportError};
