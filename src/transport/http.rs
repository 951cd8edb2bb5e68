use crate::config::ClientConfig;
use crate::Result;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

/// Thin wrapper over `reqwest` for the chat completions endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            url: config.completions_url(),
            api_key: config.api_key.clone(),
        })
    }

    /// POST one chat completion request and return the first choice's text.
    ///
    /// Single attempt, no retries.
    pub async fn complete(&self, body: &Value) -> std::result::Result<String, TransportError> {
        let request_id = Uuid::new_v4().to_string();
        debug!(url = %self.url, request_id = %request_id, "sending chat completion request");

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("x-request-id", &request_id)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = resp.json().await?;
        extract_first_choice(&json)
    }
}

/// Pull `choices[0].message.content` out of a completion response.
pub fn extract_first_choice(json: &Value) -> std::result::Result<String, TransportError> {
    let choices = json
        .get("choices")
        .and_then(Value::as_array)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            TransportError::InvalidResponse(format!("no completion found in response: {}", json))
        })?;

    choices[0]
        .pointer("/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            TransportError::InvalidResponse("first choice has no message content".to_string())
        })
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transport error: {0}")]
    Other(String),
}
