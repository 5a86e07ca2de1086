//! Upstream completion API client
//!
//! Builds the streaming request (persona + user message) and opens the
//! connection. The response body is handed back untouched; the relay treats
//! it as an opaque stream of text.

use serde::Serialize;

use super::error::RelayError;
use super::state::RelayState;

/// Request body for the streaming completion endpoint
#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub stream: bool,
    /// Always system first, then user
    pub input: [InputMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
pub(crate) struct InputMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(model: &'a str, system_prompt: &'a str, user_message: &'a str) -> Self {
        Self {
            model,
            stream: true,
            input: [
                InputMessage {
                    role: "system",
                    content: system_prompt,
                },
                InputMessage {
                    role: "user",
                    content: user_message,
                },
            ],
        }
    }
}

/// Send the request and return the streaming response.
///
/// Single attempt, no retry. A transport error, a header timeout or a
/// non-success status all count as the upstream failing to establish.
pub(crate) async fn open_stream(
    state: &RelayState,
    api_key: &str,
    body: &CompletionRequest<'_>,
) -> Result<reqwest::Response, RelayError> {
    let config = &state.config;

    let send = state
        .client
        .post(&config.api_url)
        .bearer_auth(api_key)
        .json(body)
        .send();

    let response = tokio::time::timeout(config.upstream.connect_timeout(), send)
        .await
        .map_err(|_| RelayError::Timeout)?
        .map_err(|e| RelayError::Upstream(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "Upstream returned non-success status");
        return Err(RelayError::Upstream(format!("status {}", status)));
    }

    tracing::debug!(status = status.as_u16(), "Upstream stream opened");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = CompletionRequest::new("gpt-4.1-mini", "Be an editor.", "Pitch: bikes");
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value,
            json!({
                "model": "gpt-4.1-mini",
                "stream": true,
                "input": [
                    {"role": "system", "content": "Be an editor."},
                    {"role": "user", "content": "Pitch: bikes"}
                ]
            })
        );
    }
}
