//! Relay error types
//!
//! Every failure on the SSE path ends the same way: at most one error frame,
//! then the stream closes. The variant decides what the client is told.

use crate::events::RelayOutcome;

/// Generic message when a failure carries no text of its own
const FALLBACK_MESSAGE: &str = "Server error";

/// Errors that terminate a relayed request
#[derive(Debug)]
pub(crate) enum RelayError {
    /// No upstream credential configured
    MissingCredential,
    /// The user message was absent or blank after trimming
    EmptyMessage,
    /// The request body exceeded the configured size limit
    BodyTooLarge,
    /// The upstream call failed to establish (transport error or non-success status)
    Upstream(String),
    /// The upstream went silent longer than the configured timeout
    Timeout,
    /// Failure while reading or forwarding the upstream stream
    Stream(String),
    /// The client disconnected; nothing more can be written
    ClientGone,
}

impl RelayError {
    /// Text for the `{"error": ...}` frame, or None when no frame can be sent
    pub fn client_message(&self) -> Option<String> {
        let message = match self {
            RelayError::MissingCredential => format!("Missing {}", crate::config::API_KEY_ENV),
            RelayError::EmptyMessage => "Empty message".to_string(),
            RelayError::BodyTooLarge => "Message too large".to_string(),
            RelayError::Upstream(_) => "Upstream error".to_string(),
            RelayError::Timeout => "Upstream timeout".to_string(),
            RelayError::Stream(msg) if msg.trim().is_empty() => FALLBACK_MESSAGE.to_string(),
            RelayError::Stream(msg) => msg.clone(),
            RelayError::ClientGone => return None,
        };
        Some(message)
    }

    pub fn outcome(&self) -> RelayOutcome {
        match self {
            RelayError::MissingCredential
            | RelayError::EmptyMessage
            | RelayError::BodyTooLarge => RelayOutcome::Rejected,
            RelayError::Upstream(_) | RelayError::Timeout | RelayError::Stream(_) => {
                RelayOutcome::Failed
            }
            RelayError::ClientGone => RelayOutcome::ClientGone,
        }
    }
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::MissingCredential => write!(f, "upstream credential not configured"),
            RelayError::EmptyMessage => write!(f, "empty user message"),
            RelayError::BodyTooLarge => write!(f, "request body over size limit"),
            RelayError::Upstream(detail) => write!(f, "upstream error: {}", detail),
            RelayError::Timeout => write!(f, "upstream timed out"),
            RelayError::Stream(detail) => write!(f, "stream error: {}", detail),
            RelayError::ClientGone => write!(f, "client disconnected"),
        }
    }
}

impl std::error::Error for RelayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_messages() {
        assert_eq!(
            RelayError::MissingCredential.client_message().as_deref(),
            Some("Missing OPENAI_API_KEY")
        );
        assert_eq!(
            RelayError::EmptyMessage.client_message().as_deref(),
            Some("Empty message")
        );
        // Upstream detail stays in the logs, not in the frame
        assert_eq!(
            RelayError::Upstream("status 500".into())
                .client_message()
                .as_deref(),
            Some("Upstream error")
        );
        assert_eq!(
            RelayError::BodyTooLarge.client_message().as_deref(),
            Some("Message too large")
        );
        assert_eq!(RelayError::ClientGone.client_message(), None);
    }

    #[test]
    fn test_stream_error_falls_back_when_blank() {
        assert_eq!(
            RelayError::Stream(String::new()).client_message().as_deref(),
            Some("Server error")
        );
        assert_eq!(
            RelayError::Stream("connection reset".into())
                .client_message()
                .as_deref(),
            Some("connection reset")
        );
    }
}
