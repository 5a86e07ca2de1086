//! HTTP entry point: CORS, method gate, SSE response setup

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, HeaderValue, Method, Response, StatusCode},
};
use serde_json::Value;
use tracing::Instrument;

use crate::events::generate_id;
use crate::relay::error::RelayError;
use crate::relay::state::RelayState;

use super::streaming::{run_relay, SseWriter};

/// Frames buffered between the relay task and the client connection
const FRAME_BUFFER: usize = 64;

/// Relay handler, mounted on every path
///
/// Four terminal outcomes: preflight OK, method rejected, and an SSE stream
/// that ends either in `[DONE]` or in a single error frame.
///
/// The body rejection is taken as a value so an oversized POST still gets
/// CORS headers and an SSE error frame instead of axum's plain-text 413.
pub async fn relay_handler(
    State(state): State<RelayState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response<Body> {
    if method == Method::OPTIONS {
        tracing::debug!("CORS preflight");
        return empty_response(&state, StatusCode::OK);
    }

    if method != Method::POST {
        tracing::debug!(%method, "Rejecting method");
        return empty_response(&state, StatusCode::METHOD_NOT_ALLOWED);
    }

    let request_id = generate_id();
    let message = match body {
        Ok(body) => Ok(extract_message(&body)),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(request_id = %request_id, "Request body over size limit");
            Err(RelayError::BodyTooLarge)
        }
        Err(rejection) => {
            tracing::warn!(request_id = %request_id, "Unreadable request body: {}", rejection);
            Ok(None)
        }
    };

    let (writer, frames) = SseWriter::channel(FRAME_BUFFER);
    let span = tracing::info_span!("relay", request_id = %request_id);
    tokio::spawn(run_relay(state.clone(), message, writer).instrument(span));

    // Headers are committed as soon as this returns, before the upstream
    // has produced anything.
    let mut response = Response::new(Body::from_stream(frames));
    apply_cors(response.headers_mut(), &state);
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    response
}

/// Set the three CORS headers carried by every response
fn apply_cors(headers: &mut HeaderMap, state: &RelayState) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        state.cors_origin.clone(),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

fn empty_response(state: &RelayState, status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    apply_cors(response.headers_mut(), state);
    response
}

/// Pull `message` out of a JSON body, coerced to text.
///
/// Anything unparsable or missing is treated as no message; the caller
/// reports it as an empty message. Trimming happens during validation.
pub(super) fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    match value.get("message")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
