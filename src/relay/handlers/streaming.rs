//! Relay task: validate, open upstream, forward lines as SSE frames
//!
//! The task owns an `SseWriter`, the only handle that can write to the
//! client. Closing consumes the writer, so the stream ends exactly once on
//! every path.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::config::Config;
use crate::events::RelayOutcome;
use crate::relay::error::RelayError;
use crate::relay::sse::{self, LineDecoder, DONE_FRAME};
use crate::relay::state::RelayState;
use crate::relay::upstream::{self, CompletionRequest};

type Frame = Result<Bytes, std::io::Error>;

/// Write half of the SSE response body
pub(crate) struct SseWriter {
    tx: mpsc::Sender<Frame>,
    frames: usize,
}

impl SseWriter {
    /// Create a writer and the stream that becomes the response body
    pub fn channel(buffer: usize) -> (Self, ReceiverStream<Frame>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx, frames: 0 }, ReceiverStream::new(rx))
    }

    /// Queue one frame; fails once the client has gone away
    pub async fn send(&mut self, frame: String) -> Result<(), RelayError> {
        self.tx
            .send(Ok(Bytes::from(frame)))
            .await
            .map_err(|_| RelayError::ClientGone)?;
        self.frames += 1;
        Ok(())
    }

    /// Run `fut` unless the client disconnects first
    pub async fn until_client_gone<F: Future>(&self, fut: F) -> Result<F::Output, RelayError> {
        tokio::select! {
            out = fut => Ok(out),
            _ = self.tx.closed() => Err(RelayError::ClientGone),
        }
    }

    /// End the response stream, returning the number of frames written
    pub fn close(self) -> usize {
        self.frames
    }
}

/// Drive one relayed request to completion.
///
/// Any error (or panic) from the relay steps becomes at most one error
/// frame. Writing that frame is best effort: if the client is already
/// gone the failure is swallowed.
pub(crate) async fn run_relay(
    state: RelayState,
    message: Result<Option<String>, RelayError>,
    mut writer: SseWriter,
) {
    let start = Instant::now();

    let result = AssertUnwindSafe(relay(&state, message, &mut writer))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            tracing::error!("Relay task panicked");
            Err(RelayError::Stream(String::new()))
        });

    let outcome = match result {
        Ok(()) => match writer.send(DONE_FRAME.to_string()).await {
            Ok(()) => RelayOutcome::Done,
            Err(_) => RelayOutcome::ClientGone,
        },
        Err(err) => {
            match err.outcome() {
                RelayOutcome::Failed => tracing::warn!("Relay failed: {}", err),
                _ => tracing::debug!("Relay stopped: {}", err),
            }
            if let Some(message) = err.client_message() {
                let _ = writer.send(sse::error_frame(&message)).await;
            }
            err.outcome()
        }
    };

    let frames = writer.close();
    tracing::info!(
        outcome = outcome.as_str(),
        frames,
        duration_ms = start.elapsed().as_millis() as u64,
        "Relay finished"
    );
}

/// Validate, open the upstream stream and forward it
async fn relay(
    state: &RelayState,
    message: Result<Option<String>, RelayError>,
    writer: &mut SseWriter,
) -> Result<(), RelayError> {
    let (api_key, user_message) = validate(&state.config, message)?;

    let body = CompletionRequest::new(
        &state.config.model,
        &state.config.system_prompt,
        &user_message,
    );
    let response = writer
        .until_client_gone(upstream::open_stream(state, api_key, &body))
        .await??;

    forward(response, writer, state.config.upstream.read_timeout()).await
}

/// Precondition checks, in order: credential, then message.
///
/// `message` is already an error when the request body could not be read.
pub(crate) fn validate(
    config: &Config,
    message: Result<Option<String>, RelayError>,
) -> Result<(&str, String), RelayError> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or(RelayError::MissingCredential)?;

    let user_message = message?.unwrap_or_default().trim().to_string();
    if user_message.is_empty() {
        return Err(RelayError::EmptyMessage);
    }

    Ok((api_key, user_message))
}

/// Read loop: each upstream line becomes one `data:` frame, in order
async fn forward(
    response: reqwest::Response,
    writer: &mut SseWriter,
    read_timeout: Duration,
) -> Result<(), RelayError> {
    let mut stream = response.bytes_stream();
    let mut decoder = LineDecoder::new();

    loop {
        let next = writer
            .until_client_gone(tokio::time::timeout(read_timeout, stream.next()))
            .await?
            .map_err(|_| RelayError::Timeout)?;

        let chunk = match next {
            Some(chunk) => chunk.map_err(|e| RelayError::Stream(e.to_string()))?,
            None => break,
        };

        for line in decoder.push(&chunk) {
            writer.send(sse::data_frame(sse::normalize_line(&line))).await?;
        }
    }

    for line in decoder.finish() {
        writer.send(sse::data_frame(sse::normalize_line(&line))).await?;
    }

    Ok(())
}
