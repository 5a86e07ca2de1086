// SSE (Server-Sent Events) framing module
//
// The upstream completion API streams text that is already SSE-shaped
// (`event: ...` / `data: {...}` lines). The relay does not interpret it.
// Each non-blank upstream line is re-emitted to the browser as its own
// `data:` frame, with any `data:` prefix the line already carries removed
// first so frames are never double-prefixed.
//
// Frame shapes written to the client:
// ```
// data: <upstream line>\n\n
// data: {"error":"<message>"}\n\n
// data: [DONE]\n\n
// ```

mod decoder;

pub use decoder::LineDecoder;

use serde_json::json;

/// Terminal frame written after a successful relay
pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// Wrap a payload as a `data:` frame
pub fn data_frame(payload: &str) -> String {
    format!("data: {}\n\n", payload)
}

/// Build the `{"error": ...}` frame
pub fn error_frame(message: &str) -> String {
    data_frame(&json!({ "error": message }).to_string())
}

/// Strip one leading `data:` prefix and the whitespace after it.
///
/// Lines without the prefix (e.g. `event:` lines) pass through unchanged.
/// Applying it to an already normalized payload is a no-op unless the
/// payload itself starts with `data:`.
pub fn normalize_line(line: &str) -> &str {
    match line.strip_prefix("data:") {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}
