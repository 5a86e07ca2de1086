// Relay lifecycle events
//
// Request ids and the terminal outcome of each relayed request. Both end up
// as structured fields on the request's tracing span and completion log.

use chrono::Utc;

/// How a relayed request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Upstream stream fully relayed, `[DONE]` written
    Done,
    /// Precondition failed (credential or message), error frame written
    Rejected,
    /// Upstream or stream failure, error frame written
    Failed,
    /// Client disconnected before the stream finished
    ClientGone,
}

impl RelayOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayOutcome::Done => "done",
            RelayOutcome::Rejected => "rejected",
            RelayOutcome::Failed => "failed",
            RelayOutcome::ClientGone => "client_gone",
        }
    }
}

/// Generate a unique ID for a request
pub fn generate_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", Utc::now().timestamp_millis(), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_is_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }
}
