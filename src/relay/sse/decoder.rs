//! Incremental chunk -> line decoding
//!
//! Upstream chunks arrive at arbitrary byte offsets. Two things can straddle
//! a chunk boundary: a multi-byte UTF-8 character and a line. Both are held
//! back until the next chunk completes them, so every line is emitted once,
//! whole, and in upstream order.
//!
//! A line that grows past `MAX_LINE_BYTES` without a newline is emitted as it
//! stands and the remainder starts a new line, so a misbehaving upstream
//! cannot grow the carried text without bound.

/// Longest unterminated line carried between chunks
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Stream-aware UTF-8 decoder plus line splitter
#[derive(Debug, Default)]
pub struct LineDecoder {
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending_bytes: Vec<u8>,
    /// Decoded text after the last newline
    partial_line: String,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one upstream chunk, returning the complete non-blank lines it finished
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.decode(chunk);
        self.partial_line.push_str(&text);

        let mut lines = Vec::new();
        while let Some(idx) = self.partial_line.find('\n') {
            let line: String = self.partial_line.drain(..=idx).collect();
            push_line(&mut lines, &line[..idx]);
        }

        if self.partial_line.len() > MAX_LINE_BYTES {
            let oversized = std::mem::take(&mut self.partial_line);
            push_line(&mut lines, &oversized);
        }
        lines
    }

    /// Flush whatever is left at end-of-stream
    ///
    /// An incomplete UTF-8 tail becomes U+FFFD, and an unterminated last
    /// line is emitted as a line of its own.
    pub fn finish(mut self) -> Vec<String> {
        if !self.pending_bytes.is_empty() {
            let tail = String::from_utf8_lossy(&self.pending_bytes).into_owned();
            self.partial_line.push_str(&tail);
        }

        let mut lines = Vec::new();
        push_line(&mut lines, &self.partial_line);
        lines
    }

    /// Decode as much of `pending_bytes + chunk` as forms complete characters
    fn decode(&mut self, chunk: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending_bytes);
        input.extend_from_slice(chunk);

        let mut out = String::with_capacity(input.len());
        let mut rest: &[u8] = &input;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        out.push_str(valid);
                    }
                    match e.error_len() {
                        // Invalid sequence in the middle: replace and keep going
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Incomplete sequence at the end: wait for more bytes
                        None => {
                            self.pending_bytes = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }
}

/// Keep a line unless it is blank; one trailing `\r` is part of the terminator
fn push_line(lines: &mut Vec<String>, raw: &str) {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.trim().is_empty() {
        return;
    }
    lines.push(line.to_string());
}
