//! Server-Sent Events framing.
//!
//! Both the upstream provider stream and our own `/api/chat` stream are SSE.
//! [`SseDecoder`] turns arbitrarily chunked bytes into complete frames; it
//! does no I/O so it can sit behind any byte stream.

use crate::error::CoreError;

/// Largest frame the decoder buffers before giving up on the stream.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// One dispatched SSE event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    /// Value of the `event:` field, if present.
    pub event: Option<String>,
    /// All `data:` lines joined with `\n`.
    pub data: String,
}

/// Incremental SSE decoder.
///
/// Bytes are buffered until a blank line terminates a frame, so chunk
/// boundaries may fall anywhere, including inside a multi-byte character.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Bytes of `buffer` already searched for a frame terminator.
    scanned: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of raw bytes. Carriage returns are dropped so `\r\n`
    /// line endings behave like `\n`.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend(chunk.iter().copied().filter(|&b| b != b'\r'));
    }

    /// Pop the next complete frame, if the buffer holds one.
    ///
    /// Frames consisting only of comments or empty fields are skipped. A
    /// pending frame larger than [`MAX_FRAME_BYTES`] is an error and is
    /// discarded.
    pub fn next_frame(&mut self) -> Result<Option<SseFrame>, CoreError> {
        loop {
            // Back up one byte: the terminator may straddle two pushes.
            let from = self.scanned.saturating_sub(1);
            let Some(end) = find_blank_line(&self.buffer[from..]).map(|i| from + i) else {
                self.scanned = self.buffer.len();
                if self.buffer.len() > MAX_FRAME_BYTES {
                    self.buffer.clear();
                    self.scanned = 0;
                    return Err(CoreError::FrameTooLarge(MAX_FRAME_BYTES));
                }
                return Ok(None);
            };
            let raw: Vec<u8> = self.buffer.drain(..end + 2).collect();
            self.scanned = 0;
            let text = String::from_utf8(raw)?;
            if let Some(frame) = parse_frame(&text) {
                return Ok(Some(frame));
            }
        }
    }

    /// Flush whatever remains after the stream ended without a final blank
    /// line.
    pub fn finish(&mut self) -> Result<Option<SseFrame>, CoreError> {
        if let Some(frame) = self.next_frame()? {
            return Ok(Some(frame));
        }
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let raw = std::mem::take(&mut self.buffer);
        self.scanned = 0;
        let text = String::from_utf8(raw)?;
        Ok(parse_frame(&text))
    }
}

fn find_blank_line(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

fn parse_frame(text: &str) -> Option<SseFrame> {
    let mut event = None;
    let mut data: Option<String> = None;

    for line in text.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event = Some(value.to_string()),
            "data" => match data.as_mut() {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(value);
                }
                None => data = Some(value.to_string()),
            },
            _ => {}
        }
    }

    data.map(|data| SseFrame { event, data })
}
