//! Streaming UTF-8 decoding of reply body chunks.
//!
//! Chunk boundaries fall wherever the transport put them, often in the
//! middle of a multi-byte character. The decoder holds back an incomplete
//! trailing sequence until the next chunk completes it.

use std::char::REPLACEMENT_CHARACTER;

/// Incremental UTF-8 decoder.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    /// Bytes of an incomplete sequence carried over from the last chunk.
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    /// Create a decoder with nothing pending.
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Decode the next chunk.
    ///
    /// Invalid bytes become U+FFFD. An incomplete sequence at the end of the
    /// chunk is kept for the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());

                    if let Some(invalid_len) = e.error_len() {
                        out.push(REPLACEMENT_CHARACTER);
                        rest = &after[invalid_len..];
                    } else {
                        self.pending.extend_from_slice(after);
                        break;
                    }
                }
            }
        }

        out
    }

    /// Flush at end of stream. A dangling partial sequence becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let pending = std::mem::take(&mut self.pending);
        tracing::debug!(bytes = pending.len(), "stream ended inside a UTF-8 sequence");
        String::from_utf8_lossy(&pending).into_owned()
    }

    /// Whether bytes are held back waiting for the rest of a character.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
