//! CRLF line codec for tokio.
//!
//! Decodes `\n`-terminated lines (a preceding `\r` is stripped) into
//! `String`s and encodes outgoing strings with a `\r\n` terminator.
//! Lines longer than the configured limit are discarded rather than
//! failing the stream, and invalid UTF-8 is decoded lossily, so the only
//! errors a reader ever sees are I/O errors.

use std::cmp;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Default maximum line length: 512 bytes of message plus 8191 bytes of
/// IRCv3 tags, rounded to the tag budget since servers may send either.
pub const DEFAULT_MAX_LINE_LEN: usize = 8191;

/// Line-based codec for protocol lines.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line content length; the `\r\n` terminator is not counted
    max_len: usize,
    /// Skipping the remainder of an overlong line
    discarding: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec with [`DEFAULT_MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// The configured maximum line length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Line content with the `\n` and an optional preceding `\r` removed.
    fn content(bytes: &[u8]) -> &[u8] {
        let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        bytes.strip_suffix(b"\r").unwrap_or(bytes)
    }

    /// Decode a line's content, or `None` if it exceeds the limit.
    fn finish_line(&self, bytes: &[u8]) -> Option<String> {
        let content = Self::content(bytes);
        if content.len() > self.max_len {
            tracing::warn!(
                limit = self.max_len,
                len = content.len(),
                "discarding overlong line"
            );
            return None;
        }
        Some(String::from_utf8_lossy(content).into_owned())
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        // A line that fits is at most `max_len` bytes, a `\r` and the `\n`.
        let window = self.max_len.saturating_add(2);
        loop {
            let read_to = cmp::min(window, src.len());
            let newline = src[self.next_index..read_to]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| self.next_index + offset);

            match (self.discarding, newline) {
                (true, Some(end)) => {
                    src.advance(end + 1);
                    self.discarding = false;
                    self.next_index = 0;
                }
                (true, None) => {
                    src.advance(read_to);
                    self.next_index = 0;
                    if src.is_empty() {
                        return Ok(None);
                    }
                }
                (false, Some(end)) => {
                    self.next_index = 0;
                    let line = src.split_to(end + 1);
                    if let Some(line) = self.finish_line(&line) {
                        return Ok(Some(line));
                    }
                }
                (false, None) if src.len() >= window => {
                    tracing::warn!(limit = self.max_len, "discarding overlong line");
                    self.discarding = true;
                }
                (false, None) => {
                    self.next_index = read_to;
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }

        self.next_index = 0;
        if self.discarding || src.is_empty() {
            self.discarding = false;
            src.clear();
            return Ok(None);
        }

        // Unterminated final line
        let line = src.split_to(src.len());
        Ok(self.finish_line(&line))
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
