//! Line framing of `text/event-stream` bodies.

use std::time::Duration;

use tracing::warn;

use crate::constants::{STREAM_BYEBYE_PAYLOAD, STREAM_HELLO_PAYLOAD, STREAM_MAX_LINE_BYTES};

/// One meaningful line of an event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Reconnect delay requested by the server.
    Retry(Duration),
    /// Cursor of the event whose data follows.
    Id(String),
    /// JSON payload of an event.
    Data(String),
    /// Handshake sent when the stream opens.
    Hello,
    /// Sent right before the server closes the stream.
    Byebye,
}

impl SseLine {
    /// Parses a single line without its terminator. Blank lines, comments,
    /// `event:` names and unknown fields yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "retry" => value
                .trim()
                .parse::<u64>()
                .ok()
                .map(|ms| SseLine::Retry(Duration::from_millis(ms))),
            "id" if !value.is_empty() => Some(SseLine::Id(value.to_string())),
            "data" => match value.trim() {
                "" => None,
                STREAM_HELLO_PAYLOAD => Some(SseLine::Hello),
                STREAM_BYEBYE_PAYLOAD => Some(SseLine::Byebye),
                payload => Some(SseLine::Data(payload.to_string())),
            },
            _ => None,
        }
    }
}

/// Splits arbitrarily chunked body bytes into lines.
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    max_line: usize,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_max_line(STREAM_MAX_LINE_BYTES)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder that discards any partial line longer than `max_line` bytes.
    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line,
        }
    }

    /// Appends `chunk` and returns every line it completed. Bytes after the
    /// last newline stay buffered for the next chunk.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseLine> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(end) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=end).collect();
            let text = String::from_utf8_lossy(&raw[..end]);
            if let Some(line) = SseLine::parse(text.trim_end_matches('\r')) {
                lines.push(line);
            }
        }
        if self.buffer.len() > self.max_line {
            warn!(
                buffered = self.buffer.len(),
                max = self.max_line,
                "dropping oversized event stream line"
            );
            self.reset();
        }
        lines
    }

    /// Drops a partial line left from a previous connection.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        assert_eq!(
            SseLine::parse("retry: 1000"),
            Some(SseLine::Retry(Duration::from_millis(1000)))
        );
        assert_eq!(
            SseLine::parse("id: 107449584845914113-0"),
            Some(SseLine::Id("107449584845914113-0".to_string()))
        );
        assert_eq!(
            SseLine::parse(r#"data: {"id": "1"}"#),
            Some(SseLine::Data(r#"{"id": "1"}"#.to_string()))
        );
        assert_eq!(SseLine::parse("data: \"hello\""), Some(SseLine::Hello));
        assert_eq!(SseLine::parse("data: \"byebye\""), Some(SseLine::Byebye));
    }

    #[test]
    fn test_parse_ignored_lines() {
        assert_eq!(SseLine::parse(""), None);
        assert_eq!(SseLine::parse(": keep-alive"), None);
        assert_eq!(SseLine::parse("event: open"), None);
        assert_eq!(SseLine::parse("retry: soon"), None);
        assert_eq!(SseLine::parse("id:"), None);
    }

    #[test]
    fn test_decoder_joins_split_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"retry: 5").is_empty());
        assert_eq!(
            decoder.push(b"00\r\nid: 7-1\nda"),
            vec![
                SseLine::Retry(Duration::from_millis(500)),
                SseLine::Id("7-1".to_string())
            ]
        );
        assert_eq!(
            decoder.push(b"ta: {}\n\n"),
            vec![SseLine::Data("{}".to_string())]
        );
    }

    #[test]
    fn test_decoder_drops_oversized_line() {
        let mut decoder = SseDecoder::with_max_line(16);
        assert!(decoder.push(b"data: {\"n\": 1234567890").is_empty());
        // the rest of the dropped line is parsed as an unknown field
        assert!(decoder.push(b"12345}\n").is_empty());
        assert_eq!(
            decoder.push(b"id: 3\ndata: {}\n"),
            vec![
                SseLine::Id("3".to_string()),
                SseLine::Data("{}".to_string())
            ]
        );
    }

    #[test]
    fn test_decoder_keeps_lines_within_limit() {
        let mut decoder = SseDecoder::with_max_line(8);
        assert!(decoder.push(b"id: 42").is_empty());
        assert_eq!(decoder.push(b"\n"), vec![SseLine::Id("42".to_string())]);
    }

    #[test]
    fn test_decoder_reset_drops_partial_line() {
        let mut decoder = SseDecoder::new();
        decoder.push(b"data: {\"trunc");
        decoder.reset();
        assert_eq!(
            decoder.push(b"id: 9\n"),
            vec![SseLine::Id("9".to_string())]
        );
    }
}
