//! Incremental decoder for `text/event-stream` bodies.

use log::warn;

/// Longest line kept; anything longer is discarded up to its newline.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name, "message" when the frame had no `event:` field
    pub event: String,
    /// Data lines joined with '\n'
    pub data: String,
}

/// Turns arbitrary byte chunks into complete frames.
///
/// Chunks may split lines (or UTF-8 sequences) anywhere; incomplete input is
/// buffered until the next call, up to [`MAX_LINE_LEN`] bytes per line.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    skipping_line: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if self.skipping_line {
                self.skipping_line = false;
                continue;
            }
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if let Some(frame) = self.process_line(line) {
                frames.push(frame);
            }
        }

        if self.buffer.len() > MAX_LINE_LEN {
            if !self.skipping_line {
                warn!(
                    "Event stream line exceeds {} bytes, discarding it",
                    MAX_LINE_LEN
                );
            }
            self.buffer.clear();
            self.skipping_line = true;
        }
        frames
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // id / retry are irrelevant without reconnection
            _ => {}
        }
        None
    }

    /// Frames without data lines are dropped, as browsers do.
    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let frame = SseFrame {
            event: event.unwrap_or_else(|| "message".to_string()),
            data: self.data.join("\n"),
        };
        self.data.clear();
        Some(frame)
    }
}
