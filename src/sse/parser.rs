//! Incremental SSE parser.
//!
//! Text arrives in arbitrary pieces. [`SseParser::feed`] buffers partial
//! lines, hands complete lines to [`SseParser::feed_line`], and collects
//! every record completed along the way. Lines may end in `\n`, `\r\n` or
//! a lone `\r`.

use super::events::{SseLine, SseRecord};

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    let (field, value) = match line.split_once(':') {
        Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
        None => (line, ""),
    };

    match field {
        "event" => SseLine::Event(value.to_string()),
        "data" => SseLine::Data(value.to_string()),
        "id" => SseLine::Id(value.to_string()),
        "retry" => SseLine::Retry(value.to_string()),
        _ => SseLine::Unknown {
            field: field.to_string(),
            value: value.to_string(),
        },
    }
}

/// Stateful SSE parser that accumulates lines and emits complete records
#[derive(Debug, Default)]
pub struct SseParser {
    /// Text not yet terminated by a line break
    line_buffer: String,
    /// Current event type being accumulated
    current_event_type: Option<String>,
    /// Accumulated data lines, each followed by '\n'
    data_buffer: String,
    /// Whether a data line has been seen for the current event
    has_data: bool,
    /// Last event id; persists across events
    last_event_id: Option<String>,
}

impl SseParser {
    /// Create a new SSE parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a piece of text, returning every record it completes.
    pub fn feed(&mut self, chunk: &str) -> Vec<SseRecord> {
        let mut records = Vec::new();
        let mut buffer = std::mem::take(&mut self.line_buffer);
        buffer.push_str(chunk);

        let bytes = buffer.as_bytes();
        let mut start = 0;
        let mut i = 0;

        while i < bytes.len() {
            let next = match bytes[i] {
                b'\n' => i + 1,
                b'\r' => {
                    // A trailing '\r' may be the first half of "\r\n"
                    if i + 1 == bytes.len() {
                        break;
                    }
                    if bytes[i + 1] == b'\n' {
                        i + 2
                    } else {
                        i + 1
                    }
                }
                _ => {
                    i += 1;
                    continue;
                }
            };

            if let Some(record) = self.feed_line(&buffer[start..i]) {
                records.push(record);
            }
            start = next;
            i = next;
        }

        self.line_buffer = buffer[start..].to_string();
        records
    }

    /// Feed one complete line (without its terminator).
    ///
    /// Returns a record when the line completes one: a blank line closing
    /// an event with data, or a valid `retry:` field.
    pub fn feed_line(&mut self, line: &str) -> Option<SseRecord> {
        match parse_sse_line(line) {
            SseLine::Empty => self.dispatch(),
            SseLine::Event(event_type) => {
                self.current_event_type = Some(event_type);
                None
            }
            SseLine::Data(data) => {
                self.data_buffer.push_str(&data);
                self.data_buffer.push('\n');
                self.has_data = true;
                None
            }
            SseLine::Id(id) => {
                if !id.contains('\0') {
                    self.last_event_id = Some(id);
                }
                None
            }
            SseLine::Retry(value) => {
                if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                value.parse().ok().map(SseRecord::ReconnectInterval)
            }
            SseLine::Comment(_) | SseLine::Unknown { .. } => None,
        }
    }

    /// End of input.
    ///
    /// A lone trailing `\r` still counts as a line break, so it can complete
    /// one last event. Anything else left unterminated is discarded.
    pub fn finish(&mut self) -> Option<SseRecord> {
        let mut record = None;
        if let Some(line) = self.line_buffer.strip_suffix('\r') {
            let line = line.to_string();
            self.line_buffer.clear();
            record = self.feed_line(&line);
        }
        if self.has_data || !self.line_buffer.is_empty() {
            tracing::debug!("Discarding unterminated SSE event at end of stream");
        }
        self.reset();
        record
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.line_buffer.clear();
        self.current_event_type = None;
        self.data_buffer.clear();
        self.has_data = false;
        self.last_event_id = None;
    }

    fn dispatch(&mut self) -> Option<SseRecord> {
        let event = self.current_event_type.take();
        if !self.has_data {
            return None;
        }

        let mut data = std::mem::take(&mut self.data_buffer);
        data.pop();
        self.has_data = false;

        Some(SseRecord::Event {
            event,
            id: self.last_event_id.clone(),
            data,
        })
    }
}
