//! Incremental UTF-8 decoding of response body chunks.
//!
//! Network chunks can end in the middle of a multi-byte character. The
//! decoder holds back the incomplete tail and completes it with the next
//! chunk, so the decoded text does not depend on where the body was split.

/// Replacement emitted for invalid byte sequences.
const REPLACEMENT: char = '\u{FFFD}';

/// Byte order mark, dropped from the very start of a stream.
const BOM: char = '\u{FEFF}';

/// Stateful UTF-8 decoder.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Bytes of an incomplete character left over from the previous chunk
    pending: Vec<u8>,
    /// Whether any text has been produced yet
    started: bool,
}

impl Utf8Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk of bytes.
    ///
    /// Invalid sequences are replaced with U+FFFD. An incomplete sequence at
    /// the end of the chunk is kept until more bytes arrive.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut out = String::with_capacity(input.len());
        let mut rest: &[u8] = &input;

        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            rest = &tail[len..];
                        }
                        None => {
                            self.pending = tail.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        self.strip_bom(out)
    }

    /// Flush at end of stream. A dangling partial character becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        self.pending.clear();
        self.strip_bom(REPLACEMENT.to_string())
    }

    fn strip_bom(&mut self, text: String) -> String {
        if self.started || text.is_empty() {
            return text;
        }
        self.started = true;
        match text.strip_prefix(BOM) {
            Some(stripped) => stripped.to_string(),
            None => text,
        }
    }
}
