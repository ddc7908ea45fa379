//! Output buffer with tail-only prompt search.
//!
//! Switch output is accumulated as plain text: VT100 escape sequences (cursor
//! moves, colour, the ArubaOS-Switch screen redraws) are stripped as bytes
//! arrive. Prompt detection only looks at the last `search_depth` bytes so a
//! long neighbor listing does not make every read quadratic.

use bytes::BytesMut;
use regex::bytes::{Match, Regex};
use vte::{Parser, Perform};

/// Collects printable output for a [`vte::Parser`].
struct Printable<'a> {
    out: &'a mut BytesMut,
}

impl Perform for Printable<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        // Keep line structure, drop bells, backspaces and the like.
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.out.extend_from_slice(&[byte]);
        }
    }
}

/// Buffer for accumulating output and searching its tail for patterns.
pub struct PatternBuffer {
    /// Accumulated output with escape sequences removed.
    buffer: BytesMut,

    /// Escape-sequence state, kept across chunks.
    parser: Parser,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            parser: Parser::new(),
            search_depth,
        }
    }

    /// Append raw channel data, stripping escape sequences.
    ///
    /// A sequence split across two chunks is still recognized.
    pub fn extend(&mut self, data: &[u8]) {
        let mut printable = Printable {
            out: &mut self.buffer,
        };
        self.parser.advance(&mut printable, data);
    }

    /// Search the last `search_depth` bytes for the pattern.
    ///
    /// Offsets in the returned match are relative to the tail, not the buffer.
    pub fn search_tail(&self, pattern: &Regex) -> Option<Match<'_>> {
        pattern.find(self.tail())
    }

    /// Check if the tail contains a pattern match.
    pub fn tail_contains(&self, pattern: &Regex) -> bool {
        self.search_tail(pattern).is_some()
    }

    /// The region searched by [`search_tail`](Self::search_tail).
    pub fn tail(&self) -> &[u8] {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        &self.buffer[start..]
    }

    /// Take the buffer contents and reset it.
    pub fn take(&mut self) -> Vec<u8> {
        self.buffer.split().to_vec()
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extend() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"Hello, switch!\r\n");
        assert_eq!(buffer.as_slice(), b"Hello, switch!\r\n");
    }

    #[test]
    fn test_ansi_stripping() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"\x1b[1;24r\x1b[24;1H\x1b[2KHP-2530-48G# ");
        assert_eq!(buffer.as_slice(), b"HP-2530-48G# ");
    }

    #[test]
    fn test_escape_split_across_chunks() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"Port ID : 1\x1b[");
        buffer.extend(b"?25hswitch#");
        assert_eq!(buffer.as_slice(), b"Port ID : 1switch#");
    }

    #[test]
    fn test_tail_search() {
        let mut buffer = PatternBuffer::new(20);
        buffer.extend(&[b'x'; 100]);
        buffer.extend(b"\ncore-6100#");

        let pattern = Regex::new(r"core-6100#").unwrap();
        assert!(buffer.tail_contains(&pattern));
    }

    #[test]
    fn test_tail_search_ignores_old_output() {
        let mut buffer = PatternBuffer::new(10);
        buffer.extend(b"core-6100#");
        buffer.extend(&[b'x'; 100]);

        let pattern = Regex::new(r"core-6100#").unwrap();
        assert!(!buffer.tail_contains(&pattern));
    }

    #[test]
    fn test_take_clears_buffer() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"show arp");
        assert_eq!(buffer.take(), b"show arp");
        assert!(buffer.is_empty());
    }
}
