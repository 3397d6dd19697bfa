//! Output buffer that filters line-editor control sequences.
//!
//! The OLT's line editor repositions the cursor after it erases a pagination
//! banner (`ESC [ 37 D` and similar). These sequences carry no content, so
//! the buffer feeds every chunk through a vte parser and keeps only printable
//! text and line structure. The parser state survives across chunks, so a
//! sequence split between two reads is still removed.

use log::trace;
use memchr::memmem;
use vte::{Params, Parser, Perform};

/// Accumulates cleaned device output and searches it for a prompt.
pub struct PromptBuffer {
    /// Cleaned text accumulated so far.
    text: String,

    /// Escape-sequence parser; keeps state between chunks.
    parser: Parser,

    /// Bytes of `text` already searched without finding the prompt.
    searched: usize,
}

impl PromptBuffer {
    pub fn new() -> Self {
        Self {
            text: String::with_capacity(4096),
            parser: Parser::new(),
            searched: 0,
        }
    }

    /// Append raw device bytes, dropping escape sequences.
    pub fn extend(&mut self, data: &[u8]) {
        let mut filter = LineEditorFilter {
            out: &mut self.text,
        };
        self.parser.advance(&mut filter, data);
    }

    /// Check whether the prompt appears anywhere in the accumulated text.
    ///
    /// Only the region not covered by an earlier unsuccessful search (plus
    /// enough overlap for a prompt straddling two chunks) is scanned.
    pub fn contains_prompt(&mut self, prompt: &str) -> bool {
        let overlap = prompt.len().saturating_sub(1);
        let start = self.searched.saturating_sub(overlap);
        let found = memmem::find(&self.text.as_bytes()[start..], prompt.as_bytes()).is_some();
        if !found {
            self.searched = self.text.len();
        }
        found
    }

    /// Take the accumulated text and reset.
    pub fn take(&mut self) -> String {
        self.searched = 0;
        std::mem::take(&mut self.text)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.searched = 0;
    }
}

impl Default for PromptBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// vte performer that keeps text, newlines, carriage returns and tabs.
struct LineEditorFilter<'a> {
    out: &'a mut String,
}

impl Perform for LineEditorFilter<'_> {
    fn print(&mut self, c: char) {
        self.out.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.out.push(byte as char);
        }
    }

    fn csi_dispatch(&mut self, params: &Params, _intermediates: &[u8], _ignore: bool, action: char) {
        trace!("dropped CSI {:?} {}", params, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extend() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"Hello, world!\r\n");
        assert_eq!(buffer.as_str(), "Hello, world!\r\n");
    }

    #[test]
    fn test_cursor_reposition_stripped() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"  \x1b[37D  Number              : 2\r\n");
        assert_eq!(buffer.as_str(), "    Number              : 2\r\n");
    }

    #[test]
    fn test_three_digit_count_stripped() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"abc\x1b[100Cdef");
        assert_eq!(buffer.as_str(), "abcdef");
    }

    #[test]
    fn test_sequence_split_across_chunks() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"abc\x1b[3");
        buffer.extend(b"7Ddef");
        assert_eq!(buffer.as_str(), "abcdef");
    }

    #[test]
    fn test_prompt_anywhere() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"enable\r\nMA5683T#");
        assert!(buffer.contains_prompt("MA5683T#"));
        assert!(!buffer.contains_prompt("MA5683T(config)#"));
    }

    #[test]
    fn test_prompt_straddling_chunks() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"config\r\nMA5683T(con");
        assert!(!buffer.contains_prompt("MA5683T(config)#"));
        buffer.extend(b"fig)#");
        assert!(buffer.contains_prompt("MA5683T(config)#"));
    }

    #[test]
    fn test_take_clears_buffer() {
        let mut buffer = PromptBuffer::new();
        buffer.extend(b"test data");
        assert!(!buffer.contains_prompt("#"));
        assert_eq!(buffer.take(), "test data");
        assert!(buffer.is_empty());
        buffer.extend(b"#");
        assert!(buffer.contains_prompt("#"));
    }
}
