//! Line splitting and line-length scanning over page buffers
//!
//! Page text is a byte buffer terminated by the first NUL byte (or the end of
//! the buffer) and delimited by `'\n'`. Consecutive delimiters collapse, so
//! empty lines never occupy a display row.

/// Line delimiter
pub const LINE_BREAK: u8 = b'\n';

/// Text terminator
pub const TERMINATOR: u8 = 0;

/// Slice of `buffer` up to (not including) the terminator
pub fn text_of(buffer: &[u8]) -> &[u8] {
    let end = buffer
        .iter()
        .position(|&b| b == TERMINATOR)
        .unwrap_or(buffer.len());
    &buffer[..end]
}

/// Longest valid UTF-8 prefix of a line
pub fn line_str(line: &[u8]) -> &str {
    match core::str::from_utf8(line) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&line[..e.valid_up_to()]).unwrap_or(""),
    }
}

/// Number of characters in a UTF-8 byte run
fn char_count(run: &[u8]) -> usize {
    // Continuation bytes (0b10xx_xxxx) do not start a character
    run.iter().filter(|&&b| (b & 0xC0) != 0x80).count()
}

/// Iterator over the non-empty lines of a page buffer
#[derive(Debug, Clone)]
pub struct Lines<'b> {
    rest: &'b [u8],
}

impl<'b> Lines<'b> {
    /// Split the text held in `buffer`
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            rest: text_of(buffer),
        }
    }
}

impl<'b> Iterator for Lines<'b> {
    type Item = &'b [u8];

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.rest.is_empty() {
                return None;
            }

            let (line, rest) = match self.rest.iter().position(|&b| b == LINE_BREAK) {
                Some(pos) => (&self.rest[..pos], &self.rest[pos + 1..]),
                None => (self.rest, &self.rest[self.rest.len()..]),
            };
            self.rest = rest;

            if !line.is_empty() {
                return Some(line);
            }
        }
    }
}

/// Shape of the text in a page buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextMetrics {
    /// Number of non-empty lines
    pub num_lines: u16,
    /// Longest line in characters
    pub max_chars_on_line: u16,
    /// Characters on the selected line (0 if past the end)
    pub chars_on_line: u16,
}

/// Single pass over the buffer measuring line count and lengths
///
/// `selected_line` picks which line's length is reported in
/// [`TextMetrics::chars_on_line`].
pub fn scan(buffer: &[u8], selected_line: u16) -> TextMetrics {
    let mut metrics = TextMetrics::default();

    for (index, line) in Lines::new(buffer).enumerate() {
        let chars = u16::try_from(char_count(line)).unwrap_or(u16::MAX);
        metrics.max_chars_on_line = metrics.max_chars_on_line.max(chars);
        if index == usize::from(selected_line) {
            metrics.chars_on_line = chars;
        }
        metrics.num_lines = metrics.num_lines.saturating_add(1);
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<'b>(buffer: &'b [u8]) -> heapless::Vec<&'b [u8], 8> {
        Lines::new(buffer).collect()
    }

    #[test]
    fn test_text_stops_at_terminator() {
        assert_eq!(text_of(b"abc\0def"), b"abc");
        assert_eq!(text_of(b"abc"), b"abc");
        assert_eq!(text_of(b"\0abc"), b"");
    }

    #[test]
    fn test_split_lines() {
        let lines = collect(b"Line1\nLine2\nLine3\0garbage");
        assert_eq!(lines.as_slice(), &[&b"Line1"[..], b"Line2", b"Line3"]);
    }

    #[test]
    fn test_consecutive_breaks_collapse() {
        let lines = collect(b"\nA\n\n\nB\n");
        assert_eq!(lines.as_slice(), &[&b"A"[..], b"B"]);
    }

    #[test]
    fn test_empty_buffer_has_no_lines() {
        assert_eq!(Lines::new(b"").count(), 0);
        assert_eq!(Lines::new(b"\0\0\0").count(), 0);
        assert_eq!(scan(b"", 0), TextMetrics::default());
    }

    #[test]
    fn test_scan_metrics() {
        let metrics = scan(b"ab\nlonger line\nxyz\0", 2);
        assert_eq!(metrics.num_lines, 3);
        assert_eq!(metrics.max_chars_on_line, 11);
        assert_eq!(metrics.chars_on_line, 3);
    }

    #[test]
    fn test_scan_counts_characters_not_bytes() {
        let metrics = scan("°C\n".as_bytes(), 0);
        assert_eq!(metrics.max_chars_on_line, 2);
    }

    #[test]
    fn test_line_str_keeps_valid_prefix() {
        assert_eq!(line_str(b"ok"), "ok");
        assert_eq!(line_str(&[b'h', b'i', 0xFF, b'x']), "hi");
    }
}
