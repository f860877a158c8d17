//! Editor positions and offset conversion.

use crate::span::ByteOffset;
use text_size::TextSize;

/// An editor cursor position: 1-based line, 0-based character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 0-based character offset within the line.
    pub character: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Stores the start offset of every line for position lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// `line_starts[i]` is the offset where 0-based line `i` begins.
    line_starts: Vec<ByteOffset>,
    len: TextSize,
}

impl LineIndex {
    /// Creates a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Returns the number of lines in the source.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a position to a byte offset, ignoring `indent` leading
    /// bytes that the generator adds in front of every line.
    ///
    /// Returns `None` when the line does not exist or the character falls
    /// before the indentation.
    pub fn offset(&self, position: Position, indent: u32) -> Option<ByteOffset> {
        let line = position.line.checked_sub(1)? as usize;
        let line_start = *self.line_starts.get(line)?;
        let raw = u32::from(line_start) + position.character;
        let offset = TextSize::from(raw.checked_sub(indent)?);
        (offset <= self.len).then_some(offset)
    }

    /// Returns the byte offset where a 0-based line starts.
    pub fn line_start(&self, line: u32) -> Option<ByteOffset> {
        self.line_starts.get(line as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_starts() {
        let index = LineIndex::new("hello\nworld\nfoo");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_start(1), Some(TextSize::from(6)));
        assert_eq!(index.line_start(2), Some(TextSize::from(12)));
    }

    #[test]
    fn test_offset_from_position() {
        let index = LineIndex::new("<div>\n    <span></span>\n</div>");
        assert_eq!(
            index.offset(Position::new(2, 5), 0),
            Some(TextSize::from(11))
        );
        assert_eq!(
            index.offset(Position::new(2, 5), 4),
            Some(TextSize::from(7))
        );
    }

    #[test]
    fn test_offset_out_of_range() {
        let index = LineIndex::new("a\nb");
        assert_eq!(index.offset(Position::new(0, 0), 0), None);
        assert_eq!(index.offset(Position::new(9, 0), 0), None);
        assert_eq!(index.offset(Position::new(1, 0), 4), None);
    }
}
