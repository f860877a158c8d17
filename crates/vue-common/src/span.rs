//! Byte spans into component section text.

use text_size::{TextRange, TextSize};

/// A byte offset into a section's source text.
pub type ByteOffset = TextSize;

/// A half-open `[start, end)` byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The start byte offset (inclusive).
    pub start: ByteOffset,
    /// The end byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates a span from `usize` offsets, as produced by `logos`.
    #[inline]
    pub fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(
            TextSize::from(range.start as u32),
            TextSize::from(range.end as u32),
        )
    }

    /// Creates an empty span at the given offset.
    #[inline]
    pub fn empty(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length of this span in bytes.
    #[inline]
    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub fn contains(&self, offset: ByteOffset) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns a span covering both this span and another.
    #[inline]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: std::cmp::min(self.start, other.start),
            end: std::cmp::max(self.end, other.end),
        }
    }

    /// Returns the text this span covers in `source`.
    #[inline]
    pub fn slice(self, source: &str) -> &str {
        &source[usize::from(self.start)..usize::from(self.end)]
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
        }
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        TextRange::new(span.start, span.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_contains_is_half_open() {
        let span = Span::new(5u32, 15u32);
        assert!(!span.contains(TextSize::from(4)));
        assert!(span.contains(TextSize::from(5)));
        assert!(!span.contains(TextSize::from(15)));
    }

    #[test]
    fn test_span_slice() {
        let span = Span::from_range(6..11);
        assert_eq!(span.slice("hello world"), "world");
    }

    #[test]
    fn test_span_cover() {
        let a = Span::new(2u32, 4u32);
        let b = Span::new(8u32, 9u32);
        assert_eq!(a.cover(b), Span::new(2u32, 9u32));
    }
}
