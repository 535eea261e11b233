/// Byte spans into the text a segment or error was scanned from
use std::ops::Range;

/// A half-open byte range into a prompt text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Span of a `len`-byte piece found `offset` bytes into some text
    pub fn at(offset: usize, len: usize) -> Self {
        Span::new(offset, offset + len)
    }

    /// Convert to a Range for use with ariadne
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A value with the span it was scanned from
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Spanned { value, span }
    }
}
