//! Position: a linear index resolved to a line and column

/// A linear document index together with its line and intra-line offset
///
/// Positions double as resume tokens: [`Document::resolve`] scans forward
/// from a previous position instead of from the start of the document.
///
/// [`Document::resolve`]: super::Document::resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Linear index, counting one unit per implicit newline
    pub index: usize,

    /// Zero-based line number
    pub line: usize,

    /// Offset within the line, in characters
    pub offset: usize,
}

impl Position {
    /// Start of every document
    pub const ZERO: Position = Position {
        index: 0,
        line: 0,
        offset: 0,
    };

    /// Create a position
    pub fn new(index: usize, line: usize, offset: usize) -> Self {
        Self {
            index,
            line,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_default() {
        assert_eq!(Position::ZERO, Position::default());
        assert_eq!(Position::new(3, 1, 0).line, 1);
    }
}
