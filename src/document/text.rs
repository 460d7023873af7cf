//! Document: line-indexed text addressed by a single linear index
//!
//! Lines are stored as vectors of `char` without their newline. The
//! implicit newline between two lines counts as one unit of the linear
//! index, so `size()` is exactly the number of units an edit script must
//! cover.

use super::position::Position;
use crate::error::{OtError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Write as _};
use std::io::{BufRead, BufReader, Read, Write};

/// Editable text as a sequence of lines
///
/// Invariant: there is always at least one line. The empty document is a
/// single empty line.
///
/// # Example
///
/// ```rust
/// use synckit_ot::{Document, Position};
///
/// let doc = Document::from("abc\ndef");
/// assert_eq!(doc.size(), 7);
/// assert_eq!(doc.line_count(), 2);
///
/// let pos = doc.resolve(5, Position::ZERO).unwrap();
/// assert_eq!((pos.line, pos.offset), (1, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    pub(super) lines: Vec<Vec<char>>,
    pub(super) size: usize,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            size: 0,
        }
    }

    /// Read a UTF-8 document from any byte source
    ///
    /// Lines are split at `\n`.
    ///
    /// # Errors
    ///
    /// - `OtError::Decode` with the zero-based line and character column of
    ///   the first invalid byte sequence
    /// - `OtError::Io` if the reader fails
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let mut lines = Vec::new();
        let mut size = 0;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            reader.read_until(b'\n', &mut buf)?;

            let terminated = buf.last() == Some(&b'\n');
            if terminated {
                buf.pop();
            }

            let line = decode_line(&buf, lines.len())?;
            size += line.len();
            lines.push(line);

            if !terminated {
                break;
            }
            size += 1;
        }

        Ok(Self { lines, size })
    }

    /// Decode a document from UTF-8 bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(bytes)
    }

    /// Total number of units, including one per implicit newline
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the document holds no text
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of lines (at least one)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Borrow all lines
    pub fn lines(&self) -> &[Vec<char>] {
        &self.lines
    }

    /// Get a single line as a string
    pub fn line(&self, line: usize) -> Option<String> {
        self.lines.get(line).map(|chars| chars.iter().collect())
    }

    /// Position of the end of the document
    pub fn end(&self) -> Position {
        let line = self.lines.len() - 1;
        Position::new(self.size, line, self.lines[line].len())
    }

    /// Resolve a linear index, scanning forward from `from`
    ///
    /// Returns `None` if `index` lies beyond the end of the document or
    /// before `from`. An index at the end of a line resolves to that line,
    /// not to the start of the next one.
    ///
    /// # Example
    ///
    /// ```rust
    /// use synckit_ot::{Document, Position};
    ///
    /// let doc = Document::from("ab\ncd");
    /// let first = doc.resolve(2, Position::ZERO).unwrap();
    /// assert_eq!((first.line, first.offset), (0, 2));
    ///
    /// let second = doc.resolve(4, first).unwrap();
    /// assert_eq!((second.line, second.offset), (1, 1));
    ///
    /// assert!(doc.resolve(6, second).is_none());
    /// ```
    pub fn resolve(&self, index: usize, from: Position) -> Option<Position> {
        let mut remaining = index.checked_sub(from.index)? + from.offset;
        for (i, line) in self.lines.get(from.line..)?.iter().enumerate() {
            if line.len() >= remaining {
                return Some(Position::new(index, from.line + i, remaining));
            }
            remaining -= line.len() + 1;
        }
        None
    }

    /// Copy the text between two linear indices into a new document
    ///
    /// # Errors
    ///
    /// Returns `OtError::Index` if `from > to` or `to` lies beyond the end
    /// of the document.
    pub fn extract(&self, from: usize, to: usize) -> Result<Document> {
        let start = self.resolve(from, Position::ZERO).ok_or(OtError::Index {
            index: from,
            size: self.size,
        })?;
        let end = self.resolve(to, start).ok_or(OtError::Index {
            index: to,
            size: self.size,
        })?;

        let lines = if start.line == end.line {
            vec![self.lines[start.line][start.offset..end.offset].to_vec()]
        } else {
            let mut lines = Vec::with_capacity(end.line - start.line + 1);
            lines.push(self.lines[start.line][start.offset..].to_vec());
            lines.extend(self.lines[start.line + 1..end.line].iter().cloned());
            lines.push(self.lines[end.line][..end.offset].to_vec());
            lines
        };

        Ok(Document {
            lines,
            size: to - from,
        })
    }

    /// Write the document as UTF-8 text
    ///
    /// Returns the number of bytes written.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<usize> {
        let mut written = 0;
        let mut buf = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            buf.clear();
            if i > 0 {
                buf.push('\n');
            }
            buf.extend(line.iter());
            writer.write_all(buf.as_bytes())?;
            written += buf.len();
        }
        Ok(written)
    }
}

fn decode_line(bytes: &[u8], line: usize) -> Result<Vec<char>> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.chars().collect()),
        Err(e) => {
            let column = std::str::from_utf8(&bytes[..e.valid_up_to()])
                .map(|valid| valid.chars().count())
                .unwrap_or_default();
            Err(OtError::Decode { line, column })
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(|line| line.chars().collect()).collect(),
            size: text.chars().count(),
        }
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            for &c in line {
                f.write_char(c)?;
            }
        }
        Ok(())
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Ok(Document::from(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert_eq!(doc.size(), 0);
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc, Document::from(""));
        assert_eq!(doc.end(), Position::ZERO);
    }

    #[test]
    fn test_size_counts_newlines() {
        let doc = Document::from("abc\n\ndé");
        assert_eq!(doc.size(), 7);
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line(1), Some(String::new()));
        assert_eq!(doc.line(2), Some("dé".to_string()));
        assert_eq!(doc.line(3), None);
    }

    #[test]
    fn test_resolve_end_is_valid() {
        let doc = Document::from("abc");
        let end = doc.resolve(3, Position::ZERO).unwrap();
        assert_eq!(end, doc.end());
        assert!(doc.resolve(4, Position::ZERO).is_none());
    }

    #[test]
    fn test_resolve_incremental() {
        let doc = Document::from("ab\n\ncde");
        let newline = doc.resolve(3, Position::ZERO).unwrap();
        assert_eq!((newline.line, newline.offset), (1, 0));

        let d = doc.resolve(5, newline).unwrap();
        assert_eq!((d.line, d.offset), (2, 1));
        assert_eq!(doc.resolve(5, Position::ZERO), Some(d));
    }

    #[test]
    fn test_resolve_rejects_backwards_scan() {
        let doc = Document::from("abc");
        let two = doc.resolve(2, Position::ZERO).unwrap();
        assert!(doc.resolve(1, two).is_none());
    }

    #[test]
    fn test_reader_roundtrip() {
        for text in ["", "abc", "abc\n", "\n\n", "héllo\nwörld\n!"] {
            let doc = Document::from_reader(text.as_bytes()).unwrap();
            assert_eq!(doc, Document::from(text));
            assert_eq!(doc.to_string(), text);
        }
    }

    #[test]
    fn test_decode_error_position() {
        let err = Document::from_bytes(b"ok\nab\xffc").unwrap_err();
        assert!(matches!(err, OtError::Decode { line: 1, column: 2 }));

        // "é\n\nxü" followed by a truncated sequence
        let err = Document::from_bytes(b"\xc3\xa9\n\nx\xc3\xbc\xc3").unwrap_err();
        assert!(matches!(err, OtError::Decode { line: 2, column: 2 }));
    }

    #[test]
    fn test_extract_single_line() {
        let doc = Document::from("hello world");
        let part = doc.extract(6, 11).unwrap();
        assert_eq!(part.to_string(), "world");
        assert_eq!(part.size(), 5);
    }

    #[test]
    fn test_extract_across_lines() {
        let doc = Document::from("abc\ndef\nghi");
        let part = doc.extract(2, 9).unwrap();
        assert_eq!(part.to_string(), "c\ndef\ng");
        assert_eq!(part.size(), 7);
        assert_eq!(part.line_count(), 3);
    }

    #[test]
    fn test_extract_out_of_bounds() {
        let doc = Document::from("abc");
        assert!(matches!(
            doc.extract(1, 4),
            Err(OtError::Index { index: 4, size: 3 })
        ));
        assert!(matches!(doc.extract(2, 1), Err(OtError::Index { .. })));
        assert!(doc.extract(3, 3).unwrap().is_empty());
    }

    #[test]
    fn test_write_to() {
        let doc = Document::from("a\nbé");
        let mut out = Vec::new();
        let written = doc.write_to(&mut out).unwrap();
        assert_eq!(out, "a\nbé".as_bytes());
        assert_eq!(written, out.len());
    }

    #[test]
    fn test_serde_as_text() {
        let doc = Document::from("a\nb");
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#""a\nb""#);
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
