//! Applying edit scripts to a document
//!
//! Application happens in two phases:
//!
//! 1. **Plan**: walk the sequence with a running position, validate every
//!    index and check that the whole document is covered. Nothing is
//!    mutated, so a failing sequence leaves the document untouched.
//! 2. **Materialize**: perform the recorded edits right to left. Edits only
//!    touch text at or after their own position, so positions recorded for
//!    edits further left stay valid without being resolved again.

use super::position::Position;
use super::text::Document;
use crate::error::{OtError, Result};
use crate::ops::{Operation, OperationSequence};

/// A validated edit waiting to be materialized
#[derive(Debug)]
enum PendingEdit<'a> {
    Delete {
        start: Position,
        end: Position,
        count: usize,
    },
    Insert {
        at: Position,
        text: &'a str,
    },
}

impl Document {
    /// Apply an edit script in place
    ///
    /// # Errors
    ///
    /// - `OtError::Index` if a retain or delete runs past the end
    /// - `OtError::Coverage` if the sequence stops short of the end
    ///
    /// On error the document is unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use synckit_ot::{Document, OperationSequence};
    ///
    /// let mut doc = Document::from("abc\ndef\nghi");
    /// doc.apply(&OperationSequence::new().retain(3).delete(5).retain(3)).unwrap();
    /// assert_eq!(doc.to_string(), "abcghi");
    /// ```
    pub fn apply(&mut self, ops: &OperationSequence) -> Result<()> {
        let edits = self.plan(ops)?;

        let added_lines: usize = edits
            .iter()
            .map(|edit| match edit {
                PendingEdit::Insert { text, .. } => text.matches('\n').count(),
                PendingEdit::Delete { .. } => 0,
            })
            .sum();
        self.lines.reserve(added_lines);

        let before = self.size;
        let count = edits.len();
        for edit in edits.into_iter().rev() {
            match edit {
                PendingEdit::Delete { start, end, count } => self.splice_delete(start, end, count),
                PendingEdit::Insert { at, text } => self.splice_insert(at, text),
            }
        }

        log::trace!("Applied {} edits, size {} -> {}", count, before, self.size);
        Ok(())
    }

    /// Validate `ops` against the current text and record its edits
    fn plan<'a>(&self, ops: &'a OperationSequence) -> Result<Vec<PendingEdit<'a>>> {
        let mut pos = Position::ZERO;
        let mut edits = Vec::with_capacity(ops.len());

        for op in ops {
            match op {
                Operation::Retain(n) => pos = self.advance(pos, *n)?,
                Operation::Delete(n) => {
                    let end = self.advance(pos, *n)?;
                    edits.push(PendingEdit::Delete {
                        start: pos,
                        end,
                        count: *n,
                    });
                    pos = end;
                }
                Operation::Insert(text) => edits.push(PendingEdit::Insert { at: pos, text }),
            }
        }

        let end = self.end();
        if pos.line != end.line || pos.offset != end.offset {
            return Err(OtError::Coverage {
                expected: self.size,
                covered: pos.index,
            });
        }

        Ok(edits)
    }

    fn advance(&self, from: Position, n: usize) -> Result<Position> {
        let index = from.index.saturating_add(n);
        self.resolve(index, from).ok_or(OtError::Index {
            index,
            size: self.size,
        })
    }

    fn splice_delete(&mut self, start: Position, end: Position, count: usize) {
        if start.line == end.line {
            self.lines[start.line].drain(start.offset..end.offset);
        } else {
            let tail = self.lines[end.line].split_off(end.offset);
            let line = &mut self.lines[start.line];
            line.truncate(start.offset);
            line.extend(tail);
            self.lines.drain(start.line + 1..=end.line);
        }
        self.size -= count;
    }

    fn splice_insert(&mut self, at: Position, text: &str) {
        let mut segments = text.split('\n');
        let first: Vec<char> = segments.next().unwrap_or_default().chars().collect();
        let mut rest: Vec<Vec<char>> = segments.map(|s| s.chars().collect()).collect();

        let line = &mut self.lines[at.line];
        if rest.is_empty() {
            line.splice(at.offset..at.offset, first);
        } else {
            let tail = line.split_off(at.offset);
            line.extend(first);
            if let Some(last) = rest.last_mut() {
                last.extend(tail);
            }
            self.lines.splice(at.line + 1..at.line + 1, rest);
        }
        self.size += text.chars().count();
    }
}
