//! OperationSequence: a canonical edit script over a whole document
//!
//! A sequence must consume every unit of its base document exactly once, in
//! order. Sequences are kept in canonical form at all times, so two
//! sequences with the same effect compare equal.

use super::operation::Operation;
use crate::error::{OtError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical edit script
///
/// # Canonical form
///
/// - no zero-length retains or deletes, no empty inserts
/// - no two adjacent operations of the same kind
/// - between two retains, a delete always precedes an insert
///
/// Every constructor normalizes, so the derived `PartialEq` compares
/// canonical forms.
///
/// Counts merged by [`push`](Self::push) saturate at `usize::MAX`, which no
/// document can reach. Untrusted input goes through
/// [`try_push`](Self::try_push) or `TryFrom<Vec<Operation>>`, which reject
/// counts that do not fit.
///
/// # Example
///
/// ```rust
/// use synckit_ot::{Operation, OperationSequence};
///
/// let built = OperationSequence::new().retain(1).insert("x").delete(2).retain(1);
/// let listed = OperationSequence::try_from(vec![
///     Operation::Retain(1),
///     Operation::Delete(1),
///     Operation::insert("x"),
///     Operation::Delete(1),
///     Operation::Retain(0),
///     Operation::Retain(1),
/// ])
/// .unwrap();
///
/// assert_eq!(built, listed);
/// assert_eq!(built.input_len(), 4);
/// assert_eq!(built.output_len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Operation>", into = "Vec<Operation>")]
pub struct OperationSequence {
    ops: Vec<Operation>,
}

impl OperationSequence {
    /// Create an empty sequence (covers the empty document)
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Append a retain (builder style)
    pub fn retain(mut self, n: usize) -> Self {
        self.push(Operation::Retain(n));
        self
    }

    /// Append a delete (builder style)
    pub fn delete(mut self, n: usize) -> Self {
        self.push(Operation::Delete(n));
        self
    }

    /// Append an insert (builder style)
    pub fn insert(mut self, text: impl Into<String>) -> Self {
        self.push(Operation::Insert(text.into()));
        self
    }

    /// Append an operation, keeping the sequence canonical
    ///
    /// No-ops are dropped, same-kind neighbours merge, and a delete that
    /// follows an insert is moved in front of it.
    pub fn push(&mut self, op: Operation) {
        if op.is_noop() {
            return;
        }

        match op {
            Operation::Retain(n) => match self.ops.last_mut() {
                Some(Operation::Retain(last)) => *last = last.saturating_add(n),
                _ => self.ops.push(Operation::Retain(n)),
            },
            Operation::Delete(n) => match self.ops.last_mut() {
                Some(Operation::Delete(last)) => *last = last.saturating_add(n),
                Some(Operation::Insert(_)) => {
                    let insert_at = self.ops.len() - 1;
                    if insert_at > 0 {
                        if let Operation::Delete(before) = &mut self.ops[insert_at - 1] {
                            *before = before.saturating_add(n);
                            return;
                        }
                    }
                    self.ops.insert(insert_at, Operation::Delete(n));
                }
                _ => self.ops.push(Operation::Delete(n)),
            },
            Operation::Insert(text) => match self.ops.last_mut() {
                Some(Operation::Insert(last)) => last.push_str(&text),
                _ => self.ops.push(Operation::Insert(text)),
            },
        }
    }

    /// Append an operation, rejecting a merge whose count overflows
    ///
    /// # Errors
    ///
    /// Returns `OtError::Overflow`; the sequence is unchanged.
    pub fn try_push(&mut self, op: Operation) -> Result<()> {
        if let (Operation::Retain(n) | Operation::Delete(n), Some(existing)) =
            (&op, self.merge_target(&op))
        {
            existing.checked_add(*n).ok_or(OtError::Overflow)?;
        }
        self.push(op);
        Ok(())
    }

    /// Count that a retain or delete would be merged into
    fn merge_target(&self, op: &Operation) -> Option<usize> {
        match (op, self.ops.as_slice()) {
            (Operation::Retain(_), [.., Operation::Retain(last)])
            | (Operation::Delete(_), [.., Operation::Delete(last)])
            | (Operation::Delete(_), [.., Operation::Delete(last), Operation::Insert(_)]) => Some(*last),
            _ => None,
        }
    }

    /// Borrow the operations
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    /// Iterate over the operations
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    /// Number of operations in canonical form
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the sequence holds no operations
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Whether applying this sequence leaves any document unchanged
    ///
    /// True for the empty sequence and for a single retain.
    pub fn is_noop(&self) -> bool {
        self.ops.iter().all(|op| matches!(op, Operation::Retain(_)))
    }

    /// Count retained, deleted and inserted units (saturating)
    pub fn counts(&self) -> (usize, usize, usize) {
        self.ops
            .iter()
            .fold((0usize, 0usize, 0usize), |(ret, del, ins), op| match op {
                Operation::Retain(n) => (ret.saturating_add(*n), del, ins),
                Operation::Delete(n) => (ret, del.saturating_add(*n), ins),
                Operation::Insert(text) => (ret, del, ins.saturating_add(text.chars().count())),
            })
    }

    /// Size of the document this sequence must be applied to (saturating)
    pub fn input_len(&self) -> usize {
        let (ret, del, _) = self.counts();
        ret.saturating_add(del)
    }

    /// Size of the document after this sequence is applied (saturating)
    pub fn output_len(&self) -> usize {
        let (ret, _, ins) = self.counts();
        ret.saturating_add(ins)
    }

    /// Exact input and output lengths
    ///
    /// # Errors
    ///
    /// Returns `OtError::Overflow` if either length exceeds `usize::MAX`.
    pub fn lengths(&self) -> Result<(usize, usize)> {
        self.ops.iter().try_fold((0usize, 0usize), |(input, output), op| {
            let input = input.checked_add(op.input_len()).ok_or(OtError::Overflow)?;
            let output = output.checked_add(op.output_len()).ok_or(OtError::Overflow)?;
            Ok((input, output))
        })
    }

    /// Compose with a sequence that follows this one
    ///
    /// See [`compose`](super::compose).
    pub fn compose(&self, next: &OperationSequence) -> Result<OperationSequence> {
        super::compose(self, next)
    }

    /// Transform against a concurrent sequence
    ///
    /// See [`transform`](super::transform).
    pub fn transform(
        &self,
        concurrent: &OperationSequence,
    ) -> Result<(OperationSequence, OperationSequence)> {
        super::transform(self, concurrent)
    }
}

impl FromIterator<Operation> for OperationSequence {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        let mut seq = OperationSequence::new();
        for op in iter {
            seq.push(op);
        }
        seq
    }
}

impl Extend<Operation> for OperationSequence {
    fn extend<I: IntoIterator<Item = Operation>>(&mut self, iter: I) {
        for op in iter {
            self.push(op);
        }
    }
}

impl TryFrom<Vec<Operation>> for OperationSequence {
    type Error = OtError;

    fn try_from(ops: Vec<Operation>) -> Result<Self> {
        let mut seq = OperationSequence::new();
        for op in ops {
            seq.try_push(op)?;
        }
        seq.lengths()?;
        Ok(seq)
    }
}

impl From<OperationSequence> for Vec<Operation> {
    fn from(seq: OperationSequence) -> Self {
        seq.ops
    }
}

impl IntoIterator for OperationSequence {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a OperationSequence {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl fmt::Display for OperationSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", op)?;
        }
        f.write_str("]")
    }
}

/// Lockstep reader over a sequence used by compose and transform
///
/// Partially consumed operations are pushed back as the new head.
pub(crate) struct Cursor<'a> {
    ops: std::slice::Iter<'a, Operation>,
    head: Option<Operation>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(seq: &'a OperationSequence) -> Self {
        Self {
            ops: seq.iter(),
            head: None,
        }
    }

    /// Take the next (possibly partial) operation
    pub(crate) fn next(&mut self) -> Option<Operation> {
        self.head.take().or_else(|| self.ops.next().cloned())
    }

    /// Return the unconsumed remainder of an operation
    pub(crate) fn put_back(&mut self, op: Operation) {
        if !op.is_noop() {
            self.head = Some(op);
        }
    }
}

/// Split `text` after `n` characters
pub(crate) fn split_chars(text: &str, n: usize) -> (String, String) {
    let at = text
        .char_indices()
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    (text[..at].to_string(), text[at..].to_string())
}
