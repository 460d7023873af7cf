//! Compose: merge two consecutive edit scripts into one

use super::operation::Operation;
use super::sequence::{split_chars, Cursor, OperationSequence};
use crate::error::{OtError, Result};
use std::cmp::Ordering;

/// Compose two consecutive sequences
///
/// `a` covers the original document and `b` covers the document produced
/// by `a`. The result covers the original document and has the effect of
/// applying `a` then `b`.
///
/// Deletes of `a` and inserts of `b` pass straight through. A unit that
/// `b` retains or deletes either came from the original document (an
/// `a`-retain) or was inserted by `a`; in the latter case a delete cancels
/// the insert and a retain keeps the inserted text.
///
/// # Errors
///
/// - `OtError::Coverage` if `a`'s output length differs from `b`'s input
///   length
/// - `OtError::Overflow` if either length exceeds `usize::MAX`
///
/// # Example
///
/// ```rust
/// use synckit_ot::{compose, OperationSequence};
///
/// let a = OperationSequence::new().insert("g").retain(4);
/// let b = OperationSequence::new().retain(2).delete(2).retain(1);
///
/// let ab = compose(&a, &b).unwrap();
/// assert_eq!(ab, OperationSequence::new().insert("g").retain(1).delete(2).retain(1));
/// ```
pub fn compose(a: &OperationSequence, b: &OperationSequence) -> Result<OperationSequence> {
    let (_, expected) = a.lengths()?;
    let (covered, _) = b.lengths()?;
    if expected != covered {
        return Err(OtError::Coverage { expected, covered });
    }

    let mut composed = OperationSequence::new();
    let mut next_a = Cursor::new(a);
    let mut next_b = Cursor::new(b);

    loop {
        match (next_a.next(), next_b.next()) {
            (None, None) => break,

            // a's deletes never reach b
            (Some(Operation::Delete(n)), op_b) => {
                composed.push(Operation::Delete(n));
                if let Some(op) = op_b {
                    next_b.put_back(op);
                }
            }

            // b's inserts do not consume a's output
            (op_a, Some(Operation::Insert(text))) => {
                composed.push(Operation::Insert(text));
                if let Some(op) = op_a {
                    next_a.put_back(op);
                }
            }

            (Some(Operation::Retain(x)), Some(Operation::Retain(y))) => {
                composed.push(Operation::Retain(x.min(y)));
                put_back_rest(&mut next_a, &mut next_b, x, y, Operation::Retain, Operation::Retain);
            }

            (Some(Operation::Retain(x)), Some(Operation::Delete(y))) => {
                composed.push(Operation::Delete(x.min(y)));
                put_back_rest(&mut next_a, &mut next_b, x, y, Operation::Retain, Operation::Delete);
            }

            (Some(Operation::Insert(text)), Some(Operation::Retain(y))) => {
                let len = text.chars().count();
                match len.cmp(&y) {
                    Ordering::Greater => {
                        let (kept, rest) = split_chars(&text, y);
                        composed.push(Operation::Insert(kept));
                        next_a.put_back(Operation::Insert(rest));
                    }
                    _ => {
                        composed.push(Operation::Insert(text));
                        next_b.put_back(Operation::Retain(y - len));
                    }
                }
            }

            // deleting freshly inserted text cancels it out
            (Some(Operation::Insert(text)), Some(Operation::Delete(y))) => {
                let len = text.chars().count();
                match len.cmp(&y) {
                    Ordering::Greater => {
                        let (_, rest) = split_chars(&text, y);
                        next_a.put_back(Operation::Insert(rest));
                    }
                    _ => next_b.put_back(Operation::Delete(y - len)),
                }
            }

            // unreachable once the lengths agree
            (None, Some(_)) | (Some(_), None) => {
                return Err(OtError::Coverage { expected, covered });
            }
        }
    }

    Ok(composed)
}

/// Push back whatever is left of two count operations after consuming the
/// shorter of both
pub(crate) fn put_back_rest(
    next_a: &mut Cursor<'_>,
    next_b: &mut Cursor<'_>,
    x: usize,
    y: usize,
    rest_a: fn(usize) -> Operation,
    rest_b: fn(usize) -> Operation,
) {
    match x.cmp(&y) {
        Ordering::Greater => next_a.put_back(rest_a(x - y)),
        Ordering::Less => next_b.put_back(rest_b(y - x)),
        Ordering::Equal => {}
    }
}
