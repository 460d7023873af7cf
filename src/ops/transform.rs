//! Transform: rewrite two concurrent edit scripts against each other

use super::compose::put_back_rest;
use super::operation::Operation;
use super::sequence::{Cursor, OperationSequence};
use crate::error::{OtError, Result};

/// Transform two concurrent sequences
///
/// `a` and `b` both cover the same base document. Returns `(a′, b′)` where
/// `a′` is `a` rewritten to apply after `b`, and `b′` is `b` rewritten to
/// apply after `a`:
///
/// ```text
/// apply(apply(d, a), b′) == apply(apply(d, b), a′)
/// ```
///
/// Inserts are carried into both outputs (as a retain on the side that did
/// not insert). When both sides insert at the same base position, the
/// insert of `a` (the first argument) is placed first in both outputs.
/// Regions deleted by both sides are deleted only once.
///
/// # Errors
///
/// - `OtError::Coverage` if `a` and `b` do not cover documents of the same
///   size
/// - `OtError::Overflow` if either length exceeds `usize::MAX`
///
/// # Example
///
/// ```rust
/// use synckit_ot::{transform, Document, OperationSequence};
///
/// let a = OperationSequence::new().retain(1).insert("tag").retain(2);
/// let b = OperationSequence::new().retain(1).delete(2);
/// let (a1, b1) = transform(&a, &b).unwrap();
///
/// let mut left = Document::from("abc");
/// left.apply(&a).unwrap();
/// left.apply(&b1).unwrap();
///
/// let mut right = Document::from("abc");
/// right.apply(&b).unwrap();
/// right.apply(&a1).unwrap();
///
/// assert_eq!(left.to_string(), "atag");
/// assert_eq!(left.to_string(), right.to_string());
/// ```
pub fn transform(
    a: &OperationSequence,
    b: &OperationSequence,
) -> Result<(OperationSequence, OperationSequence)> {
    let (expected, _) = a.lengths()?;
    let (covered, _) = b.lengths()?;
    if expected != covered {
        return Err(OtError::Coverage { expected, covered });
    }

    let mut a_prime = OperationSequence::new();
    let mut b_prime = OperationSequence::new();
    let mut next_a = Cursor::new(a);
    let mut next_b = Cursor::new(b);

    loop {
        match (next_a.next(), next_b.next()) {
            (None, None) => break,

            // first argument wins ties between inserts
            (Some(Operation::Insert(text)), op_b) => {
                b_prime.push(Operation::Retain(text.chars().count()));
                a_prime.push(Operation::Insert(text));
                if let Some(op) = op_b {
                    next_b.put_back(op);
                }
            }

            (op_a, Some(Operation::Insert(text))) => {
                a_prime.push(Operation::Retain(text.chars().count()));
                b_prime.push(Operation::Insert(text));
                if let Some(op) = op_a {
                    next_a.put_back(op);
                }
            }

            (Some(Operation::Retain(x)), Some(Operation::Retain(y))) => {
                let n = x.min(y);
                a_prime.push(Operation::Retain(n));
                b_prime.push(Operation::Retain(n));
                put_back_rest(&mut next_a, &mut next_b, x, y, Operation::Retain, Operation::Retain);
            }

            // both removed the overlap already
            (Some(Operation::Delete(x)), Some(Operation::Delete(y))) => {
                put_back_rest(&mut next_a, &mut next_b, x, y, Operation::Delete, Operation::Delete);
            }

            (Some(Operation::Delete(x)), Some(Operation::Retain(y))) => {
                a_prime.push(Operation::Delete(x.min(y)));
                put_back_rest(&mut next_a, &mut next_b, x, y, Operation::Delete, Operation::Retain);
            }

            (Some(Operation::Retain(x)), Some(Operation::Delete(y))) => {
                b_prime.push(Operation::Delete(x.min(y)));
                put_back_rest(&mut next_a, &mut next_b, x, y, Operation::Retain, Operation::Delete);
            }

            // unreachable once the lengths agree
            (None, Some(_)) | (Some(_), None) => {
                return Err(OtError::Coverage { expected, covered });
            }
        }
    }

    Ok((a_prime, b_prime))
}
