//! Operation: a single step of an edit script
//!
//! An edit script walks a document from start to end. Each step either keeps
//! existing units, removes them, or adds new text at the current position.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single edit step
///
/// Units are Unicode scalar values; the implicit newline between two lines
/// counts as one unit.
///
/// # Wire format
///
/// Operations serialize as bare values: a positive integer retains, a
/// negative integer deletes and a string inserts.
///
/// ```rust
/// use synckit_ot::Operation;
///
/// let ops = vec![
///     Operation::Retain(2),
///     Operation::Delete(3),
///     Operation::Insert("hi".to_string()),
/// ];
/// assert_eq!(serde_json::to_string(&ops).unwrap(), r#"[2,-3,"hi"]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Advance past `n` existing units unchanged
    Retain(usize),

    /// Remove the next `n` existing units
    Delete(usize),

    /// Insert text at the current position
    Insert(String),
}

impl Operation {
    /// Create an insert operation
    pub fn insert(text: impl Into<String>) -> Self {
        Operation::Insert(text.into())
    }

    /// Check whether this operation has no effect
    ///
    /// Zero counts and empty inserts are dropped during normalization.
    pub fn is_noop(&self) -> bool {
        match self {
            Operation::Retain(n) | Operation::Delete(n) => *n == 0,
            Operation::Insert(text) => text.is_empty(),
        }
    }

    /// Number of units this operation spans
    ///
    /// For inserts this is the number of characters added.
    pub fn len(&self) -> usize {
        match self {
            Operation::Retain(n) | Operation::Delete(n) => *n,
            Operation::Insert(text) => text.chars().count(),
        }
    }

    /// Whether this operation spans zero units
    pub fn is_empty(&self) -> bool {
        self.is_noop()
    }

    /// Number of base document units consumed
    pub fn input_len(&self) -> usize {
        match self {
            Operation::Retain(n) | Operation::Delete(n) => *n,
            Operation::Insert(_) => 0,
        }
    }

    /// Number of resulting document units produced
    pub fn output_len(&self) -> usize {
        match self {
            Operation::Retain(n) => *n,
            Operation::Delete(_) => 0,
            Operation::Insert(text) => text.chars().count(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Retain(n) => write!(f, "retain({})", n),
            Operation::Delete(n) => write!(f, "delete({})", n),
            Operation::Insert(text) => write!(f, "insert({:?})", text),
        }
    }
}

impl Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Operation::Retain(n) => serializer.serialize_i64(count_to_i64::<S::Error>(*n)?),
            Operation::Delete(n) => serializer.serialize_i64(-count_to_i64::<S::Error>(*n)?),
            Operation::Insert(text) => serializer.serialize_str(text),
        }
    }
}

fn count_to_i64<E: serde::ser::Error>(n: usize) -> Result<i64, E> {
    i64::try_from(n).map_err(|_| E::custom(format!("operation count {} too large", n)))
}

struct OperationVisitor;

impl<'de> Visitor<'de> for OperationVisitor {
    type Value = Operation;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer count or an insert string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Operation, E> {
        let count = usize::try_from(v.unsigned_abs())
            .map_err(|_| E::custom(format!("operation count {} too large", v)))?;
        if v < 0 {
            Ok(Operation::Delete(count))
        } else {
            Ok(Operation::Retain(count))
        }
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Operation, E> {
        let count = usize::try_from(v)
            .map_err(|_| E::custom(format!("operation count {} too large", v)))?;
        Ok(Operation::Retain(count))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Operation, E> {
        Ok(Operation::Insert(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Operation, E> {
        Ok(Operation::Insert(v))
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OperationVisitor)
    }
}
