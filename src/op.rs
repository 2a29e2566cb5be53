use arbitrary::Arbitrary;
use serde::{Deserialize, Serialize};

use super::ops::{Delete, Insert, Retain};
use super::text::Len;

/// Individual insert, retain or delete operation.
///
/// The wire form is untagged: each operation is an object with exactly one of
/// the keys `insert`, `retain` or `delete`, plus an optional `attributes`.
/// Slicing an operation into fragments is the job of [`Iter`](crate::Iter);
/// an `Op` itself is immutable once built.
#[derive(Arbitrary, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Op {
    /// Represents an insert-operation with content and optional attributes.
    /// [Click here](Insert) to read more about insert operations.
    Insert(Insert),

    /// Represents a retain-operation with a length and optional attributes.
    /// [Click here](Retain) to read more about retain operations.
    Retain(Retain),

    /// Represents a delete-operation with a length. [Click here](Delete) to
    /// read more about delete operations.
    Delete(Delete),
}

impl Len for Op {
    fn len(&self) -> usize {
        match self {
            Self::Insert(insert) => insert.len(),
            Self::Retain(retain) => retain.len(),
            Self::Delete(delete) => delete.len(),
        }
    }
}

impl From<Insert> for Op {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}

impl From<Retain> for Op {
    fn from(value: Retain) -> Self {
        Self::Retain(value)
    }
}

impl From<Delete> for Op {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
