use std::cmp::min;

use thiserror::Error;

use super::attributes::Attributes;
use super::ops::{Delete, Insert, Retain};
use super::{Delta, Op};

/// Raised when two deltas do not describe consecutive edits of the same
/// document: the left delta produces a document of one length and the right
/// delta expects a base of another.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("cannot compose deltas: left target length {left_target} != right base length {right_base}")]
pub struct IncompatibleDeltas {
    /// Target length of the left (earlier) delta.
    pub left_target: usize,

    /// Base length of the right (later) delta.
    pub right_base: usize,
}

/// Implemented by types that can apply a series of operations in sequence.
///
/// At the delta level, inserts on the right and deletes on the left pass
/// through before anything is paired up; only the remaining combinations
/// ever meet in lock-step, sliced to a common length:
///
/// | lock-step | Retain                    | Delete      |
/// |:----------|:--------------------------|:------------|
/// | Insert    | insert, attributes merged | both cancel |
/// | Retain    | retain, attributes merged | delete      |
pub trait Compose<Rhs> {
    /// Output type that applying a series of operations to this type
    /// produces.
    type Output;

    /// Applies the given series of operations to the receiver and returns
    /// the result.
    fn compose(self, rhs: Rhs) -> Self::Output;
}

impl Compose<Retain> for Insert {
    type Output = Insert;

    fn compose(self, rhs: Retain) -> Self::Output {
        Insert {
            insert: self.insert,
            // fresh content never had the keys a tombstone clears
            attributes: Attributes::compose(self.attributes, rhs.attributes, false),
        }
    }
}

impl Compose<Delete> for Insert {
    type Output = Delete;

    fn compose(self, _rhs: Delete) -> Self::Output {
        // the delete consumes the insert unit for unit
        Default::default()
    }
}

impl Compose<Retain> for Retain {
    type Output = Retain;

    fn compose(self, rhs: Retain) -> Self::Output {
        Retain {
            retain: self.retain,
            // tombstones stay live on retained content; a later retain over
            // the same range may still observe them
            attributes: Attributes::compose(self.attributes, rhs.attributes, true),
        }
    }
}

impl Compose<Delete> for Retain {
    type Output = Delete;

    fn compose(self, rhs: Delete) -> Self::Output {
        rhs
    }
}

impl Compose<Op> for Op {
    type Output = Op;

    /// Composes one lock-step pair of equal-length fragments. Deletes on the
    /// left and inserts on the right pass through before the lock-step, so
    /// those pairs cannot occur here.
    fn compose(self, rhs: Op) -> Self::Output {
        match (self, rhs) {
            (Op::Insert(lhs), Op::Retain(rhs)) => lhs.compose(rhs).into(),
            (Op::Insert(lhs), Op::Delete(rhs)) => lhs.compose(rhs).into(),
            (Op::Retain(lhs), Op::Retain(rhs)) => lhs.compose(rhs).into(),
            (Op::Retain(lhs), Op::Delete(rhs)) => lhs.compose(rhs).into(),
            (lhs, rhs) => unreachable!("lock-step composed {:?} with {:?}", lhs, rhs),
        }
    }
}

impl Compose<Delta> for Delta {
    type Output = Result<Delta, IncompatibleDeltas>;

    /// Folds two consecutive deltas into one equivalent delta. The receiver
    /// is the earlier edit; `rhs` applies to the document the receiver
    /// produces, so the receiver's target length must match `rhs`'s base
    /// length.
    fn compose(self, rhs: Delta) -> Self::Output {
        let (left_target, right_base) = (self.target_len(), rhs.base_len());

        if left_target != right_base {
            return Err(IncompatibleDeltas {
                left_target,
                right_base,
            });
        }

        let (base_len, target_len) = (self.base_len(), rhs.target_len());

        let mut left = self.into_iter();
        let mut right = rhs.into_iter();

        let mut result = Delta::new();

        loop {
            // a right-hand insert applies to content the left delta never
            // touches and goes first
            if matches!(right.peek(), Some(Op::Insert(_))) {
                result.extend(right.next());
                continue;
            }

            // a left-hand delete removed content the right delta never saw
            if matches!(left.peek(), Some(Op::Delete(_))) {
                result.extend(left.next());
                continue;
            }

            match (left.peek_len(), right.peek_len()) {
                (Some(left_len), Some(right_len)) => {
                    let len = min(left_len, right_len);

                    if let (Some(a), Some(b)) =
                        (crate::Iter::take(&mut left, len), crate::Iter::take(&mut right, len))
                    {
                        result.push(a.compose(b));
                    }
                }
                // with matching lengths only left deletes or right inserts
                // can remain, and both passed through above; ragged input
                // drains as-is
                (Some(_), None) => result.extend(left.next()),
                (None, Some(_)) => result.extend(right.next()),
                (None, None) => break,
            }
        }

        debug_assert_eq!(result.base_len(), base_len, "compose changed the base length");
        debug_assert_eq!(
            result.target_len(),
            target_len,
            "compose changed the target length"
        );

        Ok(result)
    }
}
