use std::cmp::min;

use super::attributes::Attributes;
use super::ops::{Delete, Retain};
use super::text::Len;
use super::{Delta, Op};

/// Implemented by types that can transform another operation to make them
/// behave commutatively (i.e. order-independent).
///
/// At the delta level, inserts are handled before anything is paired up:
/// the receiver's inserts (Alice, already applied from the caller's
/// viewpoint) become retains the other side (Bob) steps over, and Bob's
/// inserts pass through, with `priority` breaking the tie when both insert
/// at the same position. Only retains and deletes ever meet in lock-step,
/// sliced to a common length:
///
/// | lock-step | Retain                         | Delete        |
/// |:----------|:-------------------------------|:--------------|
/// | Retain    | retain, attributes transformed | delete passes |
/// | Delete    | nothing                        | nothing       |
pub trait Transform<Rhs> {
    /// Output type that transforming another value with the receiver
    /// produces.
    type Output;

    /// Transforms the given value with the receiver.
    fn transform(self, rhs: Rhs, priority: bool) -> Self::Output;
}

/// Alice and Bob are both retaining the same range; Bob keeps his retain
/// with his attribute updates transformed against Alice's.
impl Transform<Retain> for Retain {
    type Output = Retain;

    fn transform(self, rhs: Retain, priority: bool) -> Self::Output {
        Retain {
            retain: rhs.retain,
            attributes: Attributes::transform(self.attributes, rhs.attributes, priority),
        }
    }
}

/// Alice is retaining the range that Bob deletes. His delete still applies.
impl Transform<Delete> for Retain {
    type Output = Delete;

    fn transform(self, rhs: Delete, _priority: bool) -> Self::Output {
        rhs
    }
}

/// Alice deleted the range that Bob is retaining. There is nothing left for
/// Bob to retain.
impl Transform<Retain> for Delete {
    type Output = Delete;

    fn transform(self, _rhs: Retain, _priority: bool) -> Self::Output {
        Default::default()
    }
}

/// Alice and Bob deleted the same range. Alice's delete has already been
/// applied, so Bob's is void.
impl Transform<Delete> for Delete {
    type Output = Delete;

    fn transform(self, _rhs: Delete, _priority: bool) -> Self::Output {
        Default::default()
    }
}

impl Transform<Op> for Op {
    type Output = Op;

    /// Transforms one lock-step pair of equal-length fragments. Inserts on
    /// either side are handled before the lock-step, so only retains and
    /// deletes can meet here.
    fn transform(self, rhs: Op, priority: bool) -> Self::Output {
        match (self, rhs) {
            (Op::Retain(lhs), Op::Retain(rhs)) => lhs.transform(rhs, priority).into(),
            (Op::Retain(lhs), Op::Delete(rhs)) => lhs.transform(rhs, priority).into(),
            (Op::Delete(lhs), Op::Retain(rhs)) => lhs.transform(rhs, priority).into(),
            (Op::Delete(lhs), Op::Delete(rhs)) => lhs.transform(rhs, priority).into(),
            (lhs, rhs) => unreachable!("lock-step transformed {:?} with {:?}", lhs, rhs),
        }
    }
}

impl Transform<Delta> for Delta {
    type Output = Delta;

    /// Returns `rhs` rewritten to apply after the receiver, given that both
    /// were made against the same base document. `priority = true` means the
    /// receiver wins when both insert at the same position.
    fn transform(self, rhs: Delta, priority: bool) -> Self::Output {
        let mut left = self.into_iter();
        let mut right = rhs.into_iter();

        let mut result = Delta::new();

        loop {
            // our insert lands first when we have priority or the other
            // side isn't inserting; the other side steps over it (this also
            // covers our trailing inserts, which the other side must still
            // step over for the result to span our whole target)
            if matches!(left.peek(), Some(Op::Insert(_)))
                && (priority || !matches!(right.peek(), Some(Op::Insert(_))))
            {
                if let Some(Op::Insert(insert)) = left.next() {
                    result.push(insert.as_retain().into());
                }
                continue;
            }

            // the other side's insert lands first and passes through
            if matches!(right.peek(), Some(Op::Insert(_))) {
                result.extend(right.next());
                continue;
            }

            match (left.peek_len(), right.peek_len()) {
                (Some(left_len), Some(right_len)) => {
                    let len = min(left_len, right_len);

                    if let (Some(a), Some(b)) =
                        (crate::Iter::take(&mut left, len), crate::Iter::take(&mut right, len))
                    {
                        result.push(a.transform(b, priority));
                    }
                }
                // our trailing retains and deletes touch content the other
                // side has no operations left for
                (Some(_), None) => {
                    let _ = left.next();
                }
                // the other side's trailing operations apply to content we
                // never touched
                (None, Some(_)) => result.extend(right.next()),
                (None, None) => break,
            }
        }

        result
    }
}

impl Transform<usize> for &Delta {
    type Output = usize;

    /// Transforms a caret position against this delta: deletions before the
    /// caret pull it left (clipped at the deletion's start when it straddles
    /// the caret), insertions before it push it right, and an insertion
    /// exactly at the caret pushes it right only when the caret yields
    /// (`priority = false`).
    fn transform(self, rhs: usize, priority: bool) -> Self::Output {
        let mut index = rhs;
        let mut offset = 0;

        for op in self.ops() {
            if offset > rhs {
                break;
            }

            match op {
                Op::Insert(insert) => {
                    if offset < index || !priority {
                        index += insert.len();
                    }

                    offset += insert.len();
                }
                Op::Retain(retain) => {
                    offset += retain.len();
                }
                Op::Delete(delete) => {
                    index -= min(delete.len(), index.saturating_sub(offset));
                }
            }
        }

        index
    }
}
