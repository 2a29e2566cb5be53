use arbitrary::Arbitrary;
use serde::{Deserialize, Deserializer, Serialize};

use super::attributes::Attributes;
use super::ops::{Delete, Insert, Retain};
use super::text::{Content, Len, Text};
use super::{Iter, Op};

/// Series of insert, retain and delete operations describing the change from
/// a base document to a target document.
///
/// A delta that consumes no base content (all inserts) has nothing left to
/// change and *is* a document: the canonical representation of rich-text
/// content. Serialisation follows the `{"ops": [...]}` wire shape.
#[derive(Arbitrary, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Delta {
    ops: Vec<Op>,
}

impl Delta {
    /// Returns a new empty delta (i.e. an empty series of operations).
    pub fn new() -> Delta {
        Delta {
            ops: Default::default(),
        }
    }

    /// Returns a new delta with one text-insert operation with the given
    /// content and optional attributes. Pass `None` if you don't want this
    /// operation to carry any attributes.
    pub fn insert(mut self, text: impl Into<Text>, attributes: impl Into<Option<Attributes>>) -> Self {
        self.push(Op::Insert(Insert {
            insert: Content::Text(text.into()),
            attributes: attributes.into(),
        }));

        self
    }

    /// Returns a new delta with one embed-insert operation with the given
    /// code and optional attributes. Embeds occupy a single unit and are
    /// atomic.
    pub fn insert_code(mut self, code: u32, attributes: impl Into<Option<Attributes>>) -> Self {
        self.push(Op::Insert(Insert {
            insert: Content::Code(code),
            attributes: attributes.into(),
        }));

        self
    }

    /// Returns a new delta that retains the given number of units,
    /// optionally updating their attributes. Pass `None` if you don't want
    /// this operation to affect any attributes.
    pub fn retain(mut self, retain: usize, attributes: impl Into<Option<Attributes>>) -> Self {
        self.push(Op::Retain(Retain {
            retain,
            attributes: attributes.into(),
        }));

        self
    }

    /// Returns a new delta that deletes the given number of units.
    pub fn delete(mut self, delete: usize) -> Self {
        self.push(Op::Delete(Delete { delete }));
        self
    }

    pub(crate) fn ops(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }

    /// The number of units of the base document this delta consumes: the sum
    /// of its retain and delete lengths.
    pub fn base_len(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Insert(_) => 0,
                Op::Retain(retain) => retain.len(),
                Op::Delete(delete) => delete.len(),
            })
            .sum()
    }

    /// The number of units of the target document this delta produces: the
    /// sum of its retain and insert lengths.
    pub fn target_len(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Insert(insert) => insert.len(),
                Op::Retain(retain) => retain.len(),
                Op::Delete(_) => 0,
            })
            .sum()
    }

    /// Returns `true` iff this delta consumes no base content, i.e. it is a
    /// document.
    pub fn is_document(&self) -> bool {
        self.base_len() == 0
    }

    /// Appends the given operation to this series, coalescing where
    /// possible: adjacent operations of the same kind with equal (or equally
    /// absent) attributes merge into one, an insert slots in front of a
    /// directly preceding delete (deleting before or after inserting at the
    /// same position is the same edit, and the insert-first order is the
    /// canonical one), and zero-length operations are dropped. Embeds never
    /// merge.
    ///
    /// Keep in mind that this is different from [`Compose`](crate::Compose):
    /// pushing a [`Delete`] onto a delta literally adds that operation to
    /// the sequence (as opposed to applying it).
    pub fn push(&mut self, mut op: Op) {
        if op.len() == 0 {
            return;
        }

        // an empty attribute map means "no attributes" and the two must be
        // indistinguishable from here on
        if let Op::Insert(Insert { attributes, .. }) | Op::Retain(Retain { attributes, .. }) =
            &mut op
        {
            if attributes.as_ref().is_some_and(Attributes::is_empty) {
                *attributes = None;
            }
        }

        let Some(last_op) = self.ops.last_mut() else {
            self.ops.push(op);
            return;
        };

        match last_op {
            Op::Insert(last) => match op {
                Op::Insert(insert) => {
                    if let Some(insert) = last.coalesce(insert) {
                        self.ops.push(Op::Insert(insert));
                    }
                }
                Op::Retain(_) | Op::Delete(_) => {
                    self.ops.push(op);
                }
            },
            Op::Retain(last) => match op {
                Op::Retain(Retain { retain, attributes }) if last.attributes == attributes => {
                    last.retain += retain;
                }
                Op::Insert(_) | Op::Retain(_) | Op::Delete(_) => {
                    self.ops.push(op);
                }
            },
            Op::Delete(last) => match op {
                Op::Insert(_) => {
                    if let Some(delete) = self.ops.pop() {
                        self.push(op);
                        self.push(delete);
                    }
                }
                Op::Retain(_) => {
                    self.ops.push(op);
                }
                Op::Delete(Delete { delete }) => {
                    last.delete += delete;
                }
            },
        }
    }

    /// Returns a new delta with the given operation in front of this series,
    /// coalesced with the old head where possible.
    pub fn prepend(self, op: Op) -> Delta {
        let mut delta = Delta::new();
        delta.push(op);
        delta.extend(self.ops);

        delta
    }

    /// Rebuilds this delta through [`push`](Delta::push), coalescing
    /// adjacent operations and dropping zero-length ones. Composition and
    /// transformation already produce coalesced output; this is for deltas
    /// assembled op-by-op elsewhere. Rebuilding an already coalesced delta
    /// returns it unchanged.
    pub fn normalize(self) -> Delta {
        self.ops.into_iter().collect()
    }
}

impl Extend<Op> for Delta {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Op>,
    {
        iter.into_iter().for_each(|op| self.push(op))
    }
}

impl FromIterator<Op> for Delta {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Op>,
    {
        let mut delta = Delta::new();
        delta.extend(iter);
        delta
    }
}

impl IntoIterator for Delta {
    type Item = Op;

    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self.ops)
    }
}

impl<'de> Deserialize<'de> for Delta {
    fn deserialize<D>(deserializer: D) -> Result<Delta, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            ops: Vec<Op>,
        }

        // rebuilding through `push` validates on the way in: zero-length
        // operations are dropped and adjacent equal runs coalesce
        Ok(Wire::deserialize(deserializer)?.ops.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Attributes, Content, Delete, Delta, Insert, Op, Retain, Text};

    fn ops(delta: Delta) -> Vec<Op> {
        delta.into_iter().collect()
    }

    fn text_insert(text: &str, attributes: Option<Attributes>) -> Op {
        Op::Insert(Insert {
            insert: Content::Text(Text::from(text)),
            attributes,
        })
    }

    #[test]
    fn test_push_insert_insert_same() {
        let delta = Delta::new().insert("a", None).insert("b", None);

        assert_eq!(ops(delta), vec![text_insert("ab", None)]);
    }

    #[test]
    fn test_push_insert_insert_diff() {
        let bold = Attributes::new().with("bold", true);
        let delta = Delta::new().insert("a", None).insert("b", bold.clone());

        assert_eq!(
            ops(delta),
            vec![text_insert("a", None), text_insert("b", Some(bold))],
        );
    }

    #[test]
    fn test_push_insert_code_never_merges() {
        let delta = Delta::new()
            .insert_code(0, None)
            .insert_code(0, None)
            .insert("a", None);

        assert_eq!(
            ops(delta),
            vec![
                Op::Insert(Insert {
                    insert: Content::Code(0),
                    attributes: None,
                }),
                Op::Insert(Insert {
                    insert: Content::Code(0),
                    attributes: None,
                }),
                text_insert("a", None),
            ],
        );
    }

    #[test]
    fn test_push_retain_retain_same() {
        let delta = Delta::new().retain(1, None).retain(2, None);

        assert_eq!(
            ops(delta),
            vec![Op::Retain(Retain {
                retain: 3,
                attributes: None,
            })],
        );
    }

    #[test]
    fn test_push_retain_retain_diff() {
        let bold = Attributes::new().with("bold", true);
        let delta = Delta::new().retain(1, None).retain(2, bold.clone());

        assert_eq!(
            ops(delta),
            vec![
                Op::Retain(Retain {
                    retain: 1,
                    attributes: None,
                }),
                Op::Retain(Retain {
                    retain: 2,
                    attributes: Some(bold),
                }),
            ],
        );
    }

    #[test]
    fn test_push_delete_delete() {
        let delta = Delta::new().delete(1).delete(2);

        assert_eq!(ops(delta), vec![Op::Delete(Delete { delete: 3 })]);
    }

    #[test]
    fn test_push_delete_insert_slots_insert_first() {
        let delta = Delta::new().delete(1).insert("a", None);

        assert_eq!(
            ops(delta),
            vec![text_insert("a", None), Op::Delete(Delete { delete: 1 })],
        );
    }

    #[test]
    fn test_push_drops_zero_length() {
        let delta = Delta::new().retain(0, None).insert("", None).delete(0);

        assert_eq!(ops(delta), vec![]);
    }

    #[test]
    fn test_prepend() {
        let delta = Delta::new().retain(2, None).delete(1).prepend(Op::Retain(Retain {
            retain: 3,
            attributes: None,
        }));

        assert_eq!(
            delta,
            Delta::new().retain(5, None).delete(1),
        );
    }

    #[test]
    fn test_lengths() {
        let delta = Delta::new()
            .retain(5, None)
            .insert("abc", None)
            .insert_code(0, None)
            .delete(2);

        assert_eq!(delta.base_len(), 7);
        assert_eq!(delta.target_len(), 9);
        assert!(!delta.is_document());
    }

    #[test]
    fn test_is_document() {
        assert!(Delta::new().is_document());
        assert!(Delta::new().insert("abc", None).insert_code(0, None).is_document());
        assert!(!Delta::new().retain(1, None).is_document());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let delta = Delta::new()
            .retain(1, None)
            .retain(2, None)
            .insert("a", None)
            .insert("b", None)
            .delete(1);
        let normalized = delta.clone().normalize();

        assert_eq!(normalized, delta);
        assert_eq!(normalized.clone().normalize(), normalized);
    }

    #[test]
    fn test_wire_round_trip() {
        let json = concat!(
            r#"{"ops":[{"retain":10},{"insert":"cat","attributes":{"bold":true}},"#,
            r#"{"retain":5,"attributes":{"bold":true}},{"delete":2},"#,
            r#"{"retain":3,"attributes":{"bold":null,"italic":null}}]}"#,
        );

        let delta: Delta = serde_json::from_str(json).unwrap();

        assert_eq!(
            delta,
            Delta::new()
                .retain(10, None)
                .insert("cat", Attributes::new().with("bold", true))
                .retain(5, Attributes::new().with("bold", true))
                .delete(2)
                .retain(
                    3,
                    Attributes::new()
                        .with("bold", crate::Value::Null)
                        .with("italic", crate::Value::Null),
                ),
        );
        assert_eq!(serde_json::to_string(&delta).unwrap(), json);
    }

    #[test]
    fn test_wire_embed_code() {
        let json = r#"{"ops":[{"insert":7},{"insert":"x"}]}"#;
        let delta: Delta = serde_json::from_str(json).unwrap();

        assert_eq!(delta, Delta::new().insert_code(7, None).insert("x", None));
        assert_eq!(serde_json::to_string(&delta).unwrap(), json);
    }

    #[test]
    fn test_wire_attribute_values() {
        let json = r#"{"ops":[{"insert":"a","attributes":{"size":2.5,"src":"x"}}]}"#;
        let delta: Delta = serde_json::from_str(json).unwrap();

        assert_eq!(
            delta,
            Delta::new().insert("a", Attributes::new().with("size", 2.5).with("src", "x")),
        );
        assert_eq!(serde_json::to_string(&delta).unwrap(), json);
    }

    #[test]
    fn test_wire_never_emits_empty_attributes() {
        let delta = Delta::new().retain(1, Attributes::new());

        // an empty map means "no attributes" and stays off the wire
        assert_eq!(
            serde_json::to_string(&delta).unwrap(),
            r#"{"ops":[{"retain":1}]}"#,
        );
    }

    #[test]
    fn test_wire_drops_zero_length_ops() {
        let json = r#"{"ops":[{"retain":0},{"insert":""},{"retain":2},{"retain":3}]}"#;
        let delta: Delta = serde_json::from_str(json).unwrap();

        assert_eq!(delta, Delta::new().retain(5, None));
    }
}
