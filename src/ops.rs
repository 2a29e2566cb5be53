//! Types that represent the insert, retain and delete operations of a
//! [`Delta`](super::Delta).

use arbitrary::Arbitrary;
use serde::{Deserialize, Serialize};

use super::attributes::Attributes;
use super::text::{Content, Len};

/// Represents an operation that inserts content with optional attributes.
///
/// The field names are the wire contract: an insert serialises as
/// `{"insert": "text"}` or `{"insert": code}`, with `attributes` present only
/// when the map is non-empty.
#[derive(Arbitrary, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insert {
    /// The content this operation inserts: a run of text or an embed code.
    pub insert: Content,

    /// Attributes applied to the inserted content. Freshly inserted content
    /// never carries tombstones; composition strips them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Insert {
    /// Returns a retain spanning this insert's content, used when another
    /// edit has to step over it.
    pub fn as_retain(&self) -> Retain {
        Retain {
            retain: self.len(),
            attributes: None,
        }
    }

    /// Coalesces `other` onto the end of this insert if both are text runs
    /// with the same attributes. Embeds are atomic and never merge. Returns
    /// `other` back when the two don't coalesce.
    pub(crate) fn coalesce(&mut self, other: Insert) -> Option<Insert> {
        match (&mut self.insert, other) {
            (
                Content::Text(text),
                Insert {
                    insert: Content::Text(tail),
                    ref attributes,
                },
            ) if self.attributes == *attributes => {
                text.append(tail);
                None
            }
            (_, other) => Some(other),
        }
    }
}

impl Len for Insert {
    fn len(&self) -> usize {
        self.insert.len()
    }
}

/// Represents an operation that retains content and optionally updates its
/// attributes.
#[derive(Arbitrary, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retain {
    /// The number of units to retain.
    pub retain: usize,

    /// Attribute updates applied to the retained range. A
    /// [`Value::Null`](super::Value::Null) entry is a tombstone that clears
    /// its key; `None` leaves the range untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Len for Retain {
    fn len(&self) -> usize {
        self.retain
    }
}

/// Represents an operation that deletes content.
#[derive(Arbitrary, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delete {
    /// The number of units to delete.
    pub delete: usize,
}

impl Len for Delete {
    fn len(&self) -> usize {
        self.delete
    }
}

#[cfg(test)]
mod tests {
    use crate::Text;

    use super::{Attributes, Content, Insert};

    fn text_insert(text: &str, attributes: Option<Attributes>) -> Insert {
        Insert {
            insert: Content::Text(Text::from(text)),
            attributes,
        }
    }

    #[test]
    fn test_coalesce_same_attributes() {
        let mut insert = text_insert("ab", None);

        assert_eq!(insert.coalesce(text_insert("cd", None)), None);
        assert_eq!(insert, text_insert("abcd", None));
    }

    #[test]
    fn test_coalesce_different_attributes() {
        let bold = Attributes::new().with("bold", true);
        let mut insert = text_insert("ab", None);

        assert_eq!(
            insert.coalesce(text_insert("cd", Some(bold.clone()))),
            Some(text_insert("cd", Some(bold))),
        );
        assert_eq!(insert, text_insert("ab", None));
    }

    #[test]
    fn test_coalesce_never_merges_embeds() {
        let mut insert = Insert {
            insert: Content::Code(0),
            attributes: None,
        };

        assert_eq!(
            insert.coalesce(text_insert("ab", None)),
            Some(text_insert("ab", None)),
        );
    }
}
