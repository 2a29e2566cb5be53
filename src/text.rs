//! The value side of an edit: lengths, text measured in UTF-16 code units and
//! the text-or-embed payload of insert operations.

use std::fmt;

use arbitrary::Arbitrary;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Implemented by types that have a length, measured in the units the wire
/// format counts: UTF-16 code units for text, one unit per embed code.
pub trait Len {
    /// Should return the exact length of the receiver.
    fn len(&self) -> usize;

    /// Returns `true` iff [`len`](Len::len) is zero.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A run of text, stored as UTF-16 code units.
///
/// Lengths and slice windows are defined in UTF-16 code units, so a lock-step
/// slice may land inside a surrogate pair. A code-unit buffer can hold the
/// torn halves, and they re-join losslessly when adjacent runs coalesce.
/// [`Display`](fmt::Display) and serialisation replace a torn half that never
/// re-joined with U+FFFD.
#[derive(Arbitrary, Clone, Debug, Default, PartialEq, Eq)]
pub struct Text(Vec<u16>);

impl Text {
    /// Returns a new empty run of text.
    pub fn new() -> Text {
        Text(Vec::new())
    }

    /// Returns a copy of at most `len` code units starting at `offset`, both
    /// clamped to the end of the run.
    pub fn slice(&self, offset: usize, len: usize) -> Text {
        let start = offset.min(self.0.len());
        let end = offset.saturating_add(len).min(self.0.len());

        Text(self.0[start..end].to_vec())
    }

    /// Concatenates `other` onto the end of this run.
    pub(crate) fn append(&mut self, other: Text) {
        self.0.extend(other.0);
    }
}

impl Len for Text {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Text {
        Text(value.encode_utf16().collect())
    }
}

impl From<String> for Text {
    fn from(value: String) -> Text {
        Text::from(value.as_str())
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf16_lossy(&self.0))
    }
}

impl Serialize for Text {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&String::from_utf16_lossy(&self.0))
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Text, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Text::from(String::deserialize(deserializer)?))
    }
}

/// Payload of an insert operation: a run of text or a single embed.
#[derive(Arbitrary, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// A run of text.
    Text(Text),

    /// An embed, identified by a non-negative code. Embeds occupy exactly
    /// one unit and never split.
    Code(u32),
}

impl Default for Content {
    fn default() -> Content {
        Content::Text(Text::new())
    }
}

impl Content {
    /// Returns a copy of at most `len` units starting at `offset`. Text
    /// slices at any code unit; an embed is atomic and is returned whole
    /// whenever the window is non-empty.
    pub fn slice(&self, offset: usize, len: usize) -> Content {
        match self {
            Content::Text(text) => Content::Text(text.slice(offset, len)),
            Content::Code(_) if len == 0 => Content::Text(Text::new()),
            Content::Code(code) => Content::Code(*code),
        }
    }
}

impl Len for Content {
    fn len(&self) -> usize {
        match self {
            Content::Text(text) => text.len(),
            Content::Code(_) => 1,
        }
    }
}
