#![warn(missing_docs)]
//! Rich-text operational transformation: deltas with attributes, composable
//! and transformable, wire-compatible with the Quill-style `{"ops": [...]}`
//! JSON shape.
//!
//! Operational Transformation (OT) enables real-time collaborative editing:
//! two (or more) users edit the same document at the same time, and an
//! OT-capable server transforms and broadcasts their changes so everyone
//! converges on the same state, even in the presence of severe latency.
//!
//! A [`Delta`] describes an edit as a series of insert, retain and delete
//! operations. A delta that only inserts is also the canonical form of a
//! document itself, so documents and edits share one representation and one
//! algebra: [`Compose`] folds two consecutive edits (or a document and an
//! edit) into one, and [`Transform`] rewrites one of two concurrent edits so
//! it can apply after the other.
//!
//! # Usage
//!
//! ```
//! use weft::{Compose, Delta, Transform};
//!
//! let before = Delta::new().insert("Hello World", None);
//!
//! let alice = Delta::new().retain(5, None).insert(",", None).retain(6, None);
//! let bob = Delta::new().retain(11, None).insert("!", None);
//!
//! assert_eq!(
//!     before
//!         .clone()
//!         .compose(alice.clone())
//!         .unwrap()
//!         .compose(alice.clone().transform(bob.clone(), true))
//!         .unwrap(),
//!     before
//!         .compose(bob.clone())
//!         .unwrap()
//!         .compose(bob.transform(alice, false))
//!         .unwrap(),
//! );
//! ```
//!
//! Text lengths and split points are measured in UTF-16 code units, matching
//! the wire format. Composing two deltas whose lengths don't line up is a
//! caller error and is reported as [`IncompatibleDeltas`].

pub mod attributes;
mod compose;
mod delta;
mod iter;
mod op;
pub mod ops;
mod text;
mod transform;

pub use attributes::{Attributes, Value};
pub use compose::{Compose, IncompatibleDeltas};
pub use delta::Delta;
pub use iter::Iter;
pub use op::Op;
pub use text::{Content, Len, Text};
pub use transform::Transform;
