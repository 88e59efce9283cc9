//! Document mutation events.
//!
//! Every change to the shape collection is recorded as an event, drained and
//! processed synchronously in emission order by whoever mirrors the document
//! (the mini-map). There is no batching or coalescing.

use crate::shapes::ShapeId;

/// A mutation of the document's shape collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A shape was added.
    ShapeAdded(ShapeId),
    /// A shape was removed.
    ShapeRemoved(ShapeId),
    /// A shape's geometry or style changed.
    ShapeModified(ShapeId),
    /// All shapes were removed at once.
    Cleared,
}
