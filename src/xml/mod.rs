//! XML output layer.
//!
//! - [`ElementWriter`]: open/text/close contract the feed model writes through
//! - [`XmlWriter`]: in-memory `quick-xml` implementation
//! - [`Attributes`]: ordered attribute map with last-write-wins inserts
//! - [`Publish`]: implemented by every node of the feed graph

mod attributes;
mod writer;

pub use attributes::Attributes;
pub use writer::{ElementWriter, XmlWriter};

use crate::error::FeedError;

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// A node of the feed graph that knows how to write itself.
///
/// Implemented only by the types in this crate; user-defined extensions go
/// through [`CustomExtension`](crate::extension::CustomExtension) instead.
pub trait Publish: Sealed {
    /// Writes this node, and recursively its children, in their fixed order.
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError>;
}
