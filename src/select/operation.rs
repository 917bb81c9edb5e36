//! Operations: side effects applied to a node.

use std::fmt;
use std::rc::Rc;

use crate::dom::NodeId;
use crate::error::Result;
use crate::page::Page;

/// A side effect applied to a node of a page.
///
/// Cloning is cheap; clones share the same underlying function.
#[derive(Clone)]
pub struct Operation(Rc<dyn Fn(&mut Page, NodeId) -> Result<()>>);

impl Operation {
    pub fn new(f: impl Fn(&mut Page, NodeId) -> Result<()> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// An operation that does nothing.
    pub fn noop() -> Self {
        Self::new(|_, _| Ok(()))
    }

    /// Apply this operation to `node`.
    pub fn apply(&self, page: &mut Page, node: NodeId) -> Result<()> {
        (self.0)(page, node)
    }

    /// Run every operation on the same node, in order.
    ///
    /// Operations do not wait on each other: an operation that parks work
    /// until an image loads returns immediately and the next one runs. The
    /// first error stops the batch and is returned.
    pub fn all(operations: impl IntoIterator<Item = Operation>) -> Self {
        let operations: Vec<_> = operations.into_iter().collect();
        Self::new(move |page, node| {
            operations.iter().try_for_each(|op| op.apply(page, node))
        })
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Operation(..)")
    }
}
