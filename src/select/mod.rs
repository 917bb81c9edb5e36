//! The selector/operation algebra.
//!
//! An [`Operation`] is a side effect applied to one node. A [`Selector`]
//! turns an operation into another operation that first discovers nodes
//! from its input, then applies the original operation to each of them.
//! Keeping "which nodes" apart from "what to do" lets every behavior be
//! written as a single pipeline:
//!
//! ```
//! use comic_enhance::page::Page;
//! use comic_enhance::select::{Operation, match_all_descendants};
//!
//! let mut page = Page::parse("<nav>a</nav><main>comic</main><nav>b</nav>");
//! let root = page.root();
//!
//! let remove = Operation::new(|page, node| page.remove(node));
//! match_all_descendants("nav")?.run(&mut page, root, remove)?;
//!
//! assert!(!page.to_html().contains("<nav>"));
//! # Ok::<(), comic_enhance::Error>(())
//! ```
//!
//! A selector that finds nothing simply never calls its operation.

mod complex;
mod operation;
mod selector;

pub use complex::{Builder, ComplexSelector, Locator, auto};
pub use operation::Operation;
pub use selector::{
    Selector, match_all_descendants, match_first_descendant, match_self_or_first_descendant,
};
