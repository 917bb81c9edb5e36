//! Selectors: node discovery, decoupled from what is done with the nodes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::dom::{NodeId, Pattern};
use crate::error::Result;
use crate::page::Page;

use super::Operation;

/// Maps a downstream [`Operation`] to one that first discovers nodes from
/// its input and then applies the downstream operation to each of them.
///
/// Discovery never mutates the page; only the downstream operation may.
#[derive(Clone)]
pub struct Selector(Rc<dyn Fn(Operation) -> Operation>);

impl Selector {
    pub fn new(f: impl Fn(Operation) -> Operation + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Build the operation that routes discovered nodes into `op`.
    pub fn bind(&self, op: Operation) -> Operation {
        (self.0)(op)
    }

    /// Discover from `node` and apply `op` to every hit.
    pub fn run(&self, page: &mut Page, node: NodeId, op: Operation) -> Result<()> {
        self.bind(op).apply(page, node)
    }

    /// Every node this selector discovers from `node`, in order.
    pub fn collect(&self, page: &mut Page, node: NodeId) -> Result<Vec<NodeId>> {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let sink = hits.clone();
        self.run(
            page,
            node,
            Operation::new(move |_, hit| {
                sink.borrow_mut().push(hit);
                Ok(())
            }),
        )?;
        Ok(hits.take())
    }

    /// Selector backed by a discovery function.
    ///
    /// Hits are computed up front, so a downstream operation that mutates
    /// the tree does not disturb the remaining hits.
    pub(crate) fn from_discovery(
        discover: impl Fn(&Page, NodeId) -> Vec<NodeId> + 'static,
    ) -> Self {
        let discover = Rc::new(discover);
        Self::new(move |op| {
            let discover = discover.clone();
            Operation::new(move |page, node| {
                for hit in discover(page, node) {
                    op.apply(page, hit)?;
                }
                Ok(())
            })
        })
    }

    /// Selects its input unchanged.
    pub fn identity() -> Self {
        Self::new(|op| op)
    }

    /// Selects nothing, ever.
    pub fn none() -> Self {
        Self::new(|_| Operation::noop())
    }

    /// Selector backed by a custom single-node locator.
    pub fn locate_one(locate: impl Fn(&Page, NodeId) -> Option<NodeId> + 'static) -> Self {
        Self::from_discovery(move |page, node| locate(page, node).into_iter().collect())
    }

    /// Selector backed by a custom multi-node locator.
    pub fn locate_many(locate: impl Fn(&Page, NodeId) -> Vec<NodeId> + 'static) -> Self {
        Self::from_discovery(locate)
    }

    /// Union of several selectors: hits of the first, then of the second, and so on.
    pub fn concat(selectors: impl IntoIterator<Item = Selector>) -> Self {
        let selectors: Rc<[Selector]> = selectors.into_iter().collect();
        Self::new(move |op| Operation::all(selectors.iter().map(|s| s.bind(op.clone()))))
    }

    /// Pipe selectors together: hits of stage `i` are the inputs of stage `i + 1`.
    ///
    /// An empty chain is the identity.
    pub fn chain(selectors: impl IntoIterator<Item = Selector>) -> Self {
        let selectors: Rc<[Selector]> = selectors.into_iter().collect();
        Self::new(move |op| {
            selectors
                .iter()
                .rev()
                .fold(op, |downstream, stage| stage.bind(downstream))
        })
    }

    /// Pipe this selector's hits into `next`.
    pub fn then(&self, next: &Selector) -> Self {
        Self::chain([self.clone(), next.clone()])
    }

    /// Only the first hit reaches the downstream operation.
    pub fn first(&self) -> Self {
        let inner = self.clone();
        Self::new(move |op| {
            let inner = inner.clone();
            Operation::new(move |page, node| {
                let fired = Rc::new(Cell::new(false));
                let op = op.clone();
                let gate = Operation::new(move |page, hit| {
                    if fired.replace(true) {
                        return Ok(());
                    }
                    op.apply(page, hit)
                });
                inner.run(page, node, gate)
            })
        })
    }

    /// Call `f` exactly once per input: with the first hit, or with `None`
    /// when nothing was found.
    pub fn or_absent(
        &self,
        f: impl Fn(&mut Page, Option<NodeId>) -> Result<()> + 'static,
    ) -> Operation {
        let inner = self.first();
        Operation::new(move |page, node| {
            let found = Rc::new(Cell::new(None));
            let record = found.clone();
            inner.run(
                page,
                node,
                Operation::new(move |_, hit| {
                    record.set(Some(hit));
                    Ok(())
                }),
            )?;
            f(page, found.get())
        })
    }

    /// Discover nodes, but hand the factory's operation the original input.
    ///
    /// Applied to `root`, this runs `factory(selected)` on `root` for every
    /// node `selected` discovered from `root`.
    pub fn with_base(&self, factory: impl Fn(NodeId) -> Operation + 'static) -> Operation {
        let selector = self.clone();
        let factory = Rc::new(factory);
        Operation::new(move |page, root| {
            let factory = factory.clone();
            selector.run(
                page,
                root,
                Operation::new(move |page, selected| factory(selected).apply(page, root)),
            )
        })
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selector(..)")
    }
}

/// First descendant matching `pattern`; nothing if there is none.
pub fn match_first_descendant(pattern: &str) -> Result<Selector> {
    let pattern = Pattern::parse(pattern)?;
    Ok(Selector::from_discovery(move |page, node| {
        let hit = page.query_first(node, &pattern);
        if hit.is_none() {
            log::debug!("no match for {pattern:?} under {node}");
        }
        hit.into_iter().collect()
    }))
}

/// The input itself if it matches `pattern`, else its first matching descendant.
pub fn match_self_or_first_descendant(pattern: &str) -> Result<Selector> {
    let pattern = Pattern::parse(pattern)?;
    Ok(Selector::from_discovery(move |page, node| {
        if page.matches(node, &pattern) {
            return vec![node];
        }
        let hit = page.query_first(node, &pattern);
        if hit.is_none() {
            log::debug!("no match for {pattern:?} at or under {node}");
        }
        hit.into_iter().collect()
    }))
}

/// Every descendant matching `pattern`, in document order.
pub fn match_all_descendants(pattern: &str) -> Result<Selector> {
    let pattern = Pattern::parse(pattern)?;
    Ok(Selector::from_discovery(move |page, node| {
        page.query_all(node, &pattern)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Operation, Rc<RefCell<Vec<NodeId>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let op = Operation::new(move |_, node| {
            sink.borrow_mut().push(node);
            Ok(())
        });
        (op, seen)
    }

    fn ids(page: &Page, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .map(|&n| page.dom().element_id(n).unwrap_or("?").to_string())
            .collect()
    }

    #[test]
    fn test_first_descendant_soft_miss() {
        let mut page = Page::parse("<p id='a'></p>");
        let root = page.root();
        let (op, seen) = recorder();
        match_first_descendant(".missing")
            .unwrap()
            .run(&mut page, root, op)
            .unwrap();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_self_or_first_descendant_prefers_self() {
        let mut page = Page::parse("<div id='a' class='x'><div id='b' class='x'></div></div>");
        let root = page.root();
        let a = match_first_descendant("#a")
            .unwrap()
            .collect(&mut page, root)
            .unwrap()[0];

        let hits = match_self_or_first_descendant(".x")
            .unwrap()
            .collect(&mut page, a)
            .unwrap();
        assert_eq!(hits, vec![a]);

        let hits = match_first_descendant(".x").unwrap().collect(&mut page, a).unwrap();
        assert_eq!(ids(&page, &hits), ["b"]);
    }

    #[test]
    fn test_chain_feeds_hits_forward() {
        let mut page = Page::parse(
            "<div class='panel'><img id='p1'></div><div class='panel'><img id='p2'></div>",
        );
        let root = page.root();
        let selector = Selector::chain([
            match_all_descendants(".panel").unwrap(),
            match_first_descendant("img").unwrap(),
        ]);
        let hits = selector.collect(&mut page, root).unwrap();
        assert_eq!(ids(&page, &hits), ["p1", "p2"]);
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let mut page = Page::parse("<p></p>");
        let root = page.root();
        let hits = Selector::chain([]).collect(&mut page, root).unwrap();
        assert_eq!(hits, vec![page.root()]);
    }

    #[test]
    fn test_concat_keeps_member_order() {
        let mut page = Page::parse("<i id='i1'></i><b id='b1'></b><i id='i2'></i>");
        let root = page.root();
        let selector = Selector::concat([
            match_all_descendants("b").unwrap(),
            match_all_descendants("i").unwrap(),
        ]);
        let hits = selector.collect(&mut page, root).unwrap();
        assert_eq!(ids(&page, &hits), ["b1", "i1", "i2"]);
    }

    #[test]
    fn test_first_ignores_later_hits() {
        let mut page = Page::parse("<i id='i1'></i><i id='i2'></i>");
        let root = page.root();
        let hits = match_all_descendants("i")
            .unwrap()
            .first()
            .collect(&mut page, root)
            .unwrap();
        assert_eq!(ids(&page, &hits), ["i1"]);

        // The gate resets for each application.
        let again = match_all_descendants("i")
            .unwrap()
            .first()
            .collect(&mut page, root)
            .unwrap();
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn test_or_absent_fires_once() {
        let mut page = Page::parse("<i id='i1'></i><i id='i2'></i>");
        let root = page.root();
        let calls = Rc::new(RefCell::new(Vec::new()));

        for css in ["i", "u"] {
            let sink = calls.clone();
            match_all_descendants(css)
                .unwrap()
                .or_absent(move |_, hit| {
                    sink.borrow_mut().push(hit.is_some());
                    Ok(())
                })
                .apply(&mut page, root)
                .unwrap();
        }
        assert_eq!(*calls.borrow(), vec![true, false]);
    }

    #[test]
    fn test_with_base_threads_root() {
        let mut page = Page::parse("<a id='l1'></a><a id='l2'></a>");
        let root = page.root();
        let pairs = Rc::new(RefCell::new(Vec::new()));
        let sink = pairs.clone();

        let op = match_all_descendants("a").unwrap().with_base(move |selected| {
            let sink = sink.clone();
            Operation::new(move |_, base| {
                sink.borrow_mut().push((selected, base));
                Ok(())
            })
        });
        op.apply(&mut page, root).unwrap();

        let pairs = pairs.borrow();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|&(_, base)| base == root));
        assert!(pairs.iter().all(|&(selected, _)| selected != root));
    }

    #[test]
    fn test_all_descendants_survives_removal() {
        let mut page = Page::parse("<nav><nav></nav></nav><nav></nav>");
        let root = page.root();
        match_all_descendants("nav")
            .unwrap()
            .run(&mut page, root, Operation::new(|page, node| {
                // The nested nav is already detached along with its parent.
                if page.dom().is_attached(node) {
                    page.remove(node)?;
                }
                Ok(())
            }))
            .unwrap();
        assert!(page.dom().find_by_tag("nav").is_none());
    }

    #[test]
    fn test_none_selects_nothing() {
        let mut page = Page::parse("<p></p>");
        let root = page.root();
        assert!(Selector::none().collect(&mut page, root).unwrap().is_empty());
    }
}
