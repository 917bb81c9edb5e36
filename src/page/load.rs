//! Single-fire image load signals.
//!
//! Every image settles at most once, either loaded or errored. Continuations
//! waiting on an image run exactly once, on whichever outcome arrives first.

use std::collections::HashMap;

use crate::dom::{ArenaDom, NodeId};
use crate::error::Result;

use super::Page;

/// Terminal outcome of an image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded,
    Errored,
}

/// Current load state of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Settled(LoadOutcome),
}

impl LoadState {
    /// Whether the image has finished, successfully or not.
    pub fn is_complete(self) -> bool {
        matches!(self, LoadState::Settled(_))
    }
}

/// Work to run once an image settles.
pub type LoadContinuation = Box<dyn FnOnce(&mut Page, LoadOutcome) -> Result<()>>;

/// Handle returned by [`Page::watch_image`].
///
/// There is no cancellation: a pending watch either fires once or never.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum LoadWatch {
    /// The image had already settled; the continuation ran immediately.
    Settled(LoadOutcome),
    /// The continuation is parked until the image settles.
    Pending,
}

#[derive(Default)]
struct ImageEntry {
    outcome: Option<LoadOutcome>,
    waiters: Vec<LoadContinuation>,
}

#[derive(Default)]
pub(crate) struct ImageLoads {
    entries: HashMap<NodeId, ImageEntry>,
}

/// Load state before the host has said anything about `node`.
///
/// An `<img>` with a source is loading; anything else has nothing to load.
fn initial_state(dom: &ArenaDom, node: NodeId) -> LoadState {
    let has_source = dom.is_tag(node, "img")
        && dom
            .get_attr(node, "src")
            .is_some_and(|src| !src.trim().is_empty());
    if has_source {
        LoadState::Pending
    } else {
        LoadState::Settled(LoadOutcome::Loaded)
    }
}

impl Page {
    /// Current load state of `node`.
    pub fn load_state(&self, node: NodeId) -> LoadState {
        match self.images.entries.get(&node).and_then(|e| e.outcome) {
            Some(outcome) => LoadState::Settled(outcome),
            None => initial_state(&self.dom, node),
        }
    }

    /// Run `continuation` once `node` settles.
    ///
    /// If it already has, the continuation runs before this returns.
    pub fn watch_image(
        &mut self,
        node: NodeId,
        continuation: impl FnOnce(&mut Page, LoadOutcome) -> Result<()> + 'static,
    ) -> Result<LoadWatch> {
        match self.load_state(node) {
            LoadState::Settled(outcome) => {
                continuation(self, outcome)?;
                Ok(LoadWatch::Settled(outcome))
            }
            LoadState::Pending => {
                self.images
                    .entries
                    .entry(node)
                    .or_default()
                    .waiters
                    .push(Box::new(continuation));
                Ok(LoadWatch::Pending)
            }
        }
    }

    /// Signal that `node` finished loading (or failed to).
    ///
    /// Returns `false` if the image had already settled; only the first
    /// signal counts. Every waiting continuation runs even if an earlier one
    /// fails; the first failure is returned.
    pub fn settle_image(&mut self, node: NodeId, outcome: LoadOutcome) -> Result<bool> {
        if self.load_state(node).is_complete() {
            log::warn!("ignoring {outcome:?} for image {node}: already settled");
            return Ok(false);
        }

        let entry = self.images.entries.entry(node).or_default();
        entry.outcome = Some(outcome);
        let waiters = std::mem::take(&mut entry.waiters);

        log::debug!("image {node} settled as {outcome:?}, waking {}", waiters.len());
        let mut first_error = None;
        for waiter in waiters {
            if let Err(err) = waiter(self, outcome) {
                log::debug!("continuation for image {node} failed: {err}");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(true),
        }
    }

    /// Attached images that have not settled yet, in document order.
    pub fn pending_images(&self) -> Vec<NodeId> {
        self.dom
            .descendants(self.dom.document())
            .filter(|&id| self.dom.is_tag(id, "img"))
            .filter(|&id| !self.load_state(id).is_complete())
            .collect()
    }
}
