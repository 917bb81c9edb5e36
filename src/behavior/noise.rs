//! Stripping page clutter.

use crate::select::{Operation, Selector};

/// Remove every node found by `noise`.
///
/// A hit nested inside an earlier hit is already gone with its ancestor and
/// is skipped.
pub fn remove_noise(noise: Selector) -> Operation {
    noise.bind(Operation::new(|page, node| {
        if !page.dom().is_attached(node) {
            log::trace!("noise {node} already removed with an ancestor");
            return Ok(());
        }
        log::debug!("removing noise {node}");
        page.remove(node)
    }))
}
