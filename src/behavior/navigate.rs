//! Keyboard navigation between comic pages.

use crate::page::KeyPhase;
use crate::select::{Operation, Selector};

/// Bind `key` to following the link found by `selector`.
///
/// Applied to a root node, the operation looks up the first target under it.
/// If that target has a resolvable link, two listeners are registered on the
/// root (not on the document, so separate subtrees can carry their own
/// navigators): releasing `key` navigates to the link, and pressing `key`
/// has its default suppressed so the page does not scroll first.
///
/// Nothing is registered when there is no target or it has no usable link.
pub fn create_navigator(selector: Selector, key: impl Into<String>) -> Operation {
    let key = key.into();
    selector.first().with_base(move |target| {
        let key = key.clone();
        Operation::new(move |page, root| {
            let Some(url) = page.link_target(target) else {
                log::debug!("navigation target {target} for {key:?} has no usable link");
                return Ok(());
            };
            log::debug!("binding {key:?} under {root} to {url}");

            let up_key = key.clone();
            page.listen_key(root, KeyPhase::Up, move |page, event| {
                if event.key() == up_key {
                    event.prevent_default();
                    page.navigate(&url);
                }
                Ok(())
            });

            let down_key = key.clone();
            page.listen_key(root, KeyPhase::Down, move |_, event| {
                if event.key() == down_key {
                    event.prevent_default();
                }
                Ok(())
            });
            Ok(())
        })
    })
}
