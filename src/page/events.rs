//! Keyboard event subscription and delivery.

use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::NodeId;
use crate::error::Result;

use super::Page;

/// Which half of a key stroke an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    /// The key went down ("keydown").
    Down,
    /// The key was released ("keyup").
    Up,
}

/// A key event travelling from its target up to the document.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    key: String,
    phase: KeyPhase,
    target: NodeId,
    current_target: NodeId,
    default_prevented: bool,
}

impl KeyEvent {
    fn new(key: &str, phase: KeyPhase, target: NodeId) -> Self {
        Self {
            key: key.to_string(),
            phase,
            target,
            current_target: target,
            default_prevented: false,
        }
    }

    /// Key identifier, e.g. `"ArrowRight"` or `"j"`.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn phase(&self) -> KeyPhase {
        self.phase
    }

    /// Node the event was dispatched at.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose listeners are currently running.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    /// Suppress the host's default handling (e.g. scrolling on arrow keys).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Callback invoked for matching key events.
pub type KeyHandler = Rc<dyn Fn(&mut Page, &mut KeyEvent) -> Result<()>>;

/// Key listeners by scope node and phase, in registration order.
#[derive(Default)]
pub(crate) struct ListenerStore {
    map: HashMap<(NodeId, KeyPhase), Vec<KeyHandler>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, scope: NodeId, phase: KeyPhase, handler: KeyHandler) {
        self.map.entry((scope, phase)).or_default().push(handler);
    }

    /// Snapshot of the listeners for one node, so handlers may register more.
    pub(crate) fn get(&self, scope: NodeId, phase: KeyPhase) -> Vec<KeyHandler> {
        self.map.get(&(scope, phase)).cloned().unwrap_or_default()
    }

    pub(crate) fn count(&self, scope: NodeId, phase: KeyPhase) -> usize {
        self.map.get(&(scope, phase)).map_or(0, Vec::len)
    }
}

impl Page {
    /// Subscribe `handler` to key events of `phase` reaching `scope`.
    ///
    /// Events dispatched at `scope` or any node inside it reach the handler.
    /// Subscriptions last for the life of the page.
    pub fn listen_key(
        &mut self,
        scope: NodeId,
        phase: KeyPhase,
        handler: impl Fn(&mut Page, &mut KeyEvent) -> Result<()> + 'static,
    ) {
        self.listeners.add(scope, phase, Rc::new(handler));
    }

    /// Number of key listeners registered directly on `scope`.
    pub fn key_listener_count(&self, scope: NodeId, phase: KeyPhase) -> usize {
        self.listeners.count(scope, phase)
    }

    /// Deliver a key event at `target`, bubbling up to the document.
    pub fn dispatch_key(&mut self, target: NodeId, phase: KeyPhase, key: &str) -> Result<KeyEvent> {
        let mut event = KeyEvent::new(key, phase, target);

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        for node in path {
            event.current_target = node;
            for handler in self.listeners.get(node, phase) {
                handler(self, &mut event)?;
            }
        }

        log::trace!(
            "key {:?} {:?} at {} (default prevented: {})",
            key,
            phase,
            target,
            event.default_prevented
        );
        Ok(event)
    }

    /// Press and release `key` at the focused node.
    ///
    /// Returns whether either half of the stroke had its default prevented.
    pub fn press_key(&mut self, key: &str) -> Result<bool> {
        let target = self.focused();
        let down = self.dispatch_key(target, KeyPhase::Down, key)?;
        let up = self.dispatch_key(target, KeyPhase::Up, key)?;
        Ok(down.default_prevented() || up.default_prevented())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::dom::Pattern;

    #[test]
    fn test_bubbles_from_target_to_document() {
        let mut page = Page::parse("<div id='outer'><p id='inner'>x</p></div>");
        let outer = Pattern::parse("#outer").unwrap();
        let inner = Pattern::parse("#inner").unwrap();
        let outer = page.query_first(page.root(), &outer).unwrap();
        let inner = page.query_first(page.root(), &inner).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        for scope in [page.root(), outer, inner] {
            let seen = seen.clone();
            page.listen_key(scope, KeyPhase::Up, move |_, event| {
                seen.borrow_mut().push(event.current_target());
                Ok(())
            });
        }

        page.dispatch_key(inner, KeyPhase::Up, "a").unwrap();
        assert_eq!(*seen.borrow(), vec![inner, outer, page.root()]);

        // Down listeners are separate.
        seen.borrow_mut().clear();
        page.dispatch_key(inner, KeyPhase::Down, "a").unwrap();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_sibling_scope_not_reached() {
        let mut page = Page::parse("<div id='a'></div><div id='b'></div>");
        let a = page.query_first(page.root(), &Pattern::parse("#a").unwrap()).unwrap();
        let b = page.query_first(page.root(), &Pattern::parse("#b").unwrap()).unwrap();

        page.listen_key(a, KeyPhase::Down, |_, event| {
            event.prevent_default();
            Ok(())
        });

        assert!(!page.dispatch_key(b, KeyPhase::Down, "x").unwrap().default_prevented());
        assert!(page.dispatch_key(a, KeyPhase::Down, "x").unwrap().default_prevented());
    }

    #[test]
    fn test_press_key_reports_prevention() {
        let mut page = Page::parse("<p>x</p>");
        assert!(!page.press_key("ArrowLeft").unwrap());

        page.listen_key(page.root(), KeyPhase::Up, |_, event| {
            if event.key() == "ArrowLeft" {
                event.prevent_default();
            }
            Ok(())
        });
        assert!(page.press_key("ArrowLeft").unwrap());
        assert!(!page.press_key("ArrowRight").unwrap());
    }
}
