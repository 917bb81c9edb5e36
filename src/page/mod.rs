//! The page a set of enhancements runs against.
//!
//! [`Page`] owns the document tree together with the host capabilities that
//! behaviors consume: key event subscription, image load signals, link
//! resolution, navigation, and scrolling. Host actions are not performed
//! here; they are recorded as [`PageEffect`]s for the embedder to carry out.

mod events;
mod load;

pub use events::{KeyEvent, KeyHandler, KeyPhase};
pub use load::{LoadContinuation, LoadOutcome, LoadState, LoadWatch};

use serde::Serialize;
use url::Url;

use crate::dom::{self, ArenaDom, NodeId, Pattern};
use crate::error::Result;

/// A host action requested by an enhancement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PageEffect {
    /// Full navigation to an absolute URL.
    Navigated { url: String },
    /// A node was scrolled into view.
    ScrolledIntoView { node: NodeId },
}

/// A parsed page plus its host state.
pub struct Page {
    dom: ArenaDom,
    base_url: Option<Url>,
    focus: Option<NodeId>,
    listeners: events::ListenerStore,
    images: load::ImageLoads,
    effects: Vec<PageEffect>,
}

impl Page {
    /// Wrap an existing document.
    pub fn new(dom: ArenaDom) -> Self {
        Self {
            dom,
            base_url: None,
            focus: None,
            listeners: Default::default(),
            images: Default::default(),
            effects: Vec::new(),
        }
    }

    /// Parse an HTML document into a page.
    pub fn parse(html: &str) -> Self {
        Self::new(dom::parse_html(html))
    }

    /// Parse HTML bytes of unknown encoding into a page.
    pub fn parse_bytes(html: &[u8]) -> Self {
        Self::new(dom::parse_html_bytes(html))
    }

    /// Set the URL relative links resolve against.
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base_url = Some(base);
        self
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn dom(&self) -> &ArenaDom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut ArenaDom {
        &mut self.dom
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        self.dom.document()
    }

    /// First strict descendant of `scope` matching `pattern`.
    pub fn query_first(&self, scope: NodeId, pattern: &Pattern) -> Option<NodeId> {
        pattern.query_first(&self.dom, scope)
    }

    /// All strict descendants of `scope` matching `pattern`, in document order.
    pub fn query_all(&self, scope: NodeId, pattern: &Pattern) -> Vec<NodeId> {
        pattern.query_all(&self.dom, scope)
    }

    /// Whether `node` itself matches `pattern`.
    pub fn matches(&self, node: NodeId, pattern: &Pattern) -> bool {
        pattern.matches(&self.dom, node)
    }

    /// Node that receives key strokes: the explicit focus, else `<body>`,
    /// else the document.
    pub fn focused(&self) -> NodeId {
        self.focus
            .filter(|&f| self.dom.is_attached(f))
            .or_else(|| self.dom.find_by_tag("body"))
            .unwrap_or_else(|| self.root())
    }

    pub fn set_focus(&mut self, node: NodeId) {
        self.focus = Some(node);
    }

    /// Resolve the link target of `node` from its `href`.
    ///
    /// Absolute hrefs resolve on their own; relative ones need a base URL.
    pub fn link_target(&self, node: NodeId) -> Option<Url> {
        let href = self.dom.get_attr(node, "href")?.trim();
        match Url::parse(href) {
            Ok(url) => Some(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.base_url.as_ref()?.join(href).ok(),
            Err(_) => None,
        }
    }

    /// Perform a full navigation to `url`.
    pub fn navigate(&mut self, url: &Url) {
        log::info!("navigating to {url}");
        self.effects.push(PageEffect::Navigated {
            url: url.to_string(),
        });
    }

    /// Scroll `node` into view.
    pub fn scroll_into_view(&mut self, node: NodeId) {
        log::info!("scrolling {node} into view");
        self.effects.push(PageEffect::ScrolledIntoView { node });
    }

    /// Host actions requested so far, in order.
    pub fn effects(&self) -> &[PageEffect] {
        &self.effects
    }

    /// The most recent navigation target, if any.
    pub fn navigated_to(&self) -> Option<&str> {
        self.effects.iter().rev().find_map(|effect| match effect {
            PageEffect::Navigated { url } => Some(url.as_str()),
            _ => None,
        })
    }

    /// Whether `node` has been scrolled into view.
    pub fn was_scrolled(&self, node: NodeId) -> bool {
        self.effects
            .iter()
            .any(|e| *e == PageEffect::ScrolledIntoView { node })
    }

    /// Create a `<span>` holding `text`.
    pub fn create_text_span(&mut self, text: &str) -> NodeId {
        let span = self.dom.create_html_element("span");
        let content = self.dom.create_text(text);
        self.dom.append(span, content);
        span
    }

    /// Insert `node` as the next sibling of `reference`.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        self.dom.insert_after(reference, node)
    }

    /// Remove `node` (and its subtree) from the tree.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        self.dom.remove(node)
    }

    /// Serialize the current document.
    pub fn to_html(&self) -> String {
        self.dom.to_html()
    }
}

impl From<ArenaDom> for Page {
    fn from(dom: ArenaDom) -> Self {
        Self::new(dom)
    }
}
