//! Page document model.
//!
//! Pages are parsed with html5ever into an [`ArenaDom`], and matched against
//! caller-supplied CSS patterns through the `selectors` crate.
//!
//! # Example
//!
//! ```
//! use comic_enhance::dom::{parse_html, Pattern};
//!
//! let dom = parse_html(r#"<div id="comic"><img src="p1.png"></div>"#);
//! let img = Pattern::parse("#comic img").unwrap();
//!
//! assert!(img.query_first(&dom, dom.document()).is_some());
//! ```

mod arena;
mod element_ref;
mod pattern;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, Attribute, ChildrenIter, Descendants, Node, NodeData, NodeId, html_name};
pub use element_ref::{ElementRef, PageSelectors};
pub use pattern::Pattern;
pub use serialize::{escape_attr, escape_text};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// Parse an HTML document.
pub fn parse_html(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Parse HTML bytes of unknown encoding.
///
/// Handles byte-to-string conversion with encoding detection: UTF-8 first,
/// then a `<meta charset>` or XML declaration hint, then Windows-1252.
pub fn parse_html_bytes(html: &[u8]) -> ArenaDom {
    let hint = crate::util::extract_charset_hint(html);
    let text = crate::util::decode_text(html, hint);
    parse_html(&text)
}
