//! HTML serialization for ArenaDom.

use std::fmt::Write;

use super::arena::{ArenaDom, NodeData, NodeId};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text children are emitted verbatim.
///
/// `noscript` is included because pages are parsed with scripting enabled,
/// which leaves its content as unparsed text.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

impl ArenaDom {
    /// Serialize the whole document to HTML.
    pub fn to_html(&self) -> String {
        self.serialize_children(self.document())
    }

    /// Serialize a node, including itself, to HTML.
    pub fn serialize_node(&self, id: NodeId) -> String {
        let mut out = String::new();
        write_node(self, id, &mut out);
        out
    }

    /// Serialize only the children of a node.
    pub fn serialize_children(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            write_node(self, child, &mut out);
        }
        out
    }
}

fn write_node(dom: &ArenaDom, id: NodeId, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
        }
        NodeData::Doctype { name, .. } => {
            write!(out, "<!DOCTYPE {name}>").unwrap();
        }
        NodeData::Comment(text) => {
            write!(out, "<!--{text}-->").unwrap();
        }
        NodeData::Text(text) => {
            let raw = dom
                .parent(id)
                .and_then(|p| dom.element_name(p))
                .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name.as_ref()));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.as_ref();
            write!(out, "<{tag}").unwrap();
            for attr in attrs {
                write!(
                    out,
                    " {}=\"{}\"",
                    attr.name.local.as_ref(),
                    escape_attr(&attr.value)
                )
                .unwrap();
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            for child in dom.children(id) {
                write_node(dom, child, out);
            }
            write!(out, "</{tag}>").unwrap();
        }
    }
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}
