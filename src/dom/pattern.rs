//! Compiled CSS patterns and the native lookups built on them.

use std::fmt;

use selectors::context::{MatchingContext, SelectorCaches};
use selectors::parser::{ParseRelative, SelectorList};

use super::arena::{ArenaDom, NodeId};
use super::element_ref::{ElementRef, PageSelectors};
use crate::error::{Error, Result};

/// A CSS selector list, parsed once and matched many times.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    list: SelectorList<PageSelectors>,
}

impl Pattern {
    /// Parse a comma-separated selector list such as `"#comic img, .strip"`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        let list = SelectorList::parse(&PageSelectors, &mut parser, ParseRelative::No).map_err(
            |e| Error::InvalidPattern {
                pattern: source.to_string(),
                reason: format!("{:?}", e.kind),
            },
        )?;

        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    /// The text this pattern was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `id` itself matches.
    pub fn matches(&self, dom: &ArenaDom, id: NodeId) -> bool {
        Matcher::new().matches(self, dom, id)
    }

    /// First strict descendant of `scope` that matches, in document order.
    pub fn query_first(&self, dom: &ArenaDom, scope: NodeId) -> Option<NodeId> {
        let mut matcher = Matcher::new();
        dom.descendants(scope)
            .find(|&id| matcher.matches(self, dom, id))
    }

    /// Every strict descendant of `scope` that matches, in document order.
    ///
    /// The result is a snapshot: later mutations do not change it.
    pub fn query_all(&self, dom: &ArenaDom, scope: NodeId) -> Vec<NodeId> {
        let mut matcher = Matcher::new();
        dom.descendants(scope)
            .filter(|&id| matcher.matches(self, dom, id))
            .collect()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Selector caches shared across one traversal.
struct Matcher {
    caches: SelectorCaches,
}

impl Matcher {
    fn new() -> Self {
        Self {
            caches: SelectorCaches::default(),
        }
    }

    fn matches(&mut self, pattern: &Pattern, dom: &ArenaDom, id: NodeId) -> bool {
        if !dom.is_element(id) {
            return false;
        }

        let elem = ElementRef::new(dom, id);
        let mut context = MatchingContext::new(
            selectors::matching::MatchingMode::Normal,
            None,
            &mut self.caches,
            selectors::context::QuirksMode::NoQuirks,
            selectors::matching::NeedsSelectorFlags::No,
            selectors::matching::MatchingForInvalidation::No,
        );

        pattern.list.slice().iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, &elem, &mut context)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_tag_class_and_id() {
        let dom = parse_html(r#"<div id="main"><p class="intro highlight">Hello</p></div>"#);
        let p = dom.find_by_tag("p").unwrap();

        assert!(Pattern::parse("p").unwrap().matches(&dom, p));
        assert!(Pattern::parse(".intro").unwrap().matches(&dom, p));
        assert!(Pattern::parse("p.highlight").unwrap().matches(&dom, p));
        assert!(Pattern::parse("#main > p").unwrap().matches(&dom, p));
        assert!(!Pattern::parse(".missing").unwrap().matches(&dom, p));
    }

    #[test]
    fn test_attribute_selector() {
        let dom = parse_html(r#"<a rel="next" href="/2">next</a><a rel="prev">prev</a>"#);
        let pattern = Pattern::parse(r#"a[rel="next"][href]"#).unwrap();
        let hits = pattern.query_all(&dom, dom.document());
        assert_eq!(hits.len(), 1);
        assert_eq!(dom.get_attr(hits[0], "href"), Some("/2"));
    }

    #[test]
    fn test_query_excludes_scope() {
        let dom = parse_html("<div class='x'><div class='x'></div></div>");
        let outer = dom.find_by_tag("div").unwrap();
        let pattern = Pattern::parse(".x").unwrap();

        let inner = pattern.query_first(&dom, outer).unwrap();
        assert_ne!(inner, outer);
        assert_eq!(pattern.query_all(&dom, outer), vec![inner]);
    }

    #[test]
    fn test_query_all_document_order() {
        let dom = parse_html("<nav id='a'><nav id='b'></nav></nav><nav id='c'></nav>");
        let hits = Pattern::parse("nav").unwrap().query_all(&dom, dom.document());
        let ids: Vec<_> = hits.iter().map(|&h| dom.element_id(h).unwrap()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Pattern::parse("div[").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "div["));
        assert!(Pattern::parse("").is_err());
    }
}
