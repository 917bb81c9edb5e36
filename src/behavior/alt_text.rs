//! Rendering an image's hover text inline, below the comic.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::dom::NodeId;
use crate::error::Result;
use crate::page::Page;
use crate::select::{Operation, Selector};

/// Absolute http(s) URL: scheme, host, then optional path, query, and fragment.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^\s/?#]+(/[^\s?#]*)?(\?[^\s#]*)?(#\S*)?$").expect("valid URL regex")
});

/// Default `font-size` of inserted captions.
pub const DEFAULT_FONT_SIZE: &str = "large";

/// Styling applied to inserted captions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    /// Text color.
    pub foreground: Option<String>,
    /// Background color.
    pub background: Option<String>,
    pub font_size: String,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            foreground: None,
            background: None,
            font_size: DEFAULT_FONT_SIZE.to_string(),
        }
    }
}

impl CaptionStyle {
    /// Inline `style` attribute value.
    fn to_css(&self) -> String {
        let mut css = format!("font-size: {};", self.font_size);
        if let Some(color) = &self.foreground {
            css.push_str(&format!(" color: {color};"));
        }
        if let Some(color) = &self.background {
            css.push_str(&format!(" background-color: {color};"));
        }
        css
    }
}

/// Whether caption text is a bare absolute URL worth linking.
pub fn is_url(text: &str) -> bool {
    URL_PATTERN.is_match(text)
}

/// Descriptive text of a caption source: its `title`, else its `alt`.
fn caption_of(page: &Page, source: NodeId) -> Option<String> {
    let dom = page.dom();
    dom.get_attr(source, "title")
        .or_else(|| dom.get_attr(source, "alt"))
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Copy the caption of the first node found by `text` after every node
/// found by `after`.
///
/// The caption goes into a styled `<span>`; a caption that is itself a URL
/// is wrapped in a link to that URL. Nothing happens if either side finds
/// nothing, or the source has no caption.
pub fn add_alt_text(text: Selector, after: Selector, style: CaptionStyle) -> Operation {
    let style = Rc::new(style);
    text.first().with_base(move |source| {
        let style = style.clone();
        let after = after.clone();
        Operation::new(move |page, root| {
            let Some(caption) = caption_of(page, source) else {
                log::debug!("caption source {source} has no title");
                return Ok(());
            };
            let style = style.clone();
            after.run(
                page,
                root,
                Operation::new(move |page, target| insert_caption(page, target, &caption, &style)),
            )
        })
    })
}

fn insert_caption(page: &mut Page, target: NodeId, caption: &str, style: &CaptionStyle) -> Result<()> {
    let span = page.create_text_span(caption);
    page.dom_mut().set_attr(span, "style", style.to_css())?;

    let node = if is_url(caption) {
        let dom = page.dom_mut();
        let link = dom.create_html_element("a");
        dom.set_attr(link, "href", caption)?;
        dom.append(link, span);
        link
    } else {
        span
    };

    log::debug!("inserting caption after {target}");
    page.insert_after(target, node)
}
