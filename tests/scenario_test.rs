//! End-to-end enhancement of small comic pages.

use comic_enhance::dom::Pattern;
use comic_enhance::{AltConfig, ComicConfig, LoadOutcome, Page, PageEffect, enhance_comic};

fn node(page: &Page, css: &str) -> comic_enhance::dom::NodeId {
    page.query_first(page.root(), &Pattern::parse(css).unwrap())
        .unwrap_or_else(|| panic!("no node for {css}"))
}

#[test]
fn test_right_arrow_follows_next_link() {
    let mut page = Page::parse(
        r#"<div id="comic"><p>panel</p></div><a class="next" href="https://x/2">next</a>"#,
    );
    let config = ComicConfig::new("#comic").with_next("a.next");
    enhance_comic(&mut page, &config).unwrap();

    assert!(page.press_key("ArrowRight").unwrap());
    assert_eq!(page.navigated_to(), Some("https://x/2"));
}

#[test]
fn test_left_arrow_without_prev_does_nothing() {
    let mut page = Page::parse(r#"<a class="next" href="https://x/2">next</a>"#);
    let config = ComicConfig::new("#comic").with_next("a.next");
    enhance_comic(&mut page, &config).unwrap();

    assert!(!page.press_key("ArrowLeft").unwrap());
    assert_eq!(page.navigated_to(), None);
}

#[test]
fn test_both_directions() {
    let mut page = Page::parse(
        r#"<a class="prev" href="/1">prev</a><a class="next" href="/3">next</a>"#,
    )
    .with_base_url("https://comic.test/2".parse().unwrap());
    let config = ComicConfig::new("#comic")
        .with_next("a.next")
        .with_prev("a.prev");
    enhance_comic(&mut page, &config).unwrap();

    page.press_key("ArrowLeft").unwrap();
    assert_eq!(page.navigated_to(), Some("https://comic.test/1"));
    page.press_key("ArrowRight").unwrap();
    assert_eq!(page.navigated_to(), Some("https://comic.test/3"));
}

#[test]
fn test_url_caption_is_linked_after_target() {
    let mut page = Page::parse(
        r#"<div id="comic"><img src="c.png" title="https://example.com/img"></div><footer>f</footer>"#,
    );
    let config = ComicConfig::new("#comic").with_alt(AltConfig::new("#comic img", "#comic"));
    enhance_comic(&mut page, &config).unwrap();

    let comic = node(&page, "#comic");
    let inserted = page.dom().get(comic).unwrap().next_sibling;
    assert!(page.dom().is_tag(inserted, "a"));
    assert_eq!(page.dom().get_attr(inserted, "href"), Some("https://example.com/img"));
    assert_eq!(page.dom().text(inserted), "https://example.com/img");
    assert!(page.to_html().contains("</a><footer>"));
}

#[test]
fn test_plain_caption_is_not_linked() {
    let mut page = Page::parse(r#"<div id="comic"><img title="A funny moment"></div>"#);
    let config = ComicConfig::new("#comic").with_alt(AltConfig::new("#comic img", "#comic"));
    enhance_comic(&mut page, &config).unwrap();

    let comic = node(&page, "#comic");
    let inserted = page.dom().get(comic).unwrap().next_sibling;
    assert!(page.dom().is_tag(inserted, "span"));
    assert_eq!(page.dom().text(inserted), "A funny moment");
    assert!(!page.to_html().contains("<a"));
}

#[test]
fn test_noise_removes_every_nav() {
    let mut page = Page::parse("<nav>top</nav><div id='comic'>c</div><nav>bottom</nav>");
    enhance_comic(&mut page, &ComicConfig::new("#comic").with_noise("nav")).unwrap();

    assert!(page.query_first(page.root(), &Pattern::parse("nav").unwrap()).is_none());
    assert!(page.to_html().contains(r#"<div id="comic">c</div>"#));
}

#[test]
fn test_scroll_without_image_is_immediate() {
    let mut page = Page::parse(r#"<div id="comic"><p>text comic</p></div>"#);
    enhance_comic(&mut page, &ComicConfig::new("#comic")).unwrap();

    let comic = node(&page, "#comic");
    assert_eq!(page.effects(), [PageEffect::ScrolledIntoView { node: comic }]);
}

#[test]
fn test_scroll_waits_for_pending_image() {
    let mut page = Page::parse(r#"<div id="comic"><img src="strip.png"></div>"#);
    enhance_comic(&mut page, &ComicConfig::new("#comic")).unwrap();

    let comic = node(&page, "#comic");
    assert!(page.effects().is_empty());

    let img = node(&page, "#comic img");
    assert!(page.settle_image(img, LoadOutcome::Loaded).unwrap());
    assert!(page.was_scrolled(comic));

    assert!(!page.settle_image(img, LoadOutcome::Errored).unwrap());
    assert_eq!(page.effects().len(), 1);
}

#[test]
fn test_scroll_after_image_error() {
    let mut page = Page::parse(r#"<div id="comic"><img src="missing.png"></div>"#);
    enhance_comic(&mut page, &ComicConfig::new("#comic")).unwrap();

    let img = node(&page, "#comic img");
    page.settle_image(img, LoadOutcome::Errored).unwrap();
    assert!(page.was_scrolled(node(&page, "#comic")));
}

#[test]
fn test_noscript_comic_survives_output() {
    let mut page = Page::parse(r#"<div id="comic"><noscript><img src="strip.png"></noscript></div>"#);
    enhance_comic(&mut page, &ComicConfig::new("#comic")).unwrap();

    let html = page.to_html();
    assert!(html.contains(r#"<noscript><img src="strip.png"></noscript>"#));
    let reparsed = Page::parse(&html);
    assert!(reparsed.to_html().contains(r#"<noscript><img src="strip.png"></noscript>"#));
}

#[test]
fn test_missing_everything_is_quiet() {
    let mut page = Page::parse("<p>unrelated page</p>");
    let config = ComicConfig::from_json_str(
        r##"{"comic": "#comic", "next": "a.next", "prev": "a.prev", "noise": "nav",
            "alt": {"text": "#comic img", "after": "#comic"}}"##,
    )
    .unwrap();
    let before = page.to_html();
    enhance_comic(&mut page, &config).unwrap();

    assert_eq!(page.to_html(), before);
    assert!(page.effects().is_empty());
    assert!(!page.press_key("ArrowRight").unwrap());
}

#[test]
fn test_full_page() {
    let mut page = Page::parse(
        r#"<html><body>
        <nav class="site">menu</nav>
        <main>
          <div id="comic"><img src="strip.png" title="Read the footnote"></div>
          <div class="links"><a rel="prev" href="/41">prev</a><a rel="next" href="/43">next</a></div>
        </main>
        <div class="ad">buy</div>
        </body></html>"#,
    )
    .with_base_url("https://comic.test/42".parse().unwrap());
    let config = ComicConfig::from_json_str(
        r##"{
            "comic": "#comic",
            "next": ["main", "a[rel=next]"],
            "prev": "a[rel=prev]",
            "alt": {"text": "#comic img", "after": "#comic", "foreground": "white"},
            "noise": ".site, .ad"
        }"##,
    )
    .unwrap();
    enhance_comic(&mut page, &config).unwrap();

    let html = page.to_html();
    assert!(!html.contains("menu") && !html.contains("buy"));
    assert!(html.contains(r#"<span style="font-size: large; color: white;">Read the footnote</span>"#));

    assert!(page.effects().is_empty());
    for img in page.pending_images() {
        page.settle_image(img, LoadOutcome::Loaded).unwrap();
    }
    assert!(page.was_scrolled(node(&page, "#comic")));

    page.press_key("ArrowRight").unwrap();
    assert_eq!(page.navigated_to(), Some("https://comic.test/43"));
}
