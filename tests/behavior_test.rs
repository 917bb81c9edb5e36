//! Behaviors composed by hand, outside of a configuration.

use std::cell::Cell;
use std::rc::Rc;

use comic_enhance::behavior::{
    CaptionStyle, add_alt_text, create_navigator, remove_noise, scroll_after_load,
};
use comic_enhance::dom::Pattern;
use comic_enhance::page::KeyPhase;
use comic_enhance::select::{
    ComplexSelector, Locator, Operation, Selector, auto, match_all_descendants,
    match_first_descendant,
};
use comic_enhance::{LoadOutcome, Page};

#[test]
fn test_navigator_with_custom_locator() {
    // Pick the link whose text says "next", whatever its markup.
    let by_text = Locator::one(|page, scope| {
        page.dom()
            .descendants(scope)
            .find(|&id| page.dom().is_tag(id, "a") && page.dom().text(id).trim() == "next")
    });
    let mut page = Page::parse(r#"<a href="https://x/1">prev</a><a href="https://x/3">next</a>"#);
    let root = page.root();
    let target = auto(Some(&ComplexSelector::from(by_text)), match_first_descendant).unwrap();
    create_navigator(target, "j").apply(&mut page, root).unwrap();

    page.press_key("j").unwrap();
    assert_eq!(page.navigated_to(), Some("https://x/3"));
}

#[test]
fn test_navigator_listens_at_focused_descendant() {
    let mut page = Page::parse(r#"<input id="q"><a class="next" href="https://x/2">n</a>"#);
    let root = page.root();
    create_navigator(match_first_descendant("a.next").unwrap(), "ArrowRight")
        .apply(&mut page, root)
        .unwrap();

    let input = page.query_first(root, &Pattern::parse("#q").unwrap()).unwrap();
    page.set_focus(input);
    let up = page.dispatch_key(input, KeyPhase::Up, "ArrowRight").unwrap();
    assert!(up.default_prevented());
    assert_eq!(page.navigated_to(), Some("https://x/2"));
}

#[test]
fn test_navigator_keeps_listening() {
    let mut page = Page::parse(r#"<a class="next" href="https://x/2">n</a>"#);
    let root = page.root();
    create_navigator(match_first_descendant("a.next").unwrap(), "ArrowRight")
        .apply(&mut page, root)
        .unwrap();

    for _ in 0..3 {
        page.press_key("ArrowRight").unwrap();
    }
    assert_eq!(page.effects().len(), 3);
}

#[test]
fn test_caption_after_every_sequence_hit() {
    let mut page = Page::parse(
        r#"<main><img id="strip" title="caption"><hr><hr></main><hr>"#,
    );
    let root = page.root();
    let after = Selector::chain([
        match_first_descendant("main").unwrap(),
        match_all_descendants("hr").unwrap(),
    ]);
    add_alt_text(match_first_descendant("#strip").unwrap(), after, CaptionStyle::default())
        .apply(&mut page, root)
        .unwrap();

    let html = page.to_html();
    assert_eq!(html.matches(">caption</span>").count(), 2);
    assert!(html.contains("</main><hr></body>"));
}

#[test]
fn test_caption_font_size_override() {
    let mut page = Page::parse(r#"<img title="hi"><p></p>"#);
    let root = page.root();
    let style = CaptionStyle {
        font_size: "12px".into(),
        ..CaptionStyle::default()
    };
    add_alt_text(
        match_first_descendant("img").unwrap(),
        match_first_descendant("p").unwrap(),
        style,
    )
    .apply(&mut page, root)
    .unwrap();
    assert!(page.to_html().contains(r#"<span style="font-size: 12px;">hi</span>"#));
}

#[test]
fn test_noise_then_scroll_soft_misses() {
    let mut page = Page::parse(r#"<aside><div id="comic">c</div></aside>"#);
    let root = page.root();
    let batch = Operation::all([
        remove_noise(match_all_descendants("aside").unwrap()),
        scroll_after_load(match_first_descendant("#comic").unwrap()).unwrap(),
    ]);
    batch.apply(&mut page, root).unwrap();
    assert!(page.effects().is_empty());
}

#[test]
fn test_scroll_does_not_block_later_operations() {
    let mut page = Page::parse(r#"<div id="comic"><img src="slow.png"></div>"#);
    let root = page.root();
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();
    let batch = Operation::all([
        scroll_after_load(match_first_descendant("#comic").unwrap()).unwrap(),
        Operation::new(move |_, _| {
            flag.set(true);
            Ok(())
        }),
    ]);
    batch.apply(&mut page, root).unwrap();

    assert!(ran.get());
    assert!(page.effects().is_empty());
    let img = page.pending_images()[0];
    page.settle_image(img, LoadOutcome::Loaded).unwrap();
    assert_eq!(page.effects().len(), 1);
}

#[test]
fn test_scroll_uses_first_content_only() {
    let mut page = Page::parse(r#"<div class="c">a</div><div class="c">b</div>"#);
    let root = page.root();
    scroll_after_load(match_all_descendants(".c").unwrap())
        .unwrap()
        .apply(&mut page, root)
        .unwrap();
    assert_eq!(page.effects().len(), 1);
}
