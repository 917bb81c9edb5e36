//! Benchmarks for page enhancement.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use comic_enhance::dom::{Pattern, parse_html};
use comic_enhance::{ComicConfig, Enhancer, LoadOutcome, Page};

/// A comic page padded with archive links and ads.
fn synthetic_page(entries: usize) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html><html><head><title>Strip</title></head><body><nav class="site">menu</nav>
        <div id="comic"><img src="strip.png" title="https://example.com/footnote"></div>
        <div class="links"><a rel="prev" href="/41">prev</a><a rel="next" href="/43">next</a></div>
        <ul class="archive">"#,
    );
    for i in 0..entries {
        html.push_str(&format!(
            r#"<li><a href="/{i}">Strip {i}</a></li><div class="ad">ad {i}</div>"#
        ));
    }
    html.push_str("</ul></body></html>");
    html
}

fn config() -> ComicConfig {
    ComicConfig::from_json_str(
        r##"{
            "comic": "#comic",
            "next": "a[rel=next]",
            "prev": "a[rel=prev]",
            "alt": {"text": "#comic img", "after": "#comic"},
            "noise": ".site, .ad"
        }"##,
    )
    .unwrap()
}

// ============================================================================
// Parsing
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let html = synthetic_page(500);
    c.bench_function("parse_html", |b| {
        b.iter(|| parse_html(&html));
    });
}

fn bench_query_all(c: &mut Criterion) {
    let dom = parse_html(&synthetic_page(500));
    let pattern = Pattern::parse("ul.archive li > a[href]").unwrap();
    c.bench_function("query_all", |b| {
        b.iter(|| pattern.query_all(&dom, dom.document()));
    });
}

// ============================================================================
// Enhancement
// ============================================================================

fn bench_build(c: &mut Criterion) {
    let enhancer = Enhancer::for_config(&config());
    c.bench_function("build_operation", |b| {
        b.iter(|| enhancer.build().unwrap());
    });
}

fn bench_enhance(c: &mut Criterion) {
    let html = synthetic_page(500);
    let operation = Enhancer::for_config(&config()).build().unwrap();
    c.bench_function("enhance_page", |b| {
        b.iter(|| {
            let mut page = Page::parse(&html);
            let root = page.root();
            operation.apply(&mut page, root).unwrap();
            for img in page.pending_images() {
                page.settle_image(img, LoadOutcome::Loaded).unwrap();
            }
            page.press_key("ArrowRight").unwrap();
            page
        });
    });
}

criterion_group!(benches, bench_parse, bench_query_all, bench_build, bench_enhance);
criterion_main!(benches);
