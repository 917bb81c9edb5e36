//! # comic-enhance
//!
//! Reading enhancements for webcomic pages, built from a small algebra of
//! node selectors and operations.
//!
//! ## Features
//!
//! - Keyboard navigation between pages (arrow keys by default)
//! - Hover text rendered inline below the comic, linked when it is a URL
//! - Scrolling the comic into view once its image has loaded
//! - Removal of page clutter
//!
//! ## Quick Start
//!
//! ```
//! use comic_enhance::{ComicConfig, Page, enhance_comic};
//!
//! let mut page = Page::parse(
//!     r#"<nav>menu</nav>
//!        <div id="comic"><img title="A funny moment"></div>
//!        <a class="next" href="https://example.com/2">next</a>"#,
//! );
//! let config = ComicConfig::from_json_str(
//!     r##"{"comic": "#comic", "next": "a.next", "noise": "nav",
//!         "alt": {"text": "#comic img", "after": "#comic"}}"##,
//! )?;
//! enhance_comic(&mut page, &config)?;
//!
//! page.press_key("ArrowRight")?;
//! assert_eq!(page.navigated_to(), Some("https://example.com/2"));
//! assert!(page.to_html().contains("A funny moment</span>"));
//! # Ok::<(), comic_enhance::Error>(())
//! ```
//!
//! ## Composing by hand
//!
//! Behaviors are plain [`Operation`]s, so they combine with anything else
//! built from the [`select`] module:
//!
//! ```
//! use comic_enhance::Page;
//! use comic_enhance::behavior::remove_noise;
//! use comic_enhance::select::{Selector, match_all_descendants, match_first_descendant};
//!
//! let mut page = Page::parse("<main><aside>x</aside></main><aside>y</aside>");
//! let inside_main = Selector::chain([
//!     match_first_descendant("main")?,
//!     match_all_descendants("aside")?,
//! ]);
//! let root = page.root();
//! remove_noise(inside_main).apply(&mut page, root)?;
//! assert_eq!(page.to_html().matches("<aside>").count(), 1);
//! # Ok::<(), comic_enhance::Error>(())
//! ```

pub mod behavior;
pub mod config;
pub mod dom;
pub mod enhance;
pub mod error;
pub mod page;
pub mod select;
pub(crate) mod util;

pub use config::{AltConfig, ComicConfig, KeyBindings};
pub use enhance::{Behavior, Enhancer, enhance_comic};
pub use error::{Error, Result};
pub use page::{LoadOutcome, Page, PageEffect};
pub use select::{ComplexSelector, Operation, Selector};
