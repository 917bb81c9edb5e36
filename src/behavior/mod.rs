//! Reading enhancements, each expressed as an [`Operation`].
//!
//! | Behavior | Builder | Lifetime |
//! |----------|---------|----------|
//! | Keyboard navigation | [`create_navigator`] | listeners persist |
//! | Inline hover text | [`add_alt_text`] | one-shot insert |
//! | Scroll to comic | [`scroll_after_load`] | one-shot, may wait on an image |
//! | Clutter removal | [`remove_noise`] | one-shot removal |
//!
//! [`Operation`]: crate::select::Operation

mod alt_text;
mod navigate;
mod noise;
mod scroll;

pub use alt_text::{CaptionStyle, DEFAULT_FONT_SIZE, add_alt_text, is_url};
pub use navigate::create_navigator;
pub use noise::remove_noise;
pub use scroll::scroll_after_load;
