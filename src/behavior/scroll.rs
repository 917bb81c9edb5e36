//! Scrolling the comic into view once its image has loaded.

use crate::error::Result;
use crate::page::{LoadWatch, Page};
use crate::select::{Operation, Selector, match_self_or_first_descendant};

/// Scroll the first node found by `content` into view, waiting for its image.
///
/// The image is the content node itself if it is an `<img>`, else its first
/// `<img>` descendant. Without an image, or with one that has already
/// finished, the scroll happens right away. Otherwise it is parked until the
/// image loads or fails, whichever comes first; a broken image still scrolls.
pub fn scroll_after_load(content: Selector) -> Result<Operation> {
    let image = match_self_or_first_descendant("img")?;

    Ok(content.first().bind(Operation::new(move |page, content| {
        image
            .or_absent(move |page: &mut Page, image| {
                let Some(image) = image else {
                    page.scroll_into_view(content);
                    return Ok(());
                };

                let watch = page.watch_image(image, move |page, outcome| {
                    log::debug!("comic image {image} {outcome:?}, scrolling");
                    page.scroll_into_view(content);
                    Ok(())
                })?;
                if watch == LoadWatch::Pending {
                    log::debug!("deferring scroll until image {image} settles");
                }
                Ok(())
            })
            .apply(page, content)
    })))
}
