//! Turning a configuration into one operation and running it on a page.

use crate::behavior::{CaptionStyle, add_alt_text, create_navigator, remove_noise, scroll_after_load};
use crate::config::ComicConfig;
use crate::error::Result;
use crate::page::Page;
use crate::select::{
    ComplexSelector, Operation, auto, match_all_descendants, match_first_descendant,
};

/// One enhancement, described by its configured selectors.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Scroll the comic into view once its image is ready.
    Scroll { content: ComplexSelector },
    /// Follow the target's link when `key` is released.
    Navigate { target: ComplexSelector, key: String },
    /// Copy hover text next to the comic.
    AltText {
        text: ComplexSelector,
        after: ComplexSelector,
        style: CaptionStyle,
    },
    /// Remove clutter.
    RemoveNoise { noise: ComplexSelector },
}

impl Behavior {
    /// Compile the behavior into an operation.
    ///
    /// Patterns are parsed here, so a bad pattern fails before anything
    /// touches the page.
    pub fn build(&self) -> Result<Operation> {
        match self {
            Behavior::Scroll { content } => {
                scroll_after_load(auto(Some(content), match_first_descendant)?)
            }
            Behavior::Navigate { target, key } => Ok(create_navigator(
                auto(Some(target), match_first_descendant)?,
                key.as_str(),
            )),
            Behavior::AltText { text, after, style } => Ok(add_alt_text(
                auto(Some(text), match_first_descendant)?,
                auto(Some(after), match_first_descendant)?,
                style.clone(),
            )),
            Behavior::RemoveNoise { noise } => {
                Ok(remove_noise(auto(Some(noise), match_all_descendants)?))
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Behavior::Scroll { .. } => "scroll",
            Behavior::Navigate { .. } => "navigate",
            Behavior::AltText { .. } => "alt text",
            Behavior::RemoveNoise { .. } => "noise removal",
        }
    }
}

/// An ordered list of behaviors applied together to a page root.
///
/// Behaviors run in list order and see each other's mutations; nothing is
/// reordered.
#[derive(Debug, Clone, Default)]
pub struct Enhancer {
    behaviors: Vec<Behavior>,
}

impl Enhancer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, behavior: Behavior) -> &mut Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    /// Behaviors for `config`, in field order: comic, next, prev, alt, noise.
    /// Absent fields contribute nothing.
    pub fn for_config(config: &ComicConfig) -> Self {
        let mut enhancer = Self::new();
        enhancer.push(Behavior::Scroll {
            content: config.comic.clone(),
        });
        if let Some(next) = &config.next {
            enhancer.push(Behavior::Navigate {
                target: next.clone(),
                key: config.keys.next.clone(),
            });
        }
        if let Some(prev) = &config.prev {
            enhancer.push(Behavior::Navigate {
                target: prev.clone(),
                key: config.keys.prev.clone(),
            });
        }
        if let Some(alt) = &config.alt {
            enhancer.push(Behavior::AltText {
                text: alt.text.clone(),
                after: alt.after.clone(),
                style: alt.style.clone(),
            });
        }
        if let Some(noise) = &config.noise {
            enhancer.push(Behavior::RemoveNoise {
                noise: noise.clone(),
            });
        }
        enhancer
    }

    /// Compile every behavior and combine them with [`Operation::all`].
    pub fn build(&self) -> Result<Operation> {
        let operations = self
            .behaviors
            .iter()
            .map(|behavior| {
                log::debug!("building {} behavior", behavior.name());
                behavior.build()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Operation::all(operations))
    }

    /// Build and apply once to the document root.
    pub fn run(&self, page: &mut Page) -> Result<()> {
        let operation = self.build()?;
        let root = page.root();
        operation.apply(page, root)
    }
}

/// Enhance `page` as `config` describes.
pub fn enhance_comic(page: &mut Page, config: &ComicConfig) -> Result<()> {
    Enhancer::for_config(config).run(page)
}
