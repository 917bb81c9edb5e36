//! Caller-facing enhancement configuration.
//!
//! The JSON shape is:
//!
//! ```json
//! {
//!   "comic": "#comic",
//!   "next": "a[rel=next]",
//!   "prev": ["#nav", "a.prev"],
//!   "alt": { "text": "#comic img", "after": "#comic", "foreground": "#fff" },
//!   "noise": ".ad",
//!   "keys": { "next": "ArrowRight", "prev": "ArrowLeft" }
//! }
//! ```
//!
//! Only `comic` is required. Selector fields accept a pattern string, an
//! array of stages, or `null`.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::behavior::CaptionStyle;
use crate::error::{Error, Result};
use crate::select::ComplexSelector;

/// Key names bound to page navigation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub next: String,
    pub prev: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next: "ArrowRight".to_string(),
            prev: "ArrowLeft".to_string(),
        }
    }
}

/// Where a caption comes from and where it goes.
#[derive(Debug, Clone)]
pub struct AltConfig {
    /// Node whose `title` is copied.
    pub text: ComplexSelector,
    /// Nodes the caption is inserted after.
    pub after: ComplexSelector,
    pub style: CaptionStyle,
}

/// Everything needed to enhance one comic page.
#[derive(Debug, Clone)]
pub struct ComicConfig {
    pub comic: ComplexSelector,
    pub next: Option<ComplexSelector>,
    pub prev: Option<ComplexSelector>,
    pub alt: Option<AltConfig>,
    pub noise: Option<ComplexSelector>,
    pub keys: KeyBindings,
}

impl ComicConfig {
    /// A configuration that only scrolls to `comic`.
    pub fn new(comic: impl Into<ComplexSelector>) -> Self {
        Self {
            comic: comic.into(),
            next: None,
            prev: None,
            alt: None,
            noise: None,
            keys: KeyBindings::default(),
        }
    }

    pub fn with_next(mut self, next: impl Into<ComplexSelector>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_prev(mut self, prev: impl Into<ComplexSelector>) -> Self {
        self.prev = Some(prev.into());
        self
    }

    pub fn with_alt(mut self, alt: AltConfig) -> Self {
        self.alt = Some(alt);
        self
    }

    pub fn with_noise(mut self, noise: impl Into<ComplexSelector>) -> Self {
        self.noise = Some(noise.into());
        self
    }

    /// Read a configuration from a parsed JSON object.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(Error::MalformedConfig(format!(
                "expected an object, found {value}"
            )));
        };

        let comic = selector_field(fields, "comic")?.ok_or(Error::MissingField("comic"))?;
        let alt = match fields.get("alt") {
            None | Some(Value::Null) => None,
            Some(alt @ Value::Object(fields)) => Some(AltConfig::from_json(alt, fields)?),
            Some(other) => {
                return Err(Error::MalformedConfig(format!(
                    "`alt` must be an object, found {other}"
                )));
            }
        };
        let keys = match fields.get("keys") {
            None | Some(Value::Null) => KeyBindings::default(),
            Some(keys) => KeyBindings::deserialize(keys)?,
        };

        Ok(Self {
            comic,
            next: selector_field(fields, "next")?,
            prev: selector_field(fields, "prev")?,
            alt,
            noise: selector_field(fields, "noise")?,
            keys,
        })
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Load a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl AltConfig {
    pub fn new(text: impl Into<ComplexSelector>, after: impl Into<ComplexSelector>) -> Self {
        Self {
            text: text.into(),
            after: after.into(),
            style: CaptionStyle::default(),
        }
    }

    /// The style keys (`foreground`, `background`, `font_size`) sit next to
    /// the selectors in the same object.
    fn from_json(value: &Value, fields: &Map<String, Value>) -> Result<Self> {
        let text = selector_field(fields, "alt.text")?.ok_or(Error::MissingField("alt.text"))?;
        let after = selector_field(fields, "alt.after")?.ok_or(Error::MissingField("alt.after"))?;
        let style = CaptionStyle::deserialize(value)?;
        Ok(Self { text, after, style })
    }
}

/// Look up a selector field. Dotted names are reported as given but looked
/// up by their last segment.
fn selector_field(fields: &Map<String, Value>, name: &str) -> Result<Option<ComplexSelector>> {
    let key = name.rsplit('.').next().unwrap_or(name);
    match fields.get(key) {
        None => Ok(None),
        Some(value) => ComplexSelector::from_json_opt(value).map_err(|err| match err {
            Error::MalformedSelector(found) => Error::MalformedSelector(format!("{found} in `{name}`")),
            other => other,
        }),
    }
}
