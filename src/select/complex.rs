//! Caller-facing selector values and their coercion into [`Selector`]s.

use std::fmt;
use std::rc::Rc;

use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value;

use crate::dom::NodeId;
use crate::error::{Error, Result};
use crate::page::Page;

use super::Selector;

/// Turns a pattern string into a selector, e.g. [`match_first_descendant`].
///
/// [`match_first_descendant`]: super::match_first_descendant
pub type Builder = fn(&str) -> Result<Selector>;

/// A custom node locator.
#[derive(Clone)]
pub enum Locator {
    One(Rc<dyn Fn(&Page, NodeId) -> Option<NodeId>>),
    Many(Rc<dyn Fn(&Page, NodeId) -> Vec<NodeId>>),
}

impl Locator {
    pub fn one(f: impl Fn(&Page, NodeId) -> Option<NodeId> + 'static) -> Self {
        Locator::One(Rc::new(f))
    }

    pub fn many(f: impl Fn(&Page, NodeId) -> Vec<NodeId> + 'static) -> Self {
        Locator::Many(Rc::new(f))
    }

    fn to_selector(&self) -> Selector {
        match self {
            Locator::One(f) => {
                let f = f.clone();
                Selector::locate_one(move |page, node| f(page, node))
            }
            Locator::Many(f) => {
                let f = f.clone();
                Selector::locate_many(move |page, node| f(page, node))
            }
        }
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::One(_) => f.write_str("Locator::One(..)"),
            Locator::Many(_) => f.write_str("Locator::Many(..)"),
        }
    }
}

/// How a configuration names the nodes a behavior works on.
#[derive(Clone, Debug)]
pub enum ComplexSelector {
    /// CSS pattern, resolved with whichever [`Builder`] the behavior picks.
    Pattern(String),
    /// Custom locator function.
    Locator(Locator),
    /// Stages applied left to right, each searching from the previous hits.
    /// An empty sequence selects its input.
    Sequence(Vec<ComplexSelector>),
    /// A selector built by the caller, used as is.
    Selector(Selector),
}

impl ComplexSelector {
    /// Resolve into a [`Selector`], compiling every pattern now.
    pub fn resolve(&self, builder: Builder) -> Result<Selector> {
        match self {
            ComplexSelector::Pattern(pattern) => builder(pattern),
            ComplexSelector::Locator(locator) => Ok(locator.to_selector()),
            ComplexSelector::Sequence(stages) => {
                let stages = stages
                    .iter()
                    .map(|stage| stage.resolve(builder))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Selector::chain(stages))
            }
            ComplexSelector::Selector(selector) => Ok(selector.clone()),
        }
    }

    /// Read a selector from JSON: a string is a pattern, an array a sequence.
    ///
    /// `null` is not accepted here; use [`from_json_opt`](Self::from_json_opt)
    /// where a field may be absent.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(pattern) => Ok(ComplexSelector::Pattern(pattern.clone())),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>>>()
                .map(ComplexSelector::Sequence),
            other => Err(Error::MalformedSelector(json_kind(other).to_string())),
        }
    }

    /// Like [`from_json`](Self::from_json), with `null` meaning absent.
    pub fn from_json_opt(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            other => Self::from_json(other).map(Some),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Coerce an optional configuration value into a selector.
///
/// Patterns go through `builder`, absent values select nothing, and
/// everything else is resolved as given.
pub fn auto(value: Option<&ComplexSelector>, builder: Builder) -> Result<Selector> {
    match value {
        None => Ok(Selector::none()),
        Some(value) => value.resolve(builder),
    }
}

impl From<&str> for ComplexSelector {
    fn from(pattern: &str) -> Self {
        ComplexSelector::Pattern(pattern.to_string())
    }
}

impl From<String> for ComplexSelector {
    fn from(pattern: String) -> Self {
        ComplexSelector::Pattern(pattern)
    }
}

impl From<Selector> for ComplexSelector {
    fn from(selector: Selector) -> Self {
        ComplexSelector::Selector(selector)
    }
}

impl From<Locator> for ComplexSelector {
    fn from(locator: Locator) -> Self {
        ComplexSelector::Locator(locator)
    }
}

impl From<Vec<ComplexSelector>> for ComplexSelector {
    fn from(stages: Vec<ComplexSelector>) -> Self {
        ComplexSelector::Sequence(stages)
    }
}

impl<'de> Deserialize<'de> for ComplexSelector {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        ComplexSelector::from_json(&value).map_err(de::Error::custom)
    }
}
