//! Error types for page enhancement.
//!
//! Selectors that find nothing are not errors. Everything here is either a
//! configuration mistake caught while building operations, or a structural
//! assumption violated while applying them.

use thiserror::Error;

use crate::dom::NodeId;

/// Errors raised while building or applying enhancements.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid selector pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("malformed selector: expected a pattern string, a sequence, or null, found {0}")]
    MalformedSelector(String),

    #[error("malformed configuration: {0}")]
    MalformedConfig(String),

    #[error("missing required configuration field: {0}")]
    MissingField(&'static str),

    #[error("node {0} is not attached to the tree")]
    DetachedNode(NodeId),

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
