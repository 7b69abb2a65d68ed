//! Error types
//!
//! Every error here is local and recoverable. A failed attach or a rejected write
//! leaves the graph and the bound owner exactly as they were.

use thiserror::Error;

use crate::config::ConfigError;
use crate::foundation::collections::NodeId;

/// Scene graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Attaching would make a node its own ancestor
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Requested parent
        parent: NodeId,
        /// Node being attached
        child: NodeId,
    },

    /// The id does not name a live node
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),

    /// The node exists but is not reachable from any root
    #[error("node {0:?} is not reachable from any root")]
    Orphan(NodeId),
}

/// Attribute binding errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    /// `(owner, name)` is already registered
    #[error("property '{name}' is already bound for {owner}")]
    Duplicate {
        /// Owner key, formatted
        owner: String,
        /// Property name
        name: String,
    },

    /// No binding for `(owner, name)`
    #[error("no property '{name}' bound for {owner}")]
    UnknownProperty {
        /// Owner key, formatted
        owner: String,
        /// Property name
        name: String,
    },

    /// The value lies outside the declared domain
    #[error("value {value} rejected: {reason}")]
    Domain {
        /// Offending value, formatted
        value: String,
        /// Which constraint failed
        reason: String,
    },

    /// The value has the wrong kind for the property
    #[error("expected a {expected} value, got {actual}")]
    TypeMismatch {
        /// Kind the property declares
        expected: &'static str,
        /// Kind that was supplied
        actual: &'static str,
    },

    /// The owner behind the lookup key no longer exists
    #[error("owner {0} no longer exists")]
    OwnerGone(String),

    /// A set rule could not convert the value into the owner's representation
    #[error("cannot parse '{input}': {reason}")]
    Parse {
        /// Raw input
        input: String,
        /// Why it failed
        reason: String,
    },
}

impl BindingError {
    /// Owner behind a lookup key has been destroyed
    pub fn owner_gone(owner: impl std::fmt::Debug) -> Self {
        Self::OwnerGone(format!("{owner:?}"))
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Scene graph error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Binding error
    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application callback error
    #[error("Application error: {0}")]
    Application(String),
}
