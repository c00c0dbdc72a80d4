//! Argument types for structural insertion.

use crate::error::WrapError;
use crate::handle::Handle;
use dom::{Node, Value};
use std::fmt;

/// Capability of giving back the bare host object behind a wrapper.
///
/// Insertion helpers call this on wrapped arguments before inserting them,
/// which revokes the argument's handle.
pub trait Unwrappable {
    fn unwrap_node(&self) -> Result<Node, WrapError>;
}

/// Mixed argument accepted by the composite `append` / `prepend`.
pub enum Child {
    Text(String),
    Node(Node),
    Wrapped(Box<dyn Unwrappable>),
}

impl Child {
    /// Resolve to the value handed to the native insert.
    pub(crate) fn into_value(self) -> Result<Value, WrapError> {
        match self {
            Child::Text(text) => Ok(Value::String(text)),
            Child::Node(node) => Ok(Value::Node(node)),
            Child::Wrapped(wrapped) => wrapped.unwrap_node().map(Value::Node),
        }
    }

    /// Nodes stay nodes; every other value is inserted as its string form.
    pub(crate) fn from_value(value: &Value) -> Self {
        match value {
            Value::Node(node) => Child::Node(node.clone()),
            other => Child::Text(other.coerce_to_string()),
        }
    }
}

impl fmt::Debug for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Child::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Child::Wrapped(_) => f.write_str("Wrapped(..)"),
        }
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<&Node> for Child {
    fn from(node: &Node) -> Self {
        Child::Node(node.clone())
    }
}

impl From<Handle> for Child {
    fn from(handle: Handle) -> Self {
        Child::Wrapped(Box::new(handle))
    }
}

impl From<&Handle> for Child {
    fn from(handle: &Handle) -> Self {
        Child::Wrapped(Box::new(handle.clone()))
    }
}

/// Argument of `appendWrapped` / `prependWrapped`: a bare node or anything
/// that can be unwrapped into one.
pub enum Wrappable {
    Node(Node),
    Wrapped(Box<dyn Unwrappable>),
}

impl Wrappable {
    pub(crate) fn into_node(self) -> Result<Node, WrapError> {
        match self {
            Wrappable::Node(node) => Ok(node),
            Wrappable::Wrapped(wrapped) => wrapped.unwrap_node(),
        }
    }
}

impl fmt::Debug for Wrappable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wrappable::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Wrappable::Wrapped(_) => f.write_str("Wrapped(..)"),
        }
    }
}

impl From<Node> for Wrappable {
    fn from(node: Node) -> Self {
        Wrappable::Node(node)
    }
}

impl From<&Node> for Wrappable {
    fn from(node: &Node) -> Self {
        Wrappable::Node(node.clone())
    }
}

impl From<Handle> for Wrappable {
    fn from(handle: Handle) -> Self {
        Wrappable::Wrapped(Box::new(handle))
    }
}

impl From<&Handle> for Wrappable {
    fn from(handle: &Handle) -> Self {
        Wrappable::Wrapped(Box::new(handle.clone()))
    }
}
