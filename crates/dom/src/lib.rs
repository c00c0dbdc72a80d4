//! In-memory host document: element and text nodes with a dynamic member
//! protocol (own keys, native properties, native methods).

mod arena;
mod document;
#[cfg(any(test, feature = "dom-snapshot"))]
pub mod dom_snapshot;
mod error;
mod node;
mod reflect;
mod selector;
mod serialize;
mod tags;
mod types;

pub use document::Document;
pub use error::DomError;
pub use node::{
    DOCUMENT_POSITION_CONTAINED_BY, DOCUMENT_POSITION_CONTAINS, DOCUMENT_POSITION_DISCONNECTED,
    DOCUMENT_POSITION_FOLLOWING, DOCUMENT_POSITION_IMPLEMENTATION_SPECIFIC,
    DOCUMENT_POSITION_PRECEDING, Node,
};
pub use serialize::outline;
pub use tags::{is_known_element, is_valid_custom_element_name};
pub use types::{Function, HostFn, NodeKey, NodeType, Value};
