//! Fluent, chainable and revocable wrappers over host document elements.
//!
//! A [`Wrapper`] builds or adopts a node, applies a property mapping, attaches
//! structural helpers as own keys and returns a [`Handle`]. The handle rejects
//! unknown members, returns itself from command-style calls, hides the helper
//! keys from enumeration and, once unwrapped, strips them again and refuses
//! any further use.

mod child;
mod config;
mod error;
mod factory;
mod handle;
mod helpers;
mod properties;
mod whitelist;

pub use child::{Child, Unwrappable, Wrappable};
pub use config::{AttributeRouting, Route, WrapperConfig};
pub use error::WrapError;
pub use factory::{WrapTarget, Wrapper};
pub use handle::{Access, BoundMethod, Composite, CompositeOp, Handle, HandleState, Reply};
pub use helpers::Helper;
pub use properties::{Props, apply_properties, apply_properties_with};
pub use whitelist::{TRANSPARENT_METHODS, TRANSPARENT_PREFIXES, TransparencyRules, is_transparent};

/// Wrap with a default-configured factory.
pub fn wrap<'a>(doc: &dom::Document, target: impl Into<WrapTarget<'a>>) -> Result<Handle, WrapError> {
    Wrapper::new(doc).wrap(target)
}
