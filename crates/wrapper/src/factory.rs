//! Wrapper factory: builds or adopts a host object and hands back a handle.

use crate::config::WrapperConfig;
use crate::error::WrapError;
use crate::handle::{Handle, Shared};
use crate::helpers;
use crate::properties::{Props, apply_properties_with};
use dom::{Document, Node};
use log::trace;
use std::rc::Rc;

/// What to wrap: a new element of some kind, or an existing node.
#[derive(Clone, Debug)]
pub enum WrapTarget<'a> {
    Kind(&'a str),
    Node(Node),
}

impl<'a> From<&'a str> for WrapTarget<'a> {
    fn from(kind: &'a str) -> Self {
        WrapTarget::Kind(kind)
    }
}

impl<'a> From<&'a String> for WrapTarget<'a> {
    fn from(kind: &'a String) -> Self {
        WrapTarget::Kind(kind)
    }
}

impl From<Node> for WrapTarget<'_> {
    fn from(node: Node) -> Self {
        WrapTarget::Node(node)
    }
}

impl From<&Node> for WrapTarget<'_> {
    fn from(node: &Node) -> Self {
        WrapTarget::Node(node.clone())
    }
}

/// Creates handles over nodes of one document.
#[derive(Clone, Debug)]
pub struct Wrapper {
    doc: Document,
    config: Rc<WrapperConfig>,
}

impl Wrapper {
    pub fn new(doc: &Document) -> Self {
        Self::with_config(doc, WrapperConfig::default())
    }

    pub fn with_config(doc: &Document, config: WrapperConfig) -> Self {
        Self {
            doc: doc.clone(),
            config: Rc::new(config),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    pub fn wrap<'a>(&self, target: impl Into<WrapTarget<'a>>) -> Result<Handle, WrapError> {
        self.wrap_with(target, &Props::new())
    }

    /// Build (or adopt) the node, apply `props`, attach the helpers and
    /// return the handle.
    ///
    /// Only keys present before wrapping belong to the caller. Expandos
    /// assigned by `props` and the helpers are recorded as injected, so they
    /// are hidden from enumeration and stripped on `unwrap`.
    pub fn wrap_with<'a>(
        &self,
        target: impl Into<WrapTarget<'a>>,
        props: &Props,
    ) -> Result<Handle, WrapError> {
        let node = match target.into() {
            WrapTarget::Kind(kind) => self.doc.create_element(kind)?,
            WrapTarget::Node(node) => {
                if helpers::carries_live_helpers(&node) {
                    return Err(WrapError::AlreadyWrapped);
                }
                node
            }
        };
        let pristine = node.own_keys();
        apply_properties_with(&node, props, &self.config.routing)?;

        let shared = Rc::new_cyclic(|weak| {
            helpers::attach(&node, &self.config, weak);
            let injected: Vec<String> = node
                .own_keys()
                .into_iter()
                .filter(|key| !pristine.contains(key))
                .collect();
            Shared::new(node.clone(), injected, Rc::clone(&self.config))
        });
        let handle = Handle::from_shared(shared);
        trace!(
            target: "wrapper.factory",
            "wrapped {:?} (pristine={pristine:?}, injected={:?})",
            node,
            handle.injected_keys()
        );
        Ok(handle)
    }
}
