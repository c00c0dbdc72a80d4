//! Structural helpers attached to a host object while it is wrapped.
//!
//! Each helper is stored on the node as an own key holding a host function,
//! so it is reachable both through a [`crate::Handle`] and through the bare
//! node's own member protocol until the handle is revoked.

use crate::config::WrapperConfig;
use crate::handle::Shared;
use crate::properties::{Props, apply_properties_with};
use dom::{DomError, Function, Node, Value};
use log::debug;
use std::rc::{Rc, Weak};

/// Tag carried by every helper function while it is attached.
pub(crate) const HELPER_TAG: &str = "wrapper";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Helper {
    AppendNode,
    PrependNode,
    AppendText,
    PrependText,
    AppendWrapped,
    PrependWrapped,
    Unwrap,
}

impl Helper {
    pub const ALL: [Helper; 7] = [
        Helper::AppendNode,
        Helper::PrependNode,
        Helper::AppendText,
        Helper::PrependText,
        Helper::AppendWrapped,
        Helper::PrependWrapped,
        Helper::Unwrap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Helper::AppendNode => "appendNode",
            Helper::PrependNode => "prependNode",
            Helper::AppendText => "appendText",
            Helper::PrependText => "prependText",
            Helper::AppendWrapped => "appendWrapped",
            Helper::PrependWrapped => "prependWrapped",
            Helper::Unwrap => "unwrap",
        }
    }

    fn build(self, config: &Rc<WrapperConfig>, shared: &Weak<Shared>) -> Function {
        let name = self.name();
        match self {
            Helper::AppendNode | Helper::PrependNode => {
                let at = Position::of(self);
                let config = Rc::clone(config);
                Function::tagged(HELPER_TAG, move |target, args| {
                    let kind = string_arg(args, 0, name)?;
                    let props = Props::from_value(args.get(1)).ok_or(DomError::InvalidArgument {
                        member: name,
                        expected: "a property record",
                    })?;
                    let child = target.document().create_element(&kind)?;
                    apply_properties_with(&child, &props, &config.routing)?;
                    at.insert(target, &child).map(Value::Node)
                })
            }
            Helper::AppendText | Helper::PrependText => {
                let at = Position::of(self);
                Function::tagged(HELPER_TAG, move |target, args| {
                    let text = string_arg(args, 0, name)?;
                    let leaf = target.document().create_text_node(&text);
                    at.insert(target, &leaf).map(Value::Node)
                })
            }
            Helper::AppendWrapped | Helper::PrependWrapped => {
                let at = Position::of(self);
                Function::tagged(HELPER_TAG, move |target, args| {
                    for arg in args {
                        let node = arg.as_node().ok_or(DomError::InvalidArgument {
                            member: name,
                            expected: "a node or wrapped handle",
                        })?;
                        at.insert(target, node)?;
                    }
                    Ok(Value::Undefined)
                })
            }
            Helper::Unwrap => {
                let shared = Weak::clone(shared);
                Function::tagged(HELPER_TAG, move |_, _| {
                    let shared = shared.upgrade().ok_or(DomError::Revoked)?;
                    Ok(Value::Node(shared.revoke()?))
                })
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Position {
    Start,
    End,
}

impl Position {
    fn of(helper: Helper) -> Self {
        match helper {
            Helper::PrependNode | Helper::PrependText | Helper::PrependWrapped => Position::Start,
            _ => Position::End,
        }
    }

    fn insert(self, target: &Node, child: &Node) -> Result<Node, DomError> {
        match self {
            Position::Start => target.prepend_child(child),
            Position::End => target.append_child(child),
        }
    }
}

fn string_arg(args: &[Value], index: usize, member: &'static str) -> Result<String, DomError> {
    match args.get(index) {
        Some(value) if !value.is_nullish() => Ok(value.coerce_to_string()),
        _ => Err(DomError::InvalidArgument {
            member,
            expected: "a string argument",
        }),
    }
}

/// Whether `node` still holds helpers attached for some handle. Helpers are
/// stripped on revocation and release, so any left belong to a live handle.
pub(crate) fn carries_live_helpers(node: &Node) -> bool {
    Helper::ALL.iter().any(|helper| {
        matches!(
            node.get_own(helper.name()),
            Some(Value::Function(function)) if function.tag() == Some(HELPER_TAG)
        )
    })
}

/// Attach every helper whose name is not already an own key of `node`.
pub(crate) fn attach(node: &Node, config: &Rc<WrapperConfig>, shared: &Weak<Shared>) {
    for helper in Helper::ALL {
        let name = helper.name();
        if node.has_own(name) {
            debug!(target: "wrapper.factory", "{node:?} already owns {name}; helper not attached");
            continue;
        }
        node.set_own(name, Value::Function(helper.build(config, shared)));
    }
}
