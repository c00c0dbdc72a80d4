//! The interception layer: a revocable handle over a wrapped host object.
//!
//! Every access goes through [`Handle::get`], which checks revocation and
//! membership before classifying the member. Calls on callable members then
//! either surface their real result or hand back the handle for chaining.

use crate::child::{Child, Unwrappable, Wrappable};
use crate::config::WrapperConfig;
use crate::error::WrapError;
use crate::properties::Props;
use dom::{DomError, Function, Node, Value};
use log::trace;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleState {
    Active,
    Revoked,
}

/// State shared by every clone of one handle.
pub(crate) struct Shared {
    node: Node,
    /// Keys added only to support the wrapper; stripped on revocation.
    injected: Vec<String>,
    config: Rc<WrapperConfig>,
    state: Cell<HandleState>,
}

impl Shared {
    pub(crate) fn new(node: Node, injected: Vec<String>, config: Rc<WrapperConfig>) -> Self {
        Self {
            node,
            injected,
            config,
            state: Cell::new(HandleState::Active),
        }
    }

    fn ensure_active(&self) -> Result<&Node, WrapError> {
        match self.state.get() {
            HandleState::Active => Ok(&self.node),
            HandleState::Revoked => Err(WrapError::DoubleRevocation),
        }
    }

    /// Freeze the handle, then strip the injected keys.
    pub(crate) fn revoke(&self) -> Result<Node, WrapError> {
        self.ensure_active()?;
        self.state.set(HandleState::Revoked);
        self.strip();
        trace!(target: "wrapper.handle", "revoked {:?}", self.node);
        Ok(self.node.clone())
    }

    fn strip(&self) {
        for key in &self.injected {
            self.node.delete_own(key);
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if self.state.get() == HandleState::Active {
            self.strip();
            trace!(target: "wrapper.handle", "released {:?} without unwrap", self.node);
        }
    }
}

/// Chainable view of a wrapped host object.
///
/// Clones share one state: unwrapping through any clone revokes them all.
#[derive(Clone)]
pub struct Handle {
    shared: Rc<Shared>,
}

/// Result of reading a member through a handle.
#[derive(Debug)]
pub enum Access {
    /// Non-callable member, returned as is.
    Value(Value),
    /// Callable member bound to the handle.
    Method(BoundMethod),
    /// `append` / `prepend` with unwrap-aware composite semantics.
    Composite(Composite),
}

impl Access {
    /// The raw member value, as the bare node would report it.
    pub fn into_value(self) -> Value {
        match self {
            Access::Value(value) => value,
            Access::Method(method) => Value::Function(method.function),
            Access::Composite(composite) => Value::Function(composite.function),
        }
    }
}

/// Result of calling a member through a handle.
#[derive(Debug)]
pub enum Reply {
    /// Transparent call: the real result.
    Value(Value),
    /// Chaining call: the handle the call was made on.
    Chain(Handle),
}

impl Reply {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Reply::Value(value) => Some(value),
            Reply::Chain(_) => None,
        }
    }

    pub fn into_handle(self) -> Option<Handle> {
        match self {
            Reply::Value(_) => None,
            Reply::Chain(handle) => Some(handle),
        }
    }
}

pub struct BoundMethod {
    handle: Handle,
    name: String,
    function: Function,
}

impl BoundMethod {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_transparent(&self) -> bool {
        self.handle
            .shared
            .config
            .transparency
            .is_transparent(&self.name)
    }

    /// Invoke against the wrapped node and classify the result.
    pub fn call(&self, args: &[Value]) -> Result<Reply, WrapError> {
        let result = self.invoke(args)?;
        if self.is_transparent() {
            trace!(target: "wrapper.handle", "{} -> value", self.name);
            Ok(Reply::Value(result))
        } else {
            trace!(target: "wrapper.handle", "{} -> chain", self.name);
            Ok(Reply::Chain(self.handle.clone()))
        }
    }

    fn invoke(&self, args: &[Value]) -> Result<Value, WrapError> {
        let node = self.handle.shared.ensure_active()?.clone();
        Ok(self.function.call(&node, args)?)
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("name", &self.name)
            .field("function", &self.function)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOp {
    Append,
    Prepend,
}

impl CompositeOp {
    pub fn member(self) -> &'static str {
        match self {
            CompositeOp::Append => "append",
            CompositeOp::Prepend => "prepend",
        }
    }

    fn from_member(name: &str) -> Option<Self> {
        match name {
            "append" => Some(CompositeOp::Append),
            "prepend" => Some(CompositeOp::Prepend),
            _ => None,
        }
    }
}

pub struct Composite {
    handle: Handle,
    op: CompositeOp,
    function: Function,
}

impl Composite {
    pub fn op(&self) -> CompositeOp {
        self.op
    }

    /// Resolve and insert each child in call order. A wrapped child is
    /// unwrapped right before its own insertion, so a failing argument leaves
    /// the earlier ones inserted and the later ones untouched.
    ///
    /// `prepend` inserts every child at the front in turn, so the last
    /// argument ends up first.
    pub fn call<I, C>(&self, children: I) -> Result<Handle, WrapError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        let node = self.handle.shared.ensure_active()?.clone();
        for child in children {
            let value = child.into().into_value()?;
            self.function.call(&node, std::slice::from_ref(&value))?;
        }
        trace!(target: "wrapper.handle", "{} -> chain", self.op.member());
        Ok(self.handle.clone())
    }
}

impl fmt::Debug for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite").field("op", &self.op).finish()
    }
}

impl Handle {
    pub(crate) fn from_shared(shared: Rc<Shared>) -> Self {
        Self { shared }
    }

    pub fn state(&self) -> HandleState {
        self.shared.state.get()
    }

    pub fn is_revoked(&self) -> bool {
        self.state() == HandleState::Revoked
    }

    /// Whether both handles are views of the same wrap.
    pub fn ptr_eq(&self, other: &Handle) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// The wrapped node, without revoking.
    pub fn node(&self) -> Result<Node, WrapError> {
        self.shared.ensure_active().cloned()
    }

    /// Names that exist only to support the wrapper.
    pub fn injected_keys(&self) -> &[String] {
        &self.shared.injected
    }

    /// Membership test that never fails for absent names.
    pub fn has(&self, name: &str) -> Result<bool, WrapError> {
        Ok(self.shared.ensure_active()?.has_member(name))
    }

    /// Read a member. The single entry point for every handle operation.
    pub fn get(&self, name: &str) -> Result<Access, WrapError> {
        let node = self.shared.ensure_active()?;
        let Some(value) = node.get_member(name) else {
            return Err(WrapError::InvalidMemberAccess(name.to_string()));
        };
        if let Some(op) = CompositeOp::from_member(name)
            && let Value::Function(function) = value
        {
            return Ok(Access::Composite(Composite {
                handle: self.clone(),
                op,
                function,
            }));
        }
        Ok(match value {
            Value::Function(function) => Access::Method(BoundMethod {
                handle: self.clone(),
                name: name.to_string(),
                function,
            }),
            other => Access::Value(other),
        })
    }

    /// Call a member with dynamic arguments.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Reply, WrapError> {
        match self.get(name)? {
            Access::Method(method) => method.call(args),
            Access::Composite(composite) => composite
                .call(args.iter().map(Child::from_value))
                .map(Reply::Chain),
            Access::Value(_) => Err(DomError::NotCallable(name.to_string()).into()),
        }
    }

    /// Assign a member on the wrapped node. New names belong to the caller and
    /// survive `unwrap`.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<Handle, WrapError> {
        self.shared.ensure_active()?.set_member(name, value.into())?;
        Ok(self.clone())
    }

    /// Own keys of the wrapped node minus the injected ones.
    pub fn own_keys(&self) -> Result<Vec<String>, WrapError> {
        let node = self.shared.ensure_active()?;
        Ok(node
            .own_keys()
            .into_iter()
            .filter(|key| !self.shared.injected.contains(key))
            .collect())
    }

    /// Revoke the handle, strip the injected keys and return the bare node.
    /// Any later use of this handle or its clones fails with
    /// [`WrapError::DoubleRevocation`].
    pub fn unwrap(&self) -> Result<Node, WrapError> {
        self.shared.revoke()
    }

    fn invoke_raw(&self, name: &str, args: &[Value]) -> Result<Value, WrapError> {
        match self.get(name)? {
            Access::Method(method) => method.invoke(args),
            Access::Composite(composite) => {
                composite.call(args.iter().map(Child::from_value))?;
                Ok(Value::Undefined)
            }
            Access::Value(_) => Err(DomError::NotCallable(name.to_string()).into()),
        }
    }

    fn chain(&self, name: &str, args: &[Value]) -> Result<Handle, WrapError> {
        self.invoke_raw(name, args)?;
        Ok(self.clone())
    }

    fn composite(&self, name: &str) -> Result<Composite, WrapError> {
        match self.get(name)? {
            Access::Composite(composite) => Ok(composite),
            _ => Err(DomError::NotCallable(name.to_string()).into()),
        }
    }

    // ---- composite insertion ----

    pub fn append<I, C>(&self, children: I) -> Result<Handle, WrapError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        self.composite("append")?.call(children)
    }

    pub fn prepend<I, C>(&self, children: I) -> Result<Handle, WrapError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        self.composite("prepend")?.call(children)
    }

    // ---- injected helpers ----

    pub fn append_node(&self, kind: &str, props: &Props) -> Result<Handle, WrapError> {
        self.chain("appendNode", &[Value::from(kind), Value::from(props)])
    }

    pub fn prepend_node(&self, kind: &str, props: &Props) -> Result<Handle, WrapError> {
        self.chain("prependNode", &[Value::from(kind), Value::from(props)])
    }

    pub fn append_text(&self, text: &str) -> Result<Handle, WrapError> {
        self.chain("appendText", &[Value::from(text)])
    }

    pub fn prepend_text(&self, text: &str) -> Result<Handle, WrapError> {
        self.chain("prependText", &[Value::from(text)])
    }

    pub fn append_wrapped<I, W>(&self, items: I) -> Result<Handle, WrapError>
    where
        I: IntoIterator<Item = W>,
        W: Into<Wrappable>,
    {
        self.insert_each("appendWrapped", items)
    }

    pub fn prepend_wrapped<I, W>(&self, items: I) -> Result<Handle, WrapError>
    where
        I: IntoIterator<Item = W>,
        W: Into<Wrappable>,
    {
        self.insert_each("prependWrapped", items)
    }

    /// Hand the items to helper `name` one at a time, unwrapping each right
    /// before its insertion.
    fn insert_each<I, W>(&self, name: &str, items: I) -> Result<Handle, WrapError>
    where
        I: IntoIterator<Item = W>,
        W: Into<Wrappable>,
    {
        let Access::Method(method) = self.get(name)? else {
            return Err(DomError::NotCallable(name.to_string()).into());
        };
        for item in items {
            let node = item.into().into_node()?;
            method.invoke(&[Value::Node(node)])?;
        }
        Ok(self.clone())
    }

    // ---- native members ----

    pub fn append_child(&self, child: &Node) -> Result<Handle, WrapError> {
        self.chain("appendChild", &[Value::from(child)])
    }

    pub fn set_attribute(&self, name: &str, value: impl Into<Value>) -> Result<Handle, WrapError> {
        self.chain("setAttribute", &[Value::from(name), value.into()])
    }

    pub fn remove_attribute(&self, name: &str) -> Result<Handle, WrapError> {
        self.chain("removeAttribute", &[Value::from(name)])
    }

    pub fn get_attribute(&self, name: &str) -> Result<Option<String>, WrapError> {
        match self.invoke_raw("getAttribute", &[Value::from(name)])? {
            Value::String(value) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    pub fn has_attribute(&self, name: &str) -> Result<bool, WrapError> {
        Ok(self
            .invoke_raw("hasAttribute", &[Value::from(name)])?
            .truthy())
    }

    /// Read any member's value.
    pub fn property(&self, name: &str) -> Result<Value, WrapError> {
        Ok(self.get(name)?.into_value())
    }

    pub fn clone_node(&self, deep: bool) -> Result<Node, WrapError> {
        let value = self.invoke_raw("cloneNode", &[Value::from(deep)])?;
        expect_node("cloneNode", value)
    }

    pub fn matches(&self, selector: &str) -> Result<bool, WrapError> {
        Ok(self.invoke_raw("matches", &[Value::from(selector)])?.truthy())
    }

    pub fn contains(&self, other: &Node) -> Result<bool, WrapError> {
        Ok(self.invoke_raw("contains", &[Value::from(other)])?.truthy())
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<Node>, WrapError> {
        match self.invoke_raw("querySelector", &[Value::from(selector)])? {
            Value::Null | Value::Undefined => Ok(None),
            other => expect_node("querySelector", other).map(Some),
        }
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Node>, WrapError> {
        let value = self.invoke_raw("querySelectorAll", &[Value::from(selector)])?;
        Ok(value
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_node)
            .cloned()
            .collect())
    }

    pub fn inner_html(&self) -> Result<String, WrapError> {
        Ok(self.property("innerHTML")?.coerce_to_string())
    }

    pub fn outer_html(&self) -> Result<String, WrapError> {
        Ok(self.property("outerHTML")?.coerce_to_string())
    }
}

fn expect_node(member: &'static str, value: Value) -> Result<Node, WrapError> {
    match value {
        Value::Node(node) => Ok(node),
        _ => Err(WrapError::Dom(DomError::InvalidArgument {
            member,
            expected: "a node result",
        })),
    }
}

impl Unwrappable for Handle {
    fn unwrap_node(&self) -> Result<Node, WrapError> {
        self.unwrap()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("node", &self.shared.node)
            .field("state", &self.state())
            .field("injected", &self.shared.injected)
            .finish()
    }
}
