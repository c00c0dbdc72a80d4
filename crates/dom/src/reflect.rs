//! Dynamic member protocol: name-based property reads/writes and method calls.
//!
//! Lookup order mirrors script objects: own keys shadow the native members
//! provided by the node's kind. Native members are never own keys.

use crate::error::DomError;
use crate::node::Node;
use crate::types::{Function, NodeType, Value};

const NODE_PROPERTIES: &[&str] = &[
    "nodeType",
    "nodeName",
    "nodeValue",
    "parentNode",
    "childNodes",
    "firstChild",
    "lastChild",
    "textContent",
];

const ELEMENT_PROPERTIES: &[&str] = &[
    "tagName",
    "localName",
    "id",
    "className",
    "classList",
    "title",
    "hidden",
    "tabIndex",
    "lang",
    "dir",
    "name",
    "type",
    "value",
    "action",
    "method",
    "href",
    "src",
    "alt",
    "placeholder",
    "dataset",
    "attributes",
    "children",
    "childElementCount",
    "innerHTML",
    "outerHTML",
];

const TEXT_PROPERTIES: &[&str] = &["data", "length"];

const WRITABLE_PROPERTIES: &[&str] = &[
    "id",
    "className",
    "title",
    "hidden",
    "tabIndex",
    "lang",
    "dir",
    "name",
    "type",
    "value",
    "action",
    "method",
    "href",
    "src",
    "alt",
    "placeholder",
    "textContent",
    "nodeValue",
    "data",
];

const NODE_METHODS: &[&str] = &[
    "remove",
    "hasChildNodes",
    "cloneNode",
    "contains",
    "isEqualNode",
    "isSameNode",
    "compareDocumentPosition",
];

const ELEMENT_METHODS: &[&str] = &[
    "setAttribute",
    "getAttribute",
    "hasAttribute",
    "removeAttribute",
    "toggleAttribute",
    "getAttributeNames",
    "hasAttributes",
    "appendChild",
    "insertBefore",
    "removeChild",
    "append",
    "prepend",
    "matches",
    "closest",
    "querySelector",
    "querySelectorAll",
    "getElementsByTagName",
    "getElementsByClassName",
    "normalize",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NativeMember {
    Property(&'static str),
    Method(&'static str),
}

fn lookup(table: &[&'static str], name: &str) -> Option<&'static str> {
    table.iter().copied().find(|entry| *entry == name)
}

impl Node {
    fn native_member(&self, name: &str) -> Option<NativeMember> {
        let (properties, methods): (&[&'static str], &[&'static str]) = match self.node_type() {
            NodeType::Element => (ELEMENT_PROPERTIES, ELEMENT_METHODS),
            NodeType::Text => (TEXT_PROPERTIES, &[]),
        };
        lookup(NODE_PROPERTIES, name)
            .or_else(|| lookup(properties, name))
            .map(NativeMember::Property)
            .or_else(|| {
                lookup(NODE_METHODS, name)
                    .or_else(|| lookup(methods, name))
                    .map(NativeMember::Method)
            })
    }

    /// Whether `name` resolves to an own key or a native member.
    pub fn has_member(&self, name: &str) -> bool {
        self.has_own(name) || self.native_member(name).is_some()
    }

    /// Read a member; native methods come back as [`Value::Function`].
    pub fn get_member(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.get_own(name) {
            return Some(value);
        }
        match self.native_member(name)? {
            NativeMember::Property(property) => Some(self.read_property(property)),
            NativeMember::Method(method) => Some(Value::Function(Function::native(method))),
        }
    }

    /// Assign a member.
    ///
    /// Existing own keys are overwritten; writable native properties update
    /// the state they reflect; read-only native properties fail; any other
    /// name becomes a new own key.
    pub fn set_member(&self, name: &str, value: Value) -> Result<(), DomError> {
        if self.has_own(name) {
            self.set_own(name, value);
            return Ok(());
        }
        match self.native_member(name) {
            Some(NativeMember::Property(property)) => {
                if lookup(WRITABLE_PROPERTIES, property).is_none() {
                    return Err(DomError::ReadOnlyProperty(name.to_string()));
                }
                self.write_property(property, &value)
            }
            Some(NativeMember::Method(_)) | None => {
                self.set_own(name, value);
                Ok(())
            }
        }
    }

    /// Call a member with `self` as receiver.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, DomError> {
        if let Some(value) = self.get_own(name) {
            return match value {
                Value::Function(f) => f.call(self, args),
                _ => Err(DomError::NotCallable(name.to_string())),
            };
        }
        match self.native_member(name) {
            Some(NativeMember::Method(method)) => invoke_native(self, method, args),
            _ => Err(DomError::NotCallable(name.to_string())),
        }
    }

    fn read_property(&self, name: &str) -> Value {
        let attr_or_empty = |attr: &str| Value::String(self.get_attribute(attr).unwrap_or_default());
        match name {
            "nodeType" => Value::Number(f64::from(self.node_type().code())),
            "nodeName" => Value::String(self.node_name()),
            "nodeValue" => Value::from(self.node_value()),
            "parentNode" => Value::from(self.parent_node()),
            "childNodes" => Value::from(self.child_nodes()),
            "firstChild" => Value::from(self.first_child()),
            "lastChild" => Value::from(self.last_child()),
            "textContent" => Value::String(self.text_content()),
            "tagName" => Value::from(self.tag_name()),
            "localName" => Value::from(self.local_name()),
            "id" => attr_or_empty("id"),
            "className" => attr_or_empty("class"),
            "title" | "lang" | "dir" | "name" | "type" | "value" | "action" | "method" | "href"
            | "src" | "alt" | "placeholder" => attr_or_empty(name),
            "classList" => Value::List(self.class_list().into_iter().map(Value::String).collect()),
            "hidden" => Value::Bool(self.has_attribute("hidden")),
            "tabIndex" => Value::Number(
                self.get_attribute("tabindex")
                    .and_then(|v| v.trim().parse::<i32>().ok())
                    .map_or(-1.0, f64::from),
            ),
            "dataset" => record(self.dataset()),
            "attributes" => record(self.attributes()),
            "children" => Value::from(self.children()),
            "childElementCount" => Value::Number(self.children().len() as f64),
            "innerHTML" => Value::String(self.inner_html()),
            "outerHTML" => Value::String(self.outer_html()),
            "data" => Value::String(self.node_value().unwrap_or_default()),
            "length" => Value::Number(
                self.node_value()
                    .map_or(0, |data| data.encode_utf16().count()) as f64,
            ),
            _ => Value::Undefined,
        }
    }

    fn write_property(&self, name: &str, value: &Value) -> Result<(), DomError> {
        match name {
            "id" => self.set_attribute("id", &value.coerce_to_string()),
            "className" => self.set_attribute("class", &value.coerce_to_string()),
            "title" | "lang" | "dir" | "name" | "type" | "value" | "action" | "method" | "href"
            | "src" | "alt" | "placeholder" => self.set_attribute(name, &value.coerce_to_string()),
            "hidden" => self.toggle_attribute("hidden", Some(value.truthy())).map(|_| ()),
            "tabIndex" => {
                let n = value.coerce_to_number();
                let n = if n.is_finite() { n.trunc() } else { 0.0 };
                self.set_attribute("tabindex", &Value::Number(n).coerce_to_string())
            }
            "textContent" => {
                let text = if value.is_nullish() {
                    String::new()
                } else {
                    value.coerce_to_string()
                };
                self.set_text_content(&text);
                Ok(())
            }
            "nodeValue" | "data" => {
                if self.is_text() {
                    self.set_node_value(&value.coerce_to_string());
                }
                Ok(())
            }
            _ => Err(DomError::ReadOnlyProperty(name.to_string())),
        }
    }
}

fn record(entries: Vec<(String, String)>) -> Value {
    Value::Record(
        entries
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect(),
    )
}

fn string_arg(args: &[Value], index: usize, member: &'static str) -> Result<String, DomError> {
    match args.get(index) {
        Some(value) => Ok(value.coerce_to_string()),
        None => Err(DomError::InvalidArgument {
            member,
            expected: "a string argument",
        }),
    }
}

fn node_arg<'a>(args: &'a [Value], index: usize, member: &'static str) -> Result<&'a Node, DomError> {
    args.get(index).and_then(Value::as_node).ok_or(DomError::InvalidArgument {
        member,
        expected: "a node argument",
    })
}

fn optional_node_arg<'a>(
    args: &'a [Value],
    index: usize,
    member: &'static str,
) -> Result<Option<&'a Node>, DomError> {
    match args.get(index) {
        None | Some(Value::Undefined | Value::Null) => Ok(None),
        Some(Value::Node(node)) => Ok(Some(node)),
        Some(_) => Err(DomError::InvalidArgument {
            member,
            expected: "a node or null",
        }),
    }
}

/// Turn a native `append`/`prepend` argument into a node: nodes pass through,
/// everything else becomes a text node.
fn insertable(parent: &Node, value: &Value) -> Node {
    match value {
        Value::Node(node) => node.clone(),
        other => parent.document().create_text_node(&other.coerce_to_string()),
    }
}

pub(crate) fn invoke_native(node: &Node, name: &str, args: &[Value]) -> Result<Value, DomError> {
    match name {
        "setAttribute" => {
            let attr = string_arg(args, 0, "setAttribute")?;
            let value = string_arg(args, 1, "setAttribute")?;
            node.set_attribute(&attr, &value)?;
            Ok(Value::Undefined)
        }
        "getAttribute" => {
            let attr = string_arg(args, 0, "getAttribute")?;
            Ok(Value::from(node.get_attribute(&attr)))
        }
        "hasAttribute" => {
            let attr = string_arg(args, 0, "hasAttribute")?;
            Ok(Value::Bool(node.has_attribute(&attr)))
        }
        "removeAttribute" => {
            let attr = string_arg(args, 0, "removeAttribute")?;
            node.remove_attribute(&attr);
            Ok(Value::Undefined)
        }
        "toggleAttribute" => {
            let attr = string_arg(args, 0, "toggleAttribute")?;
            let force = match args.get(1) {
                None | Some(Value::Undefined) => None,
                Some(other) => Some(other.truthy()),
            };
            Ok(Value::Bool(node.toggle_attribute(&attr, force)?))
        }
        "getAttributeNames" => Ok(Value::List(
            node.attribute_names().into_iter().map(Value::String).collect(),
        )),
        "hasAttributes" => Ok(Value::Bool(node.has_attributes())),
        "appendChild" => {
            let child = node_arg(args, 0, "appendChild")?;
            node.append_child(child).map(Value::Node)
        }
        "insertBefore" => {
            let child = node_arg(args, 0, "insertBefore")?;
            let reference = optional_node_arg(args, 1, "insertBefore")?;
            node.insert_before(child, reference).map(Value::Node)
        }
        "removeChild" => {
            let child = node_arg(args, 0, "removeChild")?;
            node.remove_child(child).map(Value::Node)
        }
        "append" => {
            for value in args {
                node.append_child(&insertable(node, value))?;
            }
            Ok(Value::Undefined)
        }
        "prepend" => {
            let reference = node.first_child();
            for value in args {
                node.insert_before(&insertable(node, value), reference.as_ref())?;
            }
            Ok(Value::Undefined)
        }
        "remove" => {
            node.remove();
            Ok(Value::Undefined)
        }
        "hasChildNodes" => Ok(Value::Bool(node.has_child_nodes())),
        "cloneNode" => Ok(Value::Node(node.clone_node(args.first().is_some_and(Value::truthy)))),
        "contains" => Ok(Value::Bool(
            optional_node_arg(args, 0, "contains")?.is_some_and(|other| node.contains(other)),
        )),
        "isEqualNode" => Ok(Value::Bool(
            optional_node_arg(args, 0, "isEqualNode")?.is_some_and(|other| node.is_equal_node(other)),
        )),
        "isSameNode" => Ok(Value::Bool(
            optional_node_arg(args, 0, "isSameNode")?.is_some_and(|other| node.is_same_node(other)),
        )),
        "compareDocumentPosition" => {
            let other = node_arg(args, 0, "compareDocumentPosition")?;
            Ok(Value::Number(f64::from(node.compare_document_position(other))))
        }
        "matches" => {
            let selector = string_arg(args, 0, "matches")?;
            node.matches(&selector).map(Value::Bool)
        }
        "closest" => {
            let selector = string_arg(args, 0, "closest")?;
            node.closest(&selector).map(Value::from)
        }
        "querySelector" => {
            let selector = string_arg(args, 0, "querySelector")?;
            node.query_selector(&selector).map(Value::from)
        }
        "querySelectorAll" => {
            let selector = string_arg(args, 0, "querySelectorAll")?;
            node.query_selector_all(&selector).map(Value::from)
        }
        "getElementsByTagName" => {
            let tag = string_arg(args, 0, "getElementsByTagName")?;
            Ok(Value::from(node.elements_by_tag_name(&tag)))
        }
        "getElementsByClassName" => {
            let classes = string_arg(args, 0, "getElementsByClassName")?;
            Ok(Value::from(node.elements_by_class_name(&classes)))
        }
        "normalize" => {
            node.normalize();
            Ok(Value::Undefined)
        }
        _ => Err(DomError::NotCallable(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    #[test]
    fn own_keys_shadow_native_members() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        div.set_own("cloneNode", Value::from("shadowed"));
        assert_eq!(div.get_member("cloneNode"), Some(Value::from("shadowed")));
        assert_eq!(
            div.invoke("cloneNode", &[]),
            Err(DomError::NotCallable("cloneNode".to_string()))
        );
    }

    #[test]
    fn text_nodes_expose_a_narrower_surface() {
        let doc = Document::new();
        let text = doc.create_text_node("héllo");
        assert!(text.has_member("data"));
        assert!(text.has_member("cloneNode"));
        assert!(!text.has_member("setAttribute"));
        assert!(!text.has_member("append"));
        assert_eq!(text.get_member("length"), Some(Value::from(5)));
    }

    #[test]
    fn read_only_properties_reject_writes() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        assert_eq!(
            div.set_member("nodeType", Value::from(3)),
            Err(DomError::ReadOnlyProperty("nodeType".to_string()))
        );
    }

    #[test]
    fn tab_index_reflects_the_attribute() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        assert_eq!(div.get_member("tabIndex"), Some(Value::from(-1)));
        div.set_member("tabIndex", Value::from("2")).unwrap();
        assert_eq!(div.get_attribute("tabindex").as_deref(), Some("2"));
        assert_eq!(div.get_member("tabIndex"), Some(Value::from(2)));
    }

    #[test]
    fn missing_arguments_are_reported() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        assert_eq!(
            div.invoke("appendChild", &[]),
            Err(DomError::InvalidArgument {
                member: "appendChild",
                expected: "a node argument",
            })
        );
    }
}
