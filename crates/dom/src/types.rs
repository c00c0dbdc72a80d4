use crate::error::DomError;
use crate::node::Node;
use std::fmt;
use std::rc::Rc;

/// Arena slot of a node inside its owning document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element,
    Text,
}

impl NodeType {
    /// Numeric `nodeType` code as exposed to scripts.
    pub fn code(self) -> u16 {
        match self {
            NodeType::Element => 1,
            NodeType::Text => 3,
        }
    }
}

/// Signature of a host closure stored on a node as an own key.
pub type HostFn = dyn Fn(&Node, &[Value]) -> Result<Value, DomError>;

/// Callable member value.
///
/// Native functions are resolved by name against the receiver's kind when
/// called; host functions are closures attached at runtime, optionally tagged
/// with the name of the component that installed them. Equality is identity:
/// two host functions are equal only if they share an allocation.
#[derive(Clone)]
pub struct Function(FunctionKind);

#[derive(Clone)]
enum FunctionKind {
    Native(&'static str),
    Host {
        f: Rc<HostFn>,
        tag: Option<&'static str>,
    },
}

impl Function {
    pub fn new(f: impl Fn(&Node, &[Value]) -> Result<Value, DomError> + 'static) -> Self {
        Function(FunctionKind::Host {
            f: Rc::new(f),
            tag: None,
        })
    }

    pub fn tagged(
        tag: &'static str,
        f: impl Fn(&Node, &[Value]) -> Result<Value, DomError> + 'static,
    ) -> Self {
        Function(FunctionKind::Host {
            f: Rc::new(f),
            tag: Some(tag),
        })
    }

    /// Tag given to a host function by [`Function::tagged`].
    pub fn tag(&self) -> Option<&'static str> {
        match self.0 {
            FunctionKind::Host { tag, .. } => tag,
            FunctionKind::Native(_) => None,
        }
    }

    pub(crate) fn native(name: &'static str) -> Self {
        Function(FunctionKind::Native(name))
    }

    pub fn native_name(&self) -> Option<&'static str> {
        match self.0 {
            FunctionKind::Native(name) => Some(name),
            FunctionKind::Host { .. } => None,
        }
    }

    /// Invoke with `receiver` bound as the node the function operates on.
    pub fn call(&self, receiver: &Node, args: &[Value]) -> Result<Value, DomError> {
        match &self.0 {
            FunctionKind::Native(name) => crate::reflect::invoke_native(receiver, name, args),
            FunctionKind::Host { f, .. } => f(receiver, args),
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (FunctionKind::Native(a), FunctionKind::Native(b)) => a == b,
            (FunctionKind::Host { f: a, .. }, FunctionKind::Host { f: b, .. }) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            FunctionKind::Native(name) => write!(f, "Function(native {name})"),
            FunctionKind::Host { tag: None, .. } => f.write_str("Function(host)"),
            FunctionKind::Host { tag: Some(tag), .. } => write!(f, "Function(host {tag})"),
        }
    }
}

/// Dynamically typed member value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Node(Node),
    List(Vec<Value>),
    Record(Vec<(String, Value)>),
    Function(Function),
}

impl Value {
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Record(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Look up `key` in a record value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_record()
            .and_then(|entries| entries.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v)
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Node(_) | Value::List(_) | Value::Record(_) | Value::Function(_) => true,
        }
    }

    /// Script-style string coercion, as used when a value lands in an attribute.
    pub fn coerce_to_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Node(node) => match node.node_type() {
                NodeType::Element => "[object HTMLElement]".to_string(),
                NodeType::Text => "[object Text]".to_string(),
            },
            Value::List(items) => items
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.coerce_to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Record(_) => "[object Object]".to_string(),
            Value::Function(_) => "function".to_string(),
        }
    }

    /// Script-style numeric coercion; unparsable input yields NaN.
    pub fn coerce_to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            _ => f64::NAN,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{n:.0}");
    }
    format!("{n}")
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<Node> for Value {
    fn from(value: Node) -> Self {
        Value::Node(value)
    }
}

impl From<&Node> for Value {
    fn from(value: &Node) -> Self {
        Value::Node(value.clone())
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map_or(Value::Null, Value::String)
    }
}

impl From<Option<Node>> for Value {
    fn from(value: Option<Node>) -> Self {
        value.map_or(Value::Null, Value::Node)
    }
}

impl From<Vec<Node>> for Value {
    fn from(value: Vec<Node>) -> Self {
        Value::List(value.into_iter().map(Value::Node).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_coerce_like_script_strings() {
        assert_eq!(Value::from(-1).coerce_to_string(), "-1");
        assert_eq!(Value::from(0.5).coerce_to_string(), "0.5");
        assert_eq!(Value::from(-0.0).coerce_to_string(), "0");
        assert_eq!(Value::Number(f64::NAN).coerce_to_string(), "NaN");
        assert_eq!(Value::Number(f64::NEG_INFINITY).coerce_to_string(), "-Infinity");
    }

    #[test]
    fn scalars_coerce_to_strings() {
        assert_eq!(Value::from(true).coerce_to_string(), "true");
        assert_eq!(Value::Null.coerce_to_string(), "null");
        assert_eq!(
            Value::List(vec![Value::from("a"), Value::Null, Value::from(2)]).coerce_to_string(),
            "a,,2"
        );
    }

    #[test]
    fn host_functions_compare_by_identity() {
        let f = Function::new(|_, _| Ok(Value::Undefined));
        let g = Function::new(|_, _| Ok(Value::Undefined));
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
        assert_eq!(Function::native("cloneNode"), Function::native("cloneNode"));
    }

    #[test]
    fn only_tagged_host_functions_report_a_tag() {
        let tagged = Function::tagged("wrapper", |_, _| Ok(Value::Undefined));
        assert_eq!(tagged.tag(), Some("wrapper"));
        assert_eq!(Function::new(|_, _| Ok(Value::Undefined)).tag(), None);
        assert_eq!(Function::native("cloneNode").tag(), None);
        assert_eq!(format!("{tagged:?}"), "Function(host wrapper)");
    }

    #[test]
    fn numeric_coercion_parses_trimmed_strings() {
        assert_eq!(Value::from(" -3 ").coerce_to_number(), -3.0);
        assert_eq!(Value::from("").coerce_to_number(), 0.0);
        assert!(Value::from("x").coerce_to_number().is_nan());
        assert_eq!(Value::from(true).coerce_to_number(), 1.0);
    }
}
