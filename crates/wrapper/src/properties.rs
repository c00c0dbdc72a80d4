//! Property applier: merges a configuration mapping into a host object.

use crate::config::{AttributeRouting, Route};
use dom::{DomError, Node, Value};

/// Ordered configuration mapping. Later entries for the same key replace
/// earlier ones in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props(Vec<(String, Value)>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a mapping passed through the dynamic call path. Nullish values
    /// mean "no configuration"; anything other than a record is rejected.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        match value {
            None | Some(Value::Undefined | Value::Null) => Some(Self::new()),
            Some(Value::Record(entries)) => Some(entries.iter().cloned().collect()),
            Some(_) => None,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

impl From<Props> for Value {
    fn from(props: Props) -> Self {
        Value::Record(props.0)
    }
}

impl From<&Props> for Value {
    fn from(props: &Props) -> Self {
        Value::Record(props.0.clone())
    }
}

/// Apply `props` to `node` with the default routing, returning the same node.
pub fn apply_properties<'n>(node: &'n Node, props: &Props) -> Result<&'n Node, DomError> {
    apply_properties_with(node, props, &AttributeRouting::default())
}

/// Apply `props` to `node`: attribute-routed keys go through `setAttribute`
/// with the value coerced to a string, all other keys are assigned as members.
pub fn apply_properties_with<'n>(
    node: &'n Node,
    props: &Props,
    routing: &AttributeRouting,
) -> Result<&'n Node, DomError> {
    for (key, value) in props.iter() {
        match routing.route(key) {
            Route::Attribute => node.set_attribute(key, &value.coerce_to_string())?,
            Route::Field => node.set_member(key, value.clone())?,
        }
    }
    Ok(node)
}
