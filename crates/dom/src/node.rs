use crate::arena::NodeKind;
use crate::document::Document;
use crate::error::DomError;
use crate::selector::SelectorList;
use crate::tags::normalize_attribute_name;
use crate::types::{NodeKey, NodeType, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub const DOCUMENT_POSITION_DISCONNECTED: u16 = 0x01;
pub const DOCUMENT_POSITION_PRECEDING: u16 = 0x02;
pub const DOCUMENT_POSITION_FOLLOWING: u16 = 0x04;
pub const DOCUMENT_POSITION_CONTAINS: u16 = 0x08;
pub const DOCUMENT_POSITION_CONTAINED_BY: u16 = 0x10;
pub const DOCUMENT_POSITION_IMPLEMENTATION_SPECIFIC: u16 = 0x20;

/// Non-owning reference to a node in a [`Document`].
///
/// Two `Node`s are equal exactly when they refer to the same host object.
#[derive(Clone)]
pub struct Node {
    doc: Document,
    key: NodeKey,
}

impl Node {
    pub(crate) fn from_parts(doc: Document, key: NodeKey) -> Self {
        Self { doc, key }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[cfg(feature = "internal-api")]
    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub(crate) fn raw_key(&self) -> NodeKey {
        self.key
    }

    fn ensure_same_document(&self, other: &Node) -> Result<(), DomError> {
        if self.doc.ptr_eq(&other.doc) {
            Ok(())
        } else {
            Err(DomError::WrongDocument)
        }
    }

    // ---- kind and names ----

    pub fn node_type(&self) -> NodeType {
        match self.doc.arena().record(self.key).kind {
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text { .. } => NodeType::Text,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type() == NodeType::Text
    }

    /// Lowercase element name; `None` for text nodes.
    pub fn local_name(&self) -> Option<String> {
        match &self.doc.arena().record(self.key).kind {
            NodeKind::Element { local_name, .. } => Some(local_name.to_string()),
            NodeKind::Text { .. } => None,
        }
    }

    /// Uppercase element name; `None` for text nodes.
    pub fn tag_name(&self) -> Option<String> {
        self.local_name().map(|name| name.to_ascii_uppercase())
    }

    pub fn node_name(&self) -> String {
        self.tag_name().unwrap_or_else(|| "#text".to_string())
    }

    pub(crate) fn is_element_named(&self, name: &str) -> bool {
        match &self.doc.arena().record(self.key).kind {
            NodeKind::Element { local_name, .. } => local_name.eq_ignore_ascii_case(name),
            NodeKind::Text { .. } => false,
        }
    }

    // ---- character data ----

    pub fn node_value(&self) -> Option<String> {
        match &self.doc.arena().record(self.key).kind {
            NodeKind::Text { data } => Some(data.clone()),
            NodeKind::Element { .. } => None,
        }
    }

    /// Replace a text node's data; no effect on elements.
    pub fn set_node_value(&self, value: &str) {
        if let NodeKind::Text { data } = &mut self.doc.arena_mut().record_mut(self.key).kind {
            data.clear();
            data.push_str(value);
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.doc.arena().text_content(self.key, &mut out);
        out
    }

    /// Replace all children with a single text node (none if `text` is empty).
    pub fn set_text_content(&self, text: &str) {
        if self.is_text() {
            self.set_node_value(text);
            return;
        }
        let children = self.doc.arena().record(self.key).children.clone();
        {
            let mut arena = self.doc.arena_mut();
            for child in children {
                arena.detach(child);
            }
        }
        if !text.is_empty() {
            let leaf = self.doc.create_text_node(text);
            let mut arena = self.doc.arena_mut();
            arena.record_mut(leaf.key).parent = Some(self.key);
            arena.record_mut(self.key).children.push(leaf.key);
        }
    }

    // ---- attributes ----

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match &self.doc.arena().record(self.key).kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone()),
            NodeKind::Text { .. } => None,
        }
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        let name = normalize_attribute_name(name)?;
        let mut arena = self.doc.arena_mut();
        let NodeKind::Element { attributes, .. } = &mut arena.record_mut(self.key).kind else {
            return Err(DomError::WrongNodeKind("setAttribute"));
        };
        match attributes.iter_mut().find(|(k, _)| **k == *name) {
            Some((_, existing)) => {
                existing.clear();
                existing.push_str(value);
            }
            None => attributes.push((Arc::from(name.as_str()), value.to_string())),
        }
        Ok(())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Returns whether an attribute was removed.
    pub fn remove_attribute(&self, name: &str) -> bool {
        let mut arena = self.doc.arena_mut();
        let NodeKind::Element { attributes, .. } = &mut arena.record_mut(self.key).kind else {
            return false;
        };
        let before = attributes.len();
        attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        attributes.len() != before
    }

    /// Add or remove a boolean attribute; returns whether it is now present.
    pub fn toggle_attribute(&self, name: &str, force: Option<bool>) -> Result<bool, DomError> {
        normalize_attribute_name(name)?;
        let present = self.has_attribute(name);
        let want = force.unwrap_or(!present);
        if want && !present {
            self.set_attribute(name, "")?;
        } else if !want && present {
            self.remove_attribute(name);
        }
        Ok(want)
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        match &self.doc.arena().record(self.key).kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            NodeKind::Text { .. } => Vec::new(),
        }
    }

    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes().into_iter().map(|(k, _)| k).collect()
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes().is_empty()
    }

    pub fn id(&self) -> String {
        self.get_attribute("id").unwrap_or_default()
    }

    pub fn class_name(&self) -> String {
        self.get_attribute("class").unwrap_or_default()
    }

    pub fn class_list(&self) -> Vec<String> {
        self.class_name()
            .split_ascii_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// `data-*` attributes keyed by their camel-cased dataset name.
    pub fn dataset(&self) -> Vec<(String, String)> {
        self.attributes()
            .into_iter()
            .filter_map(|(name, value)| {
                name.strip_prefix("data-")
                    .map(|rest| (dataset_key(rest), value))
            })
            .collect()
    }

    // ---- tree navigation ----

    pub fn parent_node(&self) -> Option<Node> {
        let parent = self.doc.arena().record(self.key).parent;
        parent.map(|key| self.doc.node(key))
    }

    pub fn child_nodes(&self) -> Vec<Node> {
        let children = self.doc.arena().record(self.key).children.clone();
        children.into_iter().map(|key| self.doc.node(key)).collect()
    }

    pub fn children(&self) -> Vec<Node> {
        self.child_nodes()
            .into_iter()
            .filter(Node::is_element)
            .collect()
    }

    pub fn first_child(&self) -> Option<Node> {
        let first = self.doc.arena().record(self.key).children.first().copied();
        first.map(|key| self.doc.node(key))
    }

    pub fn last_child(&self) -> Option<Node> {
        let last = self.doc.arena().record(self.key).children.last().copied();
        last.map(|key| self.doc.node(key))
    }

    pub fn next_sibling(&self) -> Option<Node> {
        let next = self.doc.arena().next_sibling(self.key);
        next.map(|key| self.doc.node(key))
    }

    pub fn previous_sibling(&self) -> Option<Node> {
        let previous = self.doc.arena().previous_sibling(self.key);
        previous.map(|key| self.doc.node(key))
    }

    pub fn child_count(&self) -> usize {
        self.doc.arena().record(self.key).children.len()
    }

    pub fn has_child_nodes(&self) -> bool {
        self.child_count() > 0
    }

    /// Pre-order descendants, excluding `self`.
    pub fn descendants(&self) -> Vec<Node> {
        let keys = self.doc.arena().descendants(self.key);
        keys.into_iter().map(|key| self.doc.node(key)).collect()
    }

    // ---- tree mutation ----

    pub fn append_child(&self, child: &Node) -> Result<Node, DomError> {
        self.insert_before(child, None)
    }

    /// Insert `child` as the first child; on an empty node this is an append.
    pub fn prepend_child(&self, child: &Node) -> Result<Node, DomError> {
        let first = self.first_child();
        self.insert_before(child, first.as_ref())
    }

    pub fn insert_before(&self, child: &Node, reference: Option<&Node>) -> Result<Node, DomError> {
        self.ensure_same_document(child)?;
        if let Some(reference) = reference {
            self.ensure_same_document(reference)?;
        }
        self.doc
            .arena_mut()
            .insert_before(self.key, child.key, reference.map(|r| r.key))?;
        Ok(child.clone())
    }

    pub fn remove_child(&self, child: &Node) -> Result<Node, DomError> {
        self.ensure_same_document(child)?;
        self.doc.arena_mut().remove_child(self.key, child.key)?;
        Ok(child.clone())
    }

    /// Detach from the parent, if any.
    pub fn remove(&self) {
        self.doc.arena_mut().detach(self.key);
    }

    /// Merge adjacent text children and drop empty ones, recursively.
    pub fn normalize(&self) {
        let mut targets = vec![self.key];
        targets.extend(self.doc.arena().descendants(self.key));
        let mut arena = self.doc.arena_mut();
        for parent in targets {
            if !matches!(arena.record(parent).kind, NodeKind::Element { .. }) {
                continue;
            }
            let children = std::mem::take(&mut arena.record_mut(parent).children);
            let mut kept: Vec<NodeKey> = Vec::with_capacity(children.len());
            for child in children {
                let NodeKind::Text { data } = &arena.record(child).kind else {
                    kept.push(child);
                    continue;
                };
                let data = data.clone();
                let merge_into = kept
                    .last()
                    .copied()
                    .filter(|prev| matches!(arena.record(*prev).kind, NodeKind::Text { .. }));
                if data.is_empty() || merge_into.is_some() {
                    if let Some(prev) = merge_into {
                        if let NodeKind::Text { data: prev_data } =
                            &mut arena.record_mut(prev).kind
                        {
                            prev_data.push_str(&data);
                        }
                    }
                    arena.record_mut(child).parent = None;
                } else {
                    kept.push(child);
                }
            }
            arena.record_mut(parent).children = kept;
        }
    }

    // ---- comparison ----

    pub fn clone_node(&self, deep: bool) -> Node {
        let key = self.doc.arena_mut().clone_subtree(self.key, deep);
        self.doc.node(key)
    }

    /// Inclusive descendant test.
    pub fn contains(&self, other: &Node) -> bool {
        self.doc.ptr_eq(&other.doc) && self.doc.arena().is_inclusive_ancestor(self.key, other.key)
    }

    pub fn is_same_node(&self, other: &Node) -> bool {
        self == other
    }

    pub fn is_equal_node(&self, other: &Node) -> bool {
        self.doc.ptr_eq(&other.doc) && self.doc.arena().is_equal(self.key, other.key)
    }

    /// Position of `other` relative to `self`, as a `DOCUMENT_POSITION_*` bitmask.
    pub fn compare_document_position(&self, other: &Node) -> u16 {
        if self == other {
            return 0;
        }
        let disconnected = |other_first: bool| {
            DOCUMENT_POSITION_DISCONNECTED
                | DOCUMENT_POSITION_IMPLEMENTATION_SPECIFIC
                | if other_first {
                    DOCUMENT_POSITION_PRECEDING
                } else {
                    DOCUMENT_POSITION_FOLLOWING
                }
        };
        if !self.doc.ptr_eq(&other.doc) {
            return disconnected(other.doc.addr() < self.doc.addr());
        }
        let arena = self.doc.arena();
        let mine = arena.ancestry(self.key);
        let theirs = arena.ancestry(other.key);
        if mine[0] != theirs[0] {
            return disconnected(theirs[0] < mine[0]);
        }
        let shared = mine
            .iter()
            .zip(&theirs)
            .take_while(|(a, b)| a == b)
            .count();
        if shared == theirs.len() {
            return DOCUMENT_POSITION_CONTAINS | DOCUMENT_POSITION_PRECEDING;
        }
        if shared == mine.len() {
            return DOCUMENT_POSITION_CONTAINED_BY | DOCUMENT_POSITION_FOLLOWING;
        }
        let siblings = &arena.record(mine[shared - 1]).children;
        let my_index = siblings.iter().position(|k| *k == mine[shared]);
        let their_index = siblings.iter().position(|k| *k == theirs[shared]);
        if their_index < my_index {
            DOCUMENT_POSITION_PRECEDING
        } else {
            DOCUMENT_POSITION_FOLLOWING
        }
    }

    // ---- selectors ----

    pub fn matches(&self, selector: &str) -> Result<bool, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(list.matches(self))
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, selector: &str) -> Result<Option<Node>, DomError> {
        let list = SelectorList::parse(selector)?;
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if list.matches(&node) {
                return Ok(Some(node));
            }
            current = node.parent_node();
        }
        Ok(None)
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<Node>, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(self.descendants().into_iter().find(|n| list.matches(n)))
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Node>, DomError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants()
            .into_iter()
            .filter(|n| list.matches(n))
            .collect())
    }

    /// Descendant elements with the given name; `*` matches all.
    pub fn elements_by_tag_name(&self, name: &str) -> Vec<Node> {
        self.descendants()
            .into_iter()
            .filter(|n| n.is_element() && (name == "*" || n.is_element_named(name)))
            .collect()
    }

    /// Descendant elements carrying every class in `names`.
    pub fn elements_by_class_name(&self, names: &str) -> Vec<Node> {
        let wanted: Vec<&str> = names.split_ascii_whitespace().collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.descendants()
            .into_iter()
            .filter(|n| {
                let classes = n.class_list();
                n.is_element() && wanted.iter().all(|w| classes.iter().any(|c| c == w))
            })
            .collect()
    }

    // ---- serialization ----

    pub fn inner_html(&self) -> String {
        crate::serialize::inner_html(self)
    }

    pub fn outer_html(&self) -> String {
        crate::serialize::outer_html(self)
    }

    // ---- own keys ----

    /// Own (expando) keys in insertion order. Native members are never listed.
    pub fn own_keys(&self) -> Vec<String> {
        self.doc
            .arena()
            .record(self.key)
            .own
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.doc
            .arena()
            .record(self.key)
            .own
            .iter()
            .any(|(k, _)| k == name)
    }

    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.doc
            .arena()
            .record(self.key)
            .own
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    pub fn set_own(&self, name: &str, value: Value) {
        let mut arena = self.doc.arena_mut();
        let own = &mut arena.record_mut(self.key).own;
        match own.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value,
            None => own.push((name.to_string(), value)),
        }
    }

    /// Returns whether the key existed.
    pub fn delete_own(&self, name: &str) -> bool {
        let mut arena = self.doc.arena_mut();
        let own = &mut arena.record_mut(self.key).own;
        let before = own.len();
        own.retain(|(k, _)| k != name);
        own.len() != before
    }
}

/// `foo-bar` → `fooBar`.
fn dataset_key(attr_suffix: &str) -> String {
    let mut out = String::with_capacity(attr_suffix.len());
    let mut upper_next = false;
    for ch in attr_suffix.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.doc.ptr_eq(&other.doc)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.doc.addr(), state);
        self.key.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.local_name() {
            Some(name) => write!(f, "Node(<{name}> {:?})", self.key),
            None => write!(f, "Node(#text {:?})", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_keys_are_camel_cased() {
        assert_eq!(dataset_key("foo"), "foo");
        assert_eq!(dataset_key("foo-bar"), "fooBar");
        assert_eq!(dataset_key("a-b-c"), "aBC");
    }

    #[test]
    fn set_attribute_overwrites_in_place() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        div.set_attribute("id", "a").unwrap();
        div.set_attribute("class", "x").unwrap();
        div.set_attribute("ID", "b").unwrap();
        assert_eq!(
            div.attributes(),
            vec![
                ("id".to_string(), "b".to_string()),
                ("class".to_string(), "x".to_string())
            ]
        );
    }

    #[test]
    fn text_nodes_reject_attributes() {
        let doc = Document::new();
        let text = doc.create_text_node("hi");
        assert_eq!(
            text.set_attribute("id", "x"),
            Err(DomError::WrongNodeKind("setAttribute"))
        );
        assert_eq!(text.get_attribute("id"), None);
    }

    #[test]
    fn prepend_on_empty_node_appends() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        let p = doc.create_element("p").unwrap();
        div.prepend_child(&p).unwrap();
        assert_eq!(div.first_child(), Some(p.clone()));
        assert_eq!(div.last_child(), Some(p));
    }

    #[test]
    fn normalize_merges_adjacent_text() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        for part in ["hello", "", " ", "world"] {
            div.append_child(&doc.create_text_node(part)).unwrap();
        }
        div.normalize();
        assert_eq!(div.child_count(), 1);
        assert_eq!(div.text_content(), "hello world");
    }

    #[test]
    fn own_keys_keep_insertion_order() {
        let doc = Document::new();
        let div = doc.create_element("div").unwrap();
        div.set_own("b", Value::from(1));
        div.set_own("a", Value::from(2));
        div.set_own("b", Value::from(3));
        assert_eq!(div.own_keys(), vec!["b", "a"]);
        assert_eq!(div.get_own("b"), Some(Value::from(3)));
        assert!(div.delete_own("b"));
        assert!(!div.delete_own("b"));
        assert_eq!(div.own_keys(), vec!["a"]);
    }

    #[test]
    fn cross_document_insert_is_rejected() {
        let a = Document::new();
        let b = Document::new();
        let parent = a.create_element("div").unwrap();
        let child = b.create_element("p").unwrap();
        assert_eq!(parent.append_child(&child), Err(DomError::WrongDocument));
        assert!(!parent.contains(&child));
    }
}
