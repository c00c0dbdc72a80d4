//! Node storage for one document.
//!
//! Invariants:
//! - Keys are minted here and index `nodes` directly; records are never freed
//!   while the document lives, so a key handed out stays valid.
//! - A node has at most one parent, and `parent`/`children` links agree.
//! - Operations never create cycles; text nodes never have children.

use crate::error::DomError;
use crate::types::{NodeKey, Value};
use std::sync::Arc;

pub(crate) struct DomArena {
    nodes: Vec<NodeRecord>,
}

pub(crate) struct NodeRecord {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    /// Own keys in insertion order.
    pub(crate) own: Vec<(String, Value)>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }
}

#[derive(Clone, Debug)]
pub(crate) enum NodeKind {
    Element {
        local_name: Arc<str>,
        attributes: Vec<(Arc<str>, String)>,
    },
    Text {
        data: String,
    },
}

impl DomArena {
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn insert_node(&mut self, kind: NodeKind) -> NodeKey {
        let key = NodeKey(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
            own: Vec::new(),
        });
        key
    }

    pub(crate) fn record(&self, key: NodeKey) -> &NodeRecord {
        &self.nodes[key.0 as usize]
    }

    pub(crate) fn record_mut(&mut self, key: NodeKey) -> &mut NodeRecord {
        &mut self.nodes[key.0 as usize]
    }

    /// True if `ancestor` is `node` or one of its ancestors.
    pub(crate) fn is_inclusive_ancestor(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = Some(node);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.record(key).parent;
        }
        false
    }

    /// Path of keys from the root of `node`'s tree down to `node`.
    pub(crate) fn ancestry(&self, node: NodeKey) -> Vec<NodeKey> {
        let mut path = vec![node];
        let mut current = self.record(node).parent;
        while let Some(key) = current {
            path.push(key);
            current = self.record(key).parent;
        }
        path.reverse();
        path
    }

    pub(crate) fn detach(&mut self, child: NodeKey) {
        if let Some(parent) = self.record_mut(child).parent.take() {
            self.record_mut(parent).children.retain(|k| *k != child);
        }
    }

    fn ensure_insertable(&self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        if !self.record(parent).allows_children() {
            return Err(DomError::HierarchyRequest("text nodes cannot have children"));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest(
                "cannot insert a node into itself or its descendant",
            ));
        }
        Ok(())
    }

    /// Insert `child` under `parent` before `before` (or at the end).
    ///
    /// The child is detached from its previous parent first.
    pub(crate) fn insert_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: Option<NodeKey>,
    ) -> Result<(), DomError> {
        self.ensure_insertable(parent, child)?;
        if let Some(before) = before {
            if self.record(before).parent != Some(parent) {
                return Err(DomError::NotFound);
            }
        }
        let before = match before {
            Some(key) if key == child => self.next_sibling(child),
            other => other,
        };
        self.detach(child);
        let siblings = &mut self.record_mut(parent).children;
        let index = match before {
            Some(before) => siblings
                .iter()
                .position(|k| *k == before)
                .ok_or(DomError::NotFound)?,
            None => siblings.len(),
        };
        siblings.insert(index, child);
        self.record_mut(child).parent = Some(parent);
        Ok(())
    }

    pub(crate) fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        if self.record(child).parent != Some(parent) {
            return Err(DomError::NotFound);
        }
        self.detach(child);
        Ok(())
    }

    pub(crate) fn next_sibling(&self, node: NodeKey) -> Option<NodeKey> {
        let parent = self.record(node).parent?;
        let siblings = &self.record(parent).children;
        let index = siblings.iter().position(|k| *k == node)?;
        siblings.get(index + 1).copied()
    }

    pub(crate) fn previous_sibling(&self, node: NodeKey) -> Option<NodeKey> {
        let parent = self.record(node).parent?;
        let siblings = &self.record(parent).children;
        let index = siblings.iter().position(|k| *k == node)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Pre-order descendants of `node`, excluding `node` itself.
    pub(crate) fn descendants(&self, node: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.record(node).children.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            out.push(key);
            stack.extend(self.record(key).children.iter().rev().copied());
        }
        out
    }

    /// Copy `node` (and its subtree if `deep`) into fresh, parentless records.
    ///
    /// Own keys are not copied.
    pub(crate) fn clone_subtree(&mut self, node: NodeKey, deep: bool) -> NodeKey {
        let kind = self.record(node).kind.clone();
        let copy = self.insert_node(kind);
        if deep {
            let children = self.record(node).children.clone();
            for child in children {
                let child_copy = self.clone_subtree(child, true);
                self.record_mut(child_copy).parent = Some(copy);
                self.record_mut(copy).children.push(child_copy);
            }
        }
        copy
    }

    pub(crate) fn text_content(&self, node: NodeKey, out: &mut String) {
        match &self.record(node).kind {
            NodeKind::Text { data } => out.push_str(data),
            NodeKind::Element { .. } => {
                for child in &self.record(node).children {
                    self.text_content(*child, out);
                }
            }
        }
    }

    pub(crate) fn is_equal(&self, a: NodeKey, b: NodeKey) -> bool {
        let (left, right) = (self.record(a), self.record(b));
        let same_kind = match (&left.kind, &right.kind) {
            (NodeKind::Text { data: x }, NodeKind::Text { data: y }) => x == y,
            (
                NodeKind::Element {
                    local_name: x_name,
                    attributes: x_attrs,
                },
                NodeKind::Element {
                    local_name: y_name,
                    attributes: y_attrs,
                },
            ) => {
                x_name == y_name
                    && x_attrs.len() == y_attrs.len()
                    && x_attrs.iter().all(|attr| y_attrs.contains(attr))
            }
            _ => false,
        };
        same_kind
            && left.children.len() == right.children.len()
            && left
                .children
                .iter()
                .zip(&right.children)
                .all(|(x, y)| self.is_equal(*x, *y))
    }
}
