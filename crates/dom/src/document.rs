use crate::arena::{DomArena, NodeKind};
use crate::error::DomError;
use crate::node::Node;
use crate::tags::normalize_element_kind;
use crate::types::NodeKey;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Shared handle to a document's node storage.
///
/// Cloning is cheap and yields the same document. Documents are
/// single-threaded; nodes are created here and live as long as the document.
#[derive(Clone)]
pub struct Document {
    arena: Rc<RefCell<DomArena>>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            arena: Rc::new(RefCell::new(DomArena::new())),
        }
    }

    /// Build a detached element of the given kind.
    pub fn create_element(&self, kind: &str) -> Result<Node, DomError> {
        let local_name = normalize_element_kind(kind)?;
        let key = self.arena.borrow_mut().insert_node(NodeKind::Element {
            local_name: Arc::from(local_name.as_str()),
            attributes: Vec::new(),
        });
        log::trace!(target: "dom.document", "create element <{local_name}> as {key:?}");
        Ok(self.node(key))
    }

    /// Build a detached text node.
    pub fn create_text_node(&self, data: &str) -> Node {
        let key = self.arena.borrow_mut().insert_node(NodeKind::Text {
            data: data.to_string(),
        });
        log::trace!(target: "dom.document", "create text node as {key:?}");
        self.node(key)
    }

    /// Number of nodes ever created in this document.
    pub fn node_count(&self) -> usize {
        self.arena.borrow().len()
    }

    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }

    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.arena).cast()
    }

    pub(crate) fn node(&self, key: NodeKey) -> Node {
        Node::from_parts(self.clone(), key)
    }

    pub(crate) fn arena(&self) -> Ref<'_, DomArena> {
        self.arena.borrow()
    }

    pub(crate) fn arena_mut(&self) -> RefMut<'_, DomArena> {
        self.arena.borrow_mut()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Document {}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.node_count())
            .finish()
    }
}
