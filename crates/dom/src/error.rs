//! Host-side failures raised by node construction, tree mutation and member access.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    /// `create_element` was asked for a kind the document does not recognize.
    InvalidElementKind(String),
    /// Attribute or element name contains characters the document rejects.
    InvalidCharacter(String),
    /// Insertion would create a cycle or give a text node children.
    HierarchyRequest(&'static str),
    /// Reference node is not a child of the node being mutated.
    NotFound,
    /// Node belongs to a different document.
    WrongDocument,
    /// Operation is not supported by this kind of node.
    WrongNodeKind(&'static str),
    ReadOnlyProperty(String),
    NotCallable(String),
    InvalidArgument {
        member: &'static str,
        expected: &'static str,
    },
    /// Selector failed to parse.
    Syntax(String),
    /// A host function belonging to a released wrapper was called.
    Revoked,
    /// Error raised from inside a host function.
    Callback(String),
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomError::InvalidElementKind(kind) => write!(f, "invalid element kind \"{kind}\""),
            DomError::InvalidCharacter(name) => write!(f, "invalid character in name \"{name}\""),
            DomError::HierarchyRequest(reason) => write!(f, "hierarchy request error: {reason}"),
            DomError::NotFound => f.write_str("reference node is not a child of this node"),
            DomError::WrongDocument => f.write_str("node belongs to a different document"),
            DomError::WrongNodeKind(operation) => {
                write!(f, "{operation} is not supported by this node kind")
            }
            DomError::ReadOnlyProperty(name) => write!(f, "property \"{name}\" is read-only"),
            DomError::NotCallable(name) => write!(f, "member \"{name}\" is not callable"),
            DomError::InvalidArgument { member, expected } => {
                write!(f, "{member}: expected {expected}")
            }
            DomError::Syntax(selector) => write!(f, "invalid selector \"{selector}\""),
            DomError::Revoked => f.write_str("function belongs to a released wrapper"),
            DomError::Callback(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for DomError {}
