use dom::DomError;

/// Caller-visible failures of the wrapping protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WrapError {
    /// Read of a name that is neither an own key nor a native member.
    InvalidMemberAccess(String),
    /// The document does not know how to build this element kind.
    InvalidElementKind(String),
    /// The handle was already unwrapped.
    DoubleRevocation,
    /// The node still carries the helpers of another live handle.
    AlreadyWrapped,
    /// Any other failure raised by the host document.
    Dom(DomError),
}

impl std::fmt::Display for WrapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WrapError::InvalidMemberAccess(name) => {
                write!(f, "Invalid method or property name \"{name}\"")
            }
            WrapError::InvalidElementKind(kind) => write!(f, "invalid element kind \"{kind}\""),
            WrapError::DoubleRevocation => {
                f.write_str("handle has been unwrapped and can no longer be used")
            }
            WrapError::AlreadyWrapped => f.write_str("node is already wrapped by a live handle"),
            WrapError::Dom(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for WrapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WrapError::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for WrapError {
    fn from(err: DomError) -> Self {
        match err {
            DomError::InvalidElementKind(kind) => WrapError::InvalidElementKind(kind),
            DomError::Revoked => WrapError::DoubleRevocation,
            other => WrapError::Dom(other),
        }
    }
}

/// Lowering used when a wrapper failure has to leave through a host function.
impl From<WrapError> for DomError {
    fn from(err: WrapError) -> Self {
        match err {
            WrapError::InvalidElementKind(kind) => DomError::InvalidElementKind(kind),
            WrapError::DoubleRevocation => DomError::Revoked,
            WrapError::Dom(err) => err,
            other => DomError::Callback(other.to_string()),
        }
    }
}
