//! Which member calls surface their real result instead of the handle.

/// Methods whose return value is the point of calling them.
pub const TRANSPARENT_METHODS: &[&str] = &[
    "animate",
    "attachShadow",
    "cloneNode",
    "closest",
    "compareDocumentPosition",
    "contains",
    "lookupNamespaceURI",
    "lookupPrefix",
    "matches",
    "querySelector",
    "querySelectorAll",
    "unwrap",
];

/// Query-style name prefixes; any method starting with one is transparent.
pub const TRANSPARENT_PREFIXES: &[&str] = &["get", "has", "is"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransparencyRules {
    pub methods: Vec<String>,
    pub prefixes: Vec<String>,
}

impl TransparencyRules {
    pub fn is_transparent(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.methods.iter().any(|m| m == name)
    }
}

impl Default for TransparencyRules {
    fn default() -> Self {
        Self {
            methods: TRANSPARENT_METHODS.iter().map(|m| m.to_string()).collect(),
            prefixes: TRANSPARENT_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Classification under the default rules.
pub fn is_transparent(name: &str) -> bool {
    TRANSPARENT_PREFIXES.iter().any(|p| name.starts_with(p)) || TRANSPARENT_METHODS.contains(&name)
}
