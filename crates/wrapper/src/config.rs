//! Construction-time knobs for [`crate::Wrapper`].

use crate::whitelist::TransparencyRules;

/// How a configuration key reaches the host object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// `setAttribute(key, String(value))`.
    Attribute,
    /// `object[key] = value`.
    Field,
}

/// Naming rules deciding which configuration keys become attributes.
///
/// A key is attribute-routed when it starts with one of `prefixes` or equals
/// one of `names`. Matching is case-sensitive, as keys are member names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeRouting {
    pub prefixes: Vec<String>,
    pub names: Vec<String>,
}

impl AttributeRouting {
    pub fn route(&self, key: &str) -> Route {
        let prefixed = self.prefixes.iter().any(|p| key.starts_with(p.as_str()));
        if prefixed || self.names.iter().any(|n| n == key) {
            Route::Attribute
        } else {
            Route::Field
        }
    }
}

impl Default for AttributeRouting {
    fn default() -> Self {
        Self {
            prefixes: vec!["aria".to_string(), "data".to_string()],
            names: vec![
                "role".to_string(),
                "class".to_string(),
                "tabindex".to_string(),
            ],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrapperConfig {
    pub routing: AttributeRouting,
    pub transparency: TransparencyRules,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routing() {
        let routing = AttributeRouting::default();
        for key in ["aria-hidden", "ariaLabel", "role", "data-foo", "dataset", "class", "tabindex"] {
            assert_eq!(routing.route(key), Route::Attribute, "{key}");
        }
        for key in ["className", "tabIndex", "id", "roles", "Role", "hidden", "custom"] {
            assert_eq!(routing.route(key), Route::Field, "{key}");
        }
    }

    #[test]
    fn routing_is_configurable() {
        let routing = AttributeRouting {
            prefixes: Vec::new(),
            names: vec!["for".to_string()],
        };
        assert_eq!(routing.route("for"), Route::Attribute);
        assert_eq!(routing.route("aria-label"), Route::Field);
    }
}
