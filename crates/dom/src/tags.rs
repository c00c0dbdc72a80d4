//! Element kind and attribute name rules.
//!
//! Invariant: element kinds and attribute names are stored in canonical
//! ASCII-lowercase form.

use crate::error::DomError;

// Sorted for binary search.
const KNOWN_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col",
    "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins",
    "kbd", "label", "legend", "li", "link", "main", "map", "mark", "menu", "meta", "meter",
    "nav", "noscript", "object", "ol", "optgroup", "option", "output", "p", "param", "picture",
    "pre", "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "search", "section",
    "select", "slot", "small", "source", "span", "strong", "style", "sub", "summary", "sup",
    "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time", "title",
    "tr", "track", "u", "ul", "var", "video", "wbr",
];

const RESERVED_CUSTOM_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-format",
    "font-face-name",
    "font-face-src",
    "font-face-uri",
    "missing-glyph",
];

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

pub fn is_known_element(name: &str) -> bool {
    KNOWN_ELEMENTS.binary_search(&name).is_ok()
}

/// Custom element names: lowercase ASCII letter first, at least one hyphen.
pub fn is_valid_custom_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_lowercase() || !name.contains('-') {
        return false;
    }
    if RESERVED_CUSTOM_NAMES.contains(&name) {
        return false;
    }
    chars.all(|c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_') || !c.is_ascii()
    })
}

/// Canonicalize an element kind, rejecting anything the document cannot build.
pub(crate) fn normalize_element_kind(kind: &str) -> Result<String, DomError> {
    let folded = kind.to_ascii_lowercase();
    if is_known_element(&folded) || is_valid_custom_element_name(&folded) {
        Ok(folded)
    } else {
        Err(DomError::InvalidElementKind(kind.to_string()))
    }
}

/// Canonicalize an attribute name.
pub(crate) fn normalize_attribute_name(name: &str) -> Result<String, DomError> {
    let invalid = name.is_empty()
        || name.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<')
        });
    if invalid {
        return Err(DomError::InvalidCharacter(name.to_string()));
    }
    Ok(name.to_ascii_lowercase())
}
