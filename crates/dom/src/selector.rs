//! Minimal selector engine backing `matches`, `closest` and `querySelector*`.
//!
//! Grammar: a comma-separated list of complex selectors; each is a chain of
//! compound selectors (`tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`)
//! joined by descendant (whitespace) or child (`>`) combinators. Tag and
//! attribute names match ASCII case-insensitively; ids, classes and attribute
//! values match exactly.

use crate::error::DomError;
use crate::node::Node;

#[derive(Debug)]
pub(crate) struct SelectorList(Vec<Complex>);

#[derive(Debug)]
struct Complex {
    parts: Vec<Compound>,
    /// `combinators[i]` joins `parts[i]` and `parts[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrSelector>,
}

#[derive(Debug)]
struct AttrSelector {
    name: String,
    value: Option<String>,
}

impl SelectorList {
    pub(crate) fn parse(input: &str) -> Result<Self, DomError> {
        let mut cursor = Cursor { input, pos: 0 };
        let mut list = Vec::new();
        loop {
            cursor.skip_whitespace();
            let complex = parse_complex(&mut cursor).ok_or_else(|| syntax(input))?;
            list.push(complex);
            cursor.skip_whitespace();
            match cursor.peek() {
                None => break,
                Some(',') => {
                    cursor.bump();
                }
                Some(_) => return Err(syntax(input)),
            }
        }
        Ok(SelectorList(list))
    }

    pub(crate) fn matches(&self, node: &Node) -> bool {
        self.0
            .iter()
            .any(|complex| complex.matches_at(complex.parts.len() - 1, node))
    }
}

impl Complex {
    fn matches_at(&self, index: usize, node: &Node) -> bool {
        if !self.parts[index].matches(node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => node
                .parent_node()
                .is_some_and(|parent| self.matches_at(index - 1, &parent)),
            Combinator::Descendant => {
                let mut current = node.parent_node();
                while let Some(ancestor) = current {
                    if self.matches_at(index - 1, &ancestor) {
                        return true;
                    }
                    current = ancestor.parent_node();
                }
                false
            }
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attributes.is_empty()
    }

    fn matches(&self, node: &Node) -> bool {
        if !node.is_element() {
            return false;
        }
        if let Some(tag) = &self.tag {
            if tag != "*" && !node.is_element_named(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.get_attribute("id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let classes = node.class_list();
            if !self.classes.iter().all(|c| classes.contains(c)) {
                return false;
            }
        }
        self.attributes.iter().all(|attr| match node.get_attribute(&attr.name) {
            None => false,
            Some(actual) => attr.value.as_ref().is_none_or(|want| *want == actual),
        })
    }
}

fn syntax(input: &str) -> DomError {
    DomError::Syntax(input.to_string())
}

fn parse_complex(cursor: &mut Cursor<'_>) -> Option<Complex> {
    let mut parts = vec![parse_compound(cursor)?];
    let mut combinators = Vec::new();
    loop {
        let had_whitespace = cursor.skip_whitespace();
        let combinator = match cursor.peek() {
            None | Some(',') => break,
            Some('>') => {
                cursor.bump();
                cursor.skip_whitespace();
                Combinator::Child
            }
            Some(_) if had_whitespace => Combinator::Descendant,
            Some(_) => return None,
        };
        combinators.push(combinator);
        parts.push(parse_compound(cursor)?);
    }
    Some(Complex { parts, combinators })
}

fn parse_compound(cursor: &mut Cursor<'_>) -> Option<Compound> {
    let mut compound = Compound::default();
    if cursor.peek() == Some('*') {
        cursor.bump();
        compound.tag = Some("*".to_string());
    } else if let Some(tag) = cursor.ident() {
        compound.tag = Some(tag.to_ascii_lowercase());
    }
    loop {
        match cursor.peek() {
            Some('#') => {
                cursor.bump();
                compound.id = Some(cursor.ident()?);
            }
            Some('.') => {
                cursor.bump();
                compound.classes.push(cursor.ident()?);
            }
            Some('[') => {
                cursor.bump();
                compound.attributes.push(parse_attribute(cursor)?);
            }
            _ => break,
        }
    }
    (!compound.is_empty()).then_some(compound)
}

fn parse_attribute(cursor: &mut Cursor<'_>) -> Option<AttrSelector> {
    cursor.skip_whitespace();
    let name = cursor.ident()?.to_ascii_lowercase();
    cursor.skip_whitespace();
    let value = if cursor.peek() == Some('=') {
        cursor.bump();
        cursor.skip_whitespace();
        let value = match cursor.peek() {
            Some(quote @ ('"' | '\'')) => {
                cursor.bump();
                cursor.take_until(quote)?
            }
            _ => cursor.ident()?,
        };
        cursor.skip_whitespace();
        Some(value)
    } else {
        None
    };
    if cursor.bump() != Some(']') {
        return None;
    }
    Some(AttrSelector { name, value })
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Returns whether any whitespace was consumed.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_') || !c.is_ascii())
        {
            self.bump();
        }
        (self.pos != start).then(|| self.input[start..self.pos].to_string())
    }

    /// Consume through the closing `end`, returning the text before it.
    fn take_until(&mut self, end: char) -> Option<String> {
        let rest = &self.input[self.pos..];
        let offset = rest.find(end)?;
        let out = rest[..offset].to_string();
        self.pos += offset + end.len_utf8();
        Some(out)
    }
}
