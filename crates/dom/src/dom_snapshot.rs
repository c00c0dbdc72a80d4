use crate::node::Node;
use std::fmt::{self, Write};
use std::sync::OnceLock;

/// Deterministic tree serialization and structural comparison for tests.
/// Not a stable format.
///
/// Equivalence rules:
/// - Node kinds must match.
/// - Element names must match.
/// - Attribute order is significant; names and values must match.
/// - Text data must match exactly.
/// - Own keys and arena keys are compared only when enabled by options.
#[derive(Clone, Copy, Debug)]
pub struct DomSnapshotOptions {
    pub ignore_keys: bool,
    pub ignore_own_keys: bool,
}

impl Default for DomSnapshotOptions {
    fn default() -> Self {
        Self {
            ignore_keys: true,
            ignore_own_keys: true,
        }
    }
}

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(root: &Node, options: DomSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(root, &options, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug)]
pub struct DomMismatch {
    path: String,
    detail: String,
    expected: String,
    actual: String,
    expected_node: Node,
    actual_node: Node,
    options: DomSnapshotOptions,
    expected_subtree: OnceLock<String>,
    actual_subtree: OnceLock<String>,
}

impl fmt::Display for DomMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected_subtree = self
            .expected_subtree
            .get_or_init(|| DomSnapshot::new(&self.expected_node, self.options).render());
        let actual_subtree = self
            .actual_subtree
            .get_or_init(|| DomSnapshot::new(&self.actual_node, self.options).render());
        writeln!(f, "DOM mismatch at {}: {}", self.path, self.detail)?;
        writeln!(f, "expected: {}", self.expected)?;
        writeln!(f, "actual:   {}", self.actual)?;
        writeln!(f, "expected subtree:\n{expected_subtree}")?;
        writeln!(f, "actual subtree:\n{actual_subtree}")?;
        Ok(())
    }
}

impl std::error::Error for DomMismatch {}

pub fn assert_dom_eq(expected: &Node, actual: &Node, options: DomSnapshotOptions) {
    if let Err(mismatch) = compare_dom(expected, actual, options) {
        panic!("{mismatch}");
    }
}

pub fn compare_dom(
    expected: &Node,
    actual: &Node,
    options: DomSnapshotOptions,
) -> Result<(), Box<DomMismatch>> {
    let mut path = vec![node_label(expected)];
    compare_nodes(expected, actual, &options, &mut path)
}

fn compare_nodes(
    expected: &Node,
    actual: &Node,
    options: &DomSnapshotOptions,
    path: &mut Vec<String>,
) -> Result<(), Box<DomMismatch>> {
    let fail = |detail: &str| Err(Box::new(mismatch(path.as_slice(), detail, expected, actual, options)));
    if expected.node_type() != actual.node_type() {
        return fail("node kind");
    }
    if expected.is_text() {
        if expected.node_value() != actual.node_value() {
            return fail("text");
        }
        return Ok(());
    }
    if expected.local_name() != actual.local_name() {
        return fail("element name");
    }
    if expected.attributes() != actual.attributes() {
        return fail("attributes");
    }
    if !options.ignore_own_keys && expected.own_keys() != actual.own_keys() {
        return fail("own keys");
    }
    let expected_children = expected.child_nodes();
    let actual_children = actual.child_nodes();
    if expected_children.len() != actual_children.len() {
        return fail(&format!(
            "child count (expected {}, actual {})",
            expected_children.len(),
            actual_children.len()
        ));
    }
    for (idx, (exp, act)) in expected_children.iter().zip(&actual_children).enumerate() {
        path.push(format!("{}[{idx}]", node_label(exp)));
        let result = compare_nodes(exp, act, options, path);
        path.pop();
        result?;
    }
    Ok(())
}

fn mismatch(
    path: &[String],
    detail: &str,
    expected: &Node,
    actual: &Node,
    options: &DomSnapshotOptions,
) -> DomMismatch {
    DomMismatch {
        path: format!("/{}", path.join("/")),
        detail: detail.to_string(),
        expected: truncate_line(format_node_line(expected, options), 160),
        actual: truncate_line(format_node_line(actual, options), 160),
        expected_node: expected.clone(),
        actual_node: actual.clone(),
        options: *options,
        expected_subtree: OnceLock::new(),
        actual_subtree: OnceLock::new(),
    }
}

fn node_label(node: &Node) -> String {
    let Some(mut label) = node.local_name() else {
        return "#text".to_string();
    };
    let id = node.id();
    let class = node.class_name();
    if !id.is_empty() {
        label.push('#');
        write_escaped(&mut label, &id);
    } else if !class.is_empty() {
        label.push_str(".class=");
        write_escaped(&mut label, &class);
    }
    label
}

fn truncate_line(mut line: String, max_len: usize) -> String {
    if line.len() > max_len {
        let mut cut = max_len.saturating_sub(3);
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        line.truncate(cut);
        line.push_str("...");
    }
    line
}

fn walk_snapshot(node: &Node, options: &DomSnapshotOptions, depth: usize, out: &mut Vec<String>) {
    let mut line = " ".repeat(depth * 2);
    write_node_line(&mut line, node, options);
    out.push(line);
    for child in node.child_nodes() {
        walk_snapshot(&child, options, depth + 1, out);
    }
}

fn format_node_line(node: &Node, options: &DomSnapshotOptions) -> String {
    let mut line = String::new();
    write_node_line(&mut line, node, options);
    line
}

fn write_node_line(out: &mut String, node: &Node, options: &DomSnapshotOptions) {
    match node.local_name() {
        Some(name) => {
            out.push('<');
            out.push_str(&name);
            for (attr, value) in node.attributes() {
                out.push(' ');
                out.push_str(&attr);
                out.push_str("=\"");
                write_escaped(out, &value);
                out.push('"');
            }
            if !options.ignore_keys {
                let _ = write!(out, " data-node-key=\"{}\"", node.raw_key().0);
            }
            if !options.ignore_own_keys {
                let own = node.own_keys();
                if !own.is_empty() {
                    let _ = write!(out, " own=[{}]", own.join(", "));
                }
            }
            out.push('>');
        }
        None => {
            out.push('"');
            write_escaped(out, &node.node_value().unwrap_or_default());
            out.push('"');
            if !options.ignore_keys {
                let _ = write!(out, " key={}", node.raw_key().0);
            }
        }
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}
