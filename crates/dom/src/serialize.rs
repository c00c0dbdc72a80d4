//! HTML serialization and debugging outlines.

use crate::arena::{DomArena, NodeKind};
use crate::node::Node;
use crate::tags::is_void_element;
use crate::types::NodeKey;
use memchr::{memchr2, memchr3};

pub(crate) fn inner_html(node: &Node) -> String {
    let arena = node.document().arena();
    let mut out = String::new();
    for child in &arena.record(node.raw_key()).children {
        write_node(&arena, *child, &mut out);
    }
    out
}

pub(crate) fn outer_html(node: &Node) -> String {
    let arena = node.document().arena();
    let mut out = String::new();
    write_node(&arena, node.raw_key(), &mut out);
    out
}

fn write_node(arena: &DomArena, key: NodeKey, out: &mut String) {
    let record = arena.record(key);
    match &record.kind {
        NodeKind::Text { data } => escape_text(data, out),
        NodeKind::Element {
            local_name,
            attributes,
        } => {
            out.push('<');
            out.push_str(local_name);
            for (name, value) in attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attribute(value, out);
                out.push('"');
            }
            out.push('>');
            if is_void_element(local_name) {
                return;
            }
            for child in &record.children {
                write_node(arena, *child, out);
            }
            out.push_str("</");
            out.push_str(local_name);
            out.push('>');
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    if memchr3(b'&', b'<', b'>', text.as_bytes()).is_none() {
        out.push_str(text);
        return;
    }
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    if memchr2(b'&', b'"', value.as_bytes()).is_none() {
        out.push_str(value);
        return;
    }
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Indented one-line-per-node outline of `root`, visiting at most `cap` nodes.
pub fn outline(root: &Node, cap: usize) -> Vec<String> {
    fn walk(arena: &DomArena, key: NodeKey, depth: usize, out: &mut Vec<String>, left: &mut usize) {
        if *left == 0 {
            return;
        }
        *left -= 1;
        let indent = "  ".repeat(depth);
        let record = arena.record(key);
        match &record.kind {
            NodeKind::Element {
                local_name,
                attributes,
            } => {
                let find = |wanted: &str| {
                    attributes
                        .iter()
                        .find(|(k, _)| &**k == wanted)
                        .map(|(_, v)| v.as_str())
                        .unwrap_or("")
                };
                let (id, class) = (find("id"), find("class"));
                let mut line = format!("{indent}<{local_name}");
                if !id.is_empty() {
                    line.push_str(&format!(r#" id="{id}""#));
                }
                if !class.is_empty() {
                    line.push_str(&format!(r#" class="{class}""#));
                }
                line.push('>');
                out.push(line);
                for child in &record.children {
                    walk(arena, *child, depth + 1, out, left);
                }
            }
            NodeKind::Text { data } => {
                let t = data.replace('\n', " ").trim().to_string();
                if !t.is_empty() {
                    let show = match t.char_indices().nth(40) {
                        Some((cut, _)) => format!("{}…", &t[..cut]),
                        None => t,
                    };
                    out.push(format!("{indent}\"{show}\""));
                }
            }
        }
    }

    let arena = root.document().arena();
    let mut out = Vec::new();
    let mut left = cap;
    walk(&arena, root.raw_key(), 0, &mut out, &mut left);
    out
}
