use serde::de::DeserializeOwned;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Escape a string for single-line display in assertion output.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_control() => {
                let _ = write!(out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Render the first differing line of two line lists with two lines of
/// context either side. Returns an empty string when the lists are equal.
pub fn diff_lines<E: AsRef<str>, A: AsRef<str>>(expected: &[E], actual: &[A]) -> String {
    fn line<'a>(lines: &[&'a str], idx: usize) -> &'a str {
        lines.get(idx).copied().unwrap_or("<missing>")
    }
    let expected: Vec<&str> = expected.iter().map(|l| l.as_ref()).collect();
    let actual: Vec<&str> = actual.iter().map(|l| l.as_ref()).collect();
    let max = expected.len().max(actual.len());
    let Some(first) = (0..max).find(|&i| line(&expected, i) != line(&actual, i)) else {
        return String::new();
    };

    let mut out = String::new();
    let start = first.saturating_sub(2);
    let end = (first + 3).min(max);
    let _ = writeln!(
        out,
        "first mismatch at line {} (showing {}..={}):",
        first + 1,
        start + 1,
        end
    );
    for idx in start..end {
        let marker = if idx == first { ">" } else { " " };
        let _ = writeln!(out, "{marker} {:>4}  expected: {}", idx + 1, line(&expected, idx));
        let _ = writeln!(out, "{marker} {:>4}    actual: {}", idx + 1, line(&actual, idx));
    }
    let _ = writeln!(
        out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Read and deserialize a TOML fixture, panicking with the path on failure.
pub fn load_toml_fixture<T: DeserializeOwned>(path: &Path) -> T {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read TOML fixture {path:?}: {err}"));
    toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse TOML fixture {path:?}: {err}"))
}

/// Read and deserialize a JSON fixture, panicking with the path on failure.
pub fn load_json_fixture<T: DeserializeOwned>(path: &Path) -> T {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read JSON fixture {path:?}: {err}"));
    serde_json::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse JSON fixture {path:?}: {err}"))
}

/// Convert a fixture value into a host value. Objects become records with
/// their key order preserved as parsed.
#[cfg(feature = "dom")]
pub fn fixture_value(value: &serde_json::Value) -> dom::Value {
    use serde_json::Value as Json;
    match value {
        Json::Null => dom::Value::Null,
        Json::Bool(b) => dom::Value::Bool(*b),
        Json::Number(n) => dom::Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => dom::Value::String(s.clone()),
        Json::Array(items) => dom::Value::List(items.iter().map(fixture_value).collect()),
        Json::Object(entries) => dom::Value::Record(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), fixture_value(v)))
                .collect(),
        ),
    }
}

/// Assert that the snapshot of `root` equals `expected`, line by line.
#[cfg(feature = "dom-snapshot")]
pub fn assert_dom_snapshot(root: &dom::Node, expected: &[&str]) {
    use dom::dom_snapshot::{DomSnapshot, DomSnapshotOptions};
    let snapshot = DomSnapshot::new(root, DomSnapshotOptions::default());
    let diff = diff_lines(expected, snapshot.as_lines());
    assert!(diff.is_empty(), "DOM snapshot mismatch\n{diff}\nactual:\n{snapshot}");
}
