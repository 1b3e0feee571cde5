//! .properties adapter, layout-preserving.
//!
//! Comment lines, blank lines, and the exact separator of each entry
//! (`=`, ` = `, `: `, ...) are kept on the nodes, so serializing an
//! untouched document reproduces its lines. Leading whitespace before a key
//! and backslash line continuations are not preserved; both are rare in the
//! configuration files this targets.

use crate::error::ParseError;
use crate::tree::{PropsNode, TreeNode};

/// Parse properties text into a config-list tree.
pub fn parse_properties(text: &str) -> Result<PropsNode, ParseError> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            entries.push(PropsNode::blank());
        } else if trimmed.starts_with('#') || trimmed.starts_with('!') {
            entries.push(PropsNode::comment(line));
        } else {
            entries.push(parse_entry(line)?);
        }
    }
    Ok(PropsNode::file(entries)?)
}

fn parse_entry(line: &str) -> Result<PropsNode, ParseError> {
    match line.find(|c| c == '=' || c == ':') {
        Some(i) => {
            let raw_key = &line[..i];
            let delim = &line[i..i + 1];
            let after = &line[i + 1..];
            let key = raw_key.trim();
            let ws_after_key = &raw_key[raw_key.trim_end().len()..];
            let ws_before_value = &after[..after.len() - after.trim_start().len()];
            let separator = format!("{}{}{}", ws_after_key, delim, ws_before_value);
            Ok(PropsNode::entry_with_separator(
                key,
                separator,
                after.trim_start(),
            )?)
        }
        // A bare key is a valid entry with an empty value.
        None => Ok(PropsNode::entry_with_separator(line.trim(), "", "")?),
    }
}

/// Serialize a config-list tree back to properties text.
pub fn write_properties(root: &PropsNode) -> String {
    let mut out = String::new();
    for node in root.child_nodes() {
        match node {
            PropsNode::Entry {
                key,
                separator,
                value,
                ..
            } => {
                out.push_str(key);
                out.push_str(separator);
                out.push_str(value);
            }
            PropsNode::Comment { text, .. } => out.push_str(text),
            PropsNode::Blank { .. } => {}
            PropsNode::File { .. } => {}
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# HTTP\nquarkus.http.port=8080\n\n%dev.quarkus.http.port = 0\ngreeting: hello\n";

    #[test]
    fn test_round_trip_preserves_layout() {
        let root = parse_properties(SAMPLE).unwrap();
        assert_eq!(write_properties(&root), SAMPLE);
    }

    #[test]
    fn test_parse_shapes() {
        let root = parse_properties(SAMPLE).unwrap();
        let nodes = root.child_nodes();
        assert_eq!(nodes.len(), 5);
        assert!(matches!(nodes[0], PropsNode::Comment { .. }));
        assert_eq!(nodes[1].key(), Some("quarkus.http.port"));
        assert_eq!(nodes[1].value(), Some("8080"));
        assert!(matches!(nodes[2], PropsNode::Blank { .. }));
        assert_eq!(nodes[3].key(), Some("%dev.quarkus.http.port"));
        assert_eq!(nodes[4].key(), Some("greeting"));
        assert_eq!(nodes[4].value(), Some("hello"));
    }

    #[test]
    fn test_bare_key_has_empty_value() {
        let root = parse_properties("flag\n").unwrap();
        let nodes = root.child_nodes();
        assert_eq!(nodes[0].key(), Some("flag"));
        assert_eq!(nodes[0].value(), Some(""));
        assert_eq!(write_properties(&root), "flag\n");
    }

    #[test]
    fn test_empty_input() {
        let root = parse_properties("").unwrap();
        assert!(root.child_nodes().is_empty());
        assert_eq!(write_properties(&root), "");
    }
}
