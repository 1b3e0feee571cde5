//! Build-descriptor (POM XML) adapter over quick-xml events.
//!
//! Whitespace between elements is kept as text nodes, so untouched regions
//! serialize back unchanged. Elements inserted by rules carry no
//! surrounding whitespace of their own; the output stays well-formed and
//! minimal-diff rather than re-indented.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ParseError;
use crate::tree::{PomFile, PomNode};

/// Parse POM XML text into a build-descriptor tree.
pub fn parse_pom(text: &str) -> Result<PomFile, ParseError> {
    let mut reader = Reader::from_str(text);
    let mut declaration: Option<String> = None;
    let mut stack: Vec<(String, Vec<(String, String)>, Vec<PomNode>)> = Vec::new();
    let mut root: Option<PomNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Decl(d)) => {
                let mut decl = String::from("<?xml");
                if let Ok(v) = d.version() {
                    decl.push_str(&format!(" version=\"{}\"", String::from_utf8_lossy(&v)));
                }
                if let Some(Ok(enc)) = d.encoding() {
                    decl.push_str(&format!(" encoding=\"{}\"", String::from_utf8_lossy(&enc)));
                }
                if let Some(Ok(sa)) = d.standalone() {
                    decl.push_str(&format!(" standalone=\"{}\"", String::from_utf8_lossy(&sa)));
                }
                decl.push_str("?>");
                declaration = Some(decl);
            }
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attrs = read_attributes(&e)?;
                stack.push((name, attrs, Vec::new()));
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attrs = read_attributes(&e)?;
                let element = PomNode::element_with_attrs(name, attrs, Vec::new())?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let (name, attrs, children) = stack
                    .pop()
                    .ok_or_else(|| ParseError::Xml("unmatched closing tag".to_string()))?;
                let element = PomNode::element_with_attrs(name, attrs, children)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(t)) => {
                let content = t
                    .unescape()
                    .map_err(|e| ParseError::Xml(e.to_string()))?
                    .into_owned();
                // Whitespace runs between tags are layout; keep them.
                if let Some((_, _, children)) = stack.last_mut() {
                    children.push(PomNode::text(content));
                }
            }
            Ok(Event::CData(c)) => {
                let content = String::from_utf8_lossy(&c.into_inner()).into_owned();
                if let Some((_, _, children)) = stack.last_mut() {
                    children.push(PomNode::text(content));
                }
            }
            Ok(Event::Comment(c)) => {
                let content = String::from_utf8_lossy(&c).into_owned();
                if let Some((_, _, children)) = stack.last_mut() {
                    children.push(PomNode::comment(content));
                }
                // Comments outside the root (license headers) are dropped.
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ParseError::Xml(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::Xml("unclosed element at end of input".to_string()));
    }
    let root = root.ok_or_else(|| ParseError::Xml("no root element".to_string()))?;
    Ok(PomFile { declaration, root })
}

fn read_attributes(e: &quick_xml::events::BytesStart<'_>) -> Result<Vec<(String, String)>, ParseError> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::Xml(e.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(attrs)
}

fn attach(
    stack: &mut [(String, Vec<(String, String)>, Vec<PomNode>)],
    root: &mut Option<PomNode>,
    element: PomNode,
) -> Result<(), ParseError> {
    if let Some((_, _, children)) = stack.last_mut() {
        children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(ParseError::Xml("multiple root elements".to_string()))
    }
}

/// Serialize a build-descriptor tree back to XML text.
pub fn write_pom(file: &PomFile) -> String {
    let mut out = String::new();
    if let Some(decl) = &file.declaration {
        out.push_str(decl);
        out.push('\n');
    }
    render(&file.root, &mut out);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn render(node: &PomNode, out: &mut String) {
    match node {
        PomNode::Element {
            name,
            attributes,
            children,
            ..
        } => {
            out.push('<');
            out.push_str(name);
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape(value.as_str()));
                out.push('"');
            }
            if children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in children {
                    render(child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
        PomNode::Text { content, .. } => out.push_str(&escape(content.as_str())),
        PomNode::Comment { text, .. } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}
