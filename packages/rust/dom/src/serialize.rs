//! Node tree → HTML5 text.

use crate::document::Document;
use crate::node::{Element, Node};

/// Elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text is written verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose first newline the parser drops.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

/// Serialize a whole document, doctype included.
///
/// Nothing follows `</html>`: html5ever would move trailing whitespace into
/// `body`, so re-parsing the output would not be stable.
pub fn to_html(doc: &Document) -> String {
    let mut out = String::from("<!DOCTYPE html>\n");
    write_element(doc.root(), &mut out);
    out
}

/// Serialize one element and its subtree.
pub fn element_to_html(el: &Element) -> String {
    let mut out = String::new();
    write_element(el, &mut out);
    out
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (key, value) in &el.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.name.as_str()) {
        return;
    }

    if LEADING_NEWLINE_ELEMENTS.contains(&el.name.as_str())
        && matches!(el.children.first(), Some(Node::Text(text)) if text.starts_with('\n'))
    {
        out.push('\n');
    }

    let raw = RAW_TEXT_ELEMENTS.contains(&el.name.as_str());
    for child in &el.children {
        match child {
            Node::Element(inner) => write_element(inner, out),
            Node::Text(text) if raw => out.push_str(text),
            Node::Text(text) => escape_into(text, false, out),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
        }
    }

    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn escape_into(text: &str, in_attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '<' if !in_attribute => out.push_str("&lt;"),
            '>' if !in_attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
