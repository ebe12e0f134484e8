//! HTML text → node tree, via `scraper` (html5ever).

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::document::Document;
use crate::node::{Element, Node};

/// Parse a full HTML document. html5ever always yields `html`/`head`/`body`.
pub fn parse_document(html: &str) -> Document {
    let parsed = Html::parse_document(html);
    if !parsed.errors.is_empty() {
        debug!(errors = parsed.errors.len(), "html5ever reported recoverable parse errors");
    }
    Document::from_root(convert(parsed.root_element()))
}

/// Parse a fragment file and return the element that roots it.
///
/// A bare fragment (`<div id=…>…</div>`) is rooted at the single element
/// html5ever places in `body`. Anything else, such as a full document or
/// several top-level elements, is rooted at `html`. Returns `None` when the
/// input holds no element at all.
pub fn parse_fragment_root(html: &str) -> Option<Element> {
    let mut root = parse_document(html).into_root();

    let head_empty = root
        .element_children()
        .find(|el| el.is("head"))
        .is_none_or(|head| head.element_children().next().is_none());

    let body_index = root
        .children
        .iter()
        .position(|n| n.as_element().is_some_and(|el| el.is("body")))?;
    let body_elements = root.children[body_index]
        .as_element()
        .map(|body| body.element_children().count())
        .unwrap_or_default();

    match (head_empty, body_elements) {
        (true, 0) => None,
        (true, 1) => {
            let Node::Element(mut body) = root.children.swap_remove(body_index) else {
                return None;
            };
            let index = body.children.iter().position(|n| n.as_element().is_some())?;
            match body.children.swap_remove(index) {
                Node::Element(el) => Some(el),
                _ => None,
            }
        }
        _ => Some(root),
    }
}

fn convert(el: ElementRef<'_>) -> Element {
    let value = el.value();
    let mut out = Element::new(value.name());
    for (key, val) in value.attrs() {
        out.attrs.push((key.to_string(), val.to_string()));
    }
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            out.children.push(Node::Element(convert(child_el)));
            continue;
        }
        match child.value() {
            scraper::Node::Text(text) => {
                let text: &str = text;
                out.children.push(Node::Text(text.to_string()));
            }
            scraper::Node::Comment(comment) => {
                let comment: &str = comment;
                out.children.push(Node::Comment(comment.to_string()));
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Scope, find_first};

    #[test]
    fn bare_fragment_is_rooted_at_its_element() {
        let root = parse_fragment_root(
            r#"<div id="table1" class="tabcontent" title="Table 1">
                 <table><tr><td>1</td></tr></table>
               </div>
"#,
        )
        .unwrap();
        assert_eq!(root.name, "div");
        assert_eq!(root.id(), Some("table1"));
        assert_eq!(root.attr("title"), Some("Table 1"));
        assert!(find_first(&root, Scope::Descendants, |el| el.is("td")).is_some());
    }

    #[test]
    fn full_document_is_rooted_at_html() {
        let root = parse_fragment_root(
            "<!DOCTYPE html><html><head><title>T</title></head>\
             <body><div class=\"tabcontent\">x</div></body></html>",
        )
        .unwrap();
        assert_eq!(root.name, "html");
    }

    #[test]
    fn several_top_level_elements_root_at_html() {
        let root = parse_fragment_root("<p>a</p><p>b</p>").unwrap();
        assert_eq!(root.name, "html");
    }

    #[test]
    fn text_only_input_has_no_root() {
        assert!(parse_fragment_root("just words").is_none());
        assert!(parse_fragment_root("").is_none());
    }

    #[test]
    fn comments_and_attribute_order_survive() {
        let root = parse_fragment_root(r#"<div b="2" a="1"><!-- note -->x</div>"#).unwrap();
        assert_eq!(root.attrs[0].0, "b");
        assert_eq!(root.children[0], Node::Comment(" note ".into()));
        assert_eq!(root.text_content(), "x");
    }

    #[test]
    fn document_regions_present_after_parse() {
        let doc = parse_document("<h1>Existing</h1>");
        let body = doc.body().unwrap();
        let h1 = doc.find_first(&body, Scope::Descendants, |el| el.is("h1")).unwrap();
        assert_eq!(doc.get(&h1).unwrap().text_content(), "Existing");
        assert!(doc.head().is_some());
    }
}
