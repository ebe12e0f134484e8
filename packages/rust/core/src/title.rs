//! Display labels for fragments.

use std::sync::LazyLock;

use regex::Regex;

use tabpanel_dom::{Element, Scope, find_first};
use tabpanel_shared::{Result, TabPanelError};

use crate::fragment::Fragment;

/// Resolves a fragment's button label.
///
/// Priority, first non-blank wins:
/// 1. `title` attribute on the fragment root
/// 2. text of the first `title` element below the root
/// 3. the fragment identifier
#[derive(Debug, Clone)]
pub struct TitleResolver<'a> {
    content_class: &'a str,
}

impl<'a> TitleResolver<'a> {
    pub fn new(content_class: &'a str) -> Self {
        Self { content_class }
    }

    pub fn resolve(&self, fragment: &Fragment) -> Result<String> {
        let from_attr = fragment.root.attr("title").map(collapse_whitespace);
        let from_child = || {
            find_first(&fragment.root, Scope::Descendants, |el| el.is("title"))
                .and_then(|path| fragment.root.get(&path))
                .map(Element::text_content)
                .map(|text| collapse_whitespace(&text))
        };
        let from_id = || {
            fragment
                .identifier(self.content_class)
                .map(collapse_whitespace)
        };

        from_attr
            .filter(|t| !t.is_empty())
            .or_else(|| from_child().filter(|t| !t.is_empty()))
            .or_else(|| from_id().filter(|t| !t.is_empty()))
            .ok_or_else(|| TabPanelError::MissingTitle {
                fragment: fragment.name.clone(),
            })
    }
}

/// Trim and fold internal runs of whitespace to one space.
fn collapse_whitespace(text: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
    WS_RE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(html: &str) -> Result<String> {
        let fragment = Fragment::parse("test.html", html).unwrap();
        TitleResolver::new("tabcontent").resolve(&fragment)
    }

    #[test]
    fn attribute_beats_title_child() {
        let label = resolve(
            r#"<div id="t1" class="tabcontent" title="Table 1"><title>Other</title></div>"#,
        )
        .unwrap();
        assert_eq!(label, "Table 1");
    }

    #[test]
    fn title_child_beats_identifier() {
        let label = resolve(
            r#"<div id="t1" class="tabcontent"><title> Child
                 Title </title><p>x</p></div>"#,
        )
        .unwrap();
        assert_eq!(label, "Child Title");
    }

    #[test]
    fn title_element_of_full_document_is_found() {
        let label = resolve(
            "<html><head><title>From Head</title></head>\
             <body><div id=\"t9\" class=\"tabcontent\">x</div></body></html>",
        )
        .unwrap();
        assert_eq!(label, "From Head");
    }

    #[test]
    fn identifier_is_last_resort() {
        let label = resolve(r#"<div id="t3" class="tabcontent">x</div>"#).unwrap();
        assert_eq!(label, "t3");
    }

    #[test]
    fn blank_attribute_falls_through() {
        let label = resolve(r#"<div id="t4" class="tabcontent" title="   ">x</div>"#).unwrap();
        assert_eq!(label, "t4");
    }

    #[test]
    fn nothing_to_resolve_is_missing_title() {
        let err = resolve(r#"<div class="tabcontent">x</div>"#).unwrap_err();
        assert!(matches!(
            err,
            TabPanelError::MissingTitle { ref fragment } if fragment == "test.html"
        ));
    }
}
