//! Tab buttons.
//!
//! A button carries its binding declaratively (`data-target`, `data-class`);
//! the injected script reads those at click time.

use tabpanel_dom::Element;

/// Handler every button installs. Kept in step with `assets/tabButton.js`.
pub const ONCLICK: &str = "openTab(event, this.dataset.target, this.dataset.class)";

const TARGET_ATTR: &str = "data-target";
const CLASS_ATTR: &str = "data-class";

/// One navigation control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabButton {
    /// Visible text.
    pub label: String,
    /// Identifier of the content block this button shows.
    pub target: String,
    /// Class shared by all content blocks the script toggles.
    pub display_class: String,
    /// Class on the button element itself.
    pub button_class: String,
}

impl TabButton {
    /// Read a button back from markup produced by [`TabButtonFactory`].
    pub fn from_element(el: &Element) -> Option<Self> {
        if !el.is("button") {
            return None;
        }
        Some(Self {
            label: el.text_content(),
            target: el.attr(TARGET_ATTR)?.to_string(),
            display_class: el.attr(CLASS_ATTR)?.to_string(),
            button_class: el.attr("class").unwrap_or_default().to_string(),
        })
    }
}

impl From<TabButton> for Element {
    fn from(button: TabButton) -> Self {
        Element::new("button")
            .with_attr("class", button.button_class)
            .with_attr(TARGET_ATTR, button.target)
            .with_attr(CLASS_ATTR, button.display_class)
            .with_attr("onclick", ONCLICK)
            .with_text(button.label)
    }
}

/// Builds buttons bound to one display class.
#[derive(Debug, Clone)]
pub struct TabButtonFactory<'a> {
    button_class: &'a str,
    display_class: &'a str,
}

impl<'a> TabButtonFactory<'a> {
    pub fn new(button_class: &'a str, display_class: &'a str) -> Self {
        Self {
            button_class,
            display_class,
        }
    }

    pub fn build(&self, target: &str, label: &str) -> TabButton {
        TabButton {
            label: label.to_string(),
            target: target.to_string(),
            display_class: self.display_class.to_string(),
            button_class: self.button_class.to_string(),
        }
    }
}
