//! Traversal over a parsed detail page.
//!
//! Field extraction only needs four things from a document: find elements by
//! tag and attributes, read their text, and step to a parent or a following
//! sibling. `DetailNode` captures exactly that, so extraction code is generic
//! over the HTML backend.

use scraper::ElementRef;

/// An element in a parsed document.
pub trait DetailNode: Sized {
    /// Lower-case tag name ("div", "h4", ...)
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// All descendant elements (not including `self`) with tag `tag` whose
    /// attributes match every `(name, value)` pair, in document order.
    ///
    /// An attribute matches when it equals `value` or when one of its
    /// whitespace-separated tokens does (so `("class", "inline")` matches
    /// `class="inline header"`).
    fn find_all(&self, tag: &str, attrs: &[(&str, &str)]) -> Vec<Self>;

    /// First match of [`DetailNode::find_all`]
    fn find_first(&self, tag: &str, attrs: &[(&str, &str)]) -> Option<Self> {
        self.find_all(tag, attrs).into_iter().next()
    }

    /// Text of this element and its descendants, with runs of whitespace
    /// (including non-breaking spaces) collapsed to one space and trimmed.
    fn text_content(&self) -> String;

    fn parent_node(&self) -> Option<Self>;

    /// The next sibling that is an element (text between elements is skipped)
    fn next_sibling_element(&self) -> Option<Self>;
}

/// Whether an attribute value satisfies a requested value
pub fn attribute_matches(actual: Option<&str>, wanted: &str) -> bool {
    match actual {
        Some(actual) => actual == wanted || actual.split_whitespace().any(|token| token == wanted),
        None => false,
    }
}

/// Collapse whitespace runs to single spaces and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl<'a> DetailNode for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn find_all(&self, tag: &str, attrs: &[(&str, &str)]) -> Vec<Self> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|element| {
                element.value().name().eq_ignore_ascii_case(tag)
                    && attrs
                        .iter()
                        .all(|(name, value)| attribute_matches(element.value().attr(name), value))
            })
            .collect()
    }

    fn text_content(&self) -> String {
        let raw: String = self.text().collect();
        normalize_whitespace(&raw)
    }

    fn parent_node(&self) -> Option<Self> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.next_siblings().find_map(ElementRef::wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const PAGE: &str = r#"
        <html><body>
          <div class="txt-block">
            <h4 class="inline">Director:</h4>
            <a href="/name/nm0005124/">John&nbsp;Lasseter</a>
          </div>
          <div class="txt-block other"><span>plain</span></div>
        </body></html>
    "#;

    #[test]
    fn test_find_all_by_class_token() {
        let html = Html::parse_document(PAGE);
        let root = html.root_element();

        assert_eq!(root.find_all("div", &[("class", "txt-block")]).len(), 2);
        assert_eq!(root.find_all("div", &[("class", "other")]).len(), 1);
        assert!(root.find_all("div", &[("class", "missing")]).is_empty());
    }

    #[test]
    fn test_sibling_and_parent() {
        let html = Html::parse_document(PAGE);
        let root = html.root_element();

        let label = root.find_first("h4", &[("class", "inline")]).unwrap();
        assert_eq!(label.text_content(), "Director:");

        let link = label.next_sibling_element().unwrap();
        assert_eq!(link.tag_name(), "a");
        assert_eq!(link.text_content(), "John Lasseter");
        assert_eq!(link.attribute("href"), Some("/name/nm0005124/"));

        let block = label.parent_node().unwrap();
        assert_eq!(block.tag_name(), "div");
        assert_eq!(block.text_content(), "Director: John Lasseter");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b\u{a0}c  "), "a b c");
    }
}
