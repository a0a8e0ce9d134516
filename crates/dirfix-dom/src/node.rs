//! Node payloads stored in the document tree.

use crate::style::StyleDecls;

/// Payload of a single document node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

impl NodeData {
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, NodeData::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeData::Text(_))
    }
}

/// Data carried by an element node.
///
/// The inline style is kept parsed (`StyleDecls`) rather than as a raw
/// attribute string; serialization re-emits a `style` attribute when the
/// declaration list is non-empty.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag: String,
    attrs: Vec<(String, String)>,
    pub(crate) style: StyleDecls,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: StyleDecls::new(),
        }
    }

    /// Lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if name == "style" {
            self.style = StyleDecls::parse(value);
            return;
        }
        if let Some(entry) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value.to_string();
        } else {
            self.attrs.push((name, value.to_string()));
        }
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> bool {
        if name == "style" {
            let had = !self.style.is_empty();
            self.style = StyleDecls::new();
            return had;
        }
        let before = self.attrs.len();
        self.attrs.retain(|(n, _)| n != name);
        self.attrs.len() != before
    }

    /// Attributes in document order, excluding the synthesized `style`.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Whitespace-separated class list.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Parsed inline style declarations.
    pub fn style(&self) -> &StyleDecls {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_lowercased() {
        assert_eq!(ElementData::new("DIV").tag(), "div");
    }

    #[test]
    fn style_attr_routes_to_decls() {
        let mut el = ElementData::new("p");
        el.set_attr("style", "direction: rtl");
        assert_eq!(el.style().get("direction"), Some("rtl"));
        assert_eq!(el.attr("style"), None);
        assert!(el.remove_attr("style"));
        assert!(el.style().is_empty());
    }

    #[test]
    fn class_list_splits_on_whitespace() {
        let mut el = ElementData::new("span");
        el.set_attr("class", "hljs  language-rust");
        assert!(el.has_class("hljs"));
        assert!(el.has_class("language-rust"));
        assert!(!el.has_class("language"));
    }
}
