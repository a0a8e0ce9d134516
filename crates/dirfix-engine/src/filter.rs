//! Code-content exclusion.
//!
//! Directional styling must never touch source code or preformatted
//! content: RTL characters inside identifiers or string literals are not
//! prose. An element is excluded if it is (or sits inside) a code
//! container, or if it carries a known syntax-highlighter class.

use dirfix_dom::{Document, NodeId};

/// Tags treated as code containers.
const CODE_TAGS: &[&str] = &["code", "pre"];

/// Class names emitted by common syntax highlighters.
const CODE_CLASSES: &[&str] = &["code", "highlight", "hljs", "prettyprint"];

/// True when `element` must be left alone by the applicator.
pub fn is_code_element(doc: &Document, element: NodeId) -> bool {
    let Ok(el) = doc.element(element) else {
        return false;
    };
    if CODE_TAGS.contains(&el.tag()) {
        return true;
    }
    if el.classes().any(|class| CODE_CLASSES.contains(&class)) {
        return true;
    }
    doc.ancestors(element)
        .filter_map(|id| doc.tag(id))
        .any(|tag| CODE_TAGS.contains(&tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_tags_are_excluded() {
        let mut doc = Document::new();
        let code = doc.append_element(doc.root(), "code").unwrap();
        let pre = doc.append_element(doc.root(), "pre").unwrap();
        let p = doc.append_element(doc.root(), "p").unwrap();
        assert!(is_code_element(&doc, code));
        assert!(is_code_element(&doc, pre));
        assert!(!is_code_element(&doc, p));
    }

    #[test]
    fn highlighter_classes_are_excluded() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.root(), "div").unwrap();
        doc.set_attribute(div, "class", "hljs language-rust").unwrap();
        assert!(is_code_element(&doc, div));

        let span = doc.append_element(doc.root(), "span").unwrap();
        doc.set_attribute(span, "class", "note").unwrap();
        assert!(!is_code_element(&doc, span));
    }

    #[test]
    fn descendants_of_code_containers_are_excluded() {
        let mut doc = Document::new();
        let pre = doc.append_element(doc.root(), "pre").unwrap();
        let span = doc.append_element(pre, "span").unwrap();
        assert!(is_code_element(&doc, span));
    }
}
