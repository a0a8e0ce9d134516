//! HTML ingestion and serialization.
//!
//! Parsing goes through `scraper`; the parsed tree is translated into our
//! own node types rather than used directly, and only the body subtree is
//! kept. Comments, doctypes and processing instructions are dropped.

use ego_tree::{NodeRef, Tree};
use scraper::{Html, Node, Selector};
use tracing::debug;

use crate::document::Document;
use crate::error::Result;
use crate::node::{ElementData, NodeData};
use crate::style::StyleDecls;

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

impl Document {
    /// Parse an HTML document (or fragment) into a [`Document`] rooted at
    /// its body element. `host` is the hostname the markup came from and
    /// feeds the blacklist gate.
    pub fn parse_html(html: &str, host: Option<&str>) -> Result<Document> {
        let parsed = Html::parse_document(html);
        let body = find_body(&parsed);

        let mut root = ElementData::new("body");
        if let Some(body) = body {
            if let Node::Element(el) = body.value() {
                copy_attrs(el, &mut root);
            }
        }
        let mut tree = Tree::new(NodeData::Element(root));
        if let Some(body) = body {
            let root_id = tree.root().id();
            let mut translated = 0usize;
            for child in body.children() {
                translated += translate_into(&mut tree, root_id, child);
            }
            debug!(nodes = translated, "translated body subtree");
        }
        Ok(Document::from_tree(tree, host.map(str::to_string)))
    }

    /// Serialize the body subtree back to markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, self.tree().root());
        out
    }
}

fn find_body(document: &Html) -> Option<NodeRef<'_, Node>> {
    let selector = Selector::parse("body").ok()?;
    document.select(&selector).next().map(|body| *body)
}

fn copy_attrs(el: &scraper::node::Element, into: &mut ElementData) {
    for (name, value) in el.attrs.iter() {
        let name: &str = &name.local;
        if name == "style" {
            into.style = StyleDecls::parse(value);
        } else {
            into.set_attr(name, value);
        }
    }
}

/// Translate `node` (and its subtree) under `parent`, returning the number
/// of nodes created.
fn translate_into(tree: &mut Tree<NodeData>, parent: ego_tree::NodeId, node: NodeRef<'_, Node>) -> usize {
    match node.value() {
        Node::Element(el) => {
            let mut data = ElementData::new(&el.name.local);
            copy_attrs(el, &mut data);
            let id = tree
                .get_mut(parent)
                .expect("parent created by this translation")
                .append(NodeData::Element(data))
                .id();
            let mut count = 1;
            for child in node.children() {
                count += translate_into(tree, id, child);
            }
            count
        }
        Node::Text(text) => {
            tree.get_mut(parent)
                .expect("parent created by this translation")
                .append(NodeData::Text(text.to_string()));
            1
        }
        // Comments, doctypes, processing instructions: nothing to keep.
        _ => 0,
    }
}

fn write_node(out: &mut String, node: ego_tree::NodeRef<'_, NodeData>) {
    match node.value() {
        NodeData::Text(text) => out.push_str(&escape_text(text)),
        NodeData::Element(el) => {
            out.push('<');
            out.push_str(el.tag());
            for (name, value) in el.attrs() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            if !el.style().is_empty() {
                out.push_str(" style=\"");
                out.push_str(&escape_attr(&el.style().to_css()));
                out.push('"');
            }
            out.push('>');
            if VOID_TAGS.contains(&el.tag()) {
                return;
            }
            for child in node.children() {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(el.tag());
            out.push('>');
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
