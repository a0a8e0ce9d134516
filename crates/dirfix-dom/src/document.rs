//! The mutable document tree and its mutation-observation machinery.

use ego_tree::Tree;

use crate::error::{DomError, Result};
use crate::node::{ElementData, NodeData};
use crate::style::StyleDecls;

/// Identifier of a node inside a [`Document`].
pub type NodeId = ego_tree::NodeId;

/// Kind of change reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Children were added to or removed from the target element.
    ChildList,
    /// The data of the target text node changed.
    CharacterData,
    /// An attribute or inline style of the target element changed.
    Attributes,
}

/// A single change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
}

/// What an observer wants to be told about.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub character_data: bool,
    pub attributes: bool,
    /// Also report changes anywhere below the target, not just on it.
    pub subtree: bool,
}

impl ObserveOptions {
    fn wants(&self, kind: MutationKind) -> bool {
        match kind {
            MutationKind::ChildList => self.child_list,
            MutationKind::CharacterData => self.character_data,
            MutationKind::Attributes => self.attributes,
        }
    }
}

/// Handle identifying a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Debug)]
struct Observer {
    id: ObserverId,
    target: NodeId,
    options: ObserveOptions,
    queue: Vec<MutationRecord>,
}

/// An in-memory document: a tree of element and text nodes rooted at a
/// body element, plus any registered mutation observers.
///
/// Every mutating method records a [`MutationRecord`] in the queue of each
/// observer whose options and target match. Observers that did not ask for
/// attribute changes never see them, so style writes made in reaction to a
/// batch cannot re-enter the same subscription.
#[derive(Debug)]
pub struct Document {
    tree: Tree<NodeData>,
    host: Option<String>,
    observers: Vec<Observer>,
    next_observer: u64,
}

impl Document {
    /// Empty document: a bare body element.
    pub fn new() -> Self {
        Self::from_tree(Tree::new(NodeData::Element(ElementData::new("body"))), None)
    }

    pub(crate) fn from_tree(tree: Tree<NodeData>, host: Option<String>) -> Self {
        Self {
            tree,
            host,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// The body element every other node hangs off.
    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    /// Hostname of the page this document came from, if known.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn set_host(&mut self, host: Option<String>) {
        self.host = host;
    }

    pub(crate) fn tree(&self) -> &Tree<NodeData> {
        &self.tree
    }

    fn node(&self, id: NodeId) -> Result<ego_tree::NodeRef<'_, NodeData>> {
        self.tree.get(id).ok_or(DomError::NodeNotFound)
    }

    /// Payload of `id`, if the node exists.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.tree.get(id).map(|node| node.value())
    }

    /// Element payload of `id`.
    pub fn element(&self, id: NodeId) -> Result<&ElementData> {
        self.node(id)?.value().as_element().ok_or(DomError::NotAnElement)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(NodeData::is_element)
    }

    /// Lowercase tag name of `id`, if it is an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(ElementData::tag)
    }

    /// Nearest element containing `id` (its parent for text nodes).
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.tree.get(id)?.parent();
        while let Some(node) = current {
            if node.value().is_element() {
                return Some(node.id());
            }
            current = node.parent();
        }
        None
    }

    /// Ancestors of `id`, nearest first. Excludes `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.tree
            .get(id)
            .into_iter()
            .flat_map(|node| node.ancestors())
            .map(|node| node.id())
    }

    /// True when `id` is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root() || self.ancestors(id).any(|a| a == self.root())
    }

    /// All element nodes in document order, starting at the root.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.tree
            .root()
            .descendants()
            .filter(|node| node.value().is_element())
            .map(|node| node.id())
    }

    /// Concatenated text of `id` and everything below it.
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.tree.get(id) else {
            return String::new();
        };
        let mut out = String::new();
        for desc in node.descendants() {
            if let NodeData::Text(text) = desc.value() {
                out.push_str(text);
            }
        }
        out
    }

    // --- mutations -------------------------------------------------------

    /// Append a new element under `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId> {
        let id = {
            let mut parent_mut = self.tree.get_mut(parent).ok_or(DomError::NodeNotFound)?;
            parent_mut
                .append(NodeData::Element(ElementData::new(tag)))
                .id()
        };
        self.emit(MutationKind::ChildList, parent);
        Ok(id)
    }

    /// Append a new text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        let id = {
            let mut parent_mut = self.tree.get_mut(parent).ok_or(DomError::NodeNotFound)?;
            parent_mut.append(NodeData::Text(text.to_string())).id()
        };
        self.emit(MutationKind::ChildList, parent);
        Ok(id)
    }

    /// Detach `id` from its parent. Detaching the root is a no-op.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node(id)?.parent().map(|p| p.id());
        let Some(parent) = parent else {
            return Ok(());
        };
        self.tree
            .get_mut(id)
            .ok_or(DomError::NodeNotFound)?
            .detach();
        self.emit(MutationKind::ChildList, parent);
        Ok(())
    }

    /// Replace the data of a text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        {
            let mut node = self.tree.get_mut(id).ok_or(DomError::NodeNotFound)?;
            match node.value() {
                NodeData::Text(data) => *data = text.to_string(),
                NodeData::Element(_) => return Err(DomError::NotText),
            }
        }
        self.emit(MutationKind::CharacterData, id);
        Ok(())
    }

    fn with_element_mut<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut ElementData) -> R,
    ) -> Result<R> {
        let mut node = self.tree.get_mut(id).ok_or(DomError::NodeNotFound)?;
        let element = node.value().as_element_mut().ok_or(DomError::NotAnElement)?;
        Ok(f(element))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        self.with_element_mut(id, |el| el.set_attr(name, value))?;
        self.emit(MutationKind::Attributes, id);
        Ok(())
    }

    /// Remove an attribute; returns whether it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool> {
        let removed = self.with_element_mut(id, |el| el.remove_attr(name))?;
        if removed {
            self.emit(MutationKind::Attributes, id);
        }
        Ok(removed)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.attr(name)
    }

    /// Parsed inline style of an element.
    pub fn style(&self, id: NodeId) -> Result<&StyleDecls> {
        Ok(self.element(id)?.style())
    }

    pub fn set_style_property(&mut self, id: NodeId, prop: &str, value: &str) -> Result<()> {
        self.with_element_mut(id, |el| el.style.set(prop, value))?;
        self.emit(MutationKind::Attributes, id);
        Ok(())
    }

    /// Remove a style property; returns whether it was declared.
    pub fn remove_style_property(&mut self, id: NodeId, prop: &str) -> Result<bool> {
        let removed = self.with_element_mut(id, |el| el.style.remove(prop))?;
        if removed {
            self.emit(MutationKind::Attributes, id);
        }
        Ok(removed)
    }

    // --- observation ------------------------------------------------------

    /// Register an observer for changes on `target` (and below it when
    /// `subtree` is set). Records accumulate until [`Self::take_records`].
    pub fn observe(&mut self, target: NodeId, options: ObserveOptions) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push(Observer {
            id,
            target,
            options,
            queue: Vec::new(),
        });
        id
    }

    /// Drain the pending batch for `observer`. Unknown or disconnected
    /// observers yield an empty batch.
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .iter_mut()
            .find(|obs| obs.id == observer)
            .map(|obs| std::mem::take(&mut obs.queue))
            .unwrap_or_default()
    }

    /// Remove an observer and discard anything still queued for it.
    pub fn disconnect(&mut self, observer: ObserverId) {
        self.observers.retain(|obs| obs.id != observer);
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn is_descendant(&self, node: NodeId, of: NodeId) -> bool {
        self.tree
            .get(node)
            .is_some_and(|n| n.ancestors().any(|a| a.id() == of))
    }

    fn emit(&mut self, kind: MutationKind, target: NodeId) {
        if self.observers.is_empty() {
            return;
        }
        let mut deliver = Vec::new();
        for (index, obs) in self.observers.iter().enumerate() {
            if !obs.options.wants(kind) {
                continue;
            }
            if target == obs.target || (obs.options.subtree && self.is_descendant(target, obs.target))
            {
                deliver.push(index);
            }
        }
        for index in deliver {
            self.observers[index].queue.push(MutationRecord { kind, target });
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_observer(doc: &mut Document) -> ObserverId {
        let root = doc.root();
        doc.observe(
            root,
            ObserveOptions {
                child_list: true,
                character_data: true,
                attributes: false,
                subtree: true,
            },
        )
    }

    #[test]
    fn append_and_text_content() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p").unwrap();
        doc.append_text(p, "hello ").unwrap();
        let span = doc.append_element(p, "span").unwrap();
        doc.append_text(span, "world").unwrap();
        assert_eq!(doc.text_content(p), "hello world");
        assert_eq!(doc.tag(p), Some("p"));
    }

    #[test]
    fn child_list_records_target_the_parent() {
        let mut doc = Document::new();
        let observer = content_observer(&mut doc);
        doc.append_element(doc.root(), "p").unwrap();
        let records = doc.take_records(observer);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, MutationKind::ChildList);
        assert_eq!(records[0].target, doc.root());
        // Queue was drained.
        assert!(doc.take_records(observer).is_empty());
    }

    #[test]
    fn character_data_records_target_the_text_node() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p").unwrap();
        let text = doc.append_text(p, "abc").unwrap();
        let observer = content_observer(&mut doc);
        doc.set_text(text, "def").unwrap();
        let records = doc.take_records(observer);
        assert_eq!(records, vec![MutationRecord {
            kind: MutationKind::CharacterData,
            target: text,
        }]);
        assert_eq!(doc.text_content(p), "def");
    }

    #[test]
    fn attribute_changes_invisible_without_attributes_flag() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p").unwrap();
        let observer = content_observer(&mut doc);
        doc.set_style_property(p, "direction", "rtl").unwrap();
        doc.set_attribute(p, "data-x", "1").unwrap();
        assert!(doc.take_records(observer).is_empty());
    }

    #[test]
    fn disconnect_discards_queue() {
        let mut doc = Document::new();
        let observer = content_observer(&mut doc);
        doc.append_element(doc.root(), "p").unwrap();
        doc.disconnect(observer);
        assert!(doc.take_records(observer).is_empty());
        assert_eq!(doc.observer_count(), 0);
    }

    #[test]
    fn non_subtree_observer_only_sees_its_target() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p").unwrap();
        let observer = doc.observe(
            p,
            ObserveOptions {
                child_list: true,
                ..Default::default()
            },
        );
        doc.append_element(doc.root(), "div").unwrap();
        doc.append_text(p, "x").unwrap();
        let records = doc.take_records(observer);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, p);
    }

    #[test]
    fn remove_reports_child_list_on_parent() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p").unwrap();
        let observer = content_observer(&mut doc);
        doc.remove(p).unwrap();
        let records = doc.take_records(observer);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, doc.root());
        assert!(!doc.is_attached(p));
    }

    #[test]
    fn parent_element_skips_to_nearest_element() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.root(), "p").unwrap();
        let text = doc.append_text(p, "abc").unwrap();
        assert_eq!(doc.parent_element(text), Some(p));
        assert_eq!(doc.parent_element(doc.root()), None);
    }

    #[test]
    fn element_ops_reject_text_nodes() {
        let mut doc = Document::new();
        let text = doc.append_text(doc.root(), "abc").unwrap();
        assert!(matches!(
            doc.set_attribute(text, "id", "x"),
            Err(DomError::NotAnElement)
        ));
        assert!(matches!(
            doc.set_text(doc.root(), "x"),
            Err(DomError::NotText)
        ));
    }
}
