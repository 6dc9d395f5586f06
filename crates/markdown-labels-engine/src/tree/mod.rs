//! A mutable document tree of tagged elements and text.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by [`NodeId`].
//! Detached nodes stay in the arena; they are simply unreachable from the root.
//!
//! ## Modules
//!
//! - [`html`] - serialisation to HTML
//! - [`markdown`] - building a document from markdown

pub mod html;
pub mod markdown;

use std::collections::BTreeMap;

/// Handle to a node within one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Tag of the synthetic root element, which serialises as its children only.
    pub const ROOT_TAG: &'static str = "#document";

    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Element {
                tag: Self::ROOT_TAG.to_string(),
                attrs: BTreeMap::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.into(),
            attrs: BTreeMap::new(),
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Creates an element and appends it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    /// Appends text to `parent`, merging with a trailing text child.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        if let Some(&last) = self.nodes[parent.0].children.last()
            && let NodeKind::Text(existing) = &mut self.nodes[last.0].kind
        {
            existing.push_str(text);
            return last;
        }
        let id = self.create_text(text);
        self.append_child(parent, id);
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.nodes[parent.0].children.len();
        self.insert_child(parent, index, child);
    }

    /// Inserts `child` at `index` among `parent`'s children, detaching it first.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Removes `node` from its parent, if it has one.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Puts `replacements` where `node` was and detaches `node`.
    pub fn replace_with(&mut self, node: NodeId, replacements: &[NodeId]) {
        let Some(parent) = self.nodes[node.0].parent else {
            return;
        };
        let Some(index) = self.index_in_parent(node) else {
            return;
        };
        self.detach(node);
        for (offset, &replacement) in replacements.iter().enumerate() {
            self.insert_child(parent, index + offset, replacement);
        }
    }

    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.nodes[node.0].parent?;
        self.nodes[parent.0].children.iter().position(|&c| c == node)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    /// The element's tag, or `None` for text.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attrs(&self, node: NodeId) -> Option<&BTreeMap<String, String>> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attrs, .. } => Some(attrs),
            NodeKind::Text(_) => None,
        }
    }

    fn attrs_mut(&mut self, node: NodeId) -> Option<&mut BTreeMap<String, String>> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element { attrs, .. } => Some(attrs),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attrs(node)?.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    /// Sets an attribute. Ignored on text nodes.
    pub fn set_attr(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(attrs) = self.attrs_mut(node) {
            attrs.insert(name.into(), value.into());
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.attrs_mut(node)?.remove(name)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Adds `class` to the space-separated class list, unless already present.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let Some(attrs) = self.attrs_mut(node) else {
            return;
        };
        match attrs.get_mut("class") {
            Some(existing) if !existing.trim().is_empty() => {
                existing.push(' ');
                existing.push_str(class);
            }
            _ => {
                attrs.insert("class".to_string(), class.to_string());
            }
        }
    }

    /// Appends a declaration to the inline `style` attribute.
    pub fn add_style(&mut self, node: NodeId, declaration: &str) {
        let Some(attrs) = self.attrs_mut(node) else {
            return;
        };
        match attrs.get_mut("style") {
            Some(existing) if !existing.trim().is_empty() => {
                if !existing.trim_end().ends_with(';') {
                    existing.push(';');
                }
                existing.push_str(declaration);
            }
            _ => {
                attrs.insert("style".to_string(), declaration.to_string());
            }
        }
    }

    /// The content of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Replaces the content of a text node, or every child of an element with
    /// a single text node.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        let text = text.into();
        if let NodeKind::Text(existing) = &mut self.nodes[node.0].kind {
            *existing = text;
            return;
        }
        for child in self.nodes[node.0].children.clone() {
            self.detach(child);
        }
        let child = self.create_text(text);
        self.append_child(node, child);
    }

    /// Every node below `node` in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of `node` and everything below it.
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p");
        doc.append_text(p, "hello ");
        let em = doc.append_element(p, "em");
        doc.append_text(em, "world");
        doc.append_text(p, "!");
        (doc, p, em)
    }

    #[test]
    fn text_content_concatenates_in_order() {
        let (doc, p, _) = sample();
        assert_eq!(doc.text_content(p), "hello world!");
        assert_eq!(doc.text_content(doc.root()), "hello world!");
    }

    #[test]
    fn append_text_merges_adjacent_text() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p");
        let first = doc.append_text(p, "a");
        let second = doc.append_text(p, "b");
        assert_eq!(first, second);
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text(first), Some("ab"));
    }

    #[test]
    fn insert_and_replace_keep_order() {
        let (mut doc, p, em) = sample();
        let label = doc.create_element("span");
        doc.insert_child(p, 0, label);
        assert_eq!(doc.children(p)[0], label);
        assert_eq!(doc.parent(label), Some(p));

        let a = doc.create_text("A");
        let b = doc.create_text("B");
        doc.replace_with(em, &[a, b]);
        assert_eq!(doc.parent(em), None);
        assert_eq!(doc.index_in_parent(a), Some(2));
        assert_eq!(doc.index_in_parent(b), Some(3));
        assert_eq!(doc.text_content(p), "hello AB!");
    }

    #[test]
    fn classes_and_styles_accumulate() {
        let mut doc = Document::new();
        let root = doc.root();
        let ol = doc.append_element(root, "ol");
        doc.add_class(ol, "a");
        doc.add_class(ol, "b");
        doc.add_class(ol, "a");
        assert_eq!(doc.attr(ol, "class"), Some("a b"));
        assert!(doc.has_class(ol, "b"));

        doc.add_style(ol, "color:red");
        doc.add_style(ol, "counter-reset:x");
        assert_eq!(doc.attr(ol, "style"), Some("color:red;counter-reset:x"));
    }

    #[test]
    fn attributes_are_ignored_on_text() {
        let mut doc = Document::new();
        let text = doc.create_text("t");
        doc.set_attr(text, "id", "x");
        assert_eq!(doc.attr(text, "id"), None);
        assert_eq!(doc.remove_attr(text, "id"), None);
    }

    #[test]
    fn descendants_are_pre_order() {
        let (doc, p, em) = sample();
        let descendants = doc.descendants(p);
        assert_eq!(descendants.len(), 4);
        assert_eq!(descendants[1], em);
        assert_eq!(doc.text(descendants[2]), Some("world"));
    }

    #[test]
    fn set_text_on_element_replaces_children() {
        let (mut doc, p, _) = sample();
        doc.set_text(p, "plain");
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p), "plain");
    }
}
