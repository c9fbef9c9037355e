//! DOM node model: document, element, and text nodes in a flat arena.
//!
//! Nodes live in a single `Vec` owned by [`DomTree`]; tree edges are
//! [`NodeId`] links (parent, first/last child, previous/next sibling). The
//! arena keeps sibling navigation cheap and makes destruction non-recursive
//! by construction, so arbitrarily deep trees cannot overflow the stack.
//!
//! Invariants:
//! - Node 0 is the document root and is never a child of anything.
//! - A node is appended at most once; `append_child` requires a detached
//!   child and panics on misuse.
//! - Sibling links are consistent: for adjacent siblings `a`, `b`,
//!   `a.next_sibling == b` iff `b.previous_sibling == a`, and the parent's
//!   `first_child`/`last_child` bracket the chain.

use crate::token::Attribute;

/// Handle to a node inside a [`DomTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM node type codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Document = 9,
}

/// Per-kind node payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Element {
        /// Canonical lowercase local name.
        local_name: String,
        attributes: Vec<Attribute>,
    },
    Text {
        data: String,
    },
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Document => NodeType::Document,
            NodeData::Element { .. } => NodeType::Element,
            NodeData::Text { .. } => NodeType::Text,
        }
    }
}

#[derive(Debug)]
struct NodeRecord {
    data: NodeData,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    previous_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl NodeRecord {
    fn detached(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            previous_sibling: None,
            next_sibling: None,
        }
    }
}

/// Arena-owned DOM tree rooted at a document node.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<NodeRecord>,
}

impl DomTree {
    /// Create a tree containing only the document root.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord::detached(NodeData::Document)],
        }
    }

    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    /// Allocate a detached element node.
    pub fn create_element(
        &mut self,
        local_name: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> NodeId {
        self.alloc(NodeData::Element {
            local_name: local_name.into(),
            attributes,
        })
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text { data: data.into() })
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id: u32 = self
            .nodes
            .len()
            .try_into()
            .expect("node id overflow");
        self.nodes.push(NodeRecord::detached(data));
        NodeId(id)
    }

    /// Append `child` as the new last child of `parent`.
    ///
    /// Sets the child's parent, links it after the current last child, and
    /// clears its next-sibling pointer. The child must be detached and the
    /// parent must be a document or element node; violations are programmer
    /// errors and panic.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        assert_ne!(
            child,
            self.document(),
            "the document root cannot be appended"
        );
        assert!(
            self.nodes[child.index()].parent.is_none(),
            "append_child requires a detached node"
        );
        assert!(
            matches!(
                self.nodes[parent.index()].data,
                NodeData::Document | NodeData::Element { .. }
            ),
            "append_child parent must be a document or element"
        );

        self.nodes[child.index()].parent = Some(parent);
        match self.nodes[parent.index()].last_child {
            Some(last) => {
                self.nodes[last.index()].next_sibling = Some(child);
                self.nodes[child.index()].previous_sibling = Some(last);
                self.nodes[parent.index()].last_child = Some(child);
            }
            None => {
                self.nodes[parent.index()].first_child = Some(child);
                self.nodes[parent.index()].last_child = Some(child);
            }
        }
        self.nodes[child.index()].next_sibling = None;
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()].data
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.nodes[id.index()].data.node_type()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].last_child
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].previous_sibling
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].next_sibling
    }

    /// Iterate the children of `id` in document order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Total number of nodes, document root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The document root always exists.
        false
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward sibling iterator over a node's children.
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.next_sibling(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Attribute;

    #[test]
    fn node_type_codes_match_dom_spec() {
        let mut tree = DomTree::new();
        let el = tree.create_element("div", Vec::new());
        let text = tree.create_text("hi");
        assert_eq!(tree.node_type(tree.document()) as u8, 9);
        assert_eq!(tree.node_type(el) as u8, 1);
        assert_eq!(tree.node_type(text) as u8, 3);
    }

    #[test]
    fn append_child_links_siblings_in_order() {
        let mut tree = DomTree::new();
        let root = tree.document();
        let div = tree.create_element("div", vec![Attribute::new("id", "wrap")]);
        tree.append_child(root, div);

        let a = tree.create_element("a", Vec::new());
        let text = tree.create_text("mid");
        let b = tree.create_element("b", Vec::new());
        tree.append_child(div, a);
        tree.append_child(div, text);
        tree.append_child(div, b);

        assert_eq!(tree.first_child(div), Some(a));
        assert_eq!(tree.last_child(div), Some(b));
        assert_eq!(tree.next_sibling(a), Some(text));
        assert_eq!(tree.next_sibling(text), Some(b));
        assert_eq!(tree.next_sibling(b), None);
        assert_eq!(tree.previous_sibling(b), Some(text));
        assert_eq!(tree.previous_sibling(text), Some(a));
        assert_eq!(tree.previous_sibling(a), None);
        for child in [a, text, b] {
            assert_eq!(tree.parent(child), Some(div));
        }
        assert_eq!(tree.children(div).collect::<Vec<_>>(), vec![a, text, b]);
    }

    #[test]
    fn newly_created_nodes_are_detached() {
        let mut tree = DomTree::new();
        let el = tree.create_element("span", Vec::new());
        assert_eq!(tree.parent(el), None);
        assert_eq!(tree.first_child(el), None);
        assert_eq!(tree.next_sibling(el), None);
    }

    #[test]
    #[should_panic(expected = "append_child requires a detached node")]
    fn append_child_rejects_attached_nodes() {
        let mut tree = DomTree::new();
        let root = tree.document();
        let el = tree.create_element("p", Vec::new());
        tree.append_child(root, el);
        tree.append_child(root, el);
    }

    #[test]
    #[should_panic(expected = "parent must be a document or element")]
    fn append_child_rejects_text_parents() {
        let mut tree = DomTree::new();
        let root = tree.document();
        let text = tree.create_text("leaf");
        tree.append_child(root, text);
        let el = tree.create_element("p", Vec::new());
        tree.append_child(text, el);
    }

    #[test]
    fn deep_chain_builds_and_navigates_without_recursion() {
        let depth: usize = 10_000;
        let mut tree = DomTree::new();
        let mut parent = tree.document();
        for _ in 0..depth {
            let el = tree.create_element("div", Vec::new());
            tree.append_child(parent, el);
            parent = el;
        }
        assert_eq!(tree.len(), depth + 1);

        let mut seen = 0usize;
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            seen += 1;
            cursor = tree.parent(id);
        }
        assert_eq!(seen, depth + 1, "walk from leaf to root visits every node");
        // Dropping `tree` here frees all 10k nodes iteratively (flat arena).
    }
}
