/// Arena-backed document tree for CommonMark nodes
use serde::{Deserialize, Serialize};

/// Index of a node inside its `Tree`. Stable for the lifetime of the tree;
/// detaching a node does not invalidate ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListType {
    Bullet,
    Ordered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListDelim {
    Period,
    Paren,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListData {
    pub list_type: ListType,
    /// Bullet character (`-`, `+`, `*`) for bullet lists
    pub bullet_char: u8,
    /// Start number for ordered lists
    pub start: u32,
    pub delimiter: ListDelim,
    pub tight: bool,
    /// Columns of indentation before the marker
    pub marker_offset: usize,
    /// Columns from the start of the marker to the item content
    pub padding: usize,
}

impl Default for ListData {
    fn default() -> Self {
        ListData {
            list_type: ListType::Bullet,
            bullet_char: b'-',
            start: 1,
            delimiter: ListDelim::Period,
            tight: false,
            marker_offset: 0,
            padding: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeBlockData {
    pub fenced: bool,
    pub fence_char: u8,
    pub fence_length: usize,
    pub fence_offset: usize,
    /// Info string of a fenced block (first word is the language)
    pub info: String,
    pub literal: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingData {
    pub level: u8,
    pub setext: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkData {
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Document,
    BlockQuote,
    List(ListData),
    Item(ListData),
    CodeBlock(CodeBlockData),
    HtmlBlock {
        literal: String,
        /// Which of the seven HTML block kinds opened this block (drives
        /// the end condition while the block is open)
        block_type: u8,
    },
    Paragraph,
    Heading(HeadingData),
    ThematicBreak,
    // Inline nodes
    Text(String),
    Softbreak,
    Linebreak,
    Code(String),
    HtmlInline(String),
    Emph,
    Strong,
    Link(LinkData),
    Image(LinkData),
}

impl NodeKind {
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::BlockQuote
                | NodeKind::List(_)
                | NodeKind::Item(_)
                | NodeKind::CodeBlock(_)
                | NodeKind::HtmlBlock { .. }
                | NodeKind::Paragraph
                | NodeKind::Heading(_)
                | NodeKind::ThematicBreak
        )
    }

    /// Nodes that never have children; the iterator emits only an enter
    /// event for these.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            NodeKind::CodeBlock(_)
                | NodeKind::HtmlBlock { .. }
                | NodeKind::ThematicBreak
                | NodeKind::Text(_)
                | NodeKind::Softbreak
                | NodeKind::Linebreak
                | NodeKind::Code(_)
                | NodeKind::HtmlInline(_)
        )
    }

    /// Containers that may hold other blocks
    pub fn can_contain(&self, child: &NodeKind) -> bool {
        match self {
            NodeKind::Document | NodeKind::BlockQuote | NodeKind::Item(_) => {
                child.is_block() && !matches!(child, NodeKind::Item(_))
            }
            NodeKind::List(_) => matches!(child, NodeKind::Item(_)),
            NodeKind::Paragraph
            | NodeKind::Heading(_)
            | NodeKind::Emph
            | NodeKind::Strong
            | NodeKind::Link(_)
            | NodeKind::Image(_) => !child.is_block(),
            _ => false,
        }
    }
}

/// 1-based source span of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sourcepos {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Sourcepos {
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Sourcepos {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub sourcepos: Sourcepos,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    /// Raw text accumulated during block parsing, inline-parsed later
    pub(crate) content: String,
    pub(crate) open: bool,
    pub(crate) last_line_blank: bool,
}

impl Node {
    fn new(kind: NodeKind, sourcepos: Sourcepos) -> Self {
        Node {
            kind,
            sourcepos,
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
            content: String::new(),
            open: true,
            last_line_blank: false,
        }
    }
}

/// The arena. Owns every node; all structural links are indices into the
/// arena, so the parent/child/sibling cross-links never form ownership
/// cycles and the whole forest is torn down with the tree.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    pub fn new() -> Self {
        let root = Node::new(NodeKind::Document, Sourcepos::new(1, 1, 0, 0));
        Tree {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached node
    pub fn create(&mut self, kind: NodeKind, sourcepos: Sourcepos) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, sourcepos));
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].last_child
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next
    }

    /// Unlink a node (and its subtree) from its parent and siblings
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let n = &self.nodes[id.0];
            (n.parent, n.prev, n.next)
        };

        match prev {
            Some(p) => self.nodes[p.0].next = next,
            None => {
                if let Some(par) = parent {
                    self.nodes[par.0].first_child = next;
                }
            }
        }
        match next {
            Some(nx) => self.nodes[nx.0].prev = prev,
            None => {
                if let Some(par) = parent {
                    self.nodes[par.0].last_child = prev;
                }
            }
        }

        let n = &mut self.nodes[id.0];
        n.parent = None;
        n.prev = None;
        n.next = None;
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let old_last = self.nodes[parent.0].last_child;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].prev = old_last;
        match old_last {
            Some(last) => self.nodes[last.0].next = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let old_first = self.nodes[parent.0].first_child;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].next = old_first;
        match old_first {
            Some(first) => self.nodes[first.0].prev = Some(child),
            None => self.nodes[parent.0].last_child = Some(child),
        }
        self.nodes[parent.0].first_child = Some(child);
    }

    /// Insert `sibling` immediately after `node`
    pub fn insert_after(&mut self, node: NodeId, sibling: NodeId) {
        self.detach(sibling);
        let parent = self.nodes[node.0].parent;
        let next = self.nodes[node.0].next;
        self.nodes[sibling.0].parent = parent;
        self.nodes[sibling.0].prev = Some(node);
        self.nodes[sibling.0].next = next;
        self.nodes[node.0].next = Some(sibling);
        match next {
            Some(nx) => self.nodes[nx.0].prev = Some(sibling),
            None => {
                if let Some(par) = parent {
                    self.nodes[par.0].last_child = Some(sibling);
                }
            }
        }
    }

    /// Insert `sibling` immediately before `node`
    pub fn insert_before(&mut self, node: NodeId, sibling: NodeId) {
        self.detach(sibling);
        let parent = self.nodes[node.0].parent;
        let prev = self.nodes[node.0].prev;
        self.nodes[sibling.0].parent = parent;
        self.nodes[sibling.0].next = Some(node);
        self.nodes[sibling.0].prev = prev;
        self.nodes[node.0].prev = Some(sibling);
        match prev {
            Some(p) => self.nodes[p.0].next = Some(sibling),
            None => {
                if let Some(par) = parent {
                    self.nodes[par.0].first_child = Some(sibling);
                }
            }
        }
    }

    /// Pre-order iterator over the whole document
    pub fn iter(&self) -> TreeIter<'_> {
        self.iter_from(self.root)
    }

    /// Pre-order iterator over the subtree rooted at `start`
    pub fn iter_from(&self, start: NodeId) -> TreeIter<'_> {
        TreeIter {
            tree: self,
            root: start,
            next: Some(NodeEdge::Enter(start)),
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl std::ops::IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEdge {
    Enter(NodeId),
    Exit(NodeId),
}

/// Lazy pre-order traversal with explicit enter/exit events. Cursor-based:
/// holds only the pending event, so depth is not bounded by the call stack
/// and advancing never touches the tree.
pub struct TreeIter<'a> {
    tree: &'a Tree,
    root: NodeId,
    next: Option<NodeEdge>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = NodeEdge;

    fn next(&mut self) -> Option<NodeEdge> {
        let cur = self.next?;

        // Roll the cursor forward before handing out the current event
        self.next = match cur {
            NodeEdge::Enter(id) if !self.tree.kind(id).is_atom() => {
                match self.tree.first_child(id) {
                    Some(child) => Some(NodeEdge::Enter(child)),
                    None => Some(NodeEdge::Exit(id)),
                }
            }
            NodeEdge::Enter(id) | NodeEdge::Exit(id) => {
                if id == self.root {
                    None
                } else if let Some(sibling) = self.tree.next(id) {
                    Some(NodeEdge::Enter(sibling))
                } else {
                    self.tree.parent(id).map(NodeEdge::Exit)
                }
            }
        };

        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(tree: &mut Tree, s: &str) -> NodeId {
        tree.create(NodeKind::Text(s.to_string()), Sourcepos::default())
    }

    #[test]
    fn test_append_and_links() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph, Sourcepos::default());
        tree.append_child(root, para);
        let a = text(&mut tree, "a");
        let b = text(&mut tree, "b");
        tree.append_child(para, a);
        tree.append_child(para, b);

        assert_eq!(tree.first_child(para), Some(a));
        assert_eq!(tree.last_child(para), Some(b));
        assert_eq!(tree.next(a), Some(b));
        assert_eq!(tree.prev(b), Some(a));
        assert_eq!(tree.parent(a), Some(para));
    }

    #[test]
    fn test_detach_relinks_siblings() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = text(&mut tree, "a");
        let b = text(&mut tree, "b");
        let c = text(&mut tree, "c");
        let para = tree.create(NodeKind::Paragraph, Sourcepos::default());
        tree.append_child(root, para);
        tree.append_child(para, a);
        tree.append_child(para, b);
        tree.append_child(para, c);

        tree.detach(b);

        assert_eq!(tree.next(a), Some(c));
        assert_eq!(tree.prev(c), Some(a));
        assert_eq!(tree.parent(b), None);
        assert_eq!(tree.first_child(para), Some(a));
        assert_eq!(tree.last_child(para), Some(c));
    }

    #[test]
    fn test_insert_before_first_child_updates_parent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph, Sourcepos::default());
        tree.append_child(root, para);
        let b = text(&mut tree, "b");
        tree.append_child(para, b);
        let a = text(&mut tree, "a");
        tree.insert_before(b, a);

        assert_eq!(tree.first_child(para), Some(a));
        assert_eq!(tree.next(a), Some(b));
    }

    #[test]
    fn test_iter_events() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph, Sourcepos::default());
        tree.append_child(root, para);
        let emph = tree.create(NodeKind::Emph, Sourcepos::default());
        tree.append_child(para, emph);
        let t = text(&mut tree, "hi");
        tree.append_child(emph, t);

        let events: Vec<NodeEdge> = tree.iter().collect();
        assert_eq!(
            events,
            vec![
                NodeEdge::Enter(root),
                NodeEdge::Enter(para),
                NodeEdge::Enter(emph),
                NodeEdge::Enter(t), // atoms get no exit event
                NodeEdge::Exit(emph),
                NodeEdge::Exit(para),
                NodeEdge::Exit(root),
            ]
        );
    }

    #[test]
    fn test_iter_from_subtree_stays_inside() {
        let mut tree = Tree::new();
        let root = tree.root();
        let p1 = tree.create(NodeKind::Paragraph, Sourcepos::default());
        let p2 = tree.create(NodeKind::Paragraph, Sourcepos::default());
        tree.append_child(root, p1);
        tree.append_child(root, p2);
        let t = text(&mut tree, "x");
        tree.append_child(p1, t);

        let events: Vec<NodeEdge> = tree.iter_from(p1).collect();
        assert_eq!(
            events,
            vec![NodeEdge::Enter(p1), NodeEdge::Enter(t), NodeEdge::Exit(p1)]
        );
    }

    #[test]
    fn test_empty_container_gets_exit() {
        let mut tree = Tree::new();
        let root = tree.root();
        let para = tree.create(NodeKind::Paragraph, Sourcepos::default());
        tree.append_child(root, para);

        let events: Vec<NodeEdge> = tree.iter_from(para).collect();
        assert_eq!(events, vec![NodeEdge::Enter(para), NodeEdge::Exit(para)]);
    }
}
