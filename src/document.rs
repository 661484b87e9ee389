//! The document-tree interface consumed by the engine, the match/capture
//! record types, and a minimal in-memory tree for exercising the engine in
//! tests without a real HTML/XML parser.
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::Config;
use crate::machine::Machine;

/// The tree interface the engine matches against.
///
/// Implementations are expected to be cheap to clone (a `Rc`/`Arc` handle,
/// a `&'a Node` reference wrapper, or similar) since the matcher clones
/// nodes freely while walking sibling lists and descending into children.
/// The engine never calls a mutating method on `Node` — isolating a single
/// sibling for a match attempt is done with [`SiblingIter`] /
/// `std::iter::once`, not by rewriting `next_sibling`.
pub trait Node: Clone {
    /// The node's tag name, or `None` for a text-only node.
    fn name(&self) -> Option<&str>;
    /// The node's text content, or `None` if it has none (e.g. an element
    /// with only child elements).
    fn content(&self) -> Option<&str>;
    /// The node's attributes, in source order, as `(name, value)` pairs;
    /// `value` is `None` for a value-less attribute (e.g. `<input disabled>`).
    fn attributes(&self) -> &[(String, Option<String>)];
    /// The first child of this node, if any.
    fn children(&self) -> Option<Self>;
    /// The next sibling of this node, if any.
    fn next_sibling(&self) -> Option<Self>;
}

/// Walks a sibling list starting at `first` by repeatedly following
/// [`Node::next_sibling`]. Used both for the full-list simulation and, via
/// `std::iter::once`, to isolate a single node for a match attempt.
pub(crate) struct SiblingIter<N: Node> {
    next: Option<N>,
}

impl<N: Node> SiblingIter<N> {
    pub(crate) fn new(first: Option<N>) -> Self {
        SiblingIter { next: first }
    }
}

impl<N: Node> Iterator for SiblingIter<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let cur = self.next.take()?;
        self.next = cur.next_sibling();
        Some(cur)
    }
}

/// A single captured substring: the byte range `[start, end)` into `text`.
#[derive(Debug, Clone)]
pub struct RegexMatch {
    /// The string the capture was taken from (node content or an attribute
    /// value), snapshotted at match time.
    pub text: Rc<str>,
    /// Start byte offset of the capture within `text`.
    pub start: usize,
    /// End byte offset (exclusive) of the capture within `text`.
    pub end: usize,
}

impl RegexMatch {
    /// The captured substring itself.
    pub fn as_str(&self) -> &str {
        &self.text[self.start..self.end]
    }
}

/// A successful tree match: the node the match is rooted at, plus its
/// captures in pattern-textual order (see §4.7 of the design document).
#[derive(Debug, Clone)]
pub struct Match<N> {
    /// The node the pattern matched.
    pub node: N,
    /// Captures in pattern order; unused capture groups are omitted, not
    /// represented as empty captures.
    pub captures: Vec<RegexMatch>,
}

/// Runs `machine` over every node of `document`, returning every match
/// found anywhere in the tree.
///
/// Recursion begins at the document root's first child's next sibling,
/// skipping the DOCTYPE-like first node, matching the observable behavior
/// of the reference implementation this engine's semantics are grounded
/// on.
pub fn document_process<N: Node>(machine: &Machine, document: &N) -> Vec<Match<N>> {
    document_process_with_config(machine, document, &Config::default())
}

/// As [`document_process`], but pre-sizes the result `Vec` using
/// [`Config::expected_match_count_hint`] — useful when the caller has a
/// rough idea of how many matches a document typically produces and wants
/// to avoid the default-sized allocation's reallocation churn.
pub fn document_process_with_config<N: Node>(
    machine: &Machine,
    document: &N,
    config: &Config,
) -> Vec<Match<N>> {
    let entry = document.children().and_then(|first| first.next_sibling());
    let matches = crate::matcher::find_matches(machine, entry, config.expected_match_count_hint);
    log::debug!("document_process produced {} matches", matches.len());
    matches
}

/// A minimal in-memory tree implementing [`Node`], used by the crate's own
/// tests. Not a general-purpose HTML/XML parser.
pub mod tree {
    use super::*;

    struct NodeData {
        name: Option<String>,
        content: Option<String>,
        attributes: Vec<(String, Option<String>)>,
        children: RefCell<Option<TreeNode>>,
        next_sibling: RefCell<Option<TreeNode>>,
    }

    /// A cheaply-cloneable handle into the in-memory tree (an `Rc`).
    #[derive(Clone)]
    pub struct TreeNode(Rc<NodeData>);

    impl Node for TreeNode {
        fn name(&self) -> Option<&str> {
            self.0.name.as_deref()
        }

        fn content(&self) -> Option<&str> {
            self.0.content.as_deref()
        }

        fn attributes(&self) -> &[(String, Option<String>)] {
            &self.0.attributes
        }

        fn children(&self) -> Option<Self> {
            self.0.children.borrow().clone()
        }

        fn next_sibling(&self) -> Option<Self> {
            self.0.next_sibling.borrow().clone()
        }
    }

    fn link_siblings(children: &[TreeNode]) {
        for i in 0..children.len().saturating_sub(1) {
            *children[i].0.next_sibling.borrow_mut() = Some(children[i + 1].clone());
        }
    }

    /// Builds an element node named `name` with `attrs` and `children`.
    pub fn element(name: &str, attrs: &[(&str, Option<&str>)], children: Vec<TreeNode>) -> TreeNode {
        link_siblings(&children);
        let first_child = children.into_iter().next();
        TreeNode(Rc::new(NodeData {
            name: Some(name.to_string()),
            content: None,
            attributes: attrs
                .iter()
                .map(|(n, v)| (n.to_string(), v.map(|s| s.to_string())))
                .collect(),
            children: RefCell::new(first_child),
            next_sibling: RefCell::new(None),
        }))
    }

    /// Builds a text node (no name, only content).
    pub fn text(content: &str) -> TreeNode {
        TreeNode(Rc::new(NodeData {
            name: None,
            content: Some(content.to_string()),
            attributes: Vec::new(),
            children: RefCell::new(None),
            next_sibling: RefCell::new(None),
        }))
    }

    /// Builds a synthetic document root whose first child is a dummy
    /// DOCTYPE-like node, followed by `roots` — matching what
    /// [`super::document_process`] expects to skip.
    pub fn document(roots: Vec<TreeNode>) -> TreeNode {
        let doctype = element("!doctype", &[], Vec::new());
        let mut all = Vec::with_capacity(roots.len() + 1);
        all.push(doctype);
        all.extend(roots);
        element("#document", &[], all)
    }
}
