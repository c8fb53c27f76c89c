//! The tree shared by the parser, the standardizer and the control-structure builder.
//!
//! Nodes live in a `Tree` arena and refer to each other by `NodeId`. An n-ary construct is a
//! first-child link followed by a chain of next-sibling links, so the rewrites performed by
//! `standardize` are constant-time relinkings.

pub mod standardize;

pub use standardize::{standardize, StandardizeError};

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Identifier,
    Integer,
    String,

    Let,
    Lambda,
    Where,

    Tau,
    Aug,
    Conditional,

    Or,
    And,
    Not,
    Gr,
    Ge,
    Ls,
    Le,
    Eq,
    Ne,

    Plus,
    Minus,
    Neg,
    Mult,
    Div,
    Exp,
    At,

    Gamma,
    True,
    False,
    Nil,
    Dummy,

    Within,
    SimultDef,
    Rec,
    Equal,
    FcnForm,

    Paren,
    Comma,

    YStar,
}

impl NodeKind {
    /// The keyword or symbol used when printing a tree. Literal kinds print as `<KIND:value>`,
    /// see `pretty`.
    pub fn print_name(&self) -> &'static str {
        match self {
            NodeKind::Identifier => "ID",
            NodeKind::Integer => "INT",
            NodeKind::String => "STR",
            NodeKind::Let => "let",
            NodeKind::Lambda => "lambda",
            NodeKind::Where => "where",
            NodeKind::Tau => "tau",
            NodeKind::Aug => "aug",
            NodeKind::Conditional => "->",
            NodeKind::Or => "or",
            NodeKind::And => "&",
            NodeKind::Not => "not",
            NodeKind::Gr => "gr",
            NodeKind::Ge => "ge",
            NodeKind::Ls => "ls",
            NodeKind::Le => "le",
            NodeKind::Eq => "eq",
            NodeKind::Ne => "ne",
            NodeKind::Plus => "+",
            NodeKind::Minus => "-",
            NodeKind::Neg => "neg",
            NodeKind::Mult => "*",
            NodeKind::Div => "/",
            NodeKind::Exp => "**",
            NodeKind::At => "@",
            NodeKind::Gamma => "gamma",
            NodeKind::True => "<true>",
            NodeKind::False => "<false>",
            NodeKind::Nil => "<nil>",
            NodeKind::Dummy => "<dummy>",
            NodeKind::Within => "within",
            NodeKind::SimultDef => "and",
            NodeKind::Rec => "rec",
            NodeKind::Equal => "=",
            NodeKind::FcnForm => "function_form",
            NodeKind::Paren => "<()>",
            NodeKind::Comma => ",",
            NodeKind::YStar => "<Y*>",
        }
    }

    /// Identifiers, integers and strings carry their source text.
    #[inline]
    pub fn is_literal(&self) -> bool {
        match self {
            NodeKind::Identifier | NodeKind::Integer | NodeKind::String => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub text: Option<String>,
    pub line: u32,
    pub child: Option<NodeId>,
    pub sibling: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    standardized: bool,
}

pub struct Children<'tree> {
    tree: &'tree Tree,
    next: Option<NodeId>,
}

impl<'tree> Iterator for Children<'tree> {
    type Item = NodeId;
    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.sibling(current);
        Option::Some(current)
    }
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            nodes: Vec::new(),
            root: Option::None,
            standardized: false,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn alloc(&mut self, kind: NodeKind, text: Option<String>, line: u32) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            text,
            line,
            child: Option::None,
            sibling: Option::None,
        });
        id
    }

    pub fn mk_leaf(&mut self, kind: NodeKind, text: &str, line: u32) -> NodeId {
        self.alloc(kind, Option::Some(String::from(text)), line)
    }

    pub fn mk_ident(&mut self, name: &str, line: u32) -> NodeId {
        self.mk_leaf(NodeKind::Identifier, name, line)
    }

    /// Allocates `kind` over `children`, relinking them into a sibling chain. The node takes the
    /// line of its first child.
    pub fn mk_node(&mut self, kind: NodeKind, children: &[NodeId]) -> NodeId {
        let line = children.first().map(|c| self.line(*c)).unwrap_or(0);
        let node = self.alloc(kind, Option::None, line);
        self.set_children(node, children);
        node
    }

    pub fn set_children(&mut self, node: NodeId, children: &[NodeId]) {
        self.set_child(node, children.first().copied());
        for pair in children.windows(2) {
            self.set_sibling(pair[0], Option::Some(pair[1]));
        }
        if let Option::Some(last) = children.last() {
            self.set_sibling(*last, Option::None);
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.to_usize()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.to_usize()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.get(id).kind
    }

    #[inline]
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.get_mut(id).kind = kind;
    }

    /// The node's payload, or the empty string for structural kinds.
    #[inline]
    pub fn text(&self, id: NodeId) -> &str {
        self.get(id).text.as_deref().unwrap_or("")
    }

    #[inline]
    pub fn line(&self, id: NodeId) -> u32 {
        self.get(id).line
    }

    #[inline]
    pub fn child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).child
    }

    #[inline]
    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).sibling
    }

    #[inline]
    pub fn set_child(&mut self, id: NodeId, child: Option<NodeId>) {
        self.get_mut(id).child = child;
    }

    #[inline]
    pub fn set_sibling(&mut self, id: NodeId, sibling: Option<NodeId>) {
        self.get_mut(id).sibling = sibling;
    }

    pub fn children(&self, id: NodeId) -> Children {
        Children {
            tree: self,
            next: self.child(id),
        }
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn set_root(&mut self, root: NodeId) {
        self.root = Option::Some(root);
    }

    #[inline]
    pub fn is_standardized(&self) -> bool {
        self.standardized
    }

    /// A one-line rendering of the subtree at `id`, e.g. `gamma(lambda(<ID:x>, <ID:x>), <INT:1>)`.
    pub fn sexp(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.__sexp(id, &mut out);
        out
    }

    fn __sexp(&self, id: NodeId, out: &mut String) {
        let kind = self.kind(id);
        match kind {
            NodeKind::String => {
                let _ = write!(out, "<STR:'{}'>", self.text(id));
            }
            _ if kind.is_literal() => {
                let _ = write!(out, "<{}:{}>", kind.print_name(), self.text(id));
            }
            _ => out.push_str(kind.print_name()),
        }
        let mut children = self.children(id).peekable();
        if children.peek().is_some() {
            out.push('(');
            let mut first = true;
            for child in children {
                if !first {
                    out.push_str(", ");
                }
                first = false;
                self.__sexp(child, out);
            }
            out.push(')');
        }
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_mk_node_links_children() {
    let mut tree = Tree::new();
    let x = tree.mk_ident("x", 3);
    let one = tree.mk_leaf(NodeKind::Integer, "1", 4);
    let plus = tree.mk_node(NodeKind::Plus, &[x, one]);
    assert_eq!(tree.line(plus), 3);
    assert_eq!(tree.children(plus).collect::<Vec<_>>(), vec![x, one]);
    assert_eq!(tree.sibling(one), Option::None);
    assert_eq!(tree.sexp(plus), "+(<ID:x>, <INT:1>)");
}

#[test]
fn test_set_children_detaches_last() {
    let mut tree = Tree::new();
    let a = tree.mk_ident("a", 1);
    let b = tree.mk_ident("b", 1);
    let c = tree.mk_ident("c", 1);
    let tau = tree.mk_node(NodeKind::Tau, &[a, b, c]);
    let comma = tree.alloc(NodeKind::Comma, Option::None, 1);
    tree.set_children(comma, &[a, b]);
    assert_eq!(tree.child_count(comma), 2);
    assert_eq!(tree.child_count(tau), 2);
    assert_eq!(tree.sexp(comma), ",(<ID:a>, <ID:b>)");
}

#[test]
fn test_sexp_string_literal() {
    let mut tree = Tree::new();
    let s = tree.mk_leaf(NodeKind::String, "hi", 1);
    let print = tree.mk_ident("Print", 1);
    let gamma = tree.mk_node(NodeKind::Gamma, &[print, s]);
    assert_eq!(tree.sexp(gamma), "gamma(<ID:Print>, <STR:'hi'>)");
}
