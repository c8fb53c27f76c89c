//! Flattens a standardized tree into the control structures run by the CSE machine.

use ast::{NodeId, NodeKind, Tree};
use std::collections::VecDeque;

#[cfg(test)]
use lexer::Lexer;
#[cfg(test)]
use span::Offset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeltaId(u32);

impl DeltaId {
    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BetaId(u32);

impl BetaId {
    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlItem {
    Node(NodeId),
    Delta(DeltaId),
    Beta(BetaId),
}

/// A lambda's compiled body. `index` is its position in creation order and doubles as its
/// printed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub index: usize,
    pub bound_vars: Vec<String>,
    pub line: u32,
    pub body: Vec<ControlItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Beta {
    pub line: u32,
    pub then_branch: Vec<ControlItem>,
    pub else_branch: Vec<ControlItem>,
}

/// Every delta and beta of one program. Delta 0 is the root closure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlStructures {
    deltas: Vec<Delta>,
    betas: Vec<Beta>,
}

impl ControlStructures {
    #[inline]
    pub fn root(&self) -> &Delta {
        &self.deltas[0]
    }

    #[inline]
    pub fn delta(&self, id: DeltaId) -> &Delta {
        &self.deltas[id.to_usize()]
    }

    #[inline]
    pub fn beta(&self, id: BetaId) -> &Beta {
        &self.betas[id.to_usize()]
    }

    pub fn deltas(&self) -> &[Delta] {
        &self.deltas
    }

    pub fn betas(&self) -> &[Beta] {
        &self.betas
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("tree has not been standardized")]
    NotStandardized,
    #[error("tree is empty")]
    EmptyTree,
    #[error("line {line}: '{construct}' should have been removed by standardization")]
    UnexpectedConstruct { construct: &'static str, line: u32 },
    #[error("line {line}: '{construct}' is missing its {part}")]
    Malformed {
        construct: &'static str,
        part: &'static str,
        line: u32,
    },
    #[error("line {line}: a lambda can't bind '{found}'")]
    BadParameter { found: &'static str, line: u32 },
}

pub type BuildResult<T> = Result<T, BuildError>;

struct Builder<'tree> {
    tree: &'tree Tree,
    deltas: Vec<Delta>,
    betas: Vec<Beta>,
    /// Bodies still to be flattened, in the order their lambdas were met
    pending: VecDeque<(NodeId, DeltaId)>,
    next_index: usize,
}

impl<'tree> Builder<'tree> {
    fn new(tree: &'tree Tree) -> Self {
        Builder {
            tree,
            deltas: Vec::new(),
            betas: Vec::new(),
            pending: VecDeque::new(),
            next_index: 0,
        }
    }

    fn malformed<T>(&self, node: NodeId, part: &'static str) -> BuildResult<T> {
        Result::Err(BuildError::Malformed {
            construct: self.tree.kind(node).print_name(),
            part,
            line: self.tree.line(node),
        })
    }

    fn new_delta(&mut self, body: NodeId, bound_vars: Vec<String>) -> DeltaId {
        let index = self.next_index;
        self.next_index += 1;
        let id = DeltaId(self.deltas.len() as u32);
        tracing::debug!(index, ?bound_vars, "allocated delta");
        self.deltas.push(Delta {
            index,
            bound_vars,
            line: self.tree.line(body),
            body: Vec::new(),
        });
        self.pending.push_back((body, id));
        id
    }

    /// The names a lambda binds: one identifier, each identifier of a comma list, or none for
    /// `()`.
    fn bound_vars(&self, param: NodeId) -> BuildResult<Vec<String>> {
        match self.tree.kind(param) {
            NodeKind::Identifier => Result::Ok(vec![String::from(self.tree.text(param))]),
            NodeKind::Paren => Result::Ok(Vec::new()),
            NodeKind::Comma => self
                .tree
                .children(param)
                .map(|name| match self.tree.kind(name) {
                    NodeKind::Identifier => Result::Ok(String::from(self.tree.text(name))),
                    kind => Result::Err(BuildError::BadParameter {
                        found: kind.print_name(),
                        line: self.tree.line(name),
                    }),
                })
                .collect(),
            kind => Result::Err(BuildError::BadParameter {
                found: kind.print_name(),
                line: self.tree.line(param),
            }),
        }
    }

    fn build_body(&mut self, node: NodeId, body: &mut Vec<ControlItem>) -> BuildResult<()> {
        match self.tree.kind(node) {
            NodeKind::Lambda => {
                let param = match self.tree.child(node) {
                    Option::Some(param) => param,
                    Option::None => return self.malformed(node, "parameter"),
                };
                let lambda_body = match self.tree.sibling(param) {
                    Option::Some(lambda_body) => lambda_body,
                    Option::None => return self.malformed(node, "body"),
                };
                let bound_vars = self.bound_vars(param)?;
                let delta = self.new_delta(lambda_body, bound_vars);
                body.push(ControlItem::Delta(delta));
                Result::Ok(())
            }
            NodeKind::Conditional => {
                let mut children = self.tree.children(node);
                let (condition, then_node, else_node) =
                    match (children.next(), children.next(), children.next()) {
                        (Option::Some(c), Option::Some(t), Option::Some(e)) => (c, t, e),
                        _ => return self.malformed(node, "condition or branches"),
                    };

                let mut beta = Beta {
                    line: self.tree.line(node),
                    ..Beta::default()
                };
                self.build_body(then_node, &mut beta.then_branch)?;
                self.build_body(else_node, &mut beta.else_branch)?;
                let id = BetaId(self.betas.len() as u32);
                self.betas.push(beta);

                body.push(ControlItem::Beta(id));
                self.build_body(condition, body)
            }
            kind @ NodeKind::Let
            | kind @ NodeKind::Where
            | kind @ NodeKind::Within
            | kind @ NodeKind::SimultDef
            | kind @ NodeKind::Rec
            | kind @ NodeKind::FcnForm
            | kind @ NodeKind::At
            | kind @ NodeKind::Equal
            | kind @ NodeKind::Comma
            | kind @ NodeKind::Paren => Result::Err(BuildError::UnexpectedConstruct {
                construct: kind.print_name(),
                line: self.tree.line(node),
            }),
            _ => {
                body.push(ControlItem::Node(node));
                let mut child = self.tree.child(node);
                while let Option::Some(current) = child {
                    self.build_body(current, body)?;
                    child = self.tree.sibling(current);
                }
                Result::Ok(())
            }
        }
    }

    fn run(mut self, root: NodeId) -> BuildResult<ControlStructures> {
        let _ = self.new_delta(root, Vec::new());
        while let Option::Some((start, delta)) = self.pending.pop_front() {
            let mut body = Vec::new();
            self.build_body(start, &mut body)?;
            self.deltas[delta.to_usize()].body = body;
        }
        Result::Ok(ControlStructures {
            deltas: self.deltas,
            betas: self.betas,
        })
    }
}

/// Flatten a standardized tree into control structures. The root closure is delta 0; the other
/// deltas are numbered in the order their lambdas are reached, breadth first.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build_root_closure(tree: &Tree) -> BuildResult<ControlStructures> {
    if !tree.is_standardized() {
        return Result::Err(BuildError::NotStandardized);
    }
    let root = match tree.root() {
        Option::Some(root) => root,
        Option::None => return Result::Err(BuildError::EmptyTree),
    };
    let structures = Builder::new(tree).run(root)?;
    tracing::debug!(
        deltas = structures.deltas.len(),
        betas = structures.betas.len(),
        "built control structures"
    );
    Result::Ok(structures)
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn standardized_tree(input: &str) -> Tree {
    let tokens = Lexer::from_str(input, Offset(0)).tokenize().unwrap();
    let mut tree = parser::parse(&tokens).unwrap();
    ast::standardize(&mut tree).unwrap();
    tree
}

#[cfg(test)]
fn describe(tree: &Tree, structures: &ControlStructures, items: &[ControlItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            ControlItem::Node(node) => match tree.kind(*node) {
                kind if kind.is_literal() => String::from(tree.text(*node)),
                kind => String::from(kind.print_name()),
            },
            ControlItem::Delta(delta) => format!("delta{}", structures.delta(*delta).index),
            ControlItem::Beta(beta) => format!("beta{}", beta.to_usize()),
        })
        .collect()
}

#[test]
fn test_build_application() {
    let tree = standardized_tree("let x = 1 in x + 2");
    let structures = build_root_closure(&tree).unwrap();
    assert_eq!(structures.deltas().len(), 2);
    assert_eq!(
        describe(&tree, &structures, &structures.root().body),
        vec!["gamma", "delta1", "1"]
    );
    let delta1 = structures.delta(DeltaId(1));
    assert_eq!(delta1.bound_vars, vec![String::from("x")]);
    assert_eq!(describe(&tree, &structures, &delta1.body), vec!["+", "x", "2"]);
}

#[test]
fn test_build_conditional() {
    let tree = standardized_tree("1 eq 2 -> 'a' | 'b'");
    let structures = build_root_closure(&tree).unwrap();
    assert_eq!(
        describe(&tree, &structures, &structures.root().body),
        vec!["beta0", "eq", "1", "2"]
    );
    let beta = structures.beta(BetaId(0));
    assert_eq!(describe(&tree, &structures, &beta.then_branch), vec!["a"]);
    assert_eq!(describe(&tree, &structures, &beta.else_branch), vec!["b"]);
}

#[test]
fn test_build_nested_conditional_in_branch() {
    let tree = standardized_tree("true -> (false -> 1 | 2) | 3");
    let structures = build_root_closure(&tree).unwrap();
    assert_eq!(structures.betas().len(), 2);
    assert_eq!(
        describe(&tree, &structures, &structures.root().body),
        vec!["beta1", "<true>"]
    );
    let outer = structures.beta(BetaId(1));
    assert_eq!(
        describe(&tree, &structures, &outer.then_branch),
        vec!["beta0", "<false>"]
    );
}

#[test]
fn test_build_indices_follow_creation_order() {
    let tree = standardized_tree("(fn a. fn b. a) (fn c. c)");
    let structures = build_root_closure(&tree).unwrap();
    let names: Vec<_> = structures
        .deltas()
        .iter()
        .map(|delta| (delta.index, delta.bound_vars.clone()))
        .collect();
    assert_eq!(
        names,
        vec![
            (0, vec![]),
            (1, vec![String::from("a")]),
            (2, vec![String::from("c")]),
            (3, vec![String::from("b")]),
        ]
    );
}

#[test]
fn test_build_tuple_parameters() {
    let tree = standardized_tree("let f (x, y) () = x in f");
    let structures = build_root_closure(&tree).unwrap();
    let bound: Vec<_> = structures
        .deltas()
        .iter()
        .map(|delta| delta.bound_vars.len())
        .collect();
    assert_eq!(bound, vec![0, 1, 2, 0]);
}

#[test]
fn test_build_requires_standardized_tree() {
    let tokens = Lexer::from_str("let x = 1 in x", Offset(0))
        .tokenize()
        .unwrap();
    let tree = parser::parse(&tokens).unwrap();
    assert_eq!(build_root_closure(&tree), Result::Err(BuildError::NotStandardized));
}

#[test]
fn test_build_rejects_bad_parameter() {
    let mut tree = Tree::new();
    let param = tree.mk_leaf(NodeKind::Integer, "1", 4);
    let body = tree.mk_ident("x", 4);
    let lambda = tree.mk_node(NodeKind::Lambda, &[param, body]);
    tree.set_root(lambda);
    ast::standardize(&mut tree).unwrap();
    assert_eq!(
        build_root_closure(&tree),
        Result::Err(BuildError::BadParameter {
            found: "INT",
            line: 4
        })
    );
}
