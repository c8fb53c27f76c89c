use crate::{NodeId, NodeKind, Tree};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StandardizeError {
    #[error("tree is already standardized")]
    AlreadyStandardized,
    #[error("cannot standardize an empty tree")]
    EmptyTree,
    #[error("line {line}: malformed '{construct}': {reason}")]
    Malformed {
        construct: &'static str,
        line: u32,
        reason: &'static str,
    },
}

type StandardizeResult<T> = Result<T, StandardizeError>;

fn malformed<T>(
    tree: &Tree,
    node: NodeId,
    reason: &'static str,
) -> StandardizeResult<T> {
    Result::Err(StandardizeError::Malformed {
        construct: tree.kind(node).print_name(),
        line: tree.line(node),
        reason,
    })
}

fn require(
    tree: &Tree,
    node: NodeId,
    link: Option<NodeId>,
    reason: &'static str,
) -> StandardizeResult<NodeId> {
    match link {
        Option::Some(id) => Result::Ok(id),
        Option::None => malformed(tree, node, reason),
    }
}

/// Split an `=` node into its bound-name and value children.
fn split_equal(
    tree: &Tree,
    owner: NodeId,
    equal: NodeId,
    reason: &'static str,
) -> StandardizeResult<(NodeId, NodeId)> {
    if tree.kind(equal) != NodeKind::Equal {
        return malformed(tree, owner, reason);
    }
    let x = require(tree, owner, tree.child(equal), reason)?;
    let e = require(tree, owner, tree.sibling(x), reason)?;
    Result::Ok((x, e))
}

/// `V1 V2 .. Vn E` becomes `lambda(V1, lambda(V2, .. lambda(Vn, E)))`. The first parameter is
/// the caller's; the returned node replaces everything after it.
fn lambda_chain(tree: &mut Tree, node: NodeId) -> NodeId {
    match tree.sibling(node) {
        Option::None => node,
        Option::Some(next) => {
            let lambda = tree.alloc(NodeKind::Lambda, Option::None, tree.line(node));
            tree.set_child(lambda, Option::Some(node));
            let rest = lambda_chain(tree, next);
            tree.set_sibling(node, Option::Some(rest));
            lambda
        }
    }
}

/// `let (X = E1) E2` => `gamma (lambda X E2) E1`
fn standardize_let(tree: &mut Tree, node: NodeId) -> StandardizeResult<()> {
    let equal = require(tree, node, tree.child(node), "expected a definition")?;
    let (x, e1) = split_equal(tree, node, equal, "expected an '=' definition")?;
    let e2 = require(tree, node, tree.sibling(equal), "expected a body")?;
    tree.set_sibling(x, Option::Some(e2));
    tree.set_sibling(equal, Option::Some(e1));
    tree.set_kind(equal, NodeKind::Lambda);
    tree.set_kind(node, NodeKind::Gamma);
    Result::Ok(())
}

/// `where E2 (X = E1)` => `let (X = E1) E2`
fn standardize_where(tree: &mut Tree, node: NodeId) -> StandardizeResult<()> {
    let e2 = require(tree, node, tree.child(node), "expected a body")?;
    let equal = require(tree, node, tree.sibling(e2), "expected a definition")?;
    tree.set_sibling(e2, Option::None);
    tree.set_sibling(equal, Option::Some(e2));
    tree.set_child(node, Option::Some(equal));
    tree.set_kind(node, NodeKind::Let);
    standardize_let(tree, node)
}

/// `function_form P V1 .. Vn E` => `= P (lambda V1 .. (lambda Vn E))`
fn standardize_fcn_form(tree: &mut Tree, node: NodeId) -> StandardizeResult<()> {
    let p = require(tree, node, tree.child(node), "expected a function name")?;
    let v1 = require(tree, node, tree.sibling(p), "expected a parameter")?;
    let _ = require(tree, node, tree.sibling(v1), "expected a body")?;
    let chain = lambda_chain(tree, v1);
    tree.set_sibling(p, Option::Some(chain));
    tree.set_kind(node, NodeKind::Equal);
    Result::Ok(())
}

/// `lambda V1 .. Vn E` => `lambda V1 (lambda V2 .. (lambda Vn E))`
fn standardize_lambda(tree: &mut Tree, node: NodeId) -> StandardizeResult<()> {
    let v1 = require(tree, node, tree.child(node), "expected a parameter")?;
    let rest = require(tree, node, tree.sibling(v1), "expected a body")?;
    let chain = lambda_chain(tree, rest);
    tree.set_sibling(v1, Option::Some(chain));
    Result::Ok(())
}

/// `@ E1 N E2` => `gamma (gamma N E1) E2`
fn standardize_at(tree: &mut Tree, node: NodeId) -> StandardizeResult<()> {
    let e1 = require(tree, node, tree.child(node), "expected a left operand")?;
    let n = require(tree, node, tree.sibling(e1), "expected an operator name")?;
    let e2 = require(tree, node, tree.sibling(n), "expected a right operand")?;
    let inner = tree.alloc(NodeKind::Gamma, Option::None, tree.line(node));
    tree.set_children(inner, &[n, e1]);
    tree.set_sibling(inner, Option::Some(e2));
    tree.set_child(node, Option::Some(inner));
    tree.set_kind(node, NodeKind::Gamma);
    Result::Ok(())
}

/// `within (X1 = E1) (X2 = E2)` => `= X2 (gamma (lambda X1 E2) E1)`
fn standardize_within(tree: &mut Tree, node: NodeId) -> StandardizeResult<()> {
    let reason = "both operands must be '=' definitions";
    let first = require(tree, node, tree.child(node), reason)?;
    let second = require(tree, node, tree.sibling(first), reason)?;
    let (x1, e1) = split_equal(tree, node, first, reason)?;
    let (x2, e2) = split_equal(tree, node, second, reason)?;

    let line = tree.line(node);
    let lambda = tree.alloc(NodeKind::Lambda, Option::None, line);
    tree.set_children(lambda, &[x1, e2]);
    let gamma = tree.alloc(NodeKind::Gamma, Option::None, line);
    tree.set_children(gamma, &[lambda, e1]);
    tree.set_children(node, &[x2, gamma]);
    tree.set_kind(node, NodeKind::Equal);
    Result::Ok(())
}

/// `and (X1 = E1) .. (Xn = En)` => `= (, X1 .. Xn) (tau E1 .. En)`
fn standardize_simultdef(tree: &mut Tree, node: NodeId) -> StandardizeResult<()> {
    let definitions: Vec<NodeId> = tree.children(node).collect();
    if definitions.is_empty() {
        return malformed(tree, node, "expected at least one definition");
    }
    let mut names = Vec::with_capacity(definitions.len());
    let mut values = Vec::with_capacity(definitions.len());
    for equal in definitions {
        let (x, e) = split_equal(tree, node, equal, "every operand must be an '=' definition")?;
        names.push(x);
        values.push(e);
    }

    let line = tree.line(node);
    let comma = tree.alloc(NodeKind::Comma, Option::None, line);
    tree.set_children(comma, &names);
    let tau = tree.alloc(NodeKind::Tau, Option::None, line);
    tree.set_children(tau, &values);
    tree.set_children(node, &[comma, tau]);
    tree.set_kind(node, NodeKind::Equal);
    Result::Ok(())
}

/// `rec (X = E)` => `= X (gamma Y* (lambda X E))`
fn standardize_rec(tree: &mut Tree, node: NodeId) -> StandardizeResult<()> {
    let equal = require(tree, node, tree.child(node), "expected a definition")?;
    let (x, _) = split_equal(tree, node, equal, "expected an '=' definition")?;

    let line = tree.line(node);
    // `x` keeps its sibling (E) under the new lambda; the binding side needs its own node
    let lambda = tree.alloc(NodeKind::Lambda, Option::None, line);
    tree.set_child(lambda, Option::Some(x));
    let ystar = tree.alloc(NodeKind::YStar, Option::None, line);
    let gamma = tree.alloc(NodeKind::Gamma, Option::None, line);
    tree.set_children(gamma, &[ystar, lambda]);

    let x_node = tree.get(x).clone();
    let x_copy = tree.alloc(x_node.kind, x_node.text, x_node.line);
    tree.set_child(x_copy, x_node.child);
    tree.set_children(node, &[x_copy, gamma]);
    tree.set_kind(node, NodeKind::Equal);
    Result::Ok(())
}

fn standardize_node(tree: &mut Tree, node: NodeId) -> StandardizeResult<()> {
    let mut child = tree.child(node);
    while let Option::Some(current) = child {
        standardize_node(tree, current)?;
        child = tree.sibling(current);
    }

    let kind = tree.kind(node);
    let result = match kind {
        NodeKind::Let => standardize_let(tree, node),
        NodeKind::Where => standardize_where(tree, node),
        NodeKind::FcnForm => standardize_fcn_form(tree, node),
        NodeKind::Lambda => standardize_lambda(tree, node),
        NodeKind::At => standardize_at(tree, node),
        NodeKind::Within => standardize_within(tree, node),
        NodeKind::SimultDef => standardize_simultdef(tree, node),
        NodeKind::Rec => standardize_rec(tree, node),
        _ => return Result::Ok(()),
    };
    if result.is_ok() {
        tracing::trace!(
            rule = kind.print_name(),
            line = tree.line(node),
            "rewrote {}",
            tree.sexp(node)
        );
    }
    result
}

/// Rewrite `tree` in place into the canonical lambda/gamma form understood by the
/// control-structure builder.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
pub fn standardize(tree: &mut Tree) -> Result<(), StandardizeError> {
    if tree.is_standardized() {
        return Result::Err(StandardizeError::AlreadyStandardized);
    }
    let root = match tree.root() {
        Option::None => return Result::Err(StandardizeError::EmptyTree),
        Option::Some(root) => root,
    };
    standardize_node(tree, root)?;
    tree.standardized = true;
    Result::Ok(())
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn standardized(mut tree: Tree, root: NodeId) -> String {
    tree.set_root(root);
    standardize(&mut tree).unwrap();
    tree.sexp(root)
}

#[test]
fn test_standardize_let() {
    // let x = 1 in x
    let mut tree = Tree::new();
    let x = tree.mk_ident("x", 1);
    let one = tree.mk_leaf(NodeKind::Integer, "1", 1);
    let equal = tree.mk_node(NodeKind::Equal, &[x, one]);
    let body = tree.mk_ident("x", 1);
    let root = tree.mk_node(NodeKind::Let, &[equal, body]);
    assert_eq!(
        standardized(tree, root),
        "gamma(lambda(<ID:x>, <ID:x>), <INT:1>)"
    );
}

#[test]
fn test_standardize_where() {
    // x where x = 1
    let mut tree = Tree::new();
    let body = tree.mk_ident("x", 1);
    let x = tree.mk_ident("x", 1);
    let one = tree.mk_leaf(NodeKind::Integer, "1", 1);
    let equal = tree.mk_node(NodeKind::Equal, &[x, one]);
    let root = tree.mk_node(NodeKind::Where, &[body, equal]);
    assert_eq!(
        standardized(tree, root),
        "gamma(lambda(<ID:x>, <ID:x>), <INT:1>)"
    );
}

#[test]
fn test_standardize_fcn_form() {
    // let f x y = x in f
    let mut tree = Tree::new();
    let f = tree.mk_ident("f", 1);
    let x = tree.mk_ident("x", 1);
    let y = tree.mk_ident("y", 1);
    let e = tree.mk_ident("x", 1);
    let fcn = tree.mk_node(NodeKind::FcnForm, &[f, x, y, e]);
    let body = tree.mk_ident("f", 1);
    let root = tree.mk_node(NodeKind::Let, &[fcn, body]);
    assert_eq!(
        standardized(tree, root),
        "gamma(lambda(<ID:f>, <ID:f>), lambda(<ID:x>, lambda(<ID:y>, <ID:x>)))"
    );
}

#[test]
fn test_standardize_multi_param_lambda() {
    // fn x y z . x
    let mut tree = Tree::new();
    let x = tree.mk_ident("x", 1);
    let y = tree.mk_ident("y", 1);
    let z = tree.mk_ident("z", 1);
    let e = tree.mk_ident("x", 1);
    let root = tree.mk_node(NodeKind::Lambda, &[x, y, z, e]);
    assert_eq!(
        standardized(tree, root),
        "lambda(<ID:x>, lambda(<ID:y>, lambda(<ID:z>, <ID:x>)))"
    );
}

#[test]
fn test_standardize_at() {
    // 1 @add 2
    let mut tree = Tree::new();
    let one = tree.mk_leaf(NodeKind::Integer, "1", 1);
    let add = tree.mk_ident("add", 1);
    let two = tree.mk_leaf(NodeKind::Integer, "2", 1);
    let root = tree.mk_node(NodeKind::At, &[one, add, two]);
    assert_eq!(
        standardized(tree, root),
        "gamma(gamma(<ID:add>, <INT:1>), <INT:2>)"
    );
}

#[test]
fn test_standardize_within() {
    // let a = 1 within b = a in b
    let mut tree = Tree::new();
    let a = tree.mk_ident("a", 1);
    let one = tree.mk_leaf(NodeKind::Integer, "1", 1);
    let first = tree.mk_node(NodeKind::Equal, &[a, one]);
    let b = tree.mk_ident("b", 1);
    let a_ref = tree.mk_ident("a", 1);
    let second = tree.mk_node(NodeKind::Equal, &[b, a_ref]);
    let within = tree.mk_node(NodeKind::Within, &[first, second]);
    let body = tree.mk_ident("b", 1);
    let root = tree.mk_node(NodeKind::Let, &[within, body]);
    assert_eq!(
        standardized(tree, root),
        "gamma(lambda(<ID:b>, <ID:b>), gamma(lambda(<ID:a>, <ID:a>), <INT:1>))"
    );
}

#[test]
fn test_standardize_simultdef() {
    // let a = 1 and b = 2 in a
    let mut tree = Tree::new();
    let a = tree.mk_ident("a", 1);
    let one = tree.mk_leaf(NodeKind::Integer, "1", 1);
    let first = tree.mk_node(NodeKind::Equal, &[a, one]);
    let b = tree.mk_ident("b", 1);
    let two = tree.mk_leaf(NodeKind::Integer, "2", 1);
    let second = tree.mk_node(NodeKind::Equal, &[b, two]);
    let and = tree.mk_node(NodeKind::SimultDef, &[first, second]);
    let body = tree.mk_ident("a", 1);
    let root = tree.mk_node(NodeKind::Let, &[and, body]);
    assert_eq!(
        standardized(tree, root),
        "gamma(lambda(,(<ID:a>, <ID:b>), <ID:a>), tau(<INT:1>, <INT:2>))"
    );
}

#[test]
fn test_standardize_rec() {
    // let rec f n = f n in f
    let mut tree = Tree::new();
    let f = tree.mk_ident("f", 1);
    let n = tree.mk_ident("n", 1);
    let f_ref = tree.mk_ident("f", 1);
    let n_ref = tree.mk_ident("n", 1);
    let call = tree.mk_node(NodeKind::Gamma, &[f_ref, n_ref]);
    let fcn = tree.mk_node(NodeKind::FcnForm, &[f, n, call]);
    let rec = tree.mk_node(NodeKind::Rec, &[fcn]);
    let body = tree.mk_ident("f", 1);
    let root = tree.mk_node(NodeKind::Let, &[rec, body]);
    assert_eq!(
        standardized(tree, root),
        "gamma(lambda(<ID:f>, <ID:f>), \
         gamma(<Y*>, lambda(<ID:f>, lambda(<ID:n>, gamma(<ID:f>, <ID:n>)))))"
    );
}

#[test]
fn test_standardize_twice_fails() {
    let mut tree = Tree::new();
    let root = tree.mk_ident("x", 1);
    tree.set_root(root);
    assert_eq!(standardize(&mut tree), Result::Ok(()));
    assert_eq!(
        standardize(&mut tree),
        Result::Err(StandardizeError::AlreadyStandardized)
    );
}

#[test]
fn test_standardize_let_without_equal() {
    let mut tree = Tree::new();
    let x = tree.mk_ident("x", 7);
    let body = tree.mk_ident("x", 7);
    let root = tree.mk_node(NodeKind::Let, &[x, body]);
    tree.set_root(root);
    assert_eq!(
        standardize(&mut tree),
        Result::Err(StandardizeError::Malformed {
            construct: "let",
            line: 7,
            reason: "expected an '=' definition"
        })
    );
}
