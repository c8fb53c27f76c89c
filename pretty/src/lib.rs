use ast::{NodeId, NodeKind, Tree};
use compiler::{ControlItem, ControlStructures};

#[cfg(test)]
use lexer::Lexer;
#[cfg(test)]
use span::Offset;

/// `<ID:x>`, `<INT:5>`, `<STR:'s'>` for literals, the keyword or symbol otherwise.
pub fn pretty_node(tree: &Tree, node: NodeId) -> String {
    match tree.kind(node) {
        NodeKind::String => format!("<STR:'{}'>", tree.text(node)),
        kind if kind.is_literal() => format!("<{}:{}>", kind.print_name(), tree.text(node)),
        kind => String::from(kind.print_name()),
    }
}

fn pretty_subtree(tree: &Tree, node: NodeId, depth: usize, string: &mut String) {
    for _ in 0..depth {
        string.push('.');
    }
    string.push_str(&pretty_node(tree, node));
    string.push('\n');
    for child in tree.children(node) {
        pretty_subtree(tree, child, depth + 1, string);
    }
}

/// One line per node in pre-order, each prefixed by a dot per level of depth.
pub fn pretty_tree(tree: &Tree) -> String {
    let mut string = String::new();
    if let Option::Some(root) = tree.root() {
        pretty_subtree(tree, root, 0, &mut string);
    }
    string
}

fn pretty_items(
    tree: &Tree,
    structures: &ControlStructures,
    items: &[ControlItem],
    string: &mut String,
) {
    let mut first = true;
    for item in items {
        if !first {
            string.push(' ');
        }
        first = false;
        match item {
            ControlItem::Node(node) => string.push_str(&pretty_node(tree, *node)),
            ControlItem::Delta(delta) => {
                string.push_str(&format!("delta{}", structures.delta(*delta).index))
            }
            ControlItem::Beta(beta) => {
                let beta = structures.beta(*beta);
                string.push_str("beta(");
                pretty_items(tree, structures, &beta.then_branch, string);
                string.push_str(" | ");
                pretty_items(tree, structures, &beta.else_branch, string);
                string.push(')');
            }
        }
    }
}

/// One line per delta: its name, its bound variables and its control sequence. Betas are
/// printed inline with both branches.
pub fn pretty_control(tree: &Tree, structures: &ControlStructures) -> String {
    let mut string = String::new();
    for delta in structures.deltas() {
        string.push_str(&format!("delta{}", delta.index));
        if !delta.bound_vars.is_empty() {
            string.push_str(&format!(" [{}]", delta.bound_vars.join(", ")));
        }
        string.push_str(": ");
        pretty_items(tree, structures, &delta.body, &mut string);
        string.push('\n');
    }
    string
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn parse_tree(input: &str) -> Tree {
    let tokens = Lexer::from_str(input, Offset(0)).tokenize().unwrap();
    parser::parse(&tokens).unwrap()
}

#[test]
fn test_pretty_tree_raw() {
    let tree = parse_tree("let x = 'hi' in Print x");
    assert_eq!(
        pretty_tree(&tree),
        "let\n\
         .=\n\
         ..<ID:x>\n\
         ..<STR:'hi'>\n\
         .gamma\n\
         ..<ID:Print>\n\
         ..<ID:x>\n"
    )
}

#[test]
fn test_pretty_tree_standardized() {
    let mut tree = parse_tree("let rec f n = f n in f 1");
    ast::standardize(&mut tree).unwrap();
    assert_eq!(
        pretty_tree(&tree),
        "gamma\n\
         .lambda\n\
         ..<ID:f>\n\
         ..gamma\n\
         ...<ID:f>\n\
         ...<INT:1>\n\
         .gamma\n\
         ..<Y*>\n\
         ..lambda\n\
         ...<ID:f>\n\
         ...lambda\n\
         ....<ID:n>\n\
         ....gamma\n\
         .....<ID:f>\n\
         .....<ID:n>\n"
    )
}

#[test]
fn test_pretty_tree_empty() {
    assert_eq!(pretty_tree(&Tree::new()), "");
}

#[test]
fn test_pretty_control() {
    let mut tree = parse_tree("let f x = x eq 0 -> 'zero' | nil in f 1");
    ast::standardize(&mut tree).unwrap();
    let structures = compiler::build_root_closure(&tree).unwrap();
    assert_eq!(
        pretty_control(&tree, &structures),
        "delta0: gamma delta1 delta2\n\
         delta1 [f]: gamma <ID:f> <INT:1>\n\
         delta2 [x]: beta(<STR:'zero'> | <nil>) eq <ID:x> <INT:0>\n"
    )
}
