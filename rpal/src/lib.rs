//! Runs RPAL programs: scan, parse, standardize, flatten into control structures, evaluate.

use ast::{StandardizeError, Tree};
use compiler::{BuildError, ControlStructures};
use eval::EvalError;
use lexer::Lexer;
use span::{Offset, SourceFile};
use std::io::Write;

pub use eval::DEFAULT_HEAP_CAPACITY;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A lexical or syntax error, ready to be reported against its source file
    #[error(transparent)]
    Syntax(#[from] errors::Error),
    #[error(transparent)]
    Standardize(#[from] StandardizeError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Scan and parse a whole source file into its raw tree.
pub fn parse_source(src_file: &SourceFile) -> Result<Tree, Error> {
    let tokens = Lexer::from_source_file(src_file)
        .tokenize()
        .map_err(|err| err.reportable())?;
    let tree = parser::parse(&tokens).map_err(|err| err.reportable())?;
    Result::Ok(tree)
}

/// Standardize `tree` in place and build its control structures.
pub fn compile(tree: &mut Tree) -> Result<ControlStructures, Error> {
    ast::standardize(tree)?;
    let structures = compiler::build_root_closure(tree)?;
    Result::Ok(structures)
}

/// Evaluate a compiled program with an environment heap of `heap_capacity` bytes. `Print` output
/// goes to `out`; the rendering of the final value is returned.
pub fn evaluate<W: Write>(
    tree: &Tree,
    structures: &ControlStructures,
    heap_capacity: usize,
    out: W,
) -> Result<Option<String>, Error> {
    let value = eval::evaluate(tree, structures, heap_capacity, out)?;
    Result::Ok(value)
}

/// Run the program `content` from start to finish.
#[tracing::instrument(level = "debug", skip(content, out))]
pub fn run_source<W: Write>(name: &str, content: &str, out: W) -> Result<Option<String>, Error> {
    let src_file = SourceFile {
        name: String::from(name),
        start: Offset(0),
        content: String::from(content),
    };
    let mut tree = parse_source(&src_file)?;
    let structures = compile(&mut tree)?;
    evaluate(&tree, &structures, DEFAULT_HEAP_CAPACITY, out)
}
