//! The control-stack/environment machine.
//!
//! Each activation of a closure gets a `Frame` holding its own control stack and environment.
//! Control stacks are consumed from the end; values go on one stack shared by every frame.

pub mod builtin;
pub mod env;
pub mod heap;
pub mod stack;
pub mod value;

use crate::builtin::Builtin;
use crate::env::Env;
use crate::heap::Heap;
use crate::stack::Stack;
use crate::value::{Closure, Value};
use ast::{NodeId, NodeKind, Tree};
use compiler::{ControlItem, ControlStructures};
use std::convert::TryFrom;
use std::io::Write;

#[cfg(test)]
use lexer::Lexer;
#[cfg(test)]
use span::Offset;

/// Initial size of the environment heap, in bytes
pub const DEFAULT_HEAP_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("line {line}: identifier is not declared \"{name}\"")]
    UndeclaredIdentifier { name: String, line: u32 },
    #[error("line {line}: {message}")]
    Type { message: String, line: u32 },
    #[error("line {line}: Cannot evaluate \"{rator}\"")]
    CannotEvaluate { rator: String, line: u32 },
    #[error("line {line}: Tuple index {index} out of bounds")]
    IndexOutOfBounds { index: i64, line: u32 },
    #[error("line {line}: division by zero")]
    DivisionByZero { line: u32 },
    #[error("line {line}: integer overflow")]
    Overflow { line: u32 },
    #[error("line {line}: '{construct}' can't appear in a control structure")]
    UnexpectedItem { construct: &'static str, line: u32 },
    #[error("machine stack underflow")]
    StackUnderflow,
    #[error("evaluation finished with {0} values on the stack")]
    LeftoverValues(usize),
    #[error("failed to write program output: {0}")]
    Output(String),
}

impl EvalError {
    pub fn line(&self) -> Option<u32> {
        match self {
            EvalError::UndeclaredIdentifier { line, .. }
            | EvalError::Type { line, .. }
            | EvalError::CannotEvaluate { line, .. }
            | EvalError::IndexOutOfBounds { line, .. }
            | EvalError::DivisionByZero { line }
            | EvalError::Overflow { line }
            | EvalError::UnexpectedItem { line, .. } => Option::Some(*line),
            EvalError::StackUnderflow | EvalError::LeftoverValues(_) | EvalError::Output(_) => {
                Option::None
            }
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;

struct Frame<'program, 'heap> {
    control: Vec<ControlItem>,
    env: &'heap Env<'program, 'heap>,
}

pub struct Machine<'program, 'heap, W> {
    tree: &'program Tree,
    structures: &'program ControlStructures,
    heap: &'heap Heap<'program, 'heap>,
    frames: Vec<Frame<'program, 'heap>>,
    values: Stack<'program, 'heap>,
    /// Source line of the item being reduced
    line: u32,
    out: W,
}

impl<'program, 'heap, W: Write> Machine<'program, 'heap, W> {
    /// A machine about to run the root closure of `structures` in an empty environment.
    /// `Print` writes to `out`.
    pub fn new(
        tree: &'program Tree,
        structures: &'program ControlStructures,
        heap: &'heap Heap<'program, 'heap>,
        out: W,
    ) -> Self {
        let root = structures.root();
        let env = heap.alloc(Env::new(Option::None));
        Machine {
            tree,
            structures,
            heap,
            frames: vec![Frame {
                control: root.body.clone(),
                env,
            }],
            values: Stack::new(),
            line: root.line,
            out,
        }
    }

    fn frame(&mut self) -> EvalResult<&mut Frame<'program, 'heap>> {
        self.frames.last_mut().ok_or(EvalError::StackUnderflow)
    }

    fn current_env(&self) -> EvalResult<&'heap Env<'program, 'heap>> {
        match self.frames.last() {
            Option::Some(frame) => Result::Ok(frame.env),
            Option::None => Result::Err(EvalError::StackUnderflow),
        }
    }

    fn type_error<T>(&self, message: String) -> EvalResult<T> {
        Result::Err(EvalError::Type {
            message,
            line: self.line,
        })
    }

    fn overflow<T>(&self, result: Option<T>) -> EvalResult<T> {
        match result {
            Option::Some(value) => Result::Ok(value),
            Option::None => Result::Err(EvalError::Overflow { line: self.line }),
        }
    }

    /// Run until every frame is exhausted. Returns the value left on the stack, if any.
    pub fn run(&mut self) -> EvalResult<Option<Value<'program, 'heap>>> {
        tracing::debug!(deltas = self.structures.deltas().len(), "evaluating");
        loop {
            let item = match self.frames.last_mut() {
                Option::None => break,
                Option::Some(frame) => frame.control.pop(),
            };
            match item {
                Option::None => {
                    let _ = self.frames.pop();
                    tracing::trace!(depth = self.frames.len(), "left activation");
                }
                Option::Some(item) => self.step(item)?,
            }
        }
        tracing::debug!(environments = self.heap.env_count(), "evaluation finished");
        match self.values.size() {
            0 => Result::Ok(Option::None),
            1 => self.values.pop().map(Option::Some),
            n => Result::Err(EvalError::LeftoverValues(n)),
        }
    }

    fn step(&mut self, item: ControlItem) -> EvalResult<()> {
        match item {
            ControlItem::Node(node) => {
                self.line = self.tree.line(node);
                self.step_node(node)
            }
            ControlItem::Delta(id) => {
                let delta = self.structures.delta(id);
                self.line = delta.line;
                let env = self.current_env()?;
                self.values.push(Value::Closure(Closure { delta, env }));
                Result::Ok(())
            }
            ControlItem::Beta(id) => {
                let beta = self.structures.beta(id);
                self.line = beta.line;
                let branch = match self.values.pop()? {
                    Value::Bool(true) => &beta.then_branch,
                    Value::Bool(false) => &beta.else_branch,
                    other => {
                        return self.type_error(format!(
                            "Expecting a truthvalue; found \"{}\"",
                            other
                        ))
                    }
                };
                self.frame()?.control.extend(branch.iter().copied());
                Result::Ok(())
            }
        }
    }

    fn step_node(&mut self, node: NodeId) -> EvalResult<()> {
        let kind = self.tree.kind(node);
        match kind {
            NodeKind::Identifier => {
                let name = self.tree.text(node);
                let value = match self.current_env()?.lookup(name) {
                    Option::Some(value) => value,
                    Option::None => match Builtin::from_name(name) {
                        Option::Some(builtin) => Value::Builtin(builtin),
                        Option::None => {
                            return Result::Err(EvalError::UndeclaredIdentifier {
                                name: String::from(name),
                                line: self.line,
                            })
                        }
                    },
                };
                self.values.push(value);
            }
            NodeKind::Integer => {
                let n = self.overflow(self.tree.text(node).parse::<i64>().ok())?;
                self.values.push(Value::Integer(n));
            }
            NodeKind::String => self
                .values
                .push(Value::Str(String::from(self.tree.text(node)))),
            NodeKind::True => self.values.push(Value::Bool(true)),
            NodeKind::False => self.values.push(Value::Bool(false)),
            NodeKind::Dummy => self.values.push(Value::Dummy),
            NodeKind::Nil => self.values.push(Value::nil()),
            NodeKind::YStar => self.values.push(Value::YStar),
            NodeKind::Tau => {
                let count = self.tree.child_count(node);
                let mut elements = Vec::with_capacity(count);
                for _ in 0..count {
                    elements.push(self.values.pop()?);
                }
                self.values.push(Value::Tuple(elements));
            }
            NodeKind::Gamma => self.apply(node)?,
            NodeKind::Plus
            | NodeKind::Minus
            | NodeKind::Mult
            | NodeKind::Div
            | NodeKind::Exp
            | NodeKind::Ls
            | NodeKind::Le
            | NodeKind::Gr
            | NodeKind::Ge => self.arithmetic(kind)?,
            NodeKind::Eq | NodeKind::Ne => self.equality(kind)?,
            NodeKind::Or | NodeKind::And => {
                let left = self.values.pop()?;
                let right = self.values.pop()?;
                let result = match (&left, &right) {
                    (Value::Bool(l), Value::Bool(r)) => match kind {
                        NodeKind::Or => *l || *r,
                        _ => *l && *r,
                    },
                    _ => {
                        return self.type_error(format!(
                            "Cannot {} \"{}\", \"{}\"",
                            kind.print_name(),
                            left,
                            right
                        ))
                    }
                };
                self.values.push(Value::Bool(result));
            }
            NodeKind::Not => match self.values.pop()? {
                Value::Bool(b) => self.values.push(Value::Bool(!b)),
                other => {
                    return self.type_error(format!(
                        "Expecting a Boolean Value; was given \"{}\"",
                        other
                    ))
                }
            },
            NodeKind::Neg => {
                let value = self.values.pop()?;
                self.negate(value)?;
            }
            NodeKind::Aug => {
                let left = self.values.pop()?;
                let right = self.values.pop()?;
                match left {
                    Value::Tuple(mut elements) => {
                        elements.push(right);
                        self.values.push(Value::Tuple(elements));
                    }
                    other => {
                        return self.type_error(format!(
                            "Cannot append to a non-tuple \"{}\"",
                            other
                        ))
                    }
                }
            }
            _ => {
                return Result::Err(EvalError::UnexpectedItem {
                    construct: kind.print_name(),
                    line: self.line,
                })
            }
        }
        Result::Ok(())
    }

    fn arithmetic(&mut self, kind: NodeKind) -> EvalResult<()> {
        let left = self.values.pop()?;
        let right = self.values.pop()?;
        let (l, r) = match (&left, &right) {
            (Value::Integer(l), Value::Integer(r)) => (*l, *r),
            _ => {
                return self.type_error(format!(
                    "Expected two integers; was given \"{}\", \"{}\"",
                    left, right
                ))
            }
        };
        let result = match kind {
            NodeKind::Plus => Value::Integer(self.overflow(l.checked_add(r))?),
            NodeKind::Minus => Value::Integer(self.overflow(l.checked_sub(r))?),
            NodeKind::Mult => Value::Integer(self.overflow(l.checked_mul(r))?),
            NodeKind::Div => {
                if r == 0 {
                    return Result::Err(EvalError::DivisionByZero { line: self.line });
                }
                Value::Integer(self.overflow(l.checked_div(r))?)
            }
            NodeKind::Exp => Value::Integer(self.power(l, r)?),
            NodeKind::Ls => Value::Bool(l < r),
            NodeKind::Le => Value::Bool(l <= r),
            NodeKind::Gr => Value::Bool(l > r),
            _ => Value::Bool(l >= r),
        };
        self.values.push(result);
        Result::Ok(())
    }

    /// Integer exponentiation. A negative exponent gives the reciprocal truncated toward zero.
    fn power(&self, base: i64, exponent: i64) -> EvalResult<i64> {
        if exponent >= 0 {
            let exponent = self.overflow(usize::try_from(exponent).ok())?;
            return self.overflow(num::checked_pow(base, exponent));
        }
        match base {
            0 => Result::Err(EvalError::DivisionByZero { line: self.line }),
            1 => Result::Ok(1),
            -1 if exponent % 2 == 0 => Result::Ok(1),
            -1 => Result::Ok(-1),
            _ => Result::Ok(0),
        }
    }

    fn equality(&mut self, kind: NodeKind) -> EvalResult<()> {
        let left = self.values.pop()?;
        let right = self.values.pop()?;
        let equal = match (&left, &right) {
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Integer(l), Value::Integer(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            _ if std::mem::discriminant(&left) == std::mem::discriminant(&right) => {
                return self.type_error(format!(
                    "Don't know how to {} \"{}\", \"{}\"",
                    kind.print_name(),
                    left,
                    right
                ))
            }
            _ => {
                return self.type_error(format!(
                    "Cannot compare dissimilar types; was given \"{}\", \"{}\"",
                    left, right
                ))
            }
        };
        let result = match kind {
            NodeKind::Eq => equal,
            _ => !equal,
        };
        self.values.push(Value::Bool(result));
        Result::Ok(())
    }

    fn negate(&mut self, value: Value<'program, 'heap>) -> EvalResult<()> {
        match value {
            Value::Integer(n) => {
                let negated = self.overflow(n.checked_neg())?;
                self.values.push(Value::Integer(negated));
                Result::Ok(())
            }
            other => self.type_error(format!("Expecting an integer; was given \"{}\"", other)),
        }
    }

    fn apply(&mut self, gamma: NodeId) -> EvalResult<()> {
        let rator = self.values.pop()?;
        let rand = self.values.pop()?;
        match rator {
            Value::Closure(closure) => self.enter(closure, rand),
            Value::YStar => match rand {
                Value::Closure(closure) => {
                    self.values.push(Value::Eta(closure));
                    Result::Ok(())
                }
                other => self.type_error(format!("Expected a Delta; was given \"{}\"", other)),
            },
            Value::Eta(closure) => {
                self.values.push(rand);
                self.values.push(Value::Eta(closure.clone()));
                self.values.push(Value::Closure(closure));
                let control = &mut self.frame()?.control;
                control.push(ControlItem::Node(gamma));
                control.push(ControlItem::Node(gamma));
                Result::Ok(())
            }
            Value::Tuple(elements) => {
                let index = match rand {
                    Value::Integer(index) => index,
                    other => {
                        return self.type_error(format!(
                            "tuple index must be Integer, Not with \"{}\"",
                            other
                        ))
                    }
                };
                let selected = usize::try_from(index)
                    .ok()
                    .and_then(|i| i.checked_sub(1))
                    .and_then(|i| elements.into_iter().nth(i));
                match selected {
                    Option::Some(value) => {
                        self.values.push(value);
                        Result::Ok(())
                    }
                    Option::None => Result::Err(EvalError::IndexOutOfBounds {
                        index,
                        line: self.line,
                    }),
                }
            }
            Value::Builtin(builtin) => self.apply_builtin(builtin, rand),
            other => Result::Err(EvalError::CannotEvaluate {
                rator: other.to_string(),
                line: self.line,
            }),
        }
    }

    /// Start an activation of `closure` with its parameters bound to `rand`.
    fn enter(
        &mut self,
        closure: Closure<'program, 'heap>,
        rand: Value<'program, 'heap>,
    ) -> EvalResult<()> {
        let delta = closure.delta;
        let mut env = Env::new(Option::Some(closure.env));
        match delta.bound_vars.len() {
            0 => {}
            1 => env.bind(&delta.bound_vars[0], rand),
            n => match rand {
                Value::Tuple(elements) if elements.len() == n => {
                    for (name, value) in delta.bound_vars.iter().zip(elements) {
                        env.bind(name, value);
                    }
                }
                other => {
                    return self.type_error(format!(
                        "Expected a tuple of {} elements; was given \"{}\"",
                        n, other
                    ))
                }
            },
        }
        let env = self.heap.alloc(env);

        // an exhausted caller has nothing left to resume
        if let Option::Some(frame) = self.frames.last() {
            if frame.control.is_empty() {
                let _ = self.frames.pop();
            }
        }
        tracing::trace!(
            delta = delta.index,
            depth = self.frames.len(),
            "entering closure"
        );
        self.frames.push(Frame {
            control: delta.body.clone(),
            env,
        });
        Result::Ok(())
    }

    fn require_string(&self, builtin: Builtin, value: Value<'program, 'heap>) -> EvalResult<String> {
        match value {
            Value::Str(s) => Result::Ok(s),
            other => self.type_error(format!(
                "{} expected a string; was given \"{}\"",
                builtin, other
            )),
        }
    }

    fn require_tuple(
        &self,
        builtin: Builtin,
        value: Value<'program, 'heap>,
    ) -> EvalResult<Vec<Value<'program, 'heap>>> {
        match value {
            Value::Tuple(elements) => Result::Ok(elements),
            other => self.type_error(format!(
                "{} expected a tuple; was given \"{}\"",
                builtin, other
            )),
        }
    }

    fn apply_builtin(&mut self, builtin: Builtin, rand: Value<'program, 'heap>) -> EvalResult<()> {
        let result = match builtin {
            Builtin::Isinteger => Value::Bool(matches!(rand, Value::Integer(_))),
            Builtin::Isstring => Value::Bool(matches!(rand, Value::Str(_))),
            Builtin::Istuple => Value::Bool(matches!(rand, Value::Tuple(_))),
            Builtin::Isdummy => Value::Bool(matches!(rand, Value::Dummy)),
            Builtin::Istruthvalue => Value::Bool(rand.is_truth_value()),
            Builtin::Isfunction => Value::Bool(rand.is_function()),
            Builtin::Stem => {
                let s = self.require_string(builtin, rand)?;
                Value::Str(s.chars().take(1).collect())
            }
            Builtin::Stern => {
                let s = self.require_string(builtin, rand)?;
                Value::Str(s.chars().skip(1).collect())
            }
            Builtin::Conc => {
                // the second argument's application is consumed here
                let next = self.frame()?.control.pop();
                match next {
                    Option::Some(ControlItem::Node(node))
                        if self.tree.kind(node) == NodeKind::Gamma => {}
                    _ => {
                        return self.type_error(format!(
                            "Conc expected two arguments; was given \"{}\"",
                            rand
                        ))
                    }
                }
                let second = self.values.pop()?;
                match (rand, second) {
                    (Value::Str(mut l), Value::Str(r)) => {
                        l.push_str(&r);
                        Value::Str(l)
                    }
                    (l, r) => {
                        return self.type_error(format!(
                            "Expected two strings; was given \"{}\", \"{}\"",
                            l, r
                        ))
                    }
                }
            }
            Builtin::Print => {
                let text = rand
                    .to_string()
                    .replace("\\t", "\t")
                    .replace("\\n", "\n");
                self.out
                    .write_all(text.as_bytes())
                    .map_err(|err| EvalError::Output(err.to_string()))?;
                Value::Dummy
            }
            Builtin::ItoS => match rand {
                Value::Integer(n) => Value::Str(n.to_string()),
                other => {
                    return self.type_error(format!(
                        "Expected an integer; was given \"{}\"",
                        other
                    ))
                }
            },
            Builtin::Order => {
                let elements = self.require_tuple(builtin, rand)?;
                let order = self.overflow(i64::try_from(elements.len()).ok())?;
                Value::Integer(order)
            }
            Builtin::Null => Value::Bool(self.require_tuple(builtin, rand)?.is_empty()),
            Builtin::Neg => return self.negate(rand),
        };
        self.values.push(result);
        Result::Ok(())
    }
}

/// Run a program's control structures to completion with an environment heap of `heap_capacity`
/// bytes, writing `Print` output to `out`. Returns the rendering of the final value, if one was
/// left.
pub fn evaluate<W: Write>(
    tree: &Tree,
    structures: &ControlStructures,
    heap_capacity: usize,
    out: W,
) -> EvalResult<Option<String>> {
    let heap = Heap::with_capacity(heap_capacity);
    let mut machine = Machine::new(tree, structures, &heap, out);
    let result = machine.run()?;
    Result::Ok(result.map(|value| value.to_string()))
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[cfg(test)]
fn eval_program(input: &str) -> (EvalResult<Option<String>>, String) {
    let tokens = Lexer::from_str(input, Offset(0)).tokenize().unwrap();
    let mut tree = parser::parse(&tokens).unwrap();
    ast::standardize(&mut tree).unwrap();
    let structures = compiler::build_root_closure(&tree).unwrap();
    let mut out = Vec::new();
    let result = evaluate(&tree, &structures, DEFAULT_HEAP_CAPACITY, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[cfg(test)]
fn test_eval(input: &str, expected: &str) {
    let (result, _) = eval_program(input);
    assert_eq!(result, Result::Ok(Option::Some(String::from(expected))))
}

#[cfg(test)]
fn test_eval_fail(input: &str, expected: EvalError) {
    let (result, _) = eval_program(input);
    assert_eq!(result, Result::Err(expected))
}

#[test]
fn test_eval_arithmetic() {
    test_eval("1 + 2 * 3 - 8 / 3", "5");
    test_eval("-7 / 2", "-3");
    test_eval("2 ** 3 ** 2", "512");
    test_eval("2 ** (-1)", "0");
    test_eval("(-1) ** (-3)", "-1");
}

#[test]
fn test_eval_comparisons() {
    test_eval("1 ls 2 & 2 le 2 & 3 gr 2 & 3 ge 4", "false");
    test_eval("not (1 > 2) or false", "true");
}

#[test]
fn test_eval_division_by_zero() {
    test_eval_fail("1 / 0", EvalError::DivisionByZero { line: 1 });
    test_eval_fail("0 ** (-1)", EvalError::DivisionByZero { line: 1 });
}

#[test]
fn test_eval_overflow() {
    test_eval_fail("2 ** 64", EvalError::Overflow { line: 1 });
}

#[test]
fn test_eval_expected_integers() {
    test_eval_fail(
        "1 + 'a'",
        EvalError::Type {
            message: String::from("Expected two integers; was given \"1\", \"a\""),
            line: 1,
        },
    );
}

#[test]
fn test_eval_equality() {
    test_eval("'abc' eq 'abc'", "true");
    test_eval("1 ne 2", "true");
    test_eval("true eq false", "false");
    test_eval_fail(
        "1 eq 'a'",
        EvalError::Type {
            message: String::from("Cannot compare dissimilar types; was given \"1\", \"a\""),
            line: 1,
        },
    );
    test_eval_fail(
        "true ne 0",
        EvalError::Type {
            message: String::from("Cannot compare dissimilar types; was given \"true\", \"0\""),
            line: 1,
        },
    );
}

#[test]
fn test_eval_tuple_selection() {
    test_eval("(1, 2, 3) 1", "1");
    test_eval("(1, 2, 3) 3", "3");
    test_eval_fail(
        "(1, 2, 3) 0",
        EvalError::IndexOutOfBounds { index: 0, line: 1 },
    );
    test_eval_fail(
        "(1, 2, 3) 4",
        EvalError::IndexOutOfBounds { index: 4, line: 1 },
    );
}

#[test]
fn test_eval_tuple_builtins() {
    test_eval("Order (1, 'two', nil)", "3");
    test_eval("Order nil", "0");
    test_eval("Null nil", "true");
    test_eval("Null (1, 2)", "false");
    test_eval("nil aug 1 aug (2, 3)", "(1, (2, 3))");
    test_eval_fail(
        "1 aug 2",
        EvalError::Type {
            message: String::from("Cannot append to a non-tuple \"1\""),
            line: 1,
        },
    );
}

#[test]
fn test_eval_string_builtins() {
    test_eval("Stem 'abc'", "a");
    test_eval("Stem ''", "");
    test_eval("Stern 'abc'", "bc");
    test_eval("Stern 'a'", "");
    test_eval("Stern ''", "");
    test_eval("Conc 'ab' 'cd'", "abcd");
    test_eval("conc (ItoS 4) (ItoS 2)", "42");
}

#[test]
fn test_eval_type_predicates() {
    test_eval(
        "(Isinteger 1, Isstring 'a', Istuple nil, Isdummy dummy, Istruthvalue false)",
        "(true, true, true, true, true)",
    );
    test_eval(
        "let f x = x in let rec g x = g x in (Isfunction f, Isfunction g, Isfunction 1)",
        "(true, true, false)",
    );
}

#[test]
fn test_eval_shadowing() {
    test_eval("let x = 1 in (let x = 2 in x) + x", "3");
    test_eval("let x = 1 in let f x = x * 10 in f 5 + x", "51");
}

#[test]
fn test_eval_recursion() {
    test_eval(
        "let rec f n = n eq 0 -> 1 | n * f (n - 1) in f 5",
        "120",
    );
    test_eval(
        "let rec fib n = n ls 2 -> n | fib (n - 1) + fib (n - 2) in fib 10",
        "55",
    );
}

#[test]
fn test_eval_definitions() {
    test_eval("let f (a, b) = a - b in f (5, 3)", "2");
    test_eval("let a = 1 and b = 2 in a + b", "3");
    test_eval("let a = 1 within b = a + 1 in b", "2");
    test_eval("x + 1 where x = 1", "2");
    test_eval("let add x y = x + y in 1 @add 2 @add 3", "6");
    test_eval("let f () = 7 in f dummy", "7");
}

#[test]
fn test_eval_wrong_arity() {
    test_eval_fail(
        "let f (a, b) = a in f (1, 2, 3)",
        EvalError::Type {
            message: String::from("Expected a tuple of 2 elements; was given \"(1, 2, 3)\""),
            line: 1,
        },
    );
}

#[test]
fn test_eval_conditional_requires_truth_value() {
    test_eval_fail(
        "1 -> 2 | 3",
        EvalError::Type {
            message: String::from("Expecting a truthvalue; found \"1\""),
            line: 1,
        },
    );
}

#[test]
fn test_eval_undeclared() {
    test_eval_fail(
        "let x = 1\nin y",
        EvalError::UndeclaredIdentifier {
            name: String::from("y"),
            line: 2,
        },
    );
}

#[test]
fn test_eval_cannot_evaluate() {
    test_eval_fail(
        "1 2",
        EvalError::CannotEvaluate {
            rator: String::from("1"),
            line: 1,
        },
    );
}

#[test]
fn test_eval_print() {
    let (result, out) = eval_program("let x = Print 'a\\tb\\nc' in Print (1, 'x', true)");
    assert_eq!(result, Result::Ok(Option::Some(String::from("dummy"))));
    assert_eq!(out, "a\tb\nc(1, x, true)");
}

#[test]
fn test_eval_closure_result() {
    test_eval("fn x. x", "[lambda closure: x: 1]");
    test_eval("neg", "neg");
}

#[test]
fn test_eval_ystar_requires_closure() {
    let mut tree = Tree::new();
    let ystar = tree.alloc(NodeKind::YStar, Option::None, 2);
    let one = tree.mk_leaf(NodeKind::Integer, "1", 2);
    let gamma = tree.mk_node(NodeKind::Gamma, &[ystar, one]);
    tree.set_root(gamma);
    ast::standardize(&mut tree).unwrap();
    let structures = compiler::build_root_closure(&tree).unwrap();
    let mut out = Vec::new();
    assert_eq!(
        evaluate(&tree, &structures, DEFAULT_HEAP_CAPACITY, &mut out),
        Result::Err(EvalError::Type {
            message: String::from("Expected a Delta; was given \"1\""),
            line: 2,
        })
    );
}

#[test]
fn test_eval_conc_partially_applied() {
    test_eval_fail(
        "let f = Conc 'a' in f 'b'",
        EvalError::Type {
            message: String::from("Conc expected two arguments; was given \"a\""),
            line: 1,
        },
    );
}
