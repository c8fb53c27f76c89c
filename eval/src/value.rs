use crate::builtin::Builtin;
use crate::env::Env;
use compiler::Delta;
use std::fmt::Display;

/// A delta paired with the environment that was active when the machine reached it.
#[derive(Clone, Debug, PartialEq)]
pub struct Closure<'program, 'heap> {
    pub delta: &'program Delta,
    pub env: &'heap Env<'program, 'heap>,
}

impl<'program, 'heap> Closure<'program, 'heap> {
    fn fmt_as(&self, tag: &str, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        let var = match self.delta.bound_vars.first() {
            Option::Some(var) => var.as_str(),
            Option::None => "()",
        };
        write!(formatter, "[{} closure: {}: {}]", tag, var, self.delta.index)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value<'program, 'heap> {
    Integer(i64),
    /// Escape sequences are kept as written until printed
    Str(String),
    Bool(bool),
    Dummy,
    /// Elements in order; selection is 1-based. The empty tuple is `nil`.
    Tuple(Vec<Value<'program, 'heap>>),
    Closure(Closure<'program, 'heap>),
    Eta(Closure<'program, 'heap>),
    YStar,
    Builtin(Builtin),
}

impl<'program, 'heap> Value<'program, 'heap> {
    #[inline]
    pub fn nil() -> Self {
        Value::Tuple(Vec::new())
    }

    pub fn is_truth_value(&self) -> bool {
        match self {
            Value::Bool(_) => true,
            _ => false,
        }
    }

    pub fn is_function(&self) -> bool {
        match self {
            Value::Closure(_) | Value::Eta(_) => true,
            _ => false,
        }
    }
}

impl<'program, 'heap> Display for Value<'program, 'heap> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(formatter, "{}", n),
            Value::Str(s) => formatter.write_str(s),
            Value::Bool(b) => write!(formatter, "{}", b),
            Value::Dummy => formatter.write_str("dummy"),
            Value::Tuple(elements) => {
                let mut elements = elements.iter();
                match elements.next() {
                    Option::None => formatter.write_str("nil"),
                    Option::Some(first) => {
                        write!(formatter, "({}", first)?;
                        for element in elements {
                            write!(formatter, ", {}", element)?;
                        }
                        formatter.write_str(")")
                    }
                }
            }
            Value::Closure(closure) => closure.fmt_as("lambda", formatter),
            Value::Eta(closure) => closure.fmt_as("eta", formatter),
            Value::YStar => formatter.write_str("<Y*>"),
            Value::Builtin(builtin) => Display::fmt(builtin, formatter),
        }
    }
}

#[test]
fn test_display_tuples() {
    let value = Value::Tuple(vec![
        Value::Integer(1),
        Value::Str(String::from("two")),
        Value::nil(),
        Value::Tuple(vec![Value::Bool(true), Value::Dummy]),
    ]);
    assert_eq!(value.to_string(), "(1, two, nil, (true, dummy))");
}

#[test]
fn test_display_closures() {
    let env = Env::new(Option::None);
    let delta = Delta {
        index: 3,
        bound_vars: vec![String::from("x"), String::from("y")],
        line: 1,
        body: Vec::new(),
    };
    let closure = Closure {
        delta: &delta,
        env: &env,
    };
    assert_eq!(
        Value::Closure(closure.clone()).to_string(),
        "[lambda closure: x: 3]"
    );
    assert_eq!(Value::Eta(closure).to_string(), "[eta closure: x: 3]");
}
