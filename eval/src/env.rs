use crate::value::Value;
use std::collections::HashMap;

/// A scope of bindings. Environments are filled in before they are moved into the heap and
/// never change afterwards.
#[derive(Debug, PartialEq, Default)]
pub struct Env<'program, 'heap> {
    parent: Option<&'heap Env<'program, 'heap>>,
    bindings: HashMap<String, Value<'program, 'heap>>,
}

impl<'program, 'heap> Env<'program, 'heap> {
    pub fn new(parent: Option<&'heap Env<'program, 'heap>>) -> Self {
        Env {
            parent,
            bindings: HashMap::new(),
        }
    }

    /// Binds `name` in this environment only, replacing any previous binding here.
    pub fn bind(&mut self, name: &str, value: Value<'program, 'heap>) {
        let _ = self.bindings.insert(String::from(name), value);
    }

    /// A copy of the innermost binding of `name`. Callers get their own copy so nothing they do
    /// with it can be seen through another activation.
    pub fn lookup(&self, name: &str) -> Option<Value<'program, 'heap>> {
        let mut current = self;
        loop {
            if let Option::Some(value) = current.bindings.get(name) {
                return Option::Some(value.clone());
            }
            match current.parent {
                Option::Some(parent) => current = parent,
                Option::None => return Option::None,
            }
        }
    }
}

#[test]
fn test_lookup_walks_parents() {
    let mut outer = Env::new(Option::None);
    outer.bind("x", Value::Integer(1));
    outer.bind("y", Value::Integer(2));
    let mut inner = Env::new(Option::Some(&outer));
    inner.bind("x", Value::Str(String::from("shadow")));

    assert_eq!(inner.lookup("x"), Option::Some(Value::Str(String::from("shadow"))));
    assert_eq!(inner.lookup("y"), Option::Some(Value::Integer(2)));
    assert_eq!(inner.lookup("z"), Option::None);
    assert_eq!(outer.lookup("x"), Option::Some(Value::Integer(1)));
}

#[test]
fn test_lookup_copies() {
    let mut env = Env::new(Option::None);
    env.bind("t", Value::Tuple(vec![Value::Integer(1)]));
    if let Option::Some(Value::Tuple(mut elements)) = env.lookup("t") {
        elements.push(Value::Integer(2));
    }
    assert_eq!(env.lookup("t"), Option::Some(Value::Tuple(vec![Value::Integer(1)])));
}
