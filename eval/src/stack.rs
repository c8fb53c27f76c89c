use crate::value::Value;
use crate::EvalError;
use std::fmt::Debug;

/// The machine's value stack, shared by every activation.
#[derive(Default)]
pub struct Stack<'program, 'heap> {
    items: Vec<Value<'program, 'heap>>,
}

impl<'program, 'heap> Debug for Stack<'program, 'heap> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.debug_list().entries(self.items.iter()).finish()
    }
}

impl<'program, 'heap> Stack<'program, 'heap> {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, val: Value<'program, 'heap>) {
        self.items.push(val)
    }

    #[inline]
    pub fn pop(&mut self) -> Result<Value<'program, 'heap>, EvalError> {
        self.items.pop().ok_or(EvalError::StackUnderflow)
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }
}

#[test]
fn test_stack1() {
    let mut stack = Stack::new();
    stack.push(Value::Integer(999));
    stack.push(Value::Integer(10));
    stack.push(Value::Integer(42));
    assert_eq!(stack.size(), 3);
    assert_eq!(format!("{:?}", stack), "[Integer(999), Integer(10), Integer(42)]");
    assert_eq!(stack.pop(), Result::Ok(Value::Integer(42)));
    assert_eq!(stack.pop(), Result::Ok(Value::Integer(10)));
    assert_eq!(stack.size(), 1);
}

#[test]
fn test_stack_underflow() {
    let mut stack = Stack::new();
    stack.push(Value::Dummy);
    assert_eq!(stack.pop(), Result::Ok(Value::Dummy));
    assert_eq!(stack.pop(), Result::Err(EvalError::StackUnderflow));
    assert_eq!(stack.size(), 0);
}
