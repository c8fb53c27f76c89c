use crate::env::Env;

use num::Integer;
use typed_arena::Arena;

/// Owns every environment created during one evaluation. They are all freed together when the
/// heap is dropped.
pub struct Heap<'program, 'heap> {
    arena: Arena<Env<'program, 'heap>>,
}

impl<'program, 'heap> Heap<'program, 'heap> {
    /// Create a heap with the given initial capacity in bytes. Grows if the capacity is exceeded.
    pub fn with_capacity(size_bytes: usize) -> Self {
        let (q, r) = size_bytes.div_rem(&std::mem::size_of::<Env>());
        let size_items = q + match r == 0 {
            true => 0,
            false => 1,
        };
        Heap {
            arena: Arena::with_capacity(size_items),
        }
    }

    pub fn alloc<'a>(&'a self, env: Env<'program, 'heap>) -> &'heap Env<'program, 'heap>
    where
        'a: 'heap,
    {
        self.arena.alloc(env)
    }

    /// Number of environments allocated so far
    pub fn env_count(&self) -> usize {
        self.arena.len()
    }
}

#[cfg(test)]
use crate::value::Value;

#[test]
fn test_heap_chains() {
    let heap = Heap::with_capacity(0);
    let mut global = Env::new(Option::None);
    global.bind("x", Value::Integer(1));
    let global = heap.alloc(global);
    let local = heap.alloc(Env::new(Option::Some(global)));
    assert_eq!(heap.env_count(), 2);
    assert_eq!(local.lookup("x"), Option::Some(Value::Integer(1)));
}
