//! Concurrent type storage with structural interning.
//!
//! Shapes live in a sharded map keyed by `TypeId`; a second map from shape
//! to id deduplicates structural types. Both are `DashMap`s so one arena can
//! be shared by reference across threads without an outer lock. When two
//! threads race to intern the same shape, the entry API makes the first
//! committed id the one every caller sees.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use cport_core::invariants::{ensure, invariant_violated};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::shape::{FloatType, IntType, TypeId, TypeShape};

#[derive(Debug)]
pub(crate) struct TypeArena {
    shapes: DashMap<TypeId, Arc<TypeShape>>,
    interned: DashMap<Arc<TypeShape>, TypeId>,
    next: AtomicU32,
}

/// Primitives in `TypeId` order.
const BUILTINS: [(TypeId, TypeShape); TypeId::BUILTIN_COUNT as usize] = [
    (TypeId::BOOL, TypeShape::Bool),
    (TypeId::INT8, TypeShape::Int(IntType::signed(1))),
    (TypeId::INT16, TypeShape::Int(IntType::signed(2))),
    (TypeId::INT32, TypeShape::Int(IntType::signed(4))),
    (TypeId::INT64, TypeShape::Int(IntType::signed(8))),
    (TypeId::UINT8, TypeShape::Int(IntType::unsigned(1))),
    (TypeId::UINT16, TypeShape::Int(IntType::unsigned(2))),
    (TypeId::UINT32, TypeShape::Int(IntType::unsigned(4))),
    (TypeId::UINT64, TypeShape::Int(IntType::unsigned(8))),
    (TypeId::FLOAT32, TypeShape::Float(FloatType::new(4))),
    (TypeId::FLOAT64, TypeShape::Float(FloatType::new(8))),
    (
        TypeId::UNSAFE_PTR,
        TypeShape::Ptr {
            elem: None,
            null: false,
        },
    ),
    (
        TypeId::NIL,
        TypeShape::Ptr {
            elem: None,
            null: true,
        },
    ),
];

impl TypeArena {
    pub fn new() -> Self {
        let arena = Self {
            shapes: DashMap::new(),
            interned: DashMap::new(),
            next: AtomicU32::new(0),
        };
        for (expected, shape) in BUILTINS {
            let (id, _) = arena.intern(shape);
            debug_assert_eq!(id, expected);
        }
        arena
    }

    /// Returns the id of `shape`, registering it if unseen. The flag is
    /// `true` when this call committed the shape.
    pub fn intern(&self, shape: TypeShape) -> (TypeId, bool) {
        ensure(!shape.is_identity(), "TypeArena::intern", || {
            format!("{shape:?} is an identity shape and must be allocated")
        });
        if let Some(id) = self.interned.get(&shape) {
            return (*id, false);
        }
        let shape = Arc::new(shape);
        match self.interned.entry(Arc::clone(&shape)) {
            Entry::Occupied(e) => (*e.get(), false),
            Entry::Vacant(e) => {
                let id = self.next_id();
                self.shapes.insert(id, shape);
                e.insert(id);
                (id, true)
            }
        }
    }

    /// Registers a shape under a fresh id, bypassing deduplication.
    pub fn alloc(&self, shape: TypeShape) -> TypeId {
        let id = self.next_id();
        self.shapes.insert(id, Arc::new(shape));
        id
    }

    /// Swaps the shape behind an allocated (non-interned) id.
    pub fn replace(&self, id: TypeId, shape: TypeShape) {
        match self.shapes.get_mut(&id) {
            Some(mut slot) => *slot = Arc::new(shape),
            None => invariant_violated("TypeArena::replace", format!("{id:?} not registered")),
        }
    }

    pub fn get(&self, id: TypeId) -> Arc<TypeShape> {
        match self.shapes.get(&id) {
            Some(shape) => Arc::clone(shape.value()),
            None => invariant_violated("TypeArena::get", format!("{id:?} not registered")),
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    fn next_id(&self) -> TypeId {
        TypeId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
