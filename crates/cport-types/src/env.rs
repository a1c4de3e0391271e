//! The type environment: configuration, arena and builtin registries for
//! one translation run.

use std::sync::Arc;

use cport_core::escape_ident;
use cport_core::invariants::{ensure, invariant_violated};
use dashmap::DashMap;

use crate::arena::TypeArena;
use crate::builtins::{CTypes, GoTypes};
use crate::config::Config;
use crate::error::ConfigError;
use crate::kind::Kind;
use crate::shape::{
    ArrayType, Field, FloatType, FuncSig, IntType, NamedType, StructType, TypeId, TypeShape,
};

/// Owns every type of a translation run.
///
/// All methods take `&self`: the arena is internally synchronized, so one
/// environment can be shared across threads by reference. Independent
/// environments share nothing.
#[derive(Debug)]
pub struct TypeEnv {
    config: Config,
    arena: TypeArena,
    go: GoTypes,
    c: CTypes,
    /// Per-run cache of converted typedef names.
    pub(crate) typedefs: DashMap<String, TypeId>,
}

impl TypeEnv {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let arena = TypeArena::new();
        let go = GoTypes::register(&arena, &config);
        let c = CTypes::register(&arena, &config, &go);
        Ok(Self {
            config,
            arena,
            go,
            c,
            typedefs: DashMap::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ptr_size(&self) -> u32 {
        self.config.ptr_size
    }

    pub fn go(&self) -> &GoTypes {
        &self.go
    }

    pub fn c(&self) -> &CTypes {
        &self.c
    }

    /// Number of registered types.
    pub fn type_count(&self) -> usize {
        self.arena.len()
    }

    // ------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------

    fn intern(&self, shape: TypeShape) -> TypeId {
        let (id, fresh) = self.arena.intern(shape);
        if fresh {
            tracing::trace!(id = id.as_u32(), "interned type");
        }
        id
    }

    pub fn int_type(&self, t: IntType) -> TypeId {
        ensure(t.size() > 0, "TypeEnv::int_type", || format!("{t:?} has no size"));
        self.intern(TypeShape::Int(t))
    }

    pub fn int_t(&self, size: u32) -> TypeId {
        self.int_type(IntType::signed(size))
    }

    pub fn uint_t(&self, size: u32) -> TypeId {
        self.int_type(IntType::unsigned(size))
    }

    pub fn untyped_int_t(&self, size: u32, signed: bool) -> TypeId {
        self.int_type(IntType::untyped(size, signed))
    }

    pub fn float_type(&self, t: FloatType) -> TypeId {
        ensure(t.size() > 0, "TypeEnv::float_type", || format!("{t:?} has no size"));
        self.intern(TypeShape::Float(t))
    }

    pub fn float_t(&self, size: u32) -> TypeId {
        self.float_type(FloatType::new(size))
    }

    pub fn untyped_float_t(&self, size: u32) -> TypeId {
        self.float_type(FloatType::untyped(size))
    }

    pub fn bool_t(&self) -> TypeId {
        TypeId::BOOL
    }

    /// Default `int`, honoring `use_go_int`.
    pub fn def_int_t(&self) -> TypeId {
        if self.config.use_go_int {
            return self.go.int();
        }
        self.int_t(self.config.int_size)
    }

    pub fn def_uint_t(&self) -> TypeId {
        if self.config.use_go_int {
            return self.go.uint();
        }
        self.uint_t(self.config.int_size)
    }

    /// Signed address-width integer.
    pub fn int_ptr_t(&self) -> TypeId {
        self.int_t(self.config.ptr_size)
    }

    /// Unsigned address-width integer.
    pub fn uint_ptr_t(&self) -> TypeId {
        self.go.uintptr()
    }

    /// Pointer to `elem`, or the opaque pointer for `None`.
    pub fn ptr_t(&self, elem: Option<TypeId>) -> TypeId {
        match elem {
            None => TypeId::UNSAFE_PTR,
            Some(_) => self.intern(TypeShape::Ptr { elem, null: false }),
        }
    }

    pub fn unsafe_ptr_t(&self) -> TypeId {
        TypeId::UNSAFE_PTR
    }

    pub fn nil_t(&self) -> TypeId {
        TypeId::NIL
    }

    pub fn array_t(&self, elem: TypeId, len: u64) -> TypeId {
        self.intern(TypeShape::Array(ArrayType {
            elem,
            len,
            slice: false,
        }))
    }

    /// Legacy `char[len]` buffer, held as target bytes.
    pub fn byte_array_t(&self, len: u64) -> TypeId {
        self.array_t(self.go.byte(), len)
    }

    pub fn slice_t(&self, elem: TypeId) -> TypeId {
        self.intern(TypeShape::Array(ArrayType {
            elem,
            len: 0,
            slice: true,
        }))
    }

    pub fn func_t(&self, ret: Option<TypeId>, args: Vec<Field>, variadic: bool) -> TypeId {
        self.intern(TypeShape::Func(FuncSig {
            args,
            ret,
            variadic,
        }))
    }

    /// Function type with unnamed arguments.
    pub fn func_tt(&self, ret: Option<TypeId>, args: &[TypeId]) -> TypeId {
        let args = args.iter().copied().map(Field::unnamed).collect();
        self.func_t(ret, args, false)
    }

    pub fn struct_t(&self, fields: Vec<Field>) -> TypeId {
        self.record_t(fields, false)
    }

    pub fn union_t(&self, fields: Vec<Field>) -> TypeId {
        self.record_t(fields, true)
    }

    fn record_t(&self, fields: Vec<Field>, union: bool) -> TypeId {
        let (id, fresh) = self
            .arena
            .intern(TypeShape::Struct(StructType { fields, union }));
        if fresh {
            tracing::debug!(id = id.as_u32(), union, "new record shape");
        }
        id
    }

    /// Named type whose target name is the escaped legacy name.
    pub fn named_t(&self, name: &str, underlying: TypeId) -> TypeId {
        self.named_target_t(name, &escape_ident(name), underlying)
    }

    /// Named type with an explicit target name.
    pub fn named_target_t(&self, name: &str, target: &str, underlying: TypeId) -> TypeId {
        self.arena.alloc(TypeShape::Named(NamedType {
            name: name.to_owned(),
            target: target.to_owned(),
            underlying: Some(underlying),
        }))
    }

    /// Reserves a named type before its underlying type exists, so a
    /// struct can point to itself. Finish with [`Self::complete_named`].
    pub fn declare_named(&self, name: &str) -> TypeId {
        self.arena.alloc(TypeShape::Named(NamedType {
            name: name.to_owned(),
            target: escape_ident(name),
            underlying: None,
        }))
    }

    pub fn complete_named(&self, id: TypeId, underlying: TypeId) {
        let shape = self.shape(id);
        let TypeShape::Named(named) = &*shape else {
            invariant_violated("TypeEnv::complete_named", format!("{id:?} is not named"));
        };
        ensure(named.underlying.is_none(), "TypeEnv::complete_named", || {
            format!("`{}` completed twice", named.name)
        });
        self.arena.replace(
            id,
            TypeShape::Named(NamedType {
                underlying: Some(underlying),
                ..named.clone()
            }),
        );
    }

    /// Placeholder of known size that equals nothing.
    pub fn unknown_t(&self, size: u64) -> TypeId {
        ensure(size > 0, "TypeEnv::unknown_t", || "size must be set".to_owned());
        self.arena.alloc(TypeShape::Unknown { size })
    }

    /// Integer or float with the untyped flag cleared. Other types pass.
    pub fn as_typed(&self, id: TypeId) -> TypeId {
        match &*self.shape(id) {
            TypeShape::Int(t) if t.is_untyped() => self.int_type(t.as_typed()),
            TypeShape::Float(t) if t.is_untyped() => self.float_type(t.as_typed()),
            _ => id,
        }
    }

    /// Integer or float with the untyped flag set. Named types unwrap.
    pub fn as_untyped(&self, id: TypeId) -> TypeId {
        match &*self.resolve(id) {
            TypeShape::Int(t) => self.int_type(t.as_untyped()),
            TypeShape::Float(t) => self.float_type(t.as_untyped()),
            _ => id,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn shape(&self, id: TypeId) -> Arc<TypeShape> {
        self.arena.get(id)
    }

    /// Shape after unwrapping every named layer.
    pub fn resolve(&self, id: TypeId) -> Arc<TypeShape> {
        self.shape(self.unwrap(id))
    }

    /// Transitively strips named types. An incomplete named type is its
    /// own fixpoint.
    pub fn unwrap(&self, id: TypeId) -> TypeId {
        let mut cur = id;
        loop {
            match &*self.shape(cur) {
                TypeShape::Named(NamedType {
                    underlying: Some(next),
                    ..
                }) => cur = *next,
                _ => return cur,
            }
        }
    }

    pub fn kind(&self, id: TypeId) -> Kind {
        match &*self.resolve(id) {
            TypeShape::Unknown { .. } | TypeShape::Named(_) => Kind::UNKNOWN,
            TypeShape::Int(t) => t.kind(),
            TypeShape::Float(t) => t.kind(),
            TypeShape::Bool => Kind::BOOL,
            TypeShape::Ptr { null: true, .. } => Kind::NIL,
            TypeShape::Ptr { elem: None, .. } => Kind::UNSAFE_PTR,
            TypeShape::Ptr { .. } => Kind::PTR,
            TypeShape::Array(_) => Kind::ARRAY,
            TypeShape::Func(_) => Kind::FUNC,
            TypeShape::Struct(_) => Kind::STRUCT,
        }
    }

    /// Size in bytes as the legacy program sees it.
    pub fn sizeof(&self, id: TypeId) -> u64 {
        let ptr = u64::from(self.config.ptr_size);
        match &*self.resolve(id) {
            TypeShape::Unknown { size } => *size,
            TypeShape::Named(_) => ptr,
            TypeShape::Int(t) => u64::from(t.size()),
            TypeShape::Float(t) => u64::from(t.size()),
            TypeShape::Bool => 1,
            TypeShape::Ptr { .. } | TypeShape::Func(_) => ptr,
            TypeShape::Array(a) => a.len.max(1) * self.sizeof(a.elem),
            TypeShape::Struct(s) if s.union => {
                s.fields.iter().map(|f| self.sizeof(f.ty)).max().unwrap_or(0)
            }
            TypeShape::Struct(s) => s.fields.iter().map(|f| self.sizeof(f.ty)).sum::<u64>().max(1),
        }
    }

    pub fn is_named(&self, id: TypeId) -> bool {
        matches!(&*self.shape(id), TypeShape::Named(_))
    }

    pub fn int_of(&self, id: TypeId) -> Option<IntType> {
        match &*self.resolve(id) {
            TypeShape::Int(t) => Some(*t),
            _ => None,
        }
    }

    pub fn float_of(&self, id: TypeId) -> Option<FloatType> {
        match &*self.resolve(id) {
            TypeShape::Float(t) => Some(*t),
            _ => None,
        }
    }

    /// `Some(elem)` for pointer types, where `elem` is `None` for opaque
    /// and null pointers.
    pub fn ptr_elem(&self, id: TypeId) -> Option<Option<TypeId>> {
        match &*self.resolve(id) {
            TypeShape::Ptr { elem, .. } => Some(*elem),
            _ => None,
        }
    }

    /// Size of the pointee; `1` for opaque pointers.
    pub fn elem_sizeof(&self, ptr: TypeId) -> u64 {
        match self.ptr_elem(ptr).flatten() {
            Some(elem) => self.sizeof(elem),
            None => 1,
        }
    }

    /// Kind of the innermost non-pointer pointee.
    pub fn elem_kind(&self, ptr: TypeId) -> Kind {
        let mut cur = self.ptr_elem(ptr).flatten();
        while let Some(elem) = cur {
            match self.ptr_elem(elem) {
                Some(next) => cur = next,
                None => return self.kind(elem),
            }
        }
        Kind::UNSAFE_PTR
    }

    pub fn array_of(&self, id: TypeId) -> Option<ArrayType> {
        match &*self.resolve(id) {
            TypeShape::Array(a) => Some(a.clone()),
            _ => None,
        }
    }

    pub fn func_of(&self, id: TypeId) -> Option<FuncSig> {
        match &*self.resolve(id) {
            TypeShape::Func(f) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn struct_of(&self, id: TypeId) -> Option<StructType> {
        match &*self.resolve(id) {
            TypeShape::Struct(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Type of the named field of a struct or union.
    pub fn field_type(&self, id: TypeId, name: &str) -> Option<TypeId> {
        self.struct_of(id)?
            .fields
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.ty)
    }

    /// Pointer whose pointee is a function: the legacy spelling of a
    /// function value.
    pub fn func_ptr_of(&self, id: TypeId) -> Option<FuncSig> {
        self.ptr_elem(id).flatten().and_then(|elem| self.func_of(elem))
    }

    /// Legacy type by name, including `LP<name>` and `<name>_PTR`
    /// pointer spellings.
    pub fn lookup_c(&self, name: &str) -> Option<TypeId> {
        if let Some(t) = self.c.lookup(name) {
            return Some(t);
        }
        if let Some(elem) = name.strip_prefix("LP").and_then(|n| self.c.lookup(n)) {
            return Some(self.ptr_t(Some(elem)));
        }
        if let Some(elem) = name.strip_suffix("_PTR").and_then(|n| self.c.lookup(n)) {
            return Some(self.ptr_t(Some(elem)));
        }
        None
    }

    pub fn lookup_go(&self, name: &str) -> Option<TypeId> {
        self.go.lookup(name)
    }
}
