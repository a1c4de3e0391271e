//! Type shapes stored in the arena.
//!
//! A `TypeShape` is the structural content of a type. Shapes that are equal
//! by value intern to the same `TypeId`, except `Named` and `Unknown`, which
//! are identities in their own right.

use crate::kind::Kind;

/// Handle to a type registered in a [`crate::TypeEnv`].
///
/// Comparing two ids is O(1). Equal ids always mean the same type; distinct
/// ids may still be [`crate::TypeEnv::same`] (e.g. an untyped constant and
/// a wider typed integer).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub const BOOL: TypeId = TypeId(0);
    pub const INT8: TypeId = TypeId(1);
    pub const INT16: TypeId = TypeId(2);
    pub const INT32: TypeId = TypeId(3);
    pub const INT64: TypeId = TypeId(4);
    pub const UINT8: TypeId = TypeId(5);
    pub const UINT16: TypeId = TypeId(6);
    pub const UINT32: TypeId = TypeId(7);
    pub const UINT64: TypeId = TypeId(8);
    pub const FLOAT32: TypeId = TypeId(9);
    pub const FLOAT64: TypeId = TypeId(10);
    /// Opaque pointer, `void*` in the legacy language.
    pub const UNSAFE_PTR: TypeId = TypeId(11);
    /// Type of the null pointer constant.
    pub const NIL: TypeId = TypeId(12);

    /// Number of ids reserved for primitives.
    pub const BUILTIN_COUNT: u32 = 13;

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }
}

/// Fixed-width integer.
///
/// `untyped` marks a constant whose width may still widen to fit context.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IntType {
    size: u32,
    signed: bool,
    untyped: bool,
}

impl IntType {
    pub const fn new(size: u32, signed: bool) -> Self {
        Self {
            size,
            signed,
            untyped: false,
        }
    }

    pub const fn signed(size: u32) -> Self {
        Self::new(size, true)
    }

    pub const fn unsigned(size: u32) -> Self {
        Self::new(size, false)
    }

    pub const fn untyped(size: u32, signed: bool) -> Self {
        Self {
            size,
            signed,
            untyped: true,
        }
    }

    pub fn size(self) -> u32 {
        self.size
    }

    pub fn bits(self) -> u32 {
        self.size * 8
    }

    pub fn is_signed(self) -> bool {
        self.signed
    }

    pub fn is_untyped(self) -> bool {
        self.untyped
    }

    pub fn as_typed(self) -> Self {
        Self {
            untyped: false,
            ..self
        }
    }

    pub fn as_untyped(self) -> Self {
        Self {
            untyped: true,
            ..self
        }
    }

    /// Same width and qualifiers, given signedness.
    pub fn with_signed(self, signed: bool) -> Self {
        Self { signed, ..self }
    }

    pub fn kind(self) -> Kind {
        let sign = if self.signed {
            Kind::SIGNED
        } else {
            Kind::UNSIGNED
        };
        if self.untyped {
            Kind::UNTYPED_INT | sign
        } else {
            Kind::INT | sign
        }
    }

    /// Largest value this type holds, as a magnitude.
    pub fn max_magnitude(self) -> u64 {
        let bits = self.bits();
        match (self.signed, bits) {
            (_, 0) => 0,
            (false, b) if b >= 64 => u64::MAX,
            (true, b) if b >= 64 => i64::MAX as u64,
            (false, b) => (1u64 << b) - 1,
            (true, b) => (1u64 << (b - 1)) - 1,
        }
    }

    /// Magnitude of the most negative value (`0` for unsigned).
    pub fn min_magnitude(self) -> u64 {
        match (self.signed, self.bits()) {
            (false, _) | (true, 0) => 0,
            (true, b) if b >= 64 => 1u64 << 63,
            (true, b) => 1u64 << (b - 1),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FloatType {
    size: u32,
    untyped: bool,
}

impl FloatType {
    pub const fn new(size: u32) -> Self {
        Self {
            size,
            untyped: false,
        }
    }

    pub const fn untyped(size: u32) -> Self {
        Self {
            size,
            untyped: true,
        }
    }

    pub fn size(self) -> u32 {
        self.size
    }

    pub fn is_untyped(self) -> bool {
        self.untyped
    }

    pub fn as_typed(self) -> Self {
        Self {
            untyped: false,
            ..self
        }
    }

    pub fn as_untyped(self) -> Self {
        Self {
            untyped: true,
            ..self
        }
    }

    pub fn kind(self) -> Kind {
        if self.untyped {
            Kind::UNTYPED_FLOAT
        } else {
            Kind::FLOAT
        }
    }
}

/// Struct field or function argument. An empty name means unnamed.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn unnamed(ty: TypeId) -> Self {
        Self::new(String::new(), ty)
    }

    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FuncSig {
    pub args: Vec<Field>,
    /// `None` for `void`.
    pub ret: Option<TypeId>,
    pub variadic: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ArrayType {
    pub elem: TypeId,
    /// Element count. Always `0` for slices.
    pub len: u64,
    pub slice: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct StructType {
    pub fields: Vec<Field>,
    pub union: bool,
}

/// Named (typedef'd) type.
///
/// `underlying` is `None` while a recursive declaration is being built.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct NamedType {
    /// Legacy name.
    pub name: String,
    /// Name rendered in target syntax.
    pub target: String,
    pub underlying: Option<TypeId>,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TypeShape {
    /// Placeholder of known size whose shape is not resolved (yet).
    Unknown { size: u64 },
    Int(IntType),
    Float(FloatType),
    Bool,
    /// `elem == None` is the opaque pointer; `null` marks the null constant.
    Ptr { elem: Option<TypeId>, null: bool },
    Array(ArrayType),
    Func(FuncSig),
    Struct(StructType),
    Named(NamedType),
}

impl TypeShape {
    /// Shapes allocated fresh on every request instead of being interned.
    pub fn is_identity(&self) -> bool {
        matches!(self, TypeShape::Named(_) | TypeShape::Unknown { .. })
    }
}
