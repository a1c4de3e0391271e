//! Builtin type registries for both sides of the translation.
//!
//! [`GoTypes`] holds the target's predeclared types, [`CTypes`] the legacy
//! language's fundamental types and the common platform aliases. Both are
//! registered once when the environment is built.

use indexmap::IndexMap;

use crate::arena::TypeArena;
use crate::config::Config;
use crate::shape::{FloatType, IntType, NamedType, TypeId, TypeShape};

/// Predeclared target types.
#[derive(Debug, Clone)]
pub struct GoTypes {
    byte: TypeId,
    rune: TypeId,
    uintptr: TypeId,
    int: TypeId,
    uint: TypeId,
    string: TypeId,
    iface: TypeId,
    bytes: TypeId,
    iface_slice: TypeId,
    by_name: IndexMap<String, TypeId>,
}

impl GoTypes {
    pub(crate) fn register(arena: &TypeArena, config: &Config) -> Self {
        let ptr = u64::from(config.ptr_size);
        let named = |name: &str, underlying: TypeId| {
            arena.alloc(TypeShape::Named(NamedType {
                name: name.to_owned(),
                target: name.to_owned(),
                underlying: Some(underlying),
            }))
        };
        let opaque = |name: &str, words: u64| {
            let placeholder = arena.alloc(TypeShape::Unknown { size: ptr * words });
            named(name, placeholder)
        };
        let int_of = |t: IntType| arena.intern(TypeShape::Int(t)).0;

        let byte = named("byte", TypeId::UINT8);
        let rune = named("rune", TypeId::INT32);
        let uintptr = named("uintptr", int_of(IntType::unsigned(config.ptr_size)));
        let int = named("int", int_of(IntType::signed(config.int_size)));
        let uint = named("uint", int_of(IntType::unsigned(config.int_size)));
        let string = opaque("string", 3);
        let iface = opaque("interface{}", 2);
        let bytes = opaque("[]byte", 3);
        let iface_slice = opaque("[]interface{}", 3);

        let mut by_name = IndexMap::new();
        by_name.insert("bool".to_owned(), TypeId::BOOL);
        for (name, id) in [
            ("byte", byte),
            ("rune", rune),
            ("uintptr", uintptr),
            ("int", int),
            ("uint", uint),
            ("string", string),
            ("interface{}", iface),
            ("[]byte", bytes),
            ("[]interface{}", iface_slice),
            ("int8", TypeId::INT8),
            ("int16", TypeId::INT16),
            ("int32", TypeId::INT32),
            ("int64", TypeId::INT64),
            ("uint8", TypeId::UINT8),
            ("uint16", TypeId::UINT16),
            ("uint32", TypeId::UINT32),
            ("uint64", TypeId::UINT64),
            ("float32", TypeId::FLOAT32),
            ("float64", TypeId::FLOAT64),
            ("unsafe.Pointer", TypeId::UNSAFE_PTR),
        ] {
            by_name.insert(name.to_owned(), id);
        }

        Self {
            byte,
            rune,
            uintptr,
            int,
            uint,
            string,
            iface,
            bytes,
            iface_slice,
            by_name,
        }
    }

    pub fn bool(&self) -> TypeId {
        TypeId::BOOL
    }

    pub fn byte(&self) -> TypeId {
        self.byte
    }

    pub fn rune(&self) -> TypeId {
        self.rune
    }

    /// Address-width unsigned integer.
    pub fn uintptr(&self) -> TypeId {
        self.uintptr
    }

    pub fn int(&self) -> TypeId {
        self.int
    }

    pub fn uint(&self) -> TypeId {
        self.uint
    }

    pub fn string(&self) -> TypeId {
        self.string
    }

    /// The "any" interface.
    pub fn iface(&self) -> TypeId {
        self.iface
    }

    pub fn bytes(&self) -> TypeId {
        self.bytes
    }

    pub fn iface_slice(&self) -> TypeId {
        self.iface_slice
    }

    pub fn unsafe_ptr(&self) -> TypeId {
        TypeId::UNSAFE_PTR
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn is_builtin(&self, id: TypeId) -> bool {
        self.by_name.values().any(|&t| t == id)
    }
}

/// Fundamental legacy types.
#[derive(Debug, Clone)]
pub struct CTypes {
    char: TypeId,
    wchar: TypeId,
    int: TypeId,
    uint: TypeId,
    string: TypeId,
    wstring: TypeId,
    by_name: IndexMap<String, TypeId>,
}

impl CTypes {
    pub(crate) fn register(arena: &TypeArena, config: &Config, go: &GoTypes) -> Self {
        let int_of = |t: IntType| arena.intern(TypeShape::Int(t)).0;
        let ptr_to = |elem: TypeId| {
            arena
                .intern(TypeShape::Ptr {
                    elem: Some(elem),
                    null: false,
                })
                .0
        };

        let char = TypeId::INT8;
        let wchar_target = if config.wchar_size == 2 && !config.wchar_signed {
            "libc.WChar"
        } else {
            "wchar_t"
        };
        let wchar = arena.alloc(TypeShape::Named(NamedType {
            name: "wchar_t".to_owned(),
            target: wchar_target.to_owned(),
            underlying: Some(int_of(IntType::new(config.wchar_size, config.wchar_signed))),
        }));
        let (int, uint) = if config.use_go_int {
            (go.int(), go.uint())
        } else {
            (
                int_of(IntType::signed(config.int_size)),
                int_of(IntType::unsigned(config.int_size)),
            )
        };
        let float = arena.intern(TypeShape::Float(FloatType::new(4))).0;
        let double = arena.intern(TypeShape::Float(FloatType::new(8))).0;

        let mut by_name = IndexMap::new();
        for (name, id) in [
            ("bool", TypeId::BOOL),
            ("_Bool", TypeId::BOOL),
            ("char", char),
            ("signed char", TypeId::INT8),
            ("unsigned char", TypeId::UINT8),
            ("short", TypeId::INT16),
            ("unsigned short", TypeId::UINT16),
            ("int", int),
            ("unsigned int", uint),
            ("long", int),
            ("unsigned long", uint),
            ("long long", TypeId::INT64),
            ("unsigned long long", TypeId::UINT64),
            ("float", float),
            ("double", double),
            ("wchar_t", wchar),
            // platform aliases
            ("BOOL", TypeId::BOOL),
            ("CHAR", char),
            ("BYTE", go.byte()),
            ("_BYTE", go.byte()),
            ("INT", int),
            ("UINT", uint),
            ("LONG", int),
            ("ULONG", uint),
            ("LONGLONG", TypeId::INT64),
            ("ULONGLONG", TypeId::UINT64),
            ("WORD", TypeId::UINT16),
            ("_WORD", TypeId::UINT16),
            ("DWORD", TypeId::UINT32),
            ("_DWORD", TypeId::UINT32),
            ("QWORD", TypeId::UINT64),
            ("_QWORD", TypeId::UINT64),
        ] {
            by_name.insert(name.to_owned(), id);
        }

        Self {
            char,
            wchar,
            int,
            uint,
            string: ptr_to(go.byte()),
            wstring: ptr_to(wchar),
            by_name,
        }
    }

    pub fn char(&self) -> TypeId {
        self.char
    }

    pub fn wchar(&self) -> TypeId {
        self.wchar
    }

    pub fn int(&self) -> TypeId {
        self.int
    }

    pub fn uint(&self) -> TypeId {
        self.uint
    }

    /// `char*` as a C string.
    pub fn string(&self) -> TypeId {
        self.string
    }

    /// `wchar_t*` as a wide C string.
    pub fn wstring(&self) -> TypeId {
        self.wstring
    }

    /// Exact name lookup. Pointer spellings are resolved by
    /// [`crate::TypeEnv::lookup_c`].
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }
}
