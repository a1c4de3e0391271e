//! Kind algebra: a composable bitmask classification of every type.
//!
//! The major bits (`INT`, `FLOAT`, `BOOL`, `PTR`, `FUNC`, `STRUCT`, `ARRAY`)
//! select the dispatch category. The qualifier bits (`SIGNED`, `UNSIGNED`,
//! `UNTYPED`) only refine numeric decisions.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Type classification.
    ///
    /// The empty set is `Kind::UNKNOWN`: a placeholder type whose shape is
    /// not resolved yet.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Kind: u16 {
        const UNTYPED = 1 << 0;
        const UNSAFE = 1 << 1;
        const PTR = 1 << 2;
        const INT = 1 << 3;
        const FLOAT = 1 << 4;
        const BOOL = 1 << 5;
        const STRUCT = 1 << 6;
        const FUNC = 1 << 7;
        const ARRAY = 1 << 8;
        const SIGNED = 1 << 9;
        const UNSIGNED = 1 << 10;

        /// Opaque pointer (the target's raw address type).
        const UNSAFE_PTR = Self::UNSAFE.bits() | Self::PTR.bits();
        /// Integer constant whose width is not fixed yet.
        const UNTYPED_INT = Self::UNTYPED.bits() | Self::INT.bits();
        /// Floating constant whose width is not fixed yet.
        const UNTYPED_FLOAT = Self::UNTYPED.bits() | Self::FLOAT.bits();
        /// The null pointer constant.
        const NIL = Self::UNTYPED.bits() | Self::PTR.bits();
    }
}

/// Display order: combined kinds first so `NIL` prints as `Nil`, not
/// `Untyped|Ptr`.
const KIND_NAMES: &[(Kind, &str)] = &[
    (Kind::NIL, "Nil"),
    (Kind::UNTYPED_INT, "UntypedInt"),
    (Kind::UNTYPED_FLOAT, "UntypedFloat"),
    (Kind::UNSAFE_PTR, "UnsafePtr"),
    (Kind::UNSIGNED, "Unsigned"),
    (Kind::SIGNED, "Signed"),
    (Kind::INT, "Int"),
    (Kind::FLOAT, "Float"),
    (Kind::BOOL, "Bool"),
    (Kind::UNTYPED, "Untyped"),
    (Kind::PTR, "Ptr"),
    (Kind::ARRAY, "Array"),
    (Kind::FUNC, "Func"),
    (Kind::STRUCT, "Struct"),
];

impl Kind {
    pub const UNKNOWN: Kind = Kind::empty();

    const MAJOR: Kind = Kind::FUNC
        .union(Kind::PTR)
        .union(Kind::ARRAY)
        .union(Kind::STRUCT)
        .union(Kind::INT)
        .union(Kind::FLOAT)
        .union(Kind::BOOL);

    /// Bit-subset test. `UNKNOWN` only matches `UNKNOWN`.
    pub fn is(self, other: Kind) -> bool {
        if other.is_empty() {
            return self.is_empty();
        }
        self.contains(other)
    }

    /// Category without qualifier bits.
    pub fn major(self) -> Kind {
        self & Self::MAJOR
    }

    pub fn is_unknown(self) -> bool {
        self.is_empty()
    }

    pub fn is_untyped(self) -> bool {
        self.is(Kind::UNTYPED)
    }

    pub fn is_ptr(self) -> bool {
        self.is(Kind::PTR)
    }

    pub fn is_unsafe_ptr(self) -> bool {
        self.is(Kind::UNSAFE_PTR)
    }

    pub fn is_nil(self) -> bool {
        self.is(Kind::NIL)
    }

    pub fn is_func(self) -> bool {
        self.is(Kind::FUNC)
    }

    /// Pointer or function: anything that holds an address.
    pub fn is_ref(self) -> bool {
        self.is_ptr() || self.is_func()
    }

    pub fn is_int(self) -> bool {
        self.is(Kind::INT)
    }

    pub fn is_untyped_int(self) -> bool {
        self.is(Kind::UNTYPED_INT)
    }

    pub fn is_signed(self) -> bool {
        self.is(Kind::SIGNED)
    }

    pub fn is_unsigned(self) -> bool {
        self.is(Kind::UNSIGNED)
    }

    pub fn is_float(self) -> bool {
        self.is(Kind::FLOAT)
    }

    pub fn is_untyped_float(self) -> bool {
        self.is(Kind::UNTYPED_FLOAT)
    }

    pub fn is_numeric(self) -> bool {
        self.is_int() || self.is_float()
    }

    pub fn is_bool(self) -> bool {
        self.is(Kind::BOOL)
    }

    pub fn is_array(self) -> bool {
        self.is(Kind::ARRAY)
    }

    pub fn is_struct(self) -> bool {
        self.is(Kind::STRUCT)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Unknown");
        }
        let mut rest = *self;
        let mut first = true;
        for &(kind, name) in KIND_NAMES {
            if rest.contains(kind) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                rest.remove(kind);
                first = false;
            }
        }
        Ok(())
    }
}
