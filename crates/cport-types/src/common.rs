//! Usual arithmetic conversions.

use cport_core::invariants::invariant_violated;

use crate::env::TypeEnv;
use crate::kind::Kind;
use crate::shape::{IntType, TypeId};

impl TypeEnv {
    /// Shared evaluation type for the operands of a binary operator.
    ///
    /// The result is never untyped when either operand has a concrete
    /// numeric type.
    pub fn common_type(&self, x: TypeId, y: TypeId) -> TypeId {
        let (xk, yk) = (self.kind(x), self.kind(y));
        if x == y && !xk.is_int() {
            return x;
        }
        if self.sizeof(x) < self.sizeof(y) {
            return self.common_type(y, x);
        }
        let out = self.common_type_sorted(x, xk, y, yk);
        let typed_numeric =
            (xk.is_numeric() && !xk.is_untyped()) || (yk.is_numeric() && !yk.is_untyped());
        if typed_numeric && self.kind(out).is_untyped() {
            invariant_violated(
                "TypeEnv::common_type",
                format!("untyped {out:?} for {x:?} ({xk}) and {y:?} ({yk})"),
            );
        }
        out
    }

    /// `x` is at least as wide as `y`.
    fn common_type_sorted(&self, x: TypeId, xk: Kind, y: TypeId, yk: Kind) -> TypeId {
        // int paired with float: the float wins, typed
        if xk.is_int() && yk.is_float() {
            return self.as_typed(self.unwrap(y));
        }
        if xk.is_float() && yk.is_int() {
            return self.as_typed(self.unwrap(x));
        }

        if let (Some(xi), Some(yi)) = (self.int_of(x), self.int_of(y)) {
            return self.common_int(x, xi, y, yi);
        }

        // bool never survives arithmetic
        if xk.is_int() && yk.is_bool() {
            return self.typed_or_default(x, xk);
        }
        if xk.is_bool() && yk.is_int() {
            return self.typed_or_default(y, yk);
        }

        // array in pointer arithmetic decays to a pointer to its element
        if let Some(arr) = self.array_of(x).filter(|_| yk.is_int()) {
            return self.ptr_t(Some(arr.elem));
        }
        if let Some(arr) = self.array_of(y).filter(|_| xk.is_int()) {
            return self.ptr_t(Some(arr.elem));
        }

        if xk.is_untyped() && !yk.is_untyped() {
            return y;
        }
        x
    }

    fn common_int(&self, x: TypeId, xi: IntType, y: TypeId, yi: IntType) -> TypeId {
        let def = self.def_int_t();
        let def_size = self.sizeof(def) as u32;

        // typed int against an untyped constant: the typed side wins
        if !xi.is_untyped() && yi.is_untyped() {
            return x;
        }
        // the constant is wider than the typed side
        if xi.is_untyped() && !yi.is_untyped() {
            if xi.size() == yi.size() {
                return y;
            }
            return if yi.is_signed() {
                def
            } else {
                self.def_uint_t()
            };
        }

        let (xt, yt) = (xi.as_typed(), yi.as_typed());
        if xt.size() < def_size && yt.size() < def_size {
            return def;
        }
        let x = self.typed_id(x, xi);
        let y = self.typed_id(y, yi);
        if xt.is_signed() == yt.is_signed() {
            if xt.size() != yt.size() {
                return if xt.size() > yt.size() { x } else { y };
            }
            // same width and sign: prefer the unnamed spelling
            return if self.is_named(x) && !self.is_named(y) { y } else { x };
        }
        let (u, ut, s, st) = if xt.is_signed() {
            (y, yt, x, xt)
        } else {
            (x, xt, y, yt)
        };
        if ut.size() >= st.size() { u } else { s }
    }

    fn typed_id(&self, id: TypeId, t: IntType) -> TypeId {
        if t.is_untyped() {
            self.int_type(t.as_typed())
        } else {
            id
        }
    }

    fn typed_or_default(&self, id: TypeId, k: Kind) -> TypeId {
        if k.is_untyped() { self.def_int_t() } else { id }
    }
}
