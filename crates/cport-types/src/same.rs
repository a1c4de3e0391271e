//! Structural type equality.

use crate::env::TypeEnv;
use crate::shape::{IntType, TypeId, TypeShape};

/// Integer equality where an untyped side matches any typed integer of the
/// same signedness that is at least as wide.
pub fn same_int(x: IntType, y: IntType) -> bool {
    match (x.is_untyped(), y.is_untyped()) {
        (true, true) => x.is_signed() == y.is_signed(),
        (true, false) => x.size() <= y.size() && x.is_signed() == y.is_signed(),
        (false, true) => y.size() <= x.size() && x.is_signed() == y.is_signed(),
        (false, false) => x.size() == y.size() && x.is_signed() == y.is_signed(),
    }
}

impl TypeEnv {
    /// Structural equality.
    ///
    /// Bare placeholders are equal to nothing, not even themselves. Named
    /// types are equal only to themselves, except named pointers, which
    /// compare by pointee like any pointer.
    pub fn same(&self, x: TypeId, y: TypeId) -> bool {
        let (xs, ys) = (self.shape(x), self.shape(y));
        if matches!(*xs, TypeShape::Unknown { .. }) || matches!(*ys, TypeShape::Unknown { .. }) {
            return false;
        }
        if x == y {
            return true;
        }
        if self.kind(x).is_ptr() && self.kind(y).is_ptr() {
            return match (self.ptr_elem(x), self.ptr_elem(y)) {
                (Some(xe), Some(ye)) => self.same_opt(xe, ye),
                _ => false,
            };
        }
        match (&*xs, &*ys) {
            (TypeShape::Int(a), TypeShape::Int(b)) => same_int(*a, *b),
            (TypeShape::Array(a), TypeShape::Array(b)) => {
                a.len == b.len && a.slice == b.slice && self.same(a.elem, b.elem)
            }
            (TypeShape::Func(a), TypeShape::Func(b)) => {
                a.variadic == b.variadic
                    && self.same_opt(a.ret, b.ret)
                    && a.args.len() == b.args.len()
                    && a.args.iter().zip(&b.args).all(|(p, q)| self.same(p.ty, q.ty))
            }
            _ => false,
        }
    }

    /// [`Self::same`] lifted over "no type" (`void`): two absent types are
    /// equal, an absent and a present one are not.
    pub fn same_opt(&self, x: Option<TypeId>, y: Option<TypeId>) -> bool {
        match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => self.same(x, y),
            _ => false,
        }
    }
}
