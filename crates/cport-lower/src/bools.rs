//! Boolean coercion and comparison lowering.

use tracing::trace;

use crate::expr::{BoolExpr, CompareOp, Expr, PtrExpr};
use crate::lower::Lower;

impl Lower<'_> {
    /// Canonical truth test for `x`.
    pub fn to_bool(&self, x: Expr) -> BoolExpr {
        let env = self.env();
        if let Expr::Bool(b) = x {
            return *b;
        }
        if let Expr::Paren(inner) = x {
            return self.to_bool(*inner);
        }
        let kind = env.kind(x.ctype(env));
        if kind.is_bool() {
            return BoolExpr::Value(Box::new(x));
        }
        if let Some(lit) = x.const_int() {
            if lit.is_zero() {
                return BoolExpr::Const(false);
            }
            if lit.is_one() {
                return BoolExpr::Const(true);
            }
        }
        if kind.is_nil() {
            return BoolExpr::Const(false);
        }
        if kind.is_ptr() || kind.is_array() {
            trace!("to_bool: non-nil pointer");
            let p = self.to_pointer(x);
            return BoolExpr::ptr_compare(p, CompareOp::Ne, PtrExpr::Nil);
        }
        if kind.is_func() {
            return BoolExpr::compare(x, CompareOp::Ne, Expr::Ptr(Box::new(PtrExpr::Nil)));
        }
        BoolExpr::compare(x, CompareOp::Ne, Expr::int(0))
    }

    /// Logical not of `x`, flipping comparisons instead of wrapping them.
    pub fn not(&self, x: Expr) -> BoolExpr {
        self.to_bool(x).negate()
    }

    /// Lowers `x op y`.
    pub fn compare(&self, x: Expr, op: CompareOp, y: Expr) -> BoolExpr {
        let env = self.env();
        let (xk, yk) = (env.kind(x.ctype(env)), env.kind(y.ctype(env)));

        if xk.is_func() || yk.is_func() {
            if y.is_zero_value() {
                return BoolExpr::compare(x, op, nil());
            }
            if x.is_zero_value() {
                return BoolExpr::compare(y, op.swap(), nil());
            }
            return self.compare_ptrs(self.to_pointer(x), op, self.to_pointer(y));
        }
        if xk.is_ptr() || yk.is_ptr() || xk.is_array() || yk.is_array() {
            return self.compare_ptrs(self.to_pointer(x), op, self.to_pointer(y));
        }
        if x.is_const() && !y.is_const() {
            return self.compare(y, op.swap(), x);
        }
        if op.is_equality() && xk.is_bool() {
            let constant = match &y {
                Expr::Bool(b) => b.const_value(),
                y => y.const_int().filter(|l| l.is_zero() || l.is_one()).map(|l| l.is_one()),
            };
            if let Some(value) = constant {
                trace!(value, "compare: bool against constant");
                let b = self.to_bool(x);
                return if value == (op == CompareOp::Eq) {
                    b
                } else {
                    b.negate()
                };
            }
        }
        let ty = env.common_type(x.ctype(env), y.ctype(env));
        BoolExpr::compare(self.cast(ty, x), op, self.cast(ty, y))
    }

    /// Pointer comparison. A null operand goes to the right.
    pub fn compare_ptrs(&self, x: PtrExpr, op: CompareOp, y: PtrExpr) -> BoolExpr {
        if x.is_nil() && !y.is_nil() {
            return BoolExpr::ptr_compare(y, op.swap(), x);
        }
        BoolExpr::ptr_compare(x, op, y)
    }
}

fn nil() -> Expr {
    Expr::Ptr(Box::new(PtrExpr::Nil))
}
