//! Binary and unary operator lowering.

use tracing::trace;

use cport_types::Kind;

use crate::error::Result;
use crate::expr::{BinaryOp, Expr, PtrExpr, UnaryOp};
use crate::lower::Lower;

impl Lower<'_> {
    /// Lowers `x op y` under the usual arithmetic conversions, routing
    /// pointer operands through address arithmetic.
    pub fn binary(&self, x: Expr, op: BinaryOp, y: Expr) -> Result<Expr> {
        let env = self.env();
        let (mut x, mut y) = (x, y);
        if op.is_commutative() {
            let yk = env.kind(y.ctype(env));
            let xk = env.kind(x.ctype(env));
            let ptr_right = (yk.is_ptr() || yk.is_array()) && !(xk.is_ptr() || xk.is_array());
            if ptr_right || (x.is_const() && !y.is_const()) {
                std::mem::swap(&mut x, &mut y);
            }
        }
        let (xk, yk) = (env.kind(x.ctype(env)), env.kind(y.ctype(env)));

        if xk.is_func() && !x.is_const() && (yk.is_int() || yk.is_ref()) {
            let x = self.cast(env.unsafe_ptr_t(), x);
            return self.binary(x, op, y);
        }
        if yk.is_func() && !y.is_const() && (xk.is_int() || xk.is_ref()) {
            let y = self.cast(env.unsafe_ptr_t(), y);
            return self.binary(x, op, y);
        }

        let addr_like = |k: Kind| k.is_ptr() || k.is_array();
        if matches!(op, BinaryOp::Add | BinaryOp::Sub) && addr_like(xk) && yk.is_int() {
            return self.ptr_arith(x, op, y);
        }
        if op == BinaryOp::Sub && addr_like(xk) && addr_like(yk) {
            trace!("binary: pointer difference");
            let (px, py) = (self.to_pointer(x), self.to_pointer(y));
            return Ok(self.ptr_diff(px, py));
        }

        if op.is_shift() {
            let ty = env.common_type(x.ctype(env), x.ctype(env));
            return Ok(Expr::Binary {
                x: Box::new(self.cast(ty, x)),
                op,
                y: Box::new(y),
                ty,
            });
        }

        let ty = env.common_type(x.ctype(env), y.ctype(env));
        Ok(Expr::Binary {
            x: Box::new(self.cast(ty, x)),
            op,
            y: Box::new(self.cast(ty, y)),
            ty,
        })
    }

    /// Pointer or array plus or minus an integer.
    fn ptr_arith(&self, x: Expr, op: BinaryOp, y: Expr) -> Result<Expr> {
        let env = self.env();
        let sub = op == BinaryOp::Sub;
        if !sub && let Some(arr) = env.array_of(x.ctype(env)) {
            trace!("binary: array plus index");
            let elem = Expr::index(x, y, arr.elem);
            return Ok(Expr::from_ptr(PtrExpr::take_addr(elem)));
        }
        let p = match self.to_pointer(x) {
            // &a[i] ± j is &a[i ± j]
            PtrExpr::TakeAddr(inner) => match *inner {
                Expr::Index { x: base, index, ty } => {
                    trace!("binary: fold offset into index");
                    let index = self.binary(*index, op, y)?;
                    return Ok(Expr::from_ptr(PtrExpr::take_addr(Expr::Index {
                        x: base,
                        index: Box::new(index),
                        ty,
                    })));
                }
                other => PtrExpr::take_addr(other),
            },
            p => p,
        };
        trace!(sub, "binary: pointer offset");
        Ok(Expr::from_ptr(self.ptr_offset(p, y, sub)?))
    }

    /// Lowers a unary operator. Negating a constant folds into the literal.
    pub fn unary(&self, op: UnaryOp, x: Expr) -> Result<Expr> {
        match (op, x) {
            (UnaryOp::Plus, x) => Ok(x),
            (UnaryOp::Minus, Expr::Int(lit)) => Ok(Expr::Int(lit.negate()?)),
            (UnaryOp::Minus, Expr::Float(lit)) => Ok(Expr::Float(lit.negate())),
            (op, x) => Ok(Expr::Unary {
                op,
                x: Box::new(x),
            }),
        }
    }
}
