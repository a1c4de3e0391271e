//! Address-taking, dereference, offsets, differences and pointer
//! conversions.

use cport_types::TypeId;
use tracing::{debug, warn};

use crate::error::{LiteralError, Result};
use crate::expr::{Expr, PtrExpr, UnaryOp};
use crate::literal::IntLit;
use crate::lower::Lower;

impl Lower<'_> {
    /// `&x`. Arrays decay to the address of their first element.
    pub fn addr(&self, x: Expr) -> PtrExpr {
        let env = self.env();
        match x {
            Expr::Deref { ptr, .. } => *ptr,
            x => match env.array_of(x.ctype(env)) {
                Some(arr) => PtrExpr::take_addr(Expr::index(x, Expr::int(0), arr.elem)),
                None => PtrExpr::take_addr(x),
            },
        }
    }

    /// `*p`. An opaque pointer reads a byte.
    pub fn deref(&self, p: PtrExpr) -> Expr {
        let env = self.env();
        if let PtrExpr::TakeAddr(x) = p {
            return *x;
        }
        match env.ptr_elem(p.ptr_type(env)).flatten() {
            Some(ty) => Expr::Deref {
                ptr: Box::new(p),
                ty,
            },
            None => {
                let byte = env.go().byte();
                let p = self.ptr_to_ptr(env.ptr_t(Some(byte)), p);
                Expr::Deref {
                    ptr: Box::new(p),
                    ty: byte,
                }
            }
        }
    }

    /// Integer reinterpreted as an address of type `to`.
    pub fn int_to_ptr(&self, to: TypeId, x: Expr) -> PtrExpr {
        let env = self.env();
        match x.const_int() {
            Some(lit) if lit.is_zero() => PtrExpr::Nil,
            Some(lit) if lit.is_negative() => {
                let wrapped = lit.overflow_as_unsigned(env.ptr_size());
                debug!(%lit, %wrapped, "negative address wrapped");
                PtrExpr::IntToPtr {
                    x: Box::new(Expr::Int(wrapped)),
                    to,
                }
            }
            _ => PtrExpr::IntToPtr {
                x: Box::new(x),
                to,
            },
        }
    }

    /// Address value of `p` as integer type `to`.
    pub fn ptr_to_int(&self, to: TypeId, p: PtrExpr) -> Expr {
        match p {
            PtrExpr::Nil => self.cast(to, Expr::int(0)),
            PtrExpr::IntToPtr { x, .. } => self.cast(to, *x),
            p => Expr::PtrToInt {
                ptr: Box::new(p),
                to,
            },
        }
    }

    /// `p + index` (or `p - index` when `sub`), scaled by the pointee size.
    ///
    /// Constant indexes over scalar or opaque pointees become a precomputed
    /// byte offset; aggregate pointees and variable indexes scale at run
    /// time.
    pub fn ptr_offset(&self, p: PtrExpr, index: Expr, sub: bool) -> Result<PtrExpr> {
        let env = self.env();
        let ptype = p.ptr_type(env);
        let elem = env.ptr_elem(ptype).flatten();
        let size = env.elem_sizeof(ptype);
        let aggregate = elem.is_some_and(|e| {
            let k = env.kind(e);
            k.is_struct() || k.is_array()
        });

        if let Some(lit) = index.const_int() {
            let lit = if sub { lit.negate()? } else { lit };
            if lit.is_zero() {
                return Ok(p);
            }
            if aggregate {
                return Ok(PtrExpr::ElemOffset {
                    x: Box::new(p),
                    index: Box::new(Expr::Int(lit)),
                    conv: None,
                });
            }
            let bytes = byte_offset(lit, size)?;
            return Ok(match p {
                PtrExpr::Offset {
                    x,
                    bytes: base,
                    conv: None,
                } => {
                    let total = base
                        .checked_add(bytes)
                        .ok_or_else(|| LiteralError::TooLarge(format!("{base} + {bytes}")))?;
                    if total == 0 {
                        *x
                    } else {
                        PtrExpr::Offset {
                            x,
                            bytes: total,
                            conv: None,
                        }
                    }
                }
                p => PtrExpr::Offset {
                    x: Box::new(p),
                    bytes,
                    conv: None,
                },
            });
        }

        if size == 1 {
            return Ok(PtrExpr::VarOffset {
                x: Box::new(p),
                mul: if sub { -1 } else { 1 },
                index: Box::new(index),
                conv: None,
            });
        }
        let index = if sub {
            Expr::Unary {
                op: UnaryOp::Minus,
                x: Box::new(index),
            }
        } else {
            index
        };
        Ok(PtrExpr::ElemOffset {
            x: Box::new(p),
            index: Box::new(index),
            conv: None,
        })
    }

    /// `x - y` in bytes, signed, at address width.
    pub fn ptr_diff(&self, x: PtrExpr, y: PtrExpr) -> Expr {
        Expr::PtrDiff {
            x: Box::new(x),
            y: Box::new(y),
            ty: self.env().int_ptr_t(),
        }
    }

    /// Pointer conversion.
    ///
    /// Casting a pointer to a struct whose first field has the target
    /// pointee type yields the address of that field, when
    /// `first_field_aliasing` is enabled.
    pub fn ptr_to_ptr(&self, to: TypeId, p: PtrExpr) -> PtrExpr {
        let env = self.env();
        let from = p.ptr_type(env);
        if env.same(to, from) {
            return p;
        }
        match p {
            PtrExpr::Nil => PtrExpr::Nil,
            PtrExpr::IntToPtr { x, .. } => PtrExpr::IntToPtr { x, to },
            PtrExpr::PtrToPtr { x, .. } => self.ptr_to_ptr(to, *x),
            PtrExpr::Offset { x, bytes, .. } => PtrExpr::Offset {
                x,
                bytes,
                conv: Some(to),
            },
            PtrExpr::ElemOffset { x, index, .. } => PtrExpr::ElemOffset {
                x,
                index,
                conv: Some(to),
            },
            PtrExpr::VarOffset { x, mul, index, .. } => PtrExpr::VarOffset {
                x,
                mul,
                index,
                conv: Some(to),
            },
            p => match self.first_field(to, from) {
                Some((field, ty)) => {
                    debug!(
                        from = %env.render(from),
                        to = %env.render(to),
                        field,
                        "pointer aliased to first field"
                    );
                    let base = self.deref(p);
                    PtrExpr::take_addr(Expr::select(base, &field, ty))
                }
                None => PtrExpr::PtrToPtr {
                    x: Box::new(p),
                    to,
                },
            },
        }
    }

    /// First field of the struct `from` points to, when its type is the
    /// pointee of `to`.
    fn first_field(&self, to: TypeId, from: TypeId) -> Option<(String, TypeId)> {
        let env = self.env();
        if !env.config().first_field_aliasing {
            return None;
        }
        let target = env.ptr_elem(to).flatten()?;
        let record = env.struct_of(env.ptr_elem(from).flatten()?)?;
        let first = record.fields.into_iter().next()?;
        if record.union || first.is_unnamed() {
            return None;
        }
        if env.same(first.ty, target) {
            return Some((first.name, first.ty));
        }
        if env.kind(first.ty).is_struct() && env.kind(target).is_struct() {
            warn!(
                from = %env.render(from),
                to = %env.render(to),
                field = %first.name,
                "first field layout differs from cast target; converting the pointer"
            );
        }
        None
    }
}

fn byte_offset(lit: IntLit, size: u64) -> Result<i64> {
    let size = i64::try_from(size).map_err(|_| LiteralError::TooLarge(size.to_string()))?;
    lit.checked_mul(size)
        .and_then(IntLit::to_i64)
        .ok_or_else(|| LiteralError::TooLarge(format!("{lit} * {size}")).into())
}
