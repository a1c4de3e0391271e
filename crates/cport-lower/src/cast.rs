//! The cast dispatcher.
//!
//! `cast` is total: every (source, target) pair lowers to some expression of
//! the target type. Pairs with no dedicated lowering become an explicit
//! [`Expr::Convert`] and are left for the target compiler to judge.

use cport_types::{Field, FuncSig, IntType, TypeId};
use tracing::{debug, trace};

use crate::expr::{Expr, Helper, PtrExpr};
use crate::lower::Lower;

impl Lower<'_> {
    /// Converts `x` to `to`. Rules are tried in order; the first match wins.
    pub fn cast(&self, to: TypeId, x: Expr) -> Expr {
        let env = self.env();
        let go = env.go();
        let from = x.ctype(env);
        let (fk, tk) = (env.kind(from), env.kind(to));

        if from == go.iface() {
            trace!(to = %env.render(to), "cast: assert out of interface");
            return Expr::Assert {
                to,
                x: Box::new(x),
            };
        }
        if to == go.iface() {
            trace!("cast: into interface");
            return x;
        }
        if env.array_of(to).is_some_and(|a| a.slice) && x.is_zero_value() {
            trace!(to = %env.render(to), "cast: nil slice");
            return Expr::Zero(to);
        }
        if fk.is_array() && !tk.is_array() {
            trace!(to = %env.render(to), "cast: decay array");
            let p = self.addr(x);
            return self.cast(to, Expr::from_ptr(p));
        }
        if env.same(to, x.ctype_in(env, Some(to))) {
            trace!(to = %env.render(to), "cast: identity");
            return x;
        }
        if tk.is_unknown() {
            return self.cast_to_unknown(to, x, from);
        }
        if tk.is_bool() {
            trace!("cast: to bool");
            let b = Expr::from_bool(self.to_bool(x));
            if to == env.bool_t() {
                return b;
            }
            return Expr::convert(to, b);
        }
        if fk.is_nil() && tk.is_ref() {
            trace!(to = %env.render(to), "cast: nil");
            return x;
        }
        if from == go.string() {
            return self.cast_from_string(to, x);
        }
        if fk.is_unknown() {
            trace!(to = %env.render(to), "cast: unknown source");
            return Expr::convert(to, x);
        }
        if tk.is_ptr() {
            trace!(to = %env.render(to), "cast: to pointer");
            let p = self.to_pointer(x);
            return Expr::from_ptr(self.ptr_to_ptr(to, p));
        }
        if let Some(ti) = env.int_of(to) {
            return self.cast_to_int(to, ti, x);
        }
        if tk.is_func() {
            if x.is_zero_value() {
                trace!(to = %env.render(to), "cast: nil func");
                return Expr::Zero(to);
            }
            if !fk.is_func() {
                trace!(to = %env.render(to), "cast: value to func");
                return Expr::ToFunc {
                    x: Box::new(x),
                    to,
                };
            }
            if let (Some(ft), Some(fx)) = (env.func_of(to), env.func_of(from))
                && adapts(&ft, &fx)
            {
                trace!(to = %env.render(to), "cast: func adapter");
                return self.func_adapter(to, ft, fx, x);
            }
        }
        if tk.is_float() {
            if fk.is_untyped_float() {
                trace!("cast: untyped float");
                return x;
            }
            if fk.is_untyped_int() && x.is_const() {
                trace!("cast: untyped int constant to float");
                return Expr::convert(env.as_untyped(to), x);
            }
            if fk.is_bool() {
                trace!("cast: bool to float");
                return self.cast(to, self.bool_to_int(x));
            }
        }
        if let (Some(dst), Some(src)) = (env.array_of(to), env.array_of(from))
            && (dst.slice || dst.len == 0)
            && !src.slice
        {
            trace!(to = %env.render(to), "cast: array to slice");
            return Expr::SliceOf {
                to,
                x: Box::new(x),
            };
        }
        if tk.is_struct() && x.is_zero_value() {
            trace!(to = %env.render(to), "cast: zero struct");
            return Expr::Zero(to);
        }
        trace!(to = %env.render(to), from = %env.render(from), "cast: explicit conversion");
        Expr::convert(to, x)
    }

    /// Unresolved targets pass through, except the managed string, which
    /// is built from legacy strings by a runtime helper.
    fn cast_to_unknown(&self, to: TypeId, x: Expr, from: TypeId) -> Expr {
        let env = self.env();
        let (go, c) = (env.go(), env.c());
        if to == go.bytes() {
            trace!("cast: to byte slice");
            return Expr::convert(to, x);
        }
        if to != go.string() {
            trace!(to = %env.render(to), "cast: unknown target");
            return x;
        }
        if from == c.string() {
            trace!("cast: c string to string");
            return Expr::helper(Helper::GoString, x, to);
        }
        if from == c.wstring() {
            trace!("cast: wide string to string");
            return Expr::helper(Helper::GoWString, x, to);
        }
        if env.kind(from).is_unknown() {
            trace!("cast: unknown to string");
            return Expr::convert(to, x);
        }
        trace!("cast: via c string");
        let s = self.cast(c.string(), x);
        Expr::helper(Helper::GoString, s, to)
    }

    fn cast_from_string(&self, to: TypeId, x: Expr) -> Expr {
        let env = self.env();
        let c = env.c();
        if let Some(arr) = env.array_of(to) {
            if arr.slice {
                trace!("cast: string to slice");
                return Expr::convert(to, x);
            }
            trace!(to = %env.render(to), "cast: string copied into array");
            return Expr::ArrayFromString {
                to,
                x: Box::new(x),
            };
        }
        let wide = to == c.wstring() || matches!(&x, Expr::Str(lit) if lit.is_wide());
        let (helper, ty) = if wide {
            (Helper::CWString, c.wstring())
        } else {
            (Helper::CString, c.string())
        };
        trace!(wide, "cast: string to c string");
        self.cast(to, Expr::helper(helper, x, ty))
    }

    fn cast_to_int(&self, to: TypeId, ti: IntType, x: Expr) -> Expr {
        let env = self.env();
        let from = x.ctype(env);
        let fk = env.kind(from);

        if let Some(lit) = x.const_int() {
            if lit.fits(ti) {
                trace!(to = %env.render(to), "cast: constant fits");
                return Expr::convert(to, x);
            }
            let Some(wrapped) = lit.wrap_to(ti) else {
                trace!(to = %env.render(to), "cast: constant into odd-width int");
                return Expr::convert(to, x);
            };
            debug!(%lit, %wrapped, to = %env.render(to), "constant wrapped to fit");
            return self.cast(to, Expr::Int(wrapped));
        }
        if fk.is_func() {
            trace!(to = %env.render(to), "cast: func to int");
            return Expr::FuncToInt {
                func: Box::new(x),
                to,
            };
        }
        if fk.is_ptr() {
            trace!(to = %env.render(to), "cast: pointer to int");
            let p = self.to_pointer(x);
            return self.ptr_to_int(to, p);
        }
        if fk.is_untyped_int() && x.is_const() {
            trace!("cast: untyped constant expression");
            return x;
        }
        if fk.is_bool() {
            trace!(to = %env.render(to), "cast: bool to int");
            return self.cast(to, self.bool_to_int(x));
        }
        let Some(fi) = env.int_of(from) else {
            trace!(to = %env.render(to), "cast: numeric conversion");
            return Expr::convert(to, x);
        };
        if fi.is_signed() == ti.is_signed() || fi.size() == ti.size() {
            trace!(to = %env.render(to), "cast: int conversion");
            return Expr::convert(to, x);
        }
        // change width first, keeping the source signedness, so the sign
        // change is a same-width reinterpretation
        let step = env.int_type(IntType::new(ti.size(), fi.is_signed()));
        trace!(to = %env.render(to), via = %env.render(step), "cast: width then sign");
        Expr::convert(to, Expr::convert(step, x))
    }

    /// Wraps `f` in a literal of signature `ft` that forwards the leading
    /// arguments, converted to the parameter types of `fx`.
    fn func_adapter(&self, to: TypeId, ft: FuncSig, fx: FuncSig, f: Expr) -> Expr {
        let env = self.env();
        let params: Vec<Field> = ft
            .args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                let name = if arg.is_unnamed() {
                    format!("arg{}", i + 1)
                } else {
                    arg.name.clone()
                };
                Field::new(name, arg.ty)
            })
            .collect();
        let mut args: Vec<Expr> = params
            .iter()
            .zip(&fx.args)
            .map(|(param, arg)| self.cast(arg.ty, Expr::ident(&param.name, param.ty)))
            .collect();
        if ft.variadic {
            let rest = Expr::ident("_rest", env.go().iface_slice());
            args.push(Expr::Spread(Box::new(rest)));
        }
        let call = Expr::call(f, args, fx.ret);
        let body = match ft.ret {
            Some(ret) => self.cast(ret, call),
            None => call,
        };
        Expr::FuncAdapter {
            to,
            sig: env.func_t(ft.ret, params, ft.variadic),
            body: Box::new(body),
        }
    }

    pub(crate) fn bool_to_int(&self, x: Expr) -> Expr {
        Expr::BoolToInt(Box::new(self.to_bool(x)))
    }

    /// `x` as an address, for pointer targets and pointer arithmetic.
    pub fn to_pointer(&self, x: Expr) -> PtrExpr {
        let env = self.env();
        let kind = env.kind(x.ctype(env));
        match x {
            Expr::Ptr(p) => *p,
            x if kind.is_ptr() => PtrExpr::value(x),
            x if kind.is_array() => self.addr(x),
            x if kind.is_func() => PtrExpr::Func(Box::new(x)),
            x if kind.is_int() => self.int_to_ptr(env.unsafe_ptr_t(), x),
            x if kind.is_bool() => self.int_to_ptr(env.unsafe_ptr_t(), self.bool_to_int(x)),
            x if x.ctype(env) == env.go().string() => {
                PtrExpr::value(self.cast(env.c().string(), x))
            }
            x => PtrExpr::value(x),
        }
    }
}

/// A function of signature `from` can stand in for `to` behind an adapter:
/// `to` takes at least as many arguments, is variadic only when `from` is,
/// and expects a result only when `from` returns one.
fn adapts(to: &FuncSig, from: &FuncSig) -> bool {
    (!to.variadic || from.variadic)
        && to.args.len() >= from.args.len()
        && (to.ret.is_none() || from.ret.is_some())
}
