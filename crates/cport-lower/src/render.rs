//! Target source text for lowered expressions.
//!
//! Parenthesization is conservative: any compound operand is wrapped.

use std::fmt::Write;

use cport_types::{TypeEnv, TypeId};

use crate::expr::{BoolExpr, CompareOp, Expr, LogicalOp, PtrExpr, UnaryOp};

impl Expr {
    pub fn render(&self, env: &TypeEnv) -> String {
        let mut out = String::new();
        self.write(env, &mut out);
        out
    }

    fn write(&self, env: &TypeEnv, out: &mut String) {
        match self {
            Expr::Ident(id) => out.push_str(id.name()),
            Expr::Int(lit) => {
                let _ = write!(out, "{lit}");
            }
            Expr::Float(lit) => {
                let _ = write!(out, "{lit}");
            }
            Expr::Str(lit) => {
                let _ = write!(out, "{lit}");
            }
            Expr::Paren(x) => {
                out.push('(');
                x.write(env, out);
                out.push(')');
            }
            Expr::Unary { op, x } => {
                out.push_str(op.as_str());
                write_operand(env, out, x);
            }
            Expr::Binary { x, op, y, .. } => {
                write_operand(env, out, x);
                let _ = write!(out, " {} ", op.as_str());
                write_operand(env, out, y);
            }
            Expr::Call { func, args, .. } => {
                write_operand(env, out, func);
                write_args(env, out, args);
            }
            Expr::Helper { helper, args, .. } => {
                out.push_str(helper.name());
                write_args(env, out, args);
            }
            Expr::Index { x, index, .. } => {
                write_operand(env, out, x);
                out.push('[');
                index.write(env, out);
                out.push(']');
            }
            Expr::Select { x, field, .. } => {
                match &**x {
                    // the target dereferences on selection
                    Expr::Deref { ptr, .. } => ptr.write_operand(env, out),
                    x => write_operand(env, out, x),
                }
                out.push('.');
                out.push_str(field);
            }
            Expr::Convert { to, x } => {
                if env.kind(*to).is_untyped() {
                    x.write(env, out);
                    return;
                }
                out.push_str(&conv_type(env, *to));
                out.push('(');
                x.write(env, out);
                out.push(')');
            }
            Expr::Assert { to, x } => {
                write_operand(env, out, x);
                let _ = write!(out, ".({})", env.render(*to));
            }
            Expr::Zero(ty) => write_zero(env, out, *ty),
            Expr::ArrayFromString { to, x } => {
                let _ = write!(
                    out,
                    "func(s string) (r {}) {{ copy(r[:], s); return }}(",
                    env.render(*to)
                );
                x.write(env, out);
                out.push(')');
            }
            Expr::SliceOf { x, .. } => {
                write_operand(env, out, x);
                out.push_str("[:]");
            }
            Expr::Deref { ptr, .. } => {
                out.push('*');
                ptr.write_operand(env, out);
            }
            Expr::BoolToInt(b) => {
                out.push_str("libc.BoolToInt(");
                b.write(env, out);
                out.push(')');
            }
            Expr::PtrToInt { ptr, to } => {
                let addr = address(env, ptr);
                if *to == env.uint_ptr_t() {
                    out.push_str(&addr);
                } else {
                    let _ = write!(out, "{}({addr})", conv_type(env, *to));
                }
            }
            Expr::FuncToInt { func, to } => {
                let _ = write!(out, "{}(libc.FuncAddr(", conv_type(env, *to));
                func.write(env, out);
                out.push_str("))");
            }
            Expr::FuncAdapter { sig, body, .. } => {
                out.push_str(&env.render(*sig));
                let returns = env.func_of(*sig).is_some_and(|f| f.ret.is_some());
                out.push_str(if returns { " { return " } else { " { " });
                body.write(env, out);
                out.push_str(" }");
            }
            Expr::Spread(x) => {
                write_operand(env, out, x);
                out.push_str("...");
            }
            Expr::ToFunc { x, to } => {
                let t = env.render(*to);
                out.push_str("libc.AsFunc(");
                x.write(env, out);
                let _ = write!(out, ", (*{t})(nil)).({t})");
            }
            Expr::PtrDiff { x, y, ty } => {
                let _ = write!(
                    out,
                    "{}({} - {})",
                    conv_type(env, *ty),
                    address(env, x),
                    address(env, y)
                );
            }
            Expr::Bool(b) => b.write(env, out),
            Expr::Ptr(p) => p.write(env, out),
        }
    }
}

impl BoolExpr {
    pub fn render(&self, env: &TypeEnv) -> String {
        let mut out = String::new();
        self.write(env, &mut out);
        out
    }

    fn write(&self, env: &TypeEnv, out: &mut String) {
        match self {
            BoolExpr::Const(v) => {
                let _ = write!(out, "{v}");
            }
            BoolExpr::Value(x) => x.write(env, out),
            BoolExpr::Not(x) => {
                out.push('!');
                if x.is_compound() {
                    out.push('(');
                    x.write(env, out);
                    out.push(')');
                } else {
                    x.write(env, out);
                }
            }
            BoolExpr::Logical { x, op, y } => {
                write_logical_operand(env, out, x, *op);
                let _ = write!(out, " {} ", op.as_str());
                write_logical_operand(env, out, y, *op);
            }
            BoolExpr::Compare { x, op, y } => {
                write_operand(env, out, x);
                let _ = write!(out, " {} ", op.as_str());
                write_operand(env, out, y);
            }
            BoolExpr::PtrCompare { x, op, y } => write_ptr_compare(env, out, x, *op, y),
        }
    }
}

impl PtrExpr {
    pub fn render(&self, env: &TypeEnv) -> String {
        let mut out = String::new();
        self.write(env, &mut out);
        out
    }

    fn write(&self, env: &TypeEnv, out: &mut String) {
        match self {
            PtrExpr::Nil => out.push_str("nil"),
            PtrExpr::Value(x) => x.write(env, out),
            PtrExpr::TakeAddr(x) => {
                out.push('&');
                write_operand(env, out, x);
            }
            PtrExpr::IntToPtr { x, to } => {
                let raw = format!("unsafe.Pointer(uintptr({}))", x.render(env));
                out.push_str(&retype(env, *to, raw));
            }
            PtrExpr::PtrToPtr { x, to } => {
                let from = x.ptr_type(env);
                let inner = x.render(env);
                if env.kind(*to).is_unsafe_ptr() {
                    let _ = write!(out, "unsafe.Pointer({inner})");
                } else if env.kind(from).is_unsafe_ptr() {
                    let _ = write!(out, "{}({inner})", conv_type(env, *to));
                } else {
                    let _ = write!(out, "{}(unsafe.Pointer({inner}))", conv_type(env, *to));
                }
            }
            PtrExpr::Offset { x, bytes, .. } => {
                let sign = if *bytes < 0 { '-' } else { '+' };
                let raw = format!(
                    "unsafe.Pointer({} {sign} {})",
                    address(env, x),
                    bytes.unsigned_abs()
                );
                out.push_str(&retype(env, self.ptr_type(env), raw));
            }
            PtrExpr::ElemOffset { x, index, .. } => {
                let elem = env.ptr_elem(x.ptr_type(env)).flatten();
                let scale = match elem {
                    None => String::new(),
                    Some(elem) if env.kind(elem).is_struct() || env.kind(elem).is_array() => {
                        format!("unsafe.Sizeof({}{{}})*", env.render(elem))
                    }
                    Some(elem) => match env.sizeof(elem) {
                        1 => String::new(),
                        size => format!("{size}*"),
                    },
                };
                let (negative, index) = split_sign(env, index);
                let sign = if negative { '-' } else { '+' };
                let raw = format!(
                    "unsafe.Pointer({} {sign} {scale}uintptr({index}))",
                    address(env, x)
                );
                out.push_str(&retype(env, self.ptr_type(env), raw));
            }
            PtrExpr::VarOffset { x, mul, index, .. } => {
                let sign = if *mul < 0 { '-' } else { '+' };
                let scale = match mul.unsigned_abs() {
                    1 => String::new(),
                    m => format!("{m}*"),
                };
                let raw = format!(
                    "unsafe.Pointer({} {sign} {scale}uintptr({}))",
                    address(env, x),
                    index.render(env)
                );
                out.push_str(&retype(env, self.ptr_type(env), raw));
            }
            PtrExpr::Func(f) => {
                out.push_str("unsafe.Pointer(libc.FuncAddr(");
                f.write(env, out);
                out.push_str("))");
            }
        }
    }

    fn write_operand(&self, env: &TypeEnv, out: &mut String) {
        let compound = match self {
            PtrExpr::TakeAddr(_) => true,
            PtrExpr::Value(x) => x.is_compound(),
            _ => false,
        };
        if compound {
            out.push('(');
            self.write(env, out);
            out.push(')');
        } else {
            self.write(env, out);
        }
    }
}

fn write_operand(env: &TypeEnv, out: &mut String, x: &Expr) {
    if x.is_compound() {
        out.push('(');
        x.write(env, out);
        out.push(')');
    } else {
        x.write(env, out);
    }
}

fn write_args(env: &TypeEnv, out: &mut String, args: &[Expr]) {
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        arg.write(env, out);
    }
    out.push(')');
}

fn write_logical_operand(env: &TypeEnv, out: &mut String, x: &BoolExpr, parent: LogicalOp) {
    match x {
        BoolExpr::Logical { op, .. } if *op != parent => {
            out.push('(');
            x.write(env, out);
            out.push(')');
        }
        x => x.write(env, out),
    }
}

fn write_ptr_compare(env: &TypeEnv, out: &mut String, x: &PtrExpr, op: CompareOp, y: &PtrExpr) {
    let direct = if !op.is_equality() {
        false
    } else if x.is_nil() || y.is_nil() {
        true
    } else if x.const_addr().is_some() || y.const_addr().is_some() {
        false
    } else {
        env.same(x.ptr_type(env), y.ptr_type(env))
    };
    let (xs, ys) = if direct {
        (x.render(env), y.render(env))
    } else {
        (address(env, x), address(env, y))
    };
    let _ = write!(out, "{xs} {} {ys}", op.as_str());
}

/// Address of `p` as an address-width integer.
fn address(env: &TypeEnv, p: &PtrExpr) -> String {
    match p {
        PtrExpr::Nil => "uintptr(0)".to_owned(),
        PtrExpr::IntToPtr { x, .. } => format!("uintptr({})", x.render(env)),
        p if env.kind(p.ptr_type(env)).is_unsafe_ptr() => format!("uintptr({})", p.render(env)),
        p => format!("uintptr(unsafe.Pointer({}))", p.render(env)),
    }
}

/// Gives a raw `unsafe.Pointer` expression the pointer type `to`.
fn retype(env: &TypeEnv, to: TypeId, raw: String) -> String {
    if env.kind(to).is_unsafe_ptr() {
        return raw;
    }
    format!("{}({raw})", conv_type(env, to))
}

/// Type in conversion position, parenthesized where the target grammar
/// would otherwise misparse it.
fn conv_type(env: &TypeEnv, ty: TypeId) -> String {
    let s = env.render(ty);
    if s.starts_with('*') || s.starts_with("func") {
        format!("({s})")
    } else {
        s
    }
}

/// Index text without its sign, so offsets subtract instead of wrapping a
/// negative value into `uintptr`.
fn split_sign(env: &TypeEnv, index: &Expr) -> (bool, String) {
    if let Some(lit) = index.const_int() {
        return (lit.is_negative(), lit.magnitude().to_string());
    }
    match index {
        Expr::Unary {
            op: UnaryOp::Minus,
            x,
        } => (true, x.render(env)),
        x => (false, x.render(env)),
    }
}

fn write_zero(env: &TypeEnv, out: &mut String, ty: TypeId) {
    let kind = env.kind(ty);
    if kind.is_numeric() {
        out.push('0');
    } else if kind.is_bool() {
        out.push_str("false");
    } else if kind.is_ref() || env.array_of(ty).is_some_and(|a| a.slice) {
        out.push_str("nil");
    } else if kind.is_struct() || kind.is_array() {
        let _ = write!(out, "{}{{}}", env.render(ty));
    } else if ty == env.go().string() {
        out.push_str("\"\"");
    } else {
        out.push_str("nil");
    }
}
