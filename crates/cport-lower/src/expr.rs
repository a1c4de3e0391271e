//! Expression model produced by the lowering passes.
//!
//! Three closed families: [`Expr`] for values, [`BoolExpr`] for truth tests
//! and [`PtrExpr`] for addresses. Each node knows its type through the
//! environment and renders to target source text (see `render.rs`).

use cport_core::escape_ident;
use cport_core::invariants::invariant_violated;
use cport_types::{TypeEnv, TypeId};

use crate::literal::{FloatLit, IntLit, StringLit};

/// Reference to a declared variable or function.
#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    name: String,
    ty: TypeId,
}

impl Ident {
    /// `name` is the legacy spelling; the target spelling is derived here.
    pub fn new(name: &str, ty: TypeId) -> Self {
        Self {
            name: escape_ident(name),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    BitNot,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitNot => "^",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        }
    }

    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Mul | BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor
        )
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Operator testing the opposite condition.
    pub fn negate(self) -> Self {
        match self {
            CompareOp::Eq => CompareOp::Ne,
            CompareOp::Ne => CompareOp::Eq,
            CompareOp::Lt => CompareOp::Ge,
            CompareOp::Ge => CompareOp::Lt,
            CompareOp::Gt => CompareOp::Le,
            CompareOp::Le => CompareOp::Gt,
        }
    }

    /// Operator with the operands swapped: `a < b` is `b > a`.
    pub fn swap(self) -> Self {
        match self {
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Le => CompareOp::Ge,
            CompareOp::Ge => CompareOp::Le,
            op => op,
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }

    fn dual(self) -> Self {
        match self {
            LogicalOp::And => LogicalOp::Or,
            LogicalOp::Or => LogicalOp::And,
        }
    }
}

/// Runtime support routines for string representations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Helper {
    /// `char*` to managed string.
    GoString,
    /// `wchar_t*` to managed string.
    GoWString,
    /// Managed string to a fresh `char*`.
    CString,
    /// Managed string to a fresh `wchar_t*`.
    CWString,
}

impl Helper {
    pub fn name(self) -> &'static str {
        match self {
            Helper::GoString => "libc.GoString",
            Helper::GoWString => "libc.GoWString",
            Helper::CString => "libc.CString",
            Helper::CWString => "libc.CWString",
        }
    }
}

/// Value expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Int(IntLit),
    Float(FloatLit),
    Str(StringLit),
    Paren(Box<Expr>),
    Unary {
        op: UnaryOp,
        x: Box<Expr>,
    },
    Binary {
        x: Box<Expr>,
        op: BinaryOp,
        y: Box<Expr>,
        ty: TypeId,
    },
    /// `ret` is `None` for a `void` call, which has no value.
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        ret: Option<TypeId>,
    },
    Helper {
        helper: Helper,
        args: Vec<Expr>,
        ty: TypeId,
    },
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
        ty: TypeId,
    },
    Select {
        x: Box<Expr>,
        field: String,
        ty: TypeId,
    },
    /// Explicit conversion; also the fallback for pairs with no dedicated
    /// lowering.
    Convert {
        to: TypeId,
        x: Box<Expr>,
    },
    /// Type assertion out of the "any" interface.
    Assert {
        to: TypeId,
        x: Box<Expr>,
    },
    /// Zero value of a type.
    Zero(TypeId),
    /// Bounded copy of a managed string into a fixed-length array.
    ArrayFromString {
        to: TypeId,
        x: Box<Expr>,
    },
    /// Length-erasing view of a fixed-length array.
    SliceOf {
        to: TypeId,
        x: Box<Expr>,
    },
    Deref {
        ptr: Box<PtrExpr>,
        ty: TypeId,
    },
    BoolToInt(Box<BoolExpr>),
    PtrToInt {
        ptr: Box<PtrExpr>,
        to: TypeId,
    },
    FuncToInt {
        func: Box<Expr>,
        to: TypeId,
    },
    /// Function literal calling a function of a narrower signature.
    /// `sig` names the literal's parameters; `body` is the adapted call.
    FuncAdapter {
        to: TypeId,
        sig: TypeId,
        body: Box<Expr>,
    },
    /// Variadic argument expansion, `x...`.
    Spread(Box<Expr>),
    /// Non-function value reinterpreted as a function.
    ToFunc {
        x: Box<Expr>,
        to: TypeId,
    },
    /// Raw byte distance between two addresses.
    PtrDiff {
        x: Box<PtrExpr>,
        y: Box<PtrExpr>,
        ty: TypeId,
    },
    Bool(Box<BoolExpr>),
    Ptr(Box<PtrExpr>),
}

impl Expr {
    pub fn ident(name: &str, ty: TypeId) -> Self {
        Expr::Ident(Ident::new(name, ty))
    }

    pub fn int(value: i64) -> Self {
        Expr::Int(IntLit::from_i64(value))
    }

    pub fn call(func: Expr, args: Vec<Expr>, ret: Option<TypeId>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
            ret,
        }
    }

    pub fn index(x: Expr, index: Expr, ty: TypeId) -> Self {
        Expr::Index {
            x: Box::new(x),
            index: Box::new(index),
            ty,
        }
    }

    pub fn select(x: Expr, field: &str, ty: TypeId) -> Self {
        Expr::Select {
            x: Box::new(x),
            field: escape_ident(field),
            ty,
        }
    }

    pub fn convert(to: TypeId, x: Expr) -> Self {
        Expr::Convert { to, x: Box::new(x) }
    }

    pub(crate) fn helper(helper: Helper, x: Expr, ty: TypeId) -> Self {
        Expr::Helper {
            helper,
            args: vec![x],
            ty,
        }
    }

    /// Wraps a truth test, unwrapping a test that only wraps a value.
    pub fn from_bool(b: BoolExpr) -> Self {
        match b {
            BoolExpr::Value(x) => *x,
            b => Expr::Bool(Box::new(b)),
        }
    }

    /// Wraps an address, unwrapping an address that only wraps a value.
    pub fn from_ptr(p: PtrExpr) -> Self {
        match p {
            PtrExpr::Value(x) => *x,
            p => Expr::Ptr(Box::new(p)),
        }
    }

    /// Type of the expression in isolation.
    pub fn ctype(&self, env: &TypeEnv) -> TypeId {
        match self {
            Expr::Ident(id) => id.ty,
            Expr::Int(lit) => lit.ctype_in(env, None),
            Expr::Float(lit) => lit.ctype_in(env, None),
            Expr::Str(_) => env.go().string(),
            Expr::Paren(x) | Expr::Unary { x, .. } | Expr::Spread(x) => x.ctype(env),
            Expr::Call { ret: Some(ret), .. } => *ret,
            Expr::Call { func, .. } => invariant_violated(
                "Expr::ctype",
                format!("void call used as a value: {func:?}"),
            ),
            Expr::Binary { ty, .. }
            | Expr::Helper { ty, .. }
            | Expr::Index { ty, .. }
            | Expr::Select { ty, .. }
            | Expr::Deref { ty, .. }
            | Expr::PtrDiff { ty, .. } => *ty,
            Expr::Convert { to, .. }
            | Expr::Assert { to, .. }
            | Expr::ArrayFromString { to, .. }
            | Expr::SliceOf { to, .. }
            | Expr::PtrToInt { to, .. }
            | Expr::FuncToInt { to, .. }
            | Expr::FuncAdapter { to, .. }
            | Expr::ToFunc { to, .. } => *to,
            Expr::Zero(to) => *to,
            Expr::BoolToInt(_) => env.go().int(),
            Expr::Bool(_) => env.bool_t(),
            Expr::Ptr(p) => p.ptr_type(env),
        }
    }

    /// Type of the expression where `exp` is expected. Constants adopt the
    /// expected type when they fit it.
    pub fn ctype_in(&self, env: &TypeEnv, exp: Option<TypeId>) -> TypeId {
        match self {
            Expr::Int(lit) => lit.ctype_in(env, exp),
            Expr::Float(lit) => lit.ctype_in(env, exp),
            Expr::Paren(x) => x.ctype_in(env, exp),
            Expr::Unary { x, .. } if x.is_const() => x.ctype_in(env, exp),
            _ => self.ctype(env),
        }
    }

    pub fn is_const(&self) -> bool {
        match self {
            Expr::Int(_) | Expr::Float(_) | Expr::Str(_) | Expr::Zero(_) => true,
            Expr::Paren(x) | Expr::Unary { x, .. } | Expr::Convert { x, .. } => x.is_const(),
            Expr::Binary { x, y, .. } => x.is_const() && y.is_const(),
            Expr::Bool(b) => b.is_const(),
            Expr::Ptr(p) => p.is_const(),
            _ => false,
        }
    }

    pub fn has_side_effects(&self) -> bool {
        match self {
            Expr::Call { .. } => true,
            Expr::Ident(_)
            | Expr::Int(_)
            | Expr::Float(_)
            | Expr::Str(_)
            | Expr::Zero(_)
            | Expr::FuncAdapter { .. } => false,
            Expr::Helper { args, .. } => args.iter().any(Expr::has_side_effects),
            Expr::Paren(x)
            | Expr::Spread(x)
            | Expr::Unary { x, .. }
            | Expr::Select { x, .. }
            | Expr::Convert { x, .. }
            | Expr::Assert { x, .. }
            | Expr::ArrayFromString { x, .. }
            | Expr::SliceOf { x, .. }
            | Expr::ToFunc { x, .. }
            | Expr::FuncToInt { func: x, .. } => x.has_side_effects(),
            Expr::Binary { x, y, .. } | Expr::Index { x, index: y, .. } => {
                x.has_side_effects() || y.has_side_effects()
            }
            Expr::Deref { ptr, .. } | Expr::PtrToInt { ptr, .. } => ptr.has_side_effects(),
            Expr::PtrDiff { x, y, .. } => x.has_side_effects() || y.has_side_effects(),
            Expr::BoolToInt(b) | Expr::Bool(b) => b.has_side_effects(),
            Expr::Ptr(p) => p.has_side_effects(),
        }
    }

    /// Integer constant value, seeing through parentheses and unary sign.
    pub fn const_int(&self) -> Option<IntLit> {
        match self {
            Expr::Int(lit) => Some(*lit),
            Expr::Paren(x)
            | Expr::Unary {
                op: UnaryOp::Plus,
                x,
            } => x.const_int(),
            Expr::Unary {
                op: UnaryOp::Minus,
                x,
            } => x.const_int()?.negate().ok(),
            _ => None,
        }
    }

    /// Literal zero of any family: `0`, `0.0`, `nil` or a zero value.
    pub fn is_zero_value(&self) -> bool {
        match self {
            Expr::Float(lit) => lit.is_zero(),
            Expr::Zero(_) => true,
            Expr::Ptr(p) => matches!(**p, PtrExpr::Nil),
            _ => self.const_int().is_some_and(IntLit::is_zero),
        }
    }

    /// Whether the expression must be parenthesized as an operand.
    pub(crate) fn is_compound(&self) -> bool {
        match self {
            Expr::Int(lit) => lit.is_negative(),
            Expr::Float(lit) => lit.value().is_sign_negative(),
            Expr::Unary { .. } | Expr::Binary { .. } | Expr::PtrDiff { .. } => true,
            Expr::Bool(b) => b.is_compound(),
            Expr::Deref { .. } => true,
            _ => false,
        }
    }
}

/// Truth test.
#[derive(Clone, Debug, PartialEq)]
pub enum BoolExpr {
    Const(bool),
    /// Any boolean-typed value that is not itself a test.
    Value(Box<Expr>),
    Not(Box<BoolExpr>),
    Logical {
        x: Box<BoolExpr>,
        op: LogicalOp,
        y: Box<BoolExpr>,
    },
    Compare {
        x: Box<Expr>,
        op: CompareOp,
        y: Box<Expr>,
    },
    PtrCompare {
        x: Box<PtrExpr>,
        op: CompareOp,
        y: Box<PtrExpr>,
    },
}

impl BoolExpr {
    pub fn and(x: BoolExpr, y: BoolExpr) -> Self {
        Self::logical(x, LogicalOp::And, y)
    }

    pub fn or(x: BoolExpr, y: BoolExpr) -> Self {
        Self::logical(x, LogicalOp::Or, y)
    }

    fn logical(x: BoolExpr, op: LogicalOp, y: BoolExpr) -> Self {
        BoolExpr::Logical {
            x: Box::new(x),
            op,
            y: Box::new(y),
        }
    }

    pub(crate) fn compare(x: Expr, op: CompareOp, y: Expr) -> Self {
        BoolExpr::Compare {
            x: Box::new(x),
            op,
            y: Box::new(y),
        }
    }

    pub(crate) fn ptr_compare(x: PtrExpr, op: CompareOp, y: PtrExpr) -> Self {
        BoolExpr::PtrCompare {
            x: Box::new(x),
            op,
            y: Box::new(y),
        }
    }

    /// Opposite condition. Comparisons flip their operator and logical
    /// operators follow De Morgan, so only opaque values gain a `!`.
    pub fn negate(self) -> Self {
        match self {
            BoolExpr::Const(v) => BoolExpr::Const(!v),
            BoolExpr::Not(x) => *x,
            BoolExpr::Compare { x, op, y } => BoolExpr::Compare {
                x,
                op: op.negate(),
                y,
            },
            BoolExpr::PtrCompare { x, op, y } => BoolExpr::PtrCompare {
                x,
                op: op.negate(),
                y,
            },
            BoolExpr::Logical { x, op, y } => BoolExpr::Logical {
                x: Box::new(x.negate()),
                op: op.dual(),
                y: Box::new(y.negate()),
            },
            value @ BoolExpr::Value(_) => BoolExpr::Not(Box::new(value)),
        }
    }

    pub fn is_const(&self) -> bool {
        match self {
            BoolExpr::Const(_) => true,
            BoolExpr::Value(x) => x.is_const(),
            BoolExpr::Not(x) => x.is_const(),
            BoolExpr::Logical { x, y, .. } => x.is_const() && y.is_const(),
            BoolExpr::Compare { x, y, .. } => x.is_const() && y.is_const(),
            BoolExpr::PtrCompare { x, y, .. } => x.is_const() && y.is_const(),
        }
    }

    pub fn has_side_effects(&self) -> bool {
        match self {
            BoolExpr::Const(_) => false,
            BoolExpr::Value(x) => x.has_side_effects(),
            BoolExpr::Not(x) => x.has_side_effects(),
            BoolExpr::Logical { x, y, .. } => x.has_side_effects() || y.has_side_effects(),
            BoolExpr::Compare { x, y, .. } => x.has_side_effects() || y.has_side_effects(),
            BoolExpr::PtrCompare { x, y, .. } => x.has_side_effects() || y.has_side_effects(),
        }
    }

    /// Evaluates a test built only from constants.
    pub fn const_value(&self) -> Option<bool> {
        match self {
            BoolExpr::Const(v) => Some(*v),
            BoolExpr::Not(x) => x.const_value().map(|v| !v),
            BoolExpr::Logical { x, op, y } => {
                let (x, y) = (x.const_value()?, y.const_value()?);
                Some(match op {
                    LogicalOp::And => x && y,
                    LogicalOp::Or => x || y,
                })
            }
            BoolExpr::Compare { x, op, y } => {
                let (x, y) = (x.const_int()?.to_i128(), y.const_int()?.to_i128());
                Some(match op {
                    CompareOp::Eq => x == y,
                    CompareOp::Ne => x != y,
                    CompareOp::Lt => x < y,
                    CompareOp::Le => x <= y,
                    CompareOp::Gt => x > y,
                    CompareOp::Ge => x >= y,
                })
            }
            BoolExpr::Value(_) | BoolExpr::PtrCompare { .. } => None,
        }
    }

    pub(crate) fn is_compound(&self) -> bool {
        match self {
            BoolExpr::Const(_) | BoolExpr::Not(_) => false,
            BoolExpr::Value(x) => x.is_compound(),
            _ => true,
        }
    }
}

/// Address expression.
#[derive(Clone, Debug, PartialEq)]
pub enum PtrExpr {
    Nil,
    /// Any pointer-typed value that is not itself an address computation.
    Value(Box<Expr>),
    TakeAddr(Box<Expr>),
    IntToPtr {
        x: Box<Expr>,
        to: TypeId,
    },
    PtrToPtr {
        x: Box<PtrExpr>,
        to: TypeId,
    },
    /// Constant byte offset. `conv` retypes the result; `None` keeps the
    /// type of `x`.
    Offset {
        x: Box<PtrExpr>,
        bytes: i64,
        conv: Option<TypeId>,
    },
    /// Offset by `index` elements of the pointee.
    ElemOffset {
        x: Box<PtrExpr>,
        index: Box<Expr>,
        conv: Option<TypeId>,
    },
    /// Offset by `index * mul` bytes.
    VarOffset {
        x: Box<PtrExpr>,
        mul: i64,
        index: Box<Expr>,
        conv: Option<TypeId>,
    },
    /// Address of a function.
    Func(Box<Expr>),
}

impl PtrExpr {
    pub fn value(x: Expr) -> Self {
        match x {
            Expr::Ptr(p) => *p,
            x => PtrExpr::Value(Box::new(x)),
        }
    }

    pub fn take_addr(x: Expr) -> Self {
        PtrExpr::TakeAddr(Box::new(x))
    }

    pub fn ptr_type(&self, env: &TypeEnv) -> TypeId {
        match self {
            PtrExpr::Nil => env.nil_t(),
            PtrExpr::Value(x) => x.ctype(env),
            PtrExpr::TakeAddr(x) => env.ptr_t(Some(x.ctype(env))),
            PtrExpr::IntToPtr { to, .. } | PtrExpr::PtrToPtr { to, .. } => *to,
            PtrExpr::Offset { x, conv, .. }
            | PtrExpr::ElemOffset { x, conv, .. }
            | PtrExpr::VarOffset { x, conv, .. } => conv.unwrap_or_else(|| x.ptr_type(env)),
            PtrExpr::Func(_) => env.unsafe_ptr_t(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, PtrExpr::Nil)
    }

    pub fn is_const(&self) -> bool {
        match self {
            PtrExpr::Nil => true,
            PtrExpr::IntToPtr { x, .. } => x.is_const(),
            PtrExpr::PtrToPtr { x, .. } | PtrExpr::Offset { x, .. } => x.is_const(),
            _ => false,
        }
    }

    pub fn has_side_effects(&self) -> bool {
        match self {
            PtrExpr::Nil => false,
            PtrExpr::Value(x) | PtrExpr::TakeAddr(x) | PtrExpr::Func(x) => x.has_side_effects(),
            PtrExpr::IntToPtr { x, .. } => x.has_side_effects(),
            PtrExpr::PtrToPtr { x, .. } | PtrExpr::Offset { x, .. } => x.has_side_effects(),
            PtrExpr::ElemOffset { x, index, .. } | PtrExpr::VarOffset { x, index, .. } => {
                x.has_side_effects() || index.has_side_effects()
            }
        }
    }

    /// Constant integer an `IntToPtr` was built from.
    pub(crate) fn const_addr(&self) -> Option<IntLit> {
        match self {
            PtrExpr::IntToPtr { x, .. } => x.const_int(),
            _ => None,
        }
    }
}
