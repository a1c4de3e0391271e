//! Target-language type syntax.

use std::fmt::Write;

use crate::env::TypeEnv;
use crate::shape::{Field, FuncSig, TypeId, TypeShape};

impl TypeEnv {
    /// Renders `id` as target type syntax. Named types render by name.
    pub fn render(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id);
        out
    }

    /// Renders a possibly absent type; `None` is `void` and renders empty.
    pub fn render_opt(&self, id: Option<TypeId>) -> String {
        id.map(|id| self.render(id)).unwrap_or_default()
    }

    fn write_type(&self, out: &mut String, id: TypeId) {
        match &*self.shape(id) {
            TypeShape::Unknown { .. } => out.push_str("interface{}"),
            TypeShape::Named(named) => out.push_str(&named.target),
            TypeShape::Int(t) => {
                let u = if t.is_signed() { "" } else { "u" };
                let _ = write!(out, "{u}int{}", t.bits());
            }
            TypeShape::Float(t) => {
                let _ = write!(out, "float{}", t.size() * 8);
            }
            TypeShape::Bool => out.push_str("bool"),
            TypeShape::Ptr { elem: None, .. } => out.push_str("unsafe.Pointer"),
            TypeShape::Ptr {
                elem: Some(elem), ..
            } => {
                out.push('*');
                self.write_type(out, *elem);
            }
            TypeShape::Array(a) => {
                if a.slice {
                    out.push_str("[]");
                } else {
                    let _ = write!(out, "[{}]", a.len);
                }
                self.write_type(out, a.elem);
            }
            TypeShape::Func(sig) => self.write_func(out, sig),
            TypeShape::Struct(s) => {
                if s.fields.is_empty() {
                    out.push_str("struct{}");
                    return;
                }
                out.push_str("struct {");
                if s.union {
                    out.push_str(" /* union */");
                }
                for (i, f) in s.fields.iter().enumerate() {
                    out.push_str(if i == 0 { " " } else { "; " });
                    self.write_field(out, f, false);
                }
                out.push_str(" }");
            }
        }
    }

    fn write_field(&self, out: &mut String, f: &Field, blank_unnamed: bool) {
        if !f.is_unnamed() {
            out.push_str(&cport_core::escape_ident(&f.name));
            out.push(' ');
        } else if blank_unnamed {
            out.push_str("_ ");
        }
        self.write_type(out, f.ty);
    }

    fn write_func(&self, out: &mut String, sig: &FuncSig) {
        // an argument list is either fully named or fully unnamed
        let named = sig.args.is_empty() || sig.args.iter().any(|a| !a.is_unnamed());
        out.push_str("func(");
        for (i, arg) in sig.args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_field(out, arg, named);
        }
        if sig.variadic {
            if !sig.args.is_empty() {
                out.push_str(", ");
            }
            if named {
                out.push_str("_rest ");
            }
            out.push_str("...interface{}");
        }
        out.push(')');
        if let Some(ret) = sig.ret {
            out.push(' ');
            self.write_type(out, ret);
        }
    }
}
