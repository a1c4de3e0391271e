//! Conversion of legacy declarations into arena types.
//!
//! The parser layer hands over a [`TypeDesc`] per declaration. The
//! identifier override table in [`crate::Config::idents`] is consulted
//! before any structural inference.

use cport_core::SourcePos;

use crate::config::IdentHint;
use crate::env::TypeEnv;
use crate::error::DeclError;
use crate::shape::{Field, TypeId};

/// Legacy type descriptor, as produced by the parser layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDesc {
    Void,
    Bool,
    Int { size: u32, signed: bool },
    Float { size: u32 },
    /// Fundamental type or platform alias by name (`unsigned long`, `DWORD`).
    Builtin(String),
    Pointer(Box<TypeDesc>),
    /// `len == None` for `T[]`.
    Array { elem: Box<TypeDesc>, len: Option<u64> },
    Func {
        ret: Box<TypeDesc>,
        params: Vec<(String, TypeDesc)>,
        variadic: bool,
    },
    /// Anonymous when `name` is `None`. A named record can refer to itself
    /// through [`TypeDesc::Ref`].
    Record {
        name: Option<String>,
        fields: Vec<(String, TypeDesc)>,
        union: bool,
    },
    Typedef { name: String, target: Box<TypeDesc> },
    /// Reference to a typedef or named record converted earlier.
    Ref(String),
}

impl TypeDesc {
    pub fn ptr(elem: TypeDesc) -> Self {
        Self::Pointer(Box::new(elem))
    }

    pub fn array(elem: TypeDesc, len: Option<u64>) -> Self {
        Self::Array {
            elem: Box::new(elem),
            len,
        }
    }
}

impl TypeEnv {
    /// Converts the type of declaration `name`.
    ///
    /// Returns `None` for `void`. At the root, a pointer to a function is
    /// the function type itself and an array without length is a slice.
    pub fn convert_decl(
        &self,
        name: &str,
        desc: &TypeDesc,
        pos: &SourcePos,
    ) -> Result<Option<TypeId>, DeclError> {
        if let Some(hint) = self.config().ident_hint(name) {
            return self.apply_hint(name, hint, desc, pos).map(Some);
        }
        self.convert_root(name, desc, pos)
    }

    fn convert_root(
        &self,
        owner: &str,
        desc: &TypeDesc,
        pos: &SourcePos,
    ) -> Result<Option<TypeId>, DeclError> {
        match desc {
            TypeDesc::Pointer(inner) if matches!(**inner, TypeDesc::Func { .. }) => {
                self.convert_type(owner, inner, pos)
            }
            TypeDesc::Array { elem, len: None | Some(0) } => {
                let elem = self.convert_value(owner, elem, pos)?;
                Ok(Some(self.slice_t(elem)))
            }
            _ => self.convert_type(owner, desc, pos),
        }
    }

    fn apply_hint(
        &self,
        name: &str,
        hint: IdentHint,
        desc: &TypeDesc,
        pos: &SourcePos,
    ) -> Result<TypeId, DeclError> {
        tracing::trace!(name, ?hint, "identifier override");
        match hint {
            IdentHint::Bool => Ok(self.bool_t()),
            IdentHint::Iface => Ok(self.go().iface()),
            IdentHint::String => Ok(self.go().string()),
            IdentHint::Slice => {
                let elem = match desc {
                    TypeDesc::Pointer(elem) => elem,
                    TypeDesc::Array { elem, .. } => elem,
                    _ => {
                        return Err(DeclError::SliceOverride {
                            name: name.to_owned(),
                            pos: pos.clone(),
                        });
                    }
                };
                let elem = self.convert_value(name, elem, pos)?;
                Ok(self.slice_t(elem))
            }
        }
    }

    /// Like `convert_type`, but `void` becomes the opaque byte.
    fn convert_value(
        &self,
        owner: &str,
        desc: &TypeDesc,
        pos: &SourcePos,
    ) -> Result<TypeId, DeclError> {
        Ok(self
            .convert_type(owner, desc, pos)?
            .unwrap_or_else(|| self.go().byte()))
    }

    fn convert_type(
        &self,
        owner: &str,
        desc: &TypeDesc,
        pos: &SourcePos,
    ) -> Result<Option<TypeId>, DeclError> {
        let id = match desc {
            TypeDesc::Void => return Ok(None),
            TypeDesc::Bool => self.bool_t(),
            TypeDesc::Int { size, signed: true } => self.int_t(*size),
            TypeDesc::Int { size, signed: false } => self.uint_t(*size),
            TypeDesc::Float { size } => self.float_t(*size),
            TypeDesc::Builtin(name) => self.lookup_c(name).ok_or_else(|| unknown(name, pos))?,
            TypeDesc::Pointer(elem) => {
                let elem = self.convert_type(owner, elem, pos)?;
                self.ptr_t(elem)
            }
            TypeDesc::Array { elem, len } => {
                let elem = self.convert_value(owner, elem, pos)?;
                self.array_t(elem, len.unwrap_or(0))
            }
            TypeDesc::Func {
                ret,
                params,
                variadic,
            } => {
                let ret = self.convert_type(owner, ret, pos)?;
                let args = self.convert_members(owner, params, pos)?;
                self.func_t(ret, args, *variadic)
            }
            TypeDesc::Record {
                name: None,
                fields,
                union,
            } => {
                let fields = self.convert_members(owner, fields, pos)?;
                self.record(fields, *union)
            }
            TypeDesc::Record {
                name: Some(name),
                fields,
                union,
            } => {
                if let Some(id) = self.typedefs.get(name) {
                    return Ok(Some(*id));
                }
                let id = self.declare_named(name);
                self.typedefs.insert(name.clone(), id);
                let fields = self.convert_members(name, fields, pos)?;
                let underlying = self.record(fields, *union);
                self.complete_named(id, underlying);
                id
            }
            TypeDesc::Typedef { name, target } => {
                if let Some(id) = self.typedefs.get(name) {
                    return Ok(Some(*id));
                }
                let Some(underlying) = self.convert_root(name, target, pos)? else {
                    return Ok(None);
                };
                *self
                    .typedefs
                    .entry(name.clone())
                    .or_insert_with(|| self.named_t(name, underlying))
            }
            TypeDesc::Ref(name) => self
                .typedefs
                .get(name)
                .map(|id| *id)
                .ok_or_else(|| unknown(name, pos))?,
        };
        Ok(Some(id))
    }

    fn convert_members(
        &self,
        owner: &str,
        members: &[(String, TypeDesc)],
        pos: &SourcePos,
    ) -> Result<Vec<Field>, DeclError> {
        members
            .iter()
            .map(|(name, desc)| {
                let ty = match self.config().member_hint(owner, name) {
                    Some(hint) => self.apply_hint(name, hint, desc, pos)?,
                    None => self
                        .convert_root(owner, desc, pos)?
                        .unwrap_or_else(|| self.go().byte()),
                };
                Ok(Field::new(name.clone(), ty))
            })
            .collect()
    }

    fn record(&self, fields: Vec<Field>, union: bool) -> TypeId {
        if union {
            self.union_t(fields)
        } else {
            self.struct_t(fields)
        }
    }
}

fn unknown(name: &str, pos: &SourcePos) -> DeclError {
    DeclError::UnknownTypeName {
        name: name.to_owned(),
        pos: pos.clone(),
    }
}
