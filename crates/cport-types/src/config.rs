use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Forces a legacy identifier to a specific target representation,
/// overriding structural inference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentHint {
    /// Target `bool`, whatever the declared integer type.
    Bool,
    /// Target `interface{}`.
    Iface,
    /// Target managed `string`.
    String,
    /// Dynamically-sized view instead of a pointer or fixed array.
    Slice,
}

/// Platform and override settings for one translation run.
///
/// Built once, then frozen inside [`crate::TypeEnv`]. Keys in `idents` are
/// plain legacy names for declarations, or `<owner>.<member>` for struct
/// fields and function arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pointer width in bytes.
    pub ptr_size: u32,
    /// Default `int` width in bytes.
    pub int_size: u32,
    pub wchar_size: u32,
    pub wchar_signed: bool,
    /// Map the default int/uint to the target's machine-width `int`/`uint`.
    pub use_go_int: bool,
    /// Let pointer casts to a struct's first field type resolve to the
    /// field address.
    pub first_field_aliasing: bool,
    pub idents: IndexMap<String, IdentHint>,
}

impl Default for Config {
    fn default() -> Self {
        let host = std::mem::size_of::<usize>() as u32;
        Self {
            ptr_size: host,
            int_size: host,
            wchar_size: 2,
            wchar_signed: false,
            use_go_int: false,
            first_field_aliasing: true,
            idents: IndexMap::new(),
        }
    }
}

impl Config {
    pub fn config32() -> Self {
        Self {
            ptr_size: 4,
            int_size: 4,
            ..Self::default()
        }
    }

    pub fn config64() -> Self {
        Self {
            ptr_size: 8,
            int_size: 8,
            ..Self::default()
        }
    }

    pub fn with_ident(mut self, name: impl Into<String>, hint: IdentHint) -> Self {
        self.idents.insert(name.into(), hint);
        self
    }

    pub fn ident_hint(&self, name: &str) -> Option<IdentHint> {
        self.idents.get(name).copied()
    }

    pub fn member_hint(&self, owner: &str, member: &str) -> Option<IdentHint> {
        self.idents.get(&format!("{owner}.{member}")).copied()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.ptr_size, 4 | 8) {
            return Err(ConfigError::PtrSize(self.ptr_size));
        }
        if !matches!(self.int_size, 1 | 2 | 4 | 8) {
            return Err(ConfigError::IntSize(self.int_size));
        }
        if !matches!(self.wchar_size, 1 | 2 | 4) {
            return Err(ConfigError::WCharSize(self.wchar_size));
        }
        Ok(())
    }
}
