//! Type model for the cport translation engine.
//!
//! Every type of a translation run lives in a [`TypeEnv`] and is referred to
//! by a [`TypeId`]. Structural types are interned, so equal shapes share one
//! id; named types and unresolved placeholders are identities.
//!
//! On top of the arena:
//! - [`Kind`]: bitmask classification used for dispatch
//! - [`TypeEnv::same`]: structural equality aware of untyped constants
//! - [`TypeEnv::common_type`]: the usual arithmetic conversions
//! - [`TypeEnv::render`]: target type syntax
//! - [`TypeEnv::convert_decl`]: legacy declarations with identifier overrides

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod arena;
mod builtins;
mod common;
mod config;
mod decl;
mod env;
mod error;
mod kind;
mod render;
mod same;
mod shape;

#[cfg(test)]
mod kind_tests;
#[cfg(test)]
mod same_tests;

pub use builtins::{CTypes, GoTypes};
pub use config::{Config, IdentHint};
pub use decl::TypeDesc;
pub use env::TypeEnv;
pub use error::{ConfigError, DeclError};
pub use kind::Kind;
pub use same::same_int;
pub use shape::{
    ArrayType, Field, FloatType, FuncSig, IntType, NamedType, StructType, TypeId, TypeShape,
};
