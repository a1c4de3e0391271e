//! Expression lowering for the cport translation engine.
//!
//! Turns legacy value semantics into target expressions:
//! - `literal` - integer, float and string constants
//! - `expr` - the lowered expression model
//! - `cast` - the conversion dispatcher
//! - `bools` - truth tests and comparisons
//! - `pointer` - address arithmetic and pointer conversions
//! - `binary` - operators under the usual arithmetic conversions
//! - `render` - target source text

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod binary;
mod bools;
mod cast;
mod error;
pub mod expr;
pub mod literal;
mod lower;
mod pointer;
mod render;

#[cfg(test)]
mod binary_tests;
#[cfg(test)]
mod cast_tests;
#[cfg(test)]
mod pointer_tests;

pub use error::{Error, LiteralError, Result};
pub use expr::{BinaryOp, BoolExpr, CompareOp, Expr, Helper, Ident, LogicalOp, PtrExpr, UnaryOp};
pub use literal::{FloatLit, IntLit, Radix, StringLit};
pub use lower::Lower;
