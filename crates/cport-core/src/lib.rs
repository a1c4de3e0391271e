//! Shared primitives for the cport translation engine.
//!
//! - `SourcePos`: where a legacy declaration or expression came from
//! - `ident`: mapping legacy identifiers onto valid target identifiers
//! - `invariants`: fatal checks for engine bugs

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod ident;
pub mod invariants;
mod pos;

#[cfg(test)]
mod pos_tests;

pub use ident::escape_ident;
pub use pos::SourcePos;
