//! Invariant checks excluded from coverage reports.
//!
//! A failure here is a bug in the engine, never in the legacy program, so
//! nothing is returned to the caller: the translation unit aborts.

#![cfg_attr(coverage_nightly, coverage(off))]

use std::fmt::Display;

#[track_caller]
pub fn invariant_violated(what: &str, detail: impl Display) -> ! {
    panic!("internal invariant violated: {what}: {detail}")
}

#[track_caller]
pub fn ensure(cond: bool, what: &str, detail: impl FnOnce() -> String) {
    if !cond {
        invariant_violated(what, detail());
    }
}
