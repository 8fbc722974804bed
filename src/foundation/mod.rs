//! Shared primitives: core value types, error plumbing, pixel math.

pub mod core;
pub mod error;
pub(crate) mod math;
