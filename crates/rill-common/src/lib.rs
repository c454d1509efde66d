//! Shared vocabulary for the Rill toolchain: source spans and tokens.

pub mod span;
pub mod token;
