//! The Rill type system: type representation and the subsumption algebra.

pub mod calc;
pub mod ty;

pub use calc::{assignable, common_type};
pub use ty::Ty;
