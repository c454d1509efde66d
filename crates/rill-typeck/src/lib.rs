//! Type inference for the Rill configuration language.
//!
//! The engine walks a parsed program once, producing the type of its final
//! statement or the first error it hits. `define` and `class` declarations
//! register parameter schemas along the way, and resource instantiations of
//! known types are checked against them.

pub mod algebra;
pub mod annot;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod infer;

pub use error::TypeError;
pub use infer::Inferer;

use rill_parser::ast::Program;
use rill_types::Ty;

/// Infer the type of a program.
pub fn infer(program: &Program) -> Result<Ty, TypeError> {
    Inferer::new().infer_program(program)
}
