//! Parser for the Rill configuration language.
//!
//! The entry point is [`parse`], which tokenizes and parses a source string
//! into an owned [`ast::Program`]. Parsing stops at the first error.

pub mod ast;
pub mod error;
mod parser;

pub use error::ParseError;

/// Parse Rill source text into a program.
pub fn parse(source: &str) -> Result<ast::Program, ParseError> {
    parser::Parser::new(source).parse_program()
}
