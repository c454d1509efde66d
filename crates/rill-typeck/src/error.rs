//! Structured type errors produced by the inference engine.

use std::fmt;

use serde::Serialize;

use rill_common::span::Span;
use rill_types::Ty;

/// An error raised while inferring a program. Inference stops at the first
/// one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeError {
    /// A resource attribute whose inferred value type is not assignable to
    /// the declared parameter type.
    ParameterMismatch {
        parameter: String,
        declared: Ty,
        inferred: Ty,
        span: Span,
    },
    /// A resource attribute naming a parameter the schema does not declare.
    UnknownParameter {
        parameter: String,
        type_name: String,
        span: Span,
    },
    /// A type annotation naming an unknown type.
    UnknownTypeName { name: String, span: Span },
    /// A type annotation with arguments the named type does not take.
    BadTypeParameters { name: String, span: Span },
    /// A construct that parses but has no inference rule.
    UnsupportedConstruct {
        construct: &'static str,
        span: Span,
    },
}

impl TypeError {
    /// The source span the error points at.
    pub fn span(&self) -> Span {
        match self {
            TypeError::ParameterMismatch { span, .. }
            | TypeError::UnknownParameter { span, .. }
            | TypeError::UnknownTypeName { span, .. }
            | TypeError::BadTypeParameters { span, .. }
            | TypeError::UnsupportedConstruct { span, .. } => *span,
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::ParameterMismatch {
                parameter,
                declared,
                inferred,
                ..
            } => write!(
                f,
                "parameter `{parameter}` expected {declared}, got {inferred}"
            ),
            TypeError::UnknownParameter {
                parameter,
                type_name,
                ..
            } => write!(f, "`{type_name}` has no parameter `{parameter}`"),
            TypeError::UnknownTypeName { name, .. } => {
                write!(f, "unknown type name `{name}`")
            }
            TypeError::BadTypeParameters { name, .. } => {
                write!(f, "invalid parameters for type `{name}`")
            }
            TypeError::UnsupportedConstruct { construct, .. } => {
                write!(f, "cannot infer a type for {construct}")
            }
        }
    }
}

impl std::error::Error for TypeError {}
